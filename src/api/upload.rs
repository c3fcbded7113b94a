// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Media upload proxying. The service never stores image bytes; each
//! file is forwarded to the configured media store and the resulting
//! public URLs are returned.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::Value;

use crate::{
    error::ApiError,
    media::MediaClient,
    models::{ListImagesRequest, UploadedImage},
    state::AppState,
};

fn media_client(state: &AppState) -> Result<&MediaClient, ApiError> {
    state
        .media
        .as_deref()
        .ok_or_else(|| ApiError::internal("Media store is not configured"))
}

/// Accept a multipart batch: one `path` text field naming the target
/// folder plus one or more file parts. The whole batch fails if any
/// single upload fails.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Upload",
    responses(
        (status = 200, body = [UploadedImage]),
        (status = 400, description = "No files in the request"),
        (status = 500, description = "Media store unavailable or upload failed"),
    )
)]
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<UploadedImage>>, ApiError> {
    let media = media_client(&state)?;

    let mut folder = String::new();
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("path") {
            folder = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("Malformed path field: {e}")))?;
            continue;
        }

        let file_name = field
            .file_name()
            .unwrap_or("upload")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Malformed file field: {e}")))?;
        files.push((file_name, bytes.to_vec()));
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("No files selected."));
    }

    let mut uploaded = Vec::with_capacity(files.len());
    for (file_name, bytes) in files {
        let image = media
            .upload(&folder, &file_name, bytes)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?;
        uploaded.push(image);
    }

    Ok(Json(uploaded))
}

/// List stored images by folder path, passing the media store's result
/// JSON through untouched.
#[utoipa::path(
    post,
    path = "/list-images",
    request_body = ListImagesRequest,
    tag = "Upload",
    responses(
        (status = 200, description = "Media store search result"),
        (status = 500, description = "Media store unavailable or search failed"),
    )
)]
pub async fn list_images(
    State(state): State<AppState>,
    Json(request): Json<ListImagesRequest>,
) -> Result<Json<Value>, ApiError> {
    let media = media_client(&state)?;
    let result = media
        .search(&request.path, &request.sort, request.max)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::config::{AppConfig, MediaStoreConfig};
    use crate::mail::Mailer;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const BOUNDARY: &str = "x-test-boundary";

    /// State whose media client points at a closed port, so every upload
    /// attempt fails with a connection error.
    fn state_with_unreachable_media() -> AppState {
        let media_config = MediaStoreConfig {
            base_url: "http://127.0.0.1:9".into(),
            api_key: "key".into(),
        };
        let media = MediaClient::new(&media_config).unwrap();
        AppState::new(&AppConfig::default(), Mailer::log_only(), Some(media))
    }

    fn multipart_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(file_name: &str, contents: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n{contents}\r\n"
        )
    }

    #[tokio::test]
    async fn list_images_without_media_store_is_internal_error() {
        let state = AppState::default();
        let err = list_images(
            State(state),
            Json(ListImagesRequest {
                path: "alice/posts".into(),
                sort: "desc".into(),
                max: 30,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Media store is not configured");
    }

    #[tokio::test]
    async fn upload_without_files_is_bad_request() {
        let app = router(state_with_unreachable_media());
        let body = format!("{}--{BOUNDARY}--\r\n", text_part("path", "alice/posts"));

        let response = app.oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "No files selected.");
    }

    #[tokio::test]
    async fn failed_upload_fails_the_whole_batch() {
        let app = router(state_with_unreachable_media());
        let body = format!(
            "{}{}{}--{BOUNDARY}--\r\n",
            text_part("path", "alice/posts"),
            file_part("a.png", "first-bytes"),
            file_part("b.png", "second-bytes"),
        );

        let response = app.oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // A single error body, not a partial array of URLs.
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json.is_object());
        assert_eq!(json["message"], "Upload image failed.");
    }
}
