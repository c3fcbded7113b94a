// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! External media store client.
//!
//! Image bytes are proxied to an external object store; transcoding and
//! storage are its concern. Each upload forwards one file as a multipart
//! request and resolves to a public URL; `search` passes the provider's
//! result JSON through untouched.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::MediaStoreConfig;
use crate::models::UploadedImage;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Media store request failed: {0}")]
    Request(String),

    #[error("Upload image failed.")]
    Upload,

    #[error("Media store response was invalid: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

pub struct MediaClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl MediaClient {
    pub fn new(config: &MediaStoreConfig) -> Result<Self, MediaError> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| MediaError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            http,
        })
    }

    /// Upload one file into `folder`, resolving to its public URL.
    pub async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, MediaError> {
        let form = Form::new()
            .text("folder", folder.to_string())
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|_| MediaError::Upload)?;

        if !response.status().is_success() {
            return Err(MediaError::Upload);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        info!(folder, file_name, "Uploaded image to media store");
        Ok(UploadedImage {
            url: body.secure_url,
        })
    }

    /// Search stored images by folder path expression. The provider's
    /// result JSON is returned as-is.
    pub async fn search(&self, path: &str, sort: &str, max: u32) -> Result<Value, MediaError> {
        let response = self
            .http
            .post(format!("{}/resources/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "expression": path,
                "sort_by": [{ "created_at": sort }],
                "max_results": max,
            }))
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(MediaError::Request(format!(
                "search returned status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))
    }
}
