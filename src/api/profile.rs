// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Profile composition and self-service profile updates.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        FriendsPageResponse, ProfileResponse, UpdateDetailsRequest, UpdateImageRequest,
        UploadedImage,
    },
    state::AppState,
};

/// Compose a profile page: the target's public record, their friends as
/// summaries, their posts, and the viewer's relationship to them.
#[utoipa::path(
    get,
    path = "/profile/{username}",
    params(("username" = String, Path, description = "Profile handle")),
    tag = "Profile",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 404, description = "No profile with that handle"),
    )
)]
pub async fn get_profile(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let store = state.store.read().await;
    store.user(caller.user_id)?;

    let target = store
        .user_by_username(&username)
        .ok_or_else(|| ApiError::not_found("Profile not found"))?
        .clone();

    let friendship = store.friendship(caller.user_id, target.id)?;
    let friends = store.summaries(&target.friends);
    let posts = store.posts_by_user(target.id);

    Ok(Json(ProfileResponse {
        id: target.id,
        username: target.username,
        first_name: target.first_name,
        last_name: target.last_name,
        picture: target.picture,
        cover: target.cover,
        details: target.details,
        verified: target.verified,
        gender: target.gender,
        birth_year: target.birth_year,
        birth_month: target.birth_month,
        birth_day: target.birth_day,
        friends,
        friendship,
        posts,
    }))
}

#[utoipa::path(
    put,
    path = "/profile-picture",
    request_body = UpdateImageRequest,
    tag = "Profile",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UploadedImage),
        (status = 404, description = "Caller record is gone"),
    )
)]
pub async fn update_picture(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateImageRequest>,
) -> Result<Json<UploadedImage>, ApiError> {
    let mut store = state.store.write().await;
    store.set_picture(caller.user_id, request.url.clone())?;
    Ok(Json(UploadedImage { url: request.url }))
}

#[utoipa::path(
    put,
    path = "/cover",
    request_body = UpdateImageRequest,
    tag = "Profile",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UploadedImage),
        (status = 404, description = "Caller record is gone"),
    )
)]
pub async fn update_cover(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateImageRequest>,
) -> Result<Json<UploadedImage>, ApiError> {
    let mut store = state.store.write().await;
    store.set_cover(caller.user_id, request.url.clone())?;
    Ok(Json(UploadedImage { url: request.url }))
}

/// Replace the caller's free-form profile details, echoing back the
/// stored value.
#[utoipa::path(
    put,
    path = "/details",
    request_body = UpdateDetailsRequest,
    tag = "Profile",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The stored details object"),
        (status = 404, description = "Caller record is gone"),
    )
)]
pub async fn update_details(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateDetailsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = state.store.write().await;
    let details = store.set_details(caller.user_id, request.infos)?;
    Ok(Json(details))
}

/// Everything the friends page needs in one response: current friends,
/// incoming requests, and requests the caller has sent.
#[utoipa::path(
    get,
    path = "/friends-page-info",
    tag = "Profile",
    security(("bearer" = [])),
    responses(
        (status = 200, body = FriendsPageResponse),
        (status = 404, description = "Caller record is gone"),
    )
)]
pub async fn friends_page_info(
    Auth(caller): Auth,
    State(state): State<AppState>,
) -> Result<Json<FriendsPageResponse>, ApiError> {
    let store = state.store.read().await;
    let user = store.user(caller.user_id)?;

    Ok(Json(FriendsPageResponse {
        friends: store.summaries(&user.friends),
        requests: store.summaries(&user.requests),
        sent_requests: store.sent_requests(caller.user_id),
    }))
}
