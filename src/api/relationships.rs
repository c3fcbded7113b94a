// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Friend/follow graph endpoints. Each handler is a thin shim: take the
//! store write lock, run one relationship transition, acknowledge.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{auth::Auth, error::ApiError, models::MessageResponse, state::AppState};

#[utoipa::path(
    post,
    path = "/add-friend/{id}",
    params(("id" = Uuid, Path, description = "Target user id")),
    tag = "Relationships",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Self-target or request already pending"),
        (status = 404, description = "Target user not found"),
    )
)]
pub async fn add_friend(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.send_friend_request(caller.user_id, id)?;
    Ok(Json(MessageResponse::new("Friend request has been sent")))
}

#[utoipa::path(
    post,
    path = "/cancel-request/{id}",
    params(("id" = Uuid, Path, description = "Target user id")),
    tag = "Relationships",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "No pending request"),
        (status = 404, description = "Target user not found"),
    )
)]
pub async fn cancel_request(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.cancel_friend_request(caller.user_id, id)?;
    Ok(Json(MessageResponse::new(
        "You successfully canceled the request",
    )))
}

#[utoipa::path(
    post,
    path = "/follow/{id}",
    params(("id" = Uuid, Path, description = "Target user id")),
    tag = "Relationships",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Self-target or already following"),
        (status = 404, description = "Target user not found"),
    )
)]
pub async fn follow(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.follow(caller.user_id, id)?;
    Ok(Json(MessageResponse::new("Follow success")))
}

#[utoipa::path(
    post,
    path = "/unfollow/{id}",
    params(("id" = Uuid, Path, description = "Target user id")),
    tag = "Relationships",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Not following"),
        (status = 404, description = "Target user not found"),
    )
)]
pub async fn unfollow(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.unfollow(caller.user_id, id)?;
    Ok(Json(MessageResponse::new("Unfollow success")))
}

#[utoipa::path(
    post,
    path = "/accept-request/{id}",
    params(("id" = Uuid, Path, description = "Requesting user id")),
    tag = "Relationships",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "No pending request from that user"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn accept_request(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.accept_friend_request(caller.user_id, id)?;
    Ok(Json(MessageResponse::new("Friend request accepted")))
}

#[utoipa::path(
    post,
    path = "/delete-request/{id}",
    params(("id" = Uuid, Path, description = "Requesting user id")),
    tag = "Relationships",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "No pending request from that user"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn delete_request(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.delete_friend_request(caller.user_id, id)?;
    Ok(Json(MessageResponse::new("Friend request deleted")))
}

#[utoipa::path(
    post,
    path = "/unfriend/{id}",
    params(("id" = Uuid, Path, description = "Friend user id")),
    tag = "Relationships",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Not friends"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn unfriend(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.unfriend(caller.user_id, id)?;
    Ok(Json(MessageResponse::new("You are no longer friends")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::store::sample_user;
    use axum::http::StatusCode;

    async fn state_with_pair() -> (AppState, Uuid, Uuid) {
        let state = AppState::default();
        let (a, b) = {
            let mut store = state.store.write().await;
            let a = sample_user(&mut store, "Alice", "Stone").id;
            let b = sample_user(&mut store, "Bob", "Reed").id;
            (a, b)
        };
        (state, a, b)
    }

    fn auth(user_id: Uuid) -> Auth {
        Auth(AuthenticatedUser {
            user_id,
            expires_at: 0,
        })
    }

    #[tokio::test]
    async fn request_accept_unfriend_lifecycle() {
        let (state, a, b) = state_with_pair().await;

        let Json(sent) = add_friend(auth(a), State(state.clone()), Path(b))
            .await
            .unwrap();
        assert_eq!(sent.message, "Friend request has been sent");

        let Json(accepted) = accept_request(auth(b), State(state.clone()), Path(a))
            .await
            .unwrap();
        assert_eq!(accepted.message, "Friend request accepted");

        {
            let store = state.store.read().await;
            assert!(store.user(a).unwrap().friends.contains(&b));
            assert!(store.user(b).unwrap().friends.contains(&a));
        }

        let Json(removed) = unfriend(auth(a), State(state.clone()), Path(b))
            .await
            .unwrap();
        assert_eq!(removed.message, "You are no longer friends");

        // Unfriending twice is the documented 400.
        let err = unfriend(auth(a), State(state), Path(b)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Not friends");
    }

    #[tokio::test]
    async fn cancel_and_delete_clear_pending_requests() {
        let (state, a, b) = state_with_pair().await;

        add_friend(auth(a), State(state.clone()), Path(b))
            .await
            .unwrap();
        cancel_request(auth(a), State(state.clone()), Path(b))
            .await
            .unwrap();

        add_friend(auth(a), State(state.clone()), Path(b))
            .await
            .unwrap();
        let Json(deleted) = delete_request(auth(b), State(state.clone()), Path(a))
            .await
            .unwrap();
        assert_eq!(deleted.message, "Friend request deleted");

        let store = state.store.read().await;
        assert!(store.user(b).unwrap().requests.is_empty());
        assert!(store.user(a).unwrap().following.is_empty());
    }

    #[tokio::test]
    async fn follow_endpoints_roundtrip() {
        let (state, a, b) = state_with_pair().await;

        let Json(followed) = follow(auth(a), State(state.clone()), Path(b))
            .await
            .unwrap();
        assert_eq!(followed.message, "Follow success");

        let err = follow(auth(a), State(state.clone()), Path(b))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Already following");

        let Json(unfollowed) = unfollow(auth(a), State(state.clone()), Path(b))
            .await
            .unwrap();
        assert_eq!(unfollowed.message, "Unfollow success");
    }

    #[tokio::test]
    async fn self_target_and_missing_user_map_to_400_and_404() {
        let (state, a, _) = state_with_pair().await;

        let err = add_friend(auth(a), State(state.clone()), Path(a))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = follow(auth(a), State(state), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
