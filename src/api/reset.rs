// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Password reset flow: find the account, mail a code, validate it,
//! set the new password.

use axum::{extract::State, Json};

use crate::{
    auth::password::hash_password,
    error::ApiError,
    models::{
        ChangePasswordRequest, EmailRequest, FoundUserResponse, MessageResponse,
        ValidateCodeRequest,
    },
    state::AppState,
    validation::validate_length,
};

#[utoipa::path(
    post,
    path = "/find-user",
    request_body = EmailRequest,
    tag = "Password Reset",
    responses(
        (status = 200, body = FoundUserResponse),
        (status = 400, description = "Unknown email"),
    )
)]
pub async fn find_user(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<FoundUserResponse>, ApiError> {
    let store = state.store.read().await;
    let user = store
        .user_by_email(&request.email)
        .ok_or_else(|| ApiError::bad_request("Account does not exist."))?;

    Ok(Json(FoundUserResponse {
        email: user.email.clone(),
        picture: user.picture.clone(),
    }))
}

/// Issue a fresh reset code and mail it. Any previously issued code for
/// the account stops working.
#[utoipa::path(
    post,
    path = "/send-reset-code",
    request_body = EmailRequest,
    tag = "Password Reset",
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Unknown email"),
    )
)]
pub async fn send_reset_code(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (first_name, code) = {
        let mut store = state.store.write().await;
        let user = store
            .user_by_email(&request.email)
            .cloned()
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        let code = store.issue_reset_code(user.id)?;
        (user.first_name, code)
    };

    state
        .mailer
        .send_reset_code(&request.email, &first_name, &code)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(MessageResponse::new(
        "Email reset code has been sent to your email",
    )))
}

/// Check a reset code. A correct code is consumed so it cannot be
/// replayed against `/change-password` probing.
#[utoipa::path(
    post,
    path = "/validate-reset-code",
    request_body = ValidateCodeRequest,
    tag = "Password Reset",
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Wrong or expired code"),
        (status = 404, description = "Unknown email"),
    )
)]
pub async fn validate_reset_code(
    State(state): State<AppState>,
    Json(request): Json<ValidateCodeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut store = state.store.write().await;
    let user_id = store
        .user_by_email(&request.email)
        .map(|u| u.id)
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    store.validate_reset_code(user_id, &request.code)?;

    Ok(Json(MessageResponse::new("ok")))
}

#[utoipa::path(
    post,
    path = "/change-password",
    request_body = ChangePasswordRequest,
    tag = "Password Reset",
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Password too short or too long"),
        (status = 404, description = "Unknown email"),
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_length(&request.password, "Password", 6, 40)?;
    let password_hash = hash_password(&request.password)?;

    let mut store = state.store.write().await;
    store.update_password(&request.email, password_hash)?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::store::NewUser;
    use axum::http::StatusCode;

    async fn seed_user(state: &AppState, email: &str) {
        let mut store = state.store.write().await;
        store.create_user(NewUser {
            first_name: "Alice".into(),
            last_name: "Stone".into(),
            email: email.into(),
            password_hash: hash_password("old-password").unwrap(),
            username_seed: None,
            birth_year: 1995,
            birth_month: 6,
            birth_day: 1,
            gender: "female".into(),
        });
    }

    #[tokio::test]
    async fn find_user_returns_email_and_picture() {
        let state = AppState::default();
        seed_user(&state, "alice@example.com").await;

        let Json(found) = find_user(
            State(state.clone()),
            Json(EmailRequest {
                email: "alice@example.com".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(found.email, "alice@example.com");
        assert!(!found.picture.is_empty());

        let err = find_user(
            State(state),
            Json(EmailRequest {
                email: "nobody@example.com".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.message, "Account does not exist.");
    }

    #[tokio::test]
    async fn full_reset_flow() {
        let state = AppState::default();
        seed_user(&state, "alice@example.com").await;

        send_reset_code(
            State(state.clone()),
            Json(EmailRequest {
                email: "alice@example.com".into(),
            }),
        )
        .await
        .unwrap();

        let code = {
            let store = state.store.read().await;
            let user_id = store.user_by_email("alice@example.com").unwrap().id;
            store.reset_code_for_tests(user_id).unwrap()
        };
        assert_eq!(code.len(), 5);

        // The wrong code is rejected without consuming the right one.
        let err = validate_reset_code(
            State(state.clone()),
            Json(ValidateCodeRequest {
                email: "alice@example.com".into(),
                code: "00000".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.message, "Verification code is wrong.");

        let Json(ok) = validate_reset_code(
            State(state.clone()),
            Json(ValidateCodeRequest {
                email: "alice@example.com".into(),
                code: code.clone(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(ok.message, "ok");

        // Consumed: the same code no longer validates.
        let err = validate_reset_code(
            State(state.clone()),
            Json(ValidateCodeRequest {
                email: "alice@example.com".into(),
                code,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        change_password(
            State(state.clone()),
            Json(ChangePasswordRequest {
                email: "alice@example.com".into(),
                password: "brand-new-password".into(),
            }),
        )
        .await
        .unwrap();

        let store = state.store.read().await;
        let user = store.user_by_email("alice@example.com").unwrap();
        assert!(verify_password("brand-new-password", &user.password_hash));
        assert!(!verify_password("old-password", &user.password_hash));
    }

    #[tokio::test]
    async fn change_password_enforces_length() {
        let state = AppState::default();
        seed_user(&state, "alice@example.com").await;

        let err = change_password(
            State(state),
            Json(ChangePasswordRequest {
                email: "alice@example.com".into(),
                password: "tiny".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reset_endpoints_404_unknown_emails() {
        let state = AppState::default();

        let err = send_reset_code(
            State(state.clone()),
            Json(EmailRequest {
                email: "ghost@example.com".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = change_password(
            State(state),
            Json(ChangePasswordRequest {
                email: "ghost@example.com".into(),
                password: "long-enough".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
