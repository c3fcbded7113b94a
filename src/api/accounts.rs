// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Registration, activation, and login.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::password::{hash_password, verify_password},
    auth::Auth,
    error::ApiError,
    models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest},
    state::AppState,
    store::NewUser,
    validation::{is_valid_email, validate_length},
};

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    tag = "Accounts",
    responses(
        (status = 201, body = AuthResponse),
        (status = 400, description = "Validation failure or duplicate email"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if !is_valid_email(&request.email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    validate_length(&request.first_name, "First name", 3, 30)?;
    validate_length(&request.last_name, "Last name", 3, 30)?;
    validate_length(&request.password, "Password", 6, 40)?;

    let password_hash = hash_password(&request.password)?;

    let user = {
        let mut store = state.store.write().await;
        if store.is_email_taken(&request.email) {
            return Err(ApiError::bad_request(
                "This email address already exists, try with a different email address",
            ));
        }
        store.create_user(NewUser {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password_hash,
            username_seed: request.username,
            birth_year: request.birth_year,
            birth_month: request.birth_month,
            birth_day: request.birth_day,
            gender: request.gender,
        })
    };

    let verification_token = state.tokens.sign_verification(user.id)?;
    let activation_url = format!("{}/activate/{}", state.base_url, verification_token);
    state
        .mailer
        .send_verification_link(&user.email, &user.first_name, &activation_url)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let token = state.tokens.sign_session(user.id)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            username: user.username,
            picture: user.picture,
            first_name: user.first_name,
            last_name: user.last_name,
            token,
            verified: user.verified,
            message: Some("Register Success! Please activate your email to start".to_string()),
        }),
    ))
}

/// Consume an email verification token and flip the account to verified.
///
/// A bad or expired token surfaces as an opaque 500, matching the
/// catch-all behavior clients already depend on.
#[utoipa::path(
    get,
    path = "/activate/{token}",
    params(("token" = String, Path, description = "Email verification token")),
    tag = "Accounts",
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Already activated"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Bad or expired token"),
    )
)]
pub async fn activate(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let claims = state
        .tokens
        .verify(&token)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let mut store = state.store.write().await;
    let user = store.user(claims.sub)?;
    if user.verified {
        return Err(ApiError::bad_request("This email is already activated."));
    }
    store.set_verified(claims.sub)?;

    Ok(Json(MessageResponse::new(
        "Account has been activated successfully.",
    )))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Accounts",
    responses(
        (status = 200, body = AuthResponse),
        (status = 400, description = "Unknown email, unverified account, or bad password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = {
        let store = state.store.read().await;
        store
            .user_by_email(&request.email)
            .cloned()
            .ok_or_else(|| {
                ApiError::bad_request(
                    "The email address you entered is not connected to an account.",
                )
            })?
    };

    if !user.verified {
        return Err(ApiError::bad_request(
            "Please verify your email before logging in.",
        ));
    }
    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::bad_request(
            "Invalid credentials. Please try again.",
        ));
    }

    let token = state.tokens.sign_session(user.id)?;
    Ok(Json(AuthResponse {
        id: user.id,
        username: user.username,
        picture: user.picture,
        first_name: user.first_name,
        last_name: user.last_name,
        token,
        verified: user.verified,
        message: None,
    }))
}

/// Re-send the activation link to the authenticated user.
#[utoipa::path(
    post,
    path = "/send-verification",
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Already activated"),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn send_verification(
    Auth(caller): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (email, first_name) = {
        let store = state.store.read().await;
        let user = store.user(caller.user_id)?;
        if user.verified {
            return Err(ApiError::bad_request("This account is already activated."));
        }
        (user.email.clone(), user.first_name.clone())
    };

    let verification_token = state.tokens.sign_verification(caller.user_id)?;
    let activation_url = format!("{}/activate/{}", state.base_url, verification_token);
    state
        .mailer
        .send_verification_link(&email, &first_name, &activation_url)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(MessageResponse::new(
        "Email verification link has been sent to your email.",
    )))
}
