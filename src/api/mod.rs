// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AuthResponse, ChangePasswordRequest, EmailRequest, FoundUserResponse, FriendshipStatus,
        FriendsPageResponse, ListImagesRequest, LoginRequest, MessageResponse, Post,
        ProfileResponse, RegisterRequest, SearchHistoryEntry, SearchHistoryRequest,
        UpdateDetailsRequest, UpdateImageRequest, UploadedImage, UserSummary, ValidateCodeRequest,
    },
    state::AppState,
};

pub mod accounts;
pub mod profile;
pub mod relationships;
pub mod reset;
pub mod search;
pub mod upload;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        // Accounts
        .route("/register", post(accounts::register))
        .route("/activate/{token}", get(accounts::activate))
        .route("/login", post(accounts::login))
        .route("/send-verification", post(accounts::send_verification))
        // Password reset
        .route("/find-user", post(reset::find_user))
        .route("/send-reset-code", post(reset::send_reset_code))
        .route("/validate-reset-code", post(reset::validate_reset_code))
        .route("/change-password", post(reset::change_password))
        // Relationships
        .route("/add-friend/{id}", post(relationships::add_friend))
        .route("/cancel-request/{id}", post(relationships::cancel_request))
        .route("/follow/{id}", post(relationships::follow))
        .route("/unfollow/{id}", post(relationships::unfollow))
        .route("/accept-request/{id}", post(relationships::accept_request))
        .route("/delete-request/{id}", post(relationships::delete_request))
        .route("/unfriend/{id}", post(relationships::unfriend))
        // Profile
        .route("/profile/{username}", get(profile::get_profile))
        .route("/profile-picture", put(profile::update_picture))
        .route("/cover", put(profile::update_cover))
        .route("/details", put(profile::update_details))
        .route("/friends-page-info", get(profile::friends_page_info))
        // Search
        .route("/search/{term}", get(search::search_users))
        .route(
            "/search-history",
            post(search::add_search_history)
                .get(search::get_search_history)
                .delete(search::remove_search_history),
        )
        // Uploads
        .route("/upload", post(upload::upload_images))
        .route("/list-images", post(upload::list_images))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::register,
        accounts::activate,
        accounts::login,
        accounts::send_verification,
        reset::find_user,
        reset::send_reset_code,
        reset::validate_reset_code,
        reset::change_password,
        relationships::add_friend,
        relationships::cancel_request,
        relationships::follow,
        relationships::unfollow,
        relationships::accept_request,
        relationships::delete_request,
        relationships::unfriend,
        profile::get_profile,
        profile::update_picture,
        profile::update_cover,
        profile::update_details,
        profile::friends_page_info,
        search::search_users,
        search::add_search_history,
        search::get_search_history,
        search::remove_search_history,
        upload::upload_images,
        upload::list_images
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            MessageResponse,
            EmailRequest,
            FoundUserResponse,
            ValidateCodeRequest,
            ChangePasswordRequest,
            UpdateImageRequest,
            UpdateDetailsRequest,
            ProfileResponse,
            FriendsPageResponse,
            FriendshipStatus,
            UserSummary,
            Post,
            SearchHistoryRequest,
            SearchHistoryEntry,
            ListImagesRequest,
            UploadedImage
        )
    ),
    tags(
        (name = "Accounts", description = "Registration, activation, and login"),
        (name = "Password Reset", description = "Reset code issuance and validation"),
        (name = "Relationships", description = "Friend requests and the follow graph"),
        (name = "Profile", description = "Profile composition and updates"),
        (name = "Search", description = "User search and search history"),
        (name = "Upload", description = "Media upload proxying")
    )
)]
struct ApiDoc;
