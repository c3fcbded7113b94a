// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! # Data Models
//!
//! Domain records stored by [`crate::store::UserStore`] and the typed
//! request/response schemas used by the REST API. Every endpoint takes an
//! explicit schema; there are no free-form request bodies. API types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! The internal [`User`] record carries the password hash and the
//! relationship arrays; it is never serialized directly. Responses are
//! built from projections ([`UserSummary`], [`ProfileResponse`]) that
//! strip sensitive fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Default avatar assigned at registration, replaced via `PUT /profile-picture`.
pub const DEFAULT_AVATAR_URL: &str =
    "https://res.cloudinary.com/mutuals/image/upload/default_avatar.png";

// =============================================================================
// Stored Records
// =============================================================================

/// A registered user record.
///
/// The four relationship arrays are mutated only through the relationship
/// engine, which maintains these invariants:
///
/// - `friends` is symmetric: `A ∈ B.friends ⇔ B ∈ A.friends`
/// - `followers`/`following` are duals: `A ∈ B.followers ⇔ B ∈ A.following`
/// - a user never appears in their own arrays
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique handle derived from the user's name at registration.
    pub username: String,
    pub email: String,
    /// Argon2id hash in PHC string format. Never serialized.
    pub password_hash: String,
    pub verified: bool,
    pub birth_year: i32,
    pub birth_month: u32,
    pub birth_day: u32,
    pub gender: String,
    pub picture: String,
    pub cover: Option<String>,
    /// Free-form profile details (bio, workplace, hometown, ...).
    pub details: serde_json::Value,
    pub friends: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub followers: Vec<Uuid>,
    /// Pending incoming friend requests, by sender id.
    pub requests: Vec<Uuid>,
    /// Profile search history, unique per referenced user.
    pub search: Vec<SearchEntry>,
    pub created_at: DateTime<Utc>,
}

/// One entry in a user's profile search history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    /// The user whose profile was looked up.
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A single-use password reset code bound to one user.
///
/// Issuing a new code supersedes any previous one; a code is consumed by
/// successful validation and expires after the configured TTL.
#[derive(Debug, Clone)]
pub struct ResetCode {
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// A post shown on a user's profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Post {
    pub id: Uuid,
    /// Author id.
    pub user: Uuid,
    pub text: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Shared Projections
// =============================================================================

/// Public user projection used in search results, friend lists, and
/// search history.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub picture: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            picture: user.picture.clone(),
        }
    }
}

/// Relationship status between the viewer and a profile, one boolean per
/// predicate of the relationship state model.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct FriendshipStatus {
    /// Mutual friendship.
    pub friends: bool,
    /// The viewer follows the profile owner.
    pub following: bool,
    /// The viewer has a pending request to the profile owner.
    #[serde(rename = "requestSent")]
    pub request_sent: bool,
    /// The profile owner has a pending request to the viewer.
    #[serde(rename = "requestReceived")]
    pub request_received: bool,
}

// =============================================================================
// Account Schemas
// =============================================================================

/// Request body for `POST /register`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Optional username seed; the handle is derived from first and last
    /// name when absent, and disambiguated on collision either way.
    #[serde(default)]
    pub username: Option<String>,
    pub birth_year: i32,
    pub birth_month: u32,
    pub birth_day: u32,
    pub gender: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for `POST /register` and `POST /login`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub id: Uuid,
    pub username: String,
    pub picture: String,
    pub first_name: String,
    pub last_name: String,
    /// Bearer session token.
    pub token: String,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Plain `{message}` acknowledgement body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Password Reset Schemas
// =============================================================================

/// Request body carrying only an email address (`/find-user`,
/// `/send-reset-code`).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EmailRequest {
    pub email: String,
}

/// Response for `POST /find-user`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FoundUserResponse {
    pub email: String,
    pub picture: String,
}

/// Request body for `POST /validate-reset-code`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ValidateCodeRequest {
    pub email: String,
    pub code: String,
}

/// Request body for `POST /change-password`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Profile Schemas
// =============================================================================

/// Request body for `PUT /profile-picture` and `PUT /cover`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateImageRequest {
    pub url: String,
}

/// Request body for `PUT /details`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateDetailsRequest {
    pub infos: serde_json::Value,
}

/// Composed profile returned by `GET /profile/{username}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub picture: String,
    pub cover: Option<String>,
    pub details: serde_json::Value,
    pub verified: bool,
    pub gender: String,
    pub birth_year: i32,
    pub birth_month: u32,
    pub birth_day: u32,
    pub friends: Vec<UserSummary>,
    /// Relationship status between the authenticated viewer and this profile.
    pub friendship: FriendshipStatus,
    /// The profile owner's posts, most recent first.
    pub posts: Vec<Post>,
}

/// Response for `GET /friends-page-info`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FriendsPageResponse {
    pub friends: Vec<UserSummary>,
    /// Pending incoming requests.
    pub requests: Vec<UserSummary>,
    /// Users the caller has sent a request to.
    #[serde(rename = "sentRequests")]
    pub sent_requests: Vec<UserSummary>,
}

// =============================================================================
// Search Schemas
// =============================================================================

/// Request body for `POST /search-history` and `DELETE /search-history`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SearchHistoryRequest {
    /// The user whose profile was visited from search.
    pub user_id: Uuid,
}

/// One populated search history entry, most recent first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchHistoryEntry {
    pub user: UserSummary,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Upload Schemas
// =============================================================================

/// One uploaded image, resolved to its public URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
}

/// Request body for `POST /list-images`, passed through to the media
/// store's search API.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListImagesRequest {
    /// Folder path expression to search.
    pub path: String,
    /// Sort direction for `created_at` (`asc` or `desc`).
    pub sort: String,
    /// Maximum number of results.
    pub max: u32,
}
