// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! # Authentication Module
//!
//! Bearer token authentication for the API.
//!
//! ## Auth Flow
//!
//! 1. `/register` and `/login` issue an HS256-signed session token
//!    carrying the user id and an expiry.
//! 2. Clients send `Authorization: Bearer <token>` on protected routes.
//! 3. The [`Auth`] extractor verifies signature and expiry and hands the
//!    decoded identity to the handler.
//!
//! Verification is stateless: the gate trusts the token's embedded user
//! id and performs no store lookup. Handlers that need the record still
//! 404 when it is gone.
//!
//! The same [`TokenService`] signs short-lived email verification tokens
//! consumed by `GET /activate/{token}`.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod tokens;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::Auth;
pub use tokens::TokenService;
