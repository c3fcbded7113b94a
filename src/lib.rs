// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Mutuals - Social Network Backend
//!
//! REST backend for a small social network: account registration with
//! email verification, password reset, a friend/follow graph, profile
//! composition, user search, and media upload proxying.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token authentication and password hashing
//! - `relationship` - Friend/follow graph transitions
//! - `store` - In-memory user store
//! - `mail` / `media` - Outbound HTTP integrations

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod media;
pub mod models;
pub mod relationship;
pub mod state;
pub mod store;
pub mod validation;
