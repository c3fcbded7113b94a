// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Field-level validation helpers and username slug derivation.
//!
//! Validation runs on the typed request schemas before any store access,
//! so the store and relationship engine only ever see well-formed input.

use unicode_normalization::UnicodeNormalization;

use crate::error::ApiError;

/// Check the basic shape of an email address: exactly one `@` with a
/// non-empty local part and a dotted, non-empty domain.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain.contains('.') && !email.chars().any(char::is_whitespace)
}

/// Enforce an inclusive character-count range on a field.
pub fn validate_length(
    value: &str,
    field: &str,
    min: usize,
    max: usize,
) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::bad_request(format!(
            "{field} must be between {min} and {max} characters."
        )));
    }
    Ok(())
}

/// Derive a username slug from a display-name seed: NFKD-normalized,
/// lowercased, ASCII alphanumerics only. Uniqueness is the store's job;
/// this only normalizes.
pub fn username_slug(seed: &str) -> String {
    let slug: String = seed
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if slug.is_empty() {
        "user".to_string()
    } else {
        slug
    }
}
