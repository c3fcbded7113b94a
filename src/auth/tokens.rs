// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Token service: HS256 signing and verification of bearer tokens.
//!
//! Two token purposes share one signing key and claims shape, differing
//! only in lifetime: session tokens (issued at register/login) and email
//! verification tokens (embedded in activation links). The secret and
//! both TTLs are injected through [`TokenConfig`]; nothing here reads the
//! environment.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::claims::Claims;
use super::error::AuthError;
use crate::config::TokenConfig;
use crate::error::ApiError;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    session_ttl_secs: i64,
    verification_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            session_ttl_secs: config.session_ttl_secs,
            verification_ttl_secs: config.verification_ttl_secs,
        }
    }

    /// Sign a session token presented on protected routes.
    pub fn sign_session(&self, user_id: Uuid) -> Result<String, ApiError> {
        self.sign(user_id, self.session_ttl_secs)
    }

    /// Sign a short-lived token for email activation links.
    pub fn sign_verification(&self, user_id: Uuid) -> Result<String, ApiError> {
        self.sign(user_id, self.verification_ttl_secs)
    }

    pub(crate) fn sign(&self, user_id: Uuid, ttl_secs: i64) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {e}")))
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;

        let token_data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new(&TokenConfig {
            secret: "test-secret".to_string(),
            session_ttl_secs: 3600,
            verification_ttl_secs: 60,
        })
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let service = test_service();
        let user_id = Uuid::new_v4();

        let token = service.sign_session(user_id).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verification_tokens_are_shorter_lived_than_session_tokens() {
        let service = test_service();
        let user_id = Uuid::new_v4();

        let session = service.verify(&service.sign_session(user_id).unwrap()).unwrap();
        let verification = service
            .verify(&service.sign_verification(user_id).unwrap())
            .unwrap();
        assert!(verification.exp < session.exp);
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = test_service();
        // Expiry well past the clock-skew leeway.
        let token = service.sign(Uuid::new_v4(), -300).unwrap();
        assert_eq!(service.verify(&token).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let service = test_service();
        let other = TokenService::new(&TokenConfig {
            secret: "different-secret".to_string(),
            session_ttl_secs: 3600,
            verification_ttl_secs: 60,
        });

        let token = other.sign_session(Uuid::new_v4()).unwrap();
        assert_eq!(
            service.verify(&token).unwrap_err(),
            AuthError::InvalidSignature
        );
    }

    #[test]
    fn garbage_token_is_malformed() {
        let service = test_service();
        assert_eq!(
            service.verify("not-a-jwt").unwrap_err(),
            AuthError::MalformedToken
        );
    }
}
