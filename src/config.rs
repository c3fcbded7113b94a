// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and passed
//! explicitly to the services that need it (token signing, mail delivery,
//! media uploads). Nothing reads ambient process state after startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `BASE_URL` | Public URL used in activation links | `http://localhost:8080` |
//! | `TOKEN_SECRET` | HS256 signing secret for bearer tokens | dev-only default |
//! | `SESSION_TTL_SECS` | Session token lifetime | `604800` (7 days) |
//! | `VERIFICATION_TTL_SECS` | Email verification token lifetime | `1800` (30 min) |
//! | `RESET_CODE_TTL_SECS` | Password reset code lifetime | `900` (15 min) |
//! | `MAIL_RELAY_URL` | HTTP mail relay endpoint | unset = log-only mail |
//! | `MAIL_RELAY_API_KEY` | Mail relay API key | unset |
//! | `MAIL_FROM` | Sender address for outgoing mail | `no-reply@mutuals.local` |
//! | `MEDIA_STORE_URL` | Media store API endpoint | unset = uploads disabled |
//! | `MEDIA_STORE_API_KEY` | Media store API key | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_MAIL_FROM: &str = "no-reply@mutuals.local";

// The default secret exists so the server can run in development without
// any environment. Production deployments must set TOKEN_SECRET.
const DEFAULT_TOKEN_SECRET: &str = "dev-secret-change-me";

const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_VERIFICATION_TTL_SECS: i64 = 30 * 60;
const DEFAULT_RESET_CODE_TTL_SECS: i64 = 15 * 60;

/// Bearer token signing configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HS256 signing secret.
    pub secret: String,
    /// Lifetime of session tokens issued at register/login.
    pub session_ttl_secs: i64,
    /// Lifetime of email verification tokens.
    pub verification_ttl_secs: i64,
}

/// HTTP mail relay configuration. Absent in development: mail is logged
/// instead of delivered.
#[derive(Debug, Clone)]
pub struct MailRelayConfig {
    pub relay_url: String,
    pub api_key: String,
    pub from: String,
}

/// External media store configuration. Absent: upload endpoints fail.
#[derive(Debug, Clone)]
pub struct MediaStoreConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL, used when composing activation links in mail.
    pub base_url: String,
    pub token: TokenConfig,
    pub reset_code_ttl_secs: i64,
    pub mail: Option<MailRelayConfig>,
    pub media: Option<MediaStoreConfig>,
}

impl AppConfig {
    /// Load configuration from the environment, falling back to
    /// development defaults for anything unset.
    pub fn from_env() -> Self {
        let mail = env_opt("MAIL_RELAY_URL").map(|relay_url| MailRelayConfig {
            relay_url,
            api_key: env_or_default("MAIL_RELAY_API_KEY", ""),
            from: env_or_default("MAIL_FROM", DEFAULT_MAIL_FROM),
        });

        let media = env_opt("MEDIA_STORE_URL").map(|base_url| MediaStoreConfig {
            base_url,
            api_key: env_or_default("MEDIA_STORE_API_KEY", ""),
        });

        Self {
            host: env_or_default("HOST", DEFAULT_HOST),
            port: env_parsed("PORT", DEFAULT_PORT),
            base_url: env_or_default("BASE_URL", DEFAULT_BASE_URL),
            token: TokenConfig {
                secret: env_or_default("TOKEN_SECRET", DEFAULT_TOKEN_SECRET),
                session_ttl_secs: env_parsed("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS),
                verification_ttl_secs: env_parsed(
                    "VERIFICATION_TTL_SECS",
                    DEFAULT_VERIFICATION_TTL_SECS,
                ),
            },
            reset_code_ttl_secs: env_parsed("RESET_CODE_TTL_SECS", DEFAULT_RESET_CODE_TTL_SECS),
            mail,
            media,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: TokenConfig {
                secret: DEFAULT_TOKEN_SECRET.to_string(),
                session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
                verification_ttl_secs: DEFAULT_VERIFICATION_TTL_SECS,
            },
            reset_code_ttl_secs: DEFAULT_RESET_CODE_TTL_SECS,
            mail: None,
            media: None,
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_opt(name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_dev_values() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token.session_ttl_secs, 604_800);
        assert_eq!(config.token.verification_ttl_secs, 1_800);
        assert_eq!(config.reset_code_ttl_secs, 900);
        assert!(config.mail.is_none());
        assert!(config.media.is_none());
    }
}
