// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Outgoing mail via an HTTP mail relay.
//!
//! SMTP internals are the relay's problem; this module posts JSON
//! messages to its API. When no relay is configured the mailer runs in
//! log-only mode: every message is written to the log at info level and
//! reported as sent. Development and tests run in that mode.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::config::MailRelayConfig;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail relay request failed: {0}")]
    Request(String),

    #[error("Mail relay rejected the message: {0}")]
    Rejected(String),
}

struct RelayTransport {
    relay_url: String,
    api_key: String,
    from: String,
    http: Client,
}

/// Mail sender with two modes: relay when configured, log-only otherwise.
pub struct Mailer {
    relay: Option<RelayTransport>,
}

impl Mailer {
    pub fn new(config: Option<&MailRelayConfig>) -> Result<Self, MailError> {
        let relay = match config {
            Some(config) => {
                let http = Client::builder()
                    .timeout(HTTP_TIMEOUT)
                    .build()
                    .map_err(|e| MailError::Request(format!("failed to build HTTP client: {e}")))?;
                Some(RelayTransport {
                    relay_url: config.relay_url.clone(),
                    api_key: config.api_key.clone(),
                    from: config.from.clone(),
                    http,
                })
            }
            None => None,
        };
        Ok(Self { relay })
    }

    /// Log-only mailer for development and tests.
    pub fn log_only() -> Self {
        Self { relay: None }
    }

    /// Send the account activation link.
    pub async fn send_verification_link(
        &self,
        to: &str,
        first_name: &str,
        url: &str,
    ) -> Result<(), MailError> {
        let html = format!(
            "<p>Hello {first_name},</p>\
             <p>Please click the link below to verify your email:</p>\
             <a href=\"{url}\">Verify Email</a>\
             <p>This link expires in 30 minutes. If you did not request this, please ignore this email.</p>"
        );
        self.send(to, "Verify Your Email", &html).await
    }

    /// Send a password reset code.
    pub async fn send_reset_code(
        &self,
        to: &str,
        first_name: &str,
        code: &str,
    ) -> Result<(), MailError> {
        let html = format!(
            "<p>Hello {first_name},</p>\
             <p>Your password reset code is: <strong>{code}</strong></p>\
             <p>This code expires soon. If you did not request this, please ignore this email.</p>"
        );
        self.send(to, "Password Reset Code", &html).await
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let Some(relay) = &self.relay else {
            info!(to, subject, "Mail relay not configured, logging message instead");
            return Ok(());
        };

        let response = relay
            .http
            .post(format!("{}/messages", relay.relay_url))
            .bearer_auth(&relay.api_key)
            .json(&json!({
                "from": relay.from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| MailError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected(format!("{status}: {body}")));
        }

        info!(to, subject, "Mail delivered via relay");
        Ok(())
    }
}
