// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::mail::Mailer;
use crate::media::MediaClient;
use crate::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<UserStore>>,
    pub tokens: TokenService,
    pub mailer: Arc<Mailer>,
    /// Absent when no media store is configured; upload endpoints then
    /// fail with 500.
    pub media: Option<Arc<MediaClient>>,
    /// Public base URL used when composing activation links.
    pub base_url: String,
}

impl AppState {
    pub fn new(config: &AppConfig, mailer: Mailer, media: Option<MediaClient>) -> Self {
        Self {
            store: Arc::new(RwLock::new(UserStore::new(config.reset_code_ttl_secs))),
            tokens: TokenService::new(&config.token),
            mailer: Arc::new(mailer),
            media: media.map(Arc::new),
            base_url: config.base_url.clone(),
        }
    }
}

impl Default for AppState {
    /// Development wiring: default config, log-only mail, no media store.
    fn default() -> Self {
        Self::new(&AppConfig::default(), Mailer::log_only(), None)
    }
}
