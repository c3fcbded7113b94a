// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use mutuals_server::{api, config::AppConfig, mail::Mailer, media::MediaClient, state::AppState};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env();

    let mailer = match Mailer::new(config.mail.as_ref()) {
        Ok(mailer) => mailer,
        Err(e) => {
            eprintln!("Failed to initialize mailer: {e}");
            std::process::exit(1);
        }
    };
    if config.mail.is_none() {
        info!("MAIL_RELAY_URL not set, outgoing mail will be logged only");
    }

    let media = match config.media.as_ref().map(MediaClient::new).transpose() {
        Ok(media) => media,
        Err(e) => {
            eprintln!("Failed to initialize media client: {e}");
            std::process::exit(1);
        }
    };
    if media.is_none() {
        info!("MEDIA_STORE_URL not set, upload endpoints are disabled");
    }

    let state = AppState::new(&config, mailer, media);
    let app = api::router(state);

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Invalid bind address {}:{}: {e}", config.host, config.port);
            std::process::exit(1);
        }
    };

    info!("Mutuals server listening on http://{addr} (docs at /docs)");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
