// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

use tracing_subscriber::EnvFilter;

use docvault_server::api::router;
use docvault_server::auth::TokenService;
use docvault_server::config::Config;
use docvault_server::state::AppState;
use docvault_server::storage::{StoragePaths, VaultStorage};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Fail fast: a vault without a real signing secret must not serve.
    let config = Config::from_env().expect("invalid configuration");

    let storage = VaultStorage::open(StoragePaths::new(&config.data_dir))
        .expect("failed to initialize vault storage");
    let tokens = TokenService::new(&config.jwt_secret).expect("invalid signing secret");

    let state = AppState::new(storage, tokens, config.max_upload_bytes);
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");

    tracing::info!(%addr, "docvault server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
    tracing::info!("shutdown signal received");
}
