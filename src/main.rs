use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod store;
mod tts;

use api::routes::{create_router, AppState};
use config::RelayConfig;
use store::DirBlobStore;
use tts::TtsService;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration from environment
    let config = RelayConfig::from_env().expect("Invalid configuration");
    let addr = config.socket_addr().expect("Invalid address");

    tracing::info!("TTS Relay Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Static directory: {}", config.static_dir.display());
    tracing::info!("Token endpoint: {}", config.upstream.token_endpoint_url);

    // Create TTS service
    let tts = TtsService::new(config.upstream.clone()).expect("Failed to create HTTP client");

    // Create app state
    let state = Arc::new(AppState {
        tts,
        store: Arc::new(DirBlobStore::new(config.static_dir.clone())),
        password: config.password.clone(),
    });

    // Create router
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
