use axum::{
    http::{header, Method},
    routing::{any, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::store::BlobStore;
use crate::tts::TtsService;

pub struct AppState {
    pub tts: TtsService,
    pub store: Arc<dyn BlobStore>,
    pub password: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let tts = get(handlers::tts_query).post(handlers::tts_json);
    let voices = get(handlers::list_voices);

    // `/api/tts` and `/api/voices` also answer for any path below them
    Router::new()
        .route("/api/check-password", any(handlers::check_password))
        .route("/api/verify-password", post(handlers::verify_password))
        .route("/api/tts", tts.clone())
        .route("/api/tts/", tts.clone())
        .route("/api/tts/*rest", tts)
        .route("/api/voices", voices.clone())
        .route("/api/voices/", voices.clone())
        .route("/api/voices/*rest", voices)
        .route("/api/upstream-voices", get(handlers::upstream_voices))
        .route("/api/health", get(handlers::health))
        .fallback(handlers::static_asset)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
