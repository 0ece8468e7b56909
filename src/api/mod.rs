mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::DeckConfig;

/// Proposals carry base64 logos, so allow more than axum's 2 MB default.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DeckConfig>,
}

pub fn create_router(config: DeckConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    let api = Router::new()
        // Export
        .route("/generate", post(handlers::generate))
        // Preview
        .route("/preview", post(handlers::preview))
        .route("/preview/sections/{section}", post(handlers::preview_section))
        // Geometry
        .route("/layout", post(handlers::layout))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
