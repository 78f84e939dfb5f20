//! survey-server library
//!
//! Collects per-participant survey answers and photo uploads. Each
//! participant's state is one JSON document under the data root; uploaded
//! files live in a per-participant directory under the upload root.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod upload;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use store::ParticipantStore;

/// Body limit for JSON endpoints (2 MiB)
pub const JSON_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ParticipantStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create application state with a store rooted at the configured directories
    pub fn new(config: ServerConfig) -> Self {
        let store = ParticipantStore::new(&config.data_dir, &config.upload_dir);
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Build application router
///
/// API routes take precedence; `/uploads/*` serves the upload root and every
/// other path falls through to the client bundle.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);
    let uploads = ServeDir::new(&state.config.upload_dir);
    let client = ServeDir::new(&state.config.client_dir);

    Router::new()
        .route("/api/participants", post(api::create_participant))
        .route(
            "/api/answers/:participant_id",
            get(api::fetch_answers).post(api::save_answers),
        )
        .route(
            "/api/upload/:participant_id",
            post(api::upload_photos).layer(upload_limit),
        )
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .nest_service(upload::UPLOADS_PREFIX, uploads)
        .fallback_service(client)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
