//! Health check endpoint
//!
//! Reports build identification and whether both storage roots are still
//! present. A missing root answers 503 so a supervisor can restart the
//! server, which recreates the roots at startup.

use std::path::Path;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub built: &'static str,
    pub profile: &'static str,
}

const BUILD: BuildInfo = BuildInfo {
    version: env!("CARGO_PKG_VERSION"),
    git_hash: env!("GIT_HASH"),
    built: env!("BUILD_TIMESTAMP"),
    profile: env!("BUILD_PROFILE"),
};

/// Presence of the storage roots
#[derive(Debug, Serialize)]
pub struct StorageHealth {
    pub data_dir: bool,
    pub upload_dir: bool,
}

impl StorageHealth {
    pub fn is_ok(&self) -> bool {
        self.data_dir && self.upload_dir
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: &'static str,
    pub module: &'static str,
    pub build: BuildInfo,
    pub storage: StorageHealth,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = StorageHealth {
        data_dir: is_dir(state.store.data_dir()).await,
        upload_dir: is_dir(state.store.upload_dir()).await,
    };

    let (code, status) = if storage.is_ok() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            module: "survey-server",
            build: BUILD,
            storage,
        }),
    )
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
