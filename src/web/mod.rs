//! HTTP layer - server-rendered planner pages and the JSON API.
//!
//! Handlers stay thin: they resolve the owner, call into [`crate::core`] and
//! map crate errors to status codes.

/// JSON API under `/api`
pub mod api;
/// Owner resolution from the trusted identity header
pub mod identity;
/// Planner pages
pub mod pages;

use crate::{
    config::AppConfig,
    core::time::Clock,
    errors::{Error, Result},
};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::{DatabaseConnection, SqlErr};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Local time source
    pub clock: Clock,
    /// Loaded configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundles the pieces every handler needs.
    #[must_use]
    pub const fn new(db: DatabaseConnection, clock: Clock, config: Arc<AppConfig>) -> Self {
        Self { db, clock, config }
    }
}

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/planner/", get(pages::dashboard).post(pages::dashboard_submit))
        .route("/planner/day/", get(pages::day_detail).post(pages::day_detail_submit))
        .nest("/api", api::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(state: AppState) -> Result<()> {
    let bind = state.config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Listening on {bind}");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
}

impl Error {
    /// HTTP status this error is reported with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } | Self::InvalidAmount { .. } | Self::InvalidTime { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Protected { .. } => StatusCode::CONFLICT,
            Self::Database(err) => match err.sql_err() {
                Some(
                    SqlErr::UniqueConstraintViolation(_) | SqlErr::ForeignKeyConstraintViolation(_),
                ) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Config { .. } | Self::Io(_) | Self::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Request failed: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
