//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::AppError;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the store cannot be reached.
    #[schema(example = "healthy")]
    status: String,
    /// `up` or `down`.
    #[schema(example = "up")]
    database: String,
    timestamp: String,
    version: String,
}

impl HealthResponse {
    fn from_ping(ping: &Result<(), AppError>) -> (StatusCode, Self) {
        let (code, status, database) = match ping {
            Ok(()) => (StatusCode::OK, "healthy", "up"),
            Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down"),
        };
        (
            code,
            Self {
                status: status.to_string(),
                database: database.to_string(),
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        )
    }
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Round-trips to the store and reports service health, store reachability, version, and current timestamp.",
    responses(
        (status = 200, description = "Service and store are reachable", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ping = state.store.ping().await;
    if let Err(err) = &ping {
        tracing::warn!(error = %err, "health check: store unreachable");
    }
    let (code, body) = HealthResponse::from_ping(&ping);
    (code, Json(body))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_ping_degrades_to_503() {
        let (code, body) =
            HealthResponse::from_ping(&Err(AppError::Persistence("refused".to_string())));
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.database, "down");

        let (code, body) = HealthResponse::from_ping(&Ok(()));
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.database, "up");
    }
}
