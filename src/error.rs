//! Application error type with HTTP status code mapping.
//!
//! [`AppError`] is the single error type shared by the persistence,
//! service and API layers. Every variant maps to an HTTP status code and
//! is flattened into a `{"error": "<message>"}` body at the boundary.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// { "error": "Event not found" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant           | HTTP Status               |
/// |-------------------|---------------------------|
/// | `InvalidRequest`  | 400 Bad Request           |
/// | `Unauthenticated` | 401 Unauthorized          |
/// | `Forbidden`       | 403 Forbidden             |
/// | `NotFound`        | 404 Not Found             |
/// | `Conflict`        | 409 Conflict              |
/// | `Persistence`     | 500 Internal Server Error |
/// | `Internal`        | 500 Internal Server Error |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// No row matched the requested identifier. Holds the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed or invalid request input.
    #[error("{0}")]
    InvalidRequest(String),

    /// The bearer credential could not be resolved to an identity.
    #[error("{0}")]
    Unauthenticated(String),

    /// The caller is authenticated but lacks the required role.
    #[error("{0}")]
    Forbidden(String),

    /// A uniqueness, check or foreign-key constraint was violated.
    #[error("{0}")]
    Conflict(String),

    /// Store failure other than a constraint violation.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db)
                if db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation() =>
            {
                Self::Conflict(db.message().to_string())
            }
            _ => Self::Persistence(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        assert_eq!(AppError::NotFound("Event").to_string(), "Event not found");
        assert_eq!(
            AppError::NotFound("Building").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn authorization_errors_keep_their_message() {
        let err = AppError::Forbidden("Admin privileges required".to_string());
        assert_eq!(err.to_string(), "Admin privileges required");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = AppError::Unauthenticated("Missing bearer token".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn server_errors_map_to_500() {
        assert_eq!(
            AppError::Persistence("pool timed out".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn row_not_found_is_a_persistence_error() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        let AppError::Persistence(_) = err else {
            panic!("expected persistence error, got {err:?}");
        };
    }

    #[test]
    fn error_body_has_single_error_field() {
        let body = ErrorResponse {
            error: "Event not found".to_string(),
        };
        let json = serde_json::to_value(&body).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert_eq!(json, serde_json::json!({ "error": "Event not found" }));
    }
}
