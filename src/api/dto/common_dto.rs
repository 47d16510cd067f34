//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{EventLogDetails, PageRequest};
use crate::error::AppError;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum rows to return (1 to 100). Defaults to 10.
    pub limit: Option<i64>,
    /// Rows to skip. Defaults to 0.
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamps the raw values into a [`PageRequest`].
    #[must_use]
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }
}

/// Plain `{success, message}` acknowledgement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Always `true`; failures use the error body instead.
    pub success: bool,
    /// What happened.
    #[schema(example = "Event successfully deleted")]
    pub message: String,
}

impl ActionResponse {
    /// A successful acknowledgement with `message`.
    #[must_use]
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// `{data, total}` page of audit entries.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventLogListResponse {
    /// Entries on this page, newest first.
    pub data: Vec<EventLogDetails>,
    /// Total number of matching entries.
    pub total: i64,
}

/// Result of an existence check.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExistsResponse {
    /// Whether the row exists.
    pub exists: bool,
}

/// Trims `value` and maps blank strings to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Requires a non-blank string of at most `max` characters.
pub(crate) fn required_text(
    field: &str,
    value: &str,
    max: usize,
) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidRequest(format!(
            "{field} must not be empty"
        )));
    }
    if value.chars().count() > max {
        return Err(AppError::InvalidRequest(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Requires an absolute URL when a value is present.
pub(crate) fn optional_url(
    field: &str,
    value: Option<String>,
) -> Result<Option<String>, AppError> {
    match non_blank(value) {
        Some(raw) => match url::Url::parse(&raw) {
            Ok(_) => Ok(Some(raw)),
            Err(_) => Err(AppError::InvalidRequest(format!(
                "{field} must be a valid URL"
            ))),
        },
        None => Ok(None),
    }
}
