//! Profile DTOs.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::common_dto::required_text;
use crate::error::AppError;

/// Request body for `POST /profiles`. The email and id come from the
/// bearer credential.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProfileRequest {
    /// Given name.
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    /// Family name.
    #[schema(example = "Lovelace")]
    pub last_name: Option<String>,
}

impl CreateProfileRequest {
    /// Returns the validated `(first_name, last_name)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] if either name is missing or
    /// blank.
    pub fn into_names(self) -> Result<(String, String), AppError> {
        let first = self.first_name.unwrap_or_default();
        let last = self.last_name.unwrap_or_default();
        let first = required_text("first_name", &first, 100)?;
        let last = required_text("last_name", &last, 100)?;
        Ok((first, last))
    }
}

/// Query parameters for `GET /profiles/search`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive email substring. Blank matches nothing.
    pub query: Option<String>,
}
