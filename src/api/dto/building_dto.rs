//! Building DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::{non_blank, required_text};
use crate::domain::building::{latitude_in_range, longitude_in_range};
use crate::domain::{Building, NewBuilding};
use crate::error::AppError;

/// Request body for `POST /buildings`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBuildingRequest {
    /// Display name.
    #[schema(example = "Integrative Learning Center")]
    pub name: String,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Street address.
    #[schema(example = "650 N Pleasant St, Amherst, MA")]
    pub address: Option<String>,
    /// Latitude in degrees, -90 to 90.
    #[schema(example = 42.3909)]
    pub latitude: f64,
    /// Longitude in degrees, -180 to 180.
    #[schema(example = -72.5257)]
    pub longitude: f64,
}

impl CreateBuildingRequest {
    /// Validates the request into a [`NewBuilding`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] for an empty name or
    /// out-of-range coordinates.
    pub fn into_new(self) -> Result<NewBuilding, AppError> {
        let name = required_text("name", &self.name, 255)?;
        if !latitude_in_range(self.latitude) {
            return Err(AppError::InvalidRequest(
                "latitude must be between -90 and 90".to_string(),
            ));
        }
        if !longitude_in_range(self.longitude) {
            return Err(AppError::InvalidRequest(
                "longitude must be between -180 and 180".to_string(),
            ));
        }
        Ok(NewBuilding {
            name,
            thumbnail: non_blank(self.thumbnail),
            address: non_blank(self.address),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// `{data, total}` page of buildings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BuildingListResponse {
    /// Buildings on this page, newest first.
    pub data: Vec<Building>,
    /// Total number of buildings.
    pub total: i64,
}
