//! Campus buildings that host events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A row of the `buildings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Building {
    /// Building identifier.
    pub id: Uuid,
    /// Display name, e.g. `"Fine Arts Center"`.
    #[schema(example = "Fine Arts Center")]
    pub name: String,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Latitude in degrees, within `[-90, 90]`.
    #[schema(example = 42.388236)]
    pub latitude: f64,
    /// Longitude in degrees, within `[-180, 180]`.
    #[schema(example = -72.525936)]
    pub longitude: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Public display fields of a building, nested into event projections
/// in place of a raw `building_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BuildingSummary {
    /// Building identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl From<&Building> for BuildingSummary {
    fn from(building: &Building) -> Self {
        Self {
            id: building.id,
            name: building.name.clone(),
            thumbnail: building.thumbnail.clone(),
            address: building.address.clone(),
            latitude: building.latitude,
            longitude: building.longitude,
        }
    }
}

/// A validated building ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBuilding {
    /// Display name, non-empty.
    pub name: String,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Returns `true` when `latitude` is a finite value within `[-90, 90]`.
#[must_use]
pub fn latitude_in_range(latitude: f64) -> bool {
    latitude.is_finite() && (-90.0..=90.0).contains(&latitude)
}

/// Returns `true` when `longitude` is a finite value within `[-180, 180]`.
#[must_use]
pub fn longitude_in_range(longitude: f64) -> bool {
    longitude.is_finite() && (-180.0..=180.0).contains(&longitude)
}
