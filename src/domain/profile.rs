//! Profiles: the application-level identity of an authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A row of the `profiles` table.
///
/// The id is the identity provider's subject, so a profile can only be
/// created by the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Profile {
    /// Profile identifier (identity provider subject).
    pub id: Uuid,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Email, unique across profiles.
    pub email: String,
    /// Whether the profile has been verified.
    pub verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Display fields of a profile, used in search results, member lists and
/// event log projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ProfileSummary {
    /// Profile identifier.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
        }
    }
}

/// A profile ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    /// Identity provider subject.
    pub id: Uuid,
    /// Email taken from the resolved identity.
    pub email: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
}
