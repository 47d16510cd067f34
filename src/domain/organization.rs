//! Organizations: tenants that host events and have members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::membership::MemberDetails;
use super::page::Page;

/// A row of the `organizations` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Organization {
    /// Organization identifier.
    pub id: Uuid,
    /// Display name.
    #[schema(example = "Acme Corporation")]
    pub organization_name: String,
    /// Contact email, unique across organizations.
    pub email: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Logo or image URL.
    pub image_url: Option<String>,
    /// Physical address.
    pub address: Option<String>,
    /// Whether the organization has been verified.
    pub verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Public projection of an organization returned by listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrganizationSummary {
    /// Organization identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Logo or image URL.
    pub image_url: Option<String>,
    /// Physical address.
    pub address: Option<String>,
    /// Whether the organization has been verified.
    pub verified: bool,
}

impl From<Organization> for OrganizationSummary {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.organization_name,
            email: org.email,
            description: org.description,
            image_url: org.image_url,
            address: org.address,
            verified: org.verified,
        }
    }
}

/// A validated organization ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
    /// Display name, 2 to 100 characters.
    pub organization_name: String,
    /// Contact email.
    pub email: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Logo or image URL.
    pub image_url: Option<String>,
    /// Physical address.
    pub address: Option<String>,
}

/// An organization together with one page of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrganizationDetails {
    /// Organization display fields.
    pub organization: OrganizationSummary,
    /// Members with their profiles.
    pub members: Page<MemberDetails>,
}
