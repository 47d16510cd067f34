//! Organization DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::{non_blank, optional_url};
use crate::domain::NewOrganization;
use crate::error::AppError;

/// Request body for `POST /organizations`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrganizationRequest {
    /// Display name, 2 to 100 characters.
    #[schema(example = "UMass Hackers", min_length = 2, max_length = 100)]
    pub organization_name: String,
    /// Contact email.
    #[schema(example = "board@umasshackers.org")]
    pub email: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Logo or image URL.
    #[schema(example = "https://umasshackers.org/logo.png")]
    pub image_url: Option<String>,
    /// Physical address.
    pub address: Option<String>,
}

impl CreateOrganizationRequest {
    /// Validates the request into a [`NewOrganization`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] for a name outside 2..=100
    /// characters, an invalid email or an invalid image URL.
    pub fn into_new(self) -> Result<NewOrganization, AppError> {
        let organization_name = self.organization_name.trim().to_string();
        let len = organization_name.chars().count();
        if !(2..=100).contains(&len) {
            return Err(AppError::InvalidRequest(
                "organization_name must be between 2 and 100 characters".to_string(),
            ));
        }
        let email = self.email.trim().to_string();
        if !email_address::EmailAddress::is_valid(&email) {
            return Err(AppError::InvalidRequest(
                "email must be a valid email address".to_string(),
            ));
        }
        Ok(NewOrganization {
            organization_name,
            email,
            description: non_blank(self.description),
            image_url: optional_url("image_url", self.image_url)?,
            address: non_blank(self.address),
        })
    }
}

/// Response of a successful organization creation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationCreatedResponse {
    /// Always `true`.
    pub success: bool,
    /// Acknowledgement message.
    pub message: String,
    /// Identifier of the new organization.
    pub organization_id: Uuid,
}
