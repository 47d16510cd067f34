//! Membership management DTOs.

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Membership, Role};
use crate::error::AppError;

/// Request body for `POST /profiles-organizations/add-member`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    /// Profile to add.
    pub profile_id: Uuid,
    /// Organization to add it to.
    pub organization_id: Uuid,
    /// `member` (default) or `admin`.
    #[schema(example = "member")]
    pub role: Option<String>,
}

impl AddMemberRequest {
    /// Validates the request into a [`Membership`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] for an unknown role.
    pub fn into_membership(self) -> Result<Membership, AppError> {
        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(raw) => raw.parse()?,
        };
        Ok(Membership {
            profile_id: self.profile_id,
            organization_id: self.organization_id,
            role,
        })
    }
}
