//! Admin-only membership management.

use std::sync::Arc;

use uuid::Uuid;

use super::authority::MembershipAuthority;
use crate::domain::Membership;
use crate::error::AppError;
use crate::persistence::Store;

const ADMIN_REQUIRED: &str = "Admin privileges required";

/// Adds and removes organization members on behalf of an admin.
#[derive(Debug, Clone)]
pub struct MembershipService {
    store: Arc<dyn Store>,
    authority: Arc<MembershipAuthority<dyn Store>>,
}

impl MembershipService {
    /// Creates a new `MembershipService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, authority: Arc<MembershipAuthority<dyn Store>>) -> Self {
        Self { store, authority }
    }

    /// Adds a member, or changes the role of an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] unless the credential belongs to an
    /// admin of the organization, and [`AppError::Conflict`] if the
    /// profile or organization does not exist.
    pub async fn add(&self, credential: &str, membership: Membership) -> Result<Membership, AppError> {
        if !self
            .authority
            .is_admin(credential, membership.organization_id)
            .await
        {
            return Err(AppError::Forbidden(ADMIN_REQUIRED.to_string()));
        }
        let membership = self.store.upsert_membership(membership).await?;
        tracing::info!(
            profile_id = %membership.profile_id,
            organization_id = %membership.organization_id,
            role = %membership.role,
            "member added"
        );
        Ok(membership)
    }

    /// Removes a member.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] unless the credential belongs to an
    /// admin of the organization, and [`AppError::NotFound`] if the
    /// profile was not a member.
    pub async fn remove(
        &self,
        credential: &str,
        organization_id: Uuid,
        profile_id: Uuid,
    ) -> Result<(), AppError> {
        if !self.authority.is_admin(credential, organization_id).await {
            return Err(AppError::Forbidden(ADMIN_REQUIRED.to_string()));
        }
        self.store
            .delete_membership(profile_id, organization_id)
            .await?;
        tracing::info!(%profile_id, %organization_id, "member removed");
        Ok(())
    }
}
