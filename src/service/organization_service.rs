//! Organization creation and organization-scoped reads.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::IdentityResolver;
use crate::domain::{
    EventLogDetails, NewOrganization, Organization, OrganizationDetails, OrganizationSummary,
    Page, PageRequest,
};
use crate::error::AppError;
use crate::persistence::Store;

/// Organization operations.
#[derive(Debug, Clone)]
pub struct OrganizationService {
    store: Arc<dyn Store>,
    identity: Arc<dyn IdentityResolver>,
}

impl OrganizationService {
    /// Creates a new `OrganizationService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityResolver>) -> Self {
        Self { store, identity }
    }

    /// Creates an organization and makes the caller its admin.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] for an unresolvable
    /// credential, [`AppError::NotFound`] if the caller has no profile yet,
    /// or [`AppError::Conflict`] if the email is taken.
    pub async fn create(
        &self,
        credential: &str,
        new: NewOrganization,
    ) -> Result<Organization, AppError> {
        let identity = self.identity.resolve(credential).await?;
        if !self.store.profile_exists(identity.profile_id).await? {
            return Err(AppError::NotFound("Profile"));
        }
        let organization = self
            .store
            .insert_organization_with_admin(new, identity.profile_id)
            .await?;
        tracing::info!(
            organization_id = %organization.id,
            admin = %identity.profile_id,
            "organization created"
        );
        Ok(organization)
    }

    /// Organizations the profile belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn for_profile(&self, profile_id: Uuid) -> Result<Vec<OrganizationSummary>, AppError> {
        self.store.organizations_for_profile(profile_id).await
    }

    /// An organization with one page of its members.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the organization does not exist.
    pub async fn details(
        &self,
        id: Uuid,
        page: PageRequest,
    ) -> Result<OrganizationDetails, AppError> {
        let organization = self
            .store
            .find_organization(id)
            .await?
            .ok_or(AppError::NotFound("Organization"))?;
        let members = self.store.organization_members(id, page).await?;
        Ok(OrganizationDetails {
            organization: organization.into(),
            members,
        })
    }

    /// Logs of every event the organization hosts, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn logs(
        &self,
        id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        self.store.logs_by_organization(id, page).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::JwtIdentityResolver;
    use crate::domain::{NewProfile, Role};
    use crate::persistence::{MemoryStore, MembershipRepository, ProfileRepository};

    fn new_org(email: &str) -> NewOrganization {
        NewOrganization {
            organization_name: "Debate Society".to_string(),
            email: email.to_string(),
            description: None,
            image_url: None,
            address: None,
        }
    }

    fn setup() -> (OrganizationService, Arc<MemoryStore>, JwtIdentityResolver) {
        let store = Arc::new(MemoryStore::new());
        let resolver = JwtIdentityResolver::new("organization-secret", None);
        let service = OrganizationService::new(
            Arc::<MemoryStore>::clone(&store),
            Arc::new(resolver.clone()),
        );
        (service, store, resolver)
    }

    fn bearer(resolver: &JwtIdentityResolver, id: Uuid) -> String {
        let Ok(token) = resolver.issue(id, None, chrono::Duration::hours(1)) else {
            panic!("issue token");
        };
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn creator_becomes_admin_and_appears_in_details() {
        let (service, store, resolver) = setup();
        let id = Uuid::new_v4();
        let Ok(_) = store
            .insert_profile(NewProfile {
                id,
                email: "founder@umass.edu".to_string(),
                first_name: Some("Fay".to_string()),
                last_name: None,
            })
            .await
        else {
            panic!("insert profile");
        };

        let Ok(org) = service
            .create(&bearer(&resolver, id), new_org("debate@umass.edu"))
            .await
        else {
            panic!("create organization");
        };
        let membership = store.find_membership(id, org.id).await;
        assert!(matches!(membership, Ok(Some(m)) if m.role == Role::Admin));

        let Ok(details) = service.details(org.id, PageRequest::default()).await else {
            panic!("details");
        };
        assert_eq!(details.organization.id, org.id);
        assert_eq!(details.members.total, 1);

        let Ok(orgs) = service.for_profile(id).await else {
            panic!("for_profile");
        };
        assert_eq!(orgs.len(), 1);
    }

    #[tokio::test]
    async fn creator_without_profile_is_rejected() {
        let (service, _, resolver) = setup();
        let result = service
            .create(&bearer(&resolver, Uuid::new_v4()), new_org("x@umass.edu"))
            .await;
        assert_eq!(result, Err(AppError::NotFound("Profile")));
    }

    #[tokio::test]
    async fn unknown_organization_details_are_not_found() {
        let (service, _, _) = setup();
        let result = service.details(Uuid::new_v4(), PageRequest::default()).await;
        assert_eq!(result, Err(AppError::NotFound("Organization")));
    }
}
