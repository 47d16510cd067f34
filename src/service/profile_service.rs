//! Profile creation from the caller's identity, lookups and search.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::IdentityResolver;
use crate::domain::{EventLogDetails, NewProfile, Page, PageRequest, Profile, ProfileSummary};
use crate::error::AppError;
use crate::persistence::Store;

/// Profile operations.
#[derive(Debug, Clone)]
pub struct ProfileService {
    store: Arc<dyn Store>,
    identity: Arc<dyn IdentityResolver>,
}

impl ProfileService {
    /// Creates a new `ProfileService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityResolver>) -> Self {
        Self { store, identity }
    }

    /// Creates the caller's profile. The id and email come from the
    /// identity, the names from the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] for an unresolvable
    /// credential, [`AppError::InvalidRequest`] if the identity carries no
    /// email, and [`AppError::Conflict`] if the profile already exists or
    /// the email is taken.
    pub async fn create(
        &self,
        credential: &str,
        first_name: String,
        last_name: String,
    ) -> Result<Profile, AppError> {
        let identity = self.identity.resolve(credential).await?;
        let Some(email) = identity.email else {
            return Err(AppError::InvalidRequest(
                "Identity has no email address".to_string(),
            ));
        };
        if self.store.profile_exists(identity.profile_id).await? {
            return Err(AppError::Conflict("Profile already exists".to_string()));
        }
        let profile = self
            .store
            .insert_profile(NewProfile {
                id: identity.profile_id,
                email,
                first_name: Some(first_name),
                last_name: Some(last_name),
            })
            .await?;
        tracing::info!(profile_id = %profile.id, "profile created");
        Ok(profile)
    }

    /// Deletes the caller's own profile with its memberships and logs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] for an unresolvable
    /// credential and [`AppError::NotFound`] if there is no profile.
    pub async fn delete_own(&self, credential: &str) -> Result<(), AppError> {
        let identity = self.identity.resolve(credential).await?;
        self.store.delete_profile(identity.profile_id).await?;
        tracing::info!(profile_id = %identity.profile_id, "profile deleted");
        Ok(())
    }

    /// Whether a profile exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        self.store.profile_exists(id).await
    }

    /// Profiles whose email contains `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn search(&self, query: &str) -> Result<Vec<ProfileSummary>, AppError> {
        self.store.search_profiles(query).await
    }

    /// Logs authored by a profile, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn logs(
        &self,
        id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        self.store.logs_by_profile(id, page).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::JwtIdentityResolver;
    use crate::persistence::MemoryStore;

    fn service() -> (ProfileService, JwtIdentityResolver) {
        let resolver = JwtIdentityResolver::new("profile-secret", None);
        let service = ProfileService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(resolver.clone()),
        );
        (service, resolver)
    }

    fn bearer(resolver: &JwtIdentityResolver, id: Uuid, email: Option<&str>) -> String {
        let Ok(token) = resolver.issue(id, email, chrono::Duration::hours(1)) else {
            panic!("issue token");
        };
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn profile_takes_id_and_email_from_identity() {
        let (service, resolver) = service();
        let id = Uuid::new_v4();
        let credential = bearer(&resolver, id, Some("ada@umass.edu"));
        let Ok(profile) = service
            .create(&credential, "Ada".to_string(), "Lovelace".to_string())
            .await
        else {
            panic!("create failed");
        };
        assert_eq!(profile.id, id);
        assert_eq!(profile.email, "ada@umass.edu");
        assert!(matches!(service.exists(id).await, Ok(true)));

        let second = service
            .create(&credential, "Ada".to_string(), "L".to_string())
            .await;
        assert_eq!(
            second,
            Err(AppError::Conflict("Profile already exists".to_string()))
        );
    }

    #[tokio::test]
    async fn identity_without_email_is_rejected() {
        let (service, resolver) = service();
        let credential = bearer(&resolver, Uuid::new_v4(), None);
        let result = service
            .create(&credential, "No".to_string(), "Mail".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn own_profile_can_be_deleted_once() {
        let (service, resolver) = service();
        let id = Uuid::new_v4();
        let credential = bearer(&resolver, id, Some("gone@umass.edu"));
        let Ok(_) = service
            .create(&credential, "Soon".to_string(), "Gone".to_string())
            .await
        else {
            panic!("create failed");
        };
        assert_eq!(service.delete_own(&credential).await, Ok(()));
        assert!(matches!(service.exists(id).await, Ok(false)));
        assert_eq!(
            service.delete_own(&credential).await,
            Err(AppError::NotFound("Profile"))
        );
    }
}
