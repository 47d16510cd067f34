//! Membership authority: fail-closed role checks.
//!
//! Every check answers a plain `bool`. A credential that cannot be
//! resolved, a missing membership row and a store failure all answer
//! `false`; callers never learn which one it was.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::IdentityResolver;
use crate::domain::Role;
use crate::persistence::MembershipRepository;

/// Answers "is this caller a member / admin of that organization?".
#[derive(Debug)]
pub struct MembershipAuthority<M: ?Sized> {
    identity: Arc<dyn IdentityResolver>,
    memberships: Arc<M>,
}

impl<M: MembershipRepository + ?Sized> MembershipAuthority<M> {
    /// Creates an authority over the given resolver and membership store.
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityResolver>, memberships: Arc<M>) -> Self {
        Self {
            identity,
            memberships,
        }
    }

    /// `true` iff the credential resolves and its profile is an admin of
    /// `organization_id`.
    pub async fn is_admin(&self, credential: &str, organization_id: Uuid) -> bool {
        match self.identity.resolve(credential).await {
            Ok(identity) => self.is_admin_profile(identity.profile_id, organization_id).await,
            Err(err) => {
                tracing::debug!(%organization_id, error = %err, "admin check denied: unresolved credential");
                false
            }
        }
    }

    /// `true` iff the credential resolves and its profile is a member or
    /// admin of `organization_id`.
    pub async fn is_member(&self, credential: &str, organization_id: Uuid) -> bool {
        match self.identity.resolve(credential).await {
            Ok(identity) => {
                self.is_member_profile(identity.profile_id, organization_id)
                    .await
            }
            Err(err) => {
                tracing::debug!(%organization_id, error = %err, "member check denied: unresolved credential");
                false
            }
        }
    }

    /// Admin check for an already resolved profile.
    pub async fn is_admin_profile(&self, profile_id: Uuid, organization_id: Uuid) -> bool {
        self.role_of(profile_id, organization_id)
            .await
            .is_some_and(Role::is_admin)
    }

    /// Member check for an already resolved profile. Admins are members.
    pub async fn is_member_profile(&self, profile_id: Uuid, organization_id: Uuid) -> bool {
        self.role_of(profile_id, organization_id)
            .await
            .is_some_and(Role::grants_membership)
    }

    async fn role_of(&self, profile_id: Uuid, organization_id: Uuid) -> Option<Role> {
        match self
            .memberships
            .find_membership(profile_id, organization_id)
            .await
        {
            Ok(membership) => membership.map(|m| m.role),
            Err(err) => {
                tracing::debug!(%profile_id, %organization_id, error = %err, "membership lookup failed, denying");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::auth::JwtIdentityResolver;
    use crate::domain::{Membership, NewOrganization, NewProfile};
    use crate::error::AppError;
    use crate::persistence::{MemoryStore, OrganizationRepository, ProfileRepository};

    const SECRET: &str = "authority-test-secret";

    struct Fixture {
        authority: MembershipAuthority<MemoryStore>,
        resolver: JwtIdentityResolver,
        store: Arc<MemoryStore>,
        org: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let resolver = JwtIdentityResolver::new(SECRET, None);
        let admin = Uuid::new_v4();
        let Ok(_) = store
            .insert_profile(NewProfile {
                id: admin,
                email: "admin@umass.edu".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
        else {
            panic!("insert profile");
        };
        let Ok(org) = store
            .insert_organization_with_admin(
                NewOrganization {
                    organization_name: "Outing Club".to_string(),
                    email: "outing@umass.edu".to_string(),
                    description: None,
                    image_url: None,
                    address: None,
                },
                admin,
            )
            .await
        else {
            panic!("insert org");
        };
        let authority = MembershipAuthority::new(
            Arc::new(resolver.clone()),
            Arc::clone(&store),
        );
        Fixture {
            authority,
            resolver,
            store,
            org: org.id,
        }
    }

    async fn profile_with_role(fx: &Fixture, role: Option<Role>) -> Uuid {
        let id = Uuid::new_v4();
        let Ok(_) = fx
            .store
            .insert_profile(NewProfile {
                id,
                email: format!("{id}@umass.edu"),
                first_name: None,
                last_name: None,
            })
            .await
        else {
            panic!("insert profile");
        };
        if let Some(role) = role {
            let Ok(_) = fx
                .store
                .upsert_membership(Membership {
                    profile_id: id,
                    organization_id: fx.org,
                    role,
                })
                .await
            else {
                panic!("upsert membership");
            };
        }
        id
    }

    fn token(fx: &Fixture, id: Uuid) -> String {
        let Ok(token) = fx.resolver.issue(id, None, chrono::Duration::hours(1)) else {
            panic!("issue token");
        };
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn role_truth_table() {
        let fx = fixture().await;
        let cases = [
            (None, false, false),
            (Some(Role::Member), true, false),
            (Some(Role::Admin), true, true),
        ];
        for (role, member, admin) in cases {
            let id = profile_with_role(&fx, role).await;
            let credential = token(&fx, id);
            assert_eq!(fx.authority.is_member(&credential, fx.org).await, member, "{role:?}");
            assert_eq!(fx.authority.is_admin(&credential, fx.org).await, admin, "{role:?}");
        }
    }

    #[tokio::test]
    async fn membership_is_per_organization() {
        let fx = fixture().await;
        let id = profile_with_role(&fx, Some(Role::Admin)).await;
        let credential = token(&fx, id);
        assert!(!fx.authority.is_member(&credential, Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn unresolvable_credentials_fail_closed() {
        let fx = fixture().await;
        assert!(!fx.authority.is_member("", fx.org).await);
        assert!(!fx.authority.is_admin("Bearer garbage", fx.org).await);

        let forger = JwtIdentityResolver::new("other-secret", None);
        let id = profile_with_role(&fx, Some(Role::Admin)).await;
        let Ok(forged) = forger.issue(id, None, chrono::Duration::hours(1)) else {
            panic!("issue token");
        };
        assert!(!fx.authority.is_admin(&forged, fx.org).await);
    }

    #[derive(Debug)]
    struct BrokenMemberships;

    #[async_trait]
    impl MembershipRepository for BrokenMemberships {
        async fn find_membership(&self, _: Uuid, _: Uuid) -> Result<Option<Membership>, AppError> {
            Err(AppError::Persistence("connection reset".to_string()))
        }

        async fn upsert_membership(&self, _: Membership) -> Result<Membership, AppError> {
            Err(AppError::Persistence("connection reset".to_string()))
        }

        async fn delete_membership(&self, _: Uuid, _: Uuid) -> Result<(), AppError> {
            Err(AppError::Persistence("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn store_failures_fail_closed() {
        let resolver = JwtIdentityResolver::new(SECRET, None);
        let authority = MembershipAuthority::new(
            Arc::new(resolver.clone()),
            Arc::new(BrokenMemberships),
        );
        let id = Uuid::new_v4();
        let Ok(token) = resolver.issue(id, None, chrono::Duration::hours(1)) else {
            panic!("issue token");
        };
        assert!(!authority.is_member(&token, Uuid::new_v4()).await);
        assert!(!authority.is_admin_profile(id, Uuid::new_v4()).await);
    }
}
