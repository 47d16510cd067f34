//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::IdentityResolver;
use crate::persistence::Store;
use crate::service::{
    BuildingService, EventService, MembershipAuthority, MembershipService, OrganizationService,
    ProfileService,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The backing store, pinged by the health check.
    pub store: Arc<dyn Store>,
    /// Resolves bearer credentials before any request body is examined.
    pub identity: Arc<dyn IdentityResolver>,
    /// Building listing, creation and cascade deletion.
    pub buildings: Arc<BuildingService>,
    /// Event reads and guarded mutations.
    pub events: Arc<EventService>,
    /// Organization creation and organization-scoped reads.
    pub organizations: Arc<OrganizationService>,
    /// Admin-gated membership management.
    pub memberships: Arc<MembershipService>,
    /// Profile creation, lookups and search.
    pub profiles: Arc<ProfileService>,
}

impl AppState {
    /// Wires every service over one store and one identity resolver.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityResolver>) -> Self {
        let authority = Arc::new(MembershipAuthority::new(
            Arc::clone(&identity),
            Arc::clone(&store),
        ));
        Self {
            store: Arc::clone(&store),
            identity: Arc::clone(&identity),
            buildings: Arc::new(BuildingService::new(Arc::clone(&store))),
            events: Arc::new(EventService::new(
                Arc::clone(&store),
                Arc::clone(&identity),
                Arc::clone(&authority),
            )),
            organizations: Arc::new(OrganizationService::new(
                Arc::clone(&store),
                Arc::clone(&identity),
            )),
            memberships: Arc::new(MembershipService::new(Arc::clone(&store), authority)),
            profiles: Arc::new(ProfileService::new(store, identity)),
        }
    }
}
