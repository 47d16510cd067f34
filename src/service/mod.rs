//! Service layer: business logic orchestration.
//!
//! Services own `Arc` handles to the [`crate::persistence::Store`] and
//! the [`crate::auth::IdentityResolver`]; handlers never touch either
//! directly. Event mutations go through [`EventService`], which enforces
//! membership and auditing; building deletion goes through
//! [`delete_building_cascade`].

pub mod authority;
pub mod building_service;
pub mod cascade;
pub mod event_service;
pub mod membership_service;
pub mod organization_service;
pub mod profile_service;

pub use authority::MembershipAuthority;
pub use building_service::BuildingService;
pub use cascade::{CascadeSummary, delete_building_cascade};
pub use event_service::EventService;
pub use membership_service::MembershipService;
pub use organization_service::OrganizationService;
pub use profile_service::ProfileService;
