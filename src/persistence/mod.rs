//! Persistence layer: repository traits and their two backends.
//!
//! Services depend on the traits only. [`postgres::PgStore`] is the
//! production backend over `sqlx::PgPool`; [`memory::MemoryStore`] keeps
//! the same tables, constraints and cascades in process and backs
//! development runs without a database and the test suite.
//!
//! Deletion strategy: memberships and event logs reference profiles with
//! declared cascades, and events reference buildings without any action.
//! Event logs copy their event and organization ids without a foreign key,
//! so deleting an event leaves its history intact. Building deletion is
//! orchestrated through [`CascadeStore`] and removes those logs explicitly.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Building, Event, EventDetails, EventLogDetails, EventPatch, EventWithBuilding, MemberDetails,
    Membership, NewBuilding, NewEvent, NewOrganization, NewProfile, Organization,
    OrganizationSummary, Page, PageRequest, Profile, ProfileSummary,
};
use crate::error::AppError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Building rows.
#[async_trait]
pub trait BuildingRepository: Send + Sync {
    /// Inserts a building and returns the stored row.
    async fn insert_building(&self, new: NewBuilding) -> Result<Building, AppError>;

    /// Looks a building up by id.
    async fn find_building(&self, id: Uuid) -> Result<Option<Building>, AppError>;

    /// Lists buildings, newest first.
    async fn list_buildings(&self, page: PageRequest) -> Result<Page<Building>, AppError>;
}

/// Event rows and the audited mutations on them.
///
/// Every `*_audited` method writes the mutation and exactly one event log
/// row in a single transaction: both land or neither does.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Looks an event up by id.
    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError>;

    /// Loads an event with its building, organization and logs.
    async fn find_event_details(&self, id: Uuid) -> Result<Option<EventDetails>, AppError>;

    /// Joins an already loaded event with its building, organization and
    /// logs without reading the event row again.
    async fn event_details(&self, event: Event) -> Result<EventDetails, AppError>;

    /// Pages through event ids, newest first.
    async fn event_ids(&self, page: PageRequest) -> Result<Page<Uuid>, AppError>;

    /// All events held in a building, by date.
    async fn events_by_building(
        &self,
        building_id: Uuid,
    ) -> Result<Vec<EventWithBuilding>, AppError>;

    /// Inserts an event and logs `event.created` for `actor`.
    async fn insert_event_audited(&self, new: NewEvent, actor: Uuid) -> Result<Event, AppError>;

    /// Applies `patch` and logs `event.updated` for `actor`.
    ///
    /// Fails with [`AppError::NotFound`] if the event is gone.
    async fn update_event_audited(
        &self,
        id: Uuid,
        patch: EventPatch,
        actor: Uuid,
    ) -> Result<Event, AppError>;

    /// Logs `event.deleted` for `actor`, then removes the event.
    ///
    /// Fails with [`AppError::NotFound`] if the event is gone.
    async fn delete_event_audited(&self, id: Uuid, actor: Uuid) -> Result<(), AppError>;
}

/// Event log reads. Logs are only ever written by the audited event
/// mutations.
#[async_trait]
pub trait EventLogRepository: Send + Sync {
    /// Logs recorded for an event, newest first.
    async fn logs_by_event(
        &self,
        event_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError>;

    /// Logs authored by a profile, newest first.
    async fn logs_by_profile(
        &self,
        profile_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError>;
}

/// Organization rows.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Looks an organization up by id.
    async fn find_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError>;

    /// Inserts an organization and makes `admin` its first admin, atomically.
    async fn insert_organization_with_admin(
        &self,
        new: NewOrganization,
        admin: Uuid,
    ) -> Result<Organization, AppError>;

    /// Organizations the profile belongs to, in any role.
    async fn organizations_for_profile(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<OrganizationSummary>, AppError>;
}

/// Profile rows.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Inserts a profile.
    async fn insert_profile(&self, new: NewProfile) -> Result<Profile, AppError>;

    /// Looks a profile up by id.
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError>;

    /// Whether a profile with this id exists.
    async fn profile_exists(&self, id: Uuid) -> Result<bool, AppError>;

    /// Profiles whose email contains `query`, ignoring case. `%` and `_`
    /// match literally.
    async fn search_profiles(&self, query: &str) -> Result<Vec<ProfileSummary>, AppError>;

    /// Deletes a profile together with its memberships and authored logs.
    async fn delete_profile(&self, id: Uuid) -> Result<(), AppError>;
}

/// Membership rows.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Looks up the membership of `profile_id` in `organization_id`.
    async fn find_membership(
        &self,
        profile_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Membership>, AppError>;

    /// Inserts the membership, or replaces the role of an existing one.
    async fn upsert_membership(&self, membership: Membership) -> Result<Membership, AppError>;

    /// Removes a membership.
    ///
    /// Fails with [`AppError::NotFound`] when no row matched.
    async fn delete_membership(
        &self,
        profile_id: Uuid,
        organization_id: Uuid,
    ) -> Result<(), AppError>;
}

/// Paginated joins across several tables.
#[async_trait]
pub trait AggregationQueries: Send + Sync {
    /// Events of an organization with their buildings nested, by date.
    async fn events_by_organization(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventWithBuilding>, AppError>;

    /// Logs of every event the organization hosts, newest first.
    async fn logs_by_organization(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError>;

    /// Members of an organization with their profiles.
    async fn organization_members(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<MemberDetails>, AppError>;
}

/// Opens transactions for the building cascade.
#[async_trait]
pub trait CascadeStore: Send + Sync {
    /// Begins a transaction. Dropping it without committing rolls back.
    async fn begin_cascade(&self) -> Result<Box<dyn CascadeTx>, AppError>;
}

/// The steps of a building cascade, executed inside one transaction.
#[async_trait]
pub trait CascadeTx: Send {
    /// Ids of events held in the building.
    async fn events_for_building(&mut self, building_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// Deletes every log of an event. Returns the number of rows removed.
    async fn delete_logs_for_event(&mut self, event_id: Uuid) -> Result<u64, AppError>;

    /// Deletes every event of a building. Returns the number of rows removed.
    async fn delete_events_for_building(&mut self, building_id: Uuid) -> Result<u64, AppError>;

    /// Deletes the building row. Returns the number of rows removed.
    async fn delete_building(&mut self, building_id: Uuid) -> Result<u64, AppError>;

    /// Publishes every change made through this transaction.
    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

/// A complete storage backend.
#[async_trait]
pub trait Store:
    BuildingRepository
    + EventRepository
    + EventLogRepository
    + OrganizationRepository
    + ProfileRepository
    + MembershipRepository
    + AggregationQueries
    + CascadeStore
    + std::fmt::Debug
{
    /// Round-trips to the backend. Used by the health check.
    async fn ping(&self) -> Result<(), AppError>;

    /// Releases connections. Called once after the server has drained.
    async fn close(&self);
}
