//! Domain layer: entities, projections and pagination types.
//!
//! Entities mirror the relational schema one-to-one. Projections such as
//! [`EventWithBuilding`] and [`EventLogDetails`] are the explicit join
//! shapes returned by the repositories; related rows are never loaded
//! implicitly.

pub mod building;
pub mod event;
pub mod event_log;
pub mod membership;
pub mod organization;
pub mod page;
pub mod profile;

pub use building::{Building, BuildingSummary, NewBuilding};
pub use event::{Event, EventDetails, EventPatch, EventSummary, EventWithBuilding, NewEvent};
pub use event_log::{AuditAction, EventLog, EventLogDetails};
pub use membership::{MemberDetails, Membership, Role};
pub use organization::{NewOrganization, Organization, OrganizationDetails, OrganizationSummary};
pub use page::{Page, PageRequest};
pub use profile::{NewProfile, Profile, ProfileSummary};
