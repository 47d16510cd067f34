//! In-process store with the same constraints and cascades as the schema.
//!
//! All tables live behind one [`tokio::sync::RwLock`]. A write stages a
//! copy of the tables, applies the change to the copy and swaps it in only
//! if every step succeeded, which gives each operation all-or-nothing
//! semantics. Each table is an `Arc<Vec<_>>`, so staging copies six
//! pointers and a table is deep-copied only when the write touches it.
//! Cascade transactions hold the write lock until they commit or drop.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use super::{
    AggregationQueries, BuildingRepository, CascadeStore, CascadeTx, EventLogRepository,
    EventRepository, MembershipRepository, OrganizationRepository, ProfileRepository, Store,
};
use crate::domain::building::{latitude_in_range, longitude_in_range};
use crate::domain::{
    AuditAction, Building, BuildingSummary, Event, EventDetails, EventLog, EventLogDetails,
    EventPatch, EventSummary, EventWithBuilding, MemberDetails, Membership, NewBuilding, NewEvent,
    NewOrganization, NewProfile, Organization, OrganizationSummary, Page, PageRequest, Profile,
    ProfileSummary, Role,
};
use crate::error::AppError;

fn unique_violation(constraint: &str) -> AppError {
    AppError::Conflict(format!(
        "duplicate key value violates unique constraint \"{constraint}\""
    ))
}

fn foreign_key_violation(table: &str, constraint: &str) -> AppError {
    AppError::Conflict(format!(
        "insert or update on table \"{table}\" violates foreign key constraint \"{constraint}\""
    ))
}

fn check_violation(table: &str, constraint: &str) -> AppError {
    AppError::Conflict(format!(
        "new row for relation \"{table}\" violates check constraint \"{constraint}\""
    ))
}

/// Copy-on-write tables. Mutate through `Arc::make_mut`.
#[derive(Debug, Clone, Default)]
struct Tables {
    profiles: Arc<Vec<Profile>>,
    organizations: Arc<Vec<Organization>>,
    memberships: Arc<Vec<Membership>>,
    buildings: Arc<Vec<Building>>,
    events: Arc<Vec<Event>>,
    event_logs: Arc<Vec<EventLog>>,
}

impl Tables {
    fn profile(&self, id: Uuid) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    fn organization(&self, id: Uuid) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == id)
    }

    fn building(&self, id: Uuid) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    fn event(&self, id: Uuid) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    fn building_summary(&self, id: Option<Uuid>) -> Option<BuildingSummary> {
        id.and_then(|id| self.building(id)).map(BuildingSummary::from)
    }

    fn with_building(&self, event: &Event) -> EventWithBuilding {
        EventWithBuilding::new(event.clone(), self.building_summary(event.building_id))
    }

    fn log_details(&self, log: &EventLog) -> EventLogDetails {
        EventLogDetails {
            id: log.id,
            profile_id: log.profile_id,
            event_id: log.event_id,
            organization_id: log.organization_id,
            action: log.action.clone(),
            timestamp: log.timestamp,
            profile: log
                .profile_id
                .and_then(|id| self.profile(id))
                .map(ProfileSummary::from),
            event: log
                .event_id
                .and_then(|id| self.event(id))
                .map(EventSummary::from),
        }
    }

    /// Logs matching `filter`, newest first.
    fn logs_where(&self, filter: impl Fn(&EventLog) -> bool) -> Vec<EventLogDetails> {
        let mut logs: Vec<&EventLog> = self.event_logs.iter().rev().filter(|l| filter(*l)).collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.into_iter().map(|l| self.log_details(l)).collect()
    }

    /// Events matching `filter`, by date then time.
    fn events_where(&self, filter: impl Fn(&Event) -> bool) -> Vec<EventWithBuilding> {
        let mut events: Vec<&Event> = self.events.iter().filter(|e| filter(*e)).collect();
        events.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
        events.into_iter().map(|e| self.with_building(e)).collect()
    }

    fn check_event_refs(
        &self,
        building_id: Option<Uuid>,
        organization_id: Option<Uuid>,
        attendance: i32,
    ) -> Result<(), AppError> {
        if building_id.is_some_and(|id| self.building(id).is_none()) {
            return Err(foreign_key_violation("events", "events_building_id_fkey"));
        }
        if organization_id.is_some_and(|id| self.organization(id).is_none()) {
            return Err(foreign_key_violation("events", "events_organization_id_fkey"));
        }
        if attendance < 0 {
            return Err(check_violation("events", "events_attendance_check"));
        }
        Ok(())
    }

    fn append_log(&mut self, actor: Uuid, event: &Event, action: AuditAction) -> Result<(), AppError> {
        if self.profile(actor).is_none() {
            return Err(foreign_key_violation("event_logs", "event_logs_profile_id_fkey"));
        }
        Arc::make_mut(&mut self.event_logs).push(EventLog::record(actor, event, action));
        Ok(())
    }

    /// Removes events matching `filter`. Their logs keep the copied ids.
    fn remove_events(&mut self, filter: impl Fn(&Event) -> bool) -> u64 {
        let before = self.events.len();
        Arc::make_mut(&mut self.events).retain(|e| !filter(e));
        (before - self.events.len()) as u64
    }

    /// Joins `event` with its building, organization and logs.
    fn details(&self, event: Event) -> EventDetails {
        let mut event_logs: Vec<EventLog> = self
            .event_logs
            .iter()
            .rev()
            .filter(|l| l.event_id == Some(event.id))
            .cloned()
            .collect();
        event_logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        EventDetails {
            building: self.building_summary(event.building_id),
            organization: event
                .organization_id
                .and_then(|org| self.organization(org))
                .cloned()
                .map(OrganizationSummary::from),
            event,
            event_logs,
        }
    }

    fn remove_logs(&mut self, filter: impl Fn(&EventLog) -> bool) -> u64 {
        let before = self.event_logs.len();
        Arc::make_mut(&mut self.event_logs).retain(|l| !filter(l));
        (before - self.event_logs.len()) as u64
    }
}

/// Store backed by in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against a copy of the tables and publishes the copy only
    /// when `f` succeeds.
    async fn transact<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, AppError> + Send,
    ) -> Result<T, AppError> {
        let mut guard = self.tables.write().await;
        let mut staged = guard.clone();
        let out = f(&mut staged)?;
        *guard = staged;
        Ok(out)
    }
}

#[async_trait]
impl BuildingRepository for MemoryStore {
    async fn insert_building(&self, new: NewBuilding) -> Result<Building, AppError> {
        if !latitude_in_range(new.latitude) {
            return Err(check_violation("buildings", "buildings_latitude_check"));
        }
        if !longitude_in_range(new.longitude) {
            return Err(check_violation("buildings", "buildings_longitude_check"));
        }
        let now = Utc::now();
        let building = Building {
            id: Uuid::new_v4(),
            name: new.name,
            thumbnail: new.thumbnail,
            address: new.address,
            latitude: new.latitude,
            longitude: new.longitude,
            created_at: now,
            updated_at: now,
        };
        Arc::make_mut(&mut self.tables.write().await.buildings).push(building.clone());
        Ok(building)
    }

    async fn find_building(&self, id: Uuid) -> Result<Option<Building>, AppError> {
        Ok(self.tables.read().await.building(id).cloned())
    }

    async fn list_buildings(&self, page: PageRequest) -> Result<Page<Building>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Building> = tables.buildings.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(rows))
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self.tables.read().await.event(id).cloned())
    }

    async fn find_event_details(&self, id: Uuid) -> Result<Option<EventDetails>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.event(id).cloned().map(|event| tables.details(event)))
    }

    async fn event_details(&self, event: Event) -> Result<EventDetails, AppError> {
        Ok(self.tables.read().await.details(event))
    }

    async fn event_ids(&self, page: PageRequest) -> Result<Page<Uuid>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Event> = tables.events.iter().rev().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(rows.into_iter().map(|e| e.id).collect()))
    }

    async fn events_by_building(
        &self,
        building_id: Uuid,
    ) -> Result<Vec<EventWithBuilding>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.events_where(|e| e.building_id == Some(building_id)))
    }

    async fn insert_event_audited(&self, new: NewEvent, actor: Uuid) -> Result<Event, AppError> {
        self.transact(move |t| {
            t.check_event_refs(new.building_id, new.organization_id, new.attendance)?;
            let now = Utc::now();
            let event = Event {
                id: Uuid::new_v4(),
                name: new.name,
                description: new.description,
                date: new.date,
                time: new.time,
                building_id: new.building_id,
                room_number: new.room_number,
                organization_id: new.organization_id,
                thumbnail: new.thumbnail,
                attendance: new.attendance,
                created_at: now,
                updated_at: now,
            };
            Arc::make_mut(&mut t.events).push(event.clone());
            t.append_log(actor, &event, AuditAction::EventCreated)?;
            Ok(event)
        })
        .await
    }

    async fn update_event_audited(
        &self,
        id: Uuid,
        patch: EventPatch,
        actor: Uuid,
    ) -> Result<Event, AppError> {
        self.transact(move |t| {
            let Some(mut event) = t.event(id).cloned() else {
                return Err(AppError::NotFound("Event"));
            };
            patch.apply(&mut event, Utc::now());
            t.check_event_refs(event.building_id, event.organization_id, event.attendance)?;
            if let Some(slot) = Arc::make_mut(&mut t.events).iter_mut().find(|e| e.id == id) {
                *slot = event.clone();
            }
            t.append_log(actor, &event, AuditAction::EventUpdated)?;
            Ok(event)
        })
        .await
    }

    async fn delete_event_audited(&self, id: Uuid, actor: Uuid) -> Result<(), AppError> {
        self.transact(move |t| {
            let Some(event) = t.event(id).cloned() else {
                return Err(AppError::NotFound("Event"));
            };
            t.append_log(actor, &event, AuditAction::EventDeleted)?;
            t.remove_events(|e| e.id == id);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl EventLogRepository for MemoryStore {
    async fn logs_by_event(
        &self,
        event_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        let tables = self.tables.read().await;
        Ok(page.slice(tables.logs_where(|l| l.event_id == Some(event_id))))
    }

    async fn logs_by_profile(
        &self,
        profile_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        let tables = self.tables.read().await;
        Ok(page.slice(tables.logs_where(|l| l.profile_id == Some(profile_id))))
    }
}

#[async_trait]
impl OrganizationRepository for MemoryStore {
    async fn find_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        Ok(self.tables.read().await.organization(id).cloned())
    }

    async fn insert_organization_with_admin(
        &self,
        new: NewOrganization,
        admin: Uuid,
    ) -> Result<Organization, AppError> {
        self.transact(move |t| {
            if t.organizations.iter().any(|o| o.email == new.email) {
                return Err(unique_violation("organizations_email_key"));
            }
            if t.profile(admin).is_none() {
                return Err(foreign_key_violation(
                    "profiles_organizations",
                    "profiles_organizations_profile_id_fkey",
                ));
            }
            let now = Utc::now();
            let org = Organization {
                id: Uuid::new_v4(),
                organization_name: new.organization_name,
                email: new.email,
                description: new.description,
                image_url: new.image_url,
                address: new.address,
                verified: false,
                created_at: now,
                updated_at: now,
            };
            Arc::make_mut(&mut t.organizations).push(org.clone());
            Arc::make_mut(&mut t.memberships).push(Membership {
                profile_id: admin,
                organization_id: org.id,
                role: Role::Admin,
            });
            Ok(org)
        })
        .await
    }

    async fn organizations_for_profile(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<OrganizationSummary>, AppError> {
        let tables = self.tables.read().await;
        let mut orgs: Vec<Organization> = tables
            .memberships
            .iter()
            .filter(|m| m.profile_id == profile_id)
            .filter_map(|m| tables.organization(m.organization_id))
            .cloned()
            .collect();
        orgs.sort_by(|a, b| a.organization_name.cmp(&b.organization_name));
        Ok(orgs.into_iter().map(OrganizationSummary::from).collect())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn insert_profile(&self, new: NewProfile) -> Result<Profile, AppError> {
        self.transact(move |t| {
            if t.profile(new.id).is_some() {
                return Err(unique_violation("profiles_pkey"));
            }
            if t.profiles.iter().any(|p| p.email == new.email) {
                return Err(unique_violation("profiles_email_key"));
            }
            let now = Utc::now();
            let profile = Profile {
                id: new.id,
                first_name: new.first_name,
                last_name: new.last_name,
                email: new.email,
                verified: false,
                created_at: now,
                updated_at: now,
            };
            Arc::make_mut(&mut t.profiles).push(profile.clone());
            Ok(profile)
        })
        .await
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.tables.read().await.profile(id).cloned())
    }

    async fn profile_exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.read().await.profile(id).is_some())
    }

    async fn search_profiles(&self, query: &str) -> Result<Vec<ProfileSummary>, AppError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let tables = self.tables.read().await;
        let mut found: Vec<ProfileSummary> = tables
            .profiles
            .iter()
            .filter(|p| p.email.to_lowercase().contains(&needle))
            .map(ProfileSummary::from)
            .collect();
        found.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(found)
    }

    async fn delete_profile(&self, id: Uuid) -> Result<(), AppError> {
        self.transact(move |t| {
            if t.profile(id).is_none() {
                return Err(AppError::NotFound("Profile"));
            }
            Arc::make_mut(&mut t.memberships).retain(|m| m.profile_id != id);
            t.remove_logs(|l| l.profile_id == Some(id));
            Arc::make_mut(&mut t.profiles).retain(|p| p.id != id);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find_membership(
        &self,
        profile_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .find(|m| m.profile_id == profile_id && m.organization_id == organization_id)
            .copied())
    }

    async fn upsert_membership(&self, membership: Membership) -> Result<Membership, AppError> {
        self.transact(move |t| {
            if t.profile(membership.profile_id).is_none() {
                return Err(foreign_key_violation(
                    "profiles_organizations",
                    "profiles_organizations_profile_id_fkey",
                ));
            }
            if t.organization(membership.organization_id).is_none() {
                return Err(foreign_key_violation(
                    "profiles_organizations",
                    "profiles_organizations_organization_id_fkey",
                ));
            }
            let memberships = Arc::make_mut(&mut t.memberships);
            match memberships.iter_mut().find(|m| {
                m.profile_id == membership.profile_id
                    && m.organization_id == membership.organization_id
            }) {
                Some(existing) => existing.role = membership.role,
                None => memberships.push(membership),
            }
            Ok(membership)
        })
        .await
    }

    async fn delete_membership(
        &self,
        profile_id: Uuid,
        organization_id: Uuid,
    ) -> Result<(), AppError> {
        self.transact(move |t| {
            let before = t.memberships.len();
            Arc::make_mut(&mut t.memberships)
                .retain(|m| !(m.profile_id == profile_id && m.organization_id == organization_id));
            if t.memberships.len() == before {
                return Err(AppError::NotFound("Profile-Organization relationship"));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl AggregationQueries for MemoryStore {
    async fn events_by_organization(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventWithBuilding>, AppError> {
        let tables = self.tables.read().await;
        Ok(page.slice(tables.events_where(|e| e.organization_id == Some(organization_id))))
    }

    async fn logs_by_organization(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        let tables = self.tables.read().await;
        Ok(page.slice(tables.logs_where(|l| l.organization_id == Some(organization_id))))
    }

    async fn organization_members(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<MemberDetails>, AppError> {
        let tables = self.tables.read().await;
        let mut members: Vec<MemberDetails> = tables
            .memberships
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .filter_map(|m| {
                tables.profile(m.profile_id).map(|p| MemberDetails {
                    role: m.role,
                    profile: ProfileSummary::from(p),
                })
            })
            .collect();
        members.sort_by(|a, b| a.profile.email.cmp(&b.profile.email));
        Ok(page.slice(members))
    }
}

/// A staged copy of the tables plus the write lock that keeps every
/// other reader and writer out until commit or drop.
#[derive(Debug)]
struct MemoryCascadeTx {
    guard: OwnedRwLockWriteGuard<Tables>,
    staged: Tables,
}

#[async_trait]
impl CascadeStore for MemoryStore {
    async fn begin_cascade(&self) -> Result<Box<dyn CascadeTx>, AppError> {
        let guard = Arc::clone(&self.tables).write_owned().await;
        let staged = (*guard).clone();
        Ok(Box::new(MemoryCascadeTx { guard, staged }))
    }
}

#[async_trait]
impl CascadeTx for MemoryCascadeTx {
    async fn events_for_building(&mut self, building_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .staged
            .events
            .iter()
            .filter(|e| e.building_id == Some(building_id))
            .map(|e| e.id)
            .collect())
    }

    async fn delete_logs_for_event(&mut self, event_id: Uuid) -> Result<u64, AppError> {
        Ok(self.staged.remove_logs(|l| l.event_id == Some(event_id)))
    }

    async fn delete_events_for_building(&mut self, building_id: Uuid) -> Result<u64, AppError> {
        Ok(self
            .staged
            .remove_events(|e| e.building_id == Some(building_id)))
    }

    async fn delete_building(&mut self, building_id: Uuid) -> Result<u64, AppError> {
        if self
            .staged
            .events
            .iter()
            .any(|e| e.building_id == Some(building_id))
        {
            return Err(AppError::Conflict(
                "update or delete on table \"buildings\" violates foreign key constraint \"events_building_id_fkey\" on table \"events\"".to_string(),
            ));
        }
        let before = self.staged.buildings.len();
        Arc::make_mut(&mut self.staged.buildings).retain(|b| b.id != building_id);
        Ok((before - self.staged.buildings.len()) as u64)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let Self { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn close(&self) {}
}
