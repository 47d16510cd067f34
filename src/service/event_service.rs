//! Event reads and the guarded, audited event mutations.
//!
//! Every mutation runs the same sequence: resolve the actor, find the
//! organization the event belongs to, require membership in it, then
//! mutate and log in one store transaction. A denied or failed mutation
//! leaves neither a change nor a log row behind.

use std::sync::Arc;

use uuid::Uuid;

use super::authority::MembershipAuthority;
use crate::auth::IdentityResolver;
use crate::domain::{
    AuditAction, Event, EventDetails, EventLogDetails, EventPatch, EventWithBuilding, NewEvent,
    Page, PageRequest,
};
use crate::error::AppError;
use crate::persistence::Store;

/// Event operations, with mutations gated on organization membership.
#[derive(Debug, Clone)]
pub struct EventService {
    store: Arc<dyn Store>,
    identity: Arc<dyn IdentityResolver>,
    authority: Arc<MembershipAuthority<dyn Store>>,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        identity: Arc<dyn IdentityResolver>,
        authority: Arc<MembershipAuthority<dyn Store>>,
    ) -> Self {
        Self {
            store,
            identity,
            authority,
        }
    }

    /// Loads an event with its building, organization and logs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the event does not exist.
    pub async fn get(&self, id: Uuid) -> Result<EventDetails, AppError> {
        self.store
            .find_event_details(id)
            .await?
            .ok_or(AppError::NotFound("Event"))
    }

    /// Pages through event ids, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn ids(&self, page: PageRequest) -> Result<Page<Uuid>, AppError> {
        self.store.event_ids(page).await
    }

    /// Events of an organization by date, with buildings nested.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn by_organization(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventWithBuilding>, AppError> {
        self.store.events_by_organization(organization_id, page).await
    }

    /// Audit trail of an event, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn logs(
        &self,
        event_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        self.store.logs_by_event(event_id, page).await
    }

    /// Creates an event under `organization_id` on behalf of the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] for an unresolvable credential,
    /// [`AppError::Forbidden`] if the caller is not a member of the
    /// organization, or the store error that aborted the insert.
    pub async fn create(
        &self,
        credential: &str,
        organization_id: Uuid,
        mut new: NewEvent,
    ) -> Result<Event, AppError> {
        let actor = self.actor(credential).await?;
        new.organization_id = Some(organization_id);
        self.authorize(actor, new.organization_id, AuditAction::EventCreated)
            .await?;

        let event = self.store.insert_event_audited(new, actor).await?;
        tracing::info!(event_id = %event.id, %organization_id, %actor, "event created");
        Ok(event)
    }

    /// Applies `patch` to an event on behalf of the caller. The returned
    /// details are built from the row the update committed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`], [`AppError::NotFound`] if
    /// the event does not exist, [`AppError::Forbidden`], or the store
    /// error that aborted the update.
    pub async fn update(
        &self,
        credential: &str,
        id: Uuid,
        patch: EventPatch,
    ) -> Result<EventDetails, AppError> {
        let actor = self.actor(credential).await?;
        let existing = self.existing(id).await?;
        self.authorize(actor, existing.organization_id, AuditAction::EventUpdated)
            .await?;

        let event = self.store.update_event_audited(id, patch, actor).await?;
        tracing::info!(event_id = %id, %actor, "event updated");
        self.store.event_details(event).await
    }

    /// Deletes an event on behalf of the caller. Its logs, including the
    /// `event.deleted` row, keep the event id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`], [`AppError::NotFound`],
    /// [`AppError::Forbidden`], or the store error that aborted the delete.
    pub async fn delete(&self, credential: &str, id: Uuid) -> Result<(), AppError> {
        let actor = self.actor(credential).await?;
        let existing = self.existing(id).await?;
        self.authorize(actor, existing.organization_id, AuditAction::EventDeleted)
            .await?;

        self.store.delete_event_audited(id, actor).await?;
        tracing::info!(event_id = %id, %actor, "event deleted");
        Ok(())
    }

    async fn actor(&self, credential: &str) -> Result<Uuid, AppError> {
        Ok(self.identity.resolve(credential).await?.profile_id)
    }

    async fn existing(&self, id: Uuid) -> Result<Event, AppError> {
        self.store
            .find_event(id)
            .await?
            .ok_or(AppError::NotFound("Event"))
    }

    async fn authorize(
        &self,
        actor: Uuid,
        organization_id: Option<Uuid>,
        action: AuditAction,
    ) -> Result<(), AppError> {
        let allowed = match organization_id {
            Some(org) => self.authority.is_member_profile(actor, org).await,
            None => false,
        };
        if allowed {
            return Ok(());
        }
        tracing::debug!(%actor, ?organization_id, %action, "event mutation denied");
        Err(AppError::Forbidden(format!(
            "Must be a member or admin of the organization to {} events",
            action.verb()
        )))
    }
}
