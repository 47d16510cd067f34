//! Immutable audit records of event mutations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::event::{Event, EventSummary};
use super::profile::ProfileSummary;

/// Action recorded for an audited event mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    /// `event.created`
    EventCreated,
    /// `event.updated`
    EventUpdated,
    /// `event.deleted`
    EventDeleted,
}

impl AuditAction {
    /// Value stored in the `action` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EventCreated => "event.created",
            Self::EventUpdated => "event.updated",
            Self::EventDeleted => "event.deleted",
        }
    }

    /// Verb used in authorization and success messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::EventCreated => "create",
            Self::EventUpdated => "update",
            Self::EventDeleted => "delete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `event_logs` table.
///
/// `event_id` and `organization_id` are copied from the event when the row
/// is written and carry no foreign key, so a log keeps naming its event and
/// hosting organization after the event is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct EventLog {
    /// Log identifier.
    pub id: Uuid,
    /// Acting profile.
    pub profile_id: Option<Uuid>,
    /// Affected event.
    pub event_id: Option<Uuid>,
    /// Organization hosting the event when the action happened.
    pub organization_id: Option<Uuid>,
    /// Action name, e.g. `event.created`.
    #[schema(example = "event.created")]
    pub action: String,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
}

impl EventLog {
    /// Builds a fresh log row for `action` performed by `actor` on `event`.
    #[must_use]
    pub fn record(actor: Uuid, event: &Event, action: AuditAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile_id: Some(actor),
            event_id: Some(event.id),
            organization_id: event.organization_id,
            action: action.as_str().to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// A log row with its actor and event joined for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EventLogDetails {
    /// Log identifier.
    pub id: Uuid,
    /// Acting profile.
    pub profile_id: Option<Uuid>,
    /// Affected event, kept after the event is deleted.
    pub event_id: Option<Uuid>,
    /// Organization hosting the event when the action happened.
    pub organization_id: Option<Uuid>,
    /// Action name.
    pub action: String,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
    /// Actor display fields.
    pub profile: Option<ProfileSummary>,
    /// Event display fields, absent once the event is gone.
    pub event: Option<EventSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_use_dotted_names() {
        assert_eq!(AuditAction::EventCreated.to_string(), "event.created");
        assert_eq!(AuditAction::EventUpdated.as_str(), "event.updated");
        assert_eq!(AuditAction::EventDeleted.verb(), "delete");
    }

    #[test]
    fn record_copies_event_and_organization_ids() {
        let actor = Uuid::new_v4();
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            name: "Open Mic".to_string(),
            description: None,
            date: now.date_naive(),
            time: now.time(),
            building_id: None,
            room_number: None,
            organization_id: Some(Uuid::new_v4()),
            thumbnail: None,
            attendance: 0,
            created_at: now,
            updated_at: now,
        };
        let log = EventLog::record(actor, &event, AuditAction::EventCreated);
        assert_eq!(log.profile_id, Some(actor));
        assert_eq!(log.event_id, Some(event.id));
        assert_eq!(log.organization_id, event.organization_id);
        assert_eq!(log.action, "event.created");
    }
}
