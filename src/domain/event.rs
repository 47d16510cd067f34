//! Events hosted by organizations at buildings, and their projections.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::building::BuildingSummary;
use super::event_log::EventLog;
use super::organization::OrganizationSummary;

/// A row of the `events` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Event {
    /// Event identifier.
    pub id: Uuid,
    /// Display name.
    #[schema(example = "Spring Career Fair")]
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Calendar date, serialized as `YYYY-MM-DD`.
    #[schema(value_type = String, example = "2025-04-12")]
    pub date: NaiveDate,
    /// Start time, serialized as `HH:MM:SS`.
    #[schema(value_type = String, example = "18:30:00")]
    pub time: NaiveTime,
    /// Hosting building, if any.
    pub building_id: Option<Uuid>,
    /// Room inside the building.
    pub room_number: Option<String>,
    /// Hosting organization, if any.
    pub organization_id: Option<Uuid>,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Number of attendees, never negative.
    pub attendance: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A validated event ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Calendar date.
    pub date: NaiveDate,
    /// Start time.
    pub time: NaiveTime,
    /// Hosting building.
    pub building_id: Option<Uuid>,
    /// Room inside the building.
    pub room_number: Option<String>,
    /// Hosting organization.
    pub organization_id: Option<Uuid>,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Initial attendance.
    pub attendance: i32,
}

/// A partial update. `None` leaves the column unchanged.
///
/// The hosting organization is deliberately absent: an event cannot be
/// moved to an organization the caller was never authorized against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New start time.
    pub time: Option<NaiveTime>,
    /// New hosting building.
    pub building_id: Option<Uuid>,
    /// New room.
    pub room_number: Option<String>,
    /// New thumbnail.
    pub thumbnail: Option<String>,
    /// New attendance.
    pub attendance: Option<i32>,
}

impl EventPatch {
    /// Returns `true` when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the patch in place, bumping `updated_at`.
    pub fn apply(self, event: &mut Event, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            event.name = name;
        }
        if let Some(description) = self.description {
            event.description = Some(description);
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(building_id) = self.building_id {
            event.building_id = Some(building_id);
        }
        if let Some(room_number) = self.room_number {
            event.room_number = Some(room_number);
        }
        if let Some(thumbnail) = self.thumbnail {
            event.thumbnail = Some(thumbnail);
        }
        if let Some(attendance) = self.attendance {
            event.attendance = attendance;
        }
        event.updated_at = now;
    }
}

/// An event with its hosting building nested in place of `building_id`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EventWithBuilding {
    /// Event identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Calendar date.
    #[schema(value_type = String, example = "2025-04-12")]
    pub date: NaiveDate,
    /// Start time.
    #[schema(value_type = String, example = "18:30:00")]
    pub time: NaiveTime,
    /// Room inside the building.
    pub room_number: Option<String>,
    /// Hosting organization.
    pub organization_id: Option<Uuid>,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Number of attendees.
    pub attendance: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Hosting building display fields.
    pub building: Option<BuildingSummary>,
}

impl EventWithBuilding {
    /// Combines an event row with its (optional) building.
    #[must_use]
    pub fn new(event: Event, building: Option<BuildingSummary>) -> Self {
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            date: event.date,
            time: event.time,
            room_number: event.room_number,
            organization_id: event.organization_id,
            thumbnail: event.thumbnail,
            attendance: event.attendance,
            created_at: event.created_at,
            updated_at: event.updated_at,
            building,
        }
    }
}

/// An event with every related entity joined, returned by `GET /events/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EventDetails {
    /// The event row.
    #[serde(flatten)]
    pub event: Event,
    /// Hosting building.
    pub building: Option<BuildingSummary>,
    /// Hosting organization.
    pub organization: Option<OrganizationSummary>,
    /// Audit trail of the event, newest first.
    pub event_logs: Vec<EventLog>,
}

/// Minimal event fields shown next to a log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EventSummary {
    /// Event identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Calendar date.
    #[schema(value_type = String)]
    pub date: NaiveDate,
    /// Start time.
    #[schema(value_type = String)]
    pub time: NaiveTime,
    /// Hosting organization.
    pub organization_id: Option<Uuid>,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
            date: event.date,
            time: event.time,
            organization_id: event.organization_id,
        }
    }
}
