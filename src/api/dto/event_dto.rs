//! Event DTOs: create and update bodies plus mutation acknowledgements.
//!
//! Dates travel as `YYYY-MM-DD` and times as `HH:MM:SS` strings and are
//! parsed here, so the service layer only ever sees typed values.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::{non_blank, required_text};
use crate::domain::{EventDetails, EventPatch, EventWithBuilding, NewEvent};
use crate::error::AppError;

const NAME_MAX: usize = 255;
const ROOM_MAX: usize = 50;

/// Request body for `POST /events/organization/{organizationId}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Display name.
    #[schema(example = "Spring Career Fair")]
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    #[schema(example = "2025-04-12")]
    pub date: String,
    /// Start time, `HH:MM:SS`.
    #[schema(example = "18:30:00")]
    pub time: String,
    /// Hosting building.
    pub building_id: Option<Uuid>,
    /// Room inside the building.
    pub room_number: Option<String>,
    /// Ignored; the organization in the path wins.
    pub organization_id: Option<Uuid>,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Initial attendance, defaults to 0.
    pub attendance: Option<i32>,
}

impl CreateEventRequest {
    /// Validates the request into a [`NewEvent`] hosted by `organization_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] for an empty or overlong name,
    /// an unparseable date or time, an overlong room or a negative
    /// attendance.
    pub fn into_new(self, organization_id: Uuid) -> Result<NewEvent, AppError> {
        Ok(NewEvent {
            name: required_text("name", &self.name, NAME_MAX)?,
            description: non_blank(self.description),
            date: parse_date(&self.date)?,
            time: parse_time(&self.time)?,
            building_id: self.building_id,
            room_number: room(self.room_number)?,
            organization_id: Some(organization_id),
            thumbnail: non_blank(self.thumbnail),
            attendance: attendance(self.attendance)?.unwrap_or(0),
        })
    }
}

/// Request body for `PATCH /events/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// New start time, `HH:MM:SS`.
    pub time: Option<String>,
    /// New hosting building.
    pub building_id: Option<Uuid>,
    /// New room.
    pub room_number: Option<String>,
    /// New thumbnail URL.
    pub thumbnail: Option<String>,
    /// New attendance.
    pub attendance: Option<i32>,
}

impl UpdateEventRequest {
    /// Validates the request into an [`EventPatch`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] if a present field is invalid
    /// or no field is present at all.
    pub fn into_patch(self) -> Result<EventPatch, AppError> {
        let patch = EventPatch {
            name: self
                .name
                .map(|name| required_text("name", &name, NAME_MAX))
                .transpose()?,
            description: self.description,
            date: self.date.as_deref().map(parse_date).transpose()?,
            time: self.time.as_deref().map(parse_time).transpose()?,
            building_id: self.building_id,
            room_number: room(self.room_number)?,
            thumbnail: self.thumbnail,
            attendance: attendance(self.attendance)?,
        };
        if patch.is_empty() {
            return Err(AppError::InvalidRequest(
                "Update must change at least one field".to_string(),
            ));
        }
        Ok(patch)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidRequest(format!("date must be YYYY-MM-DD, got {raw:?}")))
}

fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S")
        .map_err(|_| AppError::InvalidRequest(format!("time must be HH:MM:SS, got {raw:?}")))
}

fn room(raw: Option<String>) -> Result<Option<String>, AppError> {
    non_blank(raw)
        .map(|r| required_text("room_number", &r, ROOM_MAX))
        .transpose()
}

fn attendance(raw: Option<i32>) -> Result<Option<i32>, AppError> {
    match raw {
        Some(n) if n < 0 => Err(AppError::InvalidRequest(
            "attendance must not be negative".to_string(),
        )),
        other => Ok(other),
    }
}

/// Response of a successful event creation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventCreatedResponse {
    /// Always `true`.
    pub success: bool,
    /// Acknowledgement message.
    pub message: String,
    /// Identifier of the new event.
    pub event_id: Uuid,
}

/// Response of a successful event update, carrying the refreshed event.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventUpdatedResponse {
    /// Always `true`.
    pub success: bool,
    /// Acknowledgement message.
    pub message: String,
    /// The event after the update.
    pub data: EventDetails,
}

/// `{ids, total}` page of event identifiers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventIdsResponse {
    /// Event ids on this page, newest first.
    pub ids: Vec<Uuid>,
    /// Total number of events.
    pub total: i64,
}

/// `{data, total}` page of events with nested buildings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Events on this page.
    pub data: Vec<EventWithBuilding>,
    /// Total number of matching events.
    pub total: i64,
}
