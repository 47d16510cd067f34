//! Flat row shapes for joined queries and their conversion to projections.
//!
//! Joined columns are aliased with a table prefix (`b_`, `p_`, `e_`) and
//! are all nullable because every join here is a `LEFT JOIN`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::domain::{
    BuildingSummary, EventLogDetails, EventSummary, EventWithBuilding, MemberDetails, Membership,
    ProfileSummary, Role,
};
use crate::error::AppError;

/// Every column of `events`, in table order.
pub(super) const EVENT_COLUMNS: &str = r#"id, name, description, "date", "time", building_id, room_number, organization_id, thumbnail, attendance, created_at, updated_at"#;

/// Events left-joined with their building.
pub(super) const EVENT_WITH_BUILDING: &str = r#"SELECT e.id, e.name, e.description, e."date", e."time", e.room_number, e.organization_id, e.thumbnail, e.attendance, e.created_at, e.updated_at, b.id AS b_id, b.name AS b_name, b.thumbnail AS b_thumbnail, b.address AS b_address, b.latitude AS b_latitude, b.longitude AS b_longitude FROM events e LEFT JOIN buildings b ON b.id = e.building_id"#;

/// Event logs left-joined with their actor and event.
pub(super) const LOG_DETAILS: &str = r#"SELECT l.id, l.profile_id, l.event_id, l.organization_id, l.action, l."timestamp", p.id AS p_id, p.email AS p_email, p.first_name AS p_first_name, p.last_name AS p_last_name, e.id AS e_id, e.name AS e_name, e."date" AS e_date, e."time" AS e_time, e.organization_id AS e_organization_id FROM event_logs l LEFT JOIN profiles p ON p.id = l.profile_id LEFT JOIN events e ON e.id = l.event_id"#;

#[derive(Debug, sqlx::FromRow)]
pub(super) struct EventBuildingRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    date: NaiveDate,
    time: NaiveTime,
    room_number: Option<String>,
    organization_id: Option<Uuid>,
    thumbnail: Option<String>,
    attendance: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    b_id: Option<Uuid>,
    b_name: Option<String>,
    b_thumbnail: Option<String>,
    b_address: Option<String>,
    b_latitude: Option<f64>,
    b_longitude: Option<f64>,
}

impl From<EventBuildingRow> for EventWithBuilding {
    fn from(row: EventBuildingRow) -> Self {
        let building = match (row.b_id, row.b_name, row.b_latitude, row.b_longitude) {
            (Some(id), Some(name), Some(latitude), Some(longitude)) => Some(BuildingSummary {
                id,
                name,
                thumbnail: row.b_thumbnail,
                address: row.b_address,
                latitude,
                longitude,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            date: row.date,
            time: row.time,
            room_number: row.room_number,
            organization_id: row.organization_id,
            thumbnail: row.thumbnail,
            attendance: row.attendance,
            created_at: row.created_at,
            updated_at: row.updated_at,
            building,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct LogRow {
    id: Uuid,
    profile_id: Option<Uuid>,
    event_id: Option<Uuid>,
    organization_id: Option<Uuid>,
    action: String,
    timestamp: DateTime<Utc>,
    p_id: Option<Uuid>,
    p_email: Option<String>,
    p_first_name: Option<String>,
    p_last_name: Option<String>,
    e_id: Option<Uuid>,
    e_name: Option<String>,
    e_date: Option<NaiveDate>,
    e_time: Option<NaiveTime>,
    e_organization_id: Option<Uuid>,
}

impl From<LogRow> for EventLogDetails {
    fn from(row: LogRow) -> Self {
        let profile = match (row.p_id, row.p_email) {
            (Some(id), Some(email)) => Some(ProfileSummary {
                id,
                email,
                first_name: row.p_first_name,
                last_name: row.p_last_name,
            }),
            _ => None,
        };
        let event = match (row.e_id, row.e_name, row.e_date, row.e_time) {
            (Some(id), Some(name), Some(date), Some(time)) => Some(EventSummary {
                id,
                name,
                date,
                time,
                organization_id: row.e_organization_id,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            profile_id: row.profile_id,
            event_id: row.event_id,
            organization_id: row.organization_id,
            action: row.action,
            timestamp: row.timestamp,
            profile,
            event,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct MemberRow {
    role: String,
    id: Uuid,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl TryFrom<MemberRow> for MemberDetails {
    type Error = AppError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Self {
            role: parse_role(&row.role)?,
            profile: ProfileSummary {
                id: row.id,
                email: row.email,
                first_name: row.first_name,
                last_name: row.last_name,
            },
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct MembershipRow {
    profile_id: Uuid,
    organization_id: Uuid,
    role: String,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = AppError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Self {
            profile_id: row.profile_id,
            organization_id: row.organization_id,
            role: parse_role(&row.role)?,
        })
    }
}

fn parse_role(raw: &str) -> Result<Role, AppError> {
    raw.parse()
        .map_err(|_| AppError::Persistence(format!("unexpected role value in store: {raw}")))
}

/// Escapes `LIKE` wildcards so `query` matches literally.
pub(super) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
