use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use super::PgStore;
use super::rows::{EVENT_COLUMNS, EVENT_WITH_BUILDING, EventBuildingRow};
use crate::domain::{
    AuditAction, BuildingSummary, Event, EventDetails, EventLog, EventPatch, EventWithBuilding,
    NewEvent, Organization, OrganizationSummary, Page, PageRequest,
};
use crate::error::AppError;
use crate::persistence::EventRepository;

/// Appends one audit row on the caller's connection or transaction.
async fn append_log(
    conn: &mut PgConnection,
    actor: Uuid,
    event: &Event,
    action: AuditAction,
) -> Result<(), AppError> {
    let log = EventLog::record(actor, event, action);
    sqlx::query(
        r#"INSERT INTO event_logs (id, profile_id, event_id, organization_id, action, "timestamp") VALUES ($1, $2, $3, $4, $5, $6)"#,
    )
    .bind(log.id)
    .bind(log.profile_id)
    .bind(log.event_id)
    .bind(log.organization_id)
    .bind(log.action)
    .bind(log.timestamp)
    .execute(conn)
    .await?;
    Ok(())
}

async fn lock_event(conn: &mut PgConnection, id: Uuid) -> Result<Event, AppError> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Event>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(AppError::NotFound("Event"))
}

#[async_trait]
impl EventRepository for PgStore {
    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_event_details(&self, id: Uuid) -> Result<Option<EventDetails>, AppError> {
        match self.find_event(id).await? {
            Some(event) => Ok(Some(self.event_details(event).await?)),
            None => Ok(None),
        }
    }

    async fn event_details(&self, event: Event) -> Result<EventDetails, AppError> {
        let building = match event.building_id {
            Some(building_id) => sqlx::query_as::<_, (Uuid, String, Option<String>, Option<String>, f64, f64)>(
                "SELECT id, name, thumbnail, address, latitude, longitude FROM buildings WHERE id = $1",
            )
            .bind(building_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|(id, name, thumbnail, address, latitude, longitude)| BuildingSummary {
                id,
                name,
                thumbnail,
                address,
                latitude,
                longitude,
            }),
            None => None,
        };

        let organization = match event.organization_id {
            Some(organization_id) => sqlx::query_as::<_, Organization>(
                "SELECT * FROM organizations WHERE id = $1",
            )
            .bind(organization_id)
            .fetch_optional(&self.pool)
            .await?
            .map(OrganizationSummary::from),
            None => None,
        };

        let event_logs = sqlx::query_as::<_, EventLog>(
            r#"SELECT id, profile_id, event_id, organization_id, action, "timestamp" FROM event_logs WHERE event_id = $1 ORDER BY "timestamp" DESC, id"#,
        )
        .bind(event.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(EventDetails {
            event,
            building,
            organization,
            event_logs,
        })
    }

    async fn event_ids(&self, page: PageRequest) -> Result<Page<Uuid>, AppError> {
        let data = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM events ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(Page { data, total })
    }

    async fn events_by_building(
        &self,
        building_id: Uuid,
    ) -> Result<Vec<EventWithBuilding>, AppError> {
        let sql = format!(
            r#"{EVENT_WITH_BUILDING} WHERE e.building_id = $1 ORDER BY e."date", e."time", e.id"#
        );
        let rows = sqlx::query_as::<_, EventBuildingRow>(&sql)
            .bind(building_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(EventWithBuilding::from).collect())
    }

    async fn insert_event_audited(&self, new: NewEvent, actor: Uuid) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            r#"INSERT INTO events (id, name, description, "date", "time", building_id, room_number, organization_id, thumbnail, attendance)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {EVENT_COLUMNS}"#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.name)
            .bind(new.description)
            .bind(new.date)
            .bind(new.time)
            .bind(new.building_id)
            .bind(new.room_number)
            .bind(new.organization_id)
            .bind(new.thumbnail)
            .bind(new.attendance)
            .fetch_one(&mut *tx)
            .await?;
        append_log(&mut tx, actor, &event, AuditAction::EventCreated).await?;
        tx.commit().await?;
        Ok(event)
    }

    async fn update_event_audited(
        &self,
        id: Uuid,
        patch: EventPatch,
        actor: Uuid,
    ) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut event = lock_event(&mut tx, id).await?;
        patch.apply(&mut event, chrono::Utc::now());

        let sql = format!(
            r#"UPDATE events SET name = $2, description = $3, "date" = $4, "time" = $5, building_id = $6,
               room_number = $7, thumbnail = $8, attendance = $9, updated_at = $10
               WHERE id = $1 RETURNING {EVENT_COLUMNS}"#
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(event.name)
            .bind(event.description)
            .bind(event.date)
            .bind(event.time)
            .bind(event.building_id)
            .bind(event.room_number)
            .bind(event.thumbnail)
            .bind(event.attendance)
            .bind(event.updated_at)
            .fetch_one(&mut *tx)
            .await?;
        append_log(&mut tx, actor, &event, AuditAction::EventUpdated).await?;
        tx.commit().await?;
        Ok(event)
    }

    async fn delete_event_audited(&self, id: Uuid, actor: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, id).await?;
        append_log(&mut tx, actor, &event, AuditAction::EventDeleted).await?;
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
