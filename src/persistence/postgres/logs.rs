use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use super::rows::{LOG_DETAILS, LogRow};
use crate::domain::{EventLogDetails, Page, PageRequest};
use crate::error::AppError;
use crate::persistence::EventLogRepository;

impl PgStore {
    /// Pages through logs whose `column` equals `id`, newest first.
    async fn logs_where(
        &self,
        column: &'static str,
        id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        let sql = format!(
            r#"{LOG_DETAILS} WHERE l.{column} = $1 ORDER BY l."timestamp" DESC, l.id LIMIT $2 OFFSET $3"#
        );
        let rows = sqlx::query_as::<_, LogRow>(&sql)
            .bind(id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        let count_sql = format!("SELECT COUNT(*) FROM event_logs WHERE {column} = $1");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(Page {
            data: rows.into_iter().map(EventLogDetails::from).collect(),
            total,
        })
    }
}

#[async_trait]
impl EventLogRepository for PgStore {
    async fn logs_by_event(
        &self,
        event_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        self.logs_where("event_id", event_id, page).await
    }

    async fn logs_by_profile(
        &self,
        profile_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        self.logs_where("profile_id", profile_id, page).await
    }
}
