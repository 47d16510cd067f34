use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use super::rows::{EVENT_WITH_BUILDING, EventBuildingRow, LOG_DETAILS, LogRow, MemberRow};
use crate::domain::{EventLogDetails, EventWithBuilding, MemberDetails, Page, PageRequest};
use crate::error::AppError;
use crate::persistence::AggregationQueries;

#[async_trait]
impl AggregationQueries for PgStore {
    async fn events_by_organization(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventWithBuilding>, AppError> {
        let sql = format!(
            r#"{EVENT_WITH_BUILDING} WHERE e.organization_id = $1 ORDER BY e."date", e."time", e.id LIMIT $2 OFFSET $3"#
        );
        let rows = sqlx::query_as::<_, EventBuildingRow>(&sql)
            .bind(organization_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(Page {
            data: rows.into_iter().map(EventWithBuilding::from).collect(),
            total,
        })
    }

    async fn logs_by_organization(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<EventLogDetails>, AppError> {
        let sql = format!(
            r#"{LOG_DETAILS} WHERE l.organization_id = $1 ORDER BY l."timestamp" DESC, l.id LIMIT $2 OFFSET $3"#
        );
        let rows = sqlx::query_as::<_, LogRow>(&sql)
            .bind(organization_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM event_logs WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(Page {
            data: rows.into_iter().map(EventLogDetails::from).collect(),
            total,
        })
    }

    async fn organization_members(
        &self,
        organization_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<MemberDetails>, AppError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT po.role, p.id, p.email, p.first_name, p.last_name \
             FROM profiles_organizations po JOIN profiles p ON p.id = po.profile_id \
             WHERE po.organization_id = $1 ORDER BY p.email LIMIT $2 OFFSET $3",
        )
        .bind(organization_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM profiles_organizations WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;
        let data = rows
            .into_iter()
            .map(MemberDetails::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page { data, total })
    }
}
