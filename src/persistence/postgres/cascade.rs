use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::PgStore;
use crate::error::AppError;
use crate::persistence::{CascadeStore, CascadeTx};

/// An open transaction. Dropping it without [`CascadeTx::commit`] makes
/// sqlx roll it back.
struct PgCascadeTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CascadeStore for PgStore {
    async fn begin_cascade(&self) -> Result<Box<dyn CascadeTx>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgCascadeTx { tx }))
    }
}

#[async_trait]
impl CascadeTx for PgCascadeTx {
    async fn events_for_building(&mut self, building_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM events WHERE building_id = $1 FOR UPDATE")
                .bind(building_id)
                .fetch_all(&mut *self.tx)
                .await?,
        )
    }

    async fn delete_logs_for_event(&mut self, event_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM event_logs WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_events_for_building(&mut self, building_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE building_id = $1")
            .bind(building_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_building(&mut self, building_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM buildings WHERE id = $1")
            .bind(building_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
