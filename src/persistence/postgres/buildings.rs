use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::domain::{Building, NewBuilding, Page, PageRequest};
use crate::error::AppError;
use crate::persistence::BuildingRepository;

const BUILDING_COLUMNS: &str =
    "id, name, thumbnail, address, latitude, longitude, created_at, updated_at";

#[async_trait]
impl BuildingRepository for PgStore {
    async fn insert_building(&self, new: NewBuilding) -> Result<Building, AppError> {
        let sql = format!(
            "INSERT INTO buildings (id, name, thumbnail, address, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {BUILDING_COLUMNS}"
        );
        let building = sqlx::query_as::<_, Building>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.name)
            .bind(new.thumbnail)
            .bind(new.address)
            .bind(new.latitude)
            .bind(new.longitude)
            .fetch_one(&self.pool)
            .await?;
        Ok(building)
    }

    async fn find_building(&self, id: Uuid) -> Result<Option<Building>, AppError> {
        let sql = format!("SELECT {BUILDING_COLUMNS} FROM buildings WHERE id = $1");
        Ok(sqlx::query_as::<_, Building>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_buildings(&self, page: PageRequest) -> Result<Page<Building>, AppError> {
        let sql = format!(
            "SELECT {BUILDING_COLUMNS} FROM buildings \
             ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        );
        let data = sqlx::query_as::<_, Building>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM buildings")
            .fetch_one(&self.pool)
            .await?;
        Ok(Page { data, total })
    }
}
