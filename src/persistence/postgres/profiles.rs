use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use super::rows::like_pattern;
use crate::domain::{NewProfile, Profile, ProfileSummary};
use crate::error::AppError;
use crate::persistence::ProfileRepository;

const PROFILE_COLUMNS: &str = "id, first_name, last_name, email, verified, created_at, updated_at";

#[async_trait]
impl ProfileRepository for PgStore {
    async fn insert_profile(&self, new: NewProfile) -> Result<Profile, AppError> {
        let sql = format!(
            "INSERT INTO profiles (id, email, first_name, last_name) VALUES ($1, $2, $3, $4) \
             RETURNING {PROFILE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .bind(new.id)
            .bind(new.email)
            .bind(new.first_name)
            .bind(new.last_name)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn profile_exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM profiles WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn search_profiles(&self, query: &str) -> Result<Vec<ProfileSummary>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(sqlx::query_as::<_, ProfileSummary>(
            r"SELECT id, email, first_name, last_name FROM profiles WHERE email ILIKE $1 ESCAPE '\' ORDER BY email",
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_profile(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Profile"));
        }
        Ok(())
    }
}
