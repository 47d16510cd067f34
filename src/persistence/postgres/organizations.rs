use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::domain::{NewOrganization, Organization, OrganizationSummary, Role};
use crate::error::AppError;
use crate::persistence::OrganizationRepository;

const ORGANIZATION_COLUMNS: &str = "id, organization_name, email, description, image_url, address, verified, created_at, updated_at";

#[async_trait]
impl OrganizationRepository for PgStore {
    async fn find_organization(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let sql = format!("SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1");
        Ok(sqlx::query_as::<_, Organization>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_organization_with_admin(
        &self,
        new: NewOrganization,
        admin: Uuid,
    ) -> Result<Organization, AppError> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "INSERT INTO organizations (id, organization_name, email, description, image_url, address) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ORGANIZATION_COLUMNS}"
        );
        let organization = sqlx::query_as::<_, Organization>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.organization_name)
            .bind(new.email)
            .bind(new.description)
            .bind(new.image_url)
            .bind(new.address)
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO profiles_organizations (profile_id, organization_id, role) VALUES ($1, $2, $3)",
        )
        .bind(admin)
        .bind(organization.id)
        .bind(Role::Admin.as_str())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(organization)
    }

    async fn organizations_for_profile(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<OrganizationSummary>, AppError> {
        let rows = sqlx::query_as::<_, Organization>(
            "SELECT o.id, o.organization_name, o.email, o.description, o.image_url, o.address, \
             o.verified, o.created_at, o.updated_at \
             FROM organizations o JOIN profiles_organizations po ON po.organization_id = o.id \
             WHERE po.profile_id = $1 ORDER BY o.organization_name, o.id",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(OrganizationSummary::from).collect())
    }
}
