use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use super::rows::MembershipRow;
use crate::domain::Membership;
use crate::error::AppError;
use crate::persistence::MembershipRepository;

#[async_trait]
impl MembershipRepository for PgStore {
    async fn find_membership(
        &self,
        profile_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        sqlx::query_as::<_, MembershipRow>(
            "SELECT profile_id, organization_id, role FROM profiles_organizations \
             WHERE profile_id = $1 AND organization_id = $2",
        )
        .bind(profile_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Membership::try_from)
        .transpose()
    }

    async fn upsert_membership(&self, membership: Membership) -> Result<Membership, AppError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            "INSERT INTO profiles_organizations (profile_id, organization_id, role) VALUES ($1, $2, $3) \
             ON CONFLICT (profile_id, organization_id) DO UPDATE SET role = EXCLUDED.role \
             RETURNING profile_id, organization_id, role",
        )
        .bind(membership.profile_id)
        .bind(membership.organization_id)
        .bind(membership.role.as_str())
        .fetch_one(&self.pool)
        .await?;
        Membership::try_from(row)
    }

    async fn delete_membership(
        &self,
        profile_id: Uuid,
        organization_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM profiles_organizations WHERE profile_id = $1 AND organization_id = $2",
        )
        .bind(profile_id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Profile-Organization relationship"));
        }
        Ok(())
    }
}
