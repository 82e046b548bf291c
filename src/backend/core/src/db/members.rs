use uuid::Uuid;

use super::models::{MemberRow, MemberWithUserRow};
use super::Database;
use crate::error::Result;
use crate::rbac::Role;

impl Database {
    // ═══════════════════════════════════════════════════════════════════════════
    // Member Operations
    // ═══════════════════════════════════════════════════════════════════════════

    pub async fn find_member(&self, organization_id: Uuid, user_id: Uuid) -> Result<Option<MemberRow>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, role, organization_id, user_id
            FROM members
            WHERE organization_id = $1 AND user_id = $2
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    pub async fn find_member_by_email(
        &self,
        organization_id: Uuid,
        email: &str,
    ) -> Result<Option<MemberRow>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.id, m.role, m.organization_id, m.user_id
            FROM members m
            JOIN users u ON u.id = m.user_id
            WHERE m.organization_id = $1 AND u.email = $2
            "#,
        )
        .bind(organization_id)
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// Members with their user profile, grouped by role.
    pub async fn list_members(&self, organization_id: Uuid) -> Result<Vec<MemberWithUserRow>> {
        let rows = sqlx::query_as::<_, MemberWithUserRow>(
            r#"
            SELECT m.id, m.role, m.user_id, u.name, u.email, u.avatar_url
            FROM members m
            JOIN users u ON u.id = m.user_id
            WHERE m.organization_id = $1
            ORDER BY m.role ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Returns `false` when no member with that id belongs to the organization.
    pub async fn update_member_role(&self, organization_id: Uuid, member_id: Uuid, role: Role) -> Result<bool> {
        let result = sqlx::query("UPDATE members SET role = $3 WHERE id = $2 AND organization_id = $1")
            .bind(organization_id)
            .bind(member_id)
            .bind(role.as_str())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` when no member with that id belongs to the organization.
    pub async fn delete_member(&self, organization_id: Uuid, member_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = $2 AND organization_id = $1")
            .bind(organization_id)
            .bind(member_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Members occupying a paid seat (everyone except BILLING).
    pub async fn count_billable_members(&self, organization_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE organization_id = $1 AND role <> $2",
        )
        .bind(organization_id)
        .bind(Role::Billing.as_str())
        .fetch_one(self.pool())
        .await?;

        Ok(count)
    }
}
