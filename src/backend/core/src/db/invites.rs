use uuid::Uuid;

use super::models::{InviteDetailsRow, InviteRow, NewInvite};
use super::Database;
use crate::error::Result;

const INVITE_DETAILS: &str = r#"
    SELECT i.id, i.email, i.role, i.created_at, i.author_id,
           u.name AS author_name, u.avatar_url AS author_avatar_url,
           o.name AS organization_name
    FROM invites i
    JOIN organizations o ON o.id = i.organization_id
    LEFT JOIN users u ON u.id = i.author_id
"#;

impl Database {
    // ═══════════════════════════════════════════════════════════════════════════
    // Invite Operations
    // ═══════════════════════════════════════════════════════════════════════════

    pub async fn find_invite(&self, invite_id: Uuid) -> Result<Option<InviteRow>> {
        let row = sqlx::query_as::<_, InviteRow>(
            r#"
            SELECT id, email, role, author_id, organization_id, created_at
            FROM invites
            WHERE id = $1
            "#,
        )
        .bind(invite_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    pub async fn find_invite_by_email(
        &self,
        organization_id: Uuid,
        email: &str,
    ) -> Result<Option<InviteRow>> {
        let row = sqlx::query_as::<_, InviteRow>(
            r#"
            SELECT id, email, role, author_id, organization_id, created_at
            FROM invites
            WHERE organization_id = $1 AND email = $2
            "#,
        )
        .bind(organization_id)
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    pub async fn find_invite_details(&self, invite_id: Uuid) -> Result<Option<InviteDetailsRow>> {
        let row = sqlx::query_as::<_, InviteDetailsRow>(&format!("{INVITE_DETAILS} WHERE i.id = $1"))
            .bind(invite_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row)
    }

    /// Newest first.
    pub async fn list_invites(&self, organization_id: Uuid) -> Result<Vec<InviteDetailsRow>> {
        let rows = sqlx::query_as::<_, InviteDetailsRow>(&format!(
            "{INVITE_DETAILS} WHERE i.organization_id = $1 ORDER BY i.created_at DESC"
        ))
        .bind(organization_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Invites addressed to an e-mail, across organizations.
    pub async fn list_pending_invites(&self, email: &str) -> Result<Vec<InviteDetailsRow>> {
        let rows = sqlx::query_as::<_, InviteDetailsRow>(&format!(
            "{INVITE_DETAILS} WHERE i.email = $1 ORDER BY i.created_at DESC"
        ))
        .bind(email)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    pub async fn create_invite(&self, invite: &NewInvite) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO invites (id, email, role, author_id, organization_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&invite.email)
        .bind(invite.role.as_str())
        .bind(invite.author_id)
        .bind(invite.organization_id)
        .execute(self.pool())
        .await?;

        Ok(id)
    }

    pub async fn delete_invite(&self, invite_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM invites WHERE id = $1")
            .bind(invite_id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Turn an invite into a membership atomically.
    pub async fn accept_invite(&self, invite: &InviteRow, user_id: Uuid) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO members (id, role, organization_id, user_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(&invite.role)
        .bind(invite.organization_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM invites WHERE id = $1")
            .bind(invite.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
