use uuid::Uuid;

use super::models::{AccountProvider, AccountRow, NewUser, TokenKind, TokenRow, UserRow};
use super::Database;
use crate::error::Result;
use crate::rbac::Role;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, avatar_url, created_at, updated_at";

impl Database {
    // ═══════════════════════════════════════════════════════════════════════════
    // User Operations
    // ═══════════════════════════════════════════════════════════════════════════

    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// Insert a user, optionally joining an organization as MEMBER in the
    /// same transaction.
    pub async fn create_user(&self, user: &NewUser, join_organization: Option<Uuid>) -> Result<UserRow> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, avatar_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar_url)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(organization_id) = join_organization {
            sqlx::query(
                "INSERT INTO members (id, role, organization_id, user_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(Role::Member.as_str())
            .bind(organization_id)
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Fill in profile fields that are still empty.
    pub async fn complete_user_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(name, $2),
                avatar_url = COALESCE(avatar_url, $3),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(avatar_url)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Token Operations
    // ═══════════════════════════════════════════════════════════════════════════

    pub async fn create_token(&self, user_id: Uuid, kind: TokenKind) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO tokens (id, type, user_id) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(kind.as_str())
            .bind(user_id)
            .execute(self.pool())
            .await?;

        Ok(id)
    }

    pub async fn find_token(&self, token_id: Uuid, kind: TokenKind) -> Result<Option<TokenRow>> {
        let row = sqlx::query_as::<_, TokenRow>(
            "SELECT id, type, user_id, created_at FROM tokens WHERE id = $1 AND type = $2",
        )
        .bind(token_id)
        .bind(kind.as_str())
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// Set a new password hash and consume the recovery token atomically.
    pub async fn reset_password(&self, token: &TokenRow, password_hash: &str) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(token.user_id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(token.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // OAuth Account Operations
    // ═══════════════════════════════════════════════════════════════════════════

    pub async fn find_account(
        &self,
        provider: AccountProvider,
        user_id: Uuid,
    ) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, provider, provider_account_id, user_id
            FROM accounts
            WHERE provider = $1 AND user_id = $2
            "#,
        )
        .bind(provider.as_str())
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    pub async fn create_account(
        &self,
        provider: AccountProvider,
        provider_account_id: &str,
        user_id: Uuid,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, provider, provider_account_id, user_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(provider.as_str())
        .bind(provider_account_id)
        .bind(user_id)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
