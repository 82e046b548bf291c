use uuid::Uuid;

use super::models::{NewOrganization, OrganizationRow, UserOrganizationRow};
use super::Database;
use crate::error::Result;
use crate::rbac::Role;

const ORGANIZATION_COLUMNS: &str = "id, name, slug, domain, should_attach_users_by_domain, \
     avatar_url, owner_id, created_at, updated_at";

impl Database {
    // ═══════════════════════════════════════════════════════════════════════════
    // Organization Operations
    // ═══════════════════════════════════════════════════════════════════════════

    pub async fn find_organization_by_slug(&self, slug: &str) -> Result<Option<OrganizationRow>> {
        let row = sqlx::query_as::<_, OrganizationRow>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// Find the organization using `domain`, optionally ignoring one organization.
    pub async fn find_organization_by_domain(
        &self,
        domain: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<OrganizationRow>> {
        let row = sqlx::query_as::<_, OrganizationRow>(&format!(
            r#"
            SELECT {ORGANIZATION_COLUMNS}
            FROM organizations
            WHERE domain = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#
        ))
        .bind(domain)
        .bind(excluding)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// The organization new users with this e-mail domain join automatically.
    pub async fn find_auto_join_organization(&self, domain: &str) -> Result<Option<OrganizationRow>> {
        let row = sqlx::query_as::<_, OrganizationRow>(&format!(
            r#"
            SELECT {ORGANIZATION_COLUMNS}
            FROM organizations
            WHERE domain = $1 AND should_attach_users_by_domain = TRUE
            "#
        ))
        .bind(domain)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// Insert an organization and make its owner an ADMIN member.
    pub async fn create_organization(&self, organization: &NewOrganization) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO organizations (id, name, slug, domain, should_attach_users_by_domain, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&organization.name)
        .bind(&organization.slug)
        .bind(&organization.domain)
        .bind(organization.should_attach_users_by_domain)
        .bind(organization.owner_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO members (id, role, organization_id, user_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(Role::Admin.as_str())
        .bind(id)
        .bind(organization.owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    pub async fn list_organizations_for_user(&self, user_id: Uuid) -> Result<Vec<UserOrganizationRow>> {
        let rows = sqlx::query_as::<_, UserOrganizationRow>(
            r#"
            SELECT o.id, o.name, o.slug, o.avatar_url, m.role
            FROM organizations o
            JOIN members m ON m.organization_id = o.id
            WHERE m.user_id = $1
            ORDER BY o.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    pub async fn update_organization(
        &self,
        organization_id: Uuid,
        name: &str,
        domain: Option<&str>,
        should_attach_users_by_domain: bool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE organizations
            SET name = $2, domain = $3, should_attach_users_by_domain = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(organization_id)
        .bind(name)
        .bind(domain)
        .bind(should_attach_users_by_domain)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Delete an organization; members, projects and invites cascade.
    pub async fn delete_organization(&self, organization_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(organization_id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Promote the new owner to ADMIN and hand over ownership atomically.
    pub async fn transfer_organization(&self, organization_id: Uuid, new_owner_id: Uuid) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("UPDATE members SET role = $3 WHERE organization_id = $1 AND user_id = $2")
            .bind(organization_id)
            .bind(new_owner_id)
            .bind(Role::Admin.as_str())
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE organizations SET owner_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(organization_id)
            .bind(new_owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
