use uuid::Uuid;

use super::models::{NewProject, ProjectRow, ProjectWithOwnerRow};
use super::Database;
use crate::error::Result;

const PROJECT_WITH_OWNER: &str = r#"
    SELECT p.id, p.name, p.description, p.slug, p.avatar_url, p.organization_id,
           p.owner_id, p.created_at, u.name AS owner_name, u.avatar_url AS owner_avatar_url
    FROM projects p
    JOIN users u ON u.id = p.owner_id
"#;

impl Database {
    // ═══════════════════════════════════════════════════════════════════════════
    // Project Operations
    // ═══════════════════════════════════════════════════════════════════════════

    pub async fn create_project(&self, project: &NewProject) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, slug, organization_id, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.slug)
        .bind(project.organization_id)
        .bind(project.owner_id)
        .execute(self.pool())
        .await?;

        Ok(id)
    }

    pub async fn find_project(&self, organization_id: Uuid, project_id: Uuid) -> Result<Option<ProjectRow>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, slug, avatar_url, organization_id, owner_id,
                   created_at, updated_at
            FROM projects
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(project_id)
        .bind(organization_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    pub async fn find_project_by_slug(
        &self,
        organization_id: Uuid,
        slug: &str,
    ) -> Result<Option<ProjectWithOwnerRow>> {
        let row = sqlx::query_as::<_, ProjectWithOwnerRow>(&format!(
            "{PROJECT_WITH_OWNER} WHERE p.slug = $1 AND p.organization_id = $2"
        ))
        .bind(slug)
        .bind(organization_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// Newest first.
    pub async fn list_projects(&self, organization_id: Uuid) -> Result<Vec<ProjectWithOwnerRow>> {
        let rows = sqlx::query_as::<_, ProjectWithOwnerRow>(&format!(
            "{PROJECT_WITH_OWNER} WHERE p.organization_id = $1 ORDER BY p.created_at DESC"
        ))
        .bind(organization_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    pub async fn update_project(&self, project_id: Uuid, name: &str, description: &str) -> Result<()> {
        sqlx::query(
            "UPDATE projects SET name = $2, description = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(project_id)
        .bind(name)
        .bind(description)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn delete_project(&self, project_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn count_projects(&self, organization_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE organization_id = $1")
            .bind(organization_id)
            .fetch_one(self.pool())
            .await?;

        Ok(count)
    }
}
