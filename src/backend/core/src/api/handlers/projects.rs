//! Projects inside an organization.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{created, ok};
use crate::api::{AppState, ValidatedJson};
use crate::db::{NewProject, ProjectRow, ProjectWithOwnerRow};
use crate::error::{ErrorContext, Result};
use crate::rbac::{Action, OrgContext, Resource, ResourceKind, UserId};
use crate::slug::create_slug;
use crate::validation::{
    validate_field, validate_request, MaxLength, Required, Validate, ValidationResult,
};

const PROJECT_NOT_FOUND: &str = "Project not found.";

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    pub description: String,
}

impl Validate for ProjectRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(
                validate_field("name", &self.name)
                    .rule(Required)
                    .rule(MaxLength(255)),
            )
            .field(validate_field("description", &self.description).rule(Required))
            .result()
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectOwner {
    pub id: Uuid,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub avatar_url: Option<String>,
    pub organization_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub owner: ProjectOwner,
}

impl From<ProjectWithOwnerRow> for ProjectResponse {
    fn from(row: ProjectWithOwnerRow) -> Self {
        Self {
            owner: ProjectOwner {
                id: row.owner_id,
                name: row.owner_name,
                avatar_url: row.owner_avatar_url,
            },
            id: row.id,
            name: row.name,
            description: row.description,
            slug: row.slug,
            avatar_url: row.avatar_url,
            organization_id: row.organization_id,
            owner_id: row.owner_id,
            created_at: row.created_at,
        }
    }
}

fn project_resource(project: &ProjectRow) -> Resource {
    Resource::project(UserId::new(project.owner_id))
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug))]
pub async fn create_project(
    State(state): State<AppState>,
    ctx: OrgContext,
    ValidatedJson(body): ValidatedJson<ProjectRequest>,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Create, &Resource::any(ResourceKind::Project))?;

    let project_id = state
        .db
        .create_project(&NewProject {
            slug: create_slug(&body.name),
            name: body.name,
            description: body.description,
            organization_id: ctx.organization.id,
            owner_id: ctx.user_id(),
        })
        .await?;

    info!(project_id = %project_id, "Project created");
    Ok(created(serde_json::json!({ "project_id": project_id })))
}

pub async fn get_projects(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Get, &Resource::any(ResourceKind::Project))?;

    let projects: Vec<ProjectResponse> = state
        .db
        .list_projects(ctx.organization.id)
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(ok(serde_json::json!({ "projects": projects })))
}

pub async fn get_project(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path((_, project_slug)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Get, &Resource::any(ResourceKind::Project))?;

    let project = state
        .db
        .find_project_by_slug(ctx.organization.id, &project_slug)
        .await?
        .context(PROJECT_NOT_FOUND)?;

    Ok(ok(serde_json::json!({ "project": ProjectResponse::from(project) })))
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug, project_id = %project_id))]
pub async fn update_project(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path((_, project_id)): Path<(String, Uuid)>,
    ValidatedJson(body): ValidatedJson<ProjectRequest>,
) -> Result<impl IntoResponse> {
    let project = state
        .db
        .find_project(ctx.organization.id, project_id)
        .await?
        .context(PROJECT_NOT_FOUND)?;

    ctx.authorize(Action::Update, &project_resource(&project))?;

    state
        .db
        .update_project(project.id, &body.name, &body.description)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug, project_id = %project_id))]
pub async fn delete_project(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path((_, project_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse> {
    let project = state
        .db
        .find_project(ctx.organization.id, project_id)
        .await?
        .context(PROJECT_NOT_FOUND)?;

    ctx.authorize(Action::Delete, &project_resource(&project))?;

    state.db.delete_project(project.id).await?;

    info!("Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::{Ability, Role};

    #[test]
    fn test_project_request_validation() {
        let body = ProjectRequest {
            name: "Website".into(),
            description: "Marketing site".into(),
        };
        assert!(body.is_valid());

        let body = ProjectRequest {
            name: String::new(),
            description: String::new(),
        };
        assert_eq!(body.validate().unwrap_err().error_count(), 2);
    }

    fn project(owner_id: Uuid) -> ProjectRow {
        ProjectRow {
            id: Uuid::new_v4(),
            name: "Website".into(),
            description: "Marketing site".into(),
            slug: "website".into(),
            avatar_url: None,
            organization_id: Uuid::new_v4(),
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_project_resource_carries_owner() {
        let owner = Uuid::new_v4();
        assert_eq!(
            project_resource(&project(owner)).owner_id(),
            Some(UserId::new(owner))
        );
    }

    #[test]
    fn test_member_changes_only_own_projects() {
        let me = Uuid::new_v4();
        let member = Ability::for_user(me, Role::Member);
        let mine = project_resource(&project(me));
        let theirs = project_resource(&project(Uuid::new_v4()));

        for action in [Action::Update, Action::Delete] {
            assert!(member.can(action, &mine));
            assert!(member.cannot(action, &theirs));
            assert!(Ability::for_user(me, Role::Admin).can(action, &theirs));
            assert!(Ability::for_user(me, Role::Billing).cannot(action, &mine));
        }
    }

    #[test]
    fn test_response_nests_owner() {
        let owner_id = Uuid::new_v4();
        let response = ProjectResponse::from(ProjectWithOwnerRow {
            id: Uuid::new_v4(),
            name: "Website".into(),
            description: "Marketing site".into(),
            slug: "website".into(),
            avatar_url: None,
            organization_id: Uuid::new_v4(),
            owner_id,
            created_at: Utc::now(),
            owner_name: Some("John".into()),
            owner_avatar_url: None,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["owner"]["id"], serde_json::json!(owner_id));
        assert_eq!(json["owner"]["name"], "John");
    }
}
