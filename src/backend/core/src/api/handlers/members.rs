//! Organization members.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::ok;
use crate::api::{AppState, ValidatedJson};
use crate::db::MemberWithUserRow;
use crate::error::{ApiError, Result};
use crate::rbac::{Action, OrgContext, Resource, ResourceKind, Role};
use crate::validation::{Validate, ValidationResult};

const MEMBER_NOT_FOUND: &str = "Member not found.";

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub role: Role,
}

impl Validate for UpdateMemberRequest {
    fn validate(&self) -> ValidationResult<()> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl From<MemberWithUserRow> for MemberResponse {
    fn from(row: MemberWithUserRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            role: row.role,
            name: row.name,
            email: row.email,
            avatar_url: row.avatar_url,
        }
    }
}

pub async fn get_members(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Get, &Resource::any(ResourceKind::Member))?;

    let members: Vec<MemberResponse> = state
        .db
        .list_members(ctx.organization.id)
        .await?
        .into_iter()
        .map(MemberResponse::from)
        .collect();

    Ok(ok(serde_json::json!({ "members": members })))
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug, member_id = %member_id))]
pub async fn update_member(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path((_, member_id)): Path<(String, Uuid)>,
    ValidatedJson(body): ValidatedJson<UpdateMemberRequest>,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Update, &Resource::any(ResourceKind::Member))?;

    if !state
        .db
        .update_member_role(ctx.organization.id, member_id, body.role)
        .await?
    {
        return Err(ApiError::bad_request(MEMBER_NOT_FOUND));
    }

    info!(role = %body.role, "Member role updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug, member_id = %member_id))]
pub async fn remove_member(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path((_, member_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Delete, &Resource::any(ResourceKind::Member))?;

    if !state
        .db
        .delete_member(ctx.organization.id, member_id)
        .await?
    {
        return Err(ApiError::bad_request(MEMBER_NOT_FOUND));
    }

    info!("Member removed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_accepts_known_roles_only() {
        let body: UpdateMemberRequest = serde_json::from_str(r#"{"role": "BILLING"}"#).unwrap();
        assert_eq!(body.role, Role::Billing);
        assert!(serde_json::from_str::<UpdateMemberRequest>(r#"{"role": "OWNER"}"#).is_err());
    }
}
