//! Invitations: issued inside an organization, answered by the invitee.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{created, email_domain, ok};
use crate::api::{AppState, ValidatedJson};
use crate::db::{InviteDetailsRow, InviteRow, NewInvite, OrganizationRow, UserRow};
use crate::error::{ApiError, ErrorContext, Result};
use crate::middleware::auth::AuthUser;
use crate::rbac::{Action, OrgContext, Resource, ResourceKind, Role};
use crate::validation::{validate_field, Email, Validate, ValidationResult};

const INVITE_NOT_FOUND: &str = "Invite not found.";

#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    pub email: String,
    pub role: Role,
}

impl Validate for CreateInviteRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_field("email", &self.email).rule(Email).result()
    }
}

#[derive(Debug, Serialize)]
pub struct InviteAuthor {
    pub id: Uuid,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InviteOrganization {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub author: Option<InviteAuthor>,
    pub organization: InviteOrganization,
}

impl From<InviteDetailsRow> for InviteResponse {
    fn from(row: InviteDetailsRow) -> Self {
        Self {
            author: row.author_id.map(|id| InviteAuthor {
                id,
                name: row.author_name,
                avatar_url: row.author_avatar_url,
            }),
            id: row.id,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
            organization: InviteOrganization {
                name: row.organization_name,
            },
        }
    }
}

/// Users from an auto-join domain need no invite.
fn ensure_not_auto_joined(organization: &OrganizationRow, email: &str) -> Result<()> {
    if !organization.attaches_email(email) {
        return Ok(());
    }

    Err(ApiError::bad_request(format!(
        "Users with \"{}\" domain will join your organization automatically on login.",
        email_domain(email).unwrap_or_default()
    )))
}

/// Invites are answered only by the exact address they were sent to.
fn ensure_invite_recipient(invite: &InviteRow, caller: &UserRow) -> Result<()> {
    if invite.email != caller.email {
        return Err(ApiError::bad_request("This invite belongs to another user."));
    }
    Ok(())
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug))]
pub async fn create_invite(
    State(state): State<AppState>,
    ctx: OrgContext,
    ValidatedJson(body): ValidatedJson<CreateInviteRequest>,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Create, &Resource::any(ResourceKind::Invite))?;

    let organization = &ctx.organization;
    ensure_not_auto_joined(organization, &body.email)?;

    if state
        .db
        .find_invite_by_email(organization.id, &body.email)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request(
            "Another invite with same e-mail already exists.",
        ));
    }

    if state
        .db
        .find_member_by_email(organization.id, &body.email)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request(
            "A member with this e-mail already belongs to your organization.",
        ));
    }

    let invite_id = state
        .db
        .create_invite(&NewInvite {
            email: body.email,
            role: body.role,
            author_id: ctx.user_id(),
            organization_id: organization.id,
        })
        .await?;

    info!(invite_id = %invite_id, role = %body.role, "Invite created");
    Ok(created(serde_json::json!({ "invite_id": invite_id })))
}

pub async fn get_invites(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Get, &Resource::any(ResourceKind::Invite))?;

    let invites: Vec<InviteResponse> = state
        .db
        .list_invites(ctx.organization.id)
        .await?
        .into_iter()
        .map(InviteResponse::from)
        .collect();

    Ok(ok(serde_json::json!({ "invites": invites })))
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug, invite_id = %invite_id))]
pub async fn revoke_invite(
    State(state): State<AppState>,
    ctx: OrgContext,
    Path((_, invite_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Delete, &Resource::any(ResourceKind::Invite))?;

    let invite = state
        .db
        .find_invite(invite_id)
        .await?
        .filter(|invite| invite.organization_id == ctx.organization.id)
        .context(INVITE_NOT_FOUND)?;

    state.db.delete_invite(invite.id).await?;

    info!("Invite revoked");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_invite(
    State(state): State<AppState>,
    Path(invite_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let invite = state
        .db
        .find_invite_details(invite_id)
        .await?
        .context(INVITE_NOT_FOUND)?;

    Ok(ok(serde_json::json!({ "invite": InviteResponse::from(invite) })))
}

/// Load an invite and the caller, checking the invite is addressed to them.
async fn invite_for_caller(
    state: &AppState,
    user: &AuthUser,
    invite_id: Uuid,
) -> Result<(InviteRow, UserRow)> {
    let invite = state
        .db
        .find_invite(invite_id)
        .await?
        .context("Invite not found or expired.")?;

    let caller = state
        .db
        .find_user_by_id(user.user_id.0)
        .await?
        .context("User not found.")?;

    ensure_invite_recipient(&invite, &caller)?;

    Ok((invite, caller))
}

#[instrument(skip_all, fields(invite_id = %invite_id))]
pub async fn accept_invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invite_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (invite, caller) = invite_for_caller(&state, &user, invite_id).await?;

    // Stored invites always carry a valid role; refuse to create a broken membership.
    invite
        .role()
        .map_err(|e| ApiError::internal(format!("Invite has an invalid role: {}", e)))?;

    state.db.accept_invite(&invite, caller.id).await?;

    info!(organization_id = %invite.organization_id, "Invite accepted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(invite_id = %invite_id))]
pub async fn reject_invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invite_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (invite, _) = invite_for_caller(&state, &user, invite_id).await?;

    state.db.delete_invite(invite.id).await?;

    info!("Invite rejected");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_pending_invites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    let caller = state
        .db
        .find_user_by_id(user.user_id.0)
        .await?
        .context("User not found.")?;

    let invites: Vec<InviteResponse> = state
        .db
        .list_pending_invites(&caller.email)
        .await?
        .into_iter()
        .map(InviteResponse::from)
        .collect();

    Ok(ok(serde_json::json!({ "invites": invites })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn details(author_id: Option<Uuid>) -> InviteDetailsRow {
        InviteDetailsRow {
            id: Uuid::new_v4(),
            email: "jane@acme.com".into(),
            role: "MEMBER".into(),
            created_at: Utc::now(),
            author_id,
            author_name: Some("John".into()),
            author_avatar_url: None,
            organization_name: "Acme Inc".into(),
        }
    }

    #[test]
    fn test_response_includes_author_when_present() {
        let author = Uuid::new_v4();
        let response = InviteResponse::from(details(Some(author)));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["author"]["id"], serde_json::json!(author));
        assert_eq!(json["organization"]["name"], "Acme Inc");
    }

    #[test]
    fn test_response_without_author() {
        let response = InviteResponse::from(details(None));
        assert!(response.author.is_none());
    }

    fn invite(email: &str) -> InviteRow {
        InviteRow {
            id: Uuid::new_v4(),
            email: email.into(),
            role: "MEMBER".into(),
            author_id: None,
            organization_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn user(email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: Some("Jane".into()),
            email: email.into(),
            password_hash: None,
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn organization(domain: Option<&str>, attach: bool) -> OrganizationRow {
        OrganizationRow {
            id: Uuid::new_v4(),
            name: "Acme Inc".into(),
            slug: "acme-inc".into(),
            domain: domain.map(str::to_string),
            should_attach_users_by_domain: attach,
            avatar_url: None,
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_invite_answered_by_its_recipient() {
        assert!(ensure_invite_recipient(&invite("jane@acme.com"), &user("jane@acme.com")).is_ok());
    }

    #[test]
    fn test_invite_for_another_address_is_rejected() {
        let error =
            ensure_invite_recipient(&invite("jane@acme.com"), &user("john@acme.com")).unwrap_err();
        assert_eq!(error.code(), ErrorCode::BadRequest);
        assert_eq!(error.user_message(), "This invite belongs to another user.");
    }

    #[test]
    fn test_invite_recipient_match_is_exact() {
        // Same rule as the SQL lookups behind pending invites and duplicates.
        assert!(ensure_invite_recipient(&invite("Jane@acme.com"), &user("jane@acme.com")).is_err());
    }

    #[test]
    fn test_auto_join_domain_rejects_invite() {
        let acme = organization(Some("acme.com"), true);
        let error = ensure_not_auto_joined(&acme, "jane@acme.com").unwrap_err();
        assert_eq!(error.code(), ErrorCode::BadRequest);
        assert_eq!(
            error.user_message(),
            "Users with \"acme.com\" domain will join your organization automatically on login."
        );

        assert!(ensure_not_auto_joined(&acme, "jane@gmail.com").is_ok());
        assert!(ensure_not_auto_joined(&organization(Some("acme.com"), false), "jane@acme.com").is_ok());
    }

    #[test]
    fn test_create_invite_validation() {
        let body: CreateInviteRequest =
            serde_json::from_str(r#"{"email": "not-an-email", "role": "MEMBER"}"#).unwrap();
        assert!(body.validate().unwrap_err().has_errors("email"));
    }
}
