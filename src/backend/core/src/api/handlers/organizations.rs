//! Organization lifecycle: creation, listing, settings, shutdown and
//! ownership transfer.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{created, ok};
use crate::api::{AppState, ValidatedJson};
use crate::db::{MemberRow, NewOrganization, OrganizationRow};
use crate::error::{ApiError, ErrorContext, Result};
use crate::middleware::auth::AuthUser;
use crate::rbac::{Action, OrgContext, Resource, UserId};
use crate::slug::create_slug;
use crate::validation::{
    validate_field, validate_request, MaxLength, Required, Validate, ValidationResult,
};

const DOMAIN_TAKEN: &str = "Another organization with same domain already exists.";

#[derive(Debug, Deserialize)]
pub struct OrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub should_attach_users_by_domain: Option<bool>,
}

impl OrganizationRequest {
    /// The domain, with blank values treated as absent.
    fn domain(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(str::trim)
            .filter(|domain| !domain.is_empty())
    }

    /// The domain to store on update: an omitted field keeps `current`,
    /// a blank one clears it.
    fn domain_update<'a>(&'a self, current: Option<&'a str>) -> Option<&'a str> {
        match self.domain {
            None => current,
            Some(_) => self.domain(),
        }
    }
}

impl Validate for OrganizationRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(
                validate_field("name", &self.name)
                    .rule(Required)
                    .rule(MaxLength(255)),
            )
            .field(validate_field("domain", &self.domain).must(
                |domain| {
                    domain
                        .as_deref()
                        .map_or(true, |d| d.trim().is_empty() || d.contains('.'))
                },
                "Invalid domain",
            ))
            .result()
    }
}

#[derive(Debug, Deserialize)]
pub struct TransferOrganizationRequest {
    pub transfer_to_user_id: Uuid,
}

impl Validate for TransferOrganizationRequest {
    fn validate(&self) -> ValidationResult<()> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct OrganizationSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub avatar_url: Option<String>,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: Uuid,
    pub role: String,
    pub user_id: Uuid,
    pub organization_id: Uuid,
}

fn organization_resource(organization: &OrganizationRow) -> Resource {
    Resource::organization(UserId::new(organization.owner_id))
}

fn ensure_domain_available(existing: Option<OrganizationRow>) -> Result<()> {
    match existing {
        Some(_) => Err(ApiError::bad_request(DOMAIN_TAKEN)),
        None => Ok(()),
    }
}

fn transfer_target(membership: Option<MemberRow>) -> Result<MemberRow> {
    membership.context("Target user is not a member of this organization.")
}

#[instrument(skip_all)]
pub async fn create_organization(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<OrganizationRequest>,
) -> Result<impl IntoResponse> {
    let domain = body.domain().map(str::to_string);

    if let Some(domain) = domain.as_deref() {
        ensure_domain_available(state.db.find_organization_by_domain(domain, None).await?)?;
    }

    let organization_id = state
        .db
        .create_organization(&NewOrganization {
            slug: create_slug(&body.name),
            name: body.name,
            domain,
            should_attach_users_by_domain: body.should_attach_users_by_domain.unwrap_or(false),
            owner_id: user.user_id.0,
        })
        .await?;

    info!(organization_id = %organization_id, owner_id = %user.user_id, "Organization created");
    Ok(created(serde_json::json!({ "organization_id": organization_id })))
}

pub async fn get_organizations(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    let organizations: Vec<OrganizationSummary> = state
        .db
        .list_organizations_for_user(user.user_id.0)
        .await?
        .into_iter()
        .map(|row| OrganizationSummary {
            id: row.id,
            name: row.name,
            slug: row.slug,
            avatar_url: row.avatar_url,
            role: row.role,
        })
        .collect();

    Ok(ok(serde_json::json!({ "organizations": organizations })))
}

pub async fn get_organization(ctx: OrgContext) -> Result<impl IntoResponse> {
    Ok(ok(serde_json::json!({ "organization": ctx.organization })))
}

pub async fn get_membership(ctx: OrgContext) -> Result<impl IntoResponse> {
    let membership = MembershipResponse {
        id: ctx.membership.id,
        role: ctx.membership.role,
        user_id: ctx.membership.user_id,
        organization_id: ctx.membership.organization_id,
    };

    Ok(ok(serde_json::json!({ "membership": membership })))
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug))]
pub async fn update_organization(
    State(state): State<AppState>,
    ctx: OrgContext,
    ValidatedJson(body): ValidatedJson<OrganizationRequest>,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Update, &organization_resource(&ctx.organization))?;

    let domain = body.domain_update(ctx.organization.domain.as_deref());
    if let Some(domain) = domain {
        ensure_domain_available(
            state
                .db
                .find_organization_by_domain(domain, Some(ctx.organization.id))
                .await?,
        )?;
    }

    state
        .db
        .update_organization(
            ctx.organization.id,
            &body.name,
            domain,
            body.should_attach_users_by_domain
                .unwrap_or(ctx.organization.should_attach_users_by_domain),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug))]
pub async fn shutdown_organization(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Delete, &organization_resource(&ctx.organization))?;

    state.db.delete_organization(ctx.organization.id).await?;

    info!(organization_id = %ctx.organization.id, "Organization shut down");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(organization = %ctx.organization.slug))]
pub async fn transfer_organization(
    State(state): State<AppState>,
    ctx: OrgContext,
    ValidatedJson(body): ValidatedJson<TransferOrganizationRequest>,
) -> Result<impl IntoResponse> {
    ctx.authorize(
        Action::TransferOwnership,
        &organization_resource(&ctx.organization),
    )?;

    transfer_target(
        state
            .db
            .find_member(ctx.organization.id, body.transfer_to_user_id)
            .await?,
    )?;

    state
        .db
        .transfer_organization(ctx.organization.id, body.transfer_to_user_id)
        .await?;

    info!(
        organization_id = %ctx.organization.id,
        new_owner_id = %body.transfer_to_user_id,
        "Organization ownership transferred"
    );
    Ok(StatusCode::NO_CONTENT)
}
