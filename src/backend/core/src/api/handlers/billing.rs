//! Organization billing summary.

use axum::{extract::State, response::IntoResponse};

use super::ok;
use crate::api::AppState;
use crate::billing::Billing;
use crate::error::Result;
use crate::rbac::{Action, OrgContext, Resource, ResourceKind};

pub async fn get_organization_billing(
    State(state): State<AppState>,
    ctx: OrgContext,
) -> Result<impl IntoResponse> {
    ctx.authorize(Action::Get, &Resource::any(ResourceKind::Billing))?;

    let (seats, projects) = futures::try_join!(
        state.db.count_billable_members(ctx.organization.id),
        state.db.count_projects(ctx.organization.id),
    )?;

    let billing = Billing::compute(seats.max(0) as u64, projects.max(0) as u64);
    Ok(ok(serde_json::json!({ "billing": billing })))
}
