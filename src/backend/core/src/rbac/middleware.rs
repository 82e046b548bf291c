//! Organization-scoped authorization for handlers.
//!
//! [`OrgContext`] authenticates the caller, loads the organization named by
//! the `:slug` (or `:org_slug`) path segment and the caller's membership in
//! it, and builds their [`Ability`]. Handlers then call
//! [`OrgContext::authorize`] before touching the database.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use metrics::counter;
use std::collections::HashMap;
use tracing::{error, warn};
use uuid::Uuid;

use super::models::{Action, Resource, Role};
use super::policy::{Ability, PolicyDecision};
use crate::api::AppState;
use crate::db::{MemberRow, OrganizationRow};
use crate::error::{ApiError, Result};
use crate::middleware::auth::AuthUser;

const NOT_A_MEMBER: &str = "You're not a member of this organization.";

/// The caller, the organization the request targets and their role in it.
#[derive(Debug, Clone)]
pub struct OrgContext {
    pub user: AuthUser,
    pub organization: OrganizationRow,
    pub membership: MemberRow,
    ability: Ability,
}

impl OrgContext {
    /// Build the context from a loaded membership. A stored role outside the
    /// vocabulary grants nothing.
    pub fn new(user: AuthUser, organization: OrganizationRow, membership: MemberRow) -> Result<Self> {
        let role = membership.role().map_err(|e| {
            error!(member_id = %membership.id, error = %e, "Stored member role is invalid");
            ApiError::forbidden("You're not allowed to access this organization.")
        })?;

        Ok(Self {
            ability: Ability::for_user(user.user_id, role),
            user,
            organization,
            membership,
        })
    }

    pub fn user_id(&self) -> Uuid {
        self.user.user_id.0
    }

    pub fn role(&self) -> Role {
        self.ability.subject().role
    }

    pub fn ability(&self) -> &Ability {
        &self.ability
    }

    /// Fail with 403 unless the caller may perform `action` on `resource`.
    pub fn authorize(&self, action: Action, resource: &Resource) -> Result<()> {
        let decision = self.ability.decide(action, resource);
        counter!(
            "permission_decisions_total",
            "decision" => if decision.is_allowed() { "allow" } else { "deny" },
            "action" => action.as_str(),
            "resource" => resource.kind().as_str()
        )
        .increment(1);

        match decision {
            PolicyDecision::Allow => Ok(()),
            PolicyDecision::Deny(reason) => {
                warn!(
                    user_id = %self.user.user_id,
                    organization = %self.organization.slug,
                    action = %action,
                    resource = %resource,
                    reason = %reason,
                    "Permission denied"
                );
                Err(ApiError::forbidden(format!(
                    "You're not allowed to {} {}.",
                    action,
                    resource.kind()
                ))
                .with_internal_message(reason))
            }
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for OrgContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        let slug = params
            .get("slug")
            .or_else(|| params.get("org_slug"))
            .ok_or_else(|| ApiError::bad_request("Missing organization slug."))?;

        let organization =
            require_membership(state.db.find_organization_by_slug(slug).await?)?;
        let membership =
            require_membership(state.db.find_member(organization.id, user.user_id.0).await?)?;

        Self::new(user, organization, membership)
    }
}

/// Unknown organizations and missing memberships look the same to the caller.
fn require_membership<T>(found: Option<T>) -> Result<T> {
    found.ok_or_else(|| ApiError::unauthorized(NOT_A_MEMBER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::Claims;
    use crate::rbac::{ResourceKind, UserId};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};

    fn parts(stored_role: &str) -> (AuthUser, OrganizationRow, MemberRow) {
        let user_id = UserId::new(Uuid::new_v4());
        let organization_id = Uuid::new_v4();
        (
            AuthUser {
                user_id,
                claims: Claims::new(user_id, Duration::hours(1)),
            },
            OrganizationRow {
                id: organization_id,
                name: "Acme".into(),
                slug: "acme".into(),
                domain: None,
                should_attach_users_by_domain: false,
                avatar_url: None,
                owner_id: Uuid::new_v4(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            MemberRow {
                id: Uuid::new_v4(),
                role: stored_role.into(),
                organization_id,
                user_id: user_id.0,
            },
        )
    }

    fn context(role: Role) -> OrgContext {
        let (user, organization, membership) = parts(role.as_str());
        OrgContext::new(user, organization, membership).unwrap()
    }

    #[test]
    fn test_missing_organization_or_membership_is_unauthorized() {
        for error in [
            require_membership(None::<OrganizationRow>).unwrap_err(),
            require_membership(None::<MemberRow>).unwrap_err(),
        ] {
            assert_eq!(error.http_status(), StatusCode::UNAUTHORIZED);
            assert_eq!(error.user_message(), NOT_A_MEMBER);
        }

        let (_, _, membership) = parts("MEMBER");
        assert!(require_membership(Some(membership)).is_ok());
    }

    #[test]
    fn test_stored_role_outside_vocabulary_is_forbidden() {
        let (user, organization, membership) = parts("OWNER");
        let error = OrgContext::new(user, organization, membership).unwrap_err();
        assert_eq!(error.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_member_owns_only_their_projects() {
        let ctx = context(Role::Member);
        let theirs = Resource::project(UserId::new(Uuid::new_v4()));

        assert!(ctx.authorize(Action::Update, &Resource::project(ctx.user.user_id)).is_ok());
        let error = ctx.authorize(Action::Delete, &theirs).unwrap_err();
        assert_eq!(error.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(error.user_message(), "You're not allowed to delete Project.");
    }

    #[test]
    fn test_authorize_allows_granted_action() {
        let ctx = context(Role::Member);
        assert!(ctx
            .authorize(Action::Create, &Resource::any(ResourceKind::Project))
            .is_ok());
        assert!(ctx
            .authorize(Action::Delete, &Resource::project(ctx.user.user_id))
            .is_ok());
    }

    #[test]
    fn test_authorize_denial_is_forbidden() {
        let ctx = context(Role::Billing);
        let error = ctx
            .authorize(Action::Delete, &Resource::organization(UserId::new(Uuid::new_v4())))
            .unwrap_err();

        assert_eq!(error.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(error.user_message(), "You're not allowed to delete Organization.");
        assert!(error.internal_message().is_some());
    }

    #[test]
    fn test_role_accessor() {
        assert_eq!(context(Role::Admin).role(), Role::Admin);
        let ctx = context(Role::Member);
        assert_eq!(ctx.user_id(), ctx.membership.user_id);
    }
}
