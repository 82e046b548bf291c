//! Route table.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::api::{handlers, AppState};

/// Build the resource routes.
///
/// # Endpoints
///
/// ## Auth
/// - `POST /users` - Create an account
/// - `POST /sessions/password` - Sign in with e-mail and password
/// - `POST /sessions/github` - Sign in with a GitHub OAuth code
/// - `GET /profile` - The signed-in user
/// - `POST /password/recover` - Request a password recovery code
/// - `POST /password/reset` - Reset a password with a recovery code
///
/// ## Organizations
/// - `POST /organizations`, `GET /organizations`
/// - `GET|PUT|DELETE /organizations/:slug`
/// - `GET /organizations/:slug/membership`
/// - `PATCH /organizations/:slug/owner`
///
/// ## Projects, members, invites, billing
/// - `POST|GET /organizations/:slug/projects`
/// - `GET|PUT|DELETE /organizations/:slug/projects/:project` (slug for GET, id otherwise)
/// - `GET /organizations/:slug/members`, `PUT|DELETE /organizations/:slug/members/:member_id`
/// - `POST|GET /organizations/:slug/invites`, `DELETE /organizations/:slug/invites/:invite_id`
/// - `GET /invites/:invite_id`, `POST /invites/:invite_id/accept|reject`, `GET /pending-invites`
/// - `GET /organizations/:slug/billing`
pub fn router() -> Router<AppState> {
    use handlers::{auth, billing, invites, members, organizations, projects};

    Router::new()
        // Auth
        .route(paths::USERS, post(auth::create_account))
        .route(paths::SESSIONS_PASSWORD, post(auth::authenticate_with_password))
        .route(paths::SESSIONS_GITHUB, post(auth::authenticate_with_github))
        .route(paths::PROFILE, get(auth::get_profile))
        .route(paths::PASSWORD_RECOVER, post(auth::request_password_recover))
        .route(paths::PASSWORD_RESET, post(auth::reset_password))
        // Organizations
        .route(
            paths::ORGANIZATIONS,
            post(organizations::create_organization).get(organizations::get_organizations),
        )
        .route(
            paths::ORGANIZATION,
            get(organizations::get_organization)
                .put(organizations::update_organization)
                .delete(organizations::shutdown_organization),
        )
        .route(paths::MEMBERSHIP, get(organizations::get_membership))
        .route(paths::OWNER, patch(organizations::transfer_organization))
        // Projects
        .route(
            paths::PROJECTS,
            post(projects::create_project).get(projects::get_projects),
        )
        .route(
            paths::PROJECT,
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        // Members
        .route(paths::MEMBERS, get(members::get_members))
        .route(
            paths::MEMBER,
            put(members::update_member).delete(members::remove_member),
        )
        // Invites
        .route(
            paths::ORGANIZATION_INVITES,
            post(invites::create_invite).get(invites::get_invites),
        )
        .route(paths::ORGANIZATION_INVITE, delete(invites::revoke_invite))
        .route(paths::INVITE, get(invites::get_invite))
        .route(paths::INVITE_ACCEPT, post(invites::accept_invite))
        .route(paths::INVITE_REJECT, post(invites::reject_invite))
        .route(paths::PENDING_INVITES, get(invites::get_pending_invites))
        // Billing
        .route(paths::BILLING, get(billing::get_organization_billing))
}

/// Route constants for use in clients and tests.
pub mod paths {
    pub const HEALTH: &str = "/health";
    pub const METRICS: &str = "/metrics";

    // Auth
    pub const USERS: &str = "/users";
    pub const SESSIONS_PASSWORD: &str = "/sessions/password";
    pub const SESSIONS_GITHUB: &str = "/sessions/github";
    pub const PROFILE: &str = "/profile";
    pub const PASSWORD_RECOVER: &str = "/password/recover";
    pub const PASSWORD_RESET: &str = "/password/reset";

    // Organizations
    pub const ORGANIZATIONS: &str = "/organizations";
    pub const ORGANIZATION: &str = "/organizations/:slug";
    pub const MEMBERSHIP: &str = "/organizations/:slug/membership";
    pub const OWNER: &str = "/organizations/:slug/owner";

    // Projects
    pub const PROJECTS: &str = "/organizations/:slug/projects";
    pub const PROJECT: &str = "/organizations/:slug/projects/:project";

    // Members
    pub const MEMBERS: &str = "/organizations/:slug/members";
    pub const MEMBER: &str = "/organizations/:slug/members/:member_id";

    // Invites
    pub const ORGANIZATION_INVITES: &str = "/organizations/:slug/invites";
    pub const ORGANIZATION_INVITE: &str = "/organizations/:slug/invites/:invite_id";
    pub const INVITE: &str = "/invites/:invite_id";
    pub const INVITE_ACCEPT: &str = "/invites/:invite_id/accept";
    pub const INVITE_REJECT: &str = "/invites/:invite_id/reject";
    pub const PENDING_INVITES: &str = "/pending-invites";

    // Billing
    pub const BILLING: &str = "/organizations/:slug/billing";
}
