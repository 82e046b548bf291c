//! Request handlers, grouped by resource.
//!
//! Each handler validates its input, resolves the caller (and their
//! organization membership where the route is organization-scoped), checks
//! the permission, then performs its database work.

pub mod auth;
pub mod billing;
pub mod health;
pub mod invites;
pub mod members;
pub mod organizations;
pub mod projects;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::ApiResponse;

/// 201 with the success envelope.
pub(crate) fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// 200 with the success envelope.
pub(crate) fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// The part of an e-mail address after the `@`.
pub(crate) fn email_domain(email: &str) -> Option<&str> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("john@acme.com"), Some("acme.com"));
        assert_eq!(email_domain("odd@name@acme.com"), Some("acme.com"));
        assert_eq!(email_domain("john@"), None);
        assert_eq!(email_domain("john"), None);
    }
}
