#![allow(clippy::result_large_err)]
//! # SaaS Core
//!
//! HTTP API for a multi-tenant SaaS backend.
//!
//! ## Architecture
//!
//! - **RBAC**: Static grant table and a pure permission evaluator for the
//!   ADMIN, MEMBER and BILLING roles
//! - **API**: Axum routes for accounts, organizations, projects, members,
//!   invites and billing
//! - **Database**: PostgreSQL access through sqlx with embedded migrations
//! - **Middleware**: JWT session authentication
//! - **Validation**: Request validation with field-level errors
//! - **Observability**: Structured logging, OTLP tracing and Prometheus metrics

pub mod api;
pub mod billing;
pub mod config;
pub mod db;
pub mod error;
pub mod github;
pub mod middleware;
pub mod observability;
pub mod password;
pub mod rbac;
pub mod slug;
pub mod validation;

pub use error::{ApiError, ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{build_router, ApiResponse, AppState};
    pub use crate::config::Config;
    pub use crate::db::Database;
    pub use crate::error::{ApiError, ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, Result};
    pub use crate::middleware::{AuthConfig, AuthError, AuthUser, Authenticator, Claims};
    pub use crate::rbac::{
        evaluate, evaluate_str, Ability, Action, OrgContext, PolicyDecision, PolicyError,
        Resource, ResourceKind, Role, Subject, UserId,
    };
    pub use crate::validation::{
        validate_field, validate_request, Email, FieldError, MaxLength, MinLength, Required,
        Validate, ValidationErrorKind, ValidationErrors, ValidationResult, ValidationRule,
    };
}
