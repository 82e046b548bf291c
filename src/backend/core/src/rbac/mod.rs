//! Role-based access control for organizations.
//!
//! - **Models**: the vocabulary of roles, actions and resources
//! - **Roles**: the static grant table for ADMIN, MEMBER and BILLING
//! - **Policy**: the evaluator answering "can this subject do A on R?"
//! - **Middleware**: the `OrgContext` extractor that resolves the caller's
//!   membership in the `:slug` organization and enforces decisions
//!
//! # Usage
//!
//! ```rust
//! use saas_core::rbac::{evaluate, Ability, Action, Resource, ResourceKind, Role, UserId};
//! use uuid::Uuid;
//!
//! let me = UserId::new(Uuid::new_v4());
//! let ability = Ability::for_user(me, Role::Member);
//!
//! assert!(ability.can(Action::Create, &Resource::any(ResourceKind::Project)));
//! assert!(ability.can(Action::Delete, &Resource::project(me)));
//! assert!(!evaluate(me, Role::Billing, Action::Delete, &Resource::organization(me)));
//! ```

pub mod middleware;
pub mod models;
pub mod policy;
pub mod roles;

pub use middleware::OrgContext;
pub use models::{Action, Resource, ResourceKind, Role, Subject, UserId};
pub use policy::{evaluate, evaluate_str, Ability, PolicyDecision, PolicyError};
pub use roles::{rules_for, Rule, RuleTarget};
