//! Request middleware and extractors.
pub mod auth;

pub use auth::{AuthConfig, AuthError, AuthUser, Authenticator, Claims};
