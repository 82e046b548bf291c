//! Session token authentication.
//!
//! Features:
//! - HS256 JWT issuing and validation (`sub` = user id)
//! - `AuthUser` extractor for handlers that require a signed-in caller
//!
//! # Example
//!
//! ```rust,ignore
//! use saas_core::middleware::auth::AuthUser;
//!
//! async fn profile(user: AuthUser) -> impl IntoResponse {
//!     format!("hello {}", user.user_id)
//! }
//! ```

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::error::{ApiError, ErrorCode};
use crate::rbac::UserId;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication credentials")]
    MissingCredentials,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    fn metric_label(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MissingCredentials => {
                ApiError::new(ErrorCode::Unauthorized, "Invalid auth token")
            }
            AuthError::InvalidToken => ApiError::new(ErrorCode::InvalidToken, "Invalid auth token"),
            AuthError::TokenExpired => {
                ApiError::new(ErrorCode::TokenExpired, "The authentication token has expired")
            }
            AuthError::Internal(message) => ApiError::internal(message),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        counter!(
            "auth_errors_total",
            "error_type" => self.metric_label()
        )
        .increment(1);

        ApiError::from(self).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JWT Claims
// ═══════════════════════════════════════════════════════════════════════════════

/// JWT token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Token ID
    #[serde(default = "generate_jti")]
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

fn generate_jti() -> String {
    Uuid::new_v4().to_string()
}

impl Claims {
    /// Create new claims for a user.
    pub fn new(user_id: UserId, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            jti: generate_jti(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(duration)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp(),
            iss: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// The subject as a user id.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub.parse::<UserId>().map_err(|_| AuthError::InvalidToken)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════════

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,

    pub issuer: Option<String>,

    /// Lifetime of issued tokens
    pub token_ttl: Duration,

    /// Clock skew tolerance in seconds
    pub leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: None,
            token_ttl: Duration::days(7),
            leeway_secs: 60,
        }
    }
}

impl AuthConfig {
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }
}

impl From<&AuthSettings> for AuthConfig {
    fn from(settings: &AuthSettings) -> Self {
        Self {
            jwt_secret: settings.jwt_secret.clone(),
            issuer: Some(settings.issuer.clone()),
            token_ttl: i64::try_from(settings.token_ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            ..Default::default()
        }
    }
}

/// Builder for `AuthConfig`.
#[derive(Default)]
pub struct AuthConfigBuilder {
    config: AuthConfig,
}

impl AuthConfigBuilder {
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.config.issuer = Some(issuer.into());
        self
    }

    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.config.token_ttl = ttl;
        self
    }

    pub fn leeway_secs(mut self, secs: u64) -> Self {
        self.config.leeway_secs = secs;
        self
    }

    pub fn build(self) -> AuthConfig {
        self.config
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Authenticator
// ═══════════════════════════════════════════════════════════════════════════════

/// Issues and validates session tokens.
pub struct Authenticator {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("issuer", &self.config.issuer)
            .field("token_ttl", &self.config.token_ttl)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        if config.jwt_secret.is_empty() {
            return Err(AuthError::Internal(
                "JWT secret required for HMAC algorithms".into(),
            ));
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        if let Some(ref issuer) = config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Authenticate a request from its headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = Self::extract_bearer(headers).ok_or(AuthError::MissingCredentials)?;
        let claims = self.validate_token(token)?;
        let user_id = claims.user_id()?;

        counter!("auth_success_total", "method" => "jwt").increment(1);

        Ok(AuthUser { user_id, claims })
    }

    /// Extract the bearer token from the `Authorization` header.
    pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer ").or_else(|| s.strip_prefix("bearer ")))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("JWT validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Sign claims into a token.
    pub fn generate_token(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Issue a session token for a user.
    pub fn issue_token(&self, user_id: UserId) -> Result<String, AuthError> {
        let mut claims = Claims::new(user_id, self.config.token_ttl);
        if let Some(ref issuer) = self.config.issuer {
            claims = claims.with_issuer(issuer.clone());
        }
        self.generate_token(&claims)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Axum Extractor
// ═══════════════════════════════════════════════════════════════════════════════

/// An authenticated caller.
///
/// Extracting it validates the bearer token; the result is cached in the
/// request extensions so later extractors reuse it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub claims: Claims,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let authenticator = Arc::<Authenticator>::from_ref(state);
        let user = authenticator.authenticate(&parts.headers)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
