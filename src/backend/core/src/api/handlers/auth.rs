//! Account creation, sign-in and password recovery.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{created, email_domain, ok};
use crate::api::{AppState, ValidatedJson};
use crate::db::{AccountProvider, NewUser, TokenKind, UserRow};
use crate::error::{ApiError, ErrorContext, Result};
use crate::middleware::auth::AuthUser;
use crate::password::{hash_password, verify_password};
use crate::rbac::UserId;
use crate::validation::{
    validate_field, validate_request, Email, MinLength, Required, Validate, ValidationResult,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

// ═══════════════════════════════════════════════════════════════════════════════
// DTOs
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validate for CreateAccountRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(Required))
            .field(validate_field("email", &self.email).rule(Email))
            .field(validate_field("password", &self.password).rule(MinLength(6)))
            .result()
    }
}

#[derive(Debug, Deserialize)]
pub struct PasswordSessionRequest {
    pub email: String,
    pub password: String,
}

impl Validate for PasswordSessionRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("email", &self.email).rule(Email))
            .field(validate_field("password", &self.password).rule(Required))
            .result()
    }
}

#[derive(Debug, Deserialize)]
pub struct GithubSessionRequest {
    pub code: String,
}

impl Validate for GithubSessionRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_field("code", &self.code).rule(Required).result()
    }
}

#[derive(Debug, Deserialize)]
pub struct PasswordRecoverRequest {
    pub email: String,
}

impl Validate for PasswordRecoverRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_field("email", &self.email).rule(Email).result()
    }
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub code: Uuid,
    pub password: String,
}

impl Validate for PasswordResetRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_field("password", &self.password)
            .rule(MinLength(6))
            .result()
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: ProfileUser,
}

#[derive(Debug, Serialize)]
pub struct ProfileUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl From<UserRow> for ProfileUser {
    fn from(user: UserRow) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Handlers
// ═══════════════════════════════════════════════════════════════════════════════

#[instrument(skip_all)]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateAccountRequest>,
) -> Result<impl IntoResponse> {
    if state.db.find_user_by_email(&body.email).await?.is_some() {
        return Err(ApiError::bad_request("User with same e-mail already exists."));
    }

    let auto_join = match email_domain(&body.email) {
        Some(domain) => state.db.find_auto_join_organization(domain).await?,
        None => None,
    };
    let auto_join = auto_join.filter(|organization| organization.attaches_email(&body.email));

    let password_hash = hash_password(body.password).await?;
    let user = state
        .db
        .create_user(
            &NewUser {
                name: Some(body.name),
                email: body.email,
                password_hash: Some(password_hash),
                avatar_url: None,
            },
            auto_join.as_ref().map(|organization| organization.id),
        )
        .await?;

    info!(
        user_id = %user.id,
        joined_organization = ?auto_join.map(|organization| organization.slug),
        "Account created"
    );
    Ok(created(serde_json::json!({ "user_id": user.id })))
}

#[instrument(skip_all)]
pub async fn authenticate_with_password(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<PasswordSessionRequest>,
) -> Result<impl IntoResponse> {
    let user = state
        .db
        .find_user_by_email(&body.email)
        .await?
        .context(INVALID_CREDENTIALS)?;

    let password_hash = user
        .password_hash
        .clone()
        .context("User does not have a password, use social login.")?;

    if !verify_password(body.password, password_hash).await? {
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    }

    let token = state.authenticator.issue_token(UserId::new(user.id))?;
    Ok(created(TokenResponse { token }))
}

#[instrument(skip_all)]
pub async fn authenticate_with_github(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GithubSessionRequest>,
) -> Result<impl IntoResponse> {
    let github_user = state.github.authenticate(&body.code).await?;
    let email = github_user
        .email
        .clone()
        .context("Your GitHub account must have an email to authenticate.")?;

    let user = match state.db.find_user_by_email(&email).await? {
        Some(user) => {
            state
                .db
                .complete_user_profile(
                    user.id,
                    github_user.name.as_deref(),
                    github_user.avatar_url.as_deref(),
                )
                .await?;
            user
        }
        None => {
            state
                .db
                .create_user(
                    &NewUser {
                        name: github_user.name.clone(),
                        email,
                        password_hash: None,
                        avatar_url: github_user.avatar_url.clone(),
                    },
                    None,
                )
                .await?
        }
    };

    if state
        .db
        .find_account(AccountProvider::Github, user.id)
        .await?
        .is_none()
    {
        state
            .db
            .create_account(AccountProvider::Github, &github_user.id.to_string(), user.id)
            .await?;
        info!(user_id = %user.id, "GitHub account linked");
    }

    let token = state.authenticator.issue_token(UserId::new(user.id))?;
    Ok(created(TokenResponse { token }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    let user = state
        .db
        .find_user_by_id(user.user_id.0)
        .await?
        .context("User not found.")?;

    Ok(ok(ProfileResponse { user: user.into() }))
}

#[instrument(skip_all)]
pub async fn request_password_recover(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<PasswordRecoverRequest>,
) -> Result<impl IntoResponse> {
    // Unknown addresses succeed too, so the endpoint does not reveal accounts.
    if let Some(user) = state.db.find_user_by_email(&body.email).await? {
        let code = state
            .db
            .create_token(user.id, TokenKind::PasswordRecover)
            .await?;
        info!(user_id = %user.id, recover_code = %code, "Password recovery requested");
    }

    Ok(StatusCode::CREATED)
}

#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<PasswordResetRequest>,
) -> Result<impl IntoResponse> {
    let token = state
        .db
        .find_token(body.code, TokenKind::PasswordRecover)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired recovery code."))?;

    let password_hash = hash_password(body.password).await?;
    state.db.reset_password(&token, &password_hash).await?;

    info!(user_id = %token.user_id, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account_validation() {
        let request = CreateAccountRequest {
            name: "John Doe".into(),
            email: "john@acme.com".into(),
            password: "123456".into(),
        };
        assert!(request.is_valid());

        let request = CreateAccountRequest {
            name: " ".into(),
            email: "john".into(),
            password: "12345".into(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.error_count(), 3);
    }

    #[test]
    fn test_password_reset_requires_six_characters() {
        let request = PasswordResetRequest {
            code: Uuid::new_v4(),
            password: "abc".into(),
        };
        assert!(request.validate().unwrap_err().has_errors("password"));
    }

    #[test]
    fn test_reset_request_rejects_non_uuid_code() {
        let parsed = serde_json::from_str::<PasswordResetRequest>(
            r#"{"code": "nope", "password": "123456"}"#,
        );
        assert!(parsed.is_err());
    }
}
