//! GitHub OAuth client: code exchange and user lookup.

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::GithubConfig;
use crate::error::{ApiError, ErrorCode, Result};

const USER_AGENT: &str = concat!("saas-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// The GitHub account behind an OAuth code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubUser {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    /// Exchange an OAuth `code` for an access token.
    #[instrument(skip_all)]
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let url = format!(
            "{}/login/oauth/access_token",
            self.config.oauth_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, "GitHub token exchange failed");
            return Err(ApiError::new(
                ErrorCode::ExternalServiceError,
                "GitHub authentication is unavailable.",
            )
            .with_internal_message(format!("token endpoint returned {}", status)));
        }

        let body: AccessTokenResponse = response.json().await?;
        match body.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                debug!(
                    error = body.error.as_deref().unwrap_or("missing access_token"),
                    description = body.error_description.as_deref().unwrap_or_default(),
                    "GitHub rejected OAuth code"
                );
                Err(ApiError::bad_request("Invalid GitHub OAuth code."))
            }
        }
    }

    /// Fetch the profile of the user owning `access_token`.
    #[instrument(skip_all)]
    pub async fn fetch_user(&self, access_token: &str) -> Result<GithubUser> {
        let url = format!("{}/user", self.config.api_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, "GitHub user lookup failed");
            return Err(ApiError::new(
                ErrorCode::ExternalServiceError,
                "GitHub authentication is unavailable.",
            )
            .with_internal_message(format!("user endpoint returned {}", status)));
        }

        Ok(response.json().await?)
    }

    /// Code exchange followed by the user lookup.
    pub async fn authenticate(&self, code: &str) -> Result<GithubUser> {
        let token = self.exchange_code(code).await?;
        self.fetch_user(&token).await
    }
}
