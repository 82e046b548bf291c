//! HTTP API.
//!
//! Every handler returns `Result<impl IntoResponse, ApiError>`; successes are
//! wrapped in [`ApiResponse`] and errors render through `ApiError`'s
//! `IntoResponse` implementation.

mod extract;
pub mod handlers;
pub mod routes;

use axum::{extract::FromRef, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::github::GithubClient;
use crate::middleware::auth::{AuthConfig, Authenticator};

pub use extract::ValidatedJson;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub authenticator: Arc<Authenticator>,
    pub github: GithubClient,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(config: &Config, db: Database, metrics: PrometheusHandle) -> Result<Self> {
        let authenticator = Authenticator::new(AuthConfig::from(&config.auth))?;
        let github = GithubClient::new(config.github.clone())?;

        Ok(Self {
            db,
            authenticator: Arc::new(authenticator),
            github,
            metrics,
        })
    }
}

impl FromRef<AppState> for Arc<Authenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.authenticator.clone()
    }
}

/// Build the application router.
///
/// ```rust,ignore
/// let state = AppState::new(&config, db, metrics)?;
/// let app = build_router(state);
/// ```
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::paths::HEALTH, get(handlers::health::health_check))
        .route(routes::paths::METRICS, get(handlers::health::prometheus_metrics))
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert_eq!(response.data, Some("test data"));
    }

    #[test]
    fn test_api_response_shape() {
        let json = serde_json::to_value(ApiResponse::success(serde_json::json!({"token": "t"})))
            .unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": {"token": "t"}}));
    }
}
