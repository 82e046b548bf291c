//! GitHub OAuth client against a mock server.

use saas_core::config::GithubConfig;
use saas_core::error::ErrorCode;
use saas_core::github::{GithubClient, GithubUser};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GithubClient {
    GithubClient::new(GithubConfig {
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        redirect_uri: "http://localhost:3000/api/auth/callback".into(),
        oauth_url: server.uri(),
        api_url: server.uri(),
        timeout_secs: 5,
    })
    .unwrap()
}

async fn mount_token(server: &MockServer, code: &str, token: &str) {
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(body_string_contains(format!("code={}", code)))
        .and(body_string_contains("client_id=client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "bearer",
            "scope": "user:email"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_authenticate_exchanges_code_and_fetches_user() {
    let server = MockServer::start().await;
    mount_token(&server, "oauth-code", "gho_token").await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer gho_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 583231,
            "login": "octocat",
            "name": "The Octocat",
            "email": "octocat@github.com",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = assert_ok!(client(&server).authenticate("oauth-code").await);

    assert_eq!(
        user,
        GithubUser {
            id: 583231,
            name: Some("The Octocat".into()),
            email: Some("octocat@github.com".into()),
            avatar_url: Some("https://avatars.githubusercontent.com/u/583231".into()),
        }
    );
}

#[tokio::test]
async fn test_user_without_public_email() {
    let server = MockServer::start().await;
    mount_token(&server, "oauth-code", "gho_token").await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": null,
            "email": null,
            "avatar_url": null
        })))
        .mount(&server)
        .await;

    let user = client(&server).authenticate("oauth-code").await.unwrap();
    assert_eq!(user.email, None);
    assert_eq!(user.name, None);
}

#[tokio::test]
async fn test_rejected_code_is_bad_request() {
    let server = MockServer::start().await;

    // GitHub answers 200 with an error payload for bad codes.
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        })))
        .mount(&server)
        .await;

    let error = assert_err!(client(&server).exchange_code("stale").await);
    assert_eq!(error.code(), ErrorCode::BadRequest);
}

#[tokio::test]
async fn test_upstream_failure_is_external_service_error() {
    let server = MockServer::start().await;
    mount_token(&server, "oauth-code", "gho_token").await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let error = assert_err!(client(&server).authenticate("oauth-code").await);
    assert_eq!(error.code(), ErrorCode::ExternalServiceError);
    assert_eq!(
        error.http_status(),
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    );
}
