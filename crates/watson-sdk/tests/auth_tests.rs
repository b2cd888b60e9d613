//! IAM token exchange tests.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use watson_sdk::auth::Authenticator;
use watson_sdk::config::Config;
use watson_sdk::conversation::{Conversation, ListWorkspacesOptions};
use watson_sdk::error::ClientError;

fn iam_config(mock_server: &MockServer) -> Config {
    Config::for_testing(&mock_server.uri(), "2017-05-26").with_authenticator(Authenticator::Iam {
        api_key: "my-api-key".to_string(),
        url: Some(format!("{}/identity/token", mock_server.uri())),
    })
}

fn token_response(access_token: &str, expires_in: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": access_token,
        "refresh_token": "refresh",
        "token_type": "Bearer",
        "expires_in": expires_in,
        "expiration": 1_900_000_000
    }))
}

#[tokio::test]
async fn test_iam_token_is_requested_once_and_reused() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .and(header("authorization", "Basic Yng6Yng="))
        .and(body_string_contains("grant_type=urn%3Aibm%3Aparams%3Aoauth%3Agrant-type%3Aapikey"))
        .and(body_string_contains("apikey=my-api-key"))
        .respond_with(token_response("token-1", 3600))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/workspaces"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workspaces": []})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let service = Conversation::new(iam_config(&mock_server)).unwrap();
    let options = ListWorkspacesOptions::builder().build().unwrap();

    for _ in 0..3 {
        service.list_workspaces(&options).await.unwrap();
    }
}

#[tokio::test]
async fn test_concurrent_callers_share_one_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(token_response("token-1", 3600))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/workspaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let service = Conversation::new(iam_config(&mock_server)).unwrap();
    let options = ListWorkspacesOptions::builder().build().unwrap();

    let (a, b) = tokio::join!(service.list_workspaces(&options), service.list_workspaces(&options));
    a.unwrap();
    b.unwrap();
}

#[tokio::test]
async fn test_unauthorized_response_forces_new_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(token_response("token-1", 3600))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/workspaces"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "token revoked"})))
        .mount(&mock_server)
        .await;

    let service = Conversation::new(iam_config(&mock_server)).unwrap();
    let options = ListWorkspacesOptions::builder().build().unwrap();

    let err = service.list_workspaces(&options).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));

    let _ = service.list_workspaces(&options).await;
}

#[tokio::test]
async fn test_iam_rejection_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorCode": "BXNIM0415E",
            "errorMessage": "Provided API key could not be found"
        })))
        .mount(&mock_server)
        .await;

    let service = Conversation::new(iam_config(&mock_server)).unwrap();
    let err = service
        .list_workspaces(&ListWorkspacesOptions::builder().build().unwrap())
        .await
        .unwrap_err();

    match err {
        ClientError::Auth(message) => assert!(message.contains("could not be found")),
        other => panic!("Expected Auth error, got {other:?}"),
    }
}

#[test]
fn test_wrapped_api_key_rejected_before_requests() {
    let config = Config::for_testing("http://localhost", "2017-05-26")
        .with_authenticator(Authenticator::iam("{my-api-key}"));
    let err = Conversation::new(config).unwrap_err();
    assert!(err.to_string().contains("curly brackets"));
}
