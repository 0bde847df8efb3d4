/*
[INPUT]:  Mock password-reset endpoint responses
[OUTPUT]: Test results for HTTP client
[POS]:    Integration tests - HTTP
[UPDATE]: When endpoints or error mapping change
*/

mod common;

use cleanline_adapter::{AdapterError, ClientConfig, CleanlineClient};
use common::{client_for, setup_mock_server};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let client = assert_ok!(CleanlineClient::new());
    assert_eq!(client.base_url().as_str(), "http://localhost:5000/");
}

#[test]
fn test_invalid_base_url() {
    let result = CleanlineClient::with_config_and_base_url(ClientConfig::default(), "not a url");
    assert!(matches!(result, Err(AdapterError::UrlParse(_))));
}

#[tokio::test]
async fn test_forgot_password_sends_email_and_request_id() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .and(header_exists("x-request-id"))
        .and(body_json(json!({ "email": "jane@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Code sent" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = assert_ok!(client.forgot_password("jane@example.com").await);
    assert_eq!(response.message, "Code sent");
}

#[tokio::test]
async fn test_reset_password_body() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .and(body_json(json!({
            "email": "jane@example.com",
            "code": "482913",
            "password": "correct-horse",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_ok!(
        client
            .reset_password("jane@example.com", "482913", "correct-horse")
            .await
    );
}

#[tokio::test]
async fn test_error_without_json_body_uses_status_reason() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.forgot_password("jane@example.com").await.unwrap_err();
    match err {
        AdapterError::Api { code, message } => {
            assert_eq!(code, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_forbidden_maps_to_forbidden() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-code"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Locked" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .verify_reset_code("jane@example.com", "000000")
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::Forbidden(message) if message == "Locked"));
}
