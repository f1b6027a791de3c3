// ABOUTME: HTTP-level tests for the token management client
// ABOUTME: Covers list, create, delete and admin verification against a mock server

use modview_client::{AdminClient, AdminTokenService, ApiClient, ClientError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AdminClient {
    AdminClient::new(ApiClient::new(server.uri()))
}

fn token_list() -> serde_json::Value {
    json!([
        {"token": "aaa111", "is_admin": true, "created_at": "2024-05-01T10:00:00.000000"},
        {"token": "bbb222", "is_admin": false, "created_at": "2024-05-02T11:30:00Z"}
    ])
}

#[tokio::test]
async fn test_list_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/tokens"))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_list()))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = client_for(&server).list_tokens("admin-token").await.unwrap();

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].token, "aaa111");
    assert!(tokens[0].is_admin);
    assert_eq!(tokens[1].token, "bbb222");
    assert!(!tokens[1].is_admin);
}

#[tokio::test]
async fn test_verify_admin_rides_on_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = client_for(&server).verify_admin("admin-token").await.unwrap();
    assert!(tokens.is_empty());
}

#[tokio::test]
async fn test_verify_admin_rejects_non_admin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"detail": "Admin access needed for this action"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).verify_admin("user-token").await.unwrap_err();
    assert_eq!(err.to_string(), "Admin access needed for this action");
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_create_token_sends_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/tokens"))
        .and(header("authorization", "Bearer admin-token"))
        .and(body_json(json!({"is_admin": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "new-token-value",
            "is_admin": true,
            "created_at": "2024-05-03T09:15:00.123456"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server)
        .create_token("admin-token", true)
        .await
        .unwrap();

    assert_eq!(record.token, "new-token-value");
    assert!(record.is_admin);
}

#[tokio::test]
async fn test_delete_token_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/auth/tokens/bbb222"))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_token("admin-token", "bbb222")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_token_encodes_target() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/auth/tokens/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Token deleted successfully"})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_token("admin-token", "a/b")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_missing_token() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/auth/tokens/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Token not found"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .delete_token("admin-token", "nope")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Api {
            status: 404,
            message: "Token not found".to_string()
        }
    );
}
