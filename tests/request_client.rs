use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dumbbers_admin::auth::{MemorySessionStore, Session};
use dumbbers_admin::client::ApiClient;
use dumbbers_admin::config::ClientOptions;
use dumbbers_admin::error::Error;

fn client_for(server: &MockServer, session: Session) -> ApiClient {
    let options = ClientOptions::default().with_base_url(&server.uri());
    ApiClient::new(&options, session).unwrap()
}

#[tokio::test]
async fn test_no_authorization_without_credential() {
    let server = MockServer::start().await;

    Mock::given(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pong": true})))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let value = client.get("/api/ping").execute_value().await.unwrap();
    assert_eq!(value, json!({"pong": true}));
}

#[tokio::test]
async fn test_stored_credential_is_sent_as_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("Authorization", "Bearer abc"))
        .and(header("Content-Type", "application/json"))
        .and(header("Cache-Control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"role": "admin"}})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(MemorySessionStore::with_token("abc"));
    let client = client_for(&server, session);
    let value = client.get("/api/auth/profile").execute_value().await.unwrap();
    assert_eq!(value["user"]["role"], json!("admin"));
}

#[tokio::test]
async fn test_explicit_token_overrides_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("Authorization", "Bearer explicit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(MemorySessionStore::with_token("stored"));
    let client = client_for(&server, session);
    client
        .get("/api/auth/profile")
        .bearer_auth("explicit")
        .execute_value()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_extra_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(header("X-Request-Source", "console"))
        .and(header("X-Tenant", "dumbbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let options = ClientOptions::default()
        .with_base_url(&server.uri())
        .with_header("X-Tenant", "dumbbers");
    let client = ApiClient::new(&options, Session::in_memory()).unwrap();
    client
        .get("/api/ping")
        .header("X-Request-Source", "console")
        .execute_value()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_body_is_serialized_as_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/echo"))
        .and(body_json(json!({"name": "Tee", "stock": 3})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true, "data": {"id": "p1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let value = client
        .post("/api/echo")
        .json(&json!({"name": "Tee", "stock": 3}))
        .unwrap()
        .execute_value()
        .await
        .unwrap();
    assert_eq!(value, json!({"id": "p1"}));
}

#[tokio::test]
async fn test_non_success_status_fails_regardless_of_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/orders"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"success": true, "data": []})))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let err = client.get("/api/admin/orders").execute_value().await.unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "Bad Gateway");
    assert_eq!(err.data(), Some(&json!({"success": true, "data": []})));
}

#[tokio::test]
async fn test_success_false_fails_with_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false, "message": "X"})))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let err = client.get("/api/admin/products").execute_value().await.unwrap_err();

    match err {
        Error::Api { message, status, data } => {
            assert_eq!(message, "X");
            assert_eq!(status, 200);
            assert_eq!(data["success"], json!(false));
        }
        other => panic!("Expected Error::Api, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_message_prefers_payload() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/p1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Product not found"})))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let err = client.delete("/api/admin/products/p1").execute_value().await.unwrap_err();
    assert_eq!(err.to_string(), "Product not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_non_json_error_body_uses_status_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized access"))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let err = client.get("/api/auth/profile").execute_value().await.unwrap_err();

    assert_eq!(err.to_string(), "Unauthorized");
    assert!(err.is_unauthorized());
    assert_eq!(err.data(), Some(&json!({})));
}

#[tokio::test]
async fn test_data_field_is_unwrapped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/orders/o1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"order": {"_id": "o1"}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let value = client.get("/api/admin/orders/o1").execute_value().await.unwrap();
    assert_eq!(value, json!({"order": {"_id": "o1"}}));
}

#[tokio::test]
async fn test_payload_without_data_is_returned_whole() {
    let server = MockServer::start().await;

    let payload = json!({"items": [], "total": 0, "page": 1});
    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let value: Value = client.get("/api/admin/products").execute().await.unwrap();
    assert_eq!(value, payload);
}

#[tokio::test]
async fn test_empty_success_body_is_empty_object() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/p1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let value = client.delete("/api/admin/products/p1").execute_value().await.unwrap();
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_absolute_url_bypasses_base() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let options = ClientOptions::default().with_base_url("http://127.0.0.1:9");
    let client = ApiClient::new(&options, Session::in_memory()).unwrap();
    let value = client
        .get(&format!("{}/healthz", server.uri()))
        .execute_value()
        .await
        .unwrap();
    assert_eq!(value, json!({"ok": true}));
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    let options = ClientOptions::default().with_base_url("http://127.0.0.1:9");
    let client = ApiClient::new(&options, Session::in_memory()).unwrap();

    let err = client.get("/api/auth/profile").execute_value().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_empty_explicit_token_falls_back_to_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("Authorization", "Bearer stored"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(MemorySessionStore::with_token("stored"));
    let client = client_for(&server, session);
    client
        .get("/api/auth/profile")
        .bearer_auth("")
        .execute_value()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unparseable_url_is_rejected_before_sending() {
    let options = ClientOptions::default().with_base_url("not a url");
    let client = ApiClient::new(&options, Session::in_memory()).unwrap();

    let err = client.get("/api/auth/profile").execute_value().await.unwrap_err();
    assert!(matches!(err, Error::Url(_)));
    assert_eq!(err.status(), None);
}
