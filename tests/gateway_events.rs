//! Gateway Adapter Tests
//!
//! Proxy events in, proxy responses out, over one shared store.

use std::sync::Arc;

use roadie_user::dispatcher::Dispatcher;
use roadie_user::gateway::{invoke, invoke_json, GatewayError, ProxyRequest};
use roadie_user::store::{MemoryUserStore, SharedStore};
use serde_json::{json, Value};

fn dispatcher() -> Dispatcher<SharedStore> {
    Dispatcher::with_default_policy(Arc::new(MemoryUserStore::new()))
}

fn event(method: &str, id: Option<&str>, body: Option<&str>) -> String {
    json!({
        "version": "2.0",
        "routeKey": "ANY /users/{id}",
        "requestContext": {"http": {"method": method, "path": "/users"}},
        "pathParameters": id.map(|id| json!({"id": id})),
        "body": body,
        "isBase64Encoded": false
    })
    .to_string()
}

async fn call(d: &Dispatcher<SharedStore>, event: String) -> Value {
    let out = invoke_json(d, &event).await.unwrap();
    serde_json::from_str(&out).unwrap()
}

#[tokio::test]
async fn test_event_lifecycle() {
    let d = dispatcher();

    let created = call(&d, event("POST", None, Some(r#"{"Sub":"u1","Name":"Alice"}"#))).await;
    assert_eq!(created["statusCode"], 201);
    assert_eq!(created["headers"]["content-type"], "application/json");
    assert_eq!(created["body"], r#"{"Sub":"u1","Name":"Alice"}"#);

    let read = call(&d, event("GET", Some("u1"), None)).await;
    assert_eq!(read["statusCode"], 200);
    assert_eq!(read["body"], r#"{"Sub":"u1","Name":"Alice"}"#);

    let updated = call(
        &d,
        event("PUT", Some("u1"), Some(r#"{"Sub":"ignored","Name":"Alicia"}"#)),
    )
    .await;
    assert_eq!(updated["statusCode"], 200);
    assert_eq!(updated["body"], r#"{"Sub":"u1","Name":"Alicia"}"#);

    let deleted = call(&d, event("DELETE", Some("u1"), None)).await;
    assert_eq!(deleted["statusCode"], 204);
    assert!(deleted.get("body").is_none());

    let gone = call(&d, event("GET", Some("u1"), None)).await;
    assert_eq!(gone["statusCode"], 404);
    assert_eq!(gone["body"], "User not found");
}

#[tokio::test]
async fn test_guarded_failures_have_no_headers() {
    let d = dispatcher();

    let no_key = call(&d, event("GET", None, None)).await;
    assert_eq!(no_key["statusCode"], 400);
    assert_eq!(no_key["headers"], json!({}));

    let patch = call(&d, event("PATCH", Some("u1"), None)).await;
    assert_eq!(patch["statusCode"], 405);
    assert_eq!(patch["body"], "Method not allowed");
    assert_eq!(patch["headers"], json!({}));
}

#[tokio::test]
async fn test_base64_body_event() {
    let d = dispatcher();
    let mut request = ProxyRequest::new("POST");
    // {"Sub":"u2"}
    request.body = Some("eyJTdWIiOiJ1MiJ9".to_string());
    request.is_base64_encoded = true;

    let response = invoke(&d, request).await.unwrap();
    assert_eq!(response.status_code, 201);
    assert_eq!(response.body.as_deref(), Some(r#"{"Sub":"u2"}"#));
}

#[tokio::test]
async fn test_undecodable_event_is_gateway_error() {
    let d = dispatcher();

    let err = invoke_json(&d, r#"{"body": "no request context"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidEvent(_)));
    assert_eq!(err.code(), "USER_GATEWAY_INVALID_EVENT");
}
