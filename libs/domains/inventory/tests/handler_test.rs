//! Handler tests for the inventory domain
//!
//! These drive one product router at a time against the in-memory store:
//! - Request bodies reach the service as raw field bags
//! - The HTTP status mirrors the envelope status
//! - The session comes from the `SessionUser` request extension
//!
//! The full application, with the header-reading middleware in front, is
//! tested in `apps/inventory-api`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::SessionUser;
use domain_inventory::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::{TestDataBuilder, assertions::assert_object_id};
use tower::ServiceExt; // For oneshot()

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let mut request = builder.body(body).unwrap();
    if let Some(user) = user {
        request.extensions_mut().insert(SessionUser::new(user));
    }
    request
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response.into_body()).await)
}

fn feed_router() -> Router {
    handlers::router(ProductService::feed(Arc::new(InMemoryGateway::new())))
}

fn corn() -> Value {
    json!({
        "feedName": "Corn",
        "kilogram": "50",
        "sack": "10",
        "date": "2024-01-01",
        "expiration": "2025-01-01",
        "status": "Available"
    })
}

#[tokio::test]
async fn test_create_then_get_feed() {
    let app = feed_router();
    let user = TestDataBuilder::from_test_name("create_then_get").user_id();

    let (status, body) = send(&app, request("POST", "/", Some(&user), Some(corn()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["error"], Value::Null);
    let id = body["data"].as_str().unwrap().to_string();
    assert_object_id(&id, "created feed id");

    let (status, body) = send(&app, request("GET", &format!("/{id}"), Some(&user), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": 200,
            "error": null,
            "data": {
                "feedId": id,
                "productId": 1,
                "feedName": "Corn",
                "kilogram": "50",
                "sack": "10",
                "date": "2024-01-01",
                "expiration": "2025-01-01",
                "status": "Available"
            }
        })
    );
}

#[tokio::test]
async fn test_create_without_session_is_unauthorized() {
    let app = feed_router();

    let (status, body) = send(&app, request("POST", "/", None, Some(corn()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"status": 401, "error": "Unauthorized"}));
}

#[tokio::test]
async fn test_create_missing_field_is_bad_request() {
    let app = feed_router();
    let mut fields = corn();
    fields.as_object_mut().unwrap().remove("expiration");

    let (status, body) = send(&app, request("POST", "/", Some("u1"), Some(fields))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_malformed_body_gets_envelope() {
    let app = feed_router();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": 400, "error": "Invalid request body"}));
}

#[tokio::test]
async fn test_vaccine_with_unknown_status_is_rejected() {
    let app = handlers::router(ProductService::vaccine(Arc::new(InMemoryGateway::new())));
    let fields = json!({
        "vaccineName": "Measles",
        "milliliter": "250",
        "bottle": "4",
        "date": "2024-03-01",
        "expiration": "2024-09-01",
        "status": "Pending"
    });

    let (status, body) = send(&app, request("POST", "/", Some("u1"), Some(fields))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": 400, "error": "Invalid status"}));
}

#[tokio::test]
async fn test_list_returns_only_callers_feeds() {
    let app = feed_router();
    let builder = TestDataBuilder::from_test_name("list_scoped");
    let owner = builder.user_id();
    let other = builder.other_user_id();

    for user in [&owner, &other, &owner] {
        let (status, _) = send(&app, request("POST", "/", Some(user), Some(corn()))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, request("GET", "/", Some(&owner), None)).await;
    assert_eq!(status, StatusCode::OK);
    let product_ids: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|feed| feed["productId"].as_i64().unwrap())
        .collect();
    assert_eq!(product_ids, [1, 3]);

    let (status, _) = send(&app, request("GET", "/", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_by_other_owner_is_not_found() {
    let app = feed_router();
    let builder = TestDataBuilder::from_test_name("update_other_owner");
    let owner = builder.user_id();

    let (_, body) = send(&app, request("POST", "/", Some(&owner), Some(corn()))).await;
    let id = body["data"].as_str().unwrap().to_string();
    let uri = format!("/{id}");

    let (status, body) = send(
        &app,
        request("PUT", &uri, Some(&builder.other_user_id()), Some(json!({"sack": "1"}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "feed not found");

    let (status, body) = send(
        &app,
        request("PUT", &uri, Some(&owner), Some(json!({"sack": "1"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": 200, "error": null}));

    let (_, body) = send(&app, request("GET", &uri, Some(&owner), None)).await;
    assert_eq!(body["data"]["sack"], "1");
    assert_eq!(body["data"]["kilogram"], "50");
}

#[tokio::test]
async fn test_update_with_no_fields_is_bad_request() {
    let app = feed_router();

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/65a1f0c2e4b0a1b2c3d4e5f6",
            Some("u1"),
            Some(json!({"color": "yellow"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No fields provided to update");
}

#[tokio::test]
async fn test_delete_nonexistent_is_not_found_every_time() {
    let app = feed_router();

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            request("DELETE", "/65a1f0c2e4b0a1b2c3d4e5f6", Some("u1"), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": 404, "error": "feed not found"}));
    }
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = feed_router();

    let (_, body) = send(&app, request("POST", "/", Some("u1"), Some(corn()))).await;
    let uri = format!("/{}", body["data"].as_str().unwrap());

    let (status, _) = send(&app, request("DELETE", &uri, Some("u1"), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request("GET", &uri, Some("u1"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
