//! End-to-end tests driving the router over the demo store.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use stockhub::{app, AppState, MemStore, SessionStore};
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let state = AppState {
        store: Arc::new(MemStore::seeded()),
        sessions: SessionStore::new("test-secret", 24),
    };
    app(state)
}

async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Log in and return the `sid=...` cookie pair for follow-up requests.
async fn login(app: &axum::Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/login",
            json!({"username": username, "password": password}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn unauthenticated_inventory_request_is_rejected() {
    let app = test_app();
    let response = send(
        &app,
        Request::builder()
            .method("GET")
            .uri("/api/inventory")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn login_with_bad_credentials_fails() {
    let app = test_app();
    let response = send(
        &app,
        json_request("POST", "/login", json!({"username": "admin", "password": "nope"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn login_then_fetch_current_user() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;
    let response = send(&app, get_request("/api/user", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn forged_session_cookie_is_rejected() {
    let app = test_app();
    let response = send(&app, get_request("/api/user", "sid=not-a-real.token")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inventory_crud_round_trip() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;

    // Create with camelCase keys and numeric strings, the wire shape the
    // frontend form posts.
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/inventory")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(
                json!({
                    "itemCode": "ITM010",
                    "productName": "Barcode Scanner",
                    "unitOfMeasure": "PCS",
                    "buyPrice": "1200.50",
                    "sellPrice": "1500",
                    "categoryId": "CAT001",
                    "warehouseId": "WH001",
                    "totalQuantity": "7"
                })
                .to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["item_code"], "ITM010");
    assert_eq!(created["data"]["buy_price"], 1200.50);
    assert_eq!(created["data"]["total_quantity"], 7);
    assert_eq!(created["data"]["min_quantity"], 0);
    let id = created["data"]["id"].as_i64().unwrap();

    // Fetch it back.
    let response = send(&app, get_request(&format!("/api/inventory/{}", id), &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["data"]["product_name"], "Barcode Scanner");

    // Partial update merges over existing fields.
    let response = send(
        &app,
        Request::builder()
            .method("PUT")
            .uri(format!("/api/inventory/{}", id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(
                json!({"productName": "Barcode Scanner v2", "totalQuantity": 9}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["product_name"], "Barcode Scanner v2");
    assert_eq!(updated["data"]["total_quantity"], 9);
    assert_eq!(updated["data"]["buy_price"], 1200.50);
    assert_eq!(updated["data"]["item_code"], "ITM010");

    // The most recently updated item leads the list and carries display names.
    let response = send(&app, get_request("/api/inventory", &cookie)).await;
    let listed = body_json(response).await;
    assert_eq!(listed["data"][0]["id"].as_i64().unwrap(), id);
    assert_eq!(listed["data"][0]["category_name"], "Electronics");

    // Delete, then a fetch is a 404.
    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/inventory/{}", id))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, get_request(&format!("/api/inventory/{}", id), &cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_strings_on_update_keep_existing_references() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;
    // Blank form fields arrive as "", which the merge treats as absent.
    let response = send(
        &app,
        Request::builder()
            .method("PUT")
            .uri("/api/inventory/1")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(
                json!({"location": "", "categoryId": "", "warehouseId": ""}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["location"], "Philippines");
    assert_eq!(body["data"]["category_id"], "CAT001");
    assert_eq!(body["data"]["warehouse_id"], "WH001");
}

#[tokio::test]
async fn create_requires_item_code() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/inventory")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(
                json!({"productName": "No Code", "unitOfMeasure": "PCS", "buyPrice": 1}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "itemCode is required");
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;
    let response = send(
        &app,
        Request::builder()
            .method("PUT")
            .uri("/api/inventory/1")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(json!({"totalQuantity": -1}).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "totalQuantity must not be negative");
}

#[tokio::test]
async fn bulk_delete_reports_deleted_count() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;
    // Seeded store holds ids 1 and 2; 999 does not exist.
    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/inventory")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(json!({"ids": [1, 2, 999]}).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["deletedCount"], 2);
}

#[tokio::test]
async fn mutation_fires_a_notification() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;
    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/inventory/2")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The notification hook is fire-and-forget; give the spawned task a beat.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let response = send(&app, get_request("/api/notifications", &cookie)).await;
    let body = body_json(response).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Item Deleted"));
}

#[tokio::test]
async fn notification_feed_marks_read() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;
    let response = send(
        &app,
        Request::builder()
            .method("PUT")
            .uri("/api/notifications/mark-read")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get_request("/api/notifications", &cookie)).await;
    let body = body_json(response).await;
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["is_read"] == true));
}

#[tokio::test]
async fn message_create_and_list() {
    let app = test_app();
    let cookie = login(&app, "user", "user").await;
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(
                json!({"senderName": "QA", "messageText": "ping"}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["sender_name"], "QA");
    assert_eq!(created["data"]["is_read"], false);

    let response = send(&app, get_request("/api/messages", &cookie)).await;
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["message_text"], "ping");
}

#[tokio::test]
async fn lookups_return_seeded_sets() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;

    let response = send(&app, get_request("/api/categories", &cookie)).await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"][0]["name"], "Accessories");

    let response = send(&app, get_request("/api/warehouses", &cookie)).await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn db_status_is_public_and_timestamped() {
    let app = test_app();
    let response = send(
        &app,
        Request::builder()
            .method("GET")
            .uri("/api/db-status")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["connected"], false);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = test_app();
    let cookie = login(&app, "admin", "admin").await;
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/logout")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get_request("/api/user", &cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
