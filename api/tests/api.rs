use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use wishlist_server::{
    auth::TokenManager,
    models::{
        user::{NewUser, User, UserId},
        wishlist::{NewWishItem, NewWishList, WishItem, WishList},
    },
    rest,
    store::{CredentialStore, SqliteStore},
    AppError, AppResult, AppState,
};

const SECRET: &[u8] = b"integration-test-secret";

fn tokens() -> TokenManager {
    TokenManager::new(SECRET, Duration::hours(24))
}

async fn app() -> Router {
    let store = SqliteStore::in_memory().await.expect("in-memory store");
    rest::router(AppState::new(Arc::new(store), tokens()).expect("app state"))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not json")
    };
    (status, value)
}

async fn register(app: &Router, email: &str) -> (String, i64) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": email, "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["token"].as_str().expect("token").to_string(),
        body["user"]["id"].as_i64().expect("user id"),
    )
}

async fn create_list(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/wishlists",
        Some(token),
        Some(json!({"name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().expect("list id")
}

#[tokio::test]
async fn end_to_end_scenario() {
    let app = app().await;

    // register
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "alice@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].is_string());
    assert!(body["user"].get("password_hash").is_none());
    let alice_id = body["user"]["id"].as_i64().unwrap();

    // duplicate
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "alice@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already exists");

    // wrong password
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // correct login
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let alice = body["token"].as_str().unwrap().to_string();
    assert_eq!(
        tokens().validate(&alice, Utc::now()).unwrap(),
        UserId(alice_id)
    );

    let (bob, _) = register(&app, "bob@example.com").await;

    // Alice's list, probed by Bob
    let list_id = create_list(&app, &alice, "Birthday").await;
    let uri = format!("/api/wishlists/{list_id}");
    let (status, _) = send(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // item
    let (status, item) = send(
        &app,
        Method::POST,
        &format!("{uri}/items"),
        Some(&alice),
        Some(json!({"name": "Bike", "priority": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["name"], "Bike");
    assert_eq!(item["list_id"], list_id);

    let (status, list) = send(&app, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["items"][0]["name"], "Bike");

    // delete and re-read
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_failures_are_byte_identical() {
    let app = app().await;
    register(&app, "alice@example.com").await;

    let unknown = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "nobody@example.com", "password": "password123"})),
    )
    .await;
    let wrong = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "nope-nope"})),
    )
    .await;

    assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn other_user_cannot_touch_any_resource() {
    let app = app().await;
    let (alice, _) = register(&app, "alice@example.com").await;
    let (bob, _) = register(&app, "bob@example.com").await;

    let list_id = create_list(&app, &alice, "Birthday").await;
    let list_uri = format!("/api/wishlists/{list_id}");
    let (_, item) = send(
        &app,
        Method::POST,
        &format!("{list_uri}/items"),
        Some(&alice),
        Some(json!({"name": "Bike"})),
    )
    .await;
    let item_uri = format!("{list_uri}/items/{}", item["id"]);

    let attempts = [
        (Method::GET, list_uri.clone(), None),
        (Method::PUT, list_uri.clone(), Some(json!({"name": "Mine now"}))),
        (Method::DELETE, list_uri.clone(), None),
        (
            Method::POST,
            format!("{list_uri}/items"),
            Some(json!({"name": "Sneaky"})),
        ),
        (Method::GET, item_uri.clone(), None),
        (Method::PUT, item_uri.clone(), Some(json!({"name": "Car"}))),
        (Method::DELETE, item_uri.clone(), None),
    ];

    for (method, uri, body) in attempts {
        let (status, resp) = send(&app, method.clone(), &uri, Some(&bob), body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(resp["error"], "Resource not found");
    }

    // Bob's listing is empty; Alice's data is untouched.
    let (_, lists) = send(&app, Method::GET, "/api/wishlists", Some(&bob), None).await;
    assert_eq!(lists, json!([]));
    let (status, list) = send(&app, Method::GET, &list_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["name"], "Birthday");
    assert_eq!(list["items"][0]["name"], "Bike");
}

#[tokio::test]
async fn foreign_and_missing_lists_look_the_same() {
    let app = app().await;
    let (alice, _) = register(&app, "alice@example.com").await;
    let (bob, _) = register(&app, "bob@example.com").await;
    let list_id = create_list(&app, &alice, "Birthday").await;

    let foreign = send(
        &app,
        Method::GET,
        &format!("/api/wishlists/{list_id}"),
        Some(&bob),
        None,
    )
    .await;
    let missing = send(&app, Method::GET, "/api/wishlists/99999", Some(&bob), None).await;
    assert_eq!(foreign, missing);
}

#[tokio::test]
async fn owner_updates_list_and_item() {
    let app = app().await;
    let (alice, _) = register(&app, "alice@example.com").await;
    let list_id = create_list(&app, &alice, "Birthday").await;
    let list_uri = format!("/api/wishlists/{list_id}");

    let (status, list) = send(
        &app,
        Method::PUT,
        &list_uri,
        Some(&alice),
        Some(json!({"name": "Christmas", "status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["name"], "Christmas");
    assert_eq!(list["status"], "active");

    let (_, item) = send(
        &app,
        Method::POST,
        &format!("{list_uri}/items"),
        Some(&alice),
        Some(json!({"name": "Bike"})),
    )
    .await;
    let item_uri = format!("{list_uri}/items/{}", item["id"]);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &item_uri,
        Some(&alice),
        Some(json!({"name": "Red bike", "priority": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Red bike");
    assert_eq!(updated["priority"], 5);

    let (status, _) = send(&app, Method::DELETE, &item_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &item_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_or_bad_authorization_is_rejected() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/api/wishlists", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/wishlists", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");

    let (_, user_id) = register(&app, "alice@example.com").await;
    let stale = tokens()
        .issue(UserId(user_id), Utc::now() - Duration::days(2))
        .unwrap();
    let (status, expired_body) =
        send(&app, Method::GET, "/api/wishlists", Some(&stale.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired_body, body);
}

#[tokio::test]
async fn me_returns_the_token_holder() {
    let app = app().await;
    let (token, id) = register(&app, "alice@example.com").await;

    let (status, me) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
    assert_eq!(me["email"], "alice@example.com");
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn bad_input_is_a_400() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "nope", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));

    let (token, _) = register(&app, "alice@example.com").await;
    let (status, _) = send(&app, Method::GET, "/api/wishlists/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/wishlists",
        Some(&token),
        Some(json!({"description": "no name"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "ok");
}

/// Store whose every call fails like an unreachable database.
struct FailingStore;

fn down<T>() -> AppResult<T> {
    Err(AppError::Storage(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl CredentialStore for FailingStore {
    async fn find_user_by_email(&self, _: &str) -> AppResult<Option<User>> {
        down()
    }
    async fn find_user_by_id(&self, _: UserId) -> AppResult<Option<User>> {
        down()
    }
    async fn create_user(&self, _: NewUser) -> AppResult<User> {
        down()
    }
    async fn find_list_by_id(&self, _: i64) -> AppResult<Option<WishList>> {
        down()
    }
    async fn find_lists_by_owner(&self, _: UserId) -> AppResult<Vec<WishList>> {
        down()
    }
    async fn create_list(&self, _: NewWishList) -> AppResult<WishList> {
        down()
    }
    async fn update_list(&self, _: &WishList) -> AppResult<WishList> {
        down()
    }
    async fn delete_list(&self, _: i64) -> AppResult<()> {
        down()
    }
    async fn find_item(&self, _: i64, _: i64) -> AppResult<Option<WishItem>> {
        down()
    }
    async fn find_items_by_list(&self, _: i64) -> AppResult<Vec<WishItem>> {
        down()
    }
    async fn create_item(&self, _: NewWishItem) -> AppResult<WishItem> {
        down()
    }
    async fn update_item(&self, _: &WishItem) -> AppResult<WishItem> {
        down()
    }
    async fn delete_item(&self, _: i64, _: i64) -> AppResult<()> {
        down()
    }
    async fn ping(&self) -> AppResult<()> {
        down()
    }
}

#[tokio::test]
async fn storage_failures_are_sanitized() {
    let app = rest::router(AppState::new(Arc::new(FailingStore), tokens()).expect("app state"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));

    let token = tokens().issue(UserId(1), Utc::now()).unwrap().token;
    let (status, body) = send(&app, Method::GET, "/api/wishlists/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn single_list_always_has_items_and_enumeration_omits_them() {
    let app = app().await;
    let (token, _) = register(&app, "alice@example.com").await;
    let list_id = create_list(&app, &token, "Empty").await;

    let (status, list) = send(
        &app,
        Method::GET,
        &format!("/api/wishlists/{list_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["items"], json!([]));

    let (status, lists) = send(&app, Method::GET, "/api/wishlists", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(lists[0].get("items").is_none(), "{lists}");
}

#[tokio::test]
async fn metrics_endpoint_reports_requests_and_operations() {
    let app = app().await;
    let (token, _) = register(&app, "alice@example.com").await;
    let list_id = create_list(&app, &token, "Birthday").await;
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/wishlists/{list_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .expect("failed to build request");
    let resp = app.clone().oneshot(req).await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "{content_type}");
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let text = String::from_utf8(bytes.to_vec()).expect("metrics are utf-8");

    for line in [
        r#"http_requests_total{method="POST",path="/api/auth/register",status="201"} 1"#,
        r#"http_requests_total{method="GET",path="/api/wishlists/:id",status="200"} 1"#,
        r#"user_operations_total{operation="register"} 1"#,
        r#"wishlist_operations_total{operation="create_list"} 1"#,
        r#"wishlist_operations_total{operation="get_list"} 1"#,
        r#"db_query_duration_seconds_count{operation="create_list"} 1"#,
    ] {
        assert!(text.contains(line), "{line} missing from\n{text}");
    }
    assert!(
        !text.contains(&format!("/api/wishlists/{list_id}\"")),
        "ids must not become labels"
    );
}
