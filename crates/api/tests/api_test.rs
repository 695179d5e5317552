//! HTTP API tests over the in-memory repository.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // For oneshot()

use api_lib::routes::create_router;
use api_lib::state::AppState;
use common::ServerConfig;
use user_service_lib::{InMemoryUserRepository, UserManager};

fn app_with(server: ServerConfig) -> Router {
    let repo = Arc::new(InMemoryUserRepository::new());
    let service = Arc::new(UserManager::new(repo));
    create_router(AppState::new(service, server))
}

fn app() -> Router {
    app_with(ServerConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, email: &str, name: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/users",
        Some(json!({ "email": email, "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_create_user_returns_201() {
    let app = app();
    let body = create(&app, "test@example.com", "Test User").await;

    assert!(body["id"].is_string());
    assert_eq!(body["email"], "test@example.com");
    assert_eq!(body["name"], "Test User");
    assert_eq!(body["role"], "user");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["is_email_verified"], false);
    assert!(body.get("otp").is_none());
}

#[tokio::test]
async fn test_create_user_trailing_slash() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/api/v1/users/",
        Some(json!({ "email": "slash@example.com", "name": "Slash" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_user_missing_fields() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/v1/users",
        Some(json!({ "email": "only@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("email and name are required"));
}

#[tokio::test]
async fn test_create_user_overlong_email() {
    let email = format!("{}@example.com", "a".repeat(300));
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/v1/users",
        Some(json!({ "email": email, "name": "Long" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("email must be at most 255 characters"));
    assert!(!message.contains("required"));
}

#[tokio::test]
async fn test_create_user_invalid_email() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/v1/users",
        Some(json!({ "email": "invalid-email", "name": "Name" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_USER_EMAIL");
}

#[tokio::test]
async fn test_create_user_malformed_json() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_conflict() {
    let app = app();
    create(&app, "existing@example.com", "Existing").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({ "email": "existing@example.com", "name": "X" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
    assert_eq!(body["code"], "USER_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_get_user() {
    let app = app();
    let created = create(&app, "get@example.com", "Get").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_get_user_errors() {
    let app = app();

    let missing = uuid::Uuid::new_v4();
    let (status, body) =
        send(&app, Method::GET, &format!("/api/v1/users/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "USER_NOT_FOUND");

    let (status, body) = send(&app, Method::GET, "/api/v1/users/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_USER_ID");
}

#[tokio::test]
async fn test_update_user() {
    let app = app();
    let created = create(&app, "before@example.com", "Before").await;
    let uri = format!("/api/v1/users/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "email": "", "name": "After" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "before@example.com");
    assert_eq!(body["name"], "After");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "email": "broken" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_USER_EMAIL");
}

#[tokio::test]
async fn test_update_missing_user() {
    let uri = format!("/api/v1/users/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app(), Method::PUT, &uri, Some(json!({ "name": "Ghost" }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user() {
    let app = app();
    let created = create(&app, "delete@example.com", "Delete").await;
    let uri = format!("/api/v1/users/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    for i in 0..3 {
        create(&app, &format!("list{}@example.com", i), "List").await;
    }

    let (_, body) = send(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = send(&app, Method::GET, "/api/v1/users?limit=2&offset=0", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::GET, "/api/v1/users?limit=abc&offset=-1", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = send(&app, Method::GET, "/api/v1/users/?offset=2", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_debug_routes_only_in_development() {
    let (status, _) = send(&app(), Method::GET, "/api/v1/debug/routes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let dev = app_with(ServerConfig {
        environment: "development".to_string(),
        ..ServerConfig::default()
    });
    let (status, body) = send(&dev, Method::GET, "/api/v1/debug/routes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["routes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r == "DELETE /api/v1/users/:id"));
}

#[tokio::test]
async fn test_openapi_document() {
    let (status, body) = send(&app(), Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/users"].is_object());
    assert!(body["paths"]["/api/v1/users/{id}"].is_object());
}
