use crate::api;
use crate::config::Config;
use crate::tests::create_test_service;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        log_level: "debug".to_string(),
        jwt_secret: "test-secret".to_string(),
        access_token_ttl_secs: 3600,
        refresh_token_ttl_secs: 3600,
        bcrypt_cost: 4,
        frontend_url: "*".to_string(),
    }
}

fn test_app() -> Router {
    api::router(Arc::new(create_test_service()), &test_config())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn authed(method: &str, uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

async fn signed_up_token(app: &Router) -> String {
    let (status, _, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/signup",
            None,
            json!({ "email": "alice@example.com", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

fn message(body: &[u8]) -> String {
    let body: Value = serde_json::from_slice(body).unwrap();
    body["message"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let app = test_app();

    let missing = Request::builder().uri("/api/expenses").body(Body::empty()).unwrap();
    let (status, headers, body) = send(&app, missing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    assert_eq!(message(&body), "Could not validate credentials");

    for authorization in ["Token abc", "Bearer", "Bearer not.a.jwt"] {
        let (status, _, _) = send(&app, authed("GET", "/api/dashboard", authorization)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{authorization}");
    }
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = test_app();
    let token = signed_up_token(&app).await;

    for scheme in ["Bearer", "bearer", "BEARER"] {
        let (status, _, body) = send(&app, authed("GET", "/api/auth/me", &format!("{} {}", scheme, token))).await;
        assert_eq!(status, StatusCode::OK, "{scheme}");
        let user: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(user["email"], "alice@example.com");
    }
}

#[tokio::test]
async fn test_malformed_json_body_is_a_bad_request() {
    let app = test_app();
    let token = signed_up_token(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/expenses")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{\"amount\": 12.5, \"category\": "))
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!message(&body).is_empty());

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/api/expenses",
            Some(&token),
            json!({ "amount": 12.5, "category": "Groceries", "date": "2024-06-01" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/expenses",
            Some(&token),
            json!({ "amount": -3, "category": "Food", "date": "2024-06-01" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "Amount must be greater than 0");
}

#[tokio::test]
async fn test_bad_query_parameters_are_bad_requests() {
    let app = test_app();
    let token = signed_up_token(&app).await;
    let bearer = format!("Bearer {}", token);

    let (status, _, body) = send(&app, authed("GET", "/api/expenses?limit=0", &bearer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "limit must be between 1 and 100");

    for uri in [
        "/api/expenses?limit=101",
        "/api/expenses?limit=abc",
        "/api/expenses?offset=-1",
        "/api/expenses?month=2024-13",
        "/api/dashboard?month=June",
    ] {
        let (status, _, body) = send(&app, authed("GET", uri, &bearer)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(!message(&body).is_empty());
    }

    let (status, _, body) = send(&app, authed("GET", "/api/expenses?limit=100", &bearer)).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn test_expense_lifecycle_over_http() {
    let app = test_app();
    let token = signed_up_token(&app).await;
    let bearer = format!("Bearer {}", token);

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/expenses",
            Some(&token),
            json!({ "amount": 12.5, "category": "Food", "description": "Lunch", "date": "2024-06-01" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_slice(&body).unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/expenses/{}", id);

    let (status, _, body) = send(
        &app,
        json_request("PATCH", &uri, Some(&token), json!({ "description": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_slice(&body).unwrap();
    assert!(updated["description"].is_null());
    assert_eq!(updated["amount"], 12.5);

    let (status, _, body) = send(&app, authed("DELETE", &uri, &bearer)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _, body) = send(&app, authed("GET", &uri, &bearer)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), format!("Expense {} not found", id));
}

#[tokio::test]
async fn test_budget_conflict_and_public_routes() {
    let app = test_app();
    let token = signed_up_token(&app).await;
    let budget = json!({ "category": "Transport", "amount": 100.0, "month": "2024-06" });

    let (status, _, _) = send(&app, json_request("POST", "/api/budgets", Some(&token), budget.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _, body) = send(&app, json_request("POST", "/api/budgets", Some(&token), budget)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(message(&body), "A Transport budget for 2024-06 already exists");

    let (status, _, body) = send(&app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
}
