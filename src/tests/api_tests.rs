use crate::api::handlers::{
    create_budget, create_expense, delete_expense, get_alerts, get_expense, health, list_expenses, me,
};
use crate::api::models::{
    ApiError, CreateBudgetRequest, CreateExpenseRequest, ExpenseQuery, GENERIC_FAILURE_MESSAGE, MonthQuery,
};
use crate::core::errors::TrackerError;
use crate::core::models::Category;
use crate::tests::{create_test_service, date};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;

#[test]
fn test_error_status_mapping() {
    let cases = [
        (TrackerError::MissingEmail, StatusCode::BAD_REQUEST),
        (TrackerError::PasswordTooShort(6), StatusCode::BAD_REQUEST),
        (TrackerError::InvalidMonth("2024-13".to_string()), StatusCode::BAD_REQUEST),
        (
            TrackerError::invalid_input("amount", "Invalid Amount", "Amount must be greater than 0"),
            StatusCode::BAD_REQUEST,
        ),
        (TrackerError::InvalidCredentials, StatusCode::UNAUTHORIZED),
        (TrackerError::Unauthorized("expired".to_string()), StatusCode::UNAUTHORIZED),
        (TrackerError::ExpenseNotFound("x".to_string()), StatusCode::NOT_FOUND),
        (TrackerError::BudgetNotFound("x".to_string()), StatusCode::NOT_FOUND),
        (
            TrackerError::EmailAlreadyRegistered("a@b.co".to_string()),
            StatusCode::CONFLICT,
        ),
        (
            TrackerError::BudgetAlreadyExists {
                category: "Food".to_string(),
                month: "2024-06".to_string(),
            },
            StatusCode::CONFLICT,
        ),
        (
            TrackerError::StorageError("connection reset".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];
    for (err, expected) in cases {
        assert_eq!(ApiError(err).status(), expected);
    }
}

#[test]
fn test_error_messages() {
    let backend = ApiError(TrackerError::StorageError("relation \"expenses\" does not exist".to_string()));
    assert_eq!(backend.message(), GENERIC_FAILURE_MESSAGE);

    let validation = ApiError(TrackerError::invalid_input(
        "amount",
        "Invalid Amount",
        "Amount must be greater than 0",
    ));
    assert_eq!(validation.message(), "Amount must be greater than 0");

    let auth = ApiError(TrackerError::Unauthorized("Invalid token: ExpiredSignature".to_string()));
    assert_eq!(auth.message(), "Could not validate credentials");

    let conflict = ApiError(TrackerError::BudgetAlreadyExists {
        category: "Food".to_string(),
        month: "2024-06".to_string(),
    });
    assert_eq!(conflict.message(), "A Food budget for 2024-06 already exists");
}

#[test]
fn test_unauthorized_response_carries_challenge() {
    let response = ApiError(TrackerError::InvalidCredentials).into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(http::header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let response = ApiError(TrackerError::ExpenseNotFound("x".to_string())).into_response();
    assert!(response.headers().get(http::header::WWW_AUTHENTICATE).is_none());
}

#[tokio::test]
async fn test_health() {
    let Json(body) = health().await;
    assert_eq!(body.status, "healthy");
    assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
}

async fn signed_in(service: &Arc<crate::api::handlers::AppService>) -> crate::auth::jwt::Claims {
    let session = service
        .sign_up("alice@example.com", "password123", None, None)
        .await
        .unwrap();
    service.validate_token(&session.access_token).await.unwrap()
}

#[tokio::test]
async fn test_expense_handlers() {
    let service = Arc::new(create_test_service());
    let claims = signed_in(&service).await;

    let (status, Json(created)) = create_expense(
        State(service.clone()),
        Extension(claims.clone()),
        Ok(Json(CreateExpenseRequest {
            amount: 42.5,
            category: Category::Food,
            description: Some("Lunch".to_string()),
            date: date(2024, 6, 1),
        })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.user_id, claims.sub);

    let Json(fetched) = get_expense(State(service.clone()), Extension(claims.clone()), Path(created.id.clone()))
        .await
        .unwrap();
    assert_eq!(fetched, created);

    let Json(listed) = list_expenses(
        State(service.clone()),
        Extension(claims.clone()),
        Ok(Query(ExpenseQuery {
            month: Some("2024-06".to_string()),
            ..Default::default()
        })),
    )
    .await
    .unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.total_amount, 42.5);

    let bad_month = list_expenses(
        State(service.clone()),
        Extension(claims.clone()),
        Ok(Query(ExpenseQuery {
            month: Some("June".to_string()),
            ..Default::default()
        })),
    )
    .await;
    assert_eq!(bad_month.unwrap_err().status(), StatusCode::BAD_REQUEST);

    let status = delete_expense(State(service.clone()), Extension(claims.clone()), Path(created.id.clone()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let missing = get_expense(State(service.clone()), Extension(claims), Path(created.id))
        .await
        .unwrap_err();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_budget_handlers() {
    let service = Arc::new(create_test_service());
    let claims = signed_in(&service).await;

    let request = || CreateBudgetRequest {
        category: Category::Transport,
        amount: 100.0,
        month: "2024-06".to_string(),
    };
    let (status, Json(budget)) = create_budget(State(service.clone()), Extension(claims.clone()), Ok(Json(request())))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(budget.spent, 0.0);

    let duplicate = create_budget(State(service.clone()), Extension(claims.clone()), Ok(Json(request())))
        .await
        .unwrap_err();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let bad_month = create_budget(
        State(service.clone()),
        Extension(claims.clone()),
        Ok(Json(CreateBudgetRequest {
            month: "2024-13".to_string(),
            ..request()
        })),
    )
    .await
    .unwrap_err();
    assert_eq!(bad_month.status(), StatusCode::BAD_REQUEST);

    let Json(alerts) = get_alerts(
        State(service.clone()),
        Extension(claims),
        Ok(Query(MonthQuery {
            month: Some("2024-06".to_string()),
        })),
    )
    .await
    .unwrap();
    assert_eq!(alerts.count, 0);
}

#[tokio::test]
async fn test_me_hides_password_hash() {
    let service = Arc::new(create_test_service());
    let claims = signed_in(&service).await;

    let Json(user) = me(State(service.clone()), Extension(claims.clone())).await.unwrap();
    assert_eq!(user.id, claims.sub);
    let body = serde_json::to_value(&user).unwrap();
    assert!(body.get("password_hash").is_none());
    assert_eq!(body["email"], "alice@example.com");
}

#[test]
fn test_category_labels() {
    for category in Category::ALL {
        let encoded = serde_json::to_value(category).unwrap();
        assert_eq!(encoded, category.as_str());
        let decoded: Category = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, category);
    }
    assert!(serde_json::from_str::<Category>("\"Groceries\"").is_err());
    assert!(serde_json::from_str::<Category>("\"food\"").is_err());
}
