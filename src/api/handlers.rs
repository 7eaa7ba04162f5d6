use crate::{
    api::models::*,
    auth::jwt::Claims,
    core::{
        errors::TrackerError,
        models::{AppLog, BudgetFilter, BudgetStatus, DashboardSummary, DateWindow, Expense, ExpenseFilter, ExpensePatch, Month},
        services::{NewExpense, TrackerService},
    },
    constants::DEFAULT_PAGE_SIZE,
    infrastructure::{
        logging::in_memory::InMemoryLogging, session::in_memory::InMemorySessions,
        storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Extension, Json, Router,
    extract::{
        Path, Query, Request, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
};
use http::header;

use std::sync::Arc;

pub type AppService = TrackerService<InMemoryLogging, InMemoryStorage, InMemorySessions>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(TrackerError::invalid_input("body", "Invalid request body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(TrackerError::invalid_input("query", "Invalid query string", rejection.body_text()))
    }
}

fn parse_month(month: Option<&str>) -> Result<Option<Month>, TrackerError> {
    month.filter(|m| !m.is_empty()).map(Month::parse).transpose()
}

/// Token part of a `Bearer <token>` header value. The scheme name is
/// case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

// Middleware to validate the bearer token
async fn auth_middleware(
    State(service): State<Arc<AppService>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| TrackerError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = bearer_token(auth_header)
        .ok_or_else(|| TrackerError::Unauthorized("Invalid Authorization header".to_string()))?;

    let claims = service.validate_token(token).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    let protected_routes = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/{expense_id}",
            get(get_expense).patch(update_expense).delete(delete_expense),
        )
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).patch(update_budget).delete(delete_budget),
        )
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/alerts", get(get_alerts))
        .route("/activity", get(get_activity))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware));

    Router::new()
        .route("/auth/signup", post(signup)) // Unprotected
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .merge(protected_routes)
        .with_state(service)
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "budget-tracker-api".to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(service): State<Arc<AppService>>,
    req: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(req) = req?;
    let session = service
        .sign_up(&req.email, &req.password, req.confirm_password.as_deref(), req.full_name)
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn login(
    State(service): State<Arc<AppService>>,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = req?;
    let session = service.login(&req.email, &req.password).await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = AuthResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse)
    )
)]
pub async fn refresh(
    State(service): State<Arc<AppService>>,
    req: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = req?;
    let session = service.refresh(&req.refresh_token).await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn logout(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.logout(&claims).await?;
    Ok(Json(MessageResponse {
        message: "Successfully logged out".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn me(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = service.current_user(&claims.sub).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/expenses",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Expenses, newest first", body = ExpenseListResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn list_expenses(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<ExpenseListResponse>, ApiError> {
    let Query(query) = query?;
    let window = match parse_month(query.month.as_deref())? {
        Some(month) => DateWindow::Month(month),
        None if query.start_date.is_some() || query.end_date.is_some() => DateWindow::Range {
            start: query.start_date,
            end: query.end_date,
        },
        None => DateWindow::All,
    };
    let filter = ExpenseFilter {
        category: query.category,
        window,
        limit: Some(query.limit.unwrap_or(DEFAULT_PAGE_SIZE)),
        offset: query.offset.unwrap_or(0),
    };
    let list = service.list_expenses(&claims.sub, filter).await?;
    Ok(Json(list.into()))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense created", body = Expense),
        (status = 400, description = "Invalid amount or field", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_expense(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let Json(req) = req?;
    let expense = service
        .create_expense(
            &claims.sub,
            NewExpense {
                amount: req.amount,
                category: req.category,
                description: req.description,
                date: req.date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/expenses/{expense_id}",
    params(("expense_id" = String, Path, description = "ID of the expense")),
    responses(
        (status = 200, description = "Expense", body = Expense),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_expense(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(expense_id): Path<String>,
) -> Result<Json<Expense>, ApiError> {
    let expense = service.get_expense(&claims.sub, &expense_id).await?;
    Ok(Json(expense))
}

#[utoipa::path(
    patch,
    path = "/api/expenses/{expense_id}",
    request_body = UpdateExpenseRequest,
    params(("expense_id" = String, Path, description = "ID of the expense")),
    responses(
        (status = 200, description = "Updated expense", body = Expense),
        (status = 400, description = "Invalid amount or field", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_expense(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(expense_id): Path<String>,
    req: Result<Json<UpdateExpenseRequest>, JsonRejection>,
) -> Result<Json<Expense>, ApiError> {
    let Json(req) = req?;
    let patch = ExpensePatch {
        amount: req.amount,
        category: req.category,
        description: req.description.map(Some),
        date: req.date,
    };
    let expense = service.update_expense(&claims.sub, &expense_id, patch).await?;
    Ok(Json(expense))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{expense_id}",
    params(("expense_id" = String, Path, description = "ID of the expense")),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_expense(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(expense_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_expense(&claims.sub, &expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/budgets",
    params(BudgetQuery),
    responses(
        (status = 200, description = "Budgets with spending", body = BudgetListResponse),
        (status = 400, description = "Invalid month", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn list_budgets(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<BudgetQuery>, QueryRejection>,
) -> Result<Json<BudgetListResponse>, ApiError> {
    let Query(query) = query?;
    let filter = BudgetFilter {
        month: parse_month(query.month.as_deref())?,
        category: query.category,
    };
    let list = service.list_budgets(&claims.sub, filter).await?;
    Ok(Json(list.into()))
}

#[utoipa::path(
    post,
    path = "/api/budgets",
    request_body = CreateBudgetRequest,
    responses(
        (status = 201, description = "Budget created", body = BudgetStatus),
        (status = 400, description = "Invalid amount or month", body = ErrorResponse),
        (status = 409, description = "Budget already exists for this category and month", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn create_budget(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<CreateBudgetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BudgetStatus>), ApiError> {
    let Json(req) = req?;
    let month = Month::parse(&req.month)?;
    let budget = service
        .create_budget(&claims.sub, req.category, req.amount, month)
        .await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

#[utoipa::path(
    get,
    path = "/api/budgets/{budget_id}",
    params(("budget_id" = String, Path, description = "ID of the budget")),
    responses(
        (status = 200, description = "Budget with spending", body = BudgetStatus),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_budget(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(budget_id): Path<String>,
) -> Result<Json<BudgetStatus>, ApiError> {
    let budget = service.get_budget(&claims.sub, &budget_id).await?;
    Ok(Json(budget))
}

#[utoipa::path(
    patch,
    path = "/api/budgets/{budget_id}",
    request_body = UpdateBudgetRequest,
    params(("budget_id" = String, Path, description = "ID of the budget")),
    responses(
        (status = 200, description = "Updated budget", body = BudgetStatus),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn update_budget(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(budget_id): Path<String>,
    req: Result<Json<UpdateBudgetRequest>, JsonRejection>,
) -> Result<Json<BudgetStatus>, ApiError> {
    let Json(req) = req?;
    let budget = service.update_budget(&claims.sub, &budget_id, req.amount).await?;
    Ok(Json(budget))
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{budget_id}",
    params(("budget_id" = String, Path, description = "ID of the budget")),
    responses(
        (status = 204, description = "Budget deleted"),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_budget(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(budget_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_budget(&claims.sub, &budget_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(MonthQuery),
    responses(
        (status = 200, description = "Monthly summary", body = DashboardSummary),
        (status = 400, description = "Invalid month", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_dashboard(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let Query(query) = query?;
    let month = parse_month(query.month.as_deref())?;
    let summary = service.dashboard(&claims.sub, month).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/alerts",
    params(MonthQuery),
    responses(
        (status = 200, description = "Budgets at or past 80% for the month", body = AlertsResponse),
        (status = 400, description = "Invalid month", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub async fn get_alerts(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<AlertsResponse>, ApiError> {
    let Query(query) = query?;
    let month = parse_month(query.month.as_deref())?;
    let alerts = service.alerts(&claims.sub, month).await?;
    Ok(Json(AlertsResponse {
        count: alerts.len(),
        alerts,
    }))
}

#[utoipa::path(
    get,
    path = "/api/activity",
    responses(
        (status = 200, description = "The caller's audit trail, newest first", body = Vec<AppLog>)
    ),
    security(("Bearer" = []))
)]
pub async fn get_activity(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.activity(&claims.sub).await?;
    Ok(Json(logs))
}
