use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::models::{
        AlertsResponse, AuthResponse, BudgetListResponse, CreateBudgetRequest, CreateExpenseRequest, ErrorResponse,
        ExpenseListResponse, HealthResponse, LoginRequest, MessageResponse, RefreshRequest, SignUpRequest,
        UpdateBudgetRequest, UpdateExpenseRequest, UserResponse,
    },
    core::models::{
        Alert, AlertKind, AppLog, Budget, BudgetStatus, Category, CategoryBreakdown, DashboardSummary, Expense,
        SpendingStatus, TrendPoint,
    },
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::health,
        super::handlers::signup,
        super::handlers::login,
        super::handlers::refresh,
        super::handlers::logout,
        super::handlers::me,
        super::handlers::list_expenses,
        super::handlers::create_expense,
        super::handlers::get_expense,
        super::handlers::update_expense,
        super::handlers::delete_expense,
        super::handlers::list_budgets,
        super::handlers::create_budget,
        super::handlers::get_budget,
        super::handlers::update_budget,
        super::handlers::delete_budget,
        super::handlers::get_dashboard,
        super::handlers::get_alerts,
        super::handlers::get_activity
    ),
    components(schemas(
        SignUpRequest,
        LoginRequest,
        RefreshRequest,
        CreateExpenseRequest,
        UpdateExpenseRequest,
        CreateBudgetRequest,
        UpdateBudgetRequest,
        AuthResponse,
        UserResponse,
        MessageResponse,
        ExpenseListResponse,
        BudgetListResponse,
        AlertsResponse,
        HealthResponse,
        ErrorResponse,
        Category,
        Expense,
        Budget,
        BudgetStatus,
        CategoryBreakdown,
        TrendPoint,
        DashboardSummary,
        SpendingStatus,
        AlertKind,
        Alert,
        AppLog
    )),
    modifiers(&BearerAuth),
    info(
        title = "Budget Tracker API",
        description = "Track expenses, set monthly per-category budgets and watch spending against them",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
