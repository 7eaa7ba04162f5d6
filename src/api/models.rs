use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::TrackerError;
use crate::core::models::{Alert, BudgetStatus, Category, Expense, User};
use crate::core::services::{AuthSession, BudgetList, ExpenseList};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub category: Category,
    pub description: Option<String>,
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    /// An empty string clears the description
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "2024-06-01")]
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateBudgetRequest {
    pub category: Category,
    pub amount: f64,
    #[schema(example = "2024-06")]
    pub month: String,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct UpdateBudgetRequest {
    pub amount: Option<f64>,
}

// Query strings
#[derive(Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct ExpenseQuery {
    pub category: Option<Category>,
    /// `YYYY-MM`; takes precedence over the date range
    pub month: Option<String>,
    #[param(value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct BudgetQuery {
    pub month: Option<String>,
    pub category: Option<Category>,
}

#[derive(Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    /// `YYYY-MM`, defaults to the current month
    pub month: Option<String>,
}

// Responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        AuthResponse {
            user: session.user.into(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total: usize,
    pub total_amount: f64,
}

impl From<ExpenseList> for ExpenseListResponse {
    fn from(list: ExpenseList) -> Self {
        ExpenseListResponse {
            expenses: list.expenses,
            total: list.total,
            total_amount: list.total_amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BudgetListResponse {
    pub budgets: Vec<BudgetStatus>,
    pub total_budget: f64,
    pub total_spent: f64,
}

impl From<BudgetList> for BudgetListResponse {
    fn from(list: BudgetList) -> Self {
        BudgetListResponse {
            budgets: list.budgets,
            total_budget: list.total_budget,
            total_spent: list.total_spent,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

// Error response struct
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again.";

// Newtype wrapper for TrackerError to implement IntoResponse
#[derive(Debug)]
pub struct ApiError(pub TrackerError);

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TrackerError::MissingEmail
            | TrackerError::InvalidEmail(_)
            | TrackerError::PasswordTooShort(_)
            | TrackerError::PasswordMismatch
            | TrackerError::InvalidMonth(_)
            | TrackerError::InvalidInput(_, _) => StatusCode::BAD_REQUEST,
            TrackerError::InvalidCredentials | TrackerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            TrackerError::UserNotFound(_) | TrackerError::ExpenseNotFound(_) | TrackerError::BudgetNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            TrackerError::EmailAlreadyRegistered(_) | TrackerError::BudgetAlreadyExists { .. } => {
                StatusCode::CONFLICT
            }
            TrackerError::StorageError(_)
            | TrackerError::SessionError(_)
            | TrackerError::LoggingError(_)
            | TrackerError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the client sees. Backend failures collapse into one generic
    /// message; the detail only goes to the log.
    pub fn message(&self) -> String {
        match &self.0 {
            err if err.is_request_failure() => GENERIC_FAILURE_MESSAGE.to_string(),
            TrackerError::InvalidInput(_, field) => field.description.clone(),
            TrackerError::Unauthorized(_) => "Could not validate credentials".to_string(),
            err => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if self.0.is_request_failure() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "request rejected");
        }
        let mut response = (status, Json(ErrorResponse { message: self.message() })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                http::header::WWW_AUTHENTICATE,
                http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
