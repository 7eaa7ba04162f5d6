use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum TrackerError {
    /// Email field is empty
    #[error("Email is required")]
    MissingEmail,

    /// Email format is invalid
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Email is already registered
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, expired or revoked bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Expense {0} not found")]
    ExpenseNotFound(String),

    #[error("Budget {0} not found")]
    BudgetNotFound(String),

    /// A budget already exists for this (user, category, month)
    #[error("A {category} budget for {month} already exists")]
    BudgetAlreadyExists { category: String, month: String },

    #[error("Month must be in YYYY-MM format: {0}")]
    InvalidMonth(String),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl TrackerError {
    pub fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        TrackerError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }

    /// True for failures of the persistence, session or logging backends, as
    /// opposed to problems with what the caller sent.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            TrackerError::StorageError(_)
                | TrackerError::SessionError(_)
                | TrackerError::LoggingError(_)
                | TrackerError::InternalServerError(_)
        )
    }
}
