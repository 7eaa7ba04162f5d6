// Audit log actions
pub const USER_SIGNED_UP: &str = "USER_SIGNED_UP";
pub const USER_LOGGED_IN: &str = "USER_LOGGED_IN";
pub const USER_LOGGED_OUT: &str = "USER_LOGGED_OUT";
pub const TOKEN_REFRESHED: &str = "TOKEN_REFRESHED";
pub const EXPENSE_CREATED: &str = "EXPENSE_CREATED";
pub const EXPENSE_UPDATED: &str = "EXPENSE_UPDATED";
pub const EXPENSE_DELETED: &str = "EXPENSE_DELETED";
pub const BUDGET_CREATED: &str = "BUDGET_CREATED";
pub const BUDGET_UPDATED: &str = "BUDGET_UPDATED";
pub const BUDGET_DELETED: &str = "BUDGET_DELETED";

// Percent-of-budget thresholds
pub const WARNING_THRESHOLD: f64 = 80.0;
pub const EXCEEDED_THRESHOLD: f64 = 100.0;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_AMOUNT: f64 = 1_000_000.0;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;
pub const RECENT_EXPENSES_LIMIT: usize = 5;
