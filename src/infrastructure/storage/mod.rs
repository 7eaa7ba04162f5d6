use crate::core::errors::TrackerError;
use crate::core::models::{Budget, BudgetFilter, Expense, ExpenseFilter, ExpensePage, ExpensePatch, User};
use async_trait::async_trait;

/// Persistence boundary.
///
/// Every expense and budget operation takes the id of the caller and only
/// sees rows owned by that user: a row belonging to someone else behaves
/// exactly like a missing one. Implementations must uphold this, the service
/// does not re-check ownership.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns `None` when the email is already registered.
    async fn create_user_if_not_exists(&self, user: User) -> Result<Option<User>, TrackerError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, TrackerError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, TrackerError>;

    async fn insert_expense(&self, expense: Expense) -> Result<Expense, TrackerError>;
    async fn get_expense(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>, TrackerError>;
    async fn update_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, TrackerError>;
    /// Returns whether a row was removed.
    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<bool, TrackerError>;
    /// Matching expenses ordered date descending, newest-created first on
    /// ties, paginated by the filter's limit/offset.
    async fn list_expenses(&self, user_id: &str, filter: &ExpenseFilter) -> Result<ExpensePage, TrackerError>;

    /// Fails with [`TrackerError::BudgetAlreadyExists`] when the owner already
    /// has a budget for the same category and month.
    async fn insert_budget(&self, budget: Budget) -> Result<Budget, TrackerError>;
    async fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>, TrackerError>;
    async fn update_budget_amount(
        &self,
        user_id: &str,
        budget_id: &str,
        amount: f64,
    ) -> Result<Option<Budget>, TrackerError>;
    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<bool, TrackerError>;
    /// Matching budgets ordered month descending, then category.
    async fn list_budgets(&self, user_id: &str, filter: &BudgetFilter) -> Result<Vec<Budget>, TrackerError>;
}

pub mod in_memory;
