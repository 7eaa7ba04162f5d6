use crate::core::analytics::sort_newest_first;
use crate::core::errors::TrackerError;
use crate::core::models::{Budget, BudgetFilter, Expense, ExpenseFilter, ExpensePage, ExpensePatch, User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<HashMap<String, User>>>,
    users_by_email: Arc<RwLock<HashMap<String, String>>>,
    // insertion order doubles as creation order for tie-breaking
    expenses: Arc<RwLock<Vec<Expense>>>,
    budgets: Arc<RwLock<Vec<Budget>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            users: Arc::new(RwLock::new(HashMap::new())),
            users_by_email: Arc::new(RwLock::new(HashMap::new())),
            expenses: Arc::new(RwLock::new(Vec::new())),
            budgets: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user_if_not_exists(&self, user: User) -> Result<Option<User>, TrackerError> {
        let mut users_by_email = self.users_by_email.write().await;
        let key = normalize_email(&user.email);
        if users_by_email.contains_key(&key) {
            return Ok(None);
        }
        users_by_email.insert(key, user.id.clone());
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        Ok(Some(user))
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, TrackerError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, TrackerError> {
        let users_by_email = self.users_by_email.read().await;
        let users = self.users.read().await;
        Ok(users_by_email
            .get(&normalize_email(email))
            .and_then(|user_id| users.get(user_id).cloned()))
    }

    async fn insert_expense(&self, expense: Expense) -> Result<Expense, TrackerError> {
        let mut expenses = self.expenses.write().await;
        if expenses.iter().any(|e| e.id == expense.id) {
            return Err(TrackerError::StorageError(format!("Duplicate expense id {}", expense.id)));
        }
        expenses.push(expense.clone());
        Ok(expense)
    }

    async fn get_expense(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>, TrackerError> {
        let expenses = self.expenses.read().await;
        Ok(expenses
            .iter()
            .find(|e| e.id == expense_id && e.user_id == user_id)
            .cloned())
    }

    async fn update_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, TrackerError> {
        let mut expenses = self.expenses.write().await;
        Ok(expenses
            .iter_mut()
            .find(|e| e.id == expense_id && e.user_id == user_id)
            .map(|expense| {
                patch.apply(expense);
                expense.clone()
            }))
    }

    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<bool, TrackerError> {
        let mut expenses = self.expenses.write().await;
        let before = expenses.len();
        expenses.retain(|e| !(e.id == expense_id && e.user_id == user_id));
        Ok(expenses.len() != before)
    }

    async fn list_expenses(&self, user_id: &str, filter: &ExpenseFilter) -> Result<ExpensePage, TrackerError> {
        let expenses = self.expenses.read().await;
        let mut matching: Vec<Expense> = expenses
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .cloned()
            .collect();
        drop(expenses);

        sort_newest_first(&mut matching);
        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(ExpensePage { expenses: page, total })
    }

    async fn insert_budget(&self, budget: Budget) -> Result<Budget, TrackerError> {
        let mut budgets = self.budgets.write().await;
        if budgets
            .iter()
            .any(|b| b.user_id == budget.user_id && b.category == budget.category && b.month == budget.month)
        {
            return Err(TrackerError::BudgetAlreadyExists {
                category: budget.category.to_string(),
                month: budget.month.to_string(),
            });
        }
        budgets.push(budget.clone());
        Ok(budget)
    }

    async fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>, TrackerError> {
        let budgets = self.budgets.read().await;
        Ok(budgets
            .iter()
            .find(|b| b.id == budget_id && b.user_id == user_id)
            .cloned())
    }

    async fn update_budget_amount(
        &self,
        user_id: &str,
        budget_id: &str,
        amount: f64,
    ) -> Result<Option<Budget>, TrackerError> {
        let mut budgets = self.budgets.write().await;
        Ok(budgets
            .iter_mut()
            .find(|b| b.id == budget_id && b.user_id == user_id)
            .map(|budget| {
                budget.amount = amount;
                budget.clone()
            }))
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<bool, TrackerError> {
        let mut budgets = self.budgets.write().await;
        let before = budgets.len();
        budgets.retain(|b| !(b.id == budget_id && b.user_id == user_id));
        Ok(budgets.len() != before)
    }

    async fn list_budgets(&self, user_id: &str, filter: &BudgetFilter) -> Result<Vec<Budget>, TrackerError> {
        let budgets = self.budgets.read().await;
        let mut matching: Vec<Budget> = budgets
            .iter()
            .filter(|b| b.user_id == user_id && filter.matches(b))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.month.cmp(&a.month).then(a.category.cmp(&b.category)));
        Ok(matching)
    }
}
