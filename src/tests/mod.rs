mod api_tests;
mod router_tests;

use crate::auth::AuthSettings;
use crate::core::errors::TrackerError;
use crate::core::models::{Budget, BudgetFilter, Category, Expense, ExpenseFilter, ExpensePage, ExpensePatch, Month, User};
use crate::core::services::{NewExpense, TrackerService};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::session::in_memory::InMemorySessions;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// lowest cost bcrypt accepts
const TEST_BCRYPT_COST: u32 = 4;

pub type TestService = TrackerService<InMemoryLogging, InMemoryStorage, InMemorySessions>;

pub fn test_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: "test-secret".to_string(),
        access_token_ttl: Duration::from_secs(3600),
        refresh_token_ttl: Duration::from_secs(3600),
        bcrypt_cost: TEST_BCRYPT_COST,
    }
}

pub fn create_test_service() -> TestService {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let sessions = InMemorySessions::new();
    TrackerService::new(storage, logging, sessions, test_settings())
}

/// Registers a user and returns its id.
pub async fn sign_up<L, S, T>(service: &TrackerService<L, S, T>, email: &str) -> String
where
    L: crate::infrastructure::logging::LoggingService,
    S: Storage,
    T: crate::infrastructure::session::SessionStore,
{
    service
        .sign_up(email, "password123", None, None)
        .await
        .unwrap()
        .user
        .id
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn month(token: &str) -> Month {
    Month::parse(token).unwrap()
}

pub fn new_expense(amount: f64, category: Category, date: NaiveDate) -> NewExpense {
    NewExpense {
        amount,
        category,
        description: None,
        date,
    }
}

/// Storage wrapper counting every expense/budget write that reaches it.
#[derive(Clone, Default)]
pub struct CountingStorage {
    inner: InMemoryStorage,
    pub writes: Arc<AtomicUsize>,
}

impl CountingStorage {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn create_user_if_not_exists(&self, user: User) -> Result<Option<User>, TrackerError> {
        self.inner.create_user_if_not_exists(user).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, TrackerError> {
        self.inner.get_user(user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, TrackerError> {
        self.inner.get_user_by_email(email).await
    }

    async fn insert_expense(&self, expense: Expense) -> Result<Expense, TrackerError> {
        self.record();
        self.inner.insert_expense(expense).await
    }

    async fn get_expense(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>, TrackerError> {
        self.inner.get_expense(user_id, expense_id).await
    }

    async fn update_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, TrackerError> {
        self.record();
        self.inner.update_expense(user_id, expense_id, patch).await
    }

    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<bool, TrackerError> {
        self.record();
        self.inner.delete_expense(user_id, expense_id).await
    }

    async fn list_expenses(&self, user_id: &str, filter: &ExpenseFilter) -> Result<ExpensePage, TrackerError> {
        self.inner.list_expenses(user_id, filter).await
    }

    async fn insert_budget(&self, budget: Budget) -> Result<Budget, TrackerError> {
        self.record();
        self.inner.insert_budget(budget).await
    }

    async fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>, TrackerError> {
        self.inner.get_budget(user_id, budget_id).await
    }

    async fn update_budget_amount(
        &self,
        user_id: &str,
        budget_id: &str,
        amount: f64,
    ) -> Result<Option<Budget>, TrackerError> {
        self.record();
        self.inner.update_budget_amount(user_id, budget_id, amount).await
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<bool, TrackerError> {
        self.record();
        self.inner.delete_budget(user_id, budget_id).await
    }

    async fn list_budgets(&self, user_id: &str, filter: &BudgetFilter) -> Result<Vec<Budget>, TrackerError> {
        self.inner.list_budgets(user_id, filter).await
    }
}

pub fn create_counting_service() -> (TrackerService<InMemoryLogging, CountingStorage, InMemorySessions>, CountingStorage) {
    let storage = CountingStorage::default();
    let service = TrackerService::new(
        storage.clone(),
        InMemoryLogging::new(),
        InMemorySessions::new(),
        test_settings(),
    );
    (service, storage)
}
