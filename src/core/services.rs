use crate::auth::AuthSettings;
use crate::auth::jwt::{Claims, JwtService};
use crate::constants::{
    BUDGET_CREATED, BUDGET_DELETED, BUDGET_UPDATED, EXPENSE_CREATED, EXPENSE_DELETED, EXPENSE_UPDATED,
    MAX_AMOUNT, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_PAGE_SIZE, MIN_PASSWORD_LENGTH,
    RECENT_EXPENSES_LIMIT, TOKEN_REFRESHED, USER_LOGGED_IN, USER_LOGGED_OUT, USER_SIGNED_UP,
};
use crate::core::analytics::{self, round2};
use crate::core::errors::TrackerError;
use crate::core::models::{
    Alert, AppLog, Budget, BudgetFilter, BudgetStatus, Category, DashboardSummary, Expense, ExpenseFilter,
    ExpensePatch, Month, User,
};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::session::SessionStore;
use crate::infrastructure::storage::Storage;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::collections::BTreeSet;
use tracing::{info, warn};
use uuid::Uuid;

/// A signed-in user with a fresh token pair.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct ExpenseList {
    pub expenses: Vec<Expense>,
    pub total: usize,
    pub total_amount: f64,
}

#[derive(Debug, Clone)]
pub struct BudgetList {
    pub budgets: Vec<BudgetStatus>,
    pub total_budget: f64,
    pub total_spent: f64,
}

pub struct TrackerService<L: LoggingService, S: Storage, T: SessionStore> {
    storage: S,
    logging: L,
    sessions: T,
    jwt_service: JwtService,
    settings: AuthSettings,
}

impl<L: LoggingService, S: Storage, T: SessionStore> TrackerService<L, S, T> {
    pub fn new(storage: S, logging: L, sessions: T, settings: AuthSettings) -> Self {
        TrackerService {
            storage,
            logging,
            sessions,
            jwt_service: JwtService::new(settings.jwt_secret.clone(), settings.access_token_ttl),
            settings,
        }
    }

    /// Records an audit entry for a change that is already committed. A
    /// failure here is logged and does not fail the request.
    async fn audit(&self, action: &str, details: serde_json::Value, user_id: &str) {
        if let Err(e) = self.logging.log_action(action, details, Some(user_id)).await {
            warn!(action, user_id, error = %e, "failed to record audit entry");
        }
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), TrackerError> {
        if value.trim().is_empty() {
            return Err(TrackerError::invalid_input(
                field,
                format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.chars().count() > max_length {
            return Err(TrackerError::invalid_input(
                field,
                format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
            return Err(TrackerError::invalid_input(
                field,
                format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    /// Checks an amount and returns it rounded to cents.
    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<f64, TrackerError> {
        if !amount.is_finite() {
            return Err(TrackerError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be a finite number",
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(TrackerError::invalid_input(
                field,
                "Amount Too Large",
                "Amount cannot exceed 1,000,000",
            ));
        }
        let rounded = round2(amount);
        if rounded <= 0.0 {
            return Err(TrackerError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be greater than 0",
            ));
        }
        Ok(rounded)
    }

    /// Blank descriptions are stored as absent.
    fn normalize_description(&self, description: Option<String>) -> Result<Option<String>, TrackerError> {
        match description {
            Some(text) if !text.trim().is_empty() => {
                self.validate_string_input("description", &text, MAX_DESCRIPTION_LENGTH)?;
                Ok(Some(text.trim().to_string()))
            }
            _ => Ok(None),
        }
    }

    // ---- authentication ----

    async fn issue_session(&self, user: User) -> Result<AuthSession, TrackerError> {
        let access_token = self.jwt_service.generate_token(&user.id, &user.email)?;
        let refresh_token = Uuid::new_v4().to_string();
        self.sessions
            .save_refresh_token(&refresh_token, &user.id, self.settings.refresh_token_ttl)
            .await?;
        Ok(AuthSession {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Decodes a bearer token and rejects it if it was revoked by a logout.
    pub async fn validate_token(&self, token: &str) -> Result<Claims, TrackerError> {
        let claims = self.jwt_service.validate_token(token)?;
        if self.sessions.is_access_token_revoked(&claims.jti).await? {
            return Err(TrackerError::Unauthorized("Token has been revoked".to_string()));
        }
        Ok(claims)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        confirm_password: Option<&str>,
        full_name: Option<String>,
    ) -> Result<AuthSession, TrackerError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(TrackerError::MissingEmail);
        }
        if !email.contains('@') || !email.contains('.') || email.len() < 5 {
            return Err(TrackerError::InvalidEmail(email.to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(TrackerError::PasswordTooShort(MIN_PASSWORD_LENGTH));
        }
        if confirm_password.is_some_and(|confirm| confirm != password) {
            return Err(TrackerError::PasswordMismatch);
        }
        let full_name = match full_name {
            Some(name) if !name.trim().is_empty() => {
                self.validate_string_input("full_name", &name, MAX_NAME_LENGTH)?;
                Some(name.trim().to_string())
            }
            _ => None,
        };

        let password_hash = bcrypt::hash(password, self.settings.bcrypt_cost)
            .map_err(|e| TrackerError::InternalServerError(format!("Password hashing error: {}", e)))?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name,
            password_hash,
            created_at: Utc::now(),
        };

        let user = self
            .storage
            .create_user_if_not_exists(user)
            .await?
            .ok_or_else(|| TrackerError::EmailAlreadyRegistered(email.to_string()))?;

        self.audit(USER_SIGNED_UP, json!({ "email": user.email }), &user.id).await;
        info!(user_id = %user.id, "user signed up");
        self.issue_session(user).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, TrackerError> {
        let user = self
            .storage
            .get_user_by_email(email)
            .await?
            .ok_or(TrackerError::InvalidCredentials)?;

        if !bcrypt::verify(password, &user.password_hash)
            .map_err(|e| TrackerError::InternalServerError(format!("Password verification error: {}", e)))?
        {
            warn!(user_id = %user.id, "failed login attempt");
            return Err(TrackerError::InvalidCredentials);
        }

        self.audit(USER_LOGGED_IN, json!({}), &user.id).await;
        self.issue_session(user).await
    }

    /// Revokes the presented access token and every refresh token of its owner.
    pub async fn logout(&self, claims: &Claims) -> Result<(), TrackerError> {
        self.sessions
            .revoke_access_token(&claims.jti, claims.valid_until())
            .await?;
        self.sessions.revoke_user_sessions(&claims.sub).await?;
        self.audit(USER_LOGGED_OUT, json!({}), &claims.sub).await;
        Ok(())
    }

    /// Exchanges a refresh token for a new pair. The old refresh token is
    /// consumed either way.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, TrackerError> {
        let user_id = self
            .sessions
            .take_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| TrackerError::Unauthorized("Invalid refresh token".to_string()))?;
        let user = self
            .storage
            .get_user(&user_id)
            .await?
            .ok_or_else(|| TrackerError::Unauthorized("Invalid refresh token".to_string()))?;
        self.audit(TOKEN_REFRESHED, json!({}), &user.id).await;
        self.issue_session(user).await
    }

    pub async fn current_user(&self, user_id: &str) -> Result<User, TrackerError> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| TrackerError::UserNotFound(user_id.to_string()))
    }

    // ---- expenses ----

    pub async fn create_expense(&self, user_id: &str, new: NewExpense) -> Result<Expense, TrackerError> {
        let amount = self.validate_amount_input("amount", new.amount)?;
        let description = self.normalize_description(new.description)?;

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            amount,
            category: new.category,
            description,
            date: new.date,
            created_at: Utc::now(),
        };
        let expense = self.storage.insert_expense(expense).await?;

        self.audit(
            EXPENSE_CREATED,
            json!({ "expense_id": expense.id, "amount": expense.amount, "category": expense.category }),
            user_id,
        )
        .await;
        Ok(expense)
    }

    pub async fn get_expense(&self, user_id: &str, expense_id: &str) -> Result<Expense, TrackerError> {
        self.storage
            .get_expense(user_id, expense_id)
            .await?
            .ok_or_else(|| TrackerError::ExpenseNotFound(expense_id.to_string()))
    }

    /// Applies a partial update. An empty patch returns the stored row; a
    /// blank description clears it.
    pub async fn update_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        mut patch: ExpensePatch,
    ) -> Result<Expense, TrackerError> {
        if let Some(amount) = patch.amount {
            patch.amount = Some(self.validate_amount_input("amount", amount)?);
        }
        if let Some(description) = patch.description.take() {
            patch.description = Some(self.normalize_description(description)?);
        }

        if patch.is_empty() {
            return self.get_expense(user_id, expense_id).await;
        }

        let expense = self
            .storage
            .update_expense(user_id, expense_id, patch)
            .await?
            .ok_or_else(|| TrackerError::ExpenseNotFound(expense_id.to_string()))?;

        self.audit(
            EXPENSE_UPDATED,
            json!({ "expense_id": expense.id, "amount": expense.amount, "category": expense.category }),
            user_id,
        )
        .await;
        Ok(expense)
    }

    pub async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<(), TrackerError> {
        if !self.storage.delete_expense(user_id, expense_id).await? {
            return Err(TrackerError::ExpenseNotFound(expense_id.to_string()));
        }
        self.audit(EXPENSE_DELETED, json!({ "expense_id": expense_id }), user_id).await;
        Ok(())
    }

    pub async fn list_expenses(&self, user_id: &str, filter: ExpenseFilter) -> Result<ExpenseList, TrackerError> {
        if let Some(limit) = filter.limit {
            if limit == 0 || limit > MAX_PAGE_SIZE {
                return Err(TrackerError::invalid_input(
                    "limit",
                    "Invalid limit",
                    format!("limit must be between 1 and {}", MAX_PAGE_SIZE),
                ));
            }
        }
        let page = self.storage.list_expenses(user_id, &filter).await?;
        let total_amount = round2(page.expenses.iter().map(|e| e.amount).sum());
        Ok(ExpenseList {
            expenses: page.expenses,
            total: page.total,
            total_amount,
        })
    }

    // ---- budgets ----

    async fn month_expenses(&self, user_id: &str, month: Month) -> Result<Vec<Expense>, TrackerError> {
        Ok(self
            .storage
            .list_expenses(user_id, &ExpenseFilter::for_month(month))
            .await?
            .expenses)
    }

    async fn budget_status(&self, budget: Budget) -> Result<BudgetStatus, TrackerError> {
        let expenses = self.month_expenses(&budget.user_id, budget.month).await?;
        Ok(analytics::budget_status(budget, &expenses))
    }

    /// Expenses covering every month any of `budgets` refers to.
    async fn expenses_for_budgets(&self, user_id: &str, budgets: &[Budget]) -> Result<Vec<Expense>, TrackerError> {
        let months: BTreeSet<Month> = budgets.iter().map(|b| b.month).collect();
        let mut expenses = Vec::new();
        for month in months {
            expenses.extend(self.month_expenses(user_id, month).await?);
        }
        Ok(expenses)
    }

    pub async fn create_budget(
        &self,
        user_id: &str,
        category: Category,
        amount: f64,
        month: Month,
    ) -> Result<BudgetStatus, TrackerError> {
        let amount = self.validate_amount_input("amount", amount)?;
        let budget = Budget {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            category,
            amount,
            month,
            created_at: Utc::now(),
        };
        let budget = self.storage.insert_budget(budget).await?;

        self.audit(
            BUDGET_CREATED,
            json!({ "budget_id": budget.id, "category": budget.category, "month": budget.month, "amount": budget.amount }),
            user_id,
        )
        .await;
        self.budget_status(budget).await
    }

    pub async fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<BudgetStatus, TrackerError> {
        let budget = self
            .storage
            .get_budget(user_id, budget_id)
            .await?
            .ok_or_else(|| TrackerError::BudgetNotFound(budget_id.to_string()))?;
        self.budget_status(budget).await
    }

    /// Only the amount of a budget can change. `None` returns it as stored.
    pub async fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        amount: Option<f64>,
    ) -> Result<BudgetStatus, TrackerError> {
        let Some(amount) = amount else {
            return self.get_budget(user_id, budget_id).await;
        };
        let amount = self.validate_amount_input("amount", amount)?;
        let budget = self
            .storage
            .update_budget_amount(user_id, budget_id, amount)
            .await?
            .ok_or_else(|| TrackerError::BudgetNotFound(budget_id.to_string()))?;

        self.audit(
            BUDGET_UPDATED,
            json!({ "budget_id": budget.id, "amount": budget.amount }),
            user_id,
        )
        .await;
        self.budget_status(budget).await
    }

    pub async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<(), TrackerError> {
        if !self.storage.delete_budget(user_id, budget_id).await? {
            return Err(TrackerError::BudgetNotFound(budget_id.to_string()));
        }
        self.audit(BUDGET_DELETED, json!({ "budget_id": budget_id }), user_id).await;
        Ok(())
    }

    pub async fn list_budgets(&self, user_id: &str, filter: BudgetFilter) -> Result<BudgetList, TrackerError> {
        let budgets = self.storage.list_budgets(user_id, &filter).await?;
        let expenses = self.expenses_for_budgets(user_id, &budgets).await?;

        let budgets: Vec<BudgetStatus> = budgets
            .into_iter()
            .map(|budget| analytics::budget_status(budget, &expenses))
            .collect();
        let total_budget = round2(budgets.iter().map(|b| b.budget.amount).sum());
        let total_spent = round2(budgets.iter().map(|b| b.spent).sum());

        Ok(BudgetList {
            budgets,
            total_budget,
            total_spent,
        })
    }

    // ---- dashboard ----

    /// Summary for `month`, or the current month when `None`.
    pub async fn dashboard(&self, user_id: &str, month: Option<Month>) -> Result<DashboardSummary, TrackerError> {
        let month = month.unwrap_or_else(Month::current);
        let budget_filter = BudgetFilter {
            month: Some(month),
            category: None,
        };
        let recent_filter = ExpenseFilter {
            limit: Some(RECENT_EXPENSES_LIMIT),
            ..Default::default()
        };

        let (month_expenses, budgets, recent) = futures::try_join!(
            self.month_expenses(user_id, month),
            self.storage.list_budgets(user_id, &budget_filter),
            self.storage.list_expenses(user_id, &recent_filter),
        )?;

        Ok(analytics::dashboard(month, &month_expenses, &budgets, recent.expenses))
    }

    /// Threshold alerts for the budgets of `month` (current month when `None`).
    pub async fn alerts(&self, user_id: &str, month: Option<Month>) -> Result<Vec<Alert>, TrackerError> {
        let month = month.unwrap_or_else(Month::current);
        let budgets = self
            .storage
            .list_budgets(
                user_id,
                &BudgetFilter {
                    month: Some(month),
                    category: None,
                },
            )
            .await?;
        let expenses = self.month_expenses(user_id, month).await?;
        Ok(analytics::alerts(&budgets, &expenses))
    }

    pub async fn activity(&self, user_id: &str) -> Result<Vec<AppLog>, TrackerError> {
        self.logging.get_logs(user_id).await
    }
}
