use super::budget::Budget;
use super::category::Category;
use super::expense::Expense;
use super::month::Month;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Share of a budget consumed, as reported next to budgets and categories.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpendingStatus {
    Ok,
    Warning,
    Exceeded,
    NoBudget,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Warning,
    Exceeded,
}

/// A budget together with what has been spent against it.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BudgetStatus {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent: f64,
    pub remaining: f64,
    pub percentage_used: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub amount: f64,
    /// Share of the month's total spending, not of the budget.
    pub percentage: f64,
    pub budget: Option<f64>,
    pub status: SpendingStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TrendPoint {
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DashboardSummary {
    #[schema(value_type = String, example = "2024-06")]
    pub month: Month,
    pub total_spent: f64,
    pub total_budgeted: f64,
    pub remaining: f64,
    pub percentage_used: f64,
    pub budget_status: SpendingStatus,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub spending_trend: Vec<TrendPoint>,
    pub recent_expenses: Vec<Expense>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Alert {
    pub category: Category,
    #[schema(value_type = String, example = "2024-06")]
    pub month: Month,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub spent: f64,
    pub budget: f64,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_by: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
}
