use super::category::Category;
use super::month::Month;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub category: Category,
    pub description: Option<String>,
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

/// Fields a caller may change on an existing expense. `None` leaves the
/// stored value untouched; `description: Some(None)` clears it.
#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.category.is_none() && self.description.is_none() && self.date.is_none()
    }

    pub fn apply(self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
    }
}

/// Date window for listing expenses. A month wins over an explicit range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DateWindow {
    #[default]
    All,
    Month(Month),
    /// Inclusive on both ends; either side may be open.
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            DateWindow::All => true,
            DateWindow::Month(month) => month.contains(date),
            DateWindow::Range { start, end } => {
                start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExpenseFilter {
    pub category: Option<Category>,
    pub window: DateWindow,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl ExpenseFilter {
    pub fn for_month(month: Month) -> Self {
        ExpenseFilter {
            window: DateWindow::Month(month),
            ..Default::default()
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.category.is_none_or(|category| expense.category == category) && self.window.contains(expense.date)
    }
}

/// One page of a filtered listing plus the number of rows matching before
/// pagination.
#[derive(Clone, Debug)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    pub total: usize,
}
