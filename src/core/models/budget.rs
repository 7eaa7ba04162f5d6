use super::category::Category;
use super::month::Month;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    pub amount: f64,
    #[schema(value_type = String, example = "2024-06")]
    pub month: Month,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BudgetFilter {
    pub month: Option<Month>,
    pub category: Option<Category>,
}

impl BudgetFilter {
    pub fn matches(&self, budget: &Budget) -> bool {
        self.month.is_none_or(|month| budget.month == month)
            && self.category.is_none_or(|category| budget.category == category)
    }
}
