//! Read-side rollups: budget consumption, the monthly dashboard and
//! threshold alerts. Everything here is a pure function over rows already
//! scoped to one user.

use crate::constants::{EXCEEDED_THRESHOLD, WARNING_THRESHOLD};
use crate::core::models::{
    Alert, AlertKind, Budget, BudgetStatus, Category, CategoryBreakdown, DashboardSummary, Expense, Month,
    SpendingStatus, TrendPoint,
};
use std::collections::{BTreeMap, HashMap};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole * 100`, or 0 when there is nothing to divide by.
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

pub fn classify(percentage: f64) -> SpendingStatus {
    if percentage >= EXCEEDED_THRESHOLD {
        SpendingStatus::Exceeded
    } else if percentage >= WARNING_THRESHOLD {
        SpendingStatus::Warning
    } else {
        SpendingStatus::Ok
    }
}

/// Total of the expenses filed under `category` whose date falls in `month`.
pub fn spent_in(expenses: &[Expense], category: Category, month: Month) -> f64 {
    expenses
        .iter()
        .filter(|e| e.category == category && month.contains(e.date))
        .map(|e| e.amount)
        .sum()
}

pub fn budget_status(budget: Budget, expenses: &[Expense]) -> BudgetStatus {
    let spent = spent_in(expenses, budget.category, budget.month);
    BudgetStatus {
        spent: round2(spent),
        remaining: round2(budget.amount - spent),
        percentage_used: round1(percentage_of(spent, budget.amount)),
        budget,
    }
}

/// Orders expenses newest first: date descending, then creation time
/// descending. `expenses` must be in insertion order so that rows sharing a
/// date and timestamp still come out latest-inserted first.
pub fn sort_newest_first(expenses: &mut Vec<Expense>) {
    expenses.reverse();
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

/// Builds the dashboard for `month`.
///
/// `month_expenses` are the user's expenses dated in `month`, `budgets` the
/// user's budgets for `month`, and `recent` the newest expenses across all
/// time, already ordered.
pub fn dashboard(
    month: Month,
    month_expenses: &[Expense],
    budgets: &[Budget],
    recent: Vec<Expense>,
) -> DashboardSummary {
    let mut by_category: BTreeMap<Category, f64> = BTreeMap::new();
    let mut by_day: HashMap<chrono::NaiveDate, f64> = HashMap::new();
    for expense in month_expenses.iter().filter(|e| month.contains(e.date)) {
        *by_category.entry(expense.category).or_insert(0.0) += expense.amount;
        *by_day.entry(expense.date).or_insert(0.0) += expense.amount;
    }

    let budget_by_category: HashMap<Category, f64> = budgets
        .iter()
        .filter(|b| b.month == month)
        .map(|b| (b.category, b.amount))
        .collect();

    let total_spent: f64 = by_category.values().sum();
    let total_budgeted: f64 = budget_by_category.values().sum();

    let mut category_breakdown: Vec<CategoryBreakdown> = by_category
        .into_iter()
        .map(|(category, amount)| {
            let budget = budget_by_category.get(&category).copied();
            let status = match budget {
                Some(limit) => classify(percentage_of(amount, limit)),
                None => SpendingStatus::NoBudget,
            };
            CategoryBreakdown {
                category,
                amount: round2(amount),
                percentage: round1(percentage_of(amount, total_spent)),
                budget,
                status,
            }
        })
        .collect();
    // stable sort keeps category order among equal amounts
    category_breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let spending_trend = month
        .days()
        .map(|date| TrendPoint {
            date,
            amount: round2(by_day.get(&date).copied().unwrap_or(0.0)),
        })
        .collect();

    let percentage_used = percentage_of(total_spent, total_budgeted);
    let budget_status = if total_budgeted > 0.0 {
        classify(percentage_used)
    } else {
        SpendingStatus::NoBudget
    };

    DashboardSummary {
        month,
        total_spent: round2(total_spent),
        total_budgeted: round2(total_budgeted),
        remaining: round2(total_budgeted - total_spent),
        percentage_used: round1(percentage_used),
        budget_status,
        category_breakdown,
        spending_trend,
        recent_expenses: recent,
    }
}

/// One alert per budget at or past the warning threshold, highest
/// consumption first. Each budget is measured against its own month.
pub fn alerts(budgets: &[Budget], expenses: &[Expense]) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = budgets
        .iter()
        .filter_map(|budget| {
            let spent = spent_in(expenses, budget.category, budget.month);
            let percentage = percentage_of(spent, budget.amount);
            let (kind, message, over_by, remaining) = match classify(percentage) {
                SpendingStatus::Exceeded => (
                    AlertKind::Exceeded,
                    format!("You've exceeded your {} budget!", budget.category),
                    Some(round2(spent - budget.amount)),
                    None,
                ),
                SpendingStatus::Warning => (
                    AlertKind::Warning,
                    format!("You're approaching your {} budget limit", budget.category),
                    None,
                    Some(round2(budget.amount - spent)),
                ),
                SpendingStatus::Ok | SpendingStatus::NoBudget => return None,
            };
            Some(Alert {
                category: budget.category,
                month: budget.month,
                kind,
                message,
                spent: round2(spent),
                budget: budget.amount,
                percentage: round1(percentage),
                over_by,
                remaining,
            })
        })
        .collect();
    alerts.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    alerts
}
