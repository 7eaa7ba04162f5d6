pub mod audit;
pub mod budget;
pub mod category;
pub mod expense;
pub mod month;
pub mod summary;
pub mod user;

pub use audit::AppLog;
pub use budget::{Budget, BudgetFilter};
pub use category::Category;
pub use expense::{DateWindow, Expense, ExpenseFilter, ExpensePage, ExpensePatch};
pub use month::Month;
pub use summary::{AlertKind, Alert, BudgetStatus, CategoryBreakdown, DashboardSummary, SpendingStatus, TrendPoint};
pub use user::User;
