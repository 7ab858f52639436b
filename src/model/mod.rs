//! Types that represent the core data model, such as `Expense` and `ExpenseFilter`.
mod amount;
mod category;
mod currency;
mod expense;
mod filter;

pub use amount::{Amount, AmountError};
pub use category::Category;
pub use currency::Currency;
pub(crate) use expense::demo_expenses;
pub use expense::{Expense, ExpenseDraft};
pub use filter::{in_range, ExpenseFilter, FilterPatch, SortBy, SortDir};
