//! Implements the `Gateway` trait for local-only use.

use crate::api::Gateway;
use crate::error::Res;
use crate::model::{Expense, ExpenseDraft};
use crate::utils::generate_expense_id;
use chrono::Utc;
use tracing::trace;

/// A gateway with nothing behind it. It assigns ids and timestamps itself and accepts every
/// update and delete, leaving the store's persisted snapshot as the only copy of the data.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalGateway;

#[async_trait::async_trait]
impl Gateway for LocalGateway {
    async fn list(&mut self) -> Res<Vec<Expense>> {
        Ok(Vec::new())
    }

    async fn create(&mut self, draft: &ExpenseDraft) -> Res<Expense> {
        let expense = Expense::from_draft(generate_expense_id(), Utc::now(), draft.clone());
        trace!("Created local expense {}", expense.id());
        Ok(expense)
    }

    async fn update(&mut self, expense: &Expense) -> Res<Expense> {
        Ok(expense.clone())
    }

    async fn delete(&mut self, _id: &str) -> Res<()> {
        Ok(())
    }
}
