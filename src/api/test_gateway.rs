//! Implements the `Gateway` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a REST server.

use crate::api::Gateway;
use crate::error::Res;
use crate::model::{demo_expenses, Expense, ExpenseDraft};
use anyhow::bail;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;

/// The operations of the `Gateway` trait, used to script failures and to inspect calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Default)]
struct State {
    records: Vec<Expense>,
    failures: HashMap<GatewayOp, String>,
    calls: Vec<GatewayOp>,
    next_id: u64,
}

/// An in-memory imitation of the REST server. Clones share state, so a test can keep a handle
/// while the store owns another, then script failures and inspect what the "server" holds.
#[derive(Debug, Clone)]
pub struct TestGateway {
    state: Arc<Mutex<State>>,
}

impl TestGateway {
    /// Create a `TestGateway` holding `records`.
    pub fn new(records: Vec<Expense>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                records,
                ..State::default()
            })),
        }
    }

    /// A snapshot of the records the server holds.
    pub async fn records(&self) -> Vec<Expense> {
        self.state.lock().await.records.clone()
    }

    /// Makes every call of `op` fail with `message` until `recover` is called.
    pub async fn fail(&self, op: GatewayOp, message: impl Into<String>) {
        self.state.lock().await.failures.insert(op, message.into());
    }

    pub async fn recover(&self, op: GatewayOp) {
        self.state.lock().await.failures.remove(&op);
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<GatewayOp> {
        self.state.lock().await.calls.clone()
    }
}

impl Default for TestGateway {
    /// Seeds the server with the demo expenses.
    fn default() -> Self {
        Self::new(demo_expenses())
    }
}

impl State {
    fn begin(&mut self, op: GatewayOp) -> Res<()> {
        trace!("TestGateway received {op:?}");
        self.calls.push(op);
        if let Some(message) = self.failures.get(&op) {
            bail!("{message}");
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Res<usize> {
        match self.records.iter().position(|e| e.id() == id) {
            Some(ix) => Ok(ix),
            None => bail!("404 Not Found: no expense with id '{id}'"),
        }
    }
}

#[async_trait::async_trait]
impl Gateway for TestGateway {
    async fn list(&mut self) -> Res<Vec<Expense>> {
        let mut state = self.state.lock().await;
        state.begin(GatewayOp::List)?;
        Ok(state.records.clone())
    }

    async fn create(&mut self, draft: &ExpenseDraft) -> Res<Expense> {
        let mut state = self.state.lock().await;
        state.begin(GatewayOp::Create)?;
        state.next_id += 1;
        let expense = Expense::from_draft(
            format!("srv-{}", state.next_id),
            Utc::now(),
            draft.clone(),
        );
        state.records.insert(0, expense.clone());
        Ok(expense)
    }

    async fn update(&mut self, expense: &Expense) -> Res<Expense> {
        let mut state = self.state.lock().await;
        state.begin(GatewayOp::Update)?;
        let ix = state.position(expense.id())?;
        state.records[ix] = expense.clone();
        Ok(expense.clone())
    }

    async fn delete(&mut self, id: &str) -> Res<()> {
        let mut state = self.state.lock().await;
        state.begin(GatewayOp::Delete)?;
        let ix = state.position(id)?;
        state.records.remove(ix);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_failure_and_recovery() {
        let handle = TestGateway::new(Vec::new());
        let mut gateway = handle.clone();
        handle.fail(GatewayOp::List, "503 Service Unavailable").await;
        let err = gateway.list().await.unwrap_err();
        assert_eq!(err.to_string(), "503 Service Unavailable");

        handle.recover(GatewayOp::List).await;
        assert!(gateway.list().await.unwrap().is_empty());
        assert_eq!(handle.calls().await, vec![GatewayOp::List, GatewayOp::List]);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let handle = TestGateway::new(Vec::new());
        let mut gateway = handle.clone();
        let draft = demo_expenses()[0].to_draft();

        let created = gateway.create(&draft).await.unwrap();
        assert_eq!(created.id(), "srv-1");

        let mut edited = created.clone();
        edited.note = Some("Bagel".into());
        let updated = gateway.update(&edited).await.unwrap();
        assert_eq!(updated.note.as_deref(), Some("Bagel"));
        assert_eq!(handle.records().await, vec![updated]);

        gateway.delete("srv-1").await.unwrap();
        assert!(handle.records().await.is_empty());
        assert!(gateway.delete("srv-1").await.is_err());
    }

    #[tokio::test]
    async fn test_default_is_seeded() {
        let mut gateway = TestGateway::default();
        assert_eq!(gateway.list().await.unwrap().len(), 4);
    }
}
