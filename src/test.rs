//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::TestGateway;
use crate::model::{Amount, Category, Expense, ExpenseDraft};
use crate::storage::MemoryStorage;
use crate::{Config, Store};
use chrono::{NaiveDate, Utc};
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment with a spendlog home directory, an in-memory server seeded with the demo
/// expenses and in-memory storage. Holds TempDir to keep the directory alive for the duration of
/// the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
    gateway: TestGateway,
    storage: MemoryStorage,
}

impl TestEnv {
    /// Creates a test environment whose stores talk to a `TestGateway`.
    pub async fn new() -> Self {
        let mut env = Self::local(false).await;
        env.gateway = TestGateway::default();
        env
    }

    /// Creates a test environment with a local-only home directory.
    pub async fn local(seed_demo: bool) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("spendlog");
        let config = Config::create(&root, None, seed_demo).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
            gateway: TestGateway::new(Vec::new()),
            storage: MemoryStorage::default(),
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// The in-memory server. Use it to script failures and inspect what the server holds.
    pub fn gateway(&self) -> &TestGateway {
        &self.gateway
    }

    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    /// Opens and loads a store over this environment's gateway and storage. Stores opened from the
    /// same environment share both.
    pub async fn store(&self) -> Store {
        let mut store = Store::new(
            Box::new(self.gateway.clone()),
            Box::new(self.storage.clone()),
        )
        .with_undo_window(self.config.undo_window());
        store.load().await;
        store
    }
}

/// Builds an expense with a fixed id, e.g. `expense("a", "9.99", Category::Food, "2025-11-02")`.
pub fn expense(id: &str, amount: &str, category: Category, date: &str) -> Expense {
    Expense::from_draft(
        id,
        Utc::now(),
        ExpenseDraft::new(
            Amount::from_str(amount).unwrap(),
            category,
            None,
            NaiveDate::from_str(date).unwrap(),
        ),
    )
}
