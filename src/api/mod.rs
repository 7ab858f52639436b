//! The gateway between the store and wherever expense records are kept.
//!
//! The `Gateway` trait is the store's only view of the record source. Which implementation is used
//! is decided once, when the store is built, from the `Mode`:
//! - `HttpGateway` talks to a REST collection endpoint
//! - `LocalGateway` is for local-only use, where the store's persisted snapshot is the only copy
//! - `TestGateway` is an in-memory stand-in for the REST server

mod http;
mod local;
mod test_gateway;

pub use http::HttpGateway;
pub use local::LocalGateway;
pub use test_gateway::{GatewayOp, TestGateway};

use crate::error::Res;
use crate::model::{Expense, ExpenseDraft};
use crate::Config;
use url::Url;

/// The name of the REST collection that holds expenses.
pub(crate) const COLLECTION: &str = "expenses";

/// The environment variable that puts the program into test mode.
pub const TEST_MODE_ENV: &str = "SPENDLOG_IN_TEST_MODE";

/// Create, read, update and delete operations on the expense collection.
#[async_trait::async_trait]
pub trait Gateway: Send {
    /// Fetches the whole collection.
    async fn list(&mut self) -> Res<Vec<Expense>>;

    /// Creates a record. The gateway assigns the `id` and `created_at`.
    async fn create(&mut self, draft: &ExpenseDraft) -> Res<Expense>;

    /// Replaces the record with the same `id`, returning the record as stored.
    async fn update(&mut self, expense: &Expense) -> Res<Expense>;

    /// Deletes the record with `id`.
    async fn delete(&mut self, id: &str) -> Res<()>;
}

/// Where the expense records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// No server; ids are assigned locally and the persisted snapshot is the only copy.
    Local,
    /// A REST server at the given base URL.
    Remote(Url),
    /// An in-memory server seeded with demo data, so the whole program can run without a network.
    Test,
}

impl Mode {
    /// Chooses `Mode::Test` when `SPENDLOG_IN_TEST_MODE` is set and non-empty, otherwise `Remote`
    /// when the config names an API URL, otherwise `Local`.
    pub fn new(config: &Config) -> Self {
        let test_mode = std::env::var(TEST_MODE_ENV)
            .map(|v| !v.is_empty())
            .unwrap_or(false);
        if test_mode {
            return Mode::Test;
        }
        match config.api_url() {
            Some(url) => Mode::Remote(url.clone()),
            None => Mode::Local,
        }
    }

    /// Builds the gateway for this mode.
    pub fn gateway(&self) -> Box<dyn Gateway> {
        match self {
            Mode::Local => Box::new(LocalGateway),
            Mode::Remote(url) => Box::new(HttpGateway::new(url.clone())),
            Mode::Test => Box::new(TestGateway::default()),
        }
    }
}
