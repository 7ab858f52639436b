//! Command handlers for the spendlog CLI.
//!
//! This module contains implementations for all CLI subcommands. The handlers for the store
//! commands take an open `Store`, so that `spendlog shell` can run many of them against the same
//! store.

mod add;
mod auth;
mod categories;
mod currency;
mod delete;
mod edit;
mod init;
mod list;
mod shell;
mod summary;

use crate::args::StoreCommand;
use crate::model::demo_expenses;
use crate::{Auth, Config, Mode, Result, Store};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use auth::{login, logout, require_login};
pub use categories::categories;
pub use currency::currency;
pub use delete::{delete, undo};
pub use edit::edit;
pub use init::init;
pub use list::list;
pub use shell::shell;
pub use summary::{summary, Summary};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Builds the store for `mode` from the settings in `config` and loads it.
///
/// The demo expenses are only used as the seed for a local-only install that asked for them; a
/// remote API is the source of truth for its own data.
pub async fn open_store(config: &Config, mode: &Mode) -> Result<Store> {
    let seed = match mode {
        Mode::Local if config.seed_demo() => demo_expenses(),
        _ => Vec::new(),
    };
    let mut store = Store::new(mode.gateway(), Box::new(config.storage()))
        .with_seed(seed)
        .with_undo_window(config.undo_window());
    store.load().await;
    Ok(store)
}

/// Runs one store command and prints its output.
pub async fn dispatch(store: &mut Store, command: &StoreCommand) -> Result<()> {
    debug!("Running '{}'", command.name());
    let _: () = match command {
        StoreCommand::List(args) => list(store, args).await?.print(),
        StoreCommand::Add(args) => add(store, args).await?.print(),
        StoreCommand::Edit(args) => edit(store, args).await?.print(),
        StoreCommand::Delete(args) => delete(store, args).await?.print(),
        StoreCommand::Undo => undo(store).await?.print(),
        StoreCommand::Summary(args) => summary(store, args).await?.print(),
        StoreCommand::Currency(args) => currency(store, args).await?.print(),
        StoreCommand::Categories => categories().print(),
    };
    Ok(())
}

/// Builds an `Auth` over the persisted state in `config`.
fn auth_for(config: &Config) -> Auth {
    Auth::new(Box::new(config.storage()))
}
