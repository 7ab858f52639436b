//! The expense store: the one owner of the expense collection and everything derived from it.
//!
//! Every mutation goes through a `Store` method. After a mutation the store recomputes the
//! filtered view and its totals, publishes a fresh `Snapshot` to subscribers, and mirrors the
//! collection and currency to storage. Reads through the accessors always reflect the latest
//! mutation.
//!
//! Mutations take `&mut self`, so there is exactly one writer at a time, including across the
//! awaits on the gateway. To share a store between tasks, wrap it in
//! `Arc<tokio::sync::Mutex<Store>>`.
//!
//! Gateway failures are recorded in `error()` and also returned to the caller.

mod undo;

pub use undo::DEFAULT_UNDO_WINDOW;

use crate::api::Gateway;
use crate::error::{Error, ErrorType, Result};
use crate::model::{Amount, Category, Currency, Expense, ExpenseDraft, ExpenseFilter, FilterPatch};
use crate::report;
use crate::storage::{self, Storage, CURRENCY_KEY, EXPENSES_KEY};
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};
use undo::UndoBuffer;

/// Everything derived from the collection and the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub filtered_expenses: Vec<Expense>,
    pub total: Amount,
    pub totals_by_category: Vec<(Category, Amount)>,
    pub totals_by_month: Vec<(String, Amount)>,
}

impl View {
    fn compute(expenses: &[Expense], filter: &ExpenseFilter) -> Self {
        let filtered_expenses = filter.apply(expenses);
        Self {
            total: report::total(&filtered_expenses),
            totals_by_category: report::by_category(&filtered_expenses),
            totals_by_month: report::by_month(&filtered_expenses),
            filtered_expenses,
        }
    }
}

/// A point-in-time copy of the store's state, as published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub expenses: Vec<Expense>,
    pub view: View,
    pub filter: ExpenseFilter,
    pub currency: Currency,
    pub loading: bool,
    pub error: Option<String>,
    pub editing: Option<Expense>,
    pub last_deleted: Option<Expense>,
}

pub struct Store {
    gateway: Box<dyn Gateway>,
    storage: Box<dyn Storage>,
    seed: Vec<Expense>,
    expenses: Vec<Expense>,
    filter: ExpenseFilter,
    currency: Currency,
    loading: bool,
    error: Option<String>,
    editing: Option<Expense>,
    undo: UndoBuffer,
    view: View,
    notify: Arc<watch::Sender<Snapshot>>,
}

impl Store {
    /// Create an empty store. Call `load` to populate it.
    pub fn new(gateway: Box<dyn Gateway>, storage: Box<dyn Storage>) -> Self {
        let (notify, _) = watch::channel(Snapshot::default());
        Self {
            gateway,
            storage,
            seed: Vec::new(),
            expenses: Vec::new(),
            filter: ExpenseFilter::default(),
            currency: Currency::default(),
            loading: false,
            error: None,
            editing: None,
            undo: UndoBuffer::new(DEFAULT_UNDO_WINDOW),
            view: View::default(),
            notify: Arc::new(notify),
        }
    }

    /// The expenses `load` falls back to when neither the gateway nor storage has any.
    pub fn with_seed(mut self, seed: Vec<Expense>) -> Self {
        self.seed = seed;
        self
    }

    /// How long a deleted expense can be restored with `undo_delete`.
    pub fn with_undo_window(mut self, window: Duration) -> Self {
        self.undo = UndoBuffer::new(window);
        self
    }

    /// Receives a new `Snapshot` after every change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.notify.subscribe()
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn find(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id() == id)
    }

    pub fn filtered_expenses(&self) -> &[Expense] {
        &self.view.filtered_expenses
    }

    pub fn total(&self) -> Amount {
        self.view.total
    }

    pub fn totals_by_category(&self) -> &[(Category, Amount)] {
        &self.view.totals_by_category
    }

    pub fn totals_by_month(&self) -> &[(String, Amount)] {
        &self.view.totals_by_month
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn filter(&self) -> &ExpenseFilter {
        &self.filter
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The message of the most recent failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.publish();
    }

    pub fn editing(&self) -> Option<&Expense> {
        self.editing.as_ref()
    }

    /// The expense that `undo_delete` would restore, if the undo window is still open.
    pub fn last_deleted(&self) -> Option<&Expense> {
        self.undo.current()
    }

    pub fn undo_window(&self) -> Duration {
        self.undo.window()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            expenses: self.expenses.clone(),
            view: self.view.clone(),
            filter: self.filter.clone(),
            currency: self.currency,
            loading: self.loading,
            error: self.error.clone(),
            editing: self.editing.clone(),
            last_deleted: self.undo.current().cloned(),
        }
    }

    /// Populates the collection, in order of preference, from the gateway, from the snapshot in
    /// storage, or from the seed. A gateway failure is recorded in `error()` but does not stop
    /// the load. Also restores the persisted currency.
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;
        self.publish();

        let fetched = self
            .gateway
            .list()
            .await
            .context("Failed to load expenses");
        let expenses = match fetched {
            Ok(expenses) if !expenses.is_empty() => {
                debug!("Loaded {} expenses from the gateway", expenses.len());
                expenses
            }
            other => {
                if let Err(e) = other {
                    let message = format!("{e:#}");
                    warn!("{message}");
                    self.error = Some(message);
                }
                match storage::get::<Vec<Expense>>(self.storage.as_ref(), EXPENSES_KEY).await {
                    Some(saved) if !saved.is_empty() => {
                        debug!("Restored {} expenses from storage", saved.len());
                        saved
                    }
                    _ => {
                        debug!("Starting with {} seed expenses", self.seed.len());
                        self.seed.clone()
                    }
                }
            }
        };
        self.expenses = dedupe(expenses);

        if let Some(currency) = storage::get::<Currency>(self.storage.as_ref(), CURRENCY_KEY).await
        {
            self.currency = currency;
        }
        storage::set(self.storage.as_ref(), CURRENCY_KEY, &self.currency).await;

        self.loading = false;
        self.collection_changed().await;
    }

    /// Creates an expense through the gateway and puts it at the front of the collection.
    /// Nothing is inserted unless the gateway succeeds.
    pub async fn add(&mut self, draft: ExpenseDraft) -> Result<Expense> {
        let created = match self.create(&draft).await {
            Ok(created) => created,
            Err(e) => return Err(self.fail(ErrorType::Gateway, e.context("Failed to add expense"))),
        };
        debug!("Added expense {}", created.id());
        self.expenses.insert(0, created.clone());
        self.collection_changed().await;
        Ok(created)
    }

    /// Starts editing a copy of `expense`. Changes to the copy do not touch the collection until
    /// `save_edit` succeeds.
    pub fn begin_edit(&mut self, expense: &Expense) {
        self.editing = Some(expense.clone());
        self.publish();
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.publish();
    }

    /// Saves `updated` through the gateway and replaces the expense with the same id with the
    /// gateway's version. Fails with `ErrorType::NotFound`, without calling the gateway, if the
    /// expense has been deleted in the meantime. On failure the edit copy is kept.
    pub async fn save_edit(&mut self, updated: Expense) -> Result<Expense> {
        let Some(ix) = self.position(updated.id()) else {
            let e = anyhow!("Expense '{}' no longer exists", updated.id());
            return Err(self.fail(ErrorType::NotFound, e));
        };

        let confirmed = match self.gateway.update(&updated).await {
            Ok(confirmed) => confirmed,
            Err(e) => {
                return Err(self.fail(ErrorType::Gateway, e.context("Failed to update expense")))
            }
        };
        if confirmed.id() != updated.id() && self.position(confirmed.id()).is_some() {
            let e = anyhow!(
                "Failed to update expense: the server answered with the id '{}' of another expense",
                confirmed.id()
            );
            return Err(self.fail(ErrorType::Gateway, e));
        }

        debug!("Updated expense {}", confirmed.id());
        self.expenses[ix] = confirmed.clone();
        self.editing = None;
        self.collection_changed().await;
        Ok(confirmed)
    }

    /// Removes the expense immediately, keeps it in the undo buffer, then asks the gateway to
    /// delete it. If the gateway fails the expense is put back at the front of the collection
    /// and the undo buffer is cleared. Returns `Ok(None)` if there is no expense with `id`.
    pub async fn remove(&mut self, id: &str) -> Result<Option<Expense>> {
        let Some(ix) = self.position(id) else {
            debug!("Nothing to remove for id {id}");
            return Ok(None);
        };
        let removed = self.expenses.remove(ix);
        self.undo.arm(removed.clone(), Arc::clone(&self.notify));
        self.collection_changed().await;

        match self.gateway.delete(id).await {
            Ok(()) => {
                debug!("Deleted expense {id}");
                Ok(Some(removed))
            }
            Err(e) => {
                warn!("Restoring expense {id} after a failed delete");
                self.undo.clear();
                self.expenses.insert(0, removed);
                self.collection_changed().await;
                Err(self.fail(ErrorType::Gateway, e.context("Failed to delete expense")))
            }
        }
    }

    /// Recreates the most recently deleted expense as a new record (it gets a new id). Returns
    /// `Ok(None)` if nothing was deleted or the undo window has passed. On failure the undo
    /// buffer is kept so the undo can be retried.
    pub async fn undo_delete(&mut self) -> Result<Option<Expense>> {
        let Some(deleted) = self.undo.current() else {
            return Ok(None);
        };
        let draft = deleted.to_draft();

        let created = match self.create(&draft).await {
            Ok(created) => created,
            Err(e) => {
                return Err(self.fail(ErrorType::Gateway, e.context("Failed to restore expense")))
            }
        };
        debug!("Restored deleted expense as {}", created.id());
        self.undo.clear();
        self.expenses.insert(0, created.clone());
        self.collection_changed().await;
        Ok(Some(created))
    }

    /// Merges `patch` into the current filter.
    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.filter.merge(patch);
        self.refresh();
    }

    /// Restores the default filter: no restrictions, newest date first.
    pub fn reset_filter(&mut self) {
        self.filter = ExpenseFilter::default();
        self.refresh();
    }

    pub async fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
        storage::set(self.storage.as_ref(), CURRENCY_KEY, &self.currency).await;
        self.publish();
    }

    /// Creates through the gateway and rejects an id that is already in the collection.
    async fn create(&mut self, draft: &ExpenseDraft) -> anyhow::Result<Expense> {
        let created = self.gateway.create(draft).await?;
        if self.position(created.id()).is_some() {
            anyhow::bail!("The server assigned the id '{}' which is already in use", created.id());
        }
        Ok(created)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.expenses.iter().position(|e| e.id() == id)
    }

    /// Records the failure in `error()` and returns it for the caller.
    fn fail(&mut self, error_type: ErrorType, e: anyhow::Error) -> Error {
        let error = Error::new(error_type, e);
        warn!("{error}");
        self.error = Some(error.message());
        self.publish();
        error
    }

    async fn collection_changed(&mut self) {
        self.refresh();
        storage::set(self.storage.as_ref(), EXPENSES_KEY, &self.expenses).await;
    }

    fn refresh(&mut self) {
        self.view = View::compute(&self.expenses, &self.filter);
        self.publish();
    }

    fn publish(&self) {
        self.notify.send_replace(self.snapshot());
    }
}

/// Keeps the first expense for each id.
fn dedupe(expenses: Vec<Expense>) -> Vec<Expense> {
    let mut seen = HashSet::new();
    let before = expenses.len();
    let unique: Vec<Expense> = expenses
        .into_iter()
        .filter(|e| seen.insert(e.id().to_string()))
        .collect();
    if unique.len() != before {
        warn!("Dropped {} expenses with duplicate ids", before - unique.len());
    }
    unique
}
