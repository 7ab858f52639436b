//! The single-slot undo buffer for deletions.

use crate::model::Expense;
use crate::store::Snapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// How long a deleted expense can be restored.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_millis(8000);

/// Holds the most recently deleted expense until its window runs out.
///
/// The deadline is authoritative: once it passes, `current` returns `None` whether or not the
/// expiry task has run. The task only exists to tell subscribers that the slot emptied.
#[derive(Debug)]
pub(crate) struct UndoBuffer {
    window: Duration,
    slot: Option<(Expense, Instant)>,
    timer: Option<JoinHandle<()>>,
}

impl UndoBuffer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            slot: None,
            timer: None,
        }
    }

    pub(crate) fn window(&self) -> Duration {
        self.window
    }

    /// Puts `expense` in the slot, replacing whatever was there and cancelling its timer.
    pub(crate) fn arm(&mut self, expense: Expense, notify: Arc<watch::Sender<Snapshot>>) {
        self.cancel_timer();
        let deadline = Instant::now() + self.window;
        let id = expense.id().to_string();
        self.slot = Some((expense, deadline));
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            debug!("Undo window for expense {id} has expired");
            notify.send_if_modified(|snapshot| {
                let expired = snapshot
                    .last_deleted
                    .as_ref()
                    .is_some_and(|e| e.id() == id);
                if expired {
                    snapshot.last_deleted = None;
                }
                expired
            });
        }));
    }

    /// The buffered expense, if its window is still open.
    pub(crate) fn current(&self) -> Option<&Expense> {
        match &self.slot {
            Some((expense, deadline)) if Instant::now() < *deadline => Some(expense),
            _ => None,
        }
    }

    /// Empties the slot and cancels the timer.
    pub(crate) fn clear(&mut self) {
        self.slot = None;
        self.cancel_timer();
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for UndoBuffer {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
