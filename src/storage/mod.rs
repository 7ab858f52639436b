//! Durable key/value persistence for client-side state.
//!
//! Values are stored as JSON under a string key. Reads and writes never fail from the caller's
//! point of view: a missing or unreadable value reads as `None`, and a failed write is logged and
//! dropped.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::Res;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{trace, warn};

/// The full expense collection.
pub const EXPENSES_KEY: &str = "expenses_v1";
/// The selected display currency, stored as a bare JSON string.
pub const CURRENCY_KEY: &str = "currency_v1";
/// Whether the demo user is logged in.
pub const AUTH_KEY: &str = "auth_isLoggedIn_v1";

/// Raw access to a key/value store. Use `get` and `set` rather than calling these directly.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Returns the stored text for `key`, or `None` if nothing has been stored.
    async fn read(&self, key: &str) -> Res<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: String) -> Res<()>;
}

/// Reads and deserializes the value stored under `key`. Returns `None` if the key is missing, the
/// store cannot be read, or the stored value does not deserialize as `T`.
pub async fn get<T>(storage: &dyn Storage, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let raw = match storage.read(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Unable to read '{key}' from storage: {e:#}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unreadable value stored under '{key}': {e}");
            None
        }
    }
}

/// Serializes and stores `value` under `key`. Failures are logged and otherwise ignored.
pub async fn set<T>(storage: &dyn Storage, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!("Unable to serialize '{key}' for storage: {e}");
            return;
        }
    };
    trace!("Storing {} bytes under '{key}'", json.len());
    if let Err(e) = storage.write(key, json).await {
        warn!("Unable to write '{key}' to storage: {e:#}");
    }
}
