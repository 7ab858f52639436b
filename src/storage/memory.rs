//! An in-process implementation of `Storage`.
//!
//! Clones share the same underlying map, so a test can hand one clone to a `Store` and inspect
//! what it persisted through another.

use crate::error::Res;
use crate::storage::Storage;
use anyhow::bail;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    data: HashMap<String, String>,
    unavailable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<State>>,
}

impl MemoryStorage {
    /// The raw JSON text stored under `key`.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.state.lock().await.data.get(key).cloned()
    }

    /// When `true`, every read and write fails, like a browser with storage disabled.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Res<Option<String>> {
        let state = self.state.lock().await;
        if state.unavailable {
            bail!("Storage is unavailable");
        }
        Ok(state.data.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Res<()> {
        let mut state = self.state.lock().await;
        if state.unavailable {
            bail!("Storage is unavailable");
        }
        state.data.insert(key.to_string(), value);
        Ok(())
    }
}
