//! A demo login gate.
//!
//! There are no accounts. Any non-blank email and password logs you in, and the logged-in flag is
//! persisted so it survives between invocations. Commands that touch expenses refuse to run while
//! logged out.

use crate::error::{Error, ErrorType, Result};
use crate::storage::{self, Storage, AUTH_KEY};
use anyhow::anyhow;
use tracing::debug;

pub struct Auth {
    storage: Box<dyn Storage>,
}

impl Auth {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Logs in with any non-blank `email` and `password`.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(Error::new(
                ErrorType::Validation,
                anyhow!("Email and password are required"),
            ));
        }
        storage::set(self.storage.as_ref(), AUTH_KEY, &true).await;
        debug!("Logged in as {}", email.trim());
        Ok(())
    }

    pub async fn logout(&self) {
        storage::set(self.storage.as_ref(), AUTH_KEY, &false).await;
        debug!("Logged out");
    }

    /// A missing or unreadable flag counts as logged out.
    pub async fn is_logged_in(&self) -> bool {
        storage::get::<bool>(self.storage.as_ref(), AUTH_KEY)
            .await
            .unwrap_or(false)
    }

    /// Fails with `ErrorType::Auth` when logged out. `command` names what the user was trying to
    /// do so they can run it again after logging in.
    pub async fn require(&self, command: &str) -> Result<()> {
        if self.is_logged_in().await {
            return Ok(());
        }
        Err(Error::new(
            ErrorType::Auth,
            anyhow!(
                "You must be logged in to run '{command}'. Run 'spendlog login --email <EMAIL> \
                --password <PASSWORD>' and then run '{command}' again"
            ),
        ))
    }
}
