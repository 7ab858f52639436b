//! Command handlers for the demo login.

use crate::commands::{auth_for, Out};
use crate::{Config, Result};

/// Handles `spendlog login`.
pub async fn login(config: &Config, email: &str, password: &str) -> Result<Out<()>> {
    auth_for(config).login(email, password).await?;
    Ok(format!("Logged in as {}", email.trim()).into())
}

/// Handles `spendlog logout`.
pub async fn logout(config: &Config) -> Result<Out<()>> {
    auth_for(config).logout().await;
    Ok("Logged out".into())
}

/// Fails unless the user is logged in. `command` is the name of the command that was requested.
pub async fn require_login(config: &Config, command: &str) -> Result<()> {
    auth_for(config).require(command).await
}
