use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its storage subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `spendlog_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/spendlog`
/// - `api_url` - The base URL of the expense REST API, or `None` to keep expenses on this machine
/// - `seed_demo` - Whether a local-only install starts with the demo expenses
///
/// # Errors
/// - Returns an error if `api_url` is not a valid http(s) URL or any file operation fails.
pub async fn init(
    spendlog_home: &Path,
    api_url: Option<&str>,
    seed_demo: bool,
) -> Result<Out<()>> {
    let config = Config::create(spendlog_home, api_url, seed_demo)
        .await
        .context("Unable to create the data directory and config")
        .pub_result(ErrorType::Config)?;
    let location = match config.api_url() {
        Some(url) => format!("expenses are kept at {url}"),
        None => "expenses are kept on this machine".to_string(),
    };
    Ok(format!(
        "Successfully created the spendlog directory at {}, {location}. Run 'spendlog login' next",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let out = init(&home, Some("https://api.example.com/v1"), false)
            .await
            .unwrap();
        assert!(out.message().contains("https://api.example.com/v1"));

        let config = Config::load(&home).await.unwrap();
        assert_eq!(
            config.api_url().unwrap().as_str(),
            "https://api.example.com/v1"
        );
    }

    #[tokio::test]
    async fn test_init_bad_url() {
        let dir = TempDir::new().unwrap();
        let err = init(dir.path(), Some("not a url"), true).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        let message = err.to_string();
        assert!(message.contains("Unable to create the data directory"));
        assert_eq!(message.matches("Unable to parse the API URL").count(), 1, "{message}");
    }
}
