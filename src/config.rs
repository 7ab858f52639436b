//! Configuration file handling for spendlog.
//!
//! The configuration file is stored at `$SPENDLOG_HOME/config.json`. It says where expense
//! records live (a REST API or nowhere but this machine), how long deletions can be undone, and
//! whether a fresh local install starts with demo data.

use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::storage::FileStorage;
use crate::utils;
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "spendlog";
const CONFIG_VERSION: u8 = 1;
const UNDO_WINDOW_MS: u64 = 8000;
const CONFIG_JSON: &str = "config.json";
const STORAGE: &str = "storage";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SPENDLOG_HOME` and from there it loads `$SPENDLOG_HOME/config.json`. It also
/// knows where the persisted client state lives inside the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    storage_dir: PathBuf,
    config_file: ConfigFile,
    api_url: Option<Url>,
}

impl Config {
    /// Creates the home directory, its storage subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/spendlog`
    /// - `api_url` - The base URL of the expense API, e.g. `http://localhost:3000/api`. When this
    ///   is `None` the expenses are only kept on this machine.
    /// - `seed_demo` - Whether an empty local install starts with the demo expenses.
    ///
    /// # Errors
    /// - Returns an error if `api_url` does not parse or any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        api_url: Option<&str>,
        seed_demo: bool,
    ) -> Result<Self> {
        Self::create_inner(dir.into(), api_url, seed_demo)
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(
        maybe_relative: PathBuf,
        api_url: Option<&str>,
        seed_demo: bool,
    ) -> Res<Self> {
        let api_url = api_url.map(parse_api_url).transpose()?;

        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the spendlog home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let storage_dir = root.join(STORAGE);
        utils::make_dir(&storage_dir).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            api_url: api_url.as_ref().map(|u| u.to_string()),
            seed_demo,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            storage_dir,
            config_file,
            api_url,
        })
    }

    /// This will
    /// - validate that `spendlog_home` exists and that the config file exists
    /// - load and validate the config file
    /// - validate that the storage directory exists
    /// - return the loaded configuration object
    pub async fn load(spendlog_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(spendlog_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Spendlog home is missing, run 'spendlog init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let api_url = config_file
            .api_url
            .as_deref()
            .map(parse_api_url)
            .transpose()
            .with_context(|| format!("Invalid api_url in '{}'", config_path.display()))?;

        let storage_dir = root.join(STORAGE);
        if !storage_dir.is_dir() {
            bail!(
                "The storage directory is missing '{}'",
                storage_dir.display()
            )
        }

        Ok(Self {
            root,
            config_path,
            storage_dir,
            config_file,
            api_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// The base URL of the expense API, or `None` for local-only use.
    pub fn api_url(&self) -> Option<&Url> {
        self.api_url.as_ref()
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_millis(self.config_file.undo_window_ms)
    }

    pub fn seed_demo(&self) -> bool {
        self.config_file.seed_demo
    }

    /// The persisted client state for this home directory.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.storage_dir)
    }
}

fn parse_api_url(s: &str) -> Res<Url> {
    let url = Url::parse(s).with_context(|| format!("Unable to parse the API URL '{s}'"))?;
    ensure!(
        matches!(url.scheme(), "http" | "https"),
        "The API URL must use http or https, got '{s}'"
    );
    Ok(url)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "spendlog",
///   "config_version": 1,
///   "api_url": "http://localhost:3000/api",
///   "undo_window_ms": 8000,
///   "seed_demo": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "spendlog"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the expense API. Absent for local-only use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,

    /// How long a deleted expense can be restored, in milliseconds
    #[serde(default = "default_undo_window_ms")]
    undo_window_ms: u64,

    /// Whether an empty local install starts with the demo expenses
    #[serde(default)]
    seed_demo: bool,
}

fn default_undo_window_ms() -> u64 {
    UNDO_WINDOW_MS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: None,
            undo_window_ms: UNDO_WINDOW_MS,
            seed_demo: false,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names another app
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
