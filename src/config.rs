//! Run configuration
//!
//! Two JSON files make up a run: `config.json` with the API endpoint and mode
//! flags, and `tasks.json` with the ordered list of rules.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::alerts::notifier::DEFAULT_ICON;
use crate::alerts::Task;

/// Default location of the API/mode settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
/// Default location of the task list
pub const DEFAULT_TASKS_PATH: &str = "tasks.json";

/// Contents of `config.json`
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "API_URL")]
    api_url: String,
    #[serde(rename = "API_TOKEN")]
    api_token: String,
    #[serde(rename = "EXPLORE", default)]
    explore: bool,
    #[serde(rename = "PLOT", default)]
    plot: bool,
    #[serde(rename = "NOTIFY_ICON", default)]
    notify_icon: Option<String>,
}

/// Immutable settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
    /// Print one diagnostic report and skip rule evaluation
    pub explore: bool,
    /// Render the hourly productivity chart after evaluation
    pub plot: bool,
    /// Icon name passed to the desktop notification
    pub notify_icon: String,
    /// Rules, in file order
    pub tasks: Vec<Task>,
}

impl Config {
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: api_token.into(),
            explore: false,
            plot: false,
            notify_icon: DEFAULT_ICON.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_explore(mut self, explore: bool) -> Self {
        self.explore = explore;
        self
    }

    pub fn with_plot(mut self, plot: bool) -> Self {
        self.plot = plot;
        self
    }

    /// Load settings and tasks from the two JSON files
    pub fn load(config_path: &Path, tasks_path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = read_json(config_path)?;
        let tasks: Vec<Task> = read_json(tasks_path)?;

        let config = Self {
            api_url: file.api_url,
            api_token: file.api_token,
            explore: file.explore,
            plot: file.plot,
            notify_icon: file.notify_icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            tasks,
        };
        config.validate()?;

        Ok(config)
    }

    /// Load from the paths named by `RESCUETIME_CONFIG` and `RESCUETIME_TASKS`,
    /// falling back to the defaults in the working directory
    pub fn from_env() -> Result<Self, ConfigError> {
        let config_path = std::env::var("RESCUETIME_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let tasks_path =
            std::env::var("RESCUETIME_TASKS").unwrap_or_else(|_| DEFAULT_TASKS_PATH.to_string());
        Self::load(Path::new(&config_path), Path::new(&tasks_path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })?;

        if self.api_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API_URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("API_TOKEN is empty")]
    MissingToken,
}
