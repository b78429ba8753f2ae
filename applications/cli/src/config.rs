/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "tunebox.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionSettings {
    /// User acting when `--user` is not given
    pub user_id: Option<String>,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tunebox.toml` is read if
    /// present. Environment variables override both, e.g.
    /// `TUNEBOX_STORAGE__DATABASE_URL` or `TUNEBOX_SESSION__USER_ID`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path.to_path_buf())),
            None => settings
                .add_source(config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        // Override with environment variables (prefixed with TUNEBOX_)
        settings = settings.add_source(
            config::Environment::with_prefix("TUNEBOX")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(CliError::Config(
                "Database URL is required (set TUNEBOX_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        if self
            .session
            .user_id
            .as_deref()
            .is_some_and(|u| u.trim().is_empty())
        {
            return Err(CliError::Config("Session user id must not be empty".to_string()));
        }

        Ok(())
    }

    /// Filesystem path of the `SQLite` database, if the URL names one
    pub fn database_path(&self) -> Option<PathBuf> {
        let path = self.storage.database_url.strip_prefix("sqlite://")?;
        let path = path.split('?').next().unwrap_or(path);
        if path.is_empty() || path == ":memory:" {
            return None;
        }
        Some(PathBuf::from(path))
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/tunebox.db".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            session: SessionSettings::default(),
        }
    }
}
