//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global config file, then
//! the repository's `config.toml`, then `PINSEED_*` environment variables.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod merge_policy;
mod sources;

pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinseedConfig {
    /// Repository root (defaults to the platform data directory)
    pub repo_root: Option<PathBuf>,

    /// Storage layout inside the repository
    #[serde(default)]
    pub storage: StorageConfig,

    /// Seeding behavior
    #[serde(default)]
    pub seed: SeedConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage paths, relative to the repository root unless absolute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    #[serde(default = "default_pins_file")]
    pub pins_file: PathBuf,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("store")
}

fn default_pins_file() -> PathBuf {
    PathBuf::from("pins.bin")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            pins_file: default_pins_file(),
        }
    }
}

impl StorageConfig {
    pub fn store_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.store_dir)
    }

    pub fn pins_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.pins_file)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.store_dir.as_os_str().is_empty() {
            return Err("Store directory cannot be empty".to_string());
        }
        if self.pins_file.as_os_str().is_empty() {
            return Err("Pins file cannot be empty".to_string());
        }
        if self.store_dir == self.pins_file {
            return Err("Store directory and pins file must differ".to_string());
        }
        Ok(())
    }
}

/// Seeding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Issue asset adds concurrently
    #[serde(default)]
    pub concurrent_adds: bool,

    /// Upper bound for the pin flush when seeding concurrently
    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,
}

fn default_flush_timeout_ms() -> u64 {
    10_000
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            concurrent_adds: false,
            flush_timeout_ms: default_flush_timeout_ms(),
        }
    }
}

impl SeedConfig {
    pub fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.flush_timeout_ms == 0 {
            return Err("Flush timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl PinseedConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        let errors: Vec<String> = [self.storage.validate(), self.seed.validate()]
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }

    /// Repository root to use when none was given on the command line
    pub fn resolve_repo_root(&self) -> PathBuf {
        self.repo_root.clone().unwrap_or_else(default_repo_root)
    }
}

/// Platform data directory for pinseed, or `.pinseed` when none is available
pub fn default_repo_root() -> PathBuf {
    directories::ProjectDirs::from("", "", "pinseed")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".pinseed"))
}

/// Loads configuration from all sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a repository
    pub fn load(repo_root: &Path) -> Result<PinseedConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::repo_file::add_to_builder(builder, repo_root)?;
        let builder = sources::add_environment(builder);
        builder.build()?.try_deserialize()
    }

    /// Load configuration from one explicit file (plus defaults and environment)
    pub fn load_from_file(path: &Path) -> Result<PinseedConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path.to_path_buf()).required(true));
        let builder = sources::add_environment(builder);
        builder.build()?.try_deserialize()
    }
}
