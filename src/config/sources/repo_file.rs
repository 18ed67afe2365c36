//! Repository config file source: <repo>/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join("config.toml")
}

/// Add the repository config file to builder. Overrides the global file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    repo_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = repo_config_path(repo_root);
    if path.exists() {
        return Ok(builder.add_source(File::from(path).required(false)));
    }
    Ok(builder)
}
