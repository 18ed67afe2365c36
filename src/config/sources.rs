//! Configuration sources, lowest to highest precedence: global file, repo file, environment.

pub mod global_file;
pub mod repo_file;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

/// `PINSEED_SEED__FLUSH_TIMEOUT_MS=500` sets `seed.flush_timeout_ms`.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("PINSEED")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
