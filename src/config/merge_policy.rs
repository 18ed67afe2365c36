//! Merge rules: defaults, override order.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("storage.store_dir", "store")?
        .set_default("storage.pins_file", "pins.bin")?
        .set_default("seed.concurrent_adds", false)?
        .set_default("seed.flush_timeout_ms", 10_000i64)
}
