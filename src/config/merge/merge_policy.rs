//! Lowest configuration layer: the built-in value of every key a deployment usually overrides.
//!
//! Keys missing here still fall back to the serde defaults on the config structs; listing them
//! keeps the effective values visible to `config` before any file or variable is merged.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Value};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// `(key, value)` pairs applied beneath every other source
fn default_entries() -> Vec<(&'static str, Value)> {
    vec![
        ("catalog.base_url", DEFAULT_BASE_URL.into()),
        ("registration.base_url", DEFAULT_BASE_URL.into()),
        ("registration.enabled", false.into()),
        ("generation.simulated_delay_ms", 850_i64.into()),
        ("session.refresh_models_after_lookup", true.into()),
        ("http.connect_timeout_ms", 10_000_i64.into()),
        ("http.request_timeout_ms", 30_000_i64.into()),
        ("logging.level", "warn".into()),
        ("logging.format", "text".into()),
        ("logging.output", "stderr".into()),
    ]
}

/// Builder seeded with the default layer
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    default_entries()
        .into_iter()
        .try_fold(Config::builder(), |builder, (key, value)| {
            builder.set_default(key, value)
        })
}
