//! Configuration System
//!
//! Layered configuration for the configurator: endpoints of the external collaborators, session
//! behaviour, HTTP client limits and logging. Sources merge (lowest to highest) from built-in
//! defaults, the global config file, workspace config files and `WRAPVIEW__*` environment
//! variables.

use crate::error::ApiError;
use crate::http::HttpConfig;
use crate::logging::LoggingConfig;
use crate::session::SessionConfig;
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

mod merge;
mod sources;

pub use merge::merge_policy::DEFAULT_BASE_URL;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WrapviewConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub registration: RegistrationConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vehicle catalog endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Registration lookup endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Until a lookup service is wired up every lookup fails with a fixed message
    #[serde(default)]
    pub enabled: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            enabled: false,
        }
    }
}

/// Preview generation backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: default_simulated_delay_ms(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_simulated_delay_ms() -> u64 {
    850
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Catalog(String),
    Registration(String),
    Session(String),
    Http(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Catalog(msg) => write!(f, "Catalog: {}", msg),
            ValidationError::Registration(msg) => write!(f, "Registration: {}", msg),
            ValidationError::Session(msg) => write!(f, "Session: {}", msg),
            ValidationError::Http(msg) => write!(f, "HTTP: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

fn validate_base_url(url: &str) -> Result<(), String> {
    if url.trim().is_empty() {
        return Err("Base URL cannot be empty".to_string());
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(format!("Base URL must start with http:// or https://: {}", url));
    }
    Ok(())
}

impl WrapviewConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_base_url(&self.catalog.base_url) {
            errors.push(ValidationError::Catalog(e));
        }
        if self.registration.enabled {
            if let Err(e) = validate_base_url(&self.registration.base_url) {
                errors.push(ValidationError::Registration(e));
            }
        }
        if self.session.request_timeout_ms == Some(0) {
            errors.push(ValidationError::Session(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.http.connect_timeout_ms == 0 || self.http.request_timeout_ms == 0 {
            errors.push(ValidationError::Http(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all errors into a single `ApiError`
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::Config(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}

/// Loads [`WrapviewConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults → global file → workspace files → environment
    pub fn load(workspace_root: &Path) -> Result<WrapviewConfig, ApiError> {
        let mut builder = merge::merge_policy::builder_with_defaults()?;
        if let Some(file) = sources::global_file::source() {
            builder = builder.add_source(file);
        }
        for file in sources::workspace_file::sources(workspace_root) {
            builder = builder.add_source(file);
        }
        let config = builder
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Load a single file over the defaults (environment still applies)
    pub fn load_from_file(path: &Path) -> Result<WrapviewConfig, ApiError> {
        let config = merge::merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("WRAPVIEW")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
