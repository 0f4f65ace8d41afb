//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod backend;
pub mod logging;
pub mod reorder;

use serde::{Deserialize, Serialize};

use self::backend::BackendConfig;
use self::logging::LoggingConfig;
use self::reorder::ReorderConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "ADMISSIONS";

/// Root application configuration.
///
/// Deserialization target for the merged sources: the base TOML file,
/// an optional environment overlay, and `ADMISSIONS__*` variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST backend settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Field reorder persistence settings.
    #[serde(default)]
    pub reorder: ReorderConfig,
    /// Directory catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Directory catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Admission year used when no year is given explicitly.
    #[serde(default)]
    pub default_year: Option<i32>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Reads `path` (extension optional), then `config/<env>` when `env` is
    /// given, then environment variables prefixed with `ADMISSIONS__`.
    /// Missing files are not an error; every section has defaults.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        tracing::debug!(path, env, "Loading configuration");

        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(AppError::configuration("backend.base_url must not be empty"));
        }
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(AppError::configuration(format!(
                "backend.base_url must be an http(s) URL, got '{}'",
                self.backend.base_url
            )));
        }
        if self.backend.request_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "backend.request_timeout_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}
