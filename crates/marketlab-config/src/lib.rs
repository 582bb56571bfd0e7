//! Configuration management.
//!
//! The whole configuration surface of the engine (indicator lookbacks,
//! signal weights, thresholds, frictions, sizing, risk-free rate, sampling
//! frequency) lives in one [`EngineConfig`] value, loaded from a TOML file
//! with `MARKETLAB__`-prefixed environment overrides.

mod settings;

pub use settings::{
    AnalysisSettings, EngineConfig, LoggingSettings, SeriesSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("MARKETLAB")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
