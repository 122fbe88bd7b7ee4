//! Configuration module for seqcast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Pipeline, Model and Data.

mod model_config;
mod pipeline_config;

pub use model_config::{ModelEnvConfig, ModelKind};
pub use pipeline_config::PipelineEnvConfig;

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Source of configuration values, keyed by variable name
pub(crate) type VarLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Parses `key` when present, falling back to `default` when unset.
pub(crate) fn parse_var<T>(vars: VarLookup<'_>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    anyhow::Error: From<T::Err>,
{
    match vars(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(anyhow::Error::from)
            .with_context(|| format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}

/// Input series and report locations
#[derive(Debug, Clone, PartialEq)]
pub struct DataEnvConfig {
    pub dataset_path: PathBuf,
    /// Header of the numeric column to forecast
    pub column: String,
    pub output_dir: PathBuf,
}

impl Default for DataEnvConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("./data/timeseries_1h.csv"),
            column: "value".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl DataEnvConfig {
    fn from_vars(vars: VarLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            dataset_path: vars("DATASET_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),
            column: vars("DATASET_COLUMN").unwrap_or(defaults.column),
            output_dir: vars("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub pipeline: PipelineEnvConfig,
    pub model: ModelEnvConfig,
    pub data: DataEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&|key| env::var(key).ok())
    }

    pub(crate) fn from_vars(vars: VarLookup<'_>) -> Result<Self> {
        let pipeline =
            PipelineEnvConfig::from_vars(vars).context("Failed to load pipeline config")?;
        let model = ModelEnvConfig::from_vars(vars).context("Failed to load model config")?;
        let data = DataEnvConfig::from_vars(vars);

        Ok(Self {
            pipeline,
            model,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_without_env() {
        let config = Config::from_vars(&|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.data.dataset_path,
            PathBuf::from("./data/timeseries_1h.csv")
        );
        assert_eq!(config.data.column, "value");
    }

    #[test]
    fn test_config_error_names_section() {
        let err = Config::from_vars(&|k| (k == "FOREST_TREES").then(|| "-1".to_string()))
            .unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("model config"));
        assert!(chain.contains("FOREST_TREES"));
    }

    #[test]
    fn test_parse_var_trims_whitespace() {
        let value: usize = parse_var(&|_| Some(" 12 ".to_string()), "X", 0).unwrap();
        assert_eq!(value, 12);
    }
}
