//! Windowing and forecast-horizon configuration parsing from environment variables.

use super::{VarLookup, parse_var};
use crate::application::forecasting::ProcessorConfig;
use crate::domain::forecasting::ScalingMethod;
use anyhow::Result;

/// Pipeline environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineEnvConfig {
    pub window_size: usize,
    pub train_ratio: f64,
    pub n_future_preds: usize,
    pub scaling: ScalingMethod,
}

impl Default for PipelineEnvConfig {
    fn default() -> Self {
        let processor = ProcessorConfig::default();
        Self {
            window_size: processor.window_size,
            train_ratio: processor.train_ratio,
            n_future_preds: 500,
            scaling: processor.scaling,
        }
    }
}

impl PipelineEnvConfig {
    pub(crate) fn from_vars(vars: VarLookup<'_>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            window_size: parse_var(vars, "WINDOW_SIZE", defaults.window_size)?,
            train_ratio: parse_var(vars, "TRAIN_RATIO", defaults.train_ratio)?,
            n_future_preds: parse_var(vars, "N_FUTURE_PREDS", defaults.n_future_preds)?,
            scaling: parse_var(vars, "SCALING_METHOD", defaults.scaling)?,
        })
    }

    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            window_size: self.window_size,
            train_ratio: self.train_ratio,
            scaling: self.scaling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_pipeline_config_defaults() {
        let config = PipelineEnvConfig::from_vars(&|_| None).unwrap();
        assert_eq!(config.window_size, 50);
        assert!((config.train_ratio - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.n_future_preds, 500);
        assert_eq!(config.scaling, ScalingMethod::MinMax);
    }

    #[test]
    fn test_pipeline_config_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("WINDOW_SIZE", "24"),
            ("TRAIN_RATIO", "0.8"),
            ("N_FUTURE_PREDS", "0"),
            ("SCALING_METHOD", "standard"),
        ]);
        let config = PipelineEnvConfig::from_vars(&|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.window_size, 24);
        assert_eq!(config.n_future_preds, 0);
        assert_eq!(config.processor_config().scaling, ScalingMethod::Standard);
        assert!((config.processor_config().train_ratio - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pipeline_config_bad_value() {
        let err = PipelineEnvConfig::from_vars(&|k| {
            (k == "WINDOW_SIZE").then(|| "fifty".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("WINDOW_SIZE"));
    }
}
