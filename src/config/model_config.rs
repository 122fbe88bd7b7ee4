//! Model configuration parsing from environment variables.
//!
//! This module handles the model backend, its persistence path and the
//! random forest hyperparameters.

use super::{VarLookup, parse_var};
use crate::application::ml::smartcore_predictor::ForestParams;
use anyhow::Result;
use std::path::PathBuf;
use std::str::FromStr;

/// Model backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Trainable smartcore random forest, persisted as JSON
    Forest,
    /// Pre-trained ONNX sequence model, load-only
    Onnx,
}

impl FromStr for ModelKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forest" | "random_forest" => Ok(ModelKind::Forest),
            "onnx" => Ok(ModelKind::Onnx),
            _ => anyhow::bail!("Invalid MODEL_KIND: {}. Must be 'forest' or 'onnx'", s),
        }
    }
}

/// Model environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub kind: ModelKind,
    pub model_path: PathBuf,
    /// Skip training and load the persisted model
    pub eval_only: bool,
    pub forest: ForestParams,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Forest,
            model_path: PathBuf::from("./model.json"),
            eval_only: false,
            forest: ForestParams::default(),
        }
    }
}

impl ModelEnvConfig {
    pub(crate) fn from_vars(vars: VarLookup<'_>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            kind: parse_var(vars, "MODEL_KIND", defaults.kind)?,
            model_path: vars("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            eval_only: parse_var(vars, "EVAL_ONLY", defaults.eval_only)?,
            forest: ForestParams {
                n_trees: parse_var(vars, "FOREST_TREES", defaults.forest.n_trees)?,
                max_depth: parse_var(vars, "FOREST_MAX_DEPTH", defaults.forest.max_depth)?,
                min_split: parse_var(vars, "FOREST_MIN_SPLIT", defaults.forest.min_split)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelEnvConfig::from_vars(&|_| None).unwrap();
        assert_eq!(config.kind, ModelKind::Forest);
        assert_eq!(config.model_path, PathBuf::from("./model.json"));
        assert!(!config.eval_only);
        assert_eq!(config.forest.n_trees, 100);
        assert_eq!(config.forest.max_depth, 10);
        assert_eq!(config.forest.min_split, 5);
    }

    #[test]
    fn test_model_kind_from_str() {
        assert_eq!("ONNX".parse::<ModelKind>().unwrap(), ModelKind::Onnx);
        assert_eq!("forest".parse::<ModelKind>().unwrap(), ModelKind::Forest);
        assert!("lstm".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_eval_only_flag() {
        let config = ModelEnvConfig::from_vars(&|k| match k {
            "EVAL_ONLY" => Some("true".to_string()),
            "MODEL_PATH" => Some("models/lstm.onnx".to_string()),
            "MODEL_KIND" => Some("onnx".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(config.eval_only);
        assert_eq!(config.kind, ModelKind::Onnx);
        assert_eq!(config.model_path, PathBuf::from("models/lstm.onnx"));
    }
}
