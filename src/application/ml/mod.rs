pub mod onnx_predictor;
pub mod predictor;
pub mod smartcore_predictor;

pub use onnx_predictor::OnnxForecastModel;
pub use predictor::{ForecastModel, TrainableModel};
pub use smartcore_predictor::{ForestForecastModel, ForestParams};

use crate::application::forecasting::ProcessedData;
use crate::config::{ModelEnvConfig, ModelKind};
use crate::domain::errors::ForecastError;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Trains and persists a fresh model, or loads a persisted one when
/// `eval_only` is set.
pub fn prepare_model(
    config: &ModelEnvConfig,
    window_size: usize,
    data: &ProcessedData,
) -> Result<Box<dyn ForecastModel>> {
    let model: Box<dyn ForecastModel> = match config.kind {
        ModelKind::Forest if config.eval_only => {
            let model = ForestForecastModel::load(&config.model_path)
                .context("Failed to load persisted forest model")?;
            Box::new(model)
        }
        ModelKind::Forest => {
            let mut model = ForestForecastModel::new(window_size, config.forest);
            model
                .fit(&data.train_x, &data.train_y)
                .context("Failed to train forest model")?;
            model
                .save(&config.model_path)
                .context("Failed to save forest model")?;
            Box::new(model)
        }
        ModelKind::Onnx => {
            if !config.eval_only {
                warn!("ONNX models are load-only; training is skipped");
            }
            let model = OnnxForecastModel::load(&config.model_path, window_size)
                .context("Failed to load ONNX model")?;
            Box::new(model)
        }
    };

    if model.window_size() != window_size {
        return Err(ForecastError::ShapeMismatch {
            expected: window_size,
            actual: model.window_size(),
        })
        .context("Persisted model was trained on a different window size");
    }

    info!("Using model: {}", model.name());
    Ok(model)
}
