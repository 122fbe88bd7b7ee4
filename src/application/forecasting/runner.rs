use super::data_processor::{DataProcessor, ProcessedData};
use super::recursive::RecursiveForecaster;
use crate::application::ml::predictor::ForecastModel;
use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::forecasting::{ForecastMetrics, ScaleState};
use serde::Serialize;
use tracing::{info, warn};

/// Everything a run produces, in real units
#[derive(Debug, Clone, Serialize)]
pub struct ForecastOutcome {
    pub model_name: String,
    pub window_size: usize,
    pub split_index: usize,
    pub scale_state: ScaleState,
    #[serde(skip)]
    pub actuals: Vec<f64>,
    #[serde(skip)]
    pub static_predictions: Vec<f64>,
    #[serde(skip)]
    pub moving_predictions: Vec<f64>,
    pub static_metrics: ForecastMetrics,
    /// Moving forecast scored against the overlapping prefix of the test targets
    pub moving_metrics: Option<ForecastMetrics>,
}

/// Runs one-step test inference and the recursive forecast for a trained model.
pub struct ForecastRunner {
    n_future_preds: usize,
}

impl ForecastRunner {
    pub fn new(n_future_preds: usize) -> Self {
        Self { n_future_preds }
    }

    pub fn evaluate(
        &self,
        processor: &DataProcessor,
        data: &ProcessedData,
        model: &dyn ForecastModel,
    ) -> ForecastResult<ForecastOutcome> {
        let scale_state = *processor.scale_state().ok_or(ForecastError::NotFitted)?;
        if model.window_size() != processor.window_size() {
            return Err(ForecastError::ShapeMismatch {
                expected: processor.window_size(),
                actual: model.window_size(),
            });
        }

        let preds = model.predict_batch(&data.test_x)?;
        let static_predictions = processor.postprocess(&preds)?;
        let actuals = processor.postprocess(&data.test_targets())?;
        let static_metrics = ForecastMetrics::compute(&static_predictions, &actuals)?;
        info!(
            "One-step test (n={}): RMSE={:.6}, MAE={:.6}, R²={:.4}",
            static_metrics.n, static_metrics.rmse, static_metrics.mae, static_metrics.r2
        );

        let seed = data.test_window(0).ok_or(ForecastError::InsufficientData {
            len: data.n_test(),
            window_size: processor.window_size(),
        })?;
        let moving = RecursiveForecaster::new(model).moving_forecast(&seed, self.n_future_preds)?;
        let moving_predictions = processor.postprocess(&moving)?;

        let moving_metrics = ForecastMetrics::compute_overlap(&moving_predictions, &actuals);
        match &moving_metrics {
            Some(m) => info!(
                "Recursive forecast ({} steps, {} scored): RMSE={:.6}, MAE={:.6}",
                moving_predictions.len(),
                m.n,
                m.rmse,
                m.mae
            ),
            None => warn!(
                "Recursive forecast produced {} steps; nothing to score",
                moving_predictions.len()
            ),
        }

        Ok(ForecastOutcome {
            model_name: model.name().to_string(),
            window_size: processor.window_size(),
            split_index: data.split_index,
            scale_state,
            actuals,
            static_predictions,
            moving_predictions,
            static_metrics,
            moving_metrics,
        })
    }
}
