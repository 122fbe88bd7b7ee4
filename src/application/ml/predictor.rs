use crate::domain::errors::ModelError;
use crate::domain::forecasting::Window;
use ndarray::{Array2, Array3};
use std::path::Path;

/// Interface for single-step sequence models
pub trait ForecastModel: Send + Sync {
    /// Predict the value that follows `window`, in scaled units
    fn predict(&self, window: &Window) -> Result<f64, ModelError>;

    /// One prediction per outer row of a `(n, window_size, 1)` tensor
    fn predict_batch(&self, windows: &Array3<f64>) -> Result<Vec<f64>, ModelError> {
        windows
            .outer_iter()
            .map(|row| self.predict(&Window::new(row.iter().copied().collect())))
            .collect()
    }

    /// Window length the model was trained on
    fn window_size(&self) -> usize;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// Models that can be fitted on windowed samples and persisted
pub trait TrainableModel: ForecastModel + Sized {
    fn fit(&mut self, x: &Array3<f64>, y: &Array2<f64>) -> Result<(), ModelError>;

    fn save(&self, path: &Path) -> Result<(), ModelError>;

    fn load(path: &Path) -> Result<Self, ModelError>;
}
