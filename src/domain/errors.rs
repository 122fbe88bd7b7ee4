use thiserror::Error;

/// Errors raised by a forecast model backend
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model has not been trained or loaded")]
    NotTrained,

    #[error("Model input has {actual} values, expected a window of {expected}")]
    InputShape { expected: usize, actual: usize },

    #[error("Model backend failure: {reason}")]
    Backend { reason: String },

    #[error("Model persistence failed for {path}: {reason}")]
    Persistence { path: String, reason: String },
}

/// Errors related to windowing, scaling and recursive forecasting
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Insufficient data: {len} values cannot fill a window of {window_size} plus a target")]
    InsufficientData { len: usize, window_size: usize },

    #[error("Cannot fit scaler on empty input")]
    EmptyInput,

    #[error("Scale state not fitted: preprocess must run before postprocess")]
    NotFitted,

    #[error("Scale state already fitted for this run")]
    AlreadyFitted,

    #[error("Shape mismatch: expected window of {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Model prediction failed: {0}")]
    ModelPrediction(#[from] ModelError),

    #[error("Scale state is not finite ({0}); values span too wide a range")]
    NonFiniteScale(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ForecastResult<T> = Result<T, ForecastError>;
