// Windowing, scaling and recursive forecasting
pub mod forecasting;

// Forecast model backends
pub mod ml;
