// Windows, samples, scaling and metrics
pub mod forecasting;

// Domain-specific error types
pub mod errors;
