pub mod data_processor;
pub mod recursive;
pub mod runner;

pub use data_processor::{DataProcessor, ProcessedData, ProcessorConfig};
pub use recursive::{ForecastStream, RecursiveForecaster};
pub use runner::{ForecastOutcome, ForecastRunner};
