pub mod metrics;
pub mod scaler;
pub mod window;

pub use metrics::ForecastMetrics;
pub use scaler::{ScaleState, Scaler, ScalingMethod};
pub use window::{Sample, Window, WindowBuilder};
