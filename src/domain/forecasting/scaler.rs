use crate::domain::errors::{ForecastError, ForecastResult};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;
use std::str::FromStr;

/// Normalization statistic used when fitting a [`ScaleState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMethod {
    /// `(v - min) / (max - min)`
    #[default]
    MinMax,
    /// `(v - mean) / std`, population standard deviation
    Standard,
}

impl FromStr for ScalingMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minmax" | "min-max" => Ok(ScalingMethod::MinMax),
            "standard" | "zscore" => Ok(ScalingMethod::Standard),
            _ => Err(ForecastError::InvalidConfig(format!(
                "Invalid scaling method: {}. Must be 'minmax' or 'standard'",
                s
            ))),
        }
    }
}

impl fmt::Display for ScalingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingMethod::MinMax => write!(f, "minmax"),
            ScalingMethod::Standard => write!(f, "standard"),
        }
    }
}

/// Fitted normalization parameters. Immutable once produced by [`Scaler::fit`].
///
/// A degenerate state (constant input: `min == max` or `std == 0`) keeps its
/// offset but uses a width of 1.0, so scaling becomes a pure shift and stays
/// exactly invertible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum ScaleState {
    MinMax { min: f64, max: f64 },
    Standard { mean: f64, std_dev: f64 },
}

impl ScaleState {
    pub fn is_degenerate(&self) -> bool {
        self.raw_width() == 0.0
    }

    fn raw_width(&self) -> f64 {
        match *self {
            ScaleState::MinMax { min, max } => max - min,
            ScaleState::Standard { std_dev, .. } => std_dev,
        }
    }

    fn offset(&self) -> f64 {
        match *self {
            ScaleState::MinMax { min, .. } => min,
            ScaleState::Standard { mean, .. } => mean,
        }
    }

    fn width(&self) -> f64 {
        if self.is_degenerate() {
            1.0
        } else {
            self.raw_width()
        }
    }

    pub fn scale(&self, value: f64) -> f64 {
        (value - self.offset()) / self.width()
    }

    pub fn unscale(&self, value: f64) -> f64 {
        value * self.width() + self.offset()
    }
}

/// Stateless scaling operations; all state lives in the returned [`ScaleState`].
pub struct Scaler;

impl Scaler {
    pub fn fit(values: &[f64], method: ScalingMethod) -> ForecastResult<ScaleState> {
        if values.is_empty() {
            return Err(ForecastError::EmptyInput);
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let state = match method {
            ScalingMethod::MinMax => ScaleState::MinMax { min, max },
            // statrs leaves rounding noise in the std of a constant series
            ScalingMethod::Standard if min == max => ScaleState::Standard {
                mean: min,
                std_dev: 0.0,
            },
            ScalingMethod::Standard => ScaleState::Standard {
                mean: values.iter().mean(),
                std_dev: values.iter().population_std_dev(),
            },
        };

        if !state.offset().is_finite() || !state.raw_width().is_finite() {
            return Err(ForecastError::NonFiniteScale(format!("{:?}", state)));
        }
        Ok(state)
    }

    pub fn transform(values: &[f64], state: &ScaleState) -> Vec<f64> {
        values.iter().map(|&v| state.scale(v)).collect()
    }

    pub fn inverse_transform(values: &[f64], state: &ScaleState) -> Vec<f64> {
        values.iter().map(|&v| state.unscale(v)).collect()
    }
}
