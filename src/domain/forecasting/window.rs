use crate::domain::errors::{ForecastError, ForecastResult};
use std::iter;

/// Fixed-length run of consecutive values, ordered oldest to newest.
///
/// A window is a value: sliding it yields a new window and leaves the
/// original untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    values: Vec<f64>,
}

impl Window {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Newest value in the window
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Drops the oldest value and appends `next`, keeping the length fixed.
    pub fn slide(&self, next: f64) -> Window {
        if self.values.is_empty() {
            return self.clone();
        }
        let values = self.values[1..]
            .iter()
            .copied()
            .chain(iter::once(next))
            .collect();
        Window { values }
    }
}

impl From<&[f64]> for Window {
    fn from(values: &[f64]) -> Self {
        Self::new(values.to_vec())
    }
}

impl From<Vec<f64>> for Window {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// A window paired with the value that immediately follows it
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub window: Window,
    pub target: f64,
}

/// Cuts a series into overlapping windows with single-step targets.
#[derive(Debug, Clone, Copy)]
pub struct WindowBuilder {
    window_size: usize,
}

impl WindowBuilder {
    pub fn new(window_size: usize) -> ForecastResult<Self> {
        if window_size == 0 {
            return Err(ForecastError::InvalidConfig(
                "window_size must be at least 1".to_string(),
            ));
        }
        Ok(Self { window_size })
    }

    /// Emits `len - window_size` samples in time order; sample `i` holds
    /// `series[i..i + w]` and targets `series[i + w]`.
    pub fn build(&self, series: &[f64]) -> ForecastResult<Vec<Sample>> {
        let w = self.window_size;
        if series.len() <= w {
            return Err(ForecastError::InsufficientData {
                len: series.len(),
                window_size: w,
            });
        }

        Ok(series
            .windows(w + 1)
            .map(|chunk| Sample {
                window: Window::from(&chunk[..w]),
                target: chunk[w],
            })
            .collect())
    }
}
