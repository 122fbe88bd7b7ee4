use crate::application::ml::predictor::ForecastModel;
use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::forecasting::Window;
use std::iter::FusedIterator;
use tracing::debug;

/// Extends a single-step model into a multi-step forecast by feeding each
/// prediction back into the input window.
pub struct RecursiveForecaster<'m, M: ForecastModel + ?Sized> {
    model: &'m M,
}

impl<'m, M: ForecastModel + ?Sized> RecursiveForecaster<'m, M> {
    pub fn new(model: &'m M) -> Self {
        Self { model }
    }

    /// Lazy, unbounded prediction stream starting from `seed`.
    pub fn stream(&self, seed: Window) -> ForecastResult<ForecastStream<'m, M>> {
        let expected = self.model.window_size();
        if seed.len() != expected {
            return Err(ForecastError::ShapeMismatch {
                expected,
                actual: seed.len(),
            });
        }
        Ok(ForecastStream {
            model: self.model,
            window: seed,
            steps: 0,
            failed: false,
        })
    }

    /// Exactly `n_steps` predictions in scaled units. Aborts on the first
    /// model failure without returning the steps computed so far.
    pub fn moving_forecast(&self, seed: &Window, n_steps: usize) -> ForecastResult<Vec<f64>> {
        let preds = self
            .stream(seed.clone())?
            .take(n_steps)
            .collect::<ForecastResult<Vec<f64>>>()?;
        debug!(
            "Recursive forecast with {} produced {} steps",
            self.model.name(),
            preds.len()
        );
        Ok(preds)
    }
}

/// Append-only sequence of recursive predictions.
///
/// Yields `Err` once if the model fails, then ends.
pub struct ForecastStream<'m, M: ForecastModel + ?Sized> {
    model: &'m M,
    window: Window,
    steps: usize,
    failed: bool,
}

impl<M: ForecastModel + ?Sized> ForecastStream<'_, M> {
    /// Window that will feed the next prediction
    pub fn current_window(&self) -> &Window {
        &self.window
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl<M: ForecastModel + ?Sized> Iterator for ForecastStream<'_, M> {
    type Item = ForecastResult<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.model.predict(&self.window) {
            Ok(next) => {
                self.window = self.window.slide(next);
                self.steps += 1;
                Some(Ok(next))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(ForecastError::ModelPrediction(e)))
            }
        }
    }
}

impl<M: ForecastModel + ?Sized> FusedIterator for ForecastStream<'_, M> {}
