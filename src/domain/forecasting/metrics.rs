use crate::domain::errors::{ForecastError, ForecastResult};
use serde::Serialize;

/// Error metrics for a prediction sequence against observed values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastMetrics {
    pub n: usize,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl ForecastMetrics {
    /// R² is reported as 0.0 when the actuals have zero variance.
    pub fn compute(predictions: &[f64], actuals: &[f64]) -> ForecastResult<Self> {
        if predictions.len() != actuals.len() {
            return Err(ForecastError::ShapeMismatch {
                expected: actuals.len(),
                actual: predictions.len(),
            });
        }
        if predictions.is_empty() {
            return Err(ForecastError::EmptyInput);
        }

        let n = predictions.len();
        let sq_err: f64 = predictions
            .iter()
            .zip(actuals.iter())
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        let mse = sq_err / n as f64;
        let mae = predictions
            .iter()
            .zip(actuals.iter())
            .map(|(p, t)| (p - t).abs())
            .sum::<f64>()
            / n as f64;
        let mean_y = actuals.iter().sum::<f64>() / n as f64;
        let var_y = actuals.iter().map(|t| (t - mean_y).powi(2)).sum::<f64>() / n as f64;
        let r2 = if var_y > 0.0 { 1.0 - mse / var_y } else { 0.0 };

        Ok(Self {
            n,
            rmse: mse.sqrt(),
            mae,
            r2,
        })
    }

    /// Scores the overlapping prefix of two sequences of different length.
    pub fn compute_overlap(predictions: &[f64], actuals: &[f64]) -> Option<Self> {
        let n = predictions.len().min(actuals.len());
        Self::compute(&predictions[..n], &actuals[..n]).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let actuals = [1.0, 2.0, 3.0, 4.0];
        let m = ForecastMetrics::compute(&actuals, &actuals).unwrap();
        assert_eq!(m.n, 4);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mae, 0.0);
        assert!((m.r2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_errors() {
        let preds = [2.0, 2.0, 4.0, 4.0];
        let actuals = [1.0, 2.0, 3.0, 4.0];
        let m = ForecastMetrics::compute(&preds, &actuals).unwrap();

        // squared errors 1, 0, 1, 0 -> mse 0.5
        assert!((m.rmse - 0.5_f64.sqrt()).abs() < 1e-12);
        assert!((m.mae - 0.5).abs() < 1e-12);
        // var(actuals) = 1.25
        assert!((m.r2 - (1.0 - 0.5 / 1.25)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_actuals_give_zero_r2() {
        let m = ForecastMetrics::compute(&[1.0, 3.0], &[2.0, 2.0]).unwrap();
        assert_eq!(m.r2, 0.0);
        assert!((m.rmse - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch_and_empty() {
        assert!(matches!(
            ForecastMetrics::compute(&[1.0], &[1.0, 2.0]),
            Err(ForecastError::ShapeMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            ForecastMetrics::compute(&[], &[]),
            Err(ForecastError::EmptyInput)
        ));
    }

    #[test]
    fn test_overlap_uses_shorter_prefix() {
        let m = ForecastMetrics::compute_overlap(&[1.0, 2.0, 9.0, 9.0], &[1.0, 2.0]).unwrap();
        assert_eq!(m.n, 2);
        assert_eq!(m.rmse, 0.0);
        assert!(ForecastMetrics::compute_overlap(&[1.0], &[]).is_none());
    }
}
