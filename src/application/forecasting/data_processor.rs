use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::forecasting::{Sample, ScaleState, Scaler, ScalingMethod, Window, WindowBuilder};
use ndarray::{Array2, Array3, Axis};
use rayon::prelude::*;
use tracing::{debug, info};

/// Windowing and normalization settings for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorConfig {
    pub window_size: usize,
    /// Fraction of samples (in time order) used for training
    pub train_ratio: f64,
    pub scaling: ScalingMethod,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            window_size: 50,
            train_ratio: 0.9,
            scaling: ScalingMethod::MinMax,
        }
    }
}

impl ProcessorConfig {
    pub fn validate(&self) -> ForecastResult<()> {
        if self.window_size == 0 {
            return Err(ForecastError::InvalidConfig(
                "window_size must be at least 1".to_string(),
            ));
        }
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "train_ratio must be in (0, 1), got {}",
                self.train_ratio
            )));
        }
        Ok(())
    }
}

/// Scaled train/test tensors.
///
/// Windows are shaped `(num_samples, window_size, 1)`, targets `(num_samples, 1)`.
#[derive(Debug, Clone)]
pub struct ProcessedData {
    pub train_x: Array3<f64>,
    pub train_y: Array2<f64>,
    pub test_x: Array3<f64>,
    pub test_y: Array2<f64>,
    /// Index of the first test sample in the full sample sequence
    pub split_index: usize,
}

impl ProcessedData {
    pub fn n_train(&self) -> usize {
        self.train_x.dim().0
    }

    pub fn n_test(&self) -> usize {
        self.test_x.dim().0
    }

    /// Scaled test window `i`, typically used as a forecast seed
    pub fn test_window(&self, i: usize) -> Option<Window> {
        (i < self.n_test()).then(|| {
            Window::new(self.test_x.index_axis(Axis(0), i).iter().copied().collect())
        })
    }

    pub fn test_targets(&self) -> Vec<f64> {
        self.test_y.iter().copied().collect()
    }
}

/// Owns the split point and the fitted [`ScaleState`] for a single run.
///
/// The scale state is fitted exactly once, by [`DataProcessor::preprocess`];
/// every later scale or unscale call reuses it.
#[derive(Debug)]
pub struct DataProcessor {
    config: ProcessorConfig,
    builder: WindowBuilder,
    scale_state: Option<ScaleState>,
}

impl DataProcessor {
    pub fn new(config: ProcessorConfig) -> ForecastResult<Self> {
        config.validate()?;
        Ok(Self {
            builder: WindowBuilder::new(config.window_size)?,
            config,
            scale_state: None,
        })
    }

    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    pub fn scale_state(&self) -> Option<&ScaleState> {
        self.scale_state.as_ref()
    }

    pub fn preprocess(&mut self, series: &[f64]) -> ForecastResult<ProcessedData> {
        if self.scale_state.is_some() {
            return Err(ForecastError::AlreadyFitted);
        }

        let w = self.config.window_size;
        let samples = self.builder.build(series)?;
        // Nudge before flooring so e.g. 100 * 0.29 lands on 29, not 28
        let split_index = (samples.len() as f64 * self.config.train_ratio + 1e-9).floor() as usize;
        if split_index == 0 || split_index == samples.len() {
            return Err(ForecastError::InsufficientData {
                len: series.len(),
                window_size: w,
            });
        }

        // Every value a training window or target touches
        let state = Scaler::fit(&series[..split_index + w], self.config.scaling)?;
        debug!("Fitted scale state {:?} on {} values", state, split_index + w);

        let (train, test) = samples.split_at(split_index);
        let (train_x, train_y) = Self::pack(train, w, &state)?;
        let (test_x, test_y) = Self::pack(test, w, &state)?;

        info!(
            "Preprocessed {} values into {} train / {} test windows of {}",
            series.len(),
            train.len(),
            test.len(),
            w
        );

        self.scale_state = Some(state);
        Ok(ProcessedData {
            train_x,
            train_y,
            test_x,
            test_y,
            split_index,
        })
    }

    /// Converts scaled values back to real units with the fitted state.
    pub fn postprocess(&self, values: &[f64]) -> ForecastResult<Vec<f64>> {
        let state = self.scale_state.as_ref().ok_or(ForecastError::NotFitted)?;
        Ok(Scaler::inverse_transform(values, state))
    }

    /// Scales real-unit values with the fitted state.
    pub fn scale(&self, values: &[f64]) -> ForecastResult<Vec<f64>> {
        let state = self.scale_state.as_ref().ok_or(ForecastError::NotFitted)?;
        Ok(Scaler::transform(values, state))
    }

    fn pack(
        samples: &[Sample],
        window_size: usize,
        state: &ScaleState,
    ) -> ForecastResult<(Array3<f64>, Array2<f64>)> {
        let n = samples.len();
        let windows: Vec<f64> = samples
            .par_iter()
            .flat_map_iter(|s| s.window.values().iter().map(|&v| state.scale(v)))
            .collect();
        let targets: Vec<f64> = samples.par_iter().map(|s| state.scale(s.target)).collect();

        let actual = windows.len();
        let x = Array3::from_shape_vec((n, window_size, 1), windows).map_err(|_| {
            ForecastError::ShapeMismatch {
                expected: n * window_size,
                actual,
            }
        })?;
        let y = Array2::from_shape_vec((n, 1), targets)
            .map_err(|_| ForecastError::ShapeMismatch { expected: n, actual: n })?;
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (1..=n).map(|v| v as f64).collect()
    }

    fn config(window_size: usize, train_ratio: f64) -> ProcessorConfig {
        ProcessorConfig {
            window_size,
            train_ratio,
            scaling: ScalingMethod::MinMax,
        }
    }

    #[test]
    fn test_preprocess_shapes_and_split() {
        let mut processor = DataProcessor::new(config(3, 0.75)).unwrap();
        let data = processor.preprocess(&ramp(10)).unwrap();

        assert_eq!(data.split_index, 5);
        assert_eq!(data.train_x.dim(), (5, 3, 1));
        assert_eq!(data.train_y.dim(), (5, 1));
        assert_eq!(data.test_x.dim(), (2, 3, 1));
        assert_eq!(data.test_y.dim(), (2, 1));
        assert_eq!(
            processor.scale_state(),
            Some(&ScaleState::MinMax { min: 1.0, max: 8.0 })
        );
    }

    #[test]
    fn test_train_samples_precede_test_samples() {
        let mut processor = DataProcessor::new(config(4, 0.6)).unwrap();
        let series = ramp(30);
        let data = processor.preprocess(&series).unwrap();

        let train_y: Vec<f64> = data.train_y.iter().copied().collect();
        let train_targets = processor.postprocess(&train_y).unwrap();
        let test_targets = processor.postprocess(&data.test_targets()).unwrap();

        let last_train = train_targets.last().copied().unwrap();
        let first_test = test_targets.first().copied().unwrap();
        assert!(train_targets.windows(2).all(|p| p[0] < p[1]));
        assert!(test_targets.windows(2).all(|p| p[0] < p[1]));
        assert!(last_train < first_test);
        assert!((first_test - series[data.split_index + 4]).abs() < 1e-9);
    }

    #[test]
    fn test_test_values_may_exceed_unit_range() {
        let mut processor = DataProcessor::new(config(3, 0.75)).unwrap();
        let data = processor.preprocess(&ramp(10)).unwrap();

        // 10 lies above the training max of 8
        let last_target = data.test_y[[1, 0]];
        assert!((last_target - 9.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_postprocess_before_preprocess_fails() {
        let processor = DataProcessor::new(ProcessorConfig::default()).unwrap();
        assert!(matches!(
            processor.postprocess(&[0.5]),
            Err(ForecastError::NotFitted)
        ));
        assert!(matches!(processor.scale(&[0.5]), Err(ForecastError::NotFitted)));
    }

    #[test]
    fn test_second_preprocess_is_rejected() {
        let mut processor = DataProcessor::new(config(3, 0.75)).unwrap();
        processor.preprocess(&ramp(10)).unwrap();
        let before = *processor.scale_state().unwrap();

        let res = processor.preprocess(&ramp(100));
        assert!(matches!(res, Err(ForecastError::AlreadyFitted)));
        assert_eq!(processor.scale_state(), Some(&before));
    }

    #[test]
    fn test_split_leaving_empty_train_set_fails() {
        // A single sample floors to an empty training prefix
        let mut processor = DataProcessor::new(config(3, 0.9)).unwrap();
        assert!(matches!(
            processor.preprocess(&ramp(4)),
            Err(ForecastError::InsufficientData { .. })
        ));
        assert!(processor.scale_state().is_none());
    }

    #[test]
    fn test_split_index_not_lost_to_float_rounding() {
        // 100 samples of window 3
        for (ratio, expected) in [(0.29, 29), (0.57, 57), (0.7, 70), (0.58, 58)] {
            let mut processor = DataProcessor::new(config(3, ratio)).unwrap();
            let data = processor.preprocess(&ramp(103)).unwrap();
            assert_eq!(data.split_index, expected, "ratio {}", ratio);
            assert_eq!(data.n_train() + data.n_test(), 100);
        }
    }

    #[test]
    fn test_short_series_fails() {
        let mut processor = DataProcessor::new(config(50, 0.9)).unwrap();
        assert!(matches!(
            processor.preprocess(&ramp(50)),
            Err(ForecastError::InsufficientData {
                len: 50,
                window_size: 50
            })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(DataProcessor::new(config(0, 0.9)).is_err());
        assert!(DataProcessor::new(config(3, 0.0)).is_err());
        assert!(DataProcessor::new(config(3, 1.0)).is_err());
        assert!(DataProcessor::new(config(3, f64::NAN)).is_err());
    }

    #[test]
    fn test_constant_series_preprocesses() {
        let mut processor = DataProcessor::new(config(3, 0.75)).unwrap();
        let data = processor.preprocess(&[5.0; 12]).unwrap();

        assert!(processor.scale_state().unwrap().is_degenerate());
        assert!(data.train_x.iter().all(|v| *v == 0.0));
        assert_eq!(processor.postprocess(&[0.0, 1.0]).unwrap(), vec![5.0, 6.0]);
    }

    #[test]
    fn test_test_window_returns_scaled_seed() {
        let mut processor = DataProcessor::new(config(3, 0.75)).unwrap();
        let data = processor.preprocess(&ramp(10)).unwrap();

        let seed = data.test_window(0).unwrap();
        let real = processor.postprocess(seed.values()).unwrap();
        for (a, b) in real.iter().zip([6.0, 7.0, 8.0]) {
            assert!((a - b).abs() < 1e-9);
        }
        assert!(data.test_window(2).is_none());
    }
}
