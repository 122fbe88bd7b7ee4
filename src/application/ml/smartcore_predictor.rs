use super::predictor::{ForecastModel, TrainableModel};
use crate::domain::errors::ModelError;
use crate::domain::forecasting::Window;
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_split: 5,
        }
    }
}

#[derive(Serialize)]
struct PersistedForestRef<'a> {
    window_size: usize,
    model: &'a Forest,
}

#[derive(Deserialize)]
struct PersistedForest {
    window_size: usize,
    model: Forest,
}

/// Random forest regressor over flattened windows.
pub struct ForestForecastModel {
    model: Option<Forest>,
    params: ForestParams,
    window_size: usize,
}

impl ForestForecastModel {
    pub fn new(window_size: usize, params: ForestParams) -> Self {
        Self {
            model: None,
            params,
            window_size,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    fn check_window(&self, len: usize) -> Result<(), ModelError> {
        if len != self.window_size {
            return Err(ModelError::InputShape {
                expected: self.window_size,
                actual: len,
            });
        }
        Ok(())
    }

    fn persistence_error(path: &Path, reason: impl ToString) -> ModelError {
        ModelError::Persistence {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ForecastModel for ForestForecastModel {
    fn predict(&self, window: &Window) -> Result<f64, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotTrained)?;
        self.check_window(window.len())?;

        let input_matrix = DenseMatrix::from_2d_vec(&vec![window.values().to_vec()]).map_err(
            |e| ModelError::Backend {
                reason: format!("Matrix creation failed: {}", e),
            },
        )?;

        let predictions = model.predict(&input_matrix).map_err(|e| ModelError::Backend {
            reason: format!("Prediction failed: {}", e),
        })?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| ModelError::Backend {
                reason: "No prediction returned".to_string(),
            })
    }

    fn predict_batch(&self, windows: &Array3<f64>) -> Result<Vec<f64>, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotTrained)?;
        self.check_window(windows.dim().1)?;
        if windows.dim().0 == 0 {
            return Ok(Vec::new());
        }

        let rows: Vec<Vec<f64>> = windows
            .outer_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        let matrix = DenseMatrix::from_2d_vec(&rows).map_err(|e| ModelError::Backend {
            reason: format!("Matrix creation failed: {}", e),
        })?;
        model.predict(&matrix).map_err(|e| ModelError::Backend {
            reason: format!("Prediction failed: {}", e),
        })
    }

    fn window_size(&self) -> usize {
        self.window_size
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}

impl TrainableModel for ForestForecastModel {
    fn fit(&mut self, x: &Array3<f64>, y: &Array2<f64>) -> Result<(), ModelError> {
        self.check_window(x.dim().1)?;
        let (n_samples, _, _) = x.dim();
        if n_samples == 0 || y.len() != n_samples {
            return Err(ModelError::Backend {
                reason: format!(
                    "Training set has {} windows and {} targets",
                    n_samples,
                    y.len()
                ),
            });
        }

        let rows: Vec<Vec<f64>> = x
            .outer_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        let targets: Vec<f64> = y.iter().copied().collect();
        let x_matrix = DenseMatrix::from_2d_vec(&rows).map_err(|e| ModelError::Backend {
            reason: format!("Matrix error: {}", e),
        })?;

        info!(
            "Training Random Forest Regressor on {} windows (Trees: {}, Depth: {}, MinSplit: {})...",
            n_samples, self.params.n_trees, self.params.max_depth, self.params.min_split
        );

        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.params.n_trees)
            .with_max_depth(self.params.max_depth)
            .with_min_samples_split(self.params.min_split);
        let model = RandomForestRegressor::fit(&x_matrix, &targets, params)
            .map_err(|e| ModelError::Backend {
                reason: format!("Training error: {}", e),
            })?;

        self.model = Some(model);
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<(), ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotTrained)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Self::persistence_error(path, e))?;
            }
        }

        let file = File::create(path).map_err(|e| Self::persistence_error(path, e))?;
        let persisted = PersistedForestRef {
            window_size: self.window_size,
            model,
        };
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &persisted)
            .map_err(|e| Self::persistence_error(path, e))?;
        writer
            .flush()
            .map_err(|e| Self::persistence_error(path, e))?;

        info!("Saved ML model to {:?}", path);
        Ok(())
    }

    fn load(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|e| Self::persistence_error(path, e))?;
        let persisted: PersistedForest = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Self::persistence_error(path, e))?;

        info!(
            "Successfully loaded ML model from {:?} (window size {})",
            path, persisted.window_size
        );
        Ok(Self {
            model: Some(persisted.model),
            params: ForestParams::default(),
            window_size: persisted.window_size,
        })
    }
}
