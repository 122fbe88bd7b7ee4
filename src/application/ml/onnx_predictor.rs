use super::predictor::ForecastModel;
use crate::domain::errors::ModelError;
use crate::domain::forecasting::Window;
use ort::session::Session;
use ort::value::Value;
use std::fmt;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Load-only sequence model (e.g. an exported LSTM) served through ONNX Runtime.
///
/// Expects a single `[1, window_size, 1]` f32 input and reads the first
/// element of the first output as the next value.
pub struct OnnxForecastModel {
    session: Mutex<Session>,
    window_size: usize,
}

impl OnnxForecastModel {
    pub fn load(model_path: &Path, window_size: usize) -> Result<Self, ModelError> {
        let persistence_error = |reason: String| ModelError::Persistence {
            path: model_path.display().to_string(),
            reason,
        };

        if !model_path.exists() {
            return Err(persistence_error("file not found".to_string()));
        }

        let session = Session::builder()
            .map_err(|e| persistence_error(format!("Failed to create session builder: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| persistence_error(format!("Failed to load ONNX model: {}", e)))?;

        info!("Successfully loaded ONNX model from {:?}", model_path);
        Ok(Self {
            session: Mutex::new(session),
            window_size,
        })
    }
}

fn backend_error(stage: &str, err: impl fmt::Display) -> ModelError {
    ModelError::Backend {
        reason: format!("ONNX {} failed: {}", stage, err),
    }
}

impl ForecastModel for OnnxForecastModel {
    fn predict(&self, window: &Window) -> Result<f64, ModelError> {
        if window.len() != self.window_size {
            return Err(ModelError::InputShape {
                expected: self.window_size,
                actual: window.len(),
            });
        }

        let mut session = self
            .session
            .lock()
            .map_err(|e| backend_error("session lock", e))?;

        // [1, window_size, 1]: one sequence with a single feature
        let input: Vec<f32> = window.values().iter().map(|&v| v as f32).collect();
        let shape = vec![1, self.window_size, 1];
        let input = Value::from_array((shape.as_slice(), input))
            .map_err(|e| backend_error("input tensor", e))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| backend_error("inference", e))?;
        let (_, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| backend_error("inference", "model produced no outputs"))?;
        let (_, values) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| backend_error("output tensor", e))?;

        values
            .first()
            .map(|&v| v as f64)
            .ok_or_else(|| backend_error("output tensor", "empty"))
    }

    fn window_size(&self) -> usize {
        self.window_size
    }

    fn name(&self) -> &str {
        "ONNX Runtime (sequence)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file_is_an_error() {
        let res = OnnxForecastModel::load(Path::new("non_existent.onnx"), 50);
        match res {
            Err(ModelError::Persistence { path, reason }) => {
                assert!(path.contains("non_existent.onnx"));
                assert!(reason.contains("not found"));
            }
            _ => panic!("expected persistence error"),
        }
    }

    #[test]
    fn test_backend_error_names_stage() {
        match backend_error("inference", "model produced no outputs") {
            ModelError::Backend { reason } => {
                assert_eq!(reason, "ONNX inference failed: model produced no outputs")
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
