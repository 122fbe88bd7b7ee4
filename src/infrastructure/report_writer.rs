use crate::application::forecasting::ForecastOutcome;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const STATIC_REPORT: &str = "static_predictions.csv";
pub const MOVING_REPORT: &str = "moving_predictions.csv";
pub const SUMMARY_REPORT: &str = "run_summary.json";

#[derive(Debug, Serialize)]
struct StaticRow {
    index: usize,
    truth: f64,
    prediction: f64,
}

#[derive(Debug, Serialize)]
struct MovingRow {
    index: usize,
    truth: Option<f64>,
    prediction: f64,
}

/// Writes run outputs (truth vs prediction series and a JSON summary) to a directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn write(&self, outcome: &ForecastOutcome) -> Result<()> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create output dir {:?}", self.output_dir))?;

        let static_path = self.output_dir.join(STATIC_REPORT);
        Self::write_static(&static_path, &outcome.actuals, &outcome.static_predictions)?;

        let moving_path = self.output_dir.join(MOVING_REPORT);
        Self::write_moving(&moving_path, &outcome.actuals, &outcome.moving_predictions)?;

        let summary_path = self.output_dir.join(SUMMARY_REPORT);
        let mut file = File::create(&summary_path)
            .with_context(|| format!("Failed to create {:?}", summary_path))?;
        serde_json::to_writer_pretty(&mut file, outcome)?;
        file.flush()?;

        info!("Reports written to {:?}", self.output_dir);
        Ok(())
    }

    fn write_static(path: &Path, actuals: &[f64], predictions: &[f64]) -> Result<()> {
        let mut wtr =
            csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
        for (index, (truth, prediction)) in actuals.iter().zip(predictions.iter()).enumerate() {
            wtr.serialize(StaticRow {
                index,
                truth: *truth,
                prediction: *prediction,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// The moving forecast may run past the observed test values; `truth` is empty there.
    fn write_moving(path: &Path, actuals: &[f64], predictions: &[f64]) -> Result<()> {
        let mut wtr =
            csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
        for (index, prediction) in predictions.iter().enumerate() {
            wtr.serialize(MovingRow {
                index,
                truth: actuals.get(index).copied(),
                prediction: *prediction,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}
