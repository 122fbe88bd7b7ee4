//! seqcast - windowed one-step and recursive time-series forecasting
//!
//! Loads one numeric column from a CSV file, trains (or loads) a single-step
//! model on sliding windows, then writes one-step test predictions and a
//! recursive multi-step forecast in real units.
//!
//! # Usage
//! ```sh
//! cargo run -- --dataset data/timeseries_1h.csv --window-size 50
//! cargo run -- --eval-only --model-path model.json
//! ```
//!
//! Every option can also be set through the environment (`WINDOW_SIZE`,
//! `TRAIN_RATIO`, `N_FUTURE_PREDS`, `SCALING_METHOD`, `MODEL_KIND`,
//! `MODEL_PATH`, `EVAL_ONLY`, `DATASET_PATH`, `DATASET_COLUMN`, `OUTPUT_DIR`);
//! command-line flags take precedence.

use anyhow::{Context, Result};
use clap::Parser;
use seqcast::application::forecasting::{DataProcessor, ForecastRunner};
use seqcast::application::ml::prepare_model;
use seqcast::config::{Config, ModelKind};
use seqcast::domain::forecasting::ScalingMethod;
use seqcast::infrastructure::{CsvSeriesLoader, ReportWriter};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to csv dataset to use
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Name of the numeric column to forecast
    #[arg(short, long)]
    column: Option<String>,

    /// Path for saving/loading the trained model
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// Model backend: forest or onnx
    #[arg(long)]
    model_kind: Option<ModelKind>,

    /// Length of input sequence to predict next datapoint
    #[arg(short, long)]
    window_size: Option<usize>,

    /// Fraction of windows (oldest first) used for training
    #[arg(long)]
    train_ratio: Option<f64>,

    /// Number of recursive future predictions
    #[arg(short, long)]
    n_future_preds: Option<usize>,

    /// Normalization: minmax or standard
    #[arg(long)]
    scaling: Option<ScalingMethod>,

    /// Directory for prediction reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// If set model will be loaded from path instead of trained
    #[arg(long)]
    eval_only: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(v) = self.dataset {
            config.data.dataset_path = v;
        }
        if let Some(v) = self.column {
            config.data.column = v;
        }
        if let Some(v) = self.output_dir {
            config.data.output_dir = v;
        }
        if let Some(v) = self.model_path {
            config.model.model_path = v;
        }
        if let Some(v) = self.model_kind {
            config.model.kind = v;
        }
        if let Some(v) = self.window_size {
            config.pipeline.window_size = v;
        }
        if let Some(v) = self.train_ratio {
            config.pipeline.train_ratio = v;
        }
        if let Some(v) = self.n_future_preds {
            config.pipeline.n_future_preds = v;
        }
        if let Some(v) = self.scaling {
            config.pipeline.scaling = v;
        }
        if self.eval_only {
            config.model.eval_only = true;
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("seqcast {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    Args::parse().apply(&mut config);
    info!(
        "Configuration loaded: window={}, train_ratio={}, future={}, scaling={}, model={:?}, eval_only={}",
        config.pipeline.window_size,
        config.pipeline.train_ratio,
        config.pipeline.n_future_preds,
        config.pipeline.scaling,
        config.model.kind,
        config.model.eval_only
    );

    let series = CsvSeriesLoader::new(config.data.column.clone()).load(&config.data.dataset_path)?;

    let mut processor = DataProcessor::new(config.pipeline.processor_config())
        .context("Invalid pipeline configuration")?;
    let data = processor
        .preprocess(&series)
        .context("Failed to preprocess series")?;

    let model = prepare_model(&config.model, processor.window_size(), &data)?;

    let outcome = ForecastRunner::new(config.pipeline.n_future_preds)
        .evaluate(&processor, &data, &*model)
        .context("Forecast evaluation failed")?;

    ReportWriter::new(&config.data.output_dir).write(&outcome)?;

    info!("Done.");
    Ok(())
}
