use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Reads one numeric column of a headed CSV file as a time-ordered series.
pub struct CsvSeriesLoader {
    column: String,
}

impl CsvSeriesLoader {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn load(&self, path: &Path) -> Result<Vec<f64>> {
        let file = File::open(path).with_context(|| format!("Failed to open dataset {:?}", path))?;
        let series = self
            .read(BufReader::new(file))
            .with_context(|| format!("Failed to read dataset {:?}", path))?;
        info!(
            "Loaded {} values of column '{}' from {:?}",
            series.len(),
            self.column,
            path
        );
        Ok(series)
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<f64>> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers().context("Missing CSV header")?.clone();
        let Some(idx) = headers.iter().position(|h| h.trim() == self.column) else {
            bail!(
                "Column '{}' not found; available columns: {}",
                self.column,
                headers.iter().collect::<Vec<_>>().join(", ")
            );
        };

        let mut series = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("Malformed CSV row {}", row + 1))?;
            let cell = record.get(idx).unwrap_or("").trim();
            let value: f64 = cell
                .parse()
                .with_context(|| format!("Row {}: '{}' is not a number", row + 1, cell))?;
            if !value.is_finite() {
                bail!("Row {}: non-finite value {}", row + 1, value);
            }
            series.push(value);
        }
        Ok(series)
    }
}
