//! CSV Export Module
//! Writes the aggregation behind a chart to CSV using Polars.

use crate::charts::{ChartData, ChartValues};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Build a DataFrame with one row per category (or month).
pub fn chart_to_dataframe(chart: &ChartData) -> Result<DataFrame, ExportError> {
    let label_header = chart.kind.x_label();

    let df = match &chart.values {
        ChartValues::Grid(grid) => {
            let mut columns = vec![Column::new(label_header.into(), grid.row_labels().to_vec())];
            for (j, label) in grid.column_labels().iter().enumerate() {
                columns.push(Column::new(label.as_str().into(), grid.column_values(j)));
            }
            DataFrame::new(columns)?
        }
        ChartValues::Averages(times) => {
            let entries = times.entries();
            DataFrame::new(vec![
                Column::new(
                    label_header.into(),
                    entries.iter().map(|e| e.label.clone()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "mean_days".into(),
                    entries.iter().map(|e| e.mean).collect::<Vec<_>>(),
                ),
                Column::new(
                    "min_days".into(),
                    entries.iter().map(|e| e.min).collect::<Vec<_>>(),
                ),
                Column::new(
                    "max_days".into(),
                    entries.iter().map(|e| e.max).collect::<Vec<_>>(),
                ),
                Column::new(
                    "count".into(),
                    entries.iter().map(|e| e.count as u32).collect::<Vec<_>>(),
                ),
            ])?
        }
        ChartValues::Monthly(series) => {
            let points = series.points();
            DataFrame::new(vec![
                Column::new(
                    label_header.into(),
                    points.iter().map(|(m, _)| m.to_string()).collect::<Vec<_>>(),
                ),
                Column::new(
                    chart.kind.y_label().into(),
                    points.iter().map(|(_, c)| *c).collect::<Vec<_>>(),
                ),
            ])?
        }
    };

    Ok(df)
}

/// Write the chart's aggregation to `path` as CSV with a header row.
pub fn export_csv(chart: &ChartData, path: &Path) -> Result<(), ExportError> {
    let mut df = chart_to_dataframe(chart)?;
    let mut file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;

    tracing::info!(path = %path.display(), rows = df.height(), "exported chart data");
    Ok(())
}
