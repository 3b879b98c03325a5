//! CSV Table Loader Module
//! Reads the issue CSV with Polars and resolves it into a typed `IssueTable`.

use crate::config::{AppConfig, ColumnMapping};
use crate::data::table::{ColumnRole, IssueRecord, IssueTable, Schema};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Date column '{0}' not found")]
    MissingDateColumn(String),
    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a date")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
    },
}

/// Loads issue tables according to the configured column mapping.
pub struct TableLoader {
    mapping: ColumnMapping,
    separator: u8,
    date_formats: Vec<String>,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl TableLoader {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            mapping: config.columns.clone(),
            separator: config.separator_byte(),
            date_formats: config.date_formats.clone(),
        }
    }

    /// Load a CSV file. Every column is read as text and typed afterwards.
    pub fn load_csv(&self, file_path: &Path) -> Result<IssueTable, LoadError> {
        std::fs::metadata(file_path).map_err(|source| LoadError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_separator(self.separator)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        let table = self.table_from_dataframe(&df)?;
        tracing::info!(
            path = %file_path.display(),
            rows = table.len(),
            "loaded issue table"
        );
        Ok(table.with_source(file_path.to_path_buf()))
    }

    /// Resolve a text DataFrame into typed records.
    pub fn table_from_dataframe(&self, df: &DataFrame) -> Result<IssueTable, LoadError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let present: Vec<ColumnRole> = ColumnRole::ALL
            .iter()
            .copied()
            .filter(|role| names.iter().any(|n| n == role.column_name(&self.mapping)))
            .collect();

        let date_col = self.mapping.reported_date.clone();
        if !present.contains(&ColumnRole::ReportedDate) {
            return Err(LoadError::MissingDateColumn(date_col));
        }
        for role in ColumnRole::ALL.iter().filter(|r| !present.contains(r)) {
            tracing::warn!(
                column = role.column_name(&self.mapping),
                "{} column absent, charts using it are unavailable",
                role
            );
        }

        let problem_types = self.text_column(df, ColumnRole::ProblemType)?;
        let statuses = self.text_column(df, ColumnRole::Status)?;
        let times = self.text_column(df, ColumnRole::ResolutionTime)?;
        let dates = self.text_column(df, ColumnRole::ReportedDate)?;
        let regions = self.text_column(df, ColumnRole::Region)?;

        let mut records = Vec::with_capacity(df.height());
        for (i, ((((problem_type, status), time), date), region)) in problem_types
            .into_iter()
            .zip(statuses)
            .zip(times)
            .zip(dates)
            .zip(regions)
            .enumerate()
        {
            let reported_date = match date.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(value) => Some(parse_report_date(value, &self.date_formats).ok_or_else(
                    || LoadError::InvalidDate {
                        row: i + 1,
                        column: date_col.clone(),
                        value: value.to_string(),
                    },
                )?),
            };

            records.push(IssueRecord {
                problem_type,
                status,
                resolution_time_days: time.as_deref().and_then(parse_days),
                reported_date,
                region,
            });
        }

        Ok(IssueTable::new(
            Schema::new(self.mapping.clone(), present),
            records,
        ))
    }

    /// Text values of the column for `role`, all `None` when the file lacks it.
    fn text_column(
        &self,
        df: &DataFrame,
        role: ColumnRole,
    ) -> Result<Vec<Option<String>>, LoadError> {
        let Ok(column) = df.column(role.column_name(&self.mapping)) else {
            return Ok(vec![None; df.height()]);
        };

        let column = column.cast(&DataType::String)?;
        let values = column
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }
}

/// Earliest year a report date may carry. `%Y` also accepts 1-3 digit years, which
/// would read `12-31-23` as 0023-12-31.
const MIN_REPORT_YEAR: i32 = 1000;

/// Parse a report date with the first matching format. Date-time formats keep the date part.
pub fn parse_report_date(value: &str, formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(value, fmt)
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(value, fmt).ok().map(|dt| dt.date()))
            .filter(|date| date.year() >= MIN_REPORT_YEAR)
    })
}

/// Coerce a resolution time cell to days. Anything non-numeric is missing.
pub fn parse_days(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|days| days.is_finite())
}
