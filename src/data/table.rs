//! Issue Table Module
//! Typed rows, column roles and the schema resolved at load time.

use crate::config::ColumnMapping;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// The part a source column plays in the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnRole {
    ProblemType,
    Status,
    ResolutionTime,
    ReportedDate,
    Region,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 5] = [
        ColumnRole::ProblemType,
        ColumnRole::Status,
        ColumnRole::ResolutionTime,
        ColumnRole::ReportedDate,
        ColumnRole::Region,
    ];

    /// Source column name for this role under `mapping`.
    pub fn column_name<'a>(&self, mapping: &'a ColumnMapping) -> &'a str {
        match self {
            ColumnRole::ProblemType => &mapping.problem_type,
            ColumnRole::Status => &mapping.status,
            ColumnRole::ResolutionTime => &mapping.resolution_time,
            ColumnRole::ReportedDate => &mapping.reported_date,
            ColumnRole::Region => &mapping.region,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::ProblemType => "problem type",
            ColumnRole::Status => "status",
            ColumnRole::ResolutionTime => "resolution time",
            ColumnRole::ReportedDate => "reported date",
            ColumnRole::Region => "region",
        };
        f.write_str(name)
    }
}

/// One reported issue. Missing cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueRecord {
    pub problem_type: Option<String>,
    pub status: Option<String>,
    pub resolution_time_days: Option<f64>,
    pub reported_date: Option<NaiveDate>,
    pub region: Option<String>,
}

/// Column mapping used for a load and the roles the file actually provided.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub mapping: ColumnMapping,
    present: BTreeSet<ColumnRole>,
}

impl Schema {
    pub fn new(mapping: ColumnMapping, present: impl IntoIterator<Item = ColumnRole>) -> Self {
        Self {
            mapping,
            present: present.into_iter().collect(),
        }
    }

    /// Schema with every role present under the default mapping.
    #[cfg(test)]
    pub fn complete() -> Self {
        Self::new(ColumnMapping::default(), ColumnRole::ALL)
    }

    pub fn has(&self, role: ColumnRole) -> bool {
        self.present.contains(&role)
    }

    /// Roles from `required` that the source file did not provide.
    pub fn missing<'a>(&'a self, required: &'a [ColumnRole]) -> impl Iterator<Item = ColumnRole> + 'a {
        required.iter().copied().filter(|role| !self.has(*role))
    }
}

/// Loaded issues. Replaced wholesale on every successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueTable {
    schema: Schema,
    records: Vec<IssueRecord>,
    source: Option<PathBuf>,
}

impl IssueTable {
    pub fn new(schema: Schema, records: Vec<IssueRecord>) -> Self {
        Self {
            schema,
            records,
            source: None,
        }
    }

    pub fn with_source(mut self, path: PathBuf) -> Self {
        self.source = Some(path);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[IssueRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }
}

/// Calendar month bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Months since year 0, used as a continuous x coordinate.
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub fn from_ordinal(ordinal: i64) -> Self {
        Self::new(ordinal.div_euclid(12) as i32, ordinal.rem_euclid(12) as u32 + 1)
    }

    /// First day of the month.
    #[cfg(test)]
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
