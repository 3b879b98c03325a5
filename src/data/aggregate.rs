//! Aggregation Module
//! Group/count/average operations backing the four issue charts.

use crate::data::table::{ColumnRole, IssueRecord, IssueTable, YearMonth};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("Column '{column}' ({role}) is required but missing from the loaded file")]
    MissingColumn { role: ColumnRole, column: String },
}

/// Counts keyed by two category labels, laid out as a grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountGrid {
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    /// `cells[row][column]`
    cells: Vec<Vec<u32>>,
}

impl CountGrid {
    /// Build a grid from `(row, column)` key pairs. Labels are sorted.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut counts: BTreeMap<(&str, &str), u32> = BTreeMap::new();
        for pair in pairs {
            *counts.entry(pair).or_default() += 1;
        }

        let rows: BTreeSet<&str> = counts.keys().map(|(r, _)| *r).collect();
        let columns: BTreeSet<&str> = counts.keys().map(|(_, c)| *c).collect();
        let row_labels: Vec<String> = rows.iter().map(|s| s.to_string()).collect();
        let column_labels: Vec<String> = columns.iter().map(|s| s.to_string()).collect();

        let cells = rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| counts.get(&(*r, *c)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            row_labels,
            column_labels,
            cells,
        }
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[Vec<u32>] {
        &self.cells
    }

    /// Count for a label pair, 0 when the combination never occurs.
    #[cfg(test)]
    pub fn get(&self, row: &str, column: &str) -> u32 {
        let r = self.row_labels.iter().position(|l| l == row);
        let c = self.column_labels.iter().position(|l| l == column);
        match (r, c) {
            (Some(r), Some(c)) => self.cells[r][c],
            _ => 0,
        }
    }

    /// Values of one column across all rows.
    pub fn column_values(&self, column: usize) -> Vec<u32> {
        self.cells.iter().map(|row| row[column]).collect()
    }

    /// Sum of each row, i.e. the height of each stacked bar.
    pub fn row_totals(&self) -> Vec<u32> {
        self.cells.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn total(&self) -> u32 {
        self.row_totals().iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }
}

/// Resolution-time statistics for one problem type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionStat {
    pub label: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionTimes {
    entries: Vec<ResolutionStat>,
}

impl ResolutionTimes {
    pub fn entries(&self) -> &[ResolutionStat] {
        &self.entries
    }

    #[cfg(test)]
    pub fn mean_of(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.mean)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Issue counts per calendar month, oldest first. Months without issues are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    points: Vec<(YearMonth, u32)>,
}

impl MonthlySeries {
    pub fn points(&self) -> &[(YearMonth, u32)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Aggregations over a loaded issue table.
pub struct Aggregator;

impl Aggregator {
    /// Fail when the table lacks any of `roles`.
    pub fn require(table: &IssueTable, roles: &[ColumnRole]) -> Result<(), AggregationError> {
        let schema = table.schema();
        match schema.missing(roles).next() {
            Some(role) => Err(AggregationError::MissingColumn {
                role,
                column: role.column_name(&schema.mapping).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Issue counts, problem type (rows) × status (columns).
    pub fn counts_by_problem_and_status(table: &IssueTable) -> Result<CountGrid, AggregationError> {
        Self::require(table, &[ColumnRole::ProblemType, ColumnRole::Status])?;
        Ok(Self::count_pairs(table.records(), |r| {
            Some((r.problem_type.as_deref()?, r.status.as_deref()?))
        }))
    }

    /// Issue counts, region (rows) × problem type (columns).
    pub fn counts_by_region_and_problem(table: &IssueTable) -> Result<CountGrid, AggregationError> {
        Self::require(table, &[ColumnRole::Region, ColumnRole::ProblemType])?;
        Ok(Self::count_pairs(table.records(), |r| {
            Some((r.region.as_deref()?, r.problem_type.as_deref()?))
        }))
    }

    fn count_pairs<'a>(
        records: &'a [IssueRecord],
        key: impl Fn(&'a IssueRecord) -> Option<(&'a str, &'a str)>,
    ) -> CountGrid {
        CountGrid::from_pairs(records.iter().filter_map(key))
    }

    /// Mean resolution days per problem type over resolved issues.
    ///
    /// Issues without a numeric resolution time are left out of the mean; problem types
    /// with no usable value at all are dropped.
    pub fn average_resolution_time(
        table: &IssueTable,
        resolved_status: &str,
    ) -> Result<ResolutionTimes, AggregationError> {
        Self::require(
            table,
            &[
                ColumnRole::ProblemType,
                ColumnRole::Status,
                ColumnRole::ResolutionTime,
            ],
        )?;

        let mut by_problem: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in table.records() {
            if record.status.as_deref() != Some(resolved_status) {
                continue;
            }
            let Some(problem) = record.problem_type.as_deref() else {
                continue;
            };
            let values = by_problem.entry(problem).or_default();
            if let Some(days) = record.resolution_time_days {
                values.push(days);
            }
        }

        let entries = by_problem
            .into_iter()
            .filter_map(|(label, values)| {
                let mean = values.iter().mean();
                if mean.is_nan() {
                    tracing::debug!(problem = label, "no numeric resolution times, dropped");
                    return None;
                }
                Some(ResolutionStat {
                    label: label.to_string(),
                    mean,
                    min: values.iter().copied().fold(f64::INFINITY, f64::min),
                    max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    count: values.len(),
                })
            })
            .collect();

        Ok(ResolutionTimes { entries })
    }

    /// Issue counts per reported month, chronological.
    pub fn issues_over_time(table: &IssueTable) -> Result<MonthlySeries, AggregationError> {
        Self::require(table, &[ColumnRole::ReportedDate])?;

        let mut buckets: BTreeMap<YearMonth, u32> = BTreeMap::new();
        for date in table.records().iter().filter_map(|r| r.reported_date) {
            *buckets.entry(YearMonth::of(date)).or_default() += 1;
        }

        Ok(MonthlySeries {
            points: buckets.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnMapping;
    use crate::data::table::Schema;
    use chrono::NaiveDate;

    fn issue(problem: &str, status: &str, days: Option<f64>) -> IssueRecord {
        IssueRecord {
            problem_type: Some(problem.to_string()),
            status: Some(status.to_string()),
            resolution_time_days: days,
            ..IssueRecord::default()
        }
    }

    fn dated(date: &str) -> IssueRecord {
        IssueRecord {
            reported_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            ..IssueRecord::default()
        }
    }

    fn table(records: Vec<IssueRecord>) -> IssueTable {
        IssueTable::new(Schema::complete(), records)
    }

    #[test]
    fn leak_scenario() {
        let table = table(vec![
            issue("Leak", "Resolved", Some(5.0)),
            issue("Leak", "Resolved", Some(3.0)),
            issue("Leak", "Open", None),
        ]);

        let grid = Aggregator::counts_by_problem_and_status(&table).unwrap();
        assert_eq!(grid.row_labels(), ["Leak"]);
        assert_eq!(grid.column_labels(), ["Open", "Resolved"]);
        assert_eq!(grid.get("Leak", "Resolved"), 2);
        assert_eq!(grid.get("Leak", "Open"), 1);

        let times = Aggregator::average_resolution_time(&table, "Resolved").unwrap();
        assert_eq!(times.entries().len(), 1);
        assert_eq!(times.mean_of("Leak"), Some(4.0));
    }

    #[test]
    fn unparseable_times_are_excluded_from_mean() {
        // "abc" and "" coerce to missing at load
        let table = table(vec![
            issue("Leak", "Solucionado", None),
            issue("Leak", "Solucionado", None),
            issue("Leak", "Solucionado", Some(7.0)),
        ]);

        let times = Aggregator::average_resolution_time(&table, "Solucionado").unwrap();
        let stat = &times.entries()[0];
        assert_eq!(stat.mean, 7.0);
        assert_eq!(stat.count, 1);
    }

    #[test]
    fn groups_without_values_are_dropped() {
        let table = table(vec![
            issue("Leak", "Solucionado", None),
            issue("Pothole", "Solucionado", Some(2.0)),
            issue("Graffiti", "Abierto", Some(9.0)),
        ]);

        let times = Aggregator::average_resolution_time(&table, "Solucionado").unwrap();
        let labels: Vec<&str> = times.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Pothole"]);
    }

    #[test]
    fn all_groups_dropped_yields_empty_result() {
        let table = table(vec![issue("Leak", "Solucionado", None)]);
        let times = Aggregator::average_resolution_time(&table, "Solucionado").unwrap();
        assert!(times.is_empty());
    }

    #[test]
    fn resolved_match_is_exact() {
        let table = table(vec![issue("Leak", "solucionado", Some(1.0))]);
        let times = Aggregator::average_resolution_time(&table, "Solucionado").unwrap();
        assert!(times.is_empty());
    }

    #[test]
    fn means_lie_within_group_range() {
        let values = [1.5, 9.0, 4.25, 4.25, 0.0, 12.0];
        let mut records: Vec<IssueRecord> = values
            .iter()
            .enumerate()
            .map(|(i, v)| issue(if i % 2 == 0 { "A" } else { "B" }, "Solucionado", Some(*v)))
            .collect();
        records.push(issue("C", "Solucionado", Some(3.0)));

        let times = Aggregator::average_resolution_time(&table(records), "Solucionado").unwrap();
        assert_eq!(times.entries().len(), 3);
        for stat in times.entries() {
            assert!(stat.min <= stat.mean && stat.mean <= stat.max, "{stat:?}");
        }
    }

    #[test]
    fn grid_sum_matches_records_with_both_keys() {
        let mut records = vec![
            issue("Leak", "Open", None),
            issue("Leak", "Closed", None),
            issue("Pothole", "Open", None),
            issue("Pothole", "Open", None),
        ];
        records.push(IssueRecord {
            problem_type: Some("Leak".into()),
            ..IssueRecord::default()
        });
        records.push(IssueRecord {
            status: Some("Open".into()),
            ..IssueRecord::default()
        });

        let grid = Aggregator::counts_by_problem_and_status(&table(records)).unwrap();
        assert_eq!(grid.total(), 4);
        assert_eq!(grid.get("Pothole", "Closed"), 0);
        assert_eq!(grid.row_totals(), [2, 2]);
        assert_eq!(grid.column_values(1), [1, 2]);
    }

    #[test]
    fn region_grid_is_keyed_by_region_then_problem() {
        let records = vec![
            IssueRecord {
                region: Some("Norte".into()),
                ..issue("Leak", "Open", None)
            },
            IssueRecord {
                region: Some("Centro".into()),
                ..issue("Leak", "Open", None)
            },
            IssueRecord {
                region: Some("Centro".into()),
                ..issue("Pothole", "Open", None)
            },
        ];

        let grid = Aggregator::counts_by_region_and_problem(&table(records)).unwrap();
        assert_eq!(grid.row_labels(), ["Centro", "Norte"]);
        assert_eq!(grid.column_labels(), ["Leak", "Pothole"]);
        assert_eq!(grid.cells(), [vec![1u32, 1], vec![1u32, 0]]);
    }

    #[test]
    fn same_month_dates_share_a_bucket() {
        let table = table(vec![dated("2023-01-15"), dated("2023-01-28")]);
        let series = Aggregator::issues_over_time(&table).unwrap();
        assert_eq!(series.points(), [(YearMonth::new(2023, 1), 2)]);
        assert_eq!(series.points()[0].0.to_string(), "2023-01");
    }

    #[test]
    fn months_are_chronological_with_gaps_kept() {
        let table = table(vec![
            dated("2023-04-02"),
            dated("2022-12-31"),
            dated("2023-01-01"),
            IssueRecord::default(),
        ]);
        let series = Aggregator::issues_over_time(&table).unwrap();
        let months: Vec<String> = series.points().iter().map(|(m, _)| m.to_string()).collect();
        assert_eq!(months, ["2022-12", "2023-01", "2023-04"]);
    }

    #[test]
    fn bucketing_one_record_per_month_is_idempotent() {
        let first = table(vec![
            dated("2023-01-15"),
            dated("2023-01-20"),
            dated("2023-03-03"),
        ]);
        let series = Aggregator::issues_over_time(&first).unwrap();

        let rebucketed = table(
            series
                .points()
                .iter()
                .map(|(month, _)| IssueRecord {
                    reported_date: month.first_day(),
                    ..IssueRecord::default()
                })
                .collect(),
        );
        let again = Aggregator::issues_over_time(&rebucketed).unwrap();

        let months: Vec<YearMonth> = series.points().iter().map(|(m, _)| *m).collect();
        let expected: Vec<(YearMonth, u32)> = months.iter().map(|m| (*m, 1)).collect();
        assert_eq!(again.points(), expected.as_slice());
    }

    #[test]
    fn empty_table_gives_empty_results() {
        let empty = table(Vec::new());
        assert!(Aggregator::counts_by_problem_and_status(&empty).unwrap().is_empty());
        assert!(Aggregator::counts_by_region_and_problem(&empty).unwrap().is_empty());
        assert!(Aggregator::average_resolution_time(&empty, "Solucionado")
            .unwrap()
            .is_empty());
        assert!(Aggregator::issues_over_time(&empty).unwrap().is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let schema = Schema::new(
            ColumnMapping::default(),
            [ColumnRole::ProblemType, ColumnRole::Status, ColumnRole::ReportedDate],
        );
        let table = IssueTable::new(schema, vec![issue("Leak", "Open", None)]);

        let err = Aggregator::counts_by_region_and_problem(&table).unwrap_err();
        assert_eq!(
            err,
            AggregationError::MissingColumn {
                role: ColumnRole::Region,
                column: "Comuna".to_string(),
            }
        );
        assert!(Aggregator::counts_by_problem_and_status(&table).is_ok());
    }
}
