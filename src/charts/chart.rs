//! Chart Definitions
//! The four issue charts and the data each one is drawn from.

use crate::data::{ColumnRole, CountGrid, MonthlySeries, ResolutionTimes};

/// How a chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    StackedBar,
    Bar,
    LineWithMarkers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    IssueCounts,
    AverageResolutionTime,
    IssuesOverTime,
    IssuesByRegion,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::IssueCounts,
        ChartKind::AverageResolutionTime,
        ChartKind::IssuesOverTime,
        ChartKind::IssuesByRegion,
    ];

    /// Label of the button requesting this chart.
    pub fn button_label(&self) -> &'static str {
        match self {
            ChartKind::IssueCounts => "Issue Counts by Problem and Status",
            ChartKind::AverageResolutionTime => "Average Time to Solve by Problem Type",
            ChartKind::IssuesOverTime => "Issues Reported Over Time",
            ChartKind::IssuesByRegion => "Issues by Comuna and Problem Type",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::IssueCounts => "Issue Counts by Problem Type and Status",
            ChartKind::AverageResolutionTime => "Average Time to Solve by Problem Type (days)",
            ChartKind::IssuesOverTime => "Number of Issues Reported Over Time",
            ChartKind::IssuesByRegion => "Issue Counts by Comuna and Problem Type",
        }
    }

    pub fn x_label(&self) -> &'static str {
        match self {
            ChartKind::IssueCounts | ChartKind::AverageResolutionTime => "Problem Type",
            ChartKind::IssuesOverTime => "Month",
            ChartKind::IssuesByRegion => "Comuna",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            ChartKind::AverageResolutionTime => "Average Days to Solve",
            _ => "Number of Issues",
        }
    }

    pub fn style(&self) -> ChartStyle {
        match self {
            ChartKind::IssueCounts | ChartKind::IssuesByRegion => ChartStyle::StackedBar,
            ChartKind::AverageResolutionTime => ChartStyle::Bar,
            ChartKind::IssuesOverTime => ChartStyle::LineWithMarkers,
        }
    }

    /// Columns the aggregation behind this chart reads.
    pub fn required_roles(&self) -> &'static [ColumnRole] {
        match self {
            ChartKind::IssueCounts => &[ColumnRole::ProblemType, ColumnRole::Status],
            ChartKind::AverageResolutionTime => &[
                ColumnRole::ProblemType,
                ColumnRole::Status,
                ColumnRole::ResolutionTime,
            ],
            ChartKind::IssuesOverTime => &[ColumnRole::ReportedDate],
            ChartKind::IssuesByRegion => &[ColumnRole::Region, ColumnRole::ProblemType],
        }
    }

    /// File name stem for exports.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::IssueCounts => "issue_counts",
            ChartKind::AverageResolutionTime => "avg_time_to_solve",
            ChartKind::IssuesOverTime => "issues_over_time",
            ChartKind::IssuesByRegion => "issues_by_comuna",
        }
    }
}

/// Aggregated values behind a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartValues {
    Grid(CountGrid),
    Averages(ResolutionTimes),
    Monthly(MonthlySeries),
}

/// One chart request's result. Derived fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub values: ChartValues,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match &self.values {
            ChartValues::Grid(grid) => grid.is_empty(),
            ChartValues::Averages(times) => times.is_empty(),
            ChartValues::Monthly(series) => series.is_empty(),
        }
    }

    /// One-line caption shown under the chart.
    pub fn summary(&self) -> String {
        match &self.values {
            ChartValues::Grid(grid) => format!(
                "{} issues across {} categories",
                grid.total(),
                grid.row_labels().len()
            ),
            ChartValues::Averages(times) => {
                let solved: usize = times.entries().iter().map(|e| e.count).sum();
                format!("{} solved issues with a recorded time", solved)
            }
            ChartValues::Monthly(series) => {
                let total: u32 = series.points().iter().map(|(_, count)| count).sum();
                format!("{} issues over {} months", total, series.points().len())
            }
        }
    }
}
