//! Data module - CSV loading, typed table and aggregation

mod aggregate;
mod loader;
mod table;

pub use aggregate::{
    AggregationError, Aggregator, CountGrid, MonthlySeries, ResolutionTimes,
};
pub use loader::{LoadError, TableLoader};
pub use table::{ColumnRole, IssueRecord, IssueTable, Schema, YearMonth};
