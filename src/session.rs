//! Session Module
//! Owns the loaded table and answers chart requests against it.

use crate::charts::{ChartData, ChartKind, ChartValues};
use crate::config::AppConfig;
use crate::data::{AggregationError, Aggregator, IssueTable, LoadError, TableLoader};
use std::path::Path;
use thiserror::Error;

/// A chart request produced nothing to draw.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct NoDataWarning {
    pub kind: ChartKind,
    pub message: String,
}

impl NoDataWarning {
    fn for_chart(kind: ChartKind) -> Self {
        let message = match kind {
            ChartKind::AverageResolutionTime => {
                "No solved issues with valid solution times found.".to_string()
            }
            _ => format!("No data to plot for \"{}\".", kind.title()),
        };
        Self { kind, message }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("No file loaded")]
    NoFileLoaded,
    #[error(transparent)]
    NoData(#[from] NoDataWarning),
    #[error("Failed to create chart: {0}")]
    Aggregation(#[from] AggregationError),
}

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    NoFileLoaded,
    FileLoaded(IssueTable),
}

/// Loaded table plus the settings needed to load and aggregate it.
pub struct Session {
    loader: TableLoader,
    resolved_status: String,
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            loader: TableLoader::new(config),
            resolved_status: config.resolved_status.clone(),
            state: SessionState::NoFileLoaded,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn table(&self) -> Option<&IssueTable> {
        match &self.state {
            SessionState::FileLoaded(table) => Some(table),
            SessionState::NoFileLoaded => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.table().is_some()
    }

    /// Load a file, replacing the current table. A failed load leaves the session as it was.
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        let table = self.loader.load_csv(path).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "load failed");
        })?;
        self.state = SessionState::FileLoaded(table);
        Ok(())
    }

    /// Whether the loaded file has every column `kind` needs.
    pub fn can_chart(&self, kind: ChartKind) -> bool {
        self.table().is_some_and(|table| {
            table.schema().missing(kind.required_roles()).next().is_none()
        })
    }

    /// Aggregate the current table for `kind`.
    pub fn chart(&self, kind: ChartKind) -> Result<ChartData, ChartError> {
        let table = self.table().ok_or(ChartError::NoFileLoaded)?;

        let values = match kind {
            ChartKind::IssueCounts => {
                ChartValues::Grid(Aggregator::counts_by_problem_and_status(table)?)
            }
            ChartKind::AverageResolutionTime => ChartValues::Averages(
                Aggregator::average_resolution_time(table, &self.resolved_status)?,
            ),
            ChartKind::IssuesOverTime => ChartValues::Monthly(Aggregator::issues_over_time(table)?),
            ChartKind::IssuesByRegion => {
                ChartValues::Grid(Aggregator::counts_by_region_and_problem(table)?)
            }
        };

        let chart = ChartData { kind, values };
        if chart.is_empty() {
            return Err(NoDataWarning::for_chart(kind).into());
        }

        tracing::debug!(chart = kind.slug(), "chart data ready");
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("issue_charts=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const SAMPLE: &str = "Problema,Estado,TiempoSolucion,Fecha,Comuna\n\
                          Leak,Solucionado,5,2023-01-15,Centro\n\
                          Leak,Solucionado,3,2023-01-28,Norte\n\
                          Leak,Abierto,,03/02/2023,Centro\n";

    #[test]
    fn charts_need_a_loaded_file() {
        let session = Session::default();
        assert!(!session.is_loaded());
        assert!(!session.can_chart(ChartKind::IssueCounts));
        for kind in ChartKind::ALL {
            assert_eq!(session.chart(kind), Err(ChartError::NoFileLoaded));
        }
    }

    #[test]
    fn all_four_charts_from_loaded_file() {
        let file = write_csv(SAMPLE);
        let mut session = Session::default();
        session.load(file.path()).unwrap();
        assert_eq!(session.table().map(|t| t.len()), Some(3));

        let counts = session.chart(ChartKind::IssueCounts).unwrap();
        let ChartValues::Grid(grid) = &counts.values else {
            panic!("expected grid");
        };
        assert_eq!(grid.get("Leak", "Solucionado"), 2);
        assert_eq!(grid.get("Leak", "Abierto"), 1);

        let avg = session.chart(ChartKind::AverageResolutionTime).unwrap();
        let ChartValues::Averages(times) = &avg.values else {
            panic!("expected averages");
        };
        assert_eq!(times.mean_of("Leak"), Some(4.0));

        let over_time = session.chart(ChartKind::IssuesOverTime).unwrap();
        let ChartValues::Monthly(series) = &over_time.values else {
            panic!("expected monthly series");
        };
        let counts: Vec<u32> = series.points().iter().map(|(_, c)| *c).collect();
        assert_eq!(counts, [2, 1]);

        let by_region = session.chart(ChartKind::IssuesByRegion).unwrap();
        let ChartValues::Grid(grid) = &by_region.values else {
            panic!("expected grid");
        };
        assert_eq!(grid.row_labels(), ["Centro", "Norte"]);
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        init_test_logging();
        let good = write_csv(SAMPLE);
        let bad = write_csv("Problema,Estado,TiempoSolucion,Fecha,Comuna\nLeak,Abierto,,31/31/2023,Centro\n");
        let mut session = Session::default();
        session.load(good.path()).unwrap();

        assert!(matches!(
            session.load(bad.path()),
            Err(LoadError::InvalidDate { .. })
        ));
        assert_eq!(session.table().map(|t| t.len()), Some(3));
        assert!(session.chart(ChartKind::IssueCounts).is_ok());
    }

    #[test]
    fn failed_first_load_stays_unloaded() {
        let mut session = Session::default();
        assert!(session.load(Path::new("/no/such/file.csv")).is_err());
        assert!(matches!(session.state(), SessionState::NoFileLoaded));
    }

    #[test]
    fn no_valid_resolution_times_is_a_warning() {
        init_test_logging();
        let file = write_csv(
            "Problema,Estado,TiempoSolucion,Fecha,Comuna\n\
             Leak,Solucionado,abc,2023-01-15,Centro\n\
             Leak,Abierto,4,2023-01-16,Centro\n",
        );
        let mut session = Session::default();
        session.load(file.path()).unwrap();

        match session.chart(ChartKind::AverageResolutionTime) {
            Err(ChartError::NoData(warning)) => {
                assert_eq!(warning.kind, ChartKind::AverageResolutionTime);
                assert_eq!(
                    warning.to_string(),
                    "No solved issues with valid solution times found."
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(session.chart(ChartKind::IssueCounts).is_ok());
    }

    #[test]
    fn empty_table_warns_for_every_chart() {
        let mut session = Session::default();
        session.state = SessionState::FileLoaded(IssueTable::new(
            crate::data::Schema::complete(),
            Vec::new(),
        ));

        for kind in ChartKind::ALL {
            assert!(matches!(session.chart(kind), Err(ChartError::NoData(_))));
        }
    }

    #[test]
    fn missing_column_disables_only_affected_charts() {
        let file = write_csv("Problema,Estado,Fecha\nLeak,Abierto,2023-01-15\n");
        let mut session = Session::default();
        session.load(file.path()).unwrap();

        assert!(session.can_chart(ChartKind::IssueCounts));
        assert!(session.can_chart(ChartKind::IssuesOverTime));
        assert!(!session.can_chart(ChartKind::IssuesByRegion));
        assert!(matches!(
            session.chart(ChartKind::IssuesByRegion),
            Err(ChartError::Aggregation(_))
        ));
    }
}
