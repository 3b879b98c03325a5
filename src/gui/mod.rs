//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::IssueChartsApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction, StatusLevel};
