//! Issue Charts - CSV Issue Report Visualization
//!
//! Loads a CSV of reported issues and shows one of four aggregate charts.

mod charts;
mod config;
mod data;
mod gui;
mod session;

use config::AppConfig;
use eframe::egui;
use gui::IssueChartsApp;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> eframe::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = AppConfig::discover().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default config");
        AppConfig::default()
    });

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("CSV Data Visualization Tool"),
        ..Default::default()
    };

    tracing::info!("starting ui");
    eframe::run_native(
        "Issue Charts",
        options,
        Box::new(move |cc| Ok(Box::new(IssueChartsApp::new(cc, config)))),
    )
}
