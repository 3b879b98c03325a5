//! Issue Charts Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{export_csv, ChartKind, StaticChartRenderer};
use crate::config::AppConfig;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, StatusLevel};
use crate::session::{ChartError, Session};
use egui::SidePanel;
use std::path::PathBuf;

/// Message shown in a dismissible window.
struct Notice {
    title: &'static str,
    message: String,
}

/// Main application window.
pub struct IssueChartsApp {
    config: AppConfig,
    session: Session,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    notice: Option<Notice>,
}

impl IssueChartsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self {
            session: Session::new(&config),
            config,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            notice: None,
        }
    }

    fn notify(&mut self, title: &'static str, message: String) {
        self.notice = Some(Notice { title, message });
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Select CSV File")
            .add_filter("CSV files", &["csv"])
            .add_filter("All files", &["*"])
            .pick_file()
        else {
            return;
        };

        match self.session.load(&path) {
            Ok(()) => {
                self.chart_viewer.clear();
                match self.session.table() {
                    Some(table) if !table.is_empty() => {
                        let status = format!("Loaded {} issues", table.len());
                        self.control_panel.set_status(StatusLevel::Success, &status);
                    }
                    _ => self
                        .control_panel
                        .set_status(StatusLevel::Warning, "File has no issue rows"),
                }
            }
            Err(e) => {
                self.control_panel
                    .set_status(StatusLevel::Error, "Error loading file");
                self.notify("Error", format!("Failed to load CSV file:\n{}", e));
            }
        }
    }

    fn handle_show_chart(&mut self, kind: ChartKind) {
        match self.session.chart(kind) {
            Ok(chart) => {
                self.chart_viewer.set_chart(chart);
                self.control_panel
                    .set_status(StatusLevel::Info, kind.title());
            }
            Err(ChartError::NoData(warning)) => {
                self.control_panel
                    .set_status(StatusLevel::Warning, &warning.message);
                self.notify("Warning", warning.message);
            }
            Err(e) => {
                tracing::error!(chart = kind.slug(), error = %e, "chart failed");
                self.control_panel.set_status(StatusLevel::Error, "Chart failed");
                self.notify("Error", e.to_string());
            }
        }
    }

    /// Ask for an output path with the chart's default file name.
    fn pick_export_path(kind: ChartKind, extension: &str, filter: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter, &[extension])
            .set_file_name(format!("{}.{}", kind.slug(), extension))
            .save_file()
    }

    fn handle_export_png(&mut self) {
        let Some(chart) = &self.chart_viewer.chart else {
            return;
        };
        let Some(path) = Self::pick_export_path(chart.kind, "png", "PNG image") else {
            return;
        };

        let size = (self.config.render.width, self.config.render.height);
        match StaticChartRenderer::render_png(chart, &path, size) {
            Ok(()) => {
                self.control_panel.set_status(
                    StatusLevel::Success,
                    &format!("Saved {}", path.display()),
                );
                self.control_panel.last_export = Some(path);
            }
            Err(e) => {
                tracing::error!(error = %e, "png export failed");
                self.control_panel.set_status(StatusLevel::Error, "Export failed");
                self.notify("Error", format!("Failed to save chart image:\n{:#}", e));
            }
        }
    }

    fn handle_export_csv(&mut self) {
        let Some(chart) = &self.chart_viewer.chart else {
            return;
        };
        let Some(path) = Self::pick_export_path(chart.kind, "csv", "CSV files") else {
            return;
        };

        match export_csv(chart, &path) {
            Ok(()) => {
                self.control_panel.set_status(
                    StatusLevel::Success,
                    &format!("Saved {}", path.display()),
                );
                self.control_panel.last_export = Some(path);
            }
            Err(e) => {
                tracing::error!(error = %e, "csv export failed");
                self.control_panel.set_status(StatusLevel::Error, "Export failed");
                self.notify("Error", format!("Failed to save chart data:\n{}", e));
            }
        }
    }

    fn handle_open_export(&mut self) {
        let Some(path) = self.control_panel.last_export.clone() else {
            return;
        };
        if let Err(e) = open::that(&path) {
            tracing::warn!(path = %path.display(), error = %e, "could not open export");
            self.control_panel
                .set_status(StatusLevel::Error, &format!("Cannot open {}", path.display()));
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notice.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notice.message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for IssueChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let has_chart = self.chart_viewer.chart.is_some();
                    let action = self.control_panel.show(ui, &self.session, has_chart);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::ShowChart(kind) => self.handle_show_chart(kind),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::ExportCsv => self.handle_export_csv(),
                        ControlPanelAction::OpenExport => self.handle_open_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.session.is_loaded());
        });

        self.show_notice(ctx);
    }
}
