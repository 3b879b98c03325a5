//! Control Panel Widget
//! Left side panel with file selection, chart buttons, export and status.

use crate::charts::ChartKind;
use crate::session::Session;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    fn color(&self) -> Color32 {
        match self {
            StatusLevel::Info => Color32::GRAY,
            StatusLevel::Success => Color32::from_rgb(40, 167, 69),
            StatusLevel::Warning => Color32::from_rgb(230, 160, 30),
            StatusLevel::Error => Color32::from_rgb(220, 53, 69),
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub last_export: Option<PathBuf>,
    pub status: String,
    pub status_level: StatusLevel,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            last_export: None,
            status: "Select a CSV file to begin".to_string(),
            status_level: StatusLevel::Info,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status line text and severity
    pub fn set_status(&mut self, level: StatusLevel, status: &str) {
        self.status_level = level;
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: &Session,
        has_chart: bool,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Issue Charts")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("CSV Data Visualization")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== File Selection =====
        ui.label(RichText::new("📁 File Selection").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = session
                        .table()
                        .and_then(|t| t.source())
                        .and_then(|p| p.file_name())
                        .map(|n| format!("Loaded: {}", n.to_string_lossy()))
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if session.is_loaded() {
                            Color32::from_rgb(40, 167, 69)
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });

                if let Some(table) = session.table() {
                    ui.label(
                        RichText::new(format!("{} issues", table.len()))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Options =====
        ui.label(RichText::new("📈 Chart Options").size(14.0).strong());
        ui.add_space(8.0);

        ui.vertical_centered_justified(|ui| {
            for kind in ChartKind::ALL {
                let enabled = session.can_chart(kind);
                let response = ui.add_enabled(
                    enabled,
                    egui::Button::new(kind.button_label()).min_size(egui::vec2(200.0, 30.0)),
                );
                let response = if session.is_loaded() {
                    response.on_disabled_hover_text("Required columns are missing from this file")
                } else {
                    response
                };
                if response.clicked() {
                    action = ControlPanelAction::ShowChart(kind);
                }
                ui.add_space(4.0);
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.label(RichText::new("💾 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_enabled_ui(has_chart, |ui| {
                if ui.button("🖼 PNG").clicked() {
                    action = ControlPanelAction::ExportPng;
                }
                if ui.button("📄 CSV").clicked() {
                    action = ControlPanelAction::ExportCsv;
                }
            });
            ui.add_enabled_ui(self.last_export.is_some(), |ui| {
                if ui.button("Open last export").clicked() {
                    action = ControlPanelAction::OpenExport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        ui.label(RichText::new("ℹ Status").size(14.0).strong());
        ui.add_space(5.0);
        ui.label(
            RichText::new(&self.status)
                .size(11.0)
                .color(self.status_level.color()),
        );

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    ShowChart(ChartKind),
    ExportPng,
    ExportCsv,
    OpenExport,
}
