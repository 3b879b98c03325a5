//! Chart Viewer Widget
//! Central panel showing the current chart.

use crate::charts::{ChartData, ChartPlotter};
use egui::{Color32, RichText};

/// Holds and draws the chart currently on screen.
#[derive(Default)]
pub struct ChartViewer {
    pub chart: Option<ChartData>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.chart = None;
    }

    pub fn set_chart(&mut self, chart: ChartData) {
        self.chart = Some(chart);
    }

    pub fn show(&self, ui: &mut egui::Ui, file_loaded: bool) {
        let Some(chart) = &self.chart else {
            let hint = if file_loaded {
                "Choose a chart from the panel"
            } else {
                "Select a CSV file to begin"
            };
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(hint).size(16.0).color(Color32::GRAY));
            });
            return;
        };

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(chart.summary()).size(11.0).color(Color32::GRAY));
                ui.add_space(4.0);
                ChartPlotter::draw_chart(ui, chart);
            });
    }
}
