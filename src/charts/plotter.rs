//! Chart Plotter Module
//! Draws interactive charts with egui_plot.

use crate::charts::{category_label, ChartData, ChartValues, BAR_WIDTH, PALETTE};
use crate::data::{CountGrid, MonthlySeries, ResolutionTimes, YearMonth};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

const MIN_PLOT_HEIGHT: f32 = 300.0;

/// Draws issue charts inside an egui `Ui`.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the series at `index`.
    pub fn series_color(index: usize) -> Color32 {
        let (r, g, b) = PALETTE[index % PALETTE.len()];
        Color32::from_rgb(r, g, b)
    }

    /// Draw title and plot for a chart.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(chart.kind.title()).size(18.0).strong());
        });
        ui.add_space(8.0);

        match &chart.values {
            ChartValues::Grid(grid) => Self::draw_stacked_bars(ui, chart, grid),
            ChartValues::Averages(times) => Self::draw_bars(ui, chart, times),
            ChartValues::Monthly(series) => Self::draw_line(ui, chart, series),
        }
    }

    /// Stacked bars: one bar per row label, one stacked segment per column label.
    fn draw_stacked_bars(ui: &mut egui::Ui, chart: &ChartData, grid: &CountGrid) {
        let labels = grid.row_labels().to_vec();
        let height = ui.available_height().max(MIN_PLOT_HEIGHT);

        Plot::new(format!("stacked_{}", chart.kind.slug()))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(chart.kind.x_label())
            .y_axis_label(chart.kind.y_label())
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                let mut stacked: Vec<BarChart> = Vec::new();

                for (j, status) in grid.column_labels().iter().enumerate() {
                    let bars: Vec<Bar> = grid
                        .column_values(j)
                        .into_iter()
                        .enumerate()
                        .map(|(i, count)| {
                            Bar::new(i as f64, count as f64)
                                .width(BAR_WIDTH)
                                .name(&grid.row_labels()[i])
                        })
                        .collect();

                    let segment = {
                        let below: Vec<&BarChart> = stacked.iter().collect();
                        BarChart::new(bars)
                            .name(status)
                            .color(Self::series_color(j))
                            .stack_on(&below)
                    };
                    stacked.push(segment);
                }

                for segment in stacked {
                    plot_ui.bar_chart(segment);
                }
            });
    }

    fn draw_bars(ui: &mut egui::Ui, chart: &ChartData, times: &ResolutionTimes) {
        let labels: Vec<String> = times.entries().iter().map(|e| e.label.clone()).collect();
        let height = ui.available_height().max(MIN_PLOT_HEIGHT);

        Plot::new(format!("bars_{}", chart.kind.slug()))
            .height(height)
            .allow_scroll(false)
            .x_axis_label(chart.kind.x_label())
            .y_axis_label(chart.kind.y_label())
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = times
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(i, stat)| {
                        Bar::new(i as f64, stat.mean)
                            .width(BAR_WIDTH)
                            .name(format!("{} (n={})", stat.label, stat.count))
                    })
                    .collect();

                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(chart.kind.y_label())
                        .color(Self::series_color(0)),
                );
            });
    }

    /// Line with markers. X is the month ordinal, so missing months show as gaps in spacing.
    fn draw_line(ui: &mut egui::Ui, chart: &ChartData, series: &MonthlySeries) {
        let height = ui.available_height().max(MIN_PLOT_HEIGHT);
        let color = Self::series_color(0);
        let points: Vec<[f64; 2]> = series
            .points()
            .iter()
            .map(|(month, count)| [month.ordinal() as f64, *count as f64])
            .collect();

        Plot::new(format!("line_{}", chart.kind.slug()))
            .height(height)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(chart.kind.x_label())
            .y_axis_label(chart.kind.y_label())
            .x_axis_formatter(|mark, _range| {
                let rounded = mark.value.round();
                if (mark.value - rounded).abs() > 1e-6 {
                    String::new()
                } else {
                    YearMonth::from_ordinal(rounded as i64).to_string()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(color)
                        .width(2.0)
                        .name(chart.kind.y_label()),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(color),
                );
            });
    }
}
