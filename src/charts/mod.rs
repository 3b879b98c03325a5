//! Charts module - Chart definitions, rendering and export

mod chart;
mod export;
mod plotter;
mod renderer;

pub use chart::{ChartData, ChartKind, ChartStyle, ChartValues};
pub use export::export_csv;
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;

/// Series colors (RGB), shared by the interactive and static renderers.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (121, 85, 72),   // Brown
    (96, 125, 139),  // Blue Grey
];

/// Bar width in category units.
pub const BAR_WIDTH: f64 = 0.6;

/// Label for a category axis position, empty between categories.
pub fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}
