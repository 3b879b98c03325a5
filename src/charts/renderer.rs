//! Static Chart Renderer
//! Draws a chart to a PNG file with plotters.

use crate::charts::{
    category_label, ChartData, ChartKind, ChartStyle, ChartValues, BAR_WIDTH, PALETTE,
};
use crate::data::{CountGrid, MonthlySeries, ResolutionTimes, YearMonth};
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 28);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn series_color(index: usize) -> RGBColor {
        let (r, g, b) = PALETTE[index % PALETTE.len()];
        RGBColor(r, g, b)
    }

    /// Upper bound for the value axis, with headroom above the tallest value.
    pub fn axis_max(values: impl IntoIterator<Item = f64>) -> f64 {
        let max = values.into_iter().fold(0.0, f64::max);
        if max <= 0.0 {
            1.0
        } else {
            max * 1.1
        }
    }

    /// Render `chart` to a PNG at `path`.
    pub fn render_png(chart: &ChartData, path: &Path, size: (u32, u32)) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        match (chart.kind.style(), &chart.values) {
            (ChartStyle::StackedBar, ChartValues::Grid(grid)) => {
                Self::draw_stacked(&root, chart.kind, grid)?
            }
            (ChartStyle::Bar, ChartValues::Averages(times)) => {
                Self::draw_bars(&root, chart.kind, times)?
            }
            (ChartStyle::LineWithMarkers, ChartValues::Monthly(series)) => {
                Self::draw_line(&root, chart.kind, series)?
            }
            (style, _) => anyhow::bail!("{:?} cannot draw the data of {}", style, chart.kind.slug()),
        }

        root.present()?;
        tracing::info!(path = %path.display(), chart = chart.kind.slug(), "rendered chart image");
        Ok(())
    }

    fn draw_stacked(root: &Canvas<'_>, kind: ChartKind, grid: &CountGrid) -> Result<()> {
        let labels = grid.row_labels();
        let n = labels.len();
        let y_max = Self::axis_max(grid.row_totals().into_iter().map(f64::from));
        let half = BAR_WIDTH / 2.0;

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..n as f64 - 0.5, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n + 1)
            .x_label_formatter(&|x| category_label(labels, *x))
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .draw()?;

        let mut bottoms = vec![0f64; n];
        for (j, column) in grid.column_labels().iter().enumerate() {
            let color = Self::series_color(j);
            let mut segments = Vec::with_capacity(n);
            for (i, count) in grid.column_values(j).into_iter().enumerate() {
                let y0 = bottoms[i];
                bottoms[i] += f64::from(count);
                let x = i as f64;
                segments.push(Rectangle::new(
                    [(x - half, y0), (x + half, bottoms[i])],
                    color.filled(),
                ));
            }

            chart
                .draw_series(segments)?
                .label(column.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_bars(root: &Canvas<'_>, kind: ChartKind, times: &ResolutionTimes) -> Result<()> {
        let labels: Vec<String> = times.entries().iter().map(|e| e.label.clone()).collect();
        let n = labels.len();
        let y_max = Self::axis_max(times.entries().iter().map(|e| e.mean));
        let half = BAR_WIDTH / 2.0;
        let color = Self::series_color(0);

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..n as f64 - 0.5, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n + 1)
            .x_label_formatter(&|x| category_label(&labels, *x))
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .draw()?;

        chart.draw_series(times.entries().iter().enumerate().map(|(i, stat)| {
            let x = i as f64;
            Rectangle::new([(x - half, 0.0), (x + half, stat.mean)], color.filled())
        }))?;
        Ok(())
    }

    fn draw_line(root: &Canvas<'_>, kind: ChartKind, series: &MonthlySeries) -> Result<()> {
        let points: Vec<(f64, f64)> = series
            .points()
            .iter()
            .map(|(month, count)| (month.ordinal() as f64, f64::from(*count)))
            .collect();
        let first = points.first().map(|p| p.0).unwrap_or(0.0);
        let last = points.last().map(|p| p.0).unwrap_or(0.0);
        let y_max = Self::axis_max(points.iter().map(|p| p.1));
        let color = Self::series_color(0);
        let month_count = (last - first) as usize + 1;

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), CAPTION_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(first - 0.5..last + 0.5, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_labels(month_count.min(24) + 1)
            .x_label_formatter(&|x| {
                let rounded = x.round();
                if (x - rounded).abs() > 1e-6 {
                    String::new()
                } else {
                    YearMonth::from_ordinal(rounded as i64).to_string()
                }
            })
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .draw()?;

        chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 5, color.filled())),
        )?;
        Ok(())
    }
}
