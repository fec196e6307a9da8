use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{coolwarm, label_color, SeriesColors};
use crate::data::planner::{CorrelationMatrix, HistogramData, LineData, ScatterData};
use crate::pipeline::{Analysis, Charts};

const PLOT_HEIGHT: f32 = 280.0;
const HEATMAP_CELL: f32 = 60.0;
const HEATMAP_LABEL_WIDTH: f32 = 110.0;
const HEATMAP_HEADER_HEIGHT: f32 = 22.0;

// ---------------------------------------------------------------------------
// Chart section (central panel)
// ---------------------------------------------------------------------------

/// Render every chart, or the advisory when nothing numeric exists.
pub fn charts(ui: &mut Ui, analysis: &Analysis, colors: Option<&SeriesColors>) {
    ui.heading("Data Visualization");

    let (histogram, scatter, line, heatmap) = match &analysis.charts {
        Charts::Advisory(msg) => {
            ui.label(egui::RichText::new(msg).color(Color32::YELLOW));
            return;
        }
        Charts::Rendered {
            histogram,
            scatter,
            line,
            heatmap,
        } => (histogram, scatter, line, heatmap),
    };

    histogram_plot(ui, histogram);
    ui.add_space(12.0);
    scatter_plot(ui, scatter);
    ui.add_space(12.0);
    line_plot(ui, line, colors);
    ui.add_space(12.0);

    ui.heading("Correlation Heatmap");
    correlation_heatmap(ui, heatmap);
}

// ---------------------------------------------------------------------------
// Histogram with density overlay
// ---------------------------------------------------------------------------

fn histogram_plot(ui: &mut Ui, data: &HistogramData) {
    ui.strong(format!("Histogram of {}", data.column));

    let width = data.bins.bin_width();
    let bars: Vec<Bar> = data
        .bins
        .centers()
        .into_iter()
        .zip(&data.bins.counts)
        .map(|(center, &count)| Bar::new(center, count as f64).width(width))
        .collect();

    Plot::new("histogram_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(data.column.as_str())
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("count")
                    .color(Color32::from_rgb(76, 114, 176)),
            );

            if let Some(kde) = &data.kde {
                let points: PlotPoints = kde
                    .grid
                    .iter()
                    .zip(&kde.scaled)
                    .map(|(&x, &y)| [x, y])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name("density")
                        .color(Color32::from_rgb(221, 132, 82))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn scatter_plot(ui: &mut Ui, data: &ScatterData) {
    ui.strong(format!("{} vs {}", data.y, data.x));

    let points: PlotPoints = data.points.iter().copied().collect();
    Plot::new("scatter_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label(data.x.as_str())
        .y_axis_label(data.y.as_str())
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(3.0)
                    .color(Color32::from_rgb(76, 114, 176)),
            );
        });
}

// ---------------------------------------------------------------------------
// Line chart – one series per numeric column against row index
// ---------------------------------------------------------------------------

/// Split a row-aligned series at missing cells.
fn segments(values: &[Option<f64>]) -> Vec<Vec<[f64; 2]>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (row, value) in values.iter().enumerate() {
        match value {
            Some(v) => current.push([row as f64, *v]),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn line_plot(ui: &mut Ui, data: &LineData, colors: Option<&SeriesColors>) {
    ui.strong(format!("Line chart ({} rows)", data.row_count()));

    Plot::new("line_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("row")
        .show(ui, |plot_ui| {
            for (name, values) in data.series.iter().zip(&data.columns) {
                let color = colors.map_or(Color32::LIGHT_BLUE, |c| c.color_for(name));
                // Segments share name and colour so the legend shows one entry.
                for segment in segments(values) {
                    if segment.len() == 1 {
                        plot_ui.points(
                            Points::new(PlotPoints::from(segment))
                                .name(name)
                                .color(color)
                                .radius(2.0),
                        );
                    } else {
                        plot_ui.line(
                            Line::new(PlotPoints::from(segment))
                                .name(name)
                                .color(color)
                                .width(1.5),
                        );
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn short_label(name: &str) -> String {
    const MAX: usize = 12;
    if name.chars().count() <= MAX {
        name.to_string()
    } else {
        let head: String = name.chars().take(MAX - 1).collect();
        format!("{head}…")
    }
}

fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.size();
    let names: Vec<&str> = matrix.columns.iter().collect();
    let size = Vec2::new(
        HEATMAP_LABEL_WIDTH + HEATMAP_CELL * n as f32,
        HEATMAP_HEADER_HEIGHT + HEATMAP_CELL * n as f32,
    );

    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let text_color = ui.visuals().text_color();
    let font = FontId::proportional(12.0);

    for (j, name) in names.iter().enumerate() {
        let pos = origin
            + Vec2::new(
                HEATMAP_LABEL_WIDTH + HEATMAP_CELL * (j as f32 + 0.5),
                HEATMAP_HEADER_HEIGHT / 2.0,
            );
        painter.text(pos, Align2::CENTER_CENTER, short_label(name), font.clone(), text_color);
    }

    for (i, row_name) in names.iter().enumerate() {
        let y = HEATMAP_HEADER_HEIGHT + HEATMAP_CELL * i as f32;
        painter.text(
            origin + Vec2::new(HEATMAP_LABEL_WIDTH - 6.0, y + HEATMAP_CELL / 2.0),
            Align2::RIGHT_CENTER,
            short_label(row_name),
            font.clone(),
            text_color,
        );

        for j in 0..n {
            let value = matrix.get(i, j);
            let min = origin + Vec2::new(HEATMAP_LABEL_WIDTH + HEATMAP_CELL * j as f32, y);
            let rect = Rect::from_min_size(min, Vec2::splat(HEATMAP_CELL)).shrink(1.0);
            painter.rect_filled(rect, 0.0, coolwarm(value));

            let label = value.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                label,
                font.clone(),
                label_color(value),
            );
        }
    }
}
