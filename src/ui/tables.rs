use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::profile::{MissingReport, Summary};
use crate::pipeline::Analysis;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Dataset overview – shape and first rows
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, analysis: &Analysis) {
    ui.heading("Dataset Overview");
    let (rows, cols) = analysis.shape;
    ui.label(format!("Shape of dataset: ({rows}, {cols})"));
    ui.add_space(4.0);

    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto())
            .columns(Column::auto().at_least(60.0), analysis.columns.len())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for col in &analysis.columns {
                    header.col(|ui| {
                        ui.strong(&col.name).on_hover_text(col.kind.to_string());
                    });
                }
            })
            .body(|mut body| {
                for (idx, row) in analysis.preview.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui| {
                            ui.label(idx.to_string());
                        });
                        for cell in row {
                            table_row.col(|ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}

pub fn summary(ui: &mut Ui, summary: &Summary) {
    ui.heading("Summary Statistics");
    if summary.is_empty() {
        ui.label("No numeric columns to describe.");
        return;
    }

    const STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    ui.push_id("summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto())
            .columns(Column::auto().at_least(70.0), summary.len())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|_| {});
                for s in summary.iter() {
                    header.col(|ui| {
                        ui.strong(&s.column);
                    });
                }
            })
            .body(|mut body| {
                for (stat_idx, stat) in STATS.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.strong(*stat);
                        });
                        for s in summary.iter() {
                            let text = match stat_idx {
                                0 => s.count.to_string(),
                                1 => fmt_stat(s.mean),
                                2 => s.std.map_or_else(|| "NaN".to_string(), fmt_stat),
                                3 => fmt_stat(s.min),
                                4 => fmt_stat(s.q25),
                                5 => fmt_stat(s.q50),
                                6 => fmt_stat(s.q75),
                                _ => fmt_stat(s.max),
                            };
                            row.col(|ui| {
                                ui.label(text);
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Missing values
// ---------------------------------------------------------------------------

pub fn missing(ui: &mut Ui, report: &MissingReport) {
    ui.heading("Missing Values");
    let total = report.total();
    if total == 0 {
        ui.label("No missing values.");
    } else {
        ui.label(
            RichText::new(format!("{total} missing cells across {} columns", report.len()))
                .color(egui::Color32::YELLOW),
        );
    }

    ui.push_id("missing_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(120.0))
            .column(Column::auto())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("column");
                });
                header.col(|ui| {
                    ui.strong("missing");
                });
            })
            .body(|mut body| {
                for (name, count) in report.iter() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(name);
                        });
                        row.col(|ui| {
                            ui.label(count.to_string());
                        });
                    });
                }
            });
    });
}
