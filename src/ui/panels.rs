use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::loader::SPREADSHEET_EXTENSIONS;
use crate::pipeline::Charts;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – column selectors
// ---------------------------------------------------------------------------

/// Which selector changed this frame.
enum Pick {
    Histogram(String),
    ScatterX(String),
    ScatterY(String),
}

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Visualization");
    ui.separator();

    let Some(analysis) = &state.analysis else {
        ui.label("No dataset loaded.");
        return;
    };

    let (hist_col, x_col, y_col) = match &analysis.charts {
        Charts::Advisory(msg) => {
            ui.label(RichText::new(msg).color(Color32::YELLOW));
            return;
        }
        Charts::Rendered {
            histogram, scatter, ..
        } => (
            histogram.column.clone(),
            scatter.x.clone(),
            scatter.y.clone(),
        ),
    };

    let columns = analysis.numeric.as_slice().to_vec();
    let mut pick = None;

    ui.strong("Histogram column");
    column_combo(ui, "hist_column", &hist_col, &columns, |c| {
        pick = Some(Pick::Histogram(c))
    });
    ui.add_space(8.0);

    ui.strong("Scatter X axis");
    column_combo(ui, "scatter_x", &x_col, &columns, |c| {
        pick = Some(Pick::ScatterX(c))
    });
    ui.strong("Scatter Y axis");
    column_combo(ui, "scatter_y", &y_col, &columns, |c| {
        pick = Some(Pick::ScatterY(c))
    });

    // Apply after rendering so the analysis borrow has ended.
    match pick {
        Some(Pick::Histogram(c)) => state.set_histogram_column(c),
        Some(Pick::ScatterX(c)) => state.set_scatter_x(c),
        Some(Pick::ScatterY(c)) => state.set_scatter_y(c),
        None => {}
    }
}

fn column_combo(
    ui: &mut Ui,
    id: &str,
    current: &str,
    columns: &[String],
    mut on_pick: impl FnMut(String),
) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                if ui.selectable_label(current == col, col).clicked() && current != col {
                    on_pick(col.clone());
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(name), Some(analysis)) = (&state.file_name, &state.analysis) {
            let (rows, cols) = analysis.shape;
            ui.label(format!("{name}: {rows} rows × {cols} columns"));

            if ui.button("Copy report").clicked() {
                match analysis.to_json() {
                    Ok(json) => ui.ctx().copy_text(json),
                    Err(e) => log::error!("Failed to serialize report: {e}"),
                }
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let mut supported = vec!["csv"];
    supported.extend_from_slice(SPREADSHEET_EXTENSIONS);

    let file = rfd::FileDialog::new()
        .set_title("Open a dataset")
        .add_filter("Supported files", supported.as_slice())
        .add_filter("CSV", &["csv"])
        .add_filter("Spreadsheets", SPREADSHEET_EXTENSIONS)
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
