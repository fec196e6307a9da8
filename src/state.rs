use std::path::Path;

use crate::color::SeriesColors;
use crate::data::loader;
use crate::data::model::Table;
use crate::pipeline::{analyze, Analysis, Selection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Current table (None until a file loads successfully).
    pub table: Option<Table>,

    /// Name of the file the table came from.
    pub file_name: Option<String>,

    /// Selector choices for histogram and scatter.
    pub selection: Selection,

    /// Result of the last pipeline run over `table`.
    pub analysis: Option<Analysis>,

    /// One colour per numeric column for the line chart.
    pub series_colors: Option<SeriesColors>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Replace the session with a newly loaded table and run the pipeline.
    pub fn set_table(&mut self, table: Table, file_name: String) {
        self.selection = Selection::default();
        self.table = Some(table);
        self.file_name = Some(file_name);
        self.status_message = None;
        self.rerun();
    }

    /// Drop the table and everything derived from it.
    pub fn clear(&mut self) {
        self.table = None;
        self.file_name = None;
        self.analysis = None;
        self.series_colors = None;
        self.selection = Selection::default();
    }

    /// Full re-run of the pipeline against the current table.
    pub fn rerun(&mut self) {
        let Some(table) = &self.table else {
            self.analysis = None;
            self.series_colors = None;
            return;
        };

        match analyze(table, &self.selection) {
            Ok(analysis) => {
                self.series_colors = Some(SeriesColors::new(analysis.numeric.as_slice()));
                self.analysis = Some(analysis);
            }
            Err(e) => {
                log::error!("Analysis failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.analysis = None;
                self.series_colors = None;
            }
        }
    }

    pub fn set_histogram_column(&mut self, column: String) {
        self.selection.histogram = Some(column);
        self.rerun();
    }

    pub fn set_scatter_x(&mut self, column: String) {
        self.selection.scatter_x = Some(column);
        self.rerun();
    }

    pub fn set_scatter_y(&mut self, column: String) {
        self.selection.scatter_y = Some(column);
        self.rerun();
    }

    /// Load a file from disk. Any failure discards the previous table too.
    pub fn load_path(&mut self, path: &Path) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match loader::load_path(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {file_name}: {} rows, columns {:?}",
                    table.row_count(),
                    table.column_names()
                );
                self.set_table(table, file_name);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.clear();
                self.status_message = Some(format!("Error reading file: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Charts;
    use eframe::egui::Color32;

    fn state_with(csv: &str) -> AppState {
        let mut state = AppState::default();
        let table = loader::load(csv.as_bytes(), "t.csv").unwrap();
        state.set_table(table, "t.csv".into());
        state
    }

    #[test]
    fn test_selection_change_reruns_pipeline() {
        let mut state = state_with("a,b\n1,2\n2,4\n3,7\n");
        state.set_histogram_column("b".into());
        let analysis = state.analysis.as_ref().unwrap();
        match &analysis.charts {
            Charts::Rendered { histogram, .. } => assert_eq!(histogram.column, "b"),
            Charts::Advisory(_) => panic!("expected charts"),
        }
        let colors = state.series_colors.as_ref().unwrap();
        assert_ne!(colors.color_for("a"), colors.color_for("b"));
        assert_eq!(colors.color_for("gone"), Color32::LIGHT_BLUE);
    }

    #[test]
    fn test_failed_load_discards_previous_table() {
        let mut state = state_with("a\n1\n");
        state.load_path(Path::new("/definitely/not/here.csv"));
        assert!(state.table.is_none());
        assert!(state.analysis.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn test_new_table_resets_selection() {
        let mut state = state_with("a,b\n1,2\n");
        state.set_scatter_y("b".into());
        let table = loader::load(b"c\n5\n", "u.csv").unwrap();
        state.set_table(table, "u.csv".into());
        assert_eq!(state.selection, Selection::default());
        assert_eq!(state.file_name.as_deref(), Some("u.csv"));
    }
}
