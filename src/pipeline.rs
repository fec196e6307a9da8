use serde::Serialize;

use crate::data::model::{CellValue, ColumnKind, Table};
use crate::data::planner::{
    self, ChartOffer, CorrelationMatrix, HistogramData, LineData, ScatterData,
};
use crate::data::profile::{self, MissingReport, Summary};
use crate::data::schema::{self, NumericColumnSet};
use crate::error::{ProfileError, Result};

/// Rows shown in the dataset preview.
pub const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Selection – the user's column choices
// ---------------------------------------------------------------------------

/// Columns picked in the selectors. `None` (or a stale name) means the
/// first numeric column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub histogram: Option<String>,
    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,
}

fn resolve(choice: &Option<String>, numeric: &NumericColumnSet) -> Option<String> {
    choice
        .as_deref()
        .filter(|c| numeric.contains(c))
        .or_else(|| numeric.first())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Analysis – everything the presentation layer displays
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Charts {
    /// No numeric columns: nothing was computed.
    Advisory(String),
    Rendered {
        histogram: HistogramData,
        scatter: ScatterData,
        line: LineData,
        heatmap: CorrelationMatrix,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub shape: (usize, usize),
    pub columns: Vec<ColumnInfo>,
    pub preview: Vec<Vec<CellValue>>,
    pub numeric: NumericColumnSet,
    pub summary: Summary,
    pub missing: MissingReport,
    pub charts: Charts,
}

#[derive(Serialize)]
struct Report<'a> {
    rows: usize,
    columns: usize,
    column_types: &'a [ColumnInfo],
    numeric_columns: &'a NumericColumnSet,
    summary: &'a Summary,
    missing: Vec<MissingEntry<'a>>,
    correlation: Option<&'a CorrelationMatrix>,
}

#[derive(Serialize)]
struct MissingEntry<'a> {
    column: &'a str,
    missing: usize,
}

impl Analysis {
    /// Profile as pretty JSON (shape, types, summary, missing, correlation).
    pub fn to_json(&self) -> serde_json::Result<String> {
        let correlation = match &self.charts {
            Charts::Rendered { heatmap, .. } => Some(heatmap),
            Charts::Advisory(_) => None,
        };
        let report = Report {
            rows: self.shape.0,
            columns: self.shape.1,
            column_types: &self.columns,
            numeric_columns: &self.numeric,
            summary: &self.summary,
            missing: self
                .missing
                .iter()
                .map(|(column, missing)| MissingEntry { column, missing })
                .collect(),
            correlation,
        };
        serde_json::to_string_pretty(&report)
    }
}

/// Run the whole pipeline against the current table.
///
/// Each interaction calls this again from scratch; nothing is cached.
pub fn analyze(table: &Table, selection: &Selection) -> Result<Analysis> {
    let shape = schema::shape(table);
    let numeric = schema::numeric_columns(table);
    let summary = profile::summarize(table, &numeric)?;
    let missing = profile::missing_report(table)?;

    let charts = match planner::offered_charts(&numeric) {
        ChartOffer::NoNumericColumns { advisory } => Charts::Advisory(advisory.to_string()),
        ChartOffer::Available(kinds) => {
            log::debug!(
                "Planning {} charts over {} numeric columns",
                kinds.len(),
                numeric.len()
            );
            build_charts(table, &numeric, selection)?
        }
    };

    Ok(Analysis {
        shape,
        columns: table
            .columns()
            .iter()
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                kind: c.kind,
            })
            .collect(),
        preview: table.head(PREVIEW_ROWS),
        numeric,
        summary,
        missing,
        charts,
    })
}

fn build_charts(table: &Table, numeric: &NumericColumnSet, selection: &Selection) -> Result<Charts> {
    let missing_default = || ProfileError::Invariant("numeric column set is empty".into());
    let hist_col = resolve(&selection.histogram, numeric).ok_or_else(missing_default)?;
    let x = resolve(&selection.scatter_x, numeric).ok_or_else(missing_default)?;
    let y = resolve(&selection.scatter_y, numeric).ok_or_else(missing_default)?;

    Ok(Charts::Rendered {
        histogram: planner::histogram(table, numeric, &hist_col)?,
        scatter: planner::scatter(table, numeric, &x, &y)?,
        line: planner::line_chart(table, numeric)?,
        heatmap: planner::correlation(table, numeric)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;

    #[test]
    fn test_defaults_to_first_numeric_column() {
        let table = load(b"name,a,b\nx,1,2\ny,3,4\n", "x.csv").unwrap();
        let analysis = analyze(&table, &Selection::default()).unwrap();

        assert_eq!(analysis.shape, (2, 3));
        match analysis.charts {
            Charts::Rendered {
                histogram, scatter, ..
            } => {
                assert_eq!(histogram.column, "a");
                assert_eq!(scatter.x, "a");
                assert_eq!(scatter.y, "a");
            }
            Charts::Advisory(msg) => panic!("unexpected advisory: {msg}"),
        }
    }

    #[test]
    fn test_selection_is_honoured_and_stale_names_fall_back() {
        let table = load(b"a,b\n1,2\n3,5\n", "x.csv").unwrap();
        let selection = Selection {
            histogram: Some("b".into()),
            scatter_x: Some("gone".into()),
            scatter_y: Some("b".into()),
        };
        let analysis = analyze(&table, &selection).unwrap();
        let Charts::Rendered {
            histogram, scatter, ..
        } = analysis.charts
        else {
            panic!("expected charts");
        };
        assert_eq!(histogram.column, "b");
        assert_eq!(scatter.x, "a");
        assert_eq!(scatter.y, "b");
    }

    #[test]
    fn test_no_numeric_columns_yields_advisory_only() {
        let table = load(b"name,city\nann,rome\nbob,oslo\n", "x.csv").unwrap();
        let analysis = analyze(&table, &Selection::default()).unwrap();
        assert_eq!(
            analysis.charts,
            Charts::Advisory(planner::NO_NUMERIC_ADVISORY.to_string())
        );
        assert!(analysis.summary.is_empty());
        assert_eq!(analysis.missing.len(), 2);
    }

    #[test]
    fn test_rendered_charts_cover_every_numeric_column() {
        let table = load(b"t,a,b\nx,1,2\ny,2,4\nz,,5\n", "x.csv").unwrap();
        let analysis = analyze(&table, &Selection::default()).unwrap();
        let Charts::Rendered { line, heatmap, .. } = analysis.charts else {
            panic!("expected charts");
        };
        assert_eq!(line.series, analysis.numeric);
        assert_eq!(line.row_count(), 3);
        assert_eq!(heatmap.size(), 2);
        assert_eq!(heatmap.columns, analysis.numeric);
    }

    #[test]
    fn test_preview_is_capped() {
        let csv: String = std::iter::once("n\n".to_string())
            .chain((0..20).map(|i| format!("{i}\n")))
            .collect();
        let table = load(csv.as_bytes(), "x.csv").unwrap();
        let analysis = analyze(&table, &Selection::default()).unwrap();
        assert_eq!(analysis.preview.len(), PREVIEW_ROWS);
        assert_eq!(analysis.shape.0, 20);
    }

    #[test]
    fn test_report_json_lists_profile() {
        let table = load(b"a,b\n1,2\n3,4\n,6\n", "data.csv").unwrap();
        let analysis = analyze(&table, &Selection::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&analysis.to_json().unwrap()).unwrap();

        assert_eq!(json["rows"], 3);
        assert_eq!(json["columns"], 2);
        assert_eq!(json["missing"][0]["column"], "a");
        assert_eq!(json["missing"][0]["missing"], 1);
        assert_eq!(json["summary"][1]["mean"], 4.0);
        assert_eq!(json["column_types"][0]["kind"], "integer");
        assert_eq!(json["correlation"]["values"][0][0], 1.0);
    }
}
