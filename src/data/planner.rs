//! Shapes numeric columns into exactly what each chart needs, so the
//! rendering side only draws.

use std::fmt;

use serde::Serialize;

use super::model::Table;
use super::schema::NumericColumnSet;
use super::stats::{self, Histogram};
use crate::error::{ProfileError, Result};

/// Bins per histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Resolution of the density curve.
pub const KDE_GRID_POINTS: usize = 200;

/// Shown instead of any chart when nothing numeric was found.
pub const NO_NUMERIC_ADVISORY: &str = "no numeric columns available";

// ---------------------------------------------------------------------------
// Chart kinds and offers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Histogram,
    Scatter,
    LineChart,
    CorrelationHeatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Histogram,
        ChartKind::Scatter,
        ChartKind::LineChart,
        ChartKind::CorrelationHeatmap,
    ];
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Histogram => write!(f, "Histogram"),
            ChartKind::Scatter => write!(f, "Scatter plot"),
            ChartKind::LineChart => write!(f, "Line chart"),
            ChartKind::CorrelationHeatmap => write!(f, "Correlation heatmap"),
        }
    }
}

/// Which charts may be offered for a given numeric column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOffer {
    Available(Vec<ChartKind>),
    NoNumericColumns { advisory: &'static str },
}

pub fn offered_charts(numeric: &NumericColumnSet) -> ChartOffer {
    if numeric.is_empty() {
        ChartOffer::NoNumericColumns {
            advisory: NO_NUMERIC_ADVISORY,
        }
    } else {
        ChartOffer::Available(ChartKind::ALL.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Chart payloads
// ---------------------------------------------------------------------------

/// Smoothed density over the data range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    pub bandwidth: f64,
    pub grid: Vec<f64>,
    pub density: Vec<f64>,
    /// `density · n · bin_width`, on the same scale as the bin counts.
    pub scaled: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramData {
    pub column: String,
    pub values: Vec<f64>,
    pub bins: Histogram,
    /// Absent below two values or for a constant column.
    pub kde: Option<DensityCurve>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterData {
    pub x: String,
    pub y: String,
    pub points: Vec<[f64; 2]>,
}

/// Every numeric column against row index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineData {
    pub series: NumericColumnSet,
    /// One row-aligned column per series; `None` is a gap.
    pub columns: Vec<Vec<Option<f64>>>,
}

impl LineData {
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

/// Pearson coefficients over pairwise-complete rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: NumericColumnSet,
    /// Row-major, `n × n`; `None` where the coefficient is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// Planning – one entry point per chart kind
// ---------------------------------------------------------------------------

/// Row-aligned values of a column that must be in the numeric set.
fn numeric_column(table: &Table, numeric: &NumericColumnSet, name: &str) -> Result<Vec<Option<f64>>> {
    if !numeric.contains(name) {
        return Err(ProfileError::ColumnNotNumeric(name.to_string()));
    }
    table
        .numeric_values(name)
        .ok_or_else(|| ProfileError::Invariant(format!("numeric column '{name}' not in table")))
}

fn require_non_empty(numeric: &NumericColumnSet, kind: ChartKind) -> Result<()> {
    if numeric.is_empty() {
        return Err(ProfileError::Invariant(format!(
            "{kind} requested without numeric columns"
        )));
    }
    Ok(())
}

pub fn histogram(table: &Table, numeric: &NumericColumnSet, column: &str) -> Result<HistogramData> {
    let values: Vec<f64> = numeric_column(table, numeric, column)?
        .into_iter()
        .flatten()
        .collect();
    let bins = stats::histogram(&values, HISTOGRAM_BINS);

    let kde = match stats::scott_bandwidth(&values) {
        Some(bandwidth) => {
            let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let (grid, density) = stats::gaussian_kde(&values, bandwidth, lo, hi, KDE_GRID_POINTS);
            let scale = values.len() as f64 * bins.bin_width();
            let scaled = density.iter().map(|d| d * scale).collect();
            Some(DensityCurve {
                bandwidth,
                grid,
                density,
                scaled,
            })
        }
        None => {
            log::debug!("Skipping density for '{column}': fewer than two values or zero spread");
            None
        }
    };

    Ok(HistogramData {
        column: column.to_string(),
        values,
        bins,
        kde,
    })
}

pub fn scatter(table: &Table, numeric: &NumericColumnSet, x: &str, y: &str) -> Result<ScatterData> {
    let xs = numeric_column(table, numeric, x)?;
    let ys = numeric_column(table, numeric, y)?;

    let points = xs
        .iter()
        .zip(&ys)
        .filter_map(|(a, b)| Some([(*a)?, (*b)?]))
        .collect();

    Ok(ScatterData {
        x: x.to_string(),
        y: y.to_string(),
        points,
    })
}

pub fn line_chart(table: &Table, numeric: &NumericColumnSet) -> Result<LineData> {
    require_non_empty(numeric, ChartKind::LineChart)?;
    let columns = numeric
        .iter()
        .map(|name| numeric_column(table, numeric, name))
        .collect::<Result<Vec<_>>>()?;

    Ok(LineData {
        series: numeric.clone(),
        columns,
    })
}

pub fn correlation(table: &Table, numeric: &NumericColumnSet) -> Result<CorrelationMatrix> {
    require_non_empty(numeric, ChartKind::CorrelationHeatmap)?;
    let columns = numeric
        .iter()
        .map(|name| numeric_column(table, numeric, name))
        .collect::<Result<Vec<_>>>()?;

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        values[i][i] = Some(1.0);
        for j in (i + 1)..n {
            // Rows missing on either side drop out of this pair only.
            let (xs, ys): (Vec<f64>, Vec<f64>) = columns[i]
                .iter()
                .zip(&columns[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            let r = stats::pearson(&xs, &ys);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: numeric.clone(),
        values,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
