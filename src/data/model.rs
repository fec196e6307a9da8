use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{ProfileError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, typed by the loader's coercion pass.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => write!(f, "<NA>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` (numeric cells only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// A NaN float counts as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – semantic type decided at load time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "int"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Boolean => write!(f, "bool"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, cells: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            kind,
            cells,
        }
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Non-missing numeric values in row order.
    pub fn present_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(CellValue::as_f64).collect()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The structured dataset: ordered, uniquely named, equally long columns.
///
/// Immutable once built; a new upload replaces the whole value.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting unequal column lengths or duplicate names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let table = Table { columns };
        table.check_invariants()?;
        Ok(table)
    }

    /// Re-verify the structural invariants.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        let rows = self.row_count();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(ProfileError::Invariant(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
            if col.cells.len() != rows {
                return Err(ProfileError::Invariant(format!(
                    "column '{}' has {} cells, expected {rows}",
                    col.name,
                    col.cells.len()
                )));
            }
        }
        Ok(())
    }

    /// Number of rows (length of the first column).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// The first `n` rows, row-major, for previews.
    pub fn head(&self, n: usize) -> Vec<Vec<CellValue>> {
        (0..self.row_count().min(n))
            .map(|row| self.columns.iter().map(|c| c.cells[row].clone()).collect())
            .collect()
    }

    /// Row-aligned numeric view of one column; `None` marks a missing cell.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        self.column(name)
            .map(|c| c.cells.iter().map(CellValue::as_f64).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn int_col(name: &str, vals: &[Option<i64>]) -> Column {
        let cells = vals
            .iter()
            .map(|v| v.map_or(CellValue::Missing, CellValue::Integer))
            .collect();
        Column::new(name, ColumnKind::Integer, cells)
    }

    #[test]
    fn test_table_rejects_length_mismatch() {
        let err = Table::new(vec![
            int_col("a", &[Some(1), Some(2)]),
            int_col("b", &[Some(1)]),
        ])
        .unwrap_err();
        assert!(matches!(err, ProfileError::Invariant(_)));
    }

    #[test]
    fn test_table_rejects_duplicate_names() {
        let err = Table::new(vec![int_col("a", &[Some(1)]), int_col("a", &[Some(2)])])
            .unwrap_err();
        assert!(matches!(err, ProfileError::Invariant(_)));
    }

    #[test]
    fn test_head_and_numeric_values() {
        let table = Table::new(vec![
            int_col("a", &[Some(1), None, Some(3)]),
            Column::new(
                "t",
                ColumnKind::Text,
                vec![
                    CellValue::Text("x".into()),
                    CellValue::Text("y".into()),
                    CellValue::Missing,
                ],
            ),
        ])
        .unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(10).len(), 3);
        assert_eq!(table.head(1)[0][1], CellValue::Text("x".into()));
        assert_eq!(
            table.numeric_values("a").unwrap(),
            vec![Some(1.0), None, Some(3.0)]
        );
        assert!(table.numeric_values("zzz").is_none());
    }

    #[test]
    fn test_nan_float_is_missing() {
        assert!(CellValue::Float(f64::NAN).is_missing());
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert!(!CellValue::Float(0.0).is_missing());
        assert!(!ColumnKind::Boolean.is_numeric());
    }
}
