use serde::Serialize;

use super::model::Table;
use super::schema::NumericColumnSet;
use super::stats;
use crate::error::{ProfileError, Result};

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics of one numeric column, over its non-missing cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample deviation; `None` below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Summarize a NaN-free sample. An empty sample yields NaN statistics.
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let sorted = stats::sorted(values);
        let q = |p: f64| stats::quantile(&sorted, p).unwrap_or(f64::NAN);
        ColumnSummary {
            column: column.to_string(),
            count: values.len(),
            mean: stats::mean(values).unwrap_or(f64::NAN),
            std: stats::sample_std(values),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: q(0.25),
            q50: q(0.5),
            q75: q(0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }
}

/// Column → summary for the numeric columns, in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Summary(Vec<ColumnSummary>);

impl Summary {
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.0.iter().find(|s| s.column == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSummary> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Describe every column in `numeric`. Non-numeric columns never appear.
pub fn summarize(table: &Table, numeric: &NumericColumnSet) -> Result<Summary> {
    table.check_invariants()?;

    numeric
        .iter()
        .map(|name| {
            let column = table.column(name).ok_or_else(|| {
                ProfileError::Invariant(format!("numeric column '{name}' not in table"))
            })?;
            if !column.kind.is_numeric() {
                return Err(ProfileError::Invariant(format!(
                    "column '{name}' is typed {}, not numeric",
                    column.kind
                )));
            }
            Ok(ColumnSummary::from_values(name, &column.present_values()))
        })
        .collect::<Result<Vec<_>>>()
        .map(Summary)
}

// ---------------------------------------------------------------------------
// Missing values
// ---------------------------------------------------------------------------

/// Missing cell count for every column, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingReport {
    entries: Vec<(String, usize)>,
}

impl MissingReport {
    pub fn get(&self, column: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, n)| (name.as_str(), *n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }
}

pub fn missing_report(table: &Table) -> Result<MissingReport> {
    table.check_invariants()?;
    Ok(MissingReport {
        entries: table
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.missing_count()))
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;
    use crate::data::schema::numeric_columns;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_reference_scenario() {
        let table = load(b"a,b\n1,2\n3,4\n,6\n", "data.csv").unwrap();
        let numeric = numeric_columns(&table);

        let missing = missing_report(&table).unwrap();
        assert_eq!(missing.get("a"), Some(1));
        assert_eq!(missing.get("b"), Some(0));

        let summary = summarize(&table, &numeric).unwrap();
        let b = summary.get("b").unwrap();
        assert_eq!(b.count, 3);
        assert!(close(b.mean, 4.0));
        assert!(close(b.min, 2.0));
        assert!(close(b.max, 6.0));
        assert!(close(b.std.unwrap(), 2.0));

        let a = summary.get("a").unwrap();
        assert_eq!(a.count, 2);
        assert!(close(a.mean, 2.0));
    }

    #[test]
    fn test_text_columns_absent_from_summary() {
        let table = load(b"name,score\nann,1\nbob,2\n", "x.csv").unwrap();
        let summary = summarize(&table, &numeric_columns(&table)).unwrap();
        assert_eq!(summary.len(), 1);
        assert!(summary.get("name").is_none());
    }

    #[test]
    fn test_single_value_has_undefined_std() {
        let table = load(b"a\n5\n\n", "x.csv").unwrap();
        let summary = summarize(&table, &numeric_columns(&table)).unwrap();
        let a = summary.get("a").unwrap();
        assert_eq!(a.std, None);
        assert!(close(a.q25, 5.0));
        assert!(close(a.q75, 5.0));
    }

    #[test]
    fn test_quartiles_ordered_within_range() {
        let table = load(
            b"v,w\n9,0.1\n-3,7\n4,2.2\n4,\n12,-8\n0,3\n7,3\n",
            "x.csv",
        )
        .unwrap();
        let summary = summarize(&table, &numeric_columns(&table)).unwrap();
        for s in summary.iter() {
            assert!(s.min <= s.q25, "{s:?}");
            assert!(s.q25 <= s.q50, "{s:?}");
            assert!(s.q50 <= s.q75, "{s:?}");
            assert!(s.q75 <= s.max, "{s:?}");
        }
    }

    #[test]
    fn test_missing_report_covers_every_column() {
        let csv = "a,b,c\n1,,x\n,NA,\n3,4,z\n";
        let table = load(csv.as_bytes(), "x.csv").unwrap();
        let report = missing_report(&table).unwrap();

        assert_eq!(report.len(), table.column_count());
        let names: Vec<&str> = report.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let empty_cells = table
            .columns()
            .iter()
            .flat_map(|c| c.cells.iter())
            .filter(|c| c.is_missing())
            .count();
        assert_eq!(report.total(), empty_cells);
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn test_unknown_numeric_name_is_invariant_error() {
        let table = load(b"a,t\n1,x\n", "x.csv").unwrap();
        let bogus = NumericColumnSet::new(vec!["nope".into()]);
        assert!(matches!(
            summarize(&table, &bogus).unwrap_err(),
            ProfileError::Invariant(_)
        ));
        let text = NumericColumnSet::new(vec!["t".into()]);
        assert!(matches!(
            summarize(&table, &text).unwrap_err(),
            ProfileError::Invariant(_)
        ));
    }
}
