use serde::Serialize;

use super::model::Table;

/// Names of the numeric columns, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NumericColumnSet(Vec<String>);

impl NumericColumnSet {
    pub fn new(names: Vec<String>) -> Self {
        NumericColumnSet(names)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// `(rows, columns)` of the table.
pub fn shape(table: &Table) -> (usize, usize) {
    (table.row_count(), table.column_count())
}

/// Columns the loader typed as numeric. No re-parsing happens here.
pub fn numeric_columns(table: &Table) -> NumericColumnSet {
    NumericColumnSet::new(
        table
            .columns()
            .iter()
            .filter(|c| c.kind.is_numeric())
            .map(|c| c.name.clone())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column, ColumnKind};

    #[test]
    fn test_numeric_columns_keep_table_order() {
        let table = Table::new(vec![
            Column::new("z", ColumnKind::Float, vec![CellValue::Float(1.5)]),
            Column::new("name", ColumnKind::Text, vec![CellValue::Text("a".into())]),
            Column::new("flag", ColumnKind::Boolean, vec![CellValue::Bool(true)]),
            Column::new("a", ColumnKind::Integer, vec![CellValue::Integer(2)]),
        ])
        .unwrap();

        let set = numeric_columns(&table);
        assert_eq!(set.as_slice(), &["z".to_string(), "a".to_string()]);
        assert!(!set.contains("flag"));
        assert_eq!(shape(&table), (1, 4));
    }

    #[test]
    fn test_empty_table_shape() {
        let table = Table::new(Vec::new()).unwrap();
        assert_eq!(shape(&table), (0, 0));
        assert!(numeric_columns(&table).is_empty());
    }
}
