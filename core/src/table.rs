//! In-memory tables.
//!
//! A table is a fixed-schema relation of integer columns. Row ids are
//! implicit: row `i` is position `i` in every column.

use crate::{ColumnRef, CoreError, CoreResult};
use serde::Serialize;

/// A named sequence of integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    name: String,
    values: Vec<i64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A relation of equally long columns, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    db: String,
    name: String,
    row_count: usize,
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table with a fixed row count.
    pub fn new(db: impl Into<String>, name: impl Into<String>, row_count: usize) -> Self {
        Self {
            db: db.into(),
            name: name.into(),
            row_count,
            columns: Vec::new(),
        }
    }

    /// Append a column. Names must be unique and lengths must match the row count.
    pub fn push_column(&mut self, column: Column) -> CoreResult<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(CoreError::duplicate_column(self.qualified_name(), column.name));
        }
        if column.len() != self.row_count {
            return Err(CoreError::LengthMismatch {
                column: column.name,
                expected: self.row_count,
                actual: column.values.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Same table contents under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn db(&self) -> &str {
        &self.db
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `db.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.db, self.name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name())
    }

    pub fn column(&self, name: &str) -> CoreResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::column_not_found(self.qualified_name(), name))
    }

    /// Values of a column, by name.
    pub fn values(&self, name: &str) -> CoreResult<&[i64]> {
        self.column(name).map(Column::values)
    }

    /// Reference to one of this table's columns.
    pub fn column_ref(&self, column: &str) -> ColumnRef {
        ColumnRef::new(&self.db, &self.name, column)
    }

    /// The values of row `i` in column order.
    pub fn row(&self, i: usize) -> Option<Vec<i64>> {
        if i >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[i]).collect())
    }
}

/// Tables addressable by `db.table`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: Vec<Table>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, replacing any earlier table with the same qualified name.
    pub fn insert(&mut self, table: Table) {
        if let Some(existing) = self
            .tables
            .iter_mut()
            .find(|t| t.db == table.db && t.name == table.name)
        {
            *existing = table;
        } else {
            self.tables.push(table);
        }
    }

    pub fn table(&self, db: &str, name: &str) -> CoreResult<&Table> {
        self.tables
            .iter()
            .find(|t| t.db == db && t.name == name)
            .ok_or_else(|| CoreError::TableNotFound(format!("{}.{}", db, name)))
    }

    /// Resolve a column reference to its values.
    pub fn resolve(&self, column: &ColumnRef) -> CoreResult<&[i64]> {
        self.table(column.db(), column.table())?
            .values(column.column())
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

impl FromIterator<Table> for Catalog {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for table in iter {
            catalog.insert(table);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new("db1", "tbl1", 3);
        t.push_column(Column::new("col1", vec![1, 2, 3])).unwrap();
        t.push_column(Column::new("col2", vec![4, 5, 6])).unwrap();
        t
    }

    #[test]
    fn test_columns_keep_declaration_order() {
        let t = sample();
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["col1", "col2"]);
        assert_eq!(t.row(1), Some(vec![2, 5]));
        assert_eq!(t.row(3), None);
    }

    #[test]
    fn test_rejects_duplicate_and_short_columns() {
        let mut t = sample();
        assert!(matches!(
            t.push_column(Column::new("col1", vec![0, 0, 0])),
            Err(CoreError::DuplicateColumn { .. })
        ));
        assert!(matches!(
            t.push_column(Column::new("col3", vec![0])),
            Err(CoreError::LengthMismatch { expected: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn test_catalog_resolves_refs() {
        let catalog: Catalog = vec![sample(), sample().renamed("tbl2")].into_iter().collect();
        let r: ColumnRef = "db1.tbl2.col2".parse().unwrap();
        assert_eq!(catalog.resolve(&r).unwrap(), &[4, 5, 6]);

        let missing: ColumnRef = "db1.tbl3.col2".parse().unwrap();
        assert_eq!(
            catalog.resolve(&missing),
            Err(CoreError::TableNotFound("db1.tbl3".to_string()))
        );
    }
}
