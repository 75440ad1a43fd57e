//! Fully qualified column references (`db.table.col`).

use crate::CoreError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A `db.table.col` reference as it appears in query scripts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnRef {
    db: String,
    table: String,
    column: String,
}

impl ColumnRef {
    pub fn new(db: impl Into<String>, table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn db(&self) -> &str {
        &self.db
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.db, self.table, self.column)
    }
}

impl FromStr for ColumnRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        match parts.as_slice() {
            [db, table, column]
                if [db, table, column].iter().all(|p| !p.is_empty()) =>
            {
                Ok(Self::new(*db, *table, *column))
            }
            _ => Err(CoreError::InvalidColumnRef(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let r: ColumnRef = "db1.tbl4_ctrl.col3".parse().unwrap();
        assert_eq!(r.db(), "db1");
        assert_eq!(r.table(), "tbl4_ctrl");
        assert_eq!(r.column(), "col3");
        assert_eq!(r.to_string(), "db1.tbl4_ctrl.col3");
    }

    #[test]
    fn test_rejects_partial_refs() {
        assert!("db1.tbl4".parse::<ColumnRef>().is_err());
        assert!("db1..col1".parse::<ColumnRef>().is_err());
        assert!("s1".parse::<ColumnRef>().is_err());
    }
}
