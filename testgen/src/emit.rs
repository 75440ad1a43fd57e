//! Writes suites to disk: one CSV per data file and a `.dsl`/`.exp` pair per
//! scenario.

use crate::{DataFile, Scenario, ScenarioSuite, TestGenError, TestGenResult};
use colgen_core::Table;
use std::fs;
use std::path::PathBuf;

/// CSV text of a table: a `db.table.column` header, then one row per line.
pub fn csv_text(table: &Table) -> String {
    let mut out = table
        .column_names()
        .map(|c| format!("{}.{}", table.qualified_name(), c))
        .collect::<Vec<_>>()
        .join(",");
    out.push('\n');
    for row in (0..table.row_count()).filter_map(|i| table.row(i)) {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Writes generated files under one output directory.
pub struct Emitter {
    out_dir: PathBuf,
}

impl Emitter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Write every data file and scenario of `suite`. Returns the written paths.
    pub fn write_suite(&self, suite: &ScenarioSuite) -> TestGenResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.out_dir).map_err(|e| TestGenError::io(&self.out_dir, e))?;

        let mut written = Vec::new();
        for file in &suite.data_files {
            written.push(self.write_data_file(file)?);
        }
        for scenario in &suite.scenarios {
            written.extend(self.write_scenario(scenario)?);
        }
        tracing::info!(
            suite = %suite.name,
            files = written.len(),
            dir = %self.out_dir.display(),
            "wrote suite"
        );
        Ok(written)
    }

    pub fn write_data_file(&self, file: &DataFile) -> TestGenResult<PathBuf> {
        let path = self.write(&file.file_name, &csv_text(&file.table))?;
        tracing::debug!(path = %path.display(), rows = file.table.row_count(), "wrote data file");
        Ok(path)
    }

    /// Writes `testNNgen.dsl` and `testNNgen.exp`; the latter is empty when
    /// the scenario prints nothing.
    pub fn write_scenario(&self, scenario: &Scenario) -> TestGenResult<[PathBuf; 2]> {
        let script = self.write(&scenario.script_file_name(), &scenario.script.to_string())?;
        let expected = self.write(&scenario.expected_file_name(), &scenario.expected)?;
        Ok([script, expected])
    }

    /// Write a file relative to the output directory.
    pub fn write(&self, name: &str, contents: &str) -> TestGenResult<PathBuf> {
        let path = self.out_dir.join(name);
        fs::write(&path, contents).map_err(|e| TestGenError::io(&path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colgen_core::Column;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_csv_text() {
        let mut table = Table::new("db1", "tbl5_dim2", 3);
        table.push_column(Column::new("col1", vec![1, 2, 3])).unwrap();
        table.push_column(Column::new("col2", vec![7, 0, 19])).unwrap();
        assert_eq!(
            csv_text(&table),
            "db1.tbl5_dim2.col1,db1.tbl5_dim2.col2\n1,7\n2,0\n3,19\n"
        );
    }

    #[test]
    fn test_io_errors_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let emitter = Emitter::new(blocker.join("out"));
        let err = emitter.write("x.csv", "").unwrap_err();
        assert!(matches!(err, TestGenError::Io { .. }));
        assert!(err.to_string().contains("blocker"));
    }
}
