//! Suite summaries and the JSON manifest written next to generated files

use crate::types::*;

/// Generates human-readable and JSON descriptions of a suite
pub struct ReportGenerator;

impl ReportGenerator {
    /// Short text summary, one line per scenario
    pub fn generate(suite: &ScenarioSuite) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Suite: {}", suite.name));
        lines.push(format!("Seed: {}", suite.seed));
        lines.push(format!("Scenarios: {}", suite.scenarios.len()));
        lines.push(String::new());

        lines.push("Data files:".to_string());
        for file in &suite.data_files {
            lines.push(format!(
                "  {} ({} rows x {} columns)",
                file.file_name,
                file.table.row_count(),
                file.table.columns().len()
            ));
        }
        lines.push(String::new());

        for scenario in &suite.scenarios {
            lines.push(format!(
                "  {:>2} {:11} {:>4} lines  {}",
                scenario.number,
                scenario.kind.as_str(),
                scenario.expected.lines().count(),
                scenario.title
            ));
        }

        lines.join("\n")
    }

    /// JSON manifest for programmatic consumption
    pub fn generate_json(suite: &ScenarioSuite) -> TestGenResult<String> {
        use serde_json::json;

        let data_files: Vec<_> = suite
            .data_files
            .iter()
            .map(|f| {
                json!({
                    "file": f.file_name,
                    "table": f.table.qualified_name(),
                    "rows": f.table.row_count(),
                    "columns": f.table.column_names().collect::<Vec<_>>(),
                })
            })
            .collect();

        let scenarios: Vec<_> = suite
            .scenarios
            .iter()
            .map(|s| {
                json!({
                    "number": s.number,
                    "title": s.title,
                    "kind": s.kind,
                    "script": s.script_file_name(),
                    "expected": s.expected_file_name(),
                    "checks_output": s.checks_output(),
                    "expected_lines": s.expected.lines().count(),
                    "tags": s.tags,
                })
            })
            .collect();

        let report = json!({
            "suite": suite.name,
            "seed": suite.seed,
            "data_files": data_files,
            "scenarios": scenarios,
        });

        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn manifest_file_name(suite: &ScenarioSuite) -> String {
        format!("{}_manifest.json", suite.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colgen_core::{Catalog, Column, Table};
    use colgen_oracle::Script;
    use pretty_assertions::assert_eq;

    fn sample_suite() -> ScenarioSuite {
        let mut table = Table::new("db1", "tbl4", 2);
        table.push_column(Column::new("col1", vec![3, 4])).unwrap();
        let catalog: Catalog = std::iter::once(table.clone()).collect();

        let setup = Scenario::evaluate(
            20,
            "Create tbl4",
            ScenarioKind::Setup,
            Script::parse("create(tbl,\"tbl4\",db1,1)\nshutdown").unwrap(),
            &catalog,
        )
        .unwrap()
        .with_tags(&["setup"]);

        ScenarioSuite {
            name: "index".to_string(),
            seed: 47,
            data_files: vec![DataFile::new("data4_btree.csv", table)],
            scenarios: vec![setup],
        }
    }

    #[test]
    fn test_generate_report() {
        let report = ReportGenerator::generate(&sample_suite());
        assert!(report.contains("Suite: index"));
        assert!(report.contains("data4_btree.csv (2 rows x 1 columns)"));
        assert!(report.contains("setup"));
    }

    #[test]
    fn test_generate_json() {
        let suite = sample_suite();
        let json = ReportGenerator::generate_json(&suite).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["seed"], 47);
        assert_eq!(value["data_files"][0]["table"], "db1.tbl4");
        assert_eq!(value["scenarios"][0]["kind"], "setup");
        assert_eq!(value["scenarios"][0]["script"], "test20gen.dsl");
        assert_eq!(value["scenarios"][0]["checks_output"], false);
        assert_eq!(ReportGenerator::manifest_file_name(&suite), "index_manifest.json");
    }
}
