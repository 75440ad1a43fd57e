//! Core types for scenario generation

use colgen_core::{Catalog, CoreError, Table};
use colgen_datagen::DataGenError;
use colgen_oracle::{Interpreter, OracleError, Script};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during scenario generation
#[derive(Error, Debug)]
pub enum TestGenError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Data generation failed: {0}")]
    DataGen(#[from] DataGenError),
    #[error("Oracle evaluation failed: {0}")]
    Oracle(#[from] OracleError),
    #[error("Scenario {number} failed: {source}")]
    Scenario {
        number: u32,
        #[source]
        source: OracleError,
    },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

impl TestGenError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type TestGenResult<T> = Result<T, TestGenError>;

/// What a scenario is meant to exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Creates and loads tables; nothing printed
    Setup,
    /// Output is checked against the oracle
    Correctness,
    /// Only timed; nothing printed
    Performance,
}

impl ScenarioKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Setup => "setup",
            ScenarioKind::Correctness => "correctness",
            ScenarioKind::Performance => "performance",
        }
    }
}

/// A single numbered test case: a script and the output it must produce.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Test number, used in file names
    pub number: u32,
    /// One-line description
    pub title: String,
    pub kind: ScenarioKind,
    pub script: Script,
    /// Expected engine output; empty when nothing is printed
    pub expected: String,
    /// Tags for categorization
    pub tags: Vec<String>,
}

impl Scenario {
    /// Build a scenario, computing its expected output against `catalog`.
    pub fn evaluate(
        number: u32,
        title: impl Into<String>,
        kind: ScenarioKind,
        script: Script,
        catalog: &Catalog,
    ) -> TestGenResult<Self> {
        let expected = Interpreter::new(catalog)
            .run(&script)
            .map_err(|source| TestGenError::Scenario { number, source })?;
        let scenario = Self {
            number,
            title: title.into(),
            kind,
            script,
            expected,
            tags: Vec::new(),
        };
        tracing::debug!(
            number,
            ops = scenario.script.len(),
            expected_lines = scenario.expected.lines().count(),
            "built scenario"
        );
        Ok(scenario)
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn script_file_name(&self) -> String {
        format!("test{:02}gen.dsl", self.number)
    }

    pub fn expected_file_name(&self) -> String {
        format!("test{:02}gen.exp", self.number)
    }

    /// Whether the engine's output is compared at all.
    pub fn checks_output(&self) -> bool {
        self.script.prints()
    }
}

/// A table written to a CSV file the scripts load from.
#[derive(Debug, Clone)]
pub struct DataFile {
    pub file_name: String,
    pub table: Table,
}

impl DataFile {
    pub fn new(file_name: impl Into<String>, table: Table) -> Self {
        Self {
            file_name: file_name.into(),
            table,
        }
    }
}

/// Everything one generation run produces.
#[derive(Debug, Clone)]
pub struct ScenarioSuite {
    /// Suite name, e.g. `index` or `join`
    pub name: String,
    pub seed: u64,
    pub data_files: Vec<DataFile>,
    pub scenarios: Vec<Scenario>,
}

impl ScenarioSuite {
    pub fn scenario(&self, number: u32) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.number == number)
    }

    pub fn numbers(&self) -> Vec<u32> {
        self.scenarios.iter().map(|s| s.number).collect()
    }
}
