//! Reproducible test-suite generation for a column-store engine
//!
//! This crate turns a seed into numbered scenarios and their data files:
//! - Generates the index and join datasets deterministically
//! - Plans range predicates hitting a target selectivity
//! - Builds query scripts and computes their expected output with the oracle
//! - Writes `testNNgen.dsl`/`testNNgen.exp` pairs, CSVs and a JSON manifest
//! - Verifies an engine's actual output against the expected output

pub mod config;
pub mod emit;
pub mod report;
pub mod script;
pub mod suite;
pub mod types;
pub mod verify;

pub use config::GenConfig;
pub use emit::Emitter;
pub use report::ReportGenerator;
pub use script::ScriptBuilder;
pub use suite::{IndexSuiteGenerator, JoinSuiteGenerator};
pub use types::*;
pub use verify::{Verifier, VerifyResult};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Main entry point for the test generator.
///
/// Each suite is generated from a fresh generator stream seeded from
/// `config.seed`, so the two suites are independent of each other and of
/// the order they are generated in.
pub struct TestGenerator {
    pub config: GenConfig,
}

impl TestGenerator {
    pub fn new(config: GenConfig) -> Self {
        Self { config }
    }

    fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.config.seed)
    }

    /// Generate scenarios 20-44 and their three data files
    pub fn index_suite(&self) -> TestGenResult<ScenarioSuite> {
        let mut rng = self.rng();
        let generator = IndexSuiteGenerator::new(&self.config, &mut rng)?;
        generator.generate(&mut rng)
    }

    /// Generate scenarios 45-59 and their five data files
    pub fn join_suite(&self) -> TestGenResult<ScenarioSuite> {
        let mut rng = self.rng();
        let generator = JoinSuiteGenerator::new(&self.config, &mut rng)?;
        generator.generate()
    }

    /// Write a generated suite and its manifest to `config.out_dir`
    pub fn emit(&self, suite: &ScenarioSuite) -> TestGenResult<()> {
        let emitter = Emitter::new(self.config.out_dir.clone());
        emitter.write_suite(suite)?;
        emitter.write(
            &ReportGenerator::manifest_file_name(suite),
            &ReportGenerator::generate_json(suite)?,
        )?;
        Ok(())
    }
}
