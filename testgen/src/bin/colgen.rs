//! Test generator for the column-store engine's index and join milestones
//!
//! Usage:
//!   colgen index <rows> [seed] [out_dir] [load_prefix]
//!   colgen join <fact> <dim1> <dim2> <select> [seed] [zipf_s] [zipf_n] [out_dir] [load_prefix]
//!   colgen verify <expected> <actual>
//!
//! Set `RUST_LOG` to change log verbosity.

use clap::{Parser, Subcommand};
use colgen_datagen::JoinSizes;
use colgen_testgen::{
    GenConfig, ReportGenerator, ScenarioSuite, TestGenError, TestGenResult, TestGenerator, Verifier,
    VerifyResult,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "colgen")]
#[command(about = "Generates reproducible column-store test scripts with expected outputs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the index suite (tests 20-44)
    Index {
        /// Rows in each index table
        rows: usize,

        #[arg(default_value_t = 47)]
        seed: u64,

        /// Directory to write generated files to
        #[arg(default_value = "generated_data")]
        out_dir: PathBuf,

        /// Directory the engine loads data files from
        #[arg(default_value = "/cs165/staff_test")]
        load_prefix: String,
    },

    /// Generate the join suite (tests 45-59)
    Join {
        /// Rows in the fact table
        fact: usize,
        /// Rows in the first dimension table
        dim1: usize,
        /// Rows in the second dimension table
        dim2: usize,
        /// Rows in each selectivity table
        select: usize,

        #[arg(default_value_t = 47)]
        seed: u64,

        /// Zipf skew of the fact table's join keys
        #[arg(default_value_t = 1.0)]
        zipf_s: f64,

        /// Number of distinct join keys
        #[arg(default_value_t = 50)]
        zipf_n: usize,

        #[arg(default_value = "generated_data")]
        out_dir: PathBuf,

        #[arg(default_value = "/cs165/staff_test")]
        load_prefix: String,
    },

    /// Compare an engine's output with an expected output file
    Verify {
        expected: PathBuf,
        actual: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "colgen=info,colgen_testgen=info,colgen_datagen=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn failure_message(err: &TestGenError) -> String {
    format!("error: {}", err)
}

fn run(command: Commands) -> TestGenResult<ExitCode> {
    match command {
        Commands::Index {
            rows,
            seed,
            out_dir,
            load_prefix,
        } => {
            let config = GenConfig::new()
                .with_seed(seed)
                .with_index_rows(rows)
                .with_out_dir(out_dir)
                .with_load_prefix(load_prefix);
            let generator = TestGenerator::new(config);
            let suite = generator.index_suite()?;
            emit(&generator, &suite)?;
        }
        Commands::Join {
            fact,
            dim1,
            dim2,
            select,
            seed,
            zipf_s,
            zipf_n,
            out_dir,
            load_prefix,
        } => {
            let config = GenConfig::new()
                .with_seed(seed)
                .with_join_sizes(JoinSizes {
                    fact,
                    dim1,
                    dim2,
                    select,
                })
                .with_zipf(zipf_s, zipf_n)
                .with_out_dir(out_dir)
                .with_load_prefix(load_prefix);
            let generator = TestGenerator::new(config);
            let suite = generator.join_suite()?;
            emit(&generator, &suite)?;
        }
        Commands::Verify { expected, actual } => {
            let expected_text =
                fs::read_to_string(&expected).map_err(|e| TestGenError::io(&expected, e))?;
            let actual_text =
                fs::read_to_string(&actual).map_err(|e| TestGenError::io(&actual, e))?;

            match Verifier::verify(&expected_text, &actual_text) {
                VerifyResult::Pass => println!("PASS {}", actual.display()),
                VerifyResult::Skip(reason) => println!("SKIP {}: {}", actual.display(), reason),
                VerifyResult::Fail(reason) => {
                    println!("FAIL {}: {}", actual.display(), reason);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn emit(generator: &TestGenerator, suite: &ScenarioSuite) -> TestGenResult<()> {
    generator.emit(suite)?;
    println!("{}", ReportGenerator::generate(suite));
    println!();
    println!("Output directory: {}", generator.config.out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_fails_with_readable_message() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().join("test25gen.exp");
        fs::write(&expected, "1\n").unwrap();

        let err = run(Commands::Verify {
            expected,
            actual: dir.path().join("missing.out"),
        })
        .unwrap_err();
        let message = failure_message(&err);
        assert!(message.starts_with("error: I/O error on "), "{}", message);
        assert!(message.contains("missing.out"));
        assert!(!message.contains("Io {"));
    }

    #[test]
    fn test_verify_mismatch_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().join("expected.exp");
        let actual = dir.path().join("actual.out");
        fs::write(&expected, "1\n2\n").unwrap();
        fs::write(&actual, "1\n3\n").unwrap();

        assert!(run(Commands::Verify { expected, actual }).is_ok());
    }
}
