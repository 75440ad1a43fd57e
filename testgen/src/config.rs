//! Configuration for scenario generation

use colgen_datagen::JoinSizes;
use std::path::PathBuf;

/// Configuration for one generation run.
///
/// Passed explicitly to every generator and to the emitter; nothing is read
/// from process-wide state.
#[derive(Debug, Clone)]
pub struct GenConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Directory generated files are written to
    pub out_dir: PathBuf,
    /// Directory the engine sees the data files under; used in `load(...)`
    pub load_prefix: String,
    /// Row count of the index dataset
    pub index_rows: usize,
    /// Row counts of the join dataset
    pub join_sizes: JoinSizes,
    /// Zipf skew of the join keys
    pub zipf_skew: f64,
    /// Number of distinct join keys
    pub zipf_domain: usize,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            seed: 47,
            out_dir: PathBuf::from("generated_data"),
            load_prefix: "/cs165/staff_test".to_string(),
            index_rows: 10_000,
            join_sizes: JoinSizes {
                fact: 10_000,
                dim1: 10_000,
                dim2: 10_000,
                select: 10_000,
            },
            zipf_skew: 1.0,
            zipf_domain: 50,
        }
    }
}

impl GenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn with_load_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.load_prefix = prefix.into();
        self
    }

    pub fn with_index_rows(mut self, rows: usize) -> Self {
        self.index_rows = rows;
        self
    }

    pub fn with_join_sizes(mut self, sizes: JoinSizes) -> Self {
        self.join_sizes = sizes;
        self
    }

    pub fn with_zipf(mut self, skew: f64, domain: usize) -> Self {
        self.zipf_skew = skew;
        self.zipf_domain = domain;
        self
    }

    /// Small tables, for tests.
    pub fn minimal() -> Self {
        Self {
            index_rows: 1_000,
            join_sizes: JoinSizes {
                fact: 500,
                dim1: 300,
                dim2: 100,
                select: 400,
            },
            ..Self::default()
        }
    }

    /// Runtime path of a data file, as written into `load(...)`.
    pub fn load_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.load_prefix.trim_end_matches('/'), file_name)
    }
}
