//! The two canonical fixtures: an index dataset and a join dataset.
//!
//! Both are generated with a fixed sequence of builder calls. Reordering
//! any call changes every table that follows it for the same seed.

use crate::{DataGenResult, TableBuilder, ZipfianDistribution};
use colgen_core::Table;
use rand::Rng;
use serde::Serialize;

/// Database every fixture table lives in.
pub const DB: &str = "db1";

/// Single four-column table for select/fetch/aggregate and index scenarios.
///
/// `col3` is uniform over `[0, rows/5)`, `col1` over `[0, 1000)`, `col2`
/// over `[0, 10000)` with two heavy-hitter values injected, and `col4` is a
/// uniform `[0, 10000)` draw plus `col1`.
#[derive(Debug, Clone)]
pub struct IndexDataset {
    pub table: Table,
    pub frequent_values: (i64, i64),
}

impl IndexDataset {
    pub const TABLE: &'static str = "tbl4";
    pub const COL1_DOMAIN: i64 = 1_000;
    pub const COL2_DOMAIN: i64 = 10_000;
    pub const COL4_DOMAIN: i64 = 10_000;
    /// Share of rows forced to the first frequent value.
    pub const FREQUENT_SHARE_1: f64 = 0.05;
    /// Share of rows forced to the second frequent value.
    pub const FREQUENT_SHARE_2: f64 = 0.02;

    /// Draw order: base matrix (row-major, 4 columns), col1, col4, mask 1,
    /// mask 2, col2, frequent value 1, frequent value 2.
    pub fn generate(rows: usize, rng: &mut impl Rng) -> DataGenResult<Self> {
        let domain = Self::domain_for(rows);
        let mut b = TableBuilder::new(DB, Self::TABLE, rows);

        b.uniform_columns(&["col1", "col2", "col3", "col4"], 0, domain, rng)?;
        b.fill_uniform("col1", 0, Self::COL1_DOMAIN, rng)?;
        b.fill_uniform("col4", 0, Self::COL4_DOMAIN, rng)?;
        let mask1 = b.mask(Self::FREQUENT_SHARE_1, rng);
        let mask2 = b.mask(Self::FREQUENT_SHARE_2, rng);
        b.fill_uniform("col2", 0, Self::COL2_DOMAIN, rng)?;
        let frequent1 = rng.gen_range(0..domain);
        let frequent2 = rng.gen_range(0..domain);
        b.inject_frequent("col2", &mask1, frequent1)?;
        b.inject_frequent("col2", &mask2, frequent2)?;
        b.add_column("col4", "col1")?;

        tracing::debug!(rows, frequent1, frequent2, "generated index dataset");
        Ok(Self {
            table: b.finish()?,
            frequent_values: (frequent1, frequent2),
        })
    }

    /// Value domain of the uniform base columns: `rows / 5`.
    pub fn domain_for(rows: usize) -> i64 {
        (rows / 5) as i64
    }

    pub fn rows(&self) -> usize {
        self.table.row_count()
    }

    pub fn domain(&self) -> i64 {
        Self::domain_for(self.rows())
    }
}

/// Row counts of the join dataset's tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinSizes {
    pub fact: usize,
    pub dim1: usize,
    pub dim2: usize,
    pub select: usize,
}

/// Star-shaped tables for join scenarios.
///
/// - `tbl5_fact.col1` and `tbl5_dim1.col1` are Zipfian ranks: many-to-many.
/// - `tbl5_fact.col4` and `tbl5_dim1.col2` are foreign keys into
///   `tbl5_dim2.col1`, which holds `1..=dim2`: many-to-one.
/// - `tbl5_sel1` / `tbl5_sel2` are plain uniform tables for selectivity sweeps.
#[derive(Debug, Clone)]
pub struct JoinDataset {
    pub sizes: JoinSizes,
    pub zipf: ZipfianDistribution,
    pub fact: Table,
    pub dim1: Table,
    pub dim2: Table,
    pub sel1: Table,
    pub sel2: Table,
}

impl JoinDataset {
    pub const FACT: &'static str = "tbl5_fact";
    pub const DIM1: &'static str = "tbl5_dim1";
    pub const DIM2: &'static str = "tbl5_dim2";
    pub const SEL1: &'static str = "tbl5_sel1";
    pub const SEL2: &'static str = "tbl5_sel2";

    /// Draw order: fact (matrix, col1 zipf, col4), dim1 (matrix, col1 zipf,
    /// col2), dim2 (matrix), sel1 (matrix), sel2 (matrix).
    pub fn generate(
        sizes: JoinSizes,
        zipf: ZipfianDistribution,
        rng: &mut impl Rng,
    ) -> DataGenResult<Self> {
        let mut fact = TableBuilder::new(DB, Self::FACT, sizes.fact);
        fact.uniform_columns(
            &["col1", "col2", "col3", "col4"],
            0,
            IndexDataset::domain_for(sizes.fact),
            rng,
        )?;
        fact.fill_zipf("col1", &zipf, rng);
        fact.fill_constant("col3", 1);
        fact.fill_uniform("col4", 1, sizes.dim2 as i64, rng)?;

        let mut dim1 = TableBuilder::new(DB, Self::DIM1, sizes.dim1);
        dim1.uniform_columns(
            &["col1", "col2", "col3"],
            0,
            IndexDataset::domain_for(sizes.dim1),
            rng,
        )?;
        dim1.fill_zipf("col1", &zipf, rng);
        dim1.fill_uniform("col2", 1, sizes.dim2 as i64, rng)?;

        let mut dim2 = TableBuilder::new(DB, Self::DIM2, sizes.dim2);
        dim2.uniform_columns(&["col1", "col2"], 0, IndexDataset::domain_for(sizes.dim2), rng)?;
        dim2.fill_sequence("col1", 1);

        let select_domain = IndexDataset::domain_for(sizes.select);
        let mut sel1 = TableBuilder::new(DB, Self::SEL1, sizes.select);
        sel1.uniform_columns(&["col1", "col2"], 0, select_domain, rng)?;
        let mut sel2 = TableBuilder::new(DB, Self::SEL2, sizes.select);
        sel2.uniform_columns(&["col1", "col2"], 0, select_domain, rng)?;

        tracing::debug!(?sizes, skew = zipf.skew(), distinct = zipf.domain(), "generated join dataset");
        Ok(Self {
            sizes,
            zipf,
            fact: fact.finish()?,
            dim1: dim1.finish()?,
            dim2: dim2.finish()?,
            sel1: sel1.finish()?,
            sel2: sel2.finish()?,
        })
    }

    pub fn tables(&self) -> [&Table; 5] {
        [&self.fact, &self.dim1, &self.dim2, &self.sel1, &self.sel2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_index_dataset_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(47);
        let ds = IndexDataset::generate(1_000, &mut rng).unwrap();
        let t = &ds.table;
        assert_eq!(t.row_count(), 1_000);
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["col1", "col2", "col3", "col4"]);

        let col1 = t.values("col1").unwrap();
        let col3 = t.values("col3").unwrap();
        let col4 = t.values("col4").unwrap();
        assert!(col1.iter().all(|v| (0..1_000).contains(v)));
        assert!(col3.iter().all(|v| (0..200).contains(v)));
        // col4 = uniform [0, 10000) + col1
        assert!(col4.iter().zip(col1).all(|(c4, c1)| (*c1..*c1 + 10_000).contains(c4)));

        let (f1, f2) = ds.frequent_values;
        let col2 = t.values("col2").unwrap();
        let hits = col2.iter().filter(|&&v| v == f1 || v == f2).count();
        // ~7% of rows are heavy hitters
        assert!(hits >= 30, "only {} heavy-hitter rows", hits);
    }

    #[test]
    fn test_same_seed_same_tables() {
        let a = IndexDataset::generate(500, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        let b = IndexDataset::generate(500, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        let c = IndexDataset::generate(500, &mut ChaCha8Rng::seed_from_u64(2)).unwrap();
        assert_eq!(a.table, b.table);
        assert_eq!(a.frequent_values, b.frequent_values);
        assert_ne!(a.table, c.table);
    }

    #[test]
    fn test_join_dataset_keys() {
        let sizes = JoinSizes {
            fact: 400,
            dim1: 200,
            dim2: 100,
            select: 300,
        };
        let zipf = ZipfianDistribution::new(1.0, 50).unwrap();
        let ds = JoinDataset::generate(sizes, zipf, &mut ChaCha8Rng::seed_from_u64(47)).unwrap();

        assert!(ds.fact.values("col1").unwrap().iter().all(|v| (1..=50).contains(v)));
        assert!(ds.fact.values("col3").unwrap().iter().all(|&v| v == 1));
        assert!(ds.fact.values("col4").unwrap().iter().all(|v| (1..100).contains(v)));
        assert!(ds.dim1.values("col2").unwrap().iter().all(|v| (1..100).contains(v)));
        assert_eq!(ds.dim2.values("col1").unwrap().first(), Some(&1));
        assert_eq!(ds.dim2.values("col1").unwrap().last(), Some(&100));
        assert_eq!(ds.sel1.row_count(), ds.sel2.row_count());
        assert!(ds.sel2.values("col2").unwrap().iter().all(|v| (0..60).contains(v)));
        assert_eq!(ds.tables().map(|t| t.name().to_string()), [
            "tbl5_fact", "tbl5_dim1", "tbl5_dim2", "tbl5_sel1", "tbl5_sel2"
        ]);
    }
}
