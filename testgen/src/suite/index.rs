//! Index scenarios (20-44) over the four-column index dataset.
//!
//! The same rows are loaded three times: `tbl4_ctrl` without indexes,
//! `tbl4` with a clustered sorted index on col3 and an unclustered B-tree
//! on col2, and `tbl4_clustered_btree` with a clustered B-tree on col3 and
//! an unclustered sorted index on col2. Query results never depend on the
//! indexes, so paired scenarios share one expected output.

use super::{plan_ranges, sql_condition};
use crate::script::ScriptBuilder;
use crate::{DataFile, GenConfig, Scenario, ScenarioKind, ScenarioSuite, TestGenResult};
use colgen_core::{Catalog, Clustering, IndexKind, Predicate, Table};
use colgen_datagen::{IndexDataset, SelectivityPlanner, DB};
use colgen_oracle::Script;
use rand::Rng;

const CTRL: &str = "tbl4_ctrl";
const BTREE: &str = IndexDataset::TABLE;
const CLUSTERED_BTREE: &str = "tbl4_clustered_btree";

const CTRL_FILE: &str = "data4_ctrl.csv";
const BTREE_FILE: &str = "data4_btree.csv";
const CLUSTERED_BTREE_FILE: &str = "data4_clustered_btree.csv";

#[derive(Debug, Clone, Copy)]
enum AggregateOp {
    Sum,
    Avg,
}

impl AggregateOp {
    fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
        }
    }
}

/// A batch of `select -> fetch -> aggregate -> print` queries.
struct AggregateBatch<'q> {
    table: &'q str,
    filter: &'q str,
    target: &'q str,
    op: AggregateOp,
}

/// Generates the index suite with oracle-computed expected outputs
pub struct IndexSuiteGenerator<'a> {
    config: &'a GenConfig,
    dataset: IndexDataset,
    catalog: Catalog,
}

impl<'a> IndexSuiteGenerator<'a> {
    pub const FIRST: u32 = 20;
    pub const LAST: u32 = 44;

    /// Generate the dataset. Consumes the dataset's draws from `rng`.
    pub fn new(config: &'a GenConfig, rng: &mut impl Rng) -> TestGenResult<Self> {
        let dataset = IndexDataset::generate(config.index_rows, rng)?;
        let catalog = [
            dataset.table.renamed(CTRL),
            dataset.table.clone(),
            dataset.table.renamed(CLUSTERED_BTREE),
        ]
        .into_iter()
        .collect();
        Ok(Self {
            config,
            dataset,
            catalog,
        })
    }

    pub fn dataset(&self) -> &IndexDataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Build scenarios 20 through 44, drawing predicates in number order.
    pub fn generate(&self, rng: &mut impl Rng) -> TestGenResult<ScenarioSuite> {
        let mut scenarios = vec![
            self.setup(
                20,
                "Create a control table identical to tbl4, without any indexes",
                CTRL,
                &[],
                CTRL_FILE,
            )?,
            self.setup(
                21,
                "Create tbl4 with a clustered sorted index on col3 and an unclustered btree on col2",
                BTREE,
                &[
                    ("col3", IndexKind::Sorted, Clustering::Clustered),
                    ("col2", IndexKind::Btree, Clustering::Unclustered),
                ],
                BTREE_FILE,
            )?,
        ];
        scenarios.extend(self.clustered_range_selects(rng)?);
        scenarios.push(self.refined_select_sum(rng)?);
        scenarios.extend(self.unclustered_sums(rng)?);
        scenarios.push(self.frequent_value_sums()?);
        scenarios.extend(self.unclustered_averages(rng)?);
        scenarios.push(self.setup(
            30,
            "Create tbl4_clustered_btree with a clustered btree on col3 and an unclustered sorted index on col2",
            CLUSTERED_BTREE,
            &[
                ("col3", IndexKind::Btree, Clustering::Clustered),
                ("col2", IndexKind::Sorted, Clustering::Unclustered),
            ],
            CLUSTERED_BTREE_FILE,
        )?);
        scenarios.push(self.clustered_btree_range_selects(rng)?);
        scenarios.push(self.clustered_btree_sums(rng)?);
        scenarios.extend(self.selectivity_sweep(33, "col3", "col1", rng)?);
        scenarios.extend(self.selectivity_sweep(39, "col2", "col3", rng)?);

        tracing::info!(
            rows = self.dataset.rows(),
            scenarios = scenarios.len(),
            "generated index suite"
        );
        Ok(ScenarioSuite {
            name: "index".to_string(),
            seed: self.config.seed,
            data_files: self.data_files()?,
            scenarios,
        })
    }

    fn data_files(&self) -> TestGenResult<Vec<DataFile>> {
        let mut files = Vec::new();
        for (file, table) in [
            (CTRL_FILE, CTRL),
            (BTREE_FILE, BTREE),
            (CLUSTERED_BTREE_FILE, CLUSTERED_BTREE),
        ] {
            files.push(DataFile::new(file, self.table(table)?.clone()));
        }
        Ok(files)
    }

    fn table(&self, name: &str) -> TestGenResult<&Table> {
        Ok(self.catalog.table(DB, name)?)
    }

    fn planner(&self) -> SelectivityPlanner {
        SelectivityPlanner::new(self.dataset.domain())
    }

    fn scenario(
        &self,
        number: u32,
        title: &str,
        kind: ScenarioKind,
        script: Script,
        tags: &[&str],
    ) -> TestGenResult<Scenario> {
        Ok(Scenario::evaluate(number, title, kind, script, &self.catalog)?.with_tags(tags))
    }

    /// Create, index and load one table, then shut down.
    fn setup(
        &self,
        number: u32,
        title: &str,
        table: &str,
        indexes: &[(&str, IndexKind, Clustering)],
        file: &str,
    ) -> TestGenResult<Scenario> {
        let table = self.table(table)?;
        let mut b = ScriptBuilder::new();
        b.comment(title)
            .comment("")
            .comment(format!("Loads data from: {}", file))
            .comment("")
            .comment("Create Table")
            .create_table(table);
        for (column, kind, clustering) in indexes {
            b.comment(format!("Create a {} {} index on {}", clustering, kind, column))
                .create_index(table.column_ref(column), *kind, *clustering);
        }
        b.comment("")
            .comment("Load data immediately")
            .load(self.config.load_path(file))
            .comment("")
            .comment("Testing that the data and their indexes are durable on disk.")
            .shutdown();
        self.scenario(number, title, ScenarioKind::Setup, b.build(), &["setup", "index"])
    }

    /// `s{n}=select(col3) -> f{n}=fetch(col1) -> print(f{n})` per range.
    fn projected_ranges(&self, table: &str, ranges: &[Predicate], intro: &[&str]) -> TestGenResult<Script> {
        let table = self.table(table)?;
        let mut b = ScriptBuilder::new();
        b.comment("").comments(intro).comment("Query in SQL:");
        for range in ranges {
            b.comment(format!(
                "SELECT col1 FROM {} WHERE {};",
                table.name(),
                sql_condition("col3", range)
            ));
        }
        b.comment("");
        for (i, range) in ranges.iter().enumerate() {
            let (s, f) = (format!("s{}", i + 1), format!("f{}", i + 1));
            b.select(&s, table.column_ref("col3"), *range)
                .fetch(&f, table.column_ref("col1"), &s)
                .print(&[f.as_str()]);
        }
        Ok(b.build())
    }

    /// Two ranges at 0.1% and 0.2% selectivity, shared by scenarios 22 and 23.
    fn narrow_ranges(&self, rng: &mut impl Rng) -> TestGenResult<Vec<Predicate>> {
        let planner = self.planner();
        Ok(vec![
            planner.with_min_offset(1).plan_range(0.001, rng)?,
            planner.with_min_offset(2).plan_range(0.002, rng)?,
        ])
    }

    fn clustered_range_selects(&self, rng: &mut impl Rng) -> TestGenResult<Vec<Scenario>> {
        let ranges = self.narrow_ranges(rng)?;
        let control = self.projected_ranges(CTRL, &ranges, &["Range selects on the control table"])?;
        let indexed = self.projected_ranges(
            BTREE,
            &ranges,
            &[
                "tbl4 has a clustered sorted index on col3 and an unclustered btree on col2",
                "Testing for correctness; the select on col3 is expected to use the clustered index",
                "",
            ],
        )?;
        Ok(vec![
            self.scenario(
                22,
                "Range selects on col3 without indexes",
                ScenarioKind::Correctness,
                control,
                &["select", "fetch", "control"],
            )?,
            self.scenario(
                23,
                "Range selects on col3 through the clustered sorted index",
                ScenarioKind::Correctness,
                indexed,
                &["select", "fetch", "clustered"],
            )?,
        ])
    }

    fn refined_select_sum(&self, rng: &mut impl Rng) -> TestGenResult<Scenario> {
        let first = self.planner().with_min_offset(1).plan_range(0.5, rng)?;
        let second =
            SelectivityPlanner::new(IndexDataset::COL2_DOMAIN).plan_range(0.2, rng)?;
        let table = self.table(BTREE)?;

        let mut b = ScriptBuilder::new();
        b.comments(&[
            "Test for a clustered index select followed by a second predicate",
            "",
            "Query in SQL:",
        ])
        .comment(format!(
            "SELECT sum(col1) FROM tbl4 WHERE ({}) AND ({});",
            sql_condition("col3", &first),
            sql_condition("col2", &second)
        ))
        .comment("")
        .select("s1", table.column_ref("col3"), first)
        .fetch("f1", table.column_ref("col2"), "s1")
        .select_within("s2", "s1", "f1", second)
        .fetch("f2", table.column_ref("col1"), "s2")
        .print(&["f2"])
        .sum("a1", "f2")
        .print(&["a1"]);
        self.scenario(
            24,
            "Clustered select followed by a second predicate and a sum",
            ScenarioKind::Correctness,
            b.build(),
            &["select", "refine", "sum", "clustered"],
        )
    }

    fn aggregate_batch(&self, batch: AggregateBatch<'_>, ranges: &[Predicate], intro: &[&str]) -> TestGenResult<Script> {
        let table = self.table(batch.table)?;
        let op = batch.op.as_str();
        let mut b = ScriptBuilder::new();
        b.comments(intro)
            .comment("")
            .comment("Query form in SQL:")
            .comment(format!(
                "SELECT {}({}) FROM {} WHERE {} >= _ AND {} < _;",
                op,
                batch.target,
                batch.table,
                batch.filter,
                batch.filter
            ))
            .comment("");
        for (i, range) in ranges.iter().enumerate() {
            let (s, f, a) = (format!("s{}", i), format!("f{}", i), format!("a{}", i));
            b.select(&s, table.column_ref(batch.filter), *range)
                .fetch(&f, table.column_ref(batch.target), &s);
            match batch.op {
                AggregateOp::Sum => b.sum(&a, &f),
                AggregateOp::Avg => b.avg(&a, &f),
            };
            b.print(&[a.as_str()]);
        }
        Ok(b.build())
    }

    fn unclustered_sums(&self, rng: &mut impl Rng) -> TestGenResult<Vec<Scenario>> {
        let ranges = plan_ranges(self.planner().with_min_offset(2), 0.005, 10, rng)?;
        let batch = |table: &'static str| AggregateBatch {
            table,
            filter: "col2",
            target: "col3",
            op: AggregateOp::Sum,
        };
        Ok(vec![
            self.scenario(
                25,
                "Sums over col2 ranges on the control table",
                ScenarioKind::Correctness,
                self.aggregate_batch(
                    batch(CTRL),
                    &ranges,
                    &["Test for a non-clustered select followed by an aggregate (control)"],
                )?,
                &["select", "sum", "control"],
            )?,
            self.scenario(
                26,
                "Sums over col2 ranges through the unclustered btree",
                ScenarioKind::Correctness,
                self.aggregate_batch(
                    batch(BTREE),
                    &ranges,
                    &["Test for a non-clustered index select followed by an aggregate"],
                )?,
                &["select", "sum", "unclustered"],
            )?,
        ])
    }

    fn frequent_value_sums(&self) -> TestGenResult<Scenario> {
        let table = self.table(BTREE)?;
        let (v1, v2) = self.dataset.frequent_values;
        let ranges = [Predicate::range(v1 - 1, v1 + 1), Predicate::range(v2 - 1, v2 + 1)];

        let mut b = ScriptBuilder::new();
        b.comments(&[
            "Test for an unclustered index select on heavily repeated values",
            "",
            "Query in SQL:",
        ]);
        for range in &ranges {
            b.comment(format!(
                "SELECT sum(col1) FROM tbl4 WHERE {};",
                sql_condition("col2", range)
            ));
        }
        b.comment("");
        for (i, range) in ranges.iter().enumerate() {
            let (s, f, a) = (format!("s{}", i + 1), format!("f{}", i + 1), format!("a{}", i + 1));
            b.select(&s, table.column_ref("col2"), *range)
                .fetch(&f, table.column_ref("col1"), &s)
                .sum(&a, &f)
                .print(&[a.as_str()]);
        }
        self.scenario(
            27,
            "Sums over the two injected frequent values of col2",
            ScenarioKind::Correctness,
            b.build(),
            &["select", "sum", "frequent"],
        )
    }

    fn unclustered_averages(&self, rng: &mut impl Rng) -> TestGenResult<Vec<Scenario>> {
        let ranges = plan_ranges(self.planner().with_min_offset(2), 0.01, 100, rng)?;
        let batch = |table: &'static str| AggregateBatch {
            table,
            filter: "col2",
            target: "col3",
            op: AggregateOp::Avg,
        };
        Ok(vec![
            self.scenario(
                28,
                "Many averages over col2 ranges on the control table",
                ScenarioKind::Correctness,
                self.aggregate_batch(
                    batch(CTRL),
                    &ranges,
                    &[
                        "Test for a non-clustered select followed by an aggregate (control, many queries)",
                        "Compare to test 29 for timing differences between B-tree and scan",
                    ],
                )?,
                &["select", "avg", "control"],
            )?,
            self.scenario(
                29,
                "Many averages over col2 ranges through the unclustered btree",
                ScenarioKind::Correctness,
                self.aggregate_batch(
                    batch(BTREE),
                    &ranges,
                    &["Test for a non-clustered index select followed by an aggregate (many queries)"],
                )?,
                &["select", "avg", "unclustered"],
            )?,
        ])
    }

    fn clustered_btree_range_selects(&self, rng: &mut impl Rng) -> TestGenResult<Scenario> {
        let ranges = self.narrow_ranges(rng)?;
        let script = self.projected_ranges(
            CLUSTERED_BTREE,
            &ranges,
            &[
                "tbl4_clustered_btree has a clustered btree on col3 and an unclustered sorted index on col2",
                "Testing for correctness; the select on col3 is expected to use the clustered index",
                "",
            ],
        )?;
        self.scenario(
            31,
            "Range selects on col3 through the clustered btree",
            ScenarioKind::Correctness,
            script,
            &["select", "fetch", "clustered"],
        )
    }

    fn clustered_btree_sums(&self, rng: &mut impl Rng) -> TestGenResult<Scenario> {
        let ranges = plan_ranges(self.planner().with_min_offset(2), 0.005, 5, rng)?;
        let script = self.aggregate_batch(
            AggregateBatch {
                table: CLUSTERED_BTREE,
                filter: "col2",
                target: "col3",
                op: AggregateOp::Sum,
            },
            &ranges,
            &["Test for a non-clustered index select followed by an aggregate"],
        )?;
        self.scenario(
            32,
            "Sums over col2 ranges through the unclustered sorted index",
            ScenarioKind::Correctness,
            script,
            &["select", "sum", "unclustered"],
        )
    }

    /// Six scenarios from `first`: selectivities 0.1% and 1%, each over the
    /// three tables, 20 averages apiece.
    fn selectivity_sweep(
        &self,
        first: u32,
        filter: &str,
        target: &str,
        rng: &mut impl Rng,
    ) -> TestGenResult<Vec<Scenario>> {
        let levels = [(0.001, 1, "0.1%"), (0.01, 2, "1%")];
        let mut scenarios = Vec::new();
        let mut number = first;
        for (selectivity, min_offset, label) in levels {
            for table in [CTRL, BTREE, CLUSTERED_BTREE] {
                let ranges = plan_ranges(
                    self.planner().with_min_offset(min_offset),
                    selectivity,
                    20,
                    rng,
                )?;
                let intro = format!("selectivity={}", label);
                let script = self.aggregate_batch(
                    AggregateBatch {
                        table,
                        filter,
                        target,
                        op: AggregateOp::Avg,
                    },
                    &ranges,
                    &["", intro.as_str()],
                )?;
                scenarios.push(self.scenario(
                    number,
                    &format!("Averages of {} over {} ranges at {} on {}", target, filter, label, table),
                    ScenarioKind::Correctness,
                    script,
                    &["select", "avg", "selectivity"],
                )?);
                number += 1;
            }
        }
        Ok(scenarios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colgen_oracle::Op;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn suite() -> ScenarioSuite {
        let config = GenConfig::minimal();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let gen = IndexSuiteGenerator::new(&config, &mut rng).unwrap();
        gen.generate(&mut rng).unwrap()
    }

    #[test]
    fn test_numbers_are_contiguous() {
        let suite = suite();
        let expected: Vec<u32> =
            (IndexSuiteGenerator::FIRST..=IndexSuiteGenerator::LAST).collect();
        assert_eq!(suite.numbers(), expected);
        assert_eq!(suite.data_files.len(), 3);
    }

    #[test]
    fn test_setup_scenarios_print_nothing() {
        let suite = suite();
        for number in [20, 21, 30] {
            let s = suite.scenario(number).unwrap();
            assert_eq!(s.kind, ScenarioKind::Setup);
            assert!(s.expected.is_empty());
            assert!(!s.checks_output());
            assert!(matches!(s.script.ops().last(), Some(Op::Shutdown)));
        }
        let text = suite.scenario(21).unwrap().script.to_string();
        assert!(text.contains("create(idx,db1.tbl4.col3,sorted,clustered)"));
        assert!(text.contains("load(\"/cs165/staff_test/data4_btree.csv\")"));
    }

    #[test]
    fn test_paired_scenarios_share_expected_output() {
        let suite = suite();
        for (control, indexed) in [(22, 23), (25, 26), (28, 29)] {
            assert_eq!(
                suite.scenario(control).unwrap().expected,
                suite.scenario(indexed).unwrap().expected,
                "scenarios {} and {}",
                control,
                indexed
            );
        }
    }

    #[test]
    fn test_aggregate_batches_print_one_line_per_query() {
        let suite = suite();
        assert_eq!(suite.scenario(25).unwrap().expected.lines().count(), 10);
        assert_eq!(suite.scenario(28).unwrap().expected.lines().count(), 100);
        assert_eq!(suite.scenario(32).unwrap().expected.lines().count(), 5);
        for number in 33..=44 {
            let expected = &suite.scenario(number).unwrap().expected;
            assert_eq!(expected.lines().count(), 20);
            assert!(expected.lines().all(|l| l.contains('.')));
        }
    }
}
