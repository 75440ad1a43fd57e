//! Join scenarios (45-59) over the star-shaped join dataset.
//!
//! Predicates here are upper bounds only (`null, bound`), so no draws are
//! taken after the dataset. Paired scenarios differ only in the join kind.

use super::sql_condition;
use crate::script::ScriptBuilder;
use crate::{DataFile, GenConfig, Scenario, ScenarioKind, ScenarioSuite, TestGenResult};
use colgen_core::{Catalog, JoinKind, Predicate, Table};
use colgen_datagen::{IndexDataset, JoinDataset, SelectivityPlanner, ZipfianDistribution, DB};
use colgen_oracle::Script;
use rand::Rng;

const DATA_FILES: [(&str, &str); 5] = [
    ("data5_fact.csv", JoinDataset::FACT),
    ("data5_dimension1.csv", JoinDataset::DIM1),
    ("data5_dimension2.csv", JoinDataset::DIM2),
    ("data5_selectivity1.csv", JoinDataset::SEL1),
    ("data5_selectivity2.csv", JoinDataset::SEL2),
];

/// One side of a `select -> fetch` join input.
struct JoinSide<'q> {
    table: &'q str,
    /// Column the predicate filters on
    filter: &'q str,
    /// Column holding the join key
    key: &'q str,
    predicate: Predicate,
}

/// A column fetched through a join result and aggregated.
struct JoinOutput<'q> {
    handle: &'q str,
    table: &'q str,
    column: &'q str,
    /// `t1` for the left side, `t2` for the right
    rows: &'q str,
    sum: bool,
}

/// Generates the join suite with oracle-computed expected outputs
pub struct JoinSuiteGenerator<'a> {
    config: &'a GenConfig,
    dataset: JoinDataset,
    catalog: Catalog,
}

impl<'a> JoinSuiteGenerator<'a> {
    pub const FIRST: u32 = 45;
    pub const LAST: u32 = 59;

    /// Generate the dataset. Consumes the dataset's draws from `rng`.
    pub fn new(config: &'a GenConfig, rng: &mut impl Rng) -> TestGenResult<Self> {
        let zipf = ZipfianDistribution::new(config.zipf_skew, config.zipf_domain)?;
        let dataset = JoinDataset::generate(config.join_sizes, zipf, rng)?;
        let catalog = dataset.tables().into_iter().cloned().collect();
        Ok(Self {
            config,
            dataset,
            catalog,
        })
    }

    pub fn dataset(&self) -> &JoinDataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Build scenarios 45 through 59.
    pub fn generate(&self) -> TestGenResult<ScenarioSuite> {
        let sizes = self.dataset.sizes;
        let scenarios = vec![
            self.setup()?,
            self.many_to_one(46, 0.15, JoinKind::NestedLoop, false)?,
            self.many_to_one(47, 0.15, JoinKind::Hash, false)?,
            self.many_to_many(48, 0.15, JoinKind::NestedLoop)?,
            self.many_to_many(49, 0.15, JoinKind::Hash)?,
            self.many_to_one(50, 0.8, JoinKind::Hash, true)?,
            self.many_to_many(51, 0.8, JoinKind::Hash)?,
        ]
        .into_iter()
        .chain(self.kind_comparison(52, 0.1, JoinKind::NestedLoop, JoinKind::NaiveHash)?)
        .chain(self.kind_comparison(56, 0.8, JoinKind::NaiveHash, JoinKind::GraceHash)?)
        .collect::<Vec<_>>();

        tracing::info!(
            fact = sizes.fact,
            dim1 = sizes.dim1,
            dim2 = sizes.dim2,
            select = sizes.select,
            scenarios = scenarios.len(),
            "generated join suite"
        );
        Ok(ScenarioSuite {
            name: "join".to_string(),
            seed: self.config.seed,
            data_files: self.data_files()?,
            scenarios,
        })
    }

    fn data_files(&self) -> TestGenResult<Vec<DataFile>> {
        let mut files = Vec::new();
        for (file, table) in DATA_FILES {
            files.push(DataFile::new(file, self.table(table)?.clone()));
        }
        Ok(files)
    }

    fn table(&self, name: &str) -> TestGenResult<&Table> {
        Ok(self.catalog.table(DB, name)?)
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

    /// Create and load all five tables, without indexes.
    fn setup(&self) -> TestGenResult<Scenario> {
        let mut b = ScriptBuilder::new();
        b.comments(&["Creates tables for join tests", "without any indexes"]);
        for (i, (file, table)) in DATA_FILES.into_iter().enumerate() {
            if i > 0 {
                b.comment("");
            }
            b.create_table(self.table(table)?)
                .load(self.config.load_path(file));
        }
        b.comment("")
            .comment("Testing that the data and their indexes are durable on disk.")
            .shutdown();
        self.scenario(
            45,
            "Create and load the join tables",
            ScenarioKind::Setup,
            b.build(),
            &["setup", "join"],
        )
    }

    /// Selects on both sides, fetches the keys and joins them into `t1,t2`.
    fn join_prefix(
        &self,
        b: &mut ScriptBuilder,
        left: &JoinSide<'_>,
        right: &JoinSide<'_>,
        kind: JoinKind,
    ) -> TestGenResult<()> {
        let (lt, rt) = (self.table(left.table)?, self.table(right.table)?);
        b.select("p1", lt.column_ref(left.filter), left.predicate)
            .select("p2", rt.column_ref(right.filter), right.predicate)
            .fetch("f1", lt.column_ref(left.key), "p1")
            .fetch("f2", rt.column_ref(right.key), "p2")
            .join(("t1", "t2"), ("f1", "p1"), ("f2", "p2"), kind);
        Ok(())
    }

    /// Fetch two columns through the join result, aggregate and print them.
    fn join_outputs(&self, b: &mut ScriptBuilder, outputs: [JoinOutput<'_>; 2]) -> TestGenResult<()> {
        for output in &outputs {
            let table = self.table(output.table)?;
            b.fetch(output.handle, table.column_ref(output.column), output.rows);
        }
        for (i, output) in outputs.iter().enumerate() {
            let a = format!("a{}", i + 1);
            if output.sum {
                b.sum(&a, output.handle);
            } else {
                b.avg(&a, output.handle);
            }
        }
        b.print(&["a1", "a2"]);
        Ok(())
    }

    fn sql_comment(
        b: &mut ScriptBuilder,
        intro: &[&str],
        select: &str,
        from: &str,
        on: &str,
        left: &JoinSide<'_>,
        right: &JoinSide<'_>,
    ) {
        b.comments(intro).comment("Query in SQL:").comment(format!(
            "SELECT {} FROM {} WHERE {} AND {} AND {};",
            select,
            from,
            on,
            sql_condition(&format!("{}.{}", left.table, left.filter), &left.predicate),
            sql_condition(&format!("{}.{}", right.table, right.filter), &right.predicate),
        ));
        b.comment("").comment("");
    }

    fn fact_planner(&self) -> SelectivityPlanner {
        SelectivityPlanner::new(IndexDataset::domain_for(self.dataset.sizes.fact))
    }

    /// Fact rows joined to the dimension-2 primary key. With `dimension_sum`
    /// the second aggregate sums a dimension column instead of fact col3.
    fn many_to_one(
        &self,
        number: u32,
        selectivity: f64,
        kind: JoinKind,
        dimension_sum: bool,
    ) -> TestGenResult<Scenario> {
        let left = JoinSide {
            table: JoinDataset::FACT,
            filter: "col2",
            key: "col4",
            predicate: self.fact_planner().plan_upper(selectivity)?,
        };
        let right = JoinSide {
            table: JoinDataset::DIM2,
            filter: "col1",
            key: "col1",
            predicate: SelectivityPlanner::new(self.dataset.sizes.dim2 as i64)
                .plan_upper(selectivity)?,
        };
        let (select, second) = if dimension_sum {
            (
                "avg(tbl5_fact.col2), sum(tbl5_dim2.col2)",
                JoinOutput {
                    handle: "col2t2joined",
                    table: JoinDataset::DIM2,
                    column: "col2",
                    rows: "t2",
                    sum: true,
                },
            )
        } else {
            (
                "avg(tbl5_fact.col2), sum(tbl5_fact.col3)",
                JoinOutput {
                    handle: "col3joined",
                    table: JoinDataset::FACT,
                    column: "col3",
                    rows: "t1",
                    sum: true,
                },
            )
        };

        let label = kind.as_str();
        let intro = if dimension_sum {
            format!("Join test 3 - {} many-to-one with larger selectivities.", label)
        } else {
            format!("Join test 1 - {} many-to-one.", label)
        };
        let mut b = ScriptBuilder::new();
        Self::sql_comment(
            &mut b,
            &[intro.as_str(), "Select + Join + aggregation"],
            select,
            "tbl5_fact,tbl5_dim2",
            "tbl5_fact.col4=tbl5_dim2.col1",
            &left,
            &right,
        );
        self.join_prefix(&mut b, &left, &right, kind)?;
        self.join_outputs(
            &mut b,
            [
                JoinOutput {
                    handle: "col2joined",
                    table: JoinDataset::FACT,
                    column: "col2",
                    rows: "t1",
                    sum: false,
                },
                second,
            ],
        )?;
        self.scenario(
            number,
            &format!("Many-to-one {} join of fact and dimension 2 at {}", label, selectivity),
            ScenarioKind::Correctness,
            b.build(),
            &["join", "many-to-one", label],
        )
    }

    /// Zipfian fact keys joined to Zipfian dimension-1 keys.
    fn many_to_many(
        &self,
        number: u32,
        selectivity: f64,
        kind: JoinKind,
    ) -> TestGenResult<Scenario> {
        let left = JoinSide {
            table: JoinDataset::FACT,
            filter: "col2",
            key: "col1",
            predicate: self.fact_planner().plan_upper(selectivity)?,
        };
        let right = JoinSide {
            table: JoinDataset::DIM1,
            filter: "col3",
            key: "col1",
            predicate: SelectivityPlanner::new(IndexDataset::domain_for(self.dataset.sizes.dim1))
                .plan_upper(selectivity)?,
        };
        let label = kind.as_str();
        let intro = format!("Join test 2 - {} many-to-many at selectivity {}.", label, selectivity);
        let mut b = ScriptBuilder::new();
        Self::sql_comment(
            &mut b,
            &[intro.as_str(), "Select + Join + aggregation"],
            "sum(tbl5_fact.col2), avg(tbl5_dim1.col1)",
            "tbl5_fact,tbl5_dim1",
            "tbl5_fact.col1=tbl5_dim1.col1",
            &left,
            &right,
        );
        self.join_prefix(&mut b, &left, &right, kind)?;
        self.join_outputs(
            &mut b,
            [
                JoinOutput {
                    handle: "col2joined",
                    table: JoinDataset::FACT,
                    column: "col2",
                    rows: "t1",
                    sum: true,
                },
                JoinOutput {
                    handle: "col1joined",
                    table: JoinDataset::DIM1,
                    column: "col1",
                    rows: "t2",
                    sum: false,
                },
            ],
        )?;
        self.scenario(
            number,
            &format!("Many-to-many {} join of fact and dimension 1 at {}", label, selectivity),
            ScenarioKind::Correctness,
            b.build(),
            &["join", "many-to-many", label],
        )
    }

    /// Four scenarios from `first`: a correctness pair joining with `kind1`
    /// and `kind2`, then the same two joins without output, for timing.
    fn kind_comparison(
        &self,
        first: u32,
        selectivity: f64,
        kind1: JoinKind,
        kind2: JoinKind,
    ) -> TestGenResult<Vec<Scenario>> {
        let planner = SelectivityPlanner::new(IndexDataset::domain_for(self.dataset.sizes.select));
        let bound = planner.plan_upper(selectivity)?;
        let left = JoinSide {
            table: JoinDataset::SEL1,
            filter: "col1",
            key: "col1",
            predicate: bound,
        };
        let right = JoinSide {
            table: JoinDataset::SEL2,
            filter: "col2",
            key: "col1",
            predicate: bound,
        };

        let mut scenarios = Vec::new();
        for (offset, checked) in [(0, true), (2, false)] {
            for (i, kind) in [kind1, kind2].into_iter().enumerate() {
                let number = first + offset + i as u32;
                let intro = format!(
                    "Join performance test - {} with selectivities {} and {}.",
                    kind, selectivity, selectivity
                );
                let mut b = ScriptBuilder::new();
                Self::sql_comment(
                    &mut b,
                    &[intro.as_str(), "Select + Join + aggregation"],
                    "sum(tbl5_sel1.col1), avg(tbl5_sel2.col2)",
                    "tbl5_sel1, tbl5_sel2",
                    "tbl5_sel1.col1=tbl5_sel2.col1",
                    &left,
                    &right,
                );
                self.join_prefix(&mut b, &left, &right, kind)?;
                let (scenario_kind, title) = if checked {
                    self.join_outputs(
                        &mut b,
                        [
                            JoinOutput {
                                handle: "col1joined",
                                table: JoinDataset::SEL1,
                                column: "col1",
                                rows: "t1",
                                sum: true,
                            },
                            JoinOutput {
                                handle: "col2joined",
                                table: JoinDataset::SEL2,
                                column: "col2",
                                rows: "t2",
                                sum: false,
                            },
                        ],
                    )?;
                    (ScenarioKind::Correctness, "correctness")
                } else {
                    (ScenarioKind::Performance, "performance")
                };
                scenarios.push(self.scenario(
                    number,
                    &format!("{} join {} at selectivity {}", kind, title, selectivity),
                    scenario_kind,
                    b.build(),
                    &["join", title, kind.as_str()],
                )?);
            }
        }
        Ok(scenarios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colgen_datagen::JoinSizes;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn suite(config: &GenConfig) -> ScenarioSuite {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        JoinSuiteGenerator::new(config, &mut rng)
            .unwrap()
            .generate()
            .unwrap()
    }

    #[test]
    fn test_numbers_are_contiguous() {
        let suite = suite(&GenConfig::minimal());
        let expected: Vec<u32> = (JoinSuiteGenerator::FIRST..=JoinSuiteGenerator::LAST).collect();
        assert_eq!(suite.numbers(), expected);
        assert_eq!(suite.data_files.len(), 5);
        assert_eq!(suite.data_files[1].file_name, "data5_dimension1.csv");
    }

    #[test]
    fn test_join_kind_pairs_agree() {
        let suite = suite(&GenConfig::minimal());
        for (a, b) in [(46, 47), (48, 49), (52, 53), (56, 57)] {
            let (a, b) = (suite.scenario(a).unwrap(), suite.scenario(b).unwrap());
            assert_eq!(a.expected, b.expected);
            assert_ne!(a.script, b.script);
        }
    }

    #[test]
    fn test_timing_scenarios_print_nothing() {
        let suite = suite(&GenConfig::minimal());
        for number in [54, 55, 58, 59] {
            let s = suite.scenario(number).unwrap();
            assert_eq!(s.kind, ScenarioKind::Performance);
            assert_eq!(s.expected, "");
        }
    }

    #[test]
    fn test_upper_bounds_follow_selectivity() {
        let config = GenConfig::minimal().with_join_sizes(JoinSizes {
            fact: 1_000,
            dim1: 500,
            dim2: 200,
            select: 1_000,
        });
        let suite = suite(&config);
        let text = suite.scenario(46).unwrap().script.to_string();
        assert!(text.contains("p1=select(db1.tbl5_fact.col2,null,30)"));
        assert!(text.contains("p2=select(db1.tbl5_dim2.col1,null,30)"));
        assert!(text.contains("col3joined=fetch(db1.tbl5_fact.col3,t1)"));

        let text = suite.scenario(56).unwrap().script.to_string();
        assert!(text.contains("p1=select(db1.tbl5_sel1.col1,null,160)"));
        assert!(text.contains("t1,t2=join(f1,p1,f2,p2,naive-hash)"));
    }

    #[test]
    fn test_fact_col3_sum_counts_join_pairs() {
        let config = GenConfig::minimal();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let gen = JoinSuiteGenerator::new(&config, &mut rng).unwrap();
        // fact/5 = 100 and dim2 = 100, so both bounds are 15
        let scenario = gen.many_to_one(46, 0.15, JoinKind::Hash, false).unwrap();
        let (_, sum) = scenario.expected.trim_end().split_once(',').unwrap();

        let fact = gen.dataset().fact.values("col4").unwrap();
        let fact_col2 = gen.dataset().fact.values("col2").unwrap();
        let dim2 = gen.dataset().dim2.values("col1").unwrap();
        let pairs = fact
            .iter()
            .zip(fact_col2)
            .filter(|(_, c2)| **c2 < 15)
            .map(|(k, _)| dim2.iter().filter(|d| **d < 15 && *d == k).count())
            .sum::<usize>();
        assert_eq!(sum, pairs.to_string());
    }
}
