//! Fluent construction of query scripts.

use colgen_core::{Clustering, ColumnRef, IndexKind, JoinKind, Predicate, Table};
use colgen_oracle::{Op, Script, SelectTarget};

#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    script: Script,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, op: Op) -> &mut Self {
        self.script.push(op);
        self
    }

    /// `-- text`, or a bare `--` for an empty string.
    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Op::Comment(text.into()))
    }

    /// Several comment lines at once.
    pub fn comments(&mut self, lines: &[&str]) -> &mut Self {
        for line in lines {
            self.comment(*line);
        }
        self
    }

    /// `create(tbl,...)` followed by one `create(col,...)` per column.
    pub fn create_table(&mut self, table: &Table) -> &mut Self {
        self.push(Op::CreateTable {
            name: table.name().to_string(),
            db: table.db().to_string(),
            columns: table.columns().len(),
        });
        for name in table.column_names() {
            self.push(Op::CreateColumn {
                name: name.to_string(),
                db: table.db().to_string(),
                table: table.name().to_string(),
            });
        }
        self
    }

    pub fn create_index(
        &mut self,
        column: ColumnRef,
        kind: IndexKind,
        clustering: Clustering,
    ) -> &mut Self {
        self.push(Op::CreateIndex {
            column,
            kind,
            clustering,
        })
    }

    pub fn load(&mut self, path: impl Into<String>) -> &mut Self {
        self.push(Op::Load { path: path.into() })
    }

    pub fn select(&mut self, out: &str, column: ColumnRef, predicate: Predicate) -> &mut Self {
        self.push(Op::Select {
            out: out.to_string(),
            target: SelectTarget::Column(column),
            predicate,
        })
    }

    pub fn select_within(
        &mut self,
        out: &str,
        rows: &str,
        values: &str,
        predicate: Predicate,
    ) -> &mut Self {
        self.push(Op::Select {
            out: out.to_string(),
            target: SelectTarget::Refine {
                rows: rows.to_string(),
                values: values.to_string(),
            },
            predicate,
        })
    }

    pub fn fetch(&mut self, out: &str, column: ColumnRef, rows: &str) -> &mut Self {
        self.push(Op::Fetch {
            out: out.to_string(),
            column,
            rows: rows.to_string(),
        })
    }

    /// `outs.0,outs.1=join(left.0,left.1,right.0,right.1,kind)` where each
    /// side is `(values, rows)`.
    pub fn join(
        &mut self,
        outs: (&str, &str),
        left: (&str, &str),
        right: (&str, &str),
        kind: JoinKind,
    ) -> &mut Self {
        self.push(Op::Join {
            left_out: outs.0.to_string(),
            right_out: outs.1.to_string(),
            left_values: left.0.to_string(),
            left_rows: left.1.to_string(),
            right_values: right.0.to_string(),
            right_rows: right.1.to_string(),
            kind,
        })
    }

    pub fn sum(&mut self, out: &str, input: &str) -> &mut Self {
        self.push(Op::Sum {
            out: out.to_string(),
            input: input.to_string(),
        })
    }

    pub fn avg(&mut self, out: &str, input: &str) -> &mut Self {
        self.push(Op::Avg {
            out: out.to_string(),
            input: input.to_string(),
        })
    }

    pub fn print(&mut self, handles: &[&str]) -> &mut Self {
        self.push(Op::Print {
            handles: handles.iter().map(|h| h.to_string()).collect(),
        })
    }

    pub fn shutdown(&mut self) -> &mut Self {
        self.push(Op::Shutdown)
    }

    /// Take the script built so far, leaving the builder empty.
    pub fn build(&mut self) -> Script {
        std::mem::take(&mut self.script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colgen_core::Column;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builds_setup_script() {
        let mut table = Table::new("db1", "tbl5_sel1", 2);
        table.push_column(Column::new("col1", vec![1, 2])).unwrap();
        table.push_column(Column::new("col2", vec![3, 4])).unwrap();

        let script = ScriptBuilder::new()
            .comment("Create Table")
            .create_table(&table)
            .create_index(table.column_ref("col1"), IndexKind::Btree, Clustering::Unclustered)
            .load("/data/data5_selectivity1.csv")
            .comment("")
            .shutdown()
            .build();

        assert_eq!(
            script.to_string(),
            "-- Create Table
create(tbl,\"tbl5_sel1\",db1,2)
create(col,\"col1\",db1.tbl5_sel1)
create(col,\"col2\",db1.tbl5_sel1)
create(idx,db1.tbl5_sel1.col1,btree,unclustered)
load(\"/data/data5_selectivity1.csv\")
--
shutdown
"
        );
        assert!(!script.prints());
    }

    #[test]
    fn test_builds_query_script() {
        let fact = ColumnRef::new("db1", "tbl5_fact", "col2");
        let mut builder = ScriptBuilder::new();
        builder
            .select("p1", fact.clone(), Predicate::below(300))
            .fetch("f1", fact, "p1")
            .join(("t1", "t2"), ("f1", "p1"), ("f1", "p1"), JoinKind::NaiveHash)
            .sum("a1", "f1")
            .avg("a2", "f1")
            .print(&["a1", "a2"]);
        let text = builder.build().to_string();
        assert_eq!(
            text,
            "p1=select(db1.tbl5_fact.col2,null,300)
f1=fetch(db1.tbl5_fact.col2,p1)
t1,t2=join(f1,p1,f1,p1,naive-hash)
a1=sum(f1)
a2=avg(f1)
print(a1,a2)
"
        );
        assert!(builder.build().is_empty());
    }
}
