//! Script interpretation over an in-memory catalog.

use crate::eval::{self, Aggregate};
use crate::format::OutputBuilder;
use crate::script::{Op, Script, SelectTarget};
use crate::{OracleError, OracleResult};
use colgen_core::{Catalog, RowSet};
use std::collections::HashMap;

/// What a handle holds.
#[derive(Debug, Clone, PartialEq)]
enum Binding {
    Rows(RowSet),
    Values(Vec<i64>),
    Scalar(Aggregate),
}

impl Binding {
    fn kind(&self) -> &'static str {
        match self {
            Binding::Rows(_) => "row ids",
            Binding::Values(_) => "values",
            Binding::Scalar(_) => "a scalar",
        }
    }

    /// Rows and values both print as a sequence of integers.
    fn sequence(&self) -> Option<Vec<i64>> {
        match self {
            Binding::Rows(rows) => Some(rows.iter().map(|id| id as i64).collect()),
            Binding::Values(values) => Some(values.clone()),
            Binding::Scalar(_) => None,
        }
    }
}

/// Runs a script against in-memory tables and collects what it prints.
///
/// DDL, index creation, `load` and `shutdown` are accepted and ignored:
/// the catalog already holds the loaded data.
pub struct Interpreter<'c> {
    catalog: &'c Catalog,
    bindings: HashMap<String, Binding>,
    output: OutputBuilder,
}

impl<'c> Interpreter<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            bindings: HashMap::new(),
            output: OutputBuilder::new(),
        }
    }

    /// Evaluate every operation and return the expected output.
    pub fn run(mut self, script: &Script) -> OracleResult<String> {
        for op in script.ops() {
            self.step(op)?;
        }
        Ok(self.output.finish())
    }

    fn step(&mut self, op: &Op) -> OracleResult<()> {
        match op {
            Op::Comment(_)
            | Op::CreateTable { .. }
            | Op::CreateColumn { .. }
            | Op::CreateIndex { .. }
            | Op::Load { .. }
            | Op::Shutdown => {}
            Op::Select {
                out,
                target,
                predicate,
            } => {
                let rows = match target {
                    SelectTarget::Column(column) => {
                        eval::select(self.catalog.resolve(column)?, predicate)
                    }
                    SelectTarget::Refine { rows, values } => {
                        eval::select_within(self.rows(rows)?, self.values(values)?, predicate)?
                    }
                };
                tracing::trace!(handle = %out, rows = rows.len(), "select");
                self.bind(out, Binding::Rows(rows));
            }
            Op::Fetch { out, column, rows } => {
                let values = eval::fetch(self.catalog.resolve(column)?, self.rows(rows)?)?;
                self.bind(out, Binding::Values(values));
            }
            Op::Join {
                left_out,
                right_out,
                left_values,
                left_rows,
                right_values,
                right_rows,
                kind,
            } => {
                let result = eval::join(
                    self.values(left_values)?,
                    self.rows(left_rows)?,
                    self.values(right_values)?,
                    self.rows(right_rows)?,
                    *kind,
                )?;
                self.bind(left_out, Binding::Rows(result.left));
                self.bind(right_out, Binding::Rows(result.right));
            }
            Op::Sum { out, input } => {
                let aggregate = Aggregate::sum_of(self.values(input)?);
                self.bind(out, Binding::Scalar(aggregate));
            }
            Op::Avg { out, input } => {
                let aggregate = Aggregate::avg_of(self.values(input)?);
                self.bind(out, Binding::Scalar(aggregate));
            }
            Op::Print { handles } => self.print(handles)?,
        }
        Ok(())
    }

    fn print(&mut self, handles: &[String]) -> OracleResult<()> {
        let bindings = handles
            .iter()
            .map(|h| self.lookup(h))
            .collect::<OracleResult<Vec<_>>>()?;

        let scalars: Vec<Aggregate> = bindings
            .iter()
            .filter_map(|b| match b {
                Binding::Scalar(a) => Some(*a),
                _ => None,
            })
            .collect();
        if scalars.len() == bindings.len() {
            self.output.scalar(&scalars);
            return Ok(());
        }
        if !scalars.is_empty() {
            return Err(OracleError::MixedPrint(handles.join(",")));
        }

        let columns: Vec<Vec<i64>> = bindings.iter().filter_map(|b| b.sequence()).collect();
        match columns.as_slice() {
            [single] => {
                self.output.sequence(single);
            }
            _ => {
                self.output.columns(&columns)?;
            }
        }
        Ok(())
    }

    fn bind(&mut self, handle: &str, binding: Binding) {
        self.bindings.insert(handle.to_string(), binding);
    }

    fn lookup(&self, handle: &str) -> OracleResult<&Binding> {
        self.bindings
            .get(handle)
            .ok_or_else(|| OracleError::UnknownHandle(handle.to_string()))
    }

    fn rows(&self, handle: &str) -> OracleResult<&RowSet> {
        match self.lookup(handle)? {
            Binding::Rows(rows) => Ok(rows),
            other => Err(OracleError::wrong_binding(handle, "row ids", other.kind())),
        }
    }

    fn values(&self, handle: &str) -> OracleResult<&[i64]> {
        match self.lookup(handle)? {
            Binding::Values(values) => Ok(values),
            other => Err(OracleError::wrong_binding(handle, "values", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colgen_core::{Column, Table};
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        let mut t = Table::new("db1", "tbl", 3);
        t.push_column(Column::new("col1", vec![1, 2, 3])).unwrap();
        t.push_column(Column::new("col2", vec![5, 15, 5])).unwrap();
        t.push_column(Column::new("col3", vec![10, 20, 30])).unwrap();

        let mut l = Table::new("db1", "left", 2);
        l.push_column(Column::new("k", vec![1, 2])).unwrap();
        let mut r = Table::new("db1", "right", 2);
        r.push_column(Column::new("k", vec![2, 2])).unwrap();
        [t, l, r].into_iter().collect()
    }

    fn run(source: &str) -> OracleResult<String> {
        let catalog = catalog();
        Interpreter::new(&catalog).run(&Script::parse(source)?)
    }

    #[test]
    fn test_select_fetch_aggregates() {
        let out = run("\
create(tbl,\"tbl\",db1,3)
load(\"/x/data.csv\")
s1=select(db1.tbl.col2,4,6)
f1=fetch(db1.tbl.col3,s1)
a1=sum(f1)
a2=avg(f1)
print(f1)
print(a1,a2)
shutdown
")
        .unwrap();
        assert_eq!(out, "10\n30\n\n40,20.00\n");
    }

    #[test]
    fn test_empty_selection_prints_zeroes() {
        let out = run("\
s1=select(db1.tbl.col1,100,null)
f1=fetch(db1.tbl.col3,s1)
a1=sum(f1)
a2=avg(f1)
print(a1)
print(a2)
")
        .unwrap();
        assert_eq!(out, "0\n0.00\n");
    }

    #[test]
    fn test_join_prints_row_ids() {
        let out = run("\
p1=select(db1.left.k,null,null)
p2=select(db1.right.k,null,null)
f1=fetch(db1.left.k,p1)
f2=fetch(db1.right.k,p2)
t1,t2=join(f1,p1,f2,p2,nested-loop)
print(t1,t2)
")
        .unwrap();
        assert_eq!(out, "1,0\n1,1\n");
    }

    #[test]
    fn test_refine_select() {
        let out = run("\
s1=select(db1.tbl.col1,2,null)
f1=fetch(db1.tbl.col3,s1)
s2=select(s1,f1,25,null)
f2=fetch(db1.tbl.col2,s2)
print(f2)
")
        .unwrap();
        assert_eq!(out, "5\n");
    }

    #[test]
    fn test_binding_errors() {
        assert_eq!(
            run("f1=fetch(db1.tbl.col1,s9)"),
            Err(OracleError::UnknownHandle("s9".to_string()))
        );
        assert!(matches!(
            run("s1=select(db1.tbl.col1,0,9)\na1=sum(s1)"),
            Err(OracleError::WrongBinding { .. })
        ));
        assert!(matches!(
            run("s1=select(db1.tbl.col1,0,9)\nf1=fetch(db1.tbl.col1,s1)\na1=sum(f1)\nprint(a1,f1)"),
            Err(OracleError::MixedPrint(_))
        ));
        assert!(matches!(
            run("s1=select(db1.nope.col1,0,9)"),
            Err(OracleError::Core(_))
        ));
    }
}
