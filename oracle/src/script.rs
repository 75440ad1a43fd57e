//! Query scripts.
//!
//! One operation per line:
//!
//! ```text
//! create(tbl,"tbl4",db1,4)
//! create(col,"col1",db1.tbl4)
//! create(idx,db1.tbl4.col3,sorted,clustered)
//! load("/data/data4_btree.csv")
//! s1=select(db1.tbl4.col3,10,20)
//! f1=fetch(db1.tbl4.col2,s1)
//! s2=select(s1,f1,null,500)
//! t1,t2=join(f1,s1,f2,s2,hash)
//! a1=sum(f1)
//! print(a1,a2)
//! shutdown
//! -- comment
//! ```

use crate::{OracleError, OracleResult};
use colgen_core::{Bound, Clustering, ColumnRef, IndexKind, JoinKind, Predicate};
use regex_lite::Regex;
use std::fmt;

/// What a select scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    /// A base column.
    Column(ColumnRef),
    /// The values fetched for a prior select's rows.
    Refine { rows: String, values: String },
}

impl fmt::Display for SelectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectTarget::Column(column) => write!(f, "{}", column),
            SelectTarget::Refine { rows, values } => write!(f, "{},{}", rows, values),
        }
    }
}

/// A single script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Comment(String),
    CreateTable {
        name: String,
        db: String,
        columns: usize,
    },
    CreateColumn {
        name: String,
        db: String,
        table: String,
    },
    CreateIndex {
        column: ColumnRef,
        kind: IndexKind,
        clustering: Clustering,
    },
    Load {
        path: String,
    },
    Select {
        out: String,
        target: SelectTarget,
        predicate: Predicate,
    },
    Fetch {
        out: String,
        column: ColumnRef,
        rows: String,
    },
    Join {
        left_out: String,
        right_out: String,
        left_values: String,
        left_rows: String,
        right_values: String,
        right_rows: String,
        kind: JoinKind,
    },
    Sum {
        out: String,
        input: String,
    },
    Avg {
        out: String,
        input: String,
    },
    Print {
        handles: Vec<String>,
    },
    Shutdown,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Comment(text) if text.is_empty() => f.write_str("--"),
            Op::Comment(text) => write!(f, "-- {}", text),
            Op::CreateTable { name, db, columns } => {
                write!(f, "create(tbl,\"{}\",{},{})", name, db, columns)
            }
            Op::CreateColumn { name, db, table } => {
                write!(f, "create(col,\"{}\",{}.{})", name, db, table)
            }
            Op::CreateIndex {
                column,
                kind,
                clustering,
            } => write!(f, "create(idx,{},{},{})", column, kind, clustering),
            Op::Load { path } => write!(f, "load(\"{}\")", path),
            Op::Select {
                out,
                target,
                predicate,
            } => write!(f, "{}=select({},{})", out, target, predicate),
            Op::Fetch { out, column, rows } => write!(f, "{}=fetch({},{})", out, column, rows),
            Op::Join {
                left_out,
                right_out,
                left_values,
                left_rows,
                right_values,
                right_rows,
                kind,
            } => write!(
                f,
                "{},{}=join({},{},{},{},{})",
                left_out, right_out, left_values, left_rows, right_values, right_rows, kind
            ),
            Op::Sum { out, input } => write!(f, "{}=sum({})", out, input),
            Op::Avg { out, input } => write!(f, "{}=avg({})", out, input),
            Op::Print { handles } => write!(f, "print({})", handles.join(",")),
            Op::Shutdown => f.write_str("shutdown"),
        }
    }
}

/// An ordered list of operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    ops: Vec<Op>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether any line produces output.
    pub fn prints(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, Op::Print { .. }))
    }

    /// Parse script text. Blank lines are skipped.
    pub fn parse(source: &str) -> OracleResult<Self> {
        let pattern = Regex::new(CALL_PATTERN)
            .map_err(|e| OracleError::parse(0, format!("invalid call pattern: {}", e)))?;
        let mut script = Script::new();
        for (i, line) in source.lines().enumerate() {
            if let Some(op) = parse_line(&pattern, i + 1, line)? {
                script.push(op);
            }
        }
        Ok(script)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            writeln!(f, "{}", op)?;
        }
        Ok(())
    }
}

impl FromIterator<Op> for Script {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

/// `[out[,out]=]name(args)`
const CALL_PATTERN: &str =
    r"^(?:([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)?)\s*=\s*)?([a-z]+)\((.*)\)$";

fn unquote(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}

fn parse_bound(line: usize, s: &str) -> OracleResult<Bound> {
    match s.trim() {
        "null" => Ok(Bound::Unbounded),
        other => other
            .parse::<i64>()
            .map(Bound::Value)
            .map_err(|_| OracleError::parse(line, format!("invalid bound '{}'", other))),
    }
}

fn parse_ref(line: usize, s: &str) -> OracleResult<ColumnRef> {
    s.parse()
        .map_err(|e: colgen_core::CoreError| OracleError::parse(line, e.to_string()))
}

fn parse_line(pattern: &Regex, line: usize, raw: &str) -> OracleResult<Option<Op>> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Some(comment) = text.strip_prefix("--") {
        return Ok(Some(Op::Comment(comment.trim_start().to_string())));
    }
    if text == "shutdown" {
        return Ok(Some(Op::Shutdown));
    }

    let caps = pattern
        .captures(text)
        .ok_or_else(|| OracleError::parse(line, format!("unrecognised line '{}'", text)))?;
    let outs: Vec<String> = caps
        .get(1)
        .map(|m| m.as_str().split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default();
    let name = &caps[2];
    let args: Vec<&str> = caps[3].split(',').map(str::trim).collect();

    let arity = |expected: usize| -> OracleResult<()> {
        if args.len() != expected {
            return Err(OracleError::parse(
                line,
                format!("{} expects {} arguments, got {}", name, expected, args.len()),
            ));
        }
        Ok(())
    };
    let single_out = || -> OracleResult<String> {
        match outs.as_slice() {
            [out] => Ok(out.clone()),
            _ => Err(OracleError::parse(line, format!("{} needs one result handle", name))),
        }
    };

    let op = match name {
        "create" => match args.first().copied() {
            Some("tbl") => {
                arity(4)?;
                let columns = args[3]
                    .parse()
                    .map_err(|_| OracleError::parse(line, "invalid column count"))?;
                Op::CreateTable {
                    name: unquote(args[1]).to_string(),
                    db: args[2].to_string(),
                    columns,
                }
            }
            Some("col") => {
                arity(3)?;
                let (db, table) = args[2]
                    .split_once('.')
                    .ok_or_else(|| OracleError::parse(line, "expected db.table"))?;
                Op::CreateColumn {
                    name: unquote(args[1]).to_string(),
                    db: db.to_string(),
                    table: table.to_string(),
                }
            }
            Some("idx") => {
                arity(4)?;
                Op::CreateIndex {
                    column: parse_ref(line, args[1])?,
                    kind: args[2]
                        .parse()
                        .map_err(|e: colgen_core::CoreError| OracleError::parse(line, e.to_string()))?,
                    clustering: args[3]
                        .parse()
                        .map_err(|e: colgen_core::CoreError| OracleError::parse(line, e.to_string()))?,
                }
            }
            _ => return Err(OracleError::parse(line, "unknown create target")),
        },
        "load" => {
            arity(1)?;
            Op::Load {
                path: unquote(args[0]).to_string(),
            }
        }
        "select" => {
            let out = single_out()?;
            let (target, low, high) = match args.as_slice() {
                [column, low, high] => (SelectTarget::Column(parse_ref(line, column)?), low, high),
                [rows, values, low, high] => (
                    SelectTarget::Refine {
                        rows: rows.to_string(),
                        values: values.to_string(),
                    },
                    low,
                    high,
                ),
                _ => return Err(OracleError::parse(line, "select expects 3 or 4 arguments")),
            };
            Op::Select {
                out,
                target,
                predicate: Predicate::new(parse_bound(line, low)?, parse_bound(line, high)?),
            }
        }
        "fetch" => {
            arity(2)?;
            Op::Fetch {
                out: single_out()?,
                column: parse_ref(line, args[0])?,
                rows: args[1].to_string(),
            }
        }
        "join" => {
            arity(5)?;
            let [left_out, right_out] = outs.as_slice() else {
                return Err(OracleError::parse(line, "join needs two result handles"));
            };
            Op::Join {
                left_out: left_out.clone(),
                right_out: right_out.clone(),
                left_values: args[0].to_string(),
                left_rows: args[1].to_string(),
                right_values: args[2].to_string(),
                right_rows: args[3].to_string(),
                kind: args[4]
                    .parse()
                    .map_err(|e: colgen_core::CoreError| OracleError::parse(line, e.to_string()))?,
            }
        }
        "sum" | "avg" => {
            arity(1)?;
            let out = single_out()?;
            let input = args[0].to_string();
            if name == "sum" {
                Op::Sum { out, input }
            } else {
                Op::Avg { out, input }
            }
        }
        "print" => {
            if !outs.is_empty() || args.iter().any(|a| a.is_empty()) {
                return Err(OracleError::parse(line, "print takes handles and returns nothing"));
            }
            Op::Print {
                handles: args.iter().map(|a| a.to_string()).collect(),
            }
        }
        other => return Err(OracleError::parse(line, format!("unknown operation '{}'", other))),
    };
    Ok(Some(op))
}
