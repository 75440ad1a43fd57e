//! Script keywords: join kinds and index declarations.

use crate::CoreError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Join algorithm requested from the engine.
///
/// Every kind denotes the same inner equi-join; the label only selects how
/// the engine computes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinKind {
    NestedLoop,
    Hash,
    NaiveHash,
    GraceHash,
}

impl JoinKind {
    pub const ALL: [JoinKind; 4] = [
        JoinKind::NestedLoop,
        JoinKind::Hash,
        JoinKind::NaiveHash,
        JoinKind::GraceHash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::NestedLoop => "nested-loop",
            JoinKind::Hash => "hash",
            JoinKind::NaiveHash => "naive-hash",
            JoinKind::GraceHash => "grace-hash",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JoinKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| CoreError::unknown_keyword("join kind", s))
    }
}

/// Physical form of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Sorted,
    Btree,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Sorted => f.write_str("sorted"),
            IndexKind::Btree => f.write_str("btree"),
        }
    }
}

impl FromStr for IndexKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sorted" => Ok(IndexKind::Sorted),
            "btree" => Ok(IndexKind::Btree),
            other => Err(CoreError::unknown_keyword("index kind", other)),
        }
    }
}

/// Whether an index dictates the table's row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Clustering {
    Clustered,
    Unclustered,
}

impl fmt::Display for Clustering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clustering::Clustered => f.write_str("clustered"),
            Clustering::Unclustered => f.write_str("unclustered"),
        }
    }
}

impl FromStr for Clustering {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "clustered" => Ok(Clustering::Clustered),
            "unclustered" => Ok(Clustering::Unclustered),
            other => Err(CoreError::unknown_keyword("clustering", other)),
        }
    }
}
