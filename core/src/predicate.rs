//! Range predicates.
//!
//! A predicate selects values `v` with `low <= v < high`. Either side may be
//! unbounded, which scripts spell `null`.

use serde::Serialize;
use std::fmt;

/// One side of a range predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Bound {
    /// No limit on this side.
    Unbounded,
    /// A numeric limit.
    Value(i64),
}

impl Bound {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Bound::Unbounded => None,
            Bound::Value(v) => Some(*v),
        }
    }
}

impl From<i64> for Bound {
    fn from(v: i64) -> Self {
        Bound::Value(v)
    }
}

impl From<Option<i64>> for Bound {
    fn from(v: Option<i64>) -> Self {
        v.map_or(Bound::Unbounded, Bound::Value)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Unbounded => f.write_str("null"),
            Bound::Value(v) => write!(f, "{}", v),
        }
    }
}

/// `low` inclusive, `high` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Predicate {
    pub low: Bound,
    pub high: Bound,
}

impl Predicate {
    pub fn new(low: impl Into<Bound>, high: impl Into<Bound>) -> Self {
        Self {
            low: low.into(),
            high: high.into(),
        }
    }

    /// `[low, high)`
    pub fn range(low: i64, high: i64) -> Self {
        Self::new(low, high)
    }

    /// `(-inf, high)`
    pub fn below(high: i64) -> Self {
        Self::new(Bound::Unbounded, high)
    }

    /// `[low, +inf)`
    pub fn at_least(low: i64) -> Self {
        Self::new(low, Bound::Unbounded)
    }

    pub fn matches(&self, v: i64) -> bool {
        let above_low = match self.low {
            Bound::Unbounded => true,
            Bound::Value(low) => v >= low,
        };
        let below_high = match self.high {
            Bound::Unbounded => true,
            Bound::Value(high) => v < high,
        };
        above_low && below_high
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.low, self.high)
    }
}
