//! Scenario suites.
//!
//! Each suite generates its dataset first, then builds scenarios in
//! ascending number order. Every random draw after the dataset belongs to a
//! predicate of the scenario being built, so adding a scenario at the end
//! never changes earlier ones.

mod index;
mod join;

pub use index::IndexSuiteGenerator;
pub use join::JoinSuiteGenerator;

use colgen_core::{Bound, Predicate};
use colgen_datagen::SelectivityPlanner;
use rand::Rng;

use crate::TestGenResult;

/// SQL form of a range predicate, for script comments.
pub(crate) fn sql_condition(column: &str, predicate: &Predicate) -> String {
    match (predicate.low, predicate.high) {
        (Bound::Value(lo), Bound::Value(hi)) => {
            format!("{} >= {} AND {} < {}", column, lo, column, hi)
        }
        (Bound::Value(lo), Bound::Unbounded) => format!("{} >= {}", column, lo),
        (Bound::Unbounded, Bound::Value(hi)) => format!("{} < {}", column, hi),
        (Bound::Unbounded, Bound::Unbounded) => "TRUE".to_string(),
    }
}

/// `count` ranges of the same selectivity, drawn in order.
pub(crate) fn plan_ranges(
    planner: SelectivityPlanner,
    selectivity: f64,
    count: usize,
    rng: &mut impl Rng,
) -> TestGenResult<Vec<Predicate>> {
    let mut ranges = Vec::with_capacity(count);
    for _ in 0..count {
        ranges.push(planner.plan_range(selectivity, rng)?);
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_condition() {
        assert_eq!(sql_condition("col3", &Predicate::range(4, 9)), "col3 >= 4 AND col3 < 9");
        assert_eq!(sql_condition("col2", &Predicate::below(300)), "col2 < 300");
        assert_eq!(sql_condition("col2", &Predicate::at_least(7)), "col2 >= 7");
    }
}
