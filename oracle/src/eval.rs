//! Brute-force query evaluation.
//!
//! Every operator scans its whole input. Nothing here may depend on how the
//! data would be indexed or which join algorithm was requested.

use crate::{OracleError, OracleResult};
use colgen_core::{JoinKind, Predicate, RowSet};
use std::collections::HashMap;
use std::fmt;

/// Row ids of `column` whose value satisfies `predicate`, ascending.
pub fn select(column: &[i64], predicate: &Predicate) -> RowSet {
    column
        .iter()
        .enumerate()
        .filter(|(_, v)| predicate.matches(**v))
        .map(|(i, _)| i)
        .collect()
}

/// Select on a prior select: keep the ids of `rows` whose aligned value in
/// `values` satisfies `predicate`. `values` is `fetch(col, rows)`.
pub fn select_within(rows: &RowSet, values: &[i64], predicate: &Predicate) -> OracleResult<RowSet> {
    if rows.len() != values.len() {
        return Err(OracleError::LengthMismatch {
            context: "select",
            left: rows.len(),
            right: values.len(),
        });
    }
    Ok(rows
        .iter()
        .zip(values)
        .filter(|(_, v)| predicate.matches(**v))
        .map(|(id, _)| id)
        .collect())
}

/// Values of `column` at `rows`, in the order of `rows`.
pub fn fetch(column: &[i64], rows: &RowSet) -> OracleResult<Vec<i64>> {
    rows.iter()
        .map(|row| {
            column.get(row).copied().ok_or(OracleError::RowOutOfRange {
                row,
                len: column.len(),
            })
        })
        .collect()
}

/// Pairs of row ids with equal join keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinResult {
    pub left: RowSet,
    pub right: RowSet,
}

impl JoinResult {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.left.iter().zip(self.right.iter())
    }
}

/// Inner equi-join of two (values, row ids) inputs.
///
/// Produces every `(left_id, right_id)` with `left_value == right_value`,
/// ordered by left position, then right position. The result has
/// `Σ_key count_left(key) * count_right(key)` pairs for every `kind`.
pub fn join(
    left_values: &[i64],
    left_rows: &RowSet,
    right_values: &[i64],
    right_rows: &RowSet,
    kind: JoinKind,
) -> OracleResult<JoinResult> {
    if left_values.len() != left_rows.len() {
        return Err(OracleError::LengthMismatch {
            context: "join (left)",
            left: left_values.len(),
            right: left_rows.len(),
        });
    }
    if right_values.len() != right_rows.len() {
        return Err(OracleError::LengthMismatch {
            context: "join (right)",
            left: right_values.len(),
            right: right_rows.len(),
        });
    }

    let mut right_by_key: HashMap<i64, Vec<usize>> = HashMap::new();
    for (&key, id) in right_values.iter().zip(right_rows.iter()) {
        right_by_key.entry(key).or_default().push(id);
    }

    let mut left_ids = Vec::new();
    let mut right_ids = Vec::new();
    for (key, left_id) in left_values.iter().zip(left_rows.iter()) {
        if let Some(matches) = right_by_key.get(key) {
            for &right_id in matches {
                left_ids.push(left_id);
                right_ids.push(right_id);
            }
        }
    }
    let result = JoinResult {
        left: RowSet::new(left_ids),
        right: RowSet::new(right_ids),
    };

    tracing::trace!(%kind, pairs = result.len(), "evaluated join");
    Ok(result)
}

/// Sum of `values`, or `None` for an empty group.
pub fn sum(values: &[i64]) -> Option<i128> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|&v| v as i128).sum())
}

/// Exact mean of `values`, or `None` for an empty group.
pub fn avg(values: &[i64]) -> Option<Mean> {
    Mean::of(values)
}

/// An exact arithmetic mean, kept as a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mean {
    sum: i128,
    count: u64,
}

impl Mean {
    pub fn of(values: &[i64]) -> Option<Self> {
        Some(Self {
            sum: sum(values)?,
            count: values.len() as u64,
        })
    }

    /// The mean as a double, the value an engine computes and prints.
    pub fn as_f64(&self) -> f64 {
        self.sum as f64 / self.count as f64
    }
}

/// Two decimals, rounded from the binary value of the mean, as `%.2f` does.
impl fmt::Display for Mean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

/// A scalar result with empty groups made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum(Option<i128>),
    Avg(Option<Mean>),
}

impl Aggregate {
    pub fn sum_of(values: &[i64]) -> Self {
        Aggregate::Sum(sum(values))
    }

    pub fn avg_of(values: &[i64]) -> Self {
        Aggregate::Avg(avg(values))
    }

    pub fn is_empty_group(&self) -> bool {
        matches!(self, Aggregate::Sum(None) | Aggregate::Avg(None))
    }
}

/// Empty groups print as `0` (sum) and `0.00` (avg).
impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Sum(Some(total)) => write!(f, "{}", total),
            Aggregate::Sum(None) => f.write_str("0"),
            Aggregate::Avg(Some(mean)) => write!(f, "{}", mean),
            Aggregate::Avg(None) => f.write_str("0.00"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colgen_core::Bound;

    #[test]
    fn test_select_fetch_sum_avg() {
        let col2 = [5, 15, 5];
        let col3 = [10, 20, 30];

        let rows = select(&col2, &Predicate::range(4, 6));
        assert_eq!(rows.ids(), &[0, 2]);

        let values = fetch(&col3, &rows).unwrap();
        assert_eq!(values, vec![10, 30]);
        assert_eq!(Aggregate::sum_of(&values).to_string(), "40");
        assert_eq!(Aggregate::avg_of(&values).to_string(), "20.00");
    }

    #[test]
    fn test_select_matches_brute_force() {
        let column: Vec<i64> = (0..200).map(|i| (i * 37 + 11) % 53).collect();
        let predicates = [
            Predicate::range(10, 20),
            Predicate::range(0, 0),
            Predicate::below(7),
            Predicate::at_least(50),
            Predicate::new(Bound::Unbounded, Bound::Unbounded),
        ];
        for p in &predicates {
            let rows = select(&column, p);
            let fetched = fetch(&column, &rows).unwrap();
            let brute: Vec<i64> = column.iter().copied().filter(|&v| p.matches(v)).collect();
            assert_eq!(fetched, brute, "predicate {}", p);
            assert!(rows.ids().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_select_within_prior_result() {
        let col3 = [1, 2, 3, 4, 5, 6];
        let col2 = [100, 200, 300, 400, 500, 600];
        let s1 = select(&col3, &Predicate::range(2, 6));
        let f1 = fetch(&col2, &s1).unwrap();
        let s2 = select_within(&s1, &f1, &Predicate::range(250, 450)).unwrap();
        assert_eq!(s2.ids(), &[2, 3]);

        assert!(matches!(
            select_within(&s1, &f1[..1], &Predicate::range(0, 1)),
            Err(OracleError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_fetch_out_of_range() {
        assert_eq!(
            fetch(&[1, 2], &RowSet::new(vec![0, 2])),
            Err(OracleError::RowOutOfRange { row: 2, len: 2 })
        );
    }

    #[test]
    fn test_join_pairs_ignore_kind() {
        let left_rows = RowSet::new(vec![0, 1]);
        let right_rows = RowSet::new(vec![0, 1]);
        for kind in JoinKind::ALL {
            let result = join(&[1, 2], &left_rows, &[2, 2], &right_rows, kind).unwrap();
            assert_eq!(result.pairs().collect::<Vec<_>>(), vec![(1, 0), (1, 1)]);
        }
    }

    #[test]
    fn test_join_cardinality_is_product_per_key() {
        let left_values = [1, 1, 2, 3, 3, 3];
        let right_values = [3, 1, 3, 4];
        let left_rows = RowSet::new(vec![10, 11, 12, 13, 14, 15]);
        let right_rows = RowSet::new(vec![20, 21, 22, 23]);
        let result = join(&left_values, &left_rows, &right_values, &right_rows, JoinKind::GraceHash)
            .unwrap();
        // key 1: 2*1, key 3: 3*2
        assert_eq!(result.len(), 8);
        assert_eq!(
            result.pairs().take(3).collect::<Vec<_>>(),
            vec![(10, 21), (11, 21), (13, 20)]
        );
    }

    #[test]
    fn test_empty_groups_normalize() {
        assert_eq!(Aggregate::sum_of(&[]).to_string(), "0");
        assert_eq!(Aggregate::avg_of(&[]).to_string(), "0.00");
        assert!(Aggregate::avg_of(&[]).is_empty_group());
        assert!(!Aggregate::sum_of(&[0]).is_empty_group());
    }

    #[test]
    fn test_mean_rounds_like_a_double() {
        // 107/40 is 2.675 in decimal but just below it as a double
        let values: Vec<i64> = std::iter::repeat(3)
            .take(27)
            .chain(std::iter::repeat(2).take(13))
            .collect();
        assert_eq!(values.iter().sum::<i64>(), 107);
        assert_eq!(Mean::of(&values).unwrap().to_string(), "2.67");
        assert_eq!(Mean::of(&values).unwrap().to_string(), format!("{:.2}", 107.0_f64 / 40.0));
        assert_eq!(Mean::of(&[1, 2]).unwrap().to_string(), "1.50");
        assert_eq!(Mean::of(&[1, 1, 2]).unwrap().to_string(), "1.33");
        assert_eq!(Mean::of(&[2, 2, 1]).unwrap().to_string(), "1.67");
        assert_eq!(Mean::of(&[-1, 0, 0]).unwrap().to_string(), "-0.33");
        assert_eq!(Mean::of(&[-5, -6]).unwrap().to_string(), "-5.50");
    }
}
