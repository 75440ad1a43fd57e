//! Predicate bounds from target selectivities.
//!
//! Selectivity is measured against a column's declared value domain
//! `[0, D)`, not its actual contents: a range of width `round(D * f)` over a
//! uniformly filled column is expected to keep a fraction `f` of the rows.

use crate::{DataGenError, DataGenResult};
use colgen_core::Predicate;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectivityPlanner {
    domain: i64,
    min_offset: i64,
}

impl SelectivityPlanner {
    /// Planner for a column whose values lie in `[0, domain)`.
    pub fn new(domain: i64) -> Self {
        Self {
            domain,
            min_offset: 0,
        }
    }

    /// Never plan a range narrower than `min_offset`.
    pub fn with_min_offset(mut self, min_offset: i64) -> Self {
        self.min_offset = min_offset;
        self
    }

    pub fn domain(&self) -> i64 {
        self.domain
    }

    fn check(selectivity: f64) -> DataGenResult<()> {
        if !(0.0..=1.0).contains(&selectivity) {
            return Err(DataGenError::InvalidSelectivity(selectivity));
        }
        Ok(())
    }

    /// `round(D * f)` without the minimum applied.
    fn scaled(&self, selectivity: f64) -> i64 {
        (self.domain as f64 * selectivity).round() as i64
    }

    /// Range width for a selectivity: `max(min_offset, round(D * f))`.
    pub fn offset(&self, selectivity: f64) -> DataGenResult<i64> {
        Self::check(selectivity)?;
        Ok(self.min_offset.max(self.scaled(selectivity)))
    }

    /// `[lo, lo + offset)` with `lo` uniform in `[0, D - offset)`.
    ///
    /// Consumes one draw. When the offset covers the whole domain no draw is
    /// taken and the range is `[0, D)`.
    pub fn plan_range(&self, selectivity: f64, rng: &mut impl Rng) -> DataGenResult<Predicate> {
        let offset = self.offset(selectivity)?;
        Ok(self.place(offset, rng))
    }

    /// A range of fixed width placed uniformly in the domain.
    pub fn place(&self, offset: i64, rng: &mut impl Rng) -> Predicate {
        if offset >= self.domain {
            tracing::warn!(
                domain = self.domain,
                offset,
                "range offset covers the whole domain; clamping to [0, domain)"
            );
            return Predicate::range(0, self.domain.max(0));
        }
        let lo = rng.gen_range(0..self.domain - offset);
        Predicate::range(lo, lo + offset)
    }

    /// `(null, round(f * D))`. No draws.
    pub fn plan_upper(&self, selectivity: f64) -> DataGenResult<Predicate> {
        Self::check(selectivity)?;
        Ok(Predicate::below(self.scaled(selectivity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colgen_core::Bound;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_offset_from_selectivity() {
        let planner = SelectivityPlanner::new(10_000).with_min_offset(1);
        assert_eq!(planner.offset(0.001).unwrap(), 10);

        let mut rng = ChaCha8Rng::seed_from_u64(47);
        for _ in 0..200 {
            let p = planner.plan_range(0.001, &mut rng).unwrap();
            let lo = p.low.value().unwrap();
            assert!((0..9990).contains(&lo));
            assert_eq!(p.high, Bound::Value(lo + 10));
        }
    }

    #[test]
    fn test_min_offset_protects_tiny_ranges() {
        let planner = SelectivityPlanner::new(20).with_min_offset(2);
        assert_eq!(planner.offset(0.001).unwrap(), 2);
        assert_eq!(planner.offset(0.5).unwrap(), 10);
    }

    #[test]
    fn test_range_never_exceeds_domain() {
        let planner = SelectivityPlanner::new(50).with_min_offset(1);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for f in [0.0, 0.1, 0.5, 0.9, 1.0] {
            let p = planner.plan_range(f, &mut rng).unwrap();
            assert!(p.high.value().unwrap() <= 50);
            assert!(p.low.value().unwrap() >= 0);
        }
    }

    #[test]
    fn test_full_domain_takes_no_draw() {
        let planner = SelectivityPlanner::new(10);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut untouched = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(planner.plan_range(1.0, &mut rng).unwrap(), Predicate::range(0, 10));
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_upper_bound_variant() {
        let planner = SelectivityPlanner::new(2_000);
        assert_eq!(planner.plan_upper(0.15).unwrap(), Predicate::below(300));
        assert_eq!(planner.plan_upper(0.8).unwrap().to_string(), "null,1600");
    }

    #[test]
    fn test_rejects_bad_selectivity() {
        let planner = SelectivityPlanner::new(100);
        assert!(planner.offset(-0.1).is_err());
        assert!(planner.offset(1.5).is_err());
        assert!(planner.plan_upper(f64::NAN).is_err());
    }
}
