//! Discrete Zipfian sampling.
//!
//! Rank `k` in `1..=N` is drawn with probability `k^-s / H(N,s)`, where
//! `H(N,s)` is the generalized harmonic number. Draws invert the CDF by
//! walking ranks upward from 1, so a draw costs O(k).

use crate::{DataGenError, DataGenResult};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZipfianDistribution {
    skew: f64,
    domain: usize,
    harmonic: f64,
}

impl ZipfianDistribution {
    /// Build a sampler over `1..=domain`. Computes `H(N,s)` once.
    pub fn new(skew: f64, domain: usize) -> DataGenResult<Self> {
        if domain < 1 || !skew.is_finite() || skew <= 0.0 {
            return Err(DataGenError::InvalidZipf { skew, domain });
        }
        let harmonic = (1..=domain).map(|k| Self::weight_of(k, skew)).sum();
        Ok(Self {
            skew,
            domain,
            harmonic,
        })
    }

    fn weight_of(k: usize, skew: f64) -> f64 {
        1.0 / (k as f64).powf(skew)
    }

    pub fn skew(&self) -> f64 {
        self.skew
    }

    pub fn domain(&self) -> usize {
        self.domain
    }

    /// `H(N,s)`
    pub fn harmonic(&self) -> f64 {
        self.harmonic
    }

    /// Normalized probability of rank `k`.
    pub fn probability(&self, k: usize) -> f64 {
        if k < 1 || k > self.domain {
            return 0.0;
        }
        Self::weight_of(k, self.skew) / self.harmonic
    }

    /// Cumulative normalized weight of ranks `1..=k`.
    pub fn cdf(&self, k: usize) -> f64 {
        (1..=k.min(self.domain)).map(|i| self.probability(i)).sum()
    }

    /// Smallest rank whose cumulative weight exceeds `u`, for `u` in `[0, 1)`.
    ///
    /// The walk stops at `N` even if rounding leaves the cumulative weight
    /// just short of `u`.
    pub fn sample(&self, u: f64) -> usize {
        let mut total = 0.0;
        let mut k = 0;
        while u >= total {
            if k == self.domain {
                break;
            }
            k += 1;
            total += Self::weight_of(k, self.skew) / self.harmonic;
        }
        k.max(1)
    }

    /// Sample each variate independently.
    pub fn sample_many(&self, variates: &[f64]) -> Vec<usize> {
        variates.iter().map(|&u| self.sample(u)).collect()
    }

    /// One draw, consuming one uniform `f64` from `rng`.
    pub fn draw(&self, rng: &mut impl Rng) -> usize {
        self.sample(rng.gen::<f64>())
    }

    /// `count` draws. All variates are taken from `rng` first, in order.
    pub fn draw_many(&self, count: usize, rng: &mut impl Rng) -> Vec<usize> {
        let variates: Vec<f64> = (0..count).map(|_| rng.gen::<f64>()).collect();
        self.sample_many(&variates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rejects_invalid_params() {
        assert!(ZipfianDistribution::new(1.0, 0).is_err());
        assert!(ZipfianDistribution::new(0.0, 10).is_err());
        assert!(ZipfianDistribution::new(-1.5, 10).is_err());
        assert!(ZipfianDistribution::new(f64::NAN, 10).is_err());
    }

    #[test]
    fn test_harmonic_number() {
        let z = ZipfianDistribution::new(1.0, 4).unwrap();
        let expected = 1.0 + 0.5 + 1.0 / 3.0 + 0.25;
        assert!((z.harmonic() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_cdf_reaches_one() {
        for &(s, n) in &[(1.0, 1), (1.0, 50), (0.5, 1000), (2.5, 7), (0.01, 300)] {
            let z = ZipfianDistribution::new(s, n).unwrap();
            assert!((z.cdf(n) - 1.0).abs() < 1e-9, "s={} n={}", s, n);
            assert!((z.cdf(n + 10) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sample_boundaries() {
        let z = ZipfianDistribution::new(1.0, 50).unwrap();
        assert_eq!(z.sample(0.0), 1);
        // P(1) = 1/H(50,1) ~ 0.2222
        assert_eq!(z.sample(0.2), 1);
        assert_eq!(z.sample(0.25), 2);
        assert_eq!(z.sample(1.0 - f64::EPSILON), 50);
        // Out-of-range variates clamp to the domain
        assert_eq!(z.sample(1.5), 50);
    }

    #[test]
    fn test_single_rank_domain() {
        let z = ZipfianDistribution::new(3.0, 1).unwrap();
        assert_eq!(z.sample(0.0), 1);
        assert_eq!(z.sample(0.999), 1);
    }

    #[test]
    fn test_draws_stay_in_domain() {
        let z = ZipfianDistribution::new(1.2, 20).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let draws = z.draw_many(5000, &mut rng);
        assert!(draws.iter().all(|&k| (1..=20).contains(&k)));
        // Rank 1 is the most frequent
        let ones = draws.iter().filter(|&&k| k == 1).count();
        let twos = draws.iter().filter(|&&k| k == 2).count();
        assert!(ones > twos);
    }

    #[test]
    fn test_batch_matches_single_draws() {
        let z = ZipfianDistribution::new(1.0, 50).unwrap();
        let variates = [0.0, 0.1, 0.5, 0.9, 0.99];
        let batch = z.sample_many(&variates);
        let single: Vec<usize> = variates.iter().map(|&u| z.sample(u)).collect();
        assert_eq!(batch, single);

        let mut a = ChaCha8Rng::seed_from_u64(1);
        let mut b = ChaCha8Rng::seed_from_u64(1);
        let many = z.draw_many(3, &mut a);
        let one_by_one: Vec<usize> = (0..3).map(|_| z.draw(&mut b)).collect();
        assert_eq!(many, one_by_one);
    }
}
