//! Observation sets and the statistics computed over them.
//!
//! [`Data`] is the storage shared by [`Population`](crate::population::Population)
//! and [`Sample`](crate::sample::Sample): an ascending sequence of
//! observations plus the [`Distribution`] that produced them. The values are
//! sorted once on construction and never change afterwards, which lets range
//! queries use binary search.
//!
//! [`Dataset`] is the read-only view both variants expose. The only behavioral
//! difference between them is the variance denominator: `n` for a population,
//! `n - 1` for a sample.

use crate::distribution::Distribution;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StatisticsError {
    #[display("statistic needs at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[display("interval multiplier must be positive, got {multiplier}")]
    NonPositiveMultiplier { multiplier: f64 },
}

/// Sorted observations together with their generating distribution.
#[derive(Debug, Clone)]
pub struct Data {
    values: Vec<f64>,
    distribution: Distribution,
}

impl Data {
    /// Creates a data set from unsorted values.
    #[must_use]
    pub fn new(mut values: Vec<f64>, distribution: Distribution) -> Self {
        values.sort_by(f64::total_cmp);
        Self::from_sorted(values, distribution)
    }

    /// Creates a data set from values already sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: Vec<f64>, distribution: Distribution) -> Self {
        debug_assert!(
            sorted_values.is_sorted_by(|a, b| a.total_cmp(b).is_le()),
            "values must be sorted in ascending order"
        );
        Self {
            values: sorted_values,
            distribution,
        }
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    fn require(&self, required: usize) -> Result<(), StatisticsError> {
        if self.len() < required {
            return Err(StatisticsError::InsufficientData {
                required,
                actual: self.len(),
            });
        }
        Ok(())
    }

    #[expect(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Result<f64, StatisticsError> {
        self.require(1)?;
        Ok(self.sum() / self.len() as f64)
    }

    /// Sum of squared deviations from `mean`.
    #[must_use]
    pub fn deviation_sum(&self, mean: f64) -> f64 {
        self.values.iter().map(|x| (x - mean).powi(2)).sum()
    }

    /// Variance with the sum of squared deviations divided by `n - ddof`.
    #[expect(clippy::cast_precision_loss)]
    pub fn variance_with_ddof(&self, ddof: usize) -> Result<f64, StatisticsError> {
        self.require(ddof + 1)?;
        let mean = self.mean()?;
        Ok(self.deviation_sum(mean) / (self.len() - ddof) as f64)
    }

    /// Fraction of observations `x` with `begin <= x <= end`.
    #[expect(clippy::cast_precision_loss)]
    pub fn probability(&self, begin: f64, end: f64) -> Result<f64, StatisticsError> {
        self.require(1)?;
        if begin > end {
            return Ok(0.0);
        }
        let first = self.values.partition_point(|&x| x < begin);
        let past_last = self.values.partition_point(|&x| x <= end);
        Ok((past_last - first) as f64 / self.len() as f64)
    }
}

/// Read-only statistics over a population or a sample.
pub trait Dataset {
    fn data(&self) -> &Data;

    /// Display name, e.g. `Population` or `Sample #3`.
    fn name(&self) -> String;

    fn variance(&self) -> Result<f64, StatisticsError>;

    fn values(&self) -> &[f64] {
        self.data().values()
    }

    fn distribution(&self) -> &Distribution {
        self.data().distribution()
    }

    fn size(&self) -> usize {
        self.data().len()
    }

    fn mean(&self) -> Result<f64, StatisticsError> {
        self.data().mean()
    }

    fn standard_deviation(&self) -> Result<f64, StatisticsError> {
        Ok(self.variance()?.sqrt())
    }

    /// Empirical probability of landing in `[begin, end]`.
    fn probability(&self, begin: f64, end: f64) -> Result<f64, StatisticsError> {
        self.data().probability(begin, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal() -> Distribution {
        Distribution::normal(0.0, 1.0).unwrap()
    }

    #[test]
    fn test_values_are_sorted() {
        let data = Data::new(vec![3.0, -1.0, 2.0, 0.5], normal());
        assert_eq!(data.values(), &[-1.0, 0.5, 2.0, 3.0]);
        assert_eq!(data.len(), 4);
        assert_eq!(data.sum(), 4.5);
    }

    #[test]
    fn test_mean_and_variances() {
        let data = Data::new(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], normal());
        assert_eq!(data.mean().unwrap(), 5.0);
        assert_eq!(data.variance_with_ddof(0).unwrap(), 4.0);
        assert!((data.variance_with_ddof(1).unwrap() - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_data() {
        let data = Data::new(vec![], normal());
        assert!(data.is_empty());
        assert!(matches!(
            data.mean(),
            Err(StatisticsError::InsufficientData {
                required: 1,
                actual: 0
            })
        ));
        assert!(data.probability(0.0, 1.0).is_err());
    }

    #[test]
    fn test_variance_with_ddof_needs_enough_values() {
        let data = Data::new(vec![1.0], normal());
        assert_eq!(data.variance_with_ddof(0).unwrap(), 0.0);
        assert!(matches!(
            data.variance_with_ddof(1),
            Err(StatisticsError::InsufficientData {
                required: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_probability_is_inclusive() {
        let data = Data::new(vec![1.0, 2.0, 2.0, 3.0, 4.0], normal());
        assert_eq!(data.probability(2.0, 3.0).unwrap(), 0.6);
        assert_eq!(data.probability(0.0, 10.0).unwrap(), 1.0);
        assert_eq!(data.probability(2.5, 2.9).unwrap(), 0.0);
        assert_eq!(data.probability(4.0, 1.0).unwrap(), 0.0);
    }
}
