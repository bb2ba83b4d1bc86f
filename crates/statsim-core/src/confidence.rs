use crate::{data::StatisticsError, interval::Interval, math};

/// A symmetric interval around a sample mean and the probability mass it
/// captures under the normal approximation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceEstimate {
    pub interval: Interval,
    /// Two-sided confidence level `Φ(k) - Φ(-k)`.
    pub level: f64,
}

impl ConfidenceEstimate {
    /// Builds `[mean - k·SE, mean + k·SE]` with `SE = standard_deviation / sqrt(size)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use statsim_core::confidence::ConfidenceEstimate;
    ///
    /// let estimate = ConfidenceEstimate::new(10.0, 2.0, 16, 1.96).unwrap();
    /// assert!((estimate.interval.begin() - 9.02).abs() < 1e-12);
    /// assert!((estimate.interval.end() - 10.98).abs() < 1e-12);
    /// assert!((estimate.level - 0.95).abs() < 1e-3);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn new(
        mean: f64,
        standard_deviation: f64,
        size: usize,
        multiplier: f64,
    ) -> Result<Self, StatisticsError> {
        if multiplier.is_nan() || multiplier <= 0.0 {
            return Err(StatisticsError::NonPositiveMultiplier { multiplier });
        }
        if size == 0 {
            return Err(StatisticsError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        let margin = multiplier * standard_deviation / (size as f64).sqrt();
        Ok(Self {
            interval: Interval::closed(mean - margin, mean + margin),
            level: math::standard_normal_cdf(multiplier) - math::standard_normal_cdf(-multiplier),
        })
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.interval.contains(value)
    }
}
