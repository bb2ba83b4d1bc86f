use crate::{
    confidence::ConfidenceEstimate,
    data::{Data, Dataset, StatisticsError},
    population::PopulationId,
};

/// Position of a sample in its population's creation order.
///
/// Indices start at zero, increase by one per drawn sample regardless of the
/// sample size, and are never reused.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
)]
pub struct SampleIndex(usize);

impl SampleIndex {
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Values drawn from a [`Population`](crate::population::Population).
///
/// A sample is owned by the population it was drawn from and refers back to
/// it by [`PopulationId`] only. Its variance uses Bessel's correction.
#[derive(Debug, Clone)]
pub struct Sample {
    population: PopulationId,
    index: SampleIndex,
    data: Data,
}

impl Sample {
    pub(crate) fn new(population: PopulationId, index: SampleIndex, data: Data) -> Self {
        Self {
            population,
            index,
            data,
        }
    }

    /// The population this sample was drawn from.
    #[must_use]
    pub fn population_id(&self) -> PopulationId {
        self.population
    }

    #[must_use]
    pub fn index(&self) -> SampleIndex {
        self.index
    }

    /// Interval `mean ± k·s/√n` and its two-sided confidence level.
    ///
    /// Needs at least two values, since the standard error uses the sample
    /// standard deviation.
    pub fn confidence_level(&self, multiplier: f64) -> Result<ConfidenceEstimate, StatisticsError> {
        let mean = self.mean()?;
        let standard_deviation = self.standard_deviation()?;
        ConfidenceEstimate::new(mean, standard_deviation, self.size(), multiplier)
    }
}

impl Dataset for Sample {
    fn data(&self) -> &Data {
        &self.data
    }

    fn name(&self) -> String {
        format!("Sample #{}", self.index)
    }

    /// Unbiased variance, `Σ(x - mean)² / (n - 1)`.
    ///
    /// Fails with [`StatisticsError::InsufficientData`] when `n <= 1`.
    fn variance(&self) -> Result<f64, StatisticsError> {
        self.data.variance_with_ddof(1)
    }
}
