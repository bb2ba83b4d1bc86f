//! Populations and the samples drawn from them.
//!
//! A [`Population`] owns its observations, its distribution, and every
//! [`Sample`] drawn from it. Samples are filed by size in a [`SampleBook`],
//! which also hands out the global sample index; both change together in a
//! single call, so the index counter and the buckets can never disagree.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use statsim_core::{
//!     data::Dataset as _,
//!     distribution::Distribution,
//!     population::{Population, SamplingMethod},
//! };
//!
//! let mut rng = Pcg32::seed_from_u64(1);
//! let distribution = Distribution::normal(50.0, 10.0).unwrap();
//! let mut population = Population::generate(1000, distribution, &mut rng);
//!
//! for _ in 0..40 {
//!     population
//!         .draw_sample(25, SamplingMethod::WithoutReplacement, &mut rng)
//!         .unwrap();
//! }
//!
//! let means = population.create_sample_mean_population(25).unwrap();
//! assert_eq!(means.size(), 40);
//! assert_eq!(means.distribution().to_string(), "N(50, 2^2)");
//! ```

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use rand::{Rng, seq::IteratorRandom as _};

use crate::{
    data::{Data, Dataset, StatisticsError},
    distribution::{Distribution, DistributionError, DistributionModel as _, NormalDistribution},
    fitter::{DistributionFitter, FitError, Parameter},
    sample::{Sample, SampleIndex},
};

/// Identity of a population, used by samples to refer back to their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub struct PopulationId(u64);

impl PopulationId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// How sample values are picked from the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub enum SamplingMethod {
    /// Each value is picked independently; the same element may repeat.
    WithReplacement,
    /// Distinct elements, picked by a single reservoir pass.
    WithoutReplacement,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SampleError {
    #[display("sample size must be at least 1")]
    InvalidSize,
    #[display("cannot sample from an empty population")]
    EmptyPopulation,
    #[display(
        "sample size {size} exceeds population size {population_size} without replacement"
    )]
    SizeExceedsPopulation { size: usize, population_size: usize },
    #[display("no samples of size {size} have been drawn")]
    NoSuchBucket { size: usize },
    #[display("failed to summarize a sample")]
    #[from]
    Statistics(StatisticsError),
    #[display("invalid sample-mean distribution")]
    #[from]
    Distribution(DistributionError),
}

/// Samples grouped by size, in creation order within each size.
#[derive(Debug, Default)]
pub struct SampleBook {
    buckets: BTreeMap<usize, Vec<Sample>>,
    next_index: usize,
}

impl SampleBook {
    /// Files `data` as a new sample and assigns it the next index.
    fn insert(&mut self, population: PopulationId, data: Data) -> &Sample {
        let index = SampleIndex::from(self.next_index);
        self.next_index += 1;
        let bucket = self.buckets.entry(data.len()).or_default();
        bucket.push(Sample::new(population, index, data));
        &bucket[bucket.len() - 1]
    }

    /// Number of samples ever drawn; also the index the next one will get.
    #[must_use]
    pub fn count(&self) -> usize {
        self.next_index
    }

    #[must_use]
    pub fn get(&self, index: SampleIndex) -> Option<&Sample> {
        self.buckets.values().find_map(|bucket| {
            bucket
                .binary_search_by_key(&index, Sample::index)
                .ok()
                .map(|position| &bucket[position])
        })
    }

    #[must_use]
    pub fn of_size(&self, size: usize) -> Option<&[Sample]> {
        self.buckets.get(&size).map(Vec::as_slice)
    }

    /// Iterates over `(size, samples)` pairs in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Sample])> + '_ {
        self.buckets
            .iter()
            .map(|(size, samples)| (*size, samples.as_slice()))
    }
}

/// The full data set a simulation works on.
#[derive(Debug)]
pub struct Population {
    id: PopulationId,
    data: Data,
    samples: SampleBook,
}

impl Population {
    /// Draws `size` values from `distribution`.
    pub fn generate<R>(size: usize, distribution: Distribution, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let values = (0..size).map(|_| distribution.generate(rng)).collect();
        log::debug!("generated population of {size} values from {distribution}");
        Self::from_values(values, distribution)
    }

    /// Wraps existing values; they are sorted on construction.
    #[must_use]
    pub fn from_values(values: Vec<f64>, distribution: Distribution) -> Self {
        Self {
            id: PopulationId::next(),
            data: Data::new(values, distribution),
            samples: SampleBook::default(),
        }
    }

    /// Fits a distribution to `values` by their mean and population variance.
    ///
    /// `fitter` receives `Mean` and `Variance`; any parameters set on it
    /// beforehand are kept, so direct parameters still take precedence.
    #[expect(clippy::cast_precision_loss)]
    pub fn fit(values: Vec<f64>, fitter: &mut dyn DistributionFitter) -> Result<Self, FitError> {
        if values.is_empty() {
            return Err(FitError::NoObservations);
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        fitter.set(Parameter::Mean, mean)?;
        fitter.set(Parameter::Variance, variance)?;
        let distribution = fitter.fit()?;
        log::debug!(
            "fitted {distribution} to {} values (mean={mean}, variance={variance})",
            values.len()
        );
        Ok(Self::from_values(values, distribution))
    }

    #[must_use]
    pub fn id(&self) -> PopulationId {
        self.id
    }

    /// Returns `true` if `sample` was drawn from this population.
    #[must_use]
    pub fn owns(&self, sample: &Sample) -> bool {
        sample.population_id() == self.id
    }

    /// Draws a sample of `size` values and stores it under the next index.
    pub fn draw_sample<R>(
        &mut self,
        size: usize,
        method: SamplingMethod,
        rng: &mut R,
    ) -> Result<&Sample, SampleError>
    where
        R: Rng + ?Sized,
    {
        let values = self.data.values();
        if size == 0 {
            return Err(SampleError::InvalidSize);
        }
        if values.is_empty() {
            return Err(SampleError::EmptyPopulation);
        }
        let picked = match method {
            SamplingMethod::WithReplacement => (0..size)
                .map(|_| values[rng.random_range(0..values.len())])
                .collect(),
            SamplingMethod::WithoutReplacement => {
                if size > values.len() {
                    return Err(SampleError::SizeExceedsPopulation {
                        size,
                        population_size: values.len(),
                    });
                }
                values.iter().copied().choose_multiple(rng, size)
            }
        };
        let data = Data::new(picked, self.data.distribution().clone());
        let sample = self.samples.insert(self.id, data);
        log::debug!("drew {} of size {size} ({method})", sample.name());
        Ok(sample)
    }

    #[must_use]
    pub fn sample(&self, index: SampleIndex) -> Option<&Sample> {
        self.samples.get(index)
    }

    #[must_use]
    pub fn samples(&self) -> &SampleBook {
        &self.samples
    }

    #[must_use]
    pub fn samples_of_size(&self, size: usize) -> Option<&[Sample]> {
        self.samples.of_size(size)
    }

    /// Number of samples drawn so far.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.count()
    }

    /// Builds a population from the means of every sample of `size`.
    ///
    /// The new population's distribution is the central limit theorem's
    /// prediction: `N(μ, σ / √size)` with `μ` and `σ` taken from this
    /// population's distribution. A population without spread (`σ = 0`)
    /// predicts a point mass at `μ`. It starts with no samples of its own.
    #[expect(clippy::cast_precision_loss)]
    pub fn create_sample_mean_population(&self, size: usize) -> Result<Self, SampleError> {
        let bucket = self
            .samples
            .of_size(size)
            .filter(|bucket| !bucket.is_empty())
            .ok_or(SampleError::NoSuchBucket { size })?;
        let means = bucket
            .iter()
            .map(<Sample as Dataset>::mean)
            .collect::<Result<Vec<_>, _>>()?;
        let parent = self.data.distribution();
        let distribution = NormalDistribution::point_or_spread(
            parent.mean(),
            parent.standard_deviation() / (size as f64).sqrt(),
        )?;
        Ok(Self::from_values(means, distribution.into()))
    }
}

impl Dataset for Population {
    fn data(&self) -> &Data {
        &self.data
    }

    fn name(&self) -> String {
        "Population".to_owned()
    }

    /// Population variance, `Σ(x - mean)² / n`.
    fn variance(&self) -> Result<f64, StatisticsError> {
        self.data.variance_with_ddof(0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::distribution::DistributionModel as _;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(0x5eed)
    }

    fn distinct_population(size: usize) -> Population {
        #[expect(clippy::cast_precision_loss)]
        let values = (0..size).map(|i| i as f64).collect();
        Population::from_values(values, Distribution::normal(0.0, 1.0).unwrap())
    }

    #[test]
    fn test_generate_size_and_order() {
        let mut rng = rng();
        let population = Population::generate(500, Distribution::normal(0.0, 1.0).unwrap(), &mut rng);
        assert_eq!(population.size(), 500);
        assert!(population.values().is_sorted());
        assert_eq!(population.sample_count(), 0);
        assert_eq!(population.name(), "Population");
    }

    #[test]
    fn test_population_variance_divides_by_n() {
        let population = distinct_population(4);
        assert_eq!(population.variance().unwrap(), 1.25);
    }

    #[test]
    fn test_indices_are_global_and_increasing() {
        let mut rng = rng();
        let mut population = distinct_population(100);
        let sizes = [5, 10, 5, 3, 10, 5];
        let mut indices = vec![];
        for size in sizes {
            let sample = population
                .draw_sample(size, SamplingMethod::WithReplacement, &mut rng)
                .unwrap();
            assert_eq!(sample.size(), size);
            indices.push(sample.index().get());
        }
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(population.sample_count(), 6);

        let fives: Vec<_> = population
            .samples_of_size(5)
            .unwrap()
            .iter()
            .map(|s| s.index().get())
            .collect();
        assert_eq!(fives, vec![0, 2, 5]);

        let sizes_in_book: Vec<_> = population.samples().iter().map(|(size, _)| size).collect();
        assert_eq!(sizes_in_book, vec![3, 5, 10]);
    }

    #[test]
    fn test_lookup_by_index() {
        let mut rng = rng();
        let mut population = distinct_population(50);
        for size in [4, 8, 4, 2] {
            population
                .draw_sample(size, SamplingMethod::WithoutReplacement, &mut rng)
                .unwrap();
        }
        let sample = population.sample(SampleIndex::from(3)).unwrap();
        assert_eq!(sample.size(), 2);
        assert_eq!(sample.name(), "Sample #3");
        assert!(population.owns(sample));
        assert!(population.sample(SampleIndex::from(4)).is_none());
    }

    #[test]
    fn test_without_replacement_has_no_duplicates() {
        let mut rng = rng();
        let mut population = distinct_population(200);
        for _ in 0..50 {
            let sample = population
                .draw_sample(120, SamplingMethod::WithoutReplacement, &mut rng)
                .unwrap();
            assert_eq!(sample.size(), 120);
            assert!(sample.values().is_sorted());
            let unique: HashSet<u64> = sample.values().iter().map(|v| v.to_bits()).collect();
            assert_eq!(unique.len(), 120);
        }
    }

    #[test]
    fn test_without_replacement_full_size_is_a_permutation() {
        let mut rng = rng();
        let mut population = distinct_population(30);
        let sample = population
            .draw_sample(30, SamplingMethod::WithoutReplacement, &mut rng)
            .unwrap();
        let expected = population_values(30);
        assert_eq!(sample.values(), expected.as_slice());
    }

    fn population_values(size: usize) -> Vec<f64> {
        distinct_population(size).values().to_vec()
    }

    #[test]
    fn test_sampling_errors() {
        let mut rng = rng();
        let mut population = distinct_population(10);
        assert!(matches!(
            population.draw_sample(0, SamplingMethod::WithReplacement, &mut rng),
            Err(SampleError::InvalidSize)
        ));
        assert!(matches!(
            population.draw_sample(11, SamplingMethod::WithoutReplacement, &mut rng),
            Err(SampleError::SizeExceedsPopulation {
                size: 11,
                population_size: 10
            })
        ));
        // With replacement the size is not bounded by the population.
        assert_eq!(
            population
                .draw_sample(11, SamplingMethod::WithReplacement, &mut rng)
                .unwrap()
                .size(),
            11
        );

        let mut empty = distinct_population(0);
        assert!(matches!(
            empty.draw_sample(1, SamplingMethod::WithReplacement, &mut rng),
            Err(SampleError::EmptyPopulation)
        ));
        // Failed draws do not consume indices.
        assert_eq!(population.sample_count(), 1);
    }

    #[test]
    fn test_sample_distribution_is_a_copy() {
        let mut rng = rng();
        let mut population =
            Population::generate(100, Distribution::binomial(20, 0.4).unwrap(), &mut rng);
        let sample = population
            .draw_sample(10, SamplingMethod::WithReplacement, &mut rng)
            .unwrap();
        assert_eq!(sample.distribution().expression(), "B(20, 0.4)");
    }

    #[test]
    fn test_sample_mean_population_requires_bucket() {
        let mut rng = rng();
        let mut population = distinct_population(20);
        population
            .draw_sample(5, SamplingMethod::WithReplacement, &mut rng)
            .unwrap();
        assert!(matches!(
            population.create_sample_mean_population(6),
            Err(SampleError::NoSuchBucket { size: 6 })
        ));
    }

    #[test]
    fn test_sample_mean_population_is_fresh() {
        let mut rng = rng();
        let distribution = Distribution::normal(10.0, 3.0).unwrap();
        let mut population = Population::generate(400, distribution, &mut rng);
        let mut expected_means = vec![];
        for _ in 0..5 {
            let sample = population
                .draw_sample(9, SamplingMethod::WithoutReplacement, &mut rng)
                .unwrap();
            expected_means.push(sample.mean().unwrap());
        }
        expected_means.sort_by(f64::total_cmp);

        let means = population.create_sample_mean_population(9).unwrap();
        assert_eq!(means.values(), expected_means.as_slice());
        assert_eq!(means.sample_count(), 0);
        assert_ne!(means.id(), population.id());
        assert_eq!(means.distribution().mean(), 10.0);
        assert_eq!(means.distribution().standard_deviation(), 1.0);
    }

    #[test]
    fn test_sample_mean_population_without_spread() {
        let mut rng = rng();
        let mut population =
            Population::generate(100, Distribution::binomial(10, 1.0).unwrap(), &mut rng);
        for _ in 0..3 {
            population
                .draw_sample(5, SamplingMethod::WithoutReplacement, &mut rng)
                .unwrap();
        }
        let means = population.create_sample_mean_population(5).unwrap();
        assert_eq!(means.values(), &[10.0, 10.0, 10.0]);
        assert_eq!(means.distribution().mean(), 10.0);
        assert_eq!(means.distribution().standard_deviation(), 0.0);
        assert_eq!(means.distribution().to_string(), "N(10, 0^2)");
        assert_eq!(means.distribution().probability(9.5, 10.5), 1.0);
        assert_eq!(means.distribution().probability(10.5, 11.0), 0.0);
        assert_eq!(means.distribution().generate(&mut rng), 10.0);
    }

    #[test]
    fn test_with_replacement_draws_population_members() {
        let mut rng = rng();
        let mut population = distinct_population(10);
        let values = population.values().to_vec();
        for _ in 0..50 {
            let sample = population
                .draw_sample(7, SamplingMethod::WithReplacement, &mut rng)
                .unwrap();
            assert!(sample.values().iter().all(|value| values.contains(value)));
        }
    }

    #[test]
    fn test_single_value_population_with_replacement() {
        let mut rng = rng();
        let mut population =
            Population::from_values(vec![4.0], Distribution::normal(4.0, 1.0).unwrap());
        let sample = population
            .draw_sample(5, SamplingMethod::WithReplacement, &mut rng)
            .unwrap();
        assert_eq!(sample.values(), &[4.0; 5]);
    }

    #[test]
    fn test_wrapped_error_message_is_not_repeated() {
        let error = SampleError::from(DistributionError::NonFiniteMean { mean: f64::NAN });
        assert_eq!(error.to_string(), "invalid sample-mean distribution");
        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(source.to_string(), "mean must be finite, got NaN");
    }

    #[test]
    fn test_fit_sets_moments() {
        let mut fitter = crate::fitter::DistributionFamily::Normal.fitter();
        let population = Population::fit(vec![1.0, 2.0, 3.0, 4.0], fitter.as_mut()).unwrap();
        assert_eq!(population.distribution().mean(), 2.5);
        assert!((population.distribution().variance() - 1.25).abs() < 1e-12);

        let mut fitter = crate::fitter::DistributionFamily::Normal.fitter();
        assert!(matches!(
            Population::fit(vec![], fitter.as_mut()),
            Err(FitError::NoObservations)
        ));
    }
}
