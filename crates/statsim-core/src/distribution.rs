//! Parametric probability distributions.
//!
//! A [`Distribution`] is a plain parameter set: it never owns random state.
//! Every draw takes the caller's RNG, so two copies of one distribution
//! never share a random stream and a fixed seed reproduces a run exactly.
//!
//! - [`BinomialDistribution`] - number of successes in `n` independent trials
//! - [`NormalDistribution`] - Gaussian with mean `μ` and standard deviation `σ`
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use statsim_core::distribution::{Distribution, DistributionModel as _};
//!
//! let distribution = Distribution::binomial(10, 0.5).unwrap();
//! assert_eq!(distribution.mean(), 5.0);
//! assert_eq!(distribution.variance(), 2.5);
//! assert_eq!(distribution.expression(), "B(10, 0.5)");
//!
//! let mut rng = Pcg32::seed_from_u64(7);
//! let value = distribution.generate(&mut rng);
//! assert!(distribution.support().admits(value));
//! ```

use std::fmt;

use rand::Rng;

use crate::{
    interval::{Interval, RandomVariable},
    math,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DistributionError {
    #[display("try count must be a non-negative integer, got {try_count}")]
    InvalidTryCount { try_count: f64 },
    #[display("probability must be within [0, 1], got {probability}")]
    ProbabilityOutOfRange { probability: f64 },
    #[display("mean must be finite, got {mean}")]
    NonFiniteMean { mean: f64 },
    #[display("standard deviation must be positive and finite, got {standard_deviation}")]
    NonPositiveStandardDeviation { standard_deviation: f64 },
}

/// Capabilities shared by every distribution family.
pub trait DistributionModel {
    /// Human-readable family name.
    fn name(&self) -> &'static str;

    /// Symbolic notation with the parameters filled in, e.g. `B(10, 0.5)`.
    fn expression(&self) -> String;

    /// The set of values a draw can take.
    fn support(&self) -> RandomVariable;

    fn mean(&self) -> f64;

    fn variance(&self) -> f64 {
        self.standard_deviation().powi(2)
    }

    fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Draws one value using `rng`.
    fn generate<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized;

    /// Probability that a draw lands in `[begin, end]`.
    fn probability(&self, begin: f64, end: f64) -> f64;
}

/// Converts a real-valued try count (user input, fitted values) to an integer.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn checked_try_count(try_count: f64) -> Result<u64, DistributionError> {
    // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
    if !(0.0..u64::MAX as f64).contains(&try_count) || try_count.fract() != 0.0 {
        return Err(DistributionError::InvalidTryCount { try_count });
    }
    Ok(try_count as u64)
}

/// Binomial distribution `B(n, p)`.
#[derive(Debug, Clone)]
pub struct BinomialDistribution {
    try_count: u64,
    probability: f64,
    sampler: rand_distr::Binomial,
}

impl BinomialDistribution {
    /// Fails when `probability` is outside `[0, 1]`, or when `try_count` is
    /// so large that the expected count of the rarer outcome does not fit
    /// in an `i64`.
    #[expect(clippy::cast_precision_loss)]
    pub fn new(try_count: u64, probability: f64) -> Result<Self, DistributionError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(DistributionError::ProbabilityOutOfRange { probability });
        }
        let rarer = probability.min(1.0 - probability);
        if try_count as f64 * rarer + rarer >= i64::MAX as f64 {
            return Err(DistributionError::InvalidTryCount {
                try_count: try_count as f64,
            });
        }
        let sampler = rand_distr::Binomial::new(try_count, probability)
            .map_err(|_| DistributionError::ProbabilityOutOfRange { probability })?;
        Ok(Self {
            try_count,
            probability,
            sampler,
        })
    }

    #[must_use]
    pub fn try_count(&self) -> u64 {
        self.try_count
    }

    #[must_use]
    pub fn probability_of_success(&self) -> f64 {
        self.probability
    }

    /// Double-precision probability mass at `occur_count`.
    #[expect(clippy::cast_precision_loss)]
    fn pmf(&self, occur_count: u64) -> f64 {
        let (n, k, p) = (self.try_count, occur_count, self.probability);
        if p <= 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if p >= 1.0 {
            return if k == n { 1.0 } else { 0.0 };
        }
        let ln_cases = libm::lgamma((n + 1) as f64)
            - libm::lgamma((k + 1) as f64)
            - libm::lgamma((n - k + 1) as f64);
        (ln_cases + k as f64 * p.ln() + (n - k) as f64 * (-p).ln_1p()).exp()
    }
}

impl DistributionModel for BinomialDistribution {
    fn name(&self) -> &'static str {
        "Binomial distribution"
    }

    fn expression(&self) -> String {
        format!("B({}, {})", self.try_count, self.probability)
    }

    #[expect(clippy::cast_precision_loss)]
    fn support(&self) -> RandomVariable {
        RandomVariable::discrete(Interval::closed(0.0, self.try_count as f64), 1.0)
    }

    #[expect(clippy::cast_precision_loss)]
    fn mean(&self) -> f64 {
        self.try_count as f64 * self.probability
    }

    #[expect(clippy::cast_precision_loss)]
    fn variance(&self) -> f64 {
        self.try_count as f64 * self.probability * (1.0 - self.probability)
    }

    #[expect(clippy::cast_precision_loss)]
    fn generate<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        rng.sample::<u64, _>(&self.sampler) as f64
    }

    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn probability(&self, begin: f64, end: f64) -> f64 {
        if begin.is_nan() || end.is_nan() {
            return 0.0;
        }
        let first = begin.ceil().max(0.0);
        let last = end.floor().min(self.try_count as f64);
        if first > last {
            return 0.0;
        }
        (first as u64..=last as u64).map(|k| self.pmf(k)).sum()
    }
}

/// Normal distribution `N(μ, σ²)`.
#[derive(Debug, Clone)]
pub struct NormalDistribution {
    mean: f64,
    standard_deviation: f64,
    sampler: rand_distr::Normal<f64>,
}

impl NormalDistribution {
    pub fn new(mean: f64, standard_deviation: f64) -> Result<Self, DistributionError> {
        if !mean.is_finite() {
            return Err(DistributionError::NonFiniteMean { mean });
        }
        if standard_deviation.is_nan() || standard_deviation <= 0.0 {
            return Err(DistributionError::NonPositiveStandardDeviation { standard_deviation });
        }
        Self::with_spread(mean, standard_deviation)
    }

    /// Like [`new`](Self::new), but `standard_deviation == 0` is accepted and
    /// yields a point mass at `mean`.
    ///
    /// Only the sample-mean prediction builds these: a binomial population
    /// with `p` of 0 or 1 has no spread, and neither do its sample means.
    pub(crate) fn point_or_spread(
        mean: f64,
        standard_deviation: f64,
    ) -> Result<Self, DistributionError> {
        if !mean.is_finite() {
            return Err(DistributionError::NonFiniteMean { mean });
        }
        if standard_deviation.is_nan() || standard_deviation < 0.0 {
            return Err(DistributionError::NonPositiveStandardDeviation { standard_deviation });
        }
        Self::with_spread(mean, standard_deviation)
    }

    fn with_spread(mean: f64, standard_deviation: f64) -> Result<Self, DistributionError> {
        let sampler = rand_distr::Normal::new(mean, standard_deviation)
            .map_err(|_| DistributionError::NonPositiveStandardDeviation { standard_deviation })?;
        Ok(Self {
            mean,
            standard_deviation,
            sampler,
        })
    }
}

impl DistributionModel for NormalDistribution {
    fn name(&self) -> &'static str {
        "Normal distribution"
    }

    fn expression(&self) -> String {
        format!("N({}, {}^2)", self.mean, self.standard_deviation)
    }

    fn support(&self) -> RandomVariable {
        RandomVariable::continuous(Interval::REAL)
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }

    fn generate<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        rng.sample(&self.sampler)
    }

    fn probability(&self, begin: f64, end: f64) -> f64 {
        if begin.is_nan() || end.is_nan() || begin > end {
            return 0.0;
        }
        if self.standard_deviation == 0.0 {
            return if (begin..=end).contains(&self.mean) {
                1.0
            } else {
                0.0
            };
        }
        math::normal_cdf(end, self.mean, self.standard_deviation)
            - math::normal_cdf(begin, self.mean, self.standard_deviation)
    }
}

/// A distribution of one of the supported families.
///
/// Cloning yields an independent copy; there is no random state to share.
#[derive(Debug, Clone, derive_more::From)]
pub enum Distribution {
    Binomial(BinomialDistribution),
    Normal(NormalDistribution),
}

impl Distribution {
    pub fn binomial(try_count: u64, probability: f64) -> Result<Self, DistributionError> {
        BinomialDistribution::new(try_count, probability).map(Self::from)
    }

    pub fn normal(mean: f64, standard_deviation: f64) -> Result<Self, DistributionError> {
        NormalDistribution::new(mean, standard_deviation).map(Self::from)
    }
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            Distribution::Binomial($inner) => $body,
            Distribution::Normal($inner) => $body,
        }
    };
}

impl DistributionModel for Distribution {
    fn name(&self) -> &'static str {
        dispatch!(self, d => d.name())
    }

    fn expression(&self) -> String {
        dispatch!(self, d => d.expression())
    }

    fn support(&self) -> RandomVariable {
        dispatch!(self, d => d.support())
    }

    fn mean(&self) -> f64 {
        dispatch!(self, d => d.mean())
    }

    fn variance(&self) -> f64 {
        dispatch!(self, d => d.variance())
    }

    fn standard_deviation(&self) -> f64 {
        dispatch!(self, d => d.standard_deviation())
    }

    fn generate<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        dispatch!(self, d => d.generate(rng))
    }

    fn probability(&self, begin: f64, end: f64) -> f64 {
        dispatch!(self, d => d.probability(begin, end))
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression())
    }
}
