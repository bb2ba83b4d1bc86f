//! Populations, samples and the distributions behind them.
//!
//! The crate models a statistics classroom experiment: generate a
//! [`Population`] from a binomial or normal [`Distribution`], draw repeated
//! samples from it, and compare what the theory predicts with what the data
//! shows. All randomness comes from an RNG passed in by the caller, so a
//! fixed seed reproduces a whole session.
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use statsim_core::{
//!     Dataset as _, Distribution, DistributionModel as _, Population, SamplingMethod,
//! };
//!
//! let mut rng = Pcg32::seed_from_u64(7);
//! let distribution = Distribution::binomial(10, 0.5).unwrap();
//! let mut population = Population::generate(1000, distribution, &mut rng);
//! assert!((population.mean().unwrap() - population.distribution().mean()).abs() < 0.5);
//!
//! let sample = population
//!     .draw_sample(100, SamplingMethod::WithoutReplacement, &mut rng)
//!     .unwrap();
//! let estimate = sample.confidence_level(1.96).unwrap();
//! assert!((estimate.level - 0.95).abs() < 1e-3);
//! ```

pub use self::{
    confidence::ConfidenceEstimate,
    data::{Data, Dataset, StatisticsError},
    distribution::{
        BinomialDistribution, Distribution, DistributionError, DistributionModel,
        NormalDistribution,
    },
    fitter::{DistributionFamily, DistributionFitter, FitError, Parameter},
    interval::{Interval, RandomVariable},
    population::{Population, PopulationId, SampleError, SamplingMethod},
    sample::{Sample, SampleIndex},
    seed::SimulationSeed,
};

pub mod confidence;
pub mod data;
pub mod data_file;
pub mod distribution;
pub mod fitter;
pub mod interval;
pub mod math;
pub mod pdf_program;
pub mod population;
pub mod sample;
pub mod seed;
