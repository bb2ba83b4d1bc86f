//! Building distributions from named parameters.
//!
//! A [`DistributionFitter`] collects parameters one at a time and produces a
//! [`Distribution`] on demand. Each family accepts either its defining
//! parameters directly or the first two moments, so the same fitter serves
//! both "generate from these parameters" and "fit to loaded data".
//!
//! | Family   | Direct                      | From moments                          |
//! |----------|-----------------------------|---------------------------------------|
//! | Binomial | `TryCount`, `Probability`   | `Mean`, `Variance` (method of moments)|
//! | Normal   | `Mean`, `StandardDeviation` | `Mean`, `Variance`                    |
//!
//! # Example
//!
//! ```
//! use statsim_core::{
//!     distribution::DistributionModel as _,
//!     fitter::DistributionFamily,
//! };
//!
//! let mut fitter = DistributionFamily::Binomial.fitter();
//! fitter.set_parameter("Mean", 5.0).unwrap();
//! fitter.set_parameter("Variance", 2.5).unwrap();
//! let distribution = fitter.fit().unwrap();
//! assert_eq!(distribution.expression(), "B(10, 0.5)");
//! ```

use crate::distribution::{self, Distribution, DistributionError};

/// Parameter names understood by the fitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub enum Parameter {
    TryCount,
    Probability,
    Mean,
    Variance,
    StandardDeviation,
}

/// The supported distribution families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub enum DistributionFamily {
    Binomial,
    Normal,
}

impl DistributionFamily {
    pub const ALL: [Self; 2] = [Self::Binomial, Self::Normal];

    /// Returns an empty fitter for this family.
    #[must_use]
    pub fn fitter(self) -> Box<dyn DistributionFitter> {
        match self {
            Self::Binomial => Box::new(BinomialFitter::default()),
            Self::Normal => Box::new(NormalFitter::default()),
        }
    }

    /// The parameters that define this family directly.
    #[must_use]
    pub fn defining_parameters(self) -> &'static [Parameter] {
        match self {
            Self::Binomial => &[Parameter::TryCount, Parameter::Probability],
            Self::Normal => &[Parameter::Mean, Parameter::StandardDeviation],
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum FitError {
    #[display("unknown parameter: {name}")]
    UnknownParameter { name: String },
    #[display("{family} distribution does not take {parameter}")]
    UnsupportedParameter {
        family: DistributionFamily,
        parameter: Parameter,
    },
    #[display("{family} distribution needs {needed}")]
    MissingParameters {
        family: DistributionFamily,
        needed: &'static str,
    },
    #[display("no observations to fit")]
    NoObservations,
    #[display("invalid distribution parameters")]
    #[from]
    Distribution(DistributionError),
}

/// Accumulates parameters and builds a distribution from them.
pub trait DistributionFitter {
    fn family(&self) -> DistributionFamily;

    fn set(&mut self, parameter: Parameter, value: f64) -> Result<(), FitError>;

    /// Like [`Self::set`], with the parameter given by name (e.g. `"TryCount"`).
    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), FitError> {
        let parameter = name
            .parse::<Parameter>()
            .map_err(|_| FitError::UnknownParameter {
                name: name.to_owned(),
            })?;
        self.set(parameter, value)
    }

    fn fit(&self) -> Result<Distribution, FitError>;
}

#[derive(Debug, Default, Clone)]
pub struct BinomialFitter {
    try_count: Option<u64>,
    probability: Option<f64>,
    mean: Option<f64>,
    variance: Option<f64>,
}

impl DistributionFitter for BinomialFitter {
    fn family(&self) -> DistributionFamily {
        DistributionFamily::Binomial
    }

    fn set(&mut self, parameter: Parameter, value: f64) -> Result<(), FitError> {
        match parameter {
            Parameter::TryCount => self.try_count = Some(distribution::checked_try_count(value)?),
            Parameter::Probability => self.probability = Some(value),
            Parameter::Mean => self.mean = Some(value),
            Parameter::Variance => self.variance = Some(value),
            Parameter::StandardDeviation => {
                return Err(FitError::UnsupportedParameter {
                    family: self.family(),
                    parameter,
                });
            }
        }
        Ok(())
    }

    fn fit(&self) -> Result<Distribution, FitError> {
        if let (Some(try_count), Some(probability)) = (self.try_count, self.probability) {
            return Ok(Distribution::binomial(try_count, probability)?);
        }
        if let (Some(mean), Some(variance)) = (self.mean, self.variance) {
            // mean = np, variance = npq  =>  q = variance / mean
            let probability = 1.0 - variance / mean;
            if !(0.0..=1.0).contains(&probability) {
                return Err(DistributionError::ProbabilityOutOfRange { probability }.into());
            }
            let try_count = distribution::checked_try_count((mean / probability).round())?;
            log::debug!(
                "fitted binomial: mean={mean}, variance={variance} -> n={try_count}, p={probability}"
            );
            return Ok(Distribution::binomial(try_count, probability)?);
        }
        Err(FitError::MissingParameters {
            family: self.family(),
            needed: "TryCount and Probability, or Mean and Variance",
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct NormalFitter {
    mean: Option<f64>,
    standard_deviation: Option<f64>,
}

impl DistributionFitter for NormalFitter {
    fn family(&self) -> DistributionFamily {
        DistributionFamily::Normal
    }

    fn set(&mut self, parameter: Parameter, value: f64) -> Result<(), FitError> {
        match parameter {
            Parameter::Mean => self.mean = Some(value),
            Parameter::StandardDeviation => self.standard_deviation = Some(value),
            Parameter::Variance => self.standard_deviation = Some(value.sqrt()),
            Parameter::TryCount | Parameter::Probability => {
                return Err(FitError::UnsupportedParameter {
                    family: self.family(),
                    parameter,
                });
            }
        }
        Ok(())
    }

    fn fit(&self) -> Result<Distribution, FitError> {
        let (Some(mean), Some(standard_deviation)) = (self.mean, self.standard_deviation) else {
            return Err(FitError::MissingParameters {
                family: self.family(),
                needed: "Mean and StandardDeviation (or Variance)",
            });
        };
        Ok(Distribution::normal(mean, standard_deviation)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::DistributionModel as _;

    #[test]
    fn test_binomial_direct_parameters_win_over_moments() {
        let mut fitter = BinomialFitter::default();
        fitter.set(Parameter::Mean, 1.0).unwrap();
        fitter.set(Parameter::Variance, 0.5).unwrap();
        fitter.set(Parameter::TryCount, 20.0).unwrap();
        fitter.set(Parameter::Probability, 0.25).unwrap();
        let distribution = fitter.fit().unwrap();
        assert_eq!(distribution.expression(), "B(20, 0.25)");
    }

    #[test]
    fn test_binomial_method_of_moments() {
        let mut fitter = BinomialFitter::default();
        fitter.set(Parameter::Mean, 30.0).unwrap();
        fitter.set(Parameter::Variance, 21.0).unwrap();
        let Distribution::Binomial(binomial) = fitter.fit().unwrap() else {
            panic!("expected a binomial distribution");
        };
        assert_eq!(binomial.try_count(), 100);
        assert!((binomial.probability_of_success() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_binomial_moments_with_overdispersion_fail() {
        let mut fitter = BinomialFitter::default();
        fitter.set(Parameter::Mean, 2.0).unwrap();
        fitter.set(Parameter::Variance, 5.0).unwrap();
        assert!(matches!(
            fitter.fit(),
            Err(FitError::Distribution(
                DistributionError::ProbabilityOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn test_binomial_missing_parameters() {
        let mut fitter = BinomialFitter::default();
        fitter.set(Parameter::TryCount, 10.0).unwrap();
        fitter.set(Parameter::Mean, 3.0).unwrap();
        assert!(matches!(
            fitter.fit(),
            Err(FitError::MissingParameters {
                family: DistributionFamily::Binomial,
                ..
            })
        ));
    }

    #[test]
    fn test_binomial_rejects_fractional_try_count() {
        let mut fitter = BinomialFitter::default();
        assert!(matches!(
            fitter.set(Parameter::TryCount, 2.5),
            Err(FitError::Distribution(
                DistributionError::InvalidTryCount { .. }
            ))
        ));
    }

    #[test]
    fn test_binomial_rejects_try_count_beyond_range() {
        let mut fitter = BinomialFitter::default();
        let error = fitter.set(Parameter::TryCount, 1e30).unwrap_err();
        assert!(matches!(
            error,
            FitError::Distribution(DistributionError::InvalidTryCount { .. })
        ));
        assert_eq!(error.to_string(), "invalid distribution parameters");

        // Method of moments: mean 1e30 with p = 0.5 asks for n = 2e30.
        let mut fitter = BinomialFitter::default();
        fitter.set(Parameter::Mean, 1e30).unwrap();
        fitter.set(Parameter::Variance, 5e29).unwrap();
        assert!(matches!(
            fitter.fit(),
            Err(FitError::Distribution(
                DistributionError::InvalidTryCount { .. }
            ))
        ));
    }

    #[test]
    fn test_normal_from_variance() {
        let mut fitter = NormalFitter::default();
        fitter.set_parameter("Mean", 1.0).unwrap();
        fitter.set_parameter("Variance", 9.0).unwrap();
        let distribution = fitter.fit().unwrap();
        assert_eq!(distribution.mean(), 1.0);
        assert_eq!(distribution.standard_deviation(), 3.0);
    }

    #[test]
    fn test_normal_missing_mean() {
        let mut fitter = NormalFitter::default();
        fitter.set_parameter("StandardDeviation", 1.0).unwrap();
        assert!(matches!(
            fitter.fit(),
            Err(FitError::MissingParameters { .. })
        ));
    }

    #[test]
    fn test_parameter_names() {
        let mut fitter = DistributionFamily::Normal.fitter();
        assert!(matches!(
            fitter.set_parameter("Skewness", 1.0),
            Err(FitError::UnknownParameter { .. })
        ));
        assert!(matches!(
            fitter.set_parameter("TryCount", 1.0),
            Err(FitError::UnsupportedParameter {
                parameter: Parameter::TryCount,
                ..
            })
        ));
    }

    #[test]
    fn test_family_registry() {
        for family in DistributionFamily::ALL {
            assert_eq!(family.fitter().family(), family);
            assert_eq!(family.defining_parameters().len(), 2);
        }
        assert_eq!(
            "normal".parse::<DistributionFamily>().unwrap(),
            DistributionFamily::Normal
        );
        assert_eq!(DistributionFamily::Binomial.to_string(), "Binomial");
    }
}
