use std::{fmt, io};

use serde::Serialize;
use statsim_core::{Dataset, DistributionModel as _, StatisticsError};

/// A reference figure next to the one observed in the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct Comparison {
    pub expected: f64,
    pub observed: f64,
    pub error: f64,
}

impl Comparison {
    pub fn new(expected: f64, observed: f64) -> Self {
        Self {
            expected,
            observed,
            error: observed - expected,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {}, observed {} (error {:+})",
            self.expected, self.observed, self.error
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct MomentComparison {
    pub mean: Comparison,
    pub variance: Comparison,
    pub standard_deviation: Comparison,
}

impl MomentComparison {
    /// Compares the moments of `dataset` with those of its distribution.
    pub fn theoretical<D>(dataset: &D) -> Result<Self, StatisticsError>
    where
        D: Dataset + ?Sized,
    {
        let distribution = dataset.distribution();
        Ok(Self {
            mean: Comparison::new(distribution.mean(), dataset.mean()?),
            variance: Comparison::new(distribution.variance(), dataset.variance()?),
            standard_deviation: Comparison::new(
                distribution.standard_deviation(),
                dataset.standard_deviation()?,
            ),
        })
    }

    /// Compares the empirical moments of `dataset` with those of `reference`.
    pub fn empirical<R, D>(reference: &R, dataset: &D) -> Result<Self, StatisticsError>
    where
        R: Dataset + ?Sized,
        D: Dataset + ?Sized,
    {
        Ok(Self {
            mean: Comparison::new(reference.mean()?, dataset.mean()?),
            variance: Comparison::new(reference.variance()?, dataset.variance()?),
            standard_deviation: Comparison::new(
                reference.standard_deviation()?,
                dataset.standard_deviation()?,
            ),
        })
    }

    pub fn write_to<W>(&self, out: &mut W) -> io::Result<()>
    where
        W: io::Write + ?Sized,
    {
        writeln!(out, "mean:               {}", self.mean)?;
        writeln!(out, "variance:           {}", self.variance)?;
        writeln!(out, "standard deviation: {}", self.standard_deviation)
    }
}

#[cfg(test)]
mod tests {
    use statsim_core::{Distribution, Population};

    use super::*;

    #[test]
    fn test_comparison_error_sign() {
        let comparison = Comparison::new(2.0, 1.5);
        assert_eq!(comparison.error, -0.5);
        assert_eq!(comparison.to_string(), "expected 2, observed 1.5 (error -0.5)");
    }

    #[test]
    fn test_theoretical_moments() {
        let distribution = Distribution::normal(2.0, 1.0).unwrap();
        let population = Population::from_values(vec![1.0, 3.0], distribution);
        let moments = MomentComparison::theoretical(&population).unwrap();
        assert_eq!(moments.mean, Comparison::new(2.0, 2.0));
        assert_eq!(moments.variance, Comparison::new(1.0, 1.0));

        let mut out = vec![];
        moments.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("mean:"));
    }
}
