//! Closed-form probability helpers used for reporting.
//!
//! [`binomial_pmf`] evaluates the binomial coefficient exactly with
//! arbitrary-precision integers and only drops to `f64` for the final
//! combination, so it stays accurate for try counts where `C(n, k)` no
//! longer fits in a double. [`normal_cdf`] goes through the complementary
//! error function, which keeps the lower tail precise.

use std::f64::consts::{LN_2, SQRT_2};

use num_bigint::BigUint;
use num_traits::{One as _, ToPrimitive as _, Zero as _};

/// Largest bit length converted to `f64` directly before switching to
/// mantissa/exponent splitting.
const MAX_DIRECT_BITS: u64 = 1000;

/// Returns `C(n, r)` exactly, or zero when `r > n`.
///
/// # Examples
///
/// ```
/// use num_bigint::BigUint;
/// use statsim_core::math::binomial_coefficient;
///
/// assert_eq!(binomial_coefficient(5, 2), BigUint::from(10u32));
/// assert_eq!(binomial_coefficient(3, 4), BigUint::from(0u32));
/// ```
#[must_use]
pub fn binomial_coefficient(n: u64, r: u64) -> BigUint {
    if r > n {
        return BigUint::zero();
    }
    let r = r.min(n - r);
    let mut result = BigUint::one();
    for i in 0..r {
        // Exact at every step: the running product of i+1 consecutive
        // integers is divisible by (i+1)!.
        result *= n - i;
        result /= i + 1;
    }
    result
}

/// Natural logarithm of a big unsigned integer.
#[expect(clippy::cast_precision_loss)]
fn ln_big(value: &BigUint) -> f64 {
    let bits = value.bits();
    if bits <= MAX_DIRECT_BITS {
        return value.to_f64().map_or(f64::INFINITY, f64::ln);
    }
    let shift = bits - 64;
    let top = (value >> shift).to_f64().unwrap_or(f64::INFINITY);
    top.ln() + shift as f64 * LN_2
}

/// Probability of exactly `occur_count` successes in `try_count` Bernoulli
/// trials with success probability `probability`.
///
/// # Examples
///
/// ```
/// use statsim_core::math::binomial_pmf;
///
/// assert!((binomial_pmf(10, 5, 0.5) - 252.0 / 1024.0).abs() < 1e-12);
/// assert_eq!(binomial_pmf(10, 11, 0.5), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn binomial_pmf(try_count: u64, occur_count: u64, probability: f64) -> f64 {
    if occur_count > try_count {
        return 0.0;
    }
    if probability <= 0.0 {
        return if occur_count == 0 { 1.0 } else { 0.0 };
    }
    if probability >= 1.0 {
        return if occur_count == try_count { 1.0 } else { 0.0 };
    }

    let ln_cases = ln_big(&binomial_coefficient(try_count, occur_count));
    let ln_occur = occur_count as f64 * probability.ln();
    let ln_not_occur = (try_count - occur_count) as f64 * (-probability).ln_1p();
    (ln_cases + ln_occur + ln_not_occur).exp()
}

/// Cumulative distribution function of `N(mean, standard_deviation²)`.
///
/// # Examples
///
/// ```
/// use statsim_core::math::normal_cdf;
///
/// assert!((normal_cdf(0.0, 0.0, 1.0) - 0.5).abs() < 1e-15);
/// assert!((normal_cdf(1.96, 0.0, 1.0) - 0.975).abs() < 1e-4);
/// ```
#[must_use]
pub fn normal_cdf(value: f64, mean: f64, standard_deviation: f64) -> f64 {
    0.5 * libm::erfc((mean - value) / standard_deviation / SQRT_2)
}

/// Cumulative distribution function of the standard normal distribution.
#[must_use]
pub fn standard_normal_cdf(z: f64) -> f64 {
    normal_cdf(z, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial_coefficient_symmetry() {
        for k in 0..=20 {
            assert_eq!(binomial_coefficient(20, k), binomial_coefficient(20, 20 - k));
        }
        assert_eq!(binomial_coefficient(20, 10), BigUint::from(184_756u32));
        assert_eq!(binomial_coefficient(0, 0), BigUint::from(1u32));
    }

    #[test]
    fn test_binomial_pmf_sums_to_one() {
        let total: f64 = (0..=30).map(|k| binomial_pmf(30, k, 0.3)).sum();
        assert!((total - 1.0).abs() < 1e-12, "total = {total}");
    }

    #[test]
    fn test_binomial_pmf_degenerate_probabilities() {
        assert_eq!(binomial_pmf(5, 0, 0.0), 1.0);
        assert_eq!(binomial_pmf(5, 1, 0.0), 0.0);
        assert_eq!(binomial_pmf(5, 5, 1.0), 1.0);
        assert_eq!(binomial_pmf(5, 4, 1.0), 0.0);
    }

    #[test]
    fn test_binomial_pmf_large_try_count() {
        // C(2000, 1000) overflows f64, the pmf itself does not.
        let pmf = binomial_pmf(2000, 1000, 0.5);
        let expected = 1.0 / (std::f64::consts::PI * 1000.0).sqrt();
        assert!((pmf - expected).abs() / expected < 1e-3, "pmf = {pmf}");
    }

    #[test]
    fn test_normal_cdf_symmetry_and_tails() {
        for z in [0.1, 0.5, 1.0, 2.0, 3.5] {
            let sum = standard_normal_cdf(z) + standard_normal_cdf(-z);
            assert!((sum - 1.0).abs() < 1e-14);
        }
        assert_eq!(standard_normal_cdf(f64::INFINITY), 1.0);
        assert_eq!(standard_normal_cdf(f64::NEG_INFINITY), 0.0);
        assert!(standard_normal_cdf(-10.0) > 0.0);
    }

    #[test]
    fn test_normal_cdf_scales() {
        assert!((normal_cdf(12.0, 10.0, 2.0) - standard_normal_cdf(1.0)).abs() < 1e-15);
    }
}
