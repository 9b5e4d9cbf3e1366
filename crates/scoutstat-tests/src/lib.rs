//! Two-sample hypothesis tests for comparing scouting metrics.
//!
//! Provides Welch's unequal-variance t-test over two numeric samples, such as
//! one team's per-match scores against another's. Each test returns a
//! [`WelchResult`] with the mean difference, t statistic, degrees of freedom,
//! two-tailed p-value and a confidence interval.

pub mod distribution;

use serde::Serialize;

pub use distribution::{incomplete_beta, inverse_normal, ln_gamma, student_t_cdf, t_inverse};

/// Significance level used by [`welch_t_test`].
pub const DEFAULT_ALPHA: f64 = 0.05;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TestError {
    #[error("each sample needs at least 2 observations (got {first} and {second})")]
    InvalidSampleSize { first: usize, second: usize },
    #[error("alpha must be strictly between 0 and 1 (got {0})")]
    InvalidAlpha(f64),
}

/// Result of a Welch two-sample t-test.
///
/// `mean_difference` is `mean1 - mean2`. When both samples have zero variance
/// the standard error is 0 and `t_statistic`, `degrees_of_freedom`, `p_value`
/// and the interval bounds come out as NaN or infinite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WelchResult {
    pub mean1: f64,
    pub mean2: f64,
    pub mean_difference: f64,
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub confidence_interval: (f64, f64),
}

impl WelchResult {
    /// True when the p-value is below the test's alpha.
    pub fn significant(&self) -> bool {
        self.p_value < self.alpha
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample variance (n - 1 denominator).
fn sample_variance(xs: &[f64], mean: f64) -> f64 {
    xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64
}

// ═══════════════════════════════════════════════════════════════════════════════
// Welch t-test
// ═══════════════════════════════════════════════════════════════════════════════

/// Welch's t-test at [`DEFAULT_ALPHA`].
pub fn welch_t_test(sample1: &[f64], sample2: &[f64]) -> Result<WelchResult, TestError> {
    welch_t_test_with_alpha(sample1, sample2, DEFAULT_ALPHA)
}

/// Welch's t-test with a `1 - alpha` confidence interval.
pub fn welch_t_test_with_alpha(
    sample1: &[f64],
    sample2: &[f64],
    alpha: f64,
) -> Result<WelchResult, TestError> {
    let (n1, n2) = (sample1.len(), sample2.len());
    if n1 < 2 || n2 < 2 {
        return Err(TestError::InvalidSampleSize {
            first: n1,
            second: n2,
        });
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(TestError::InvalidAlpha(alpha));
    }

    let mean1 = mean(sample1);
    let mean2 = mean(sample2);
    let w1 = sample_variance(sample1, mean1) / n1 as f64;
    let w2 = sample_variance(sample2, mean2) / n2 as f64;

    let se = (w1 + w2).sqrt();
    let diff = mean1 - mean2;
    let t = diff / se;

    // Welch–Satterthwaite
    let df = (w1 + w2).powi(2) / (w1 * w1 / (n1 - 1) as f64 + w2 * w2 / (n2 - 1) as f64);

    let p = 2.0 * (1.0 - student_t_cdf(t.abs(), df));
    let t_crit = t_inverse(1.0 - alpha / 2.0, df);
    let margin = t_crit * se;

    Ok(WelchResult {
        mean1,
        mean2,
        mean_difference: diff,
        t_statistic: t,
        degrees_of_freedom: df,
        p_value: p,
        alpha,
        confidence_interval: (diff - margin, diff + margin),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_identical_samples() {
        let r = welch_t_test(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(r.mean_difference, 0.0);
        assert_eq!(r.t_statistic, 0.0);
        assert!(close(r.degrees_of_freedom, 4.0, 1e-12));
        assert!(close(r.p_value, 1.0, 1e-9));
        assert!(!r.significant());
        let (lo, hi) = r.confidence_interval;
        assert!(close(lo, -hi, 1e-12));
        assert!(close(hi, 3.649_307_893_52, 1e-8));
    }

    #[test]
    fn test_separated_samples() {
        let a = [10.0, 12.0, 14.0, 16.0, 18.0];
        let b = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0];
        let r = welch_t_test(&a, &b).unwrap();
        assert_eq!(r.mean1, 14.0);
        assert_eq!(r.mean2, 22.5);
        assert_eq!(r.mean_difference, -8.5);
        assert!(close(r.t_statistic, -5.288_453_643_125, 1e-9));
        assert!(close(r.degrees_of_freedom, 6.248_374_512_354, 1e-9));
        assert!(close(r.p_value, 0.001_630_195_877, 1e-6));
        assert!(r.significant());
        let (lo, hi) = r.confidence_interval;
        assert!(close(lo, -16.749_928_102_615, 1e-6));
        assert!(close(hi, -0.250_071_897_385, 1e-6));
    }

    #[test]
    fn test_alpha_narrows_interval() {
        let a = [10.0, 12.0, 14.0, 16.0, 18.0];
        let b = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0];
        let r = welch_t_test_with_alpha(&a, &b, 0.1).unwrap();
        let (lo, hi) = r.confidence_interval;
        assert!(close(lo, -15.423_557_903_503, 1e-6));
        assert!(close(hi, -1.576_442_096_497, 1e-6));
    }

    #[test]
    fn test_sample_too_small() {
        let err = welch_t_test(&[1.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, TestError::InvalidSampleSize { first: 1, second: 3 });
        assert!(welch_t_test(&[1.0, 2.0], &[]).is_err());
    }

    #[test]
    fn test_invalid_alpha() {
        let a = [1.0, 2.0, 3.0];
        for alpha in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                welch_t_test_with_alpha(&a, &a, alpha),
                Err(TestError::InvalidAlpha(_))
            ));
        }
    }

    #[test]
    fn test_zero_variance_is_nan() {
        let r = welch_t_test(&[5.0, 5.0], &[5.0, 5.0]).unwrap();
        assert_eq!(r.mean_difference, 0.0);
        assert!(r.t_statistic.is_nan());
        assert!(r.p_value.is_nan());
    }
}
