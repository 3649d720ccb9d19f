//! One-sample confidence intervals and two-tailed tests for a population mean.
//!
//! The reference distribution is the standard normal when the population
//! standard deviation is known and Student's t with `n - 1` degrees of freedom
//! when only the sample standard deviation is available.

use crate::testing::utils::{
    normal_critical_value, normal_two_tailed_p_value, t_critical_value, t_two_tailed_p_value,
    validate_alpha, validate_dispersion, validate_min_size,
};
use crate::testing::{Result, SampleSummary, TestResult};
use tracing::debug;

/// Perform a one-sample test of `H₀: μ = null_mean` against a two-sided alternative.
///
/// # Arguments
///
/// * `sample` - Sample mean, dispersion and size. The dispersion is read as the
///   population σ when `use_z` is set and as the sample s otherwise.
/// * `null_mean` - Hypothesized population mean μ₀
/// * `alpha` - Significance level in (0, 1)
/// * `use_z` - Use the normal distribution (σ known) instead of Student's t
///
/// # Returns
///
/// `TestResult` with the confidence interval centered at the sample mean. The
/// degrees of freedom are only set on the t branch.
///
/// # Errors
///
/// `InvalidParameter` when the dispersion is not positive, alpha is outside
/// (0, 1), or the t branch receives fewer than two observations.
pub fn one_sample_test(
    sample: &SampleSummary,
    null_mean: f64,
    alpha: f64,
    use_z: bool,
) -> Result<TestResult> {
    validate_alpha(alpha)?;
    validate_dispersion("standard deviation", sample.std_dev)?;
    if !use_z {
        validate_min_size("sample size", sample.size, 2)?;
    }

    let standard_error = sample.std_dev / (sample.size as f64).sqrt();
    let statistic = (sample.mean - null_mean) / standard_error;

    let result = if use_z {
        let critical = normal_critical_value(alpha)?;
        let p_value = normal_two_tailed_p_value(statistic);
        TestResult::from_pivot(
            sample.mean,
            null_mean,
            standard_error,
            critical,
            statistic,
            p_value,
            alpha,
        )
    } else {
        let df = (sample.size - 1) as f64;
        let critical = t_critical_value(alpha, df)?;
        let p_value = t_two_tailed_p_value(statistic, df)?;
        TestResult::from_pivot(
            sample.mean,
            null_mean,
            standard_error,
            critical,
            statistic,
            p_value,
            alpha,
        )
        .with_degrees_of_freedom(df)
    };

    debug!(
        use_z,
        statistic = result.statistic,
        p_value = result.p_value,
        reject_null = result.reject_null,
        "one-sample test"
    );

    Ok(result)
}

/// Z-test: population standard deviation known.
pub fn z_test(sample: &SampleSummary, null_mean: f64, alpha: f64) -> Result<TestResult> {
    one_sample_test(sample, null_mean, alpha, true)
}

/// One-sample t-test: population standard deviation estimated by the sample.
pub fn t_test(sample: &SampleSummary, null_mean: f64, alpha: f64) -> Result<TestResult> {
    one_sample_test(sample, null_mean, alpha, false)
}
