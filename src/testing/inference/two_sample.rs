//! Two-sample t-tests for a difference of means.
//!
//! Pooled, Welch and paired tests differ only in how the standard error of the
//! mean difference and the degrees of freedom are formed; the critical value,
//! p-value, interval and power computation are shared.

use crate::testing::utils::{
    t_critical_value, t_two_tailed_p_value, validate_alpha, validate_dispersion,
    validate_min_size,
};
use crate::testing::{
    InferenceError, PowerAnalysis, Result, SampleSummary, TestFamily, TestResult,
};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// Standard error of the mean difference and its degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardErrorTerms {
    pub standard_error: f64,
    pub degrees_of_freedom: f64,
}

/// Pooled variance, ((n1-1)s1² + (n2-1)s2²) / (n1+n2-2).
pub fn pooled_variance(first: &SampleSummary, second: &SampleSummary) -> Result<f64> {
    validate_min_size("first sample size", first.size, 2)?;
    validate_min_size("second sample size", second.size, 2)?;

    let n1 = first.size as f64;
    let n2 = second.size as f64;
    Ok(((n1 - 1.0) * first.variance() + (n2 - 1.0) * second.variance()) / (n1 + n2 - 2.0))
}

/// Welch-Satterthwaite degrees of freedom for two samples with unequal variances.
pub fn welch_satterthwaite_df(first: &SampleSummary, second: &SampleSummary) -> Result<f64> {
    validate_min_size("first sample size", first.size, 2)?;
    validate_min_size("second sample size", second.size, 2)?;

    let n1 = first.size as f64;
    let n2 = second.size as f64;
    let term1 = first.variance() / n1;
    let term2 = second.variance() / n2;
    let combined_var = term1 + term2;

    let denominator = term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0);
    if denominator <= 0.0 {
        return Err(InferenceError::invalid(
            "Welch degrees of freedom are undefined when both samples have zero variance",
        ));
    }
    Ok(combined_var * combined_var / denominator)
}

/// Compute the family-specific standard error and degrees of freedom.
///
/// # Errors
///
/// `InvalidParameter` if a sample has fewer than two observations, the
/// resulting standard error is not positive, the family is a one-sample
/// family, or paired samples differ in size.
pub fn standard_error_terms(
    first: &SampleSummary,
    second: &SampleSummary,
    family: TestFamily,
) -> Result<StandardErrorTerms> {
    validate_min_size("first sample size", first.size, 2)?;
    validate_min_size("second sample size", second.size, 2)?;

    let n1 = first.size as f64;
    let n2 = second.size as f64;

    let terms = match family {
        TestFamily::Pooled => {
            let pooled_var = pooled_variance(first, second)?;
            StandardErrorTerms {
                standard_error: (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(),
                degrees_of_freedom: n1 + n2 - 2.0,
            }
        }
        TestFamily::Welch => {
            let combined_var = first.variance() / n1 + second.variance() / n2;
            validate_dispersion("standard error of the difference", combined_var.sqrt())?;
            StandardErrorTerms {
                standard_error: combined_var.sqrt(),
                degrees_of_freedom: welch_satterthwaite_df(first, second)?,
            }
        }
        TestFamily::Paired { sd_of_differences } => {
            if first.size != second.size {
                return Err(InferenceError::invalid(format!(
                    "paired samples must have equal sizes, got {} and {}",
                    first.size, second.size
                )));
            }
            validate_dispersion("standard deviation of differences", sd_of_differences)?;
            StandardErrorTerms {
                standard_error: sd_of_differences / n1.sqrt(),
                degrees_of_freedom: n1 - 1.0,
            }
        }
        TestFamily::ZKnownVariance | TestFamily::TUnknownVariance => {
            return Err(InferenceError::invalid(format!(
                "{:?} is a one-sample test family",
                family
            )));
        }
    };

    validate_dispersion("standard error of the difference", terms.standard_error)?;
    Ok(terms)
}

/// Type II error of the two-sided test when the true difference equals `true_difference`.
///
/// The acceptance region `null_value ± critical_value × SE` is evaluated
/// under the normal sampling distribution centered at `true_difference`.
pub fn type_ii_error(
    true_difference: f64,
    null_value: f64,
    standard_error: f64,
    critical_value: f64,
) -> Result<PowerAnalysis> {
    validate_dispersion("standard error", standard_error)?;

    let critical_lower = null_value - critical_value * standard_error;
    let critical_upper = null_value + critical_value * standard_error;

    let h1 = Normal::new(true_difference, standard_error)
        .map_err(|e| InferenceError::invalid(e.to_string()))?;
    let beta = (h1.cdf(critical_upper) - h1.cdf(critical_lower)).clamp(0.0, 1.0);

    Ok(PowerAnalysis {
        beta,
        power: 1.0 - beta,
        critical_lower,
        critical_upper,
    })
}

/// Perform a two-sample t-test of `H₀: μ1 - μ2 = null_value` against a two-sided alternative.
///
/// # Arguments
///
/// * `first`, `second` - Summaries of the two samples
/// * `family` - Pooled, Welch or paired formula set
/// * `null_value` - Hypothesized difference of means, conventionally 0
/// * `alpha` - Significance level in (0, 1)
///
/// # Returns
///
/// `TestResult` centered at `mean1 - mean2`, with degrees of freedom and the
/// Type II error diagnostic at the observed difference.
pub fn two_sample_test(
    first: &SampleSummary,
    second: &SampleSummary,
    family: TestFamily,
    null_value: f64,
    alpha: f64,
) -> Result<TestResult> {
    validate_alpha(alpha)?;

    let StandardErrorTerms {
        standard_error,
        degrees_of_freedom: df,
    } = standard_error_terms(first, second, family)?;

    let mean_diff = first.mean - second.mean;
    let statistic = (mean_diff - null_value) / standard_error;
    let critical = t_critical_value(alpha, df)?;
    let p_value = t_two_tailed_p_value(statistic, df)?;
    let power = type_ii_error(mean_diff, null_value, standard_error, critical)?;

    debug!(
        ?family,
        df,
        statistic,
        p_value,
        beta = power.beta,
        "two-sample test"
    );

    Ok(TestResult::from_pivot(
        mean_diff,
        null_value,
        standard_error,
        critical,
        statistic,
        p_value,
        alpha,
    )
    .with_degrees_of_freedom(df)
    .with_power(power))
}
