use num_traits::Float;
use serde::Serialize;

pub mod error;
pub mod inference;
pub mod plot;

pub mod utils;

pub use error::{InferenceError, Moment, Result};

/// Conventional significance level of 10%.
pub const ALPHA_10: f64 = 0.10;
/// Conventional significance level of 5%.
pub const ALPHA_05: f64 = 0.05;
/// Conventional significance level of 1%.
pub const ALPHA_01: f64 = 0.01;

/// Sufficient statistics of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleSummary {
    /// Sample mean
    pub mean: f64,
    /// Standard deviation (population σ or sample s, depending on the test)
    pub std_dev: f64,
    /// Number of observations
    pub size: usize,
}

impl SampleSummary {
    pub fn new(mean: f64, std_dev: f64, size: usize) -> Result<Self> {
        if !mean.is_finite() {
            return Err(InferenceError::invalid(format!(
                "sample mean must be finite, got {}",
                mean
            )));
        }
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(InferenceError::invalid(format!(
                "standard deviation must be finite and non-negative, got {}",
                std_dev
            )));
        }
        if size == 0 {
            return Err(InferenceError::invalid("sample size must be at least 1"));
        }
        Ok(SampleSummary {
            mean,
            std_dev,
            size,
        })
    }

    /// Summarize raw observations. The standard deviation uses n - 1 in the
    /// denominator and is zero for a single observation.
    pub fn from_values<T>(values: &[T]) -> Result<Self>
    where
        T: Float,
    {
        if values.is_empty() {
            return Err(InferenceError::invalid("cannot summarize an empty sample"));
        }

        let values = values
            .iter()
            .map(|v| {
                v.to_f64().ok_or_else(|| {
                    InferenceError::invalid("sample value is not representable as f64")
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        // Deviations from the mean keep precision when values share a large offset
        let std_dev = if values.len() < 2 {
            0.0
        } else {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        };

        Self::new(mean, std_dev, values.len())
    }

    /// Summarize a sample from its running sum and sum of squares, for callers
    /// that only kept the sums. Loses precision when the values share a large
    /// offset; prefer [`SampleSummary::from_values`] when the data is at hand.
    pub fn from_sums(sum: f64, sum_sq: f64, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(InferenceError::invalid("sample size must be at least 1"));
        }

        let n_f = n as f64;
        let mean = sum / n_f;
        let std_dev = if n < 2 {
            0.0
        } else {
            // Rounding can push the computational formula slightly below zero
            ((sum_sq - sum * sum / n_f) / (n_f - 1.0)).max(0.0).sqrt()
        };

        Self::new(mean, std_dev, n)
    }

    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }
}

/// Formula set used to compute the standard error and degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TestFamily {
    /// One-sample test with known population standard deviation
    ZKnownVariance,
    /// One-sample test with the sample standard deviation
    TUnknownVariance,
    /// Two-sample Student's t-test, equal variances
    Pooled,
    /// Two-sample Welch's t-test, unequal variances
    Welch,
    /// Paired t-test on the differences of matched observations
    Paired { sd_of_differences: f64 },
}

impl TestFamily {
    pub fn is_two_sample(&self) -> bool {
        matches!(
            self,
            TestFamily::Pooled | TestFamily::Welch | TestFamily::Paired { .. }
        )
    }
}

/// Request-scoped test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestConfig {
    pub family: TestFamily,
    /// Significance level, must lie in (0, 1)
    pub alpha: f64,
    /// Hypothesized mean (one-sample) or mean difference (two-sample)
    pub null_value: f64,
}

impl TestConfig {
    pub fn new(family: TestFamily) -> Self {
        TestConfig {
            family,
            alpha: ALPHA_05,
            null_value: 0.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_null_value(mut self, null_value: f64) -> Self {
        self.null_value = null_value;
        self
    }

    pub fn confidence_level(&self) -> f64 {
        1.0 - self.alpha
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Confidence level, 1 - alpha
    pub level: f64,
}

impl ConfidenceInterval {
    /// True if `value` lies in the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn center(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }
}

/// Type II error and power of a two-sided test, evaluated at the observed
/// mean difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerAnalysis {
    /// Probability of failing to reject H₀ when the true difference is the observed one
    pub beta: f64,
    /// 1 - beta
    pub power: f64,
    /// Lower boundary of the acceptance region on the estimate scale
    pub critical_lower: f64,
    /// Upper boundary of the acceptance region on the estimate scale
    pub critical_upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Point estimate: sample mean or difference of means
    pub estimate: f64,
    /// Hypothesized value the estimate is tested against
    pub null_value: f64,
    /// Standard error of the estimate
    pub standard_error: f64,
    /// Degrees of freedom (t-based tests only)
    pub degrees_of_freedom: Option<f64>,
    /// Two-tailed critical value of the reference distribution
    pub critical_value: f64,
    /// The test statistic value (z or t)
    pub statistic: f64,
    /// The two-tailed p-value of the test
    pub p_value: f64,
    pub confidence_interval: ConfidenceInterval,
    /// Whether the null value falls outside the confidence interval
    pub reject_null: bool,
    /// Type II error diagnostic (two-sample tests only)
    pub power: Option<PowerAnalysis>,
}

impl TestResult {
    /// Assemble a result from the estimate, its standard error and the
    /// reference distribution's critical value, statistic and p-value.
    pub(crate) fn from_pivot(
        estimate: f64,
        null_value: f64,
        standard_error: f64,
        critical_value: f64,
        statistic: f64,
        p_value: f64,
        alpha: f64,
    ) -> Self {
        let margin = critical_value * standard_error;
        let confidence_interval = ConfidenceInterval {
            lower: estimate - margin,
            upper: estimate + margin,
            level: 1.0 - alpha,
        };
        let reject_null = !confidence_interval.contains(null_value);

        TestResult {
            estimate,
            null_value,
            standard_error,
            degrees_of_freedom: None,
            critical_value,
            statistic,
            p_value,
            confidence_interval,
            reject_null,
            power: None,
        }
    }

    /// Add degrees of freedom to the result
    pub fn with_degrees_of_freedom(mut self, df: f64) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    /// Add the Type II error diagnostic to the result
    pub fn with_power(mut self, power: PowerAnalysis) -> Self {
        self.power = Some(power);
        self
    }

    /// Half-width of the confidence interval
    pub fn margin_of_error(&self) -> f64 {
        self.critical_value * self.standard_error
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}
