use crate::testing::{InferenceError, Result, SampleSummary, TestConfig, TestFamily, TestResult};

pub mod one_sample;

pub mod two_sample;

/// Sample input for a single inference request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Samples {
    One(SampleSummary),
    Two(SampleSummary, SampleSummary),
}

/// Run the test selected by `config.family` on `samples`.
///
/// One-sample families take `Samples::One` and test against
/// `config.null_value` as the hypothesized mean; two-sample families take
/// `Samples::Two` and test the difference `mean1 - mean2` against
/// `config.null_value`.
pub fn infer(config: &TestConfig, samples: Samples) -> Result<TestResult> {
    match (config.family, samples) {
        (TestFamily::ZKnownVariance, Samples::One(sample)) => {
            one_sample::one_sample_test(&sample, config.null_value, config.alpha, true)
        }
        (TestFamily::TUnknownVariance, Samples::One(sample)) => {
            one_sample::one_sample_test(&sample, config.null_value, config.alpha, false)
        }
        (family, Samples::Two(first, second)) if family.is_two_sample() => {
            two_sample::two_sample_test(&first, &second, family, config.null_value, config.alpha)
        }
        (family, Samples::One(_)) => Err(InferenceError::invalid(format!(
            "{:?} requires two samples",
            family
        ))),
        (family, Samples::Two(..)) => Err(InferenceError::invalid(format!(
            "{:?} requires exactly one sample",
            family
        ))),
    }
}

pub trait SummaryTests {
    fn z_test(&self, null_mean: f64, alpha: f64) -> Result<TestResult>;

    fn t_test(&self, null_mean: f64, alpha: f64) -> Result<TestResult>;

    fn compare(&self, other: &SampleSummary, config: &TestConfig) -> Result<TestResult>;
}

impl SummaryTests for SampleSummary {
    fn z_test(&self, null_mean: f64, alpha: f64) -> Result<TestResult> {
        one_sample::z_test(self, null_mean, alpha)
    }

    fn t_test(&self, null_mean: f64, alpha: f64) -> Result<TestResult> {
        one_sample::t_test(self, null_mean, alpha)
    }

    fn compare(&self, other: &SampleSummary, config: &TestConfig) -> Result<TestResult> {
        infer(config, Samples::Two(*self, *other))
    }
}
