//! Chart data for sampling distributions.
//!
//! Rendering is left to the caller. These helpers produce the x grid, the
//! densities and per-point region masks that a chart needs to draw the curves
//! and shade rejection and acceptance regions.

use crate::testing::{InferenceError, Result, TestResult};
use ndarray::Array1;
use statrs::distribution::{Continuous, Normal};

/// Number of grid points used when the caller has no preference.
pub const DEFAULT_CURVE_POINTS: usize = 500;

/// Sampling distribution of a one-sample estimate.
#[derive(Debug, Clone)]
pub struct OneSampleCurve {
    pub x: Array1<f64>,
    /// Normal density centered at the sample mean with the standard error as scale
    pub density: Array1<f64>,
    /// Points outside the confidence interval
    pub rejection_region: Array1<bool>,
}

/// H₀ and H₁ sampling distributions of a two-sample mean difference.
#[derive(Debug, Clone)]
pub struct TwoSampleCurves {
    pub x: Array1<f64>,
    pub null_density: Array1<f64>,
    pub alternative_density: Array1<f64>,
    /// Type I error region under H₀: outside the critical boundaries
    pub type_i_region: Array1<bool>,
    /// Type II error region under H₁: strictly between the critical boundaries
    pub type_ii_region: Array1<bool>,
}

fn normal(mean: f64, scale: f64) -> Result<Normal> {
    Normal::new(mean, scale).map_err(|e| InferenceError::invalid(e.to_string()))
}

fn validate_points(points: usize) -> Result<()> {
    if points < 2 {
        return Err(InferenceError::invalid(format!(
            "a curve needs at least 2 points, got {}",
            points
        )));
    }
    Ok(())
}

/// Grid spanning the estimate ± 4 standard errors.
pub fn one_sample_curve(result: &TestResult, points: usize) -> Result<OneSampleCurve> {
    validate_points(points)?;
    let se = result.standard_error;
    let dist = normal(result.estimate, se)?;

    let x = Array1::linspace(result.estimate - 4.0 * se, result.estimate + 4.0 * se, points);
    let density = x.mapv(|v| dist.pdf(v));
    let ci = result.confidence_interval;
    let rejection_region = x.mapv(|v| v < ci.lower || v > ci.upper);

    Ok(OneSampleCurve {
        x,
        density,
        rejection_region,
    })
}

/// Grid spanning the mean difference ± 8 standard errors.
///
/// The result must come from a two-sample test so that it carries the
/// critical boundaries of the acceptance region.
pub fn two_sample_curves(result: &TestResult, points: usize) -> Result<TwoSampleCurves> {
    validate_points(points)?;
    let power = result.power.ok_or_else(|| {
        InferenceError::invalid("two-sample curves need a result with a power analysis")
    })?;

    let se = result.standard_error;
    let h0 = normal(result.null_value, se)?;
    let h1 = normal(result.estimate, se)?;

    let x = Array1::linspace(result.estimate - 8.0 * se, result.estimate + 8.0 * se, points);
    let null_density = x.mapv(|v| h0.pdf(v));
    let alternative_density = x.mapv(|v| h1.pdf(v));
    let type_i_region = x.mapv(|v| v <= power.critical_lower || v >= power.critical_upper);
    let type_ii_region = x.mapv(|v| v > power.critical_lower && v < power.critical_upper);

    Ok(TwoSampleCurves {
        x,
        null_density,
        alternative_density,
        type_i_region,
        type_ii_region,
    })
}
