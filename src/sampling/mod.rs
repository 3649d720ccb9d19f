//! Central limit theorem demonstration.
//!
//! A large population is drawn from one of a few reference distributions, then
//! repeatedly sampled without replacement to build the distribution of sample
//! means. All randomness comes from the caller's RNG so a seeded generator
//! reproduces every array exactly.

use crate::distributions::{Distribution, DistributionCurve};
use crate::testing::{InferenceError, Result};
use ndarray::Array1;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use statrs::distribution::{Continuous, Normal};
use tracing::{debug, warn};

/// Population size used by the demonstration page.
pub const DEFAULT_POPULATION_SIZE: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Population {
    /// N(0, 1)
    StandardNormal,
    /// Exp(λ = 1)
    Exponential,
    /// U(-2, 2)
    Uniform,
}

impl Population {
    pub fn distribution(&self) -> Distribution {
        match self {
            Population::StandardNormal => Distribution::Normal {
                mean: 0.0,
                std_dev: 1.0,
            },
            Population::Exponential => Distribution::Exponential { rate: 1.0 },
            Population::Uniform => Distribution::Uniform {
                lower: -2.0,
                upper: 2.0,
            },
        }
    }

    pub fn theoretical_mean(&self) -> f64 {
        match self {
            Population::StandardNormal => 0.0,
            Population::Exponential => 1.0,
            Population::Uniform => 0.0,
        }
    }

    pub fn theoretical_std_dev(&self) -> f64 {
        match self {
            Population::StandardNormal => 1.0,
            Population::Exponential => 1.0,
            Population::Uniform => (16.0_f64 / 12.0).sqrt(),
        }
    }
}

/// Distribution of sample means, with the normal approximation predicted by
/// the central limit theorem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingDistribution {
    pub sample_size: usize,
    pub means: Vec<f64>,
    pub mean_of_means: f64,
    /// Population (ddof = 0) standard deviation of the sample means
    pub std_of_means: f64,
    /// Mean of the population values
    pub theoretical_mean: f64,
    /// Population standard deviation divided by √n
    pub theoretical_std_error: f64,
}

impl SamplingDistribution {
    /// N(μ, σ/√n) density over the range of the observed sample means, to
    /// overlay on their histogram.
    pub fn normal_curve(&self, points: usize) -> Result<DistributionCurve> {
        if points < 2 {
            return Err(InferenceError::invalid(format!(
                "a curve needs at least 2 points, got {}",
                points
            )));
        }
        let normal = Normal::new(self.theoretical_mean, self.theoretical_std_error)
            .map_err(|e| InferenceError::invalid(e.to_string()))?;

        let min = self.means.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.means.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if min >= max {
            return Err(InferenceError::invalid(
                "sample means have no spread to draw a curve over",
            ));
        }

        let x = Array1::linspace(min, max, points);
        let density = x.mapv(|v| normal.pdf(v));
        Ok(DistributionCurve { x, density })
    }
}

pub fn generate_population<R>(population: Population, size: usize, rng: &mut R) -> Result<Vec<f64>>
where
    R: Rng + ?Sized,
{
    if size == 0 {
        return Err(InferenceError::invalid("population size must be at least 1"));
    }
    population.distribution().sample(size, rng)
}

/// Mean and population standard deviation (ddof = 0).
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn check_sample_size(population_size: usize, sample_size: usize) -> Result<()> {
    if sample_size == 0 || sample_size > population_size {
        return Err(InferenceError::invalid(format!(
            "sample size must lie in 1..={}, got {}",
            population_size, sample_size
        )));
    }
    Ok(())
}

/// Successive sample means, one per draw of `sample_size` values without
/// replacement. Suited to animating the sampling distribution as it fills in.
pub fn resample_means<'a, R>(
    values: &'a [f64],
    sample_size: usize,
    rng: &'a mut R,
) -> Result<impl Iterator<Item = f64> + 'a>
where
    R: Rng + ?Sized,
{
    check_sample_size(values.len(), sample_size)?;
    Ok(std::iter::repeat_with(move || {
        values.choose_multiple(&mut *rng, sample_size).sum::<f64>() / sample_size as f64
    }))
}

/// Draw `num_samples` samples of `sample_size` values without replacement and
/// summarize their means.
pub fn sample_means<R>(
    values: &[f64],
    sample_size: usize,
    num_samples: usize,
    rng: &mut R,
) -> Result<SamplingDistribution>
where
    R: Rng + ?Sized,
{
    if num_samples == 0 {
        return Err(InferenceError::invalid("number of samples must be at least 1"));
    }
    if sample_size == values.len() {
        warn!(sample_size, "sample covers the whole population; every mean is identical");
    }

    let means: Vec<f64> = resample_means(values, sample_size, rng)?
        .take(num_samples)
        .collect();

    let (population_mean, population_std) = mean_and_std(values);
    let (mean_of_means, std_of_means) = mean_and_std(&means);
    let theoretical_std_error = population_std / (sample_size as f64).sqrt();

    debug!(
        sample_size,
        num_samples, mean_of_means, std_of_means, theoretical_std_error, "sampled means"
    );

    Ok(SamplingDistribution {
        sample_size,
        means,
        mean_of_means,
        std_of_means,
        theoretical_mean: population_mean,
        theoretical_std_error,
    })
}
