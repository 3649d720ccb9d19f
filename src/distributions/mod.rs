//! Probability distributions shown on the distribution tables page.
//!
//! Each family is an enum variant carrying its own parameters. Densities,
//! CDFs and quantiles come from `statrs`; the moments use their closed forms
//! so that undefined moments are reported as errors instead of NaN or
//! infinity.

use crate::testing::{InferenceError, Moment, Result};
use ndarray::Array1;
use rand::Rng;
use rand::distributions::Open01;
use statrs::distribution::{
    Beta, Binomial, ChiSquared, Continuous, ContinuousCDF, Discrete, DiscreteCDF, Exp,
    FisherSnedecor, Gamma, Geometric, Hypergeometric, NegativeBinomial, Normal, Poisson,
    StudentsT, Uniform,
};

pub mod multinomial;

pub use multinomial::Multinomial;

/// Upper quantile used to cut unbounded supports for plotting.
const PLOT_UPPER_QUANTILE: f64 = 0.995;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    Normal { mean: f64, std_dev: f64 },
    Uniform { lower: f64, upper: f64 },
    Exponential { rate: f64 },
    /// Shape α and rate β (scale 1/β)
    Gamma { shape: f64, rate: f64 },
    ChiSquared { freedom: f64 },
    StudentsT { freedom: f64 },
    FisherSnedecor { d1: f64, d2: f64 },
    Beta { alpha: f64, beta: f64 },
    Binomial { trials: u64, p: f64 },
    /// `draws` items taken without replacement from `population` items of which
    /// `successes` are successes
    Hypergeometric { population: u64, successes: u64, draws: u64 },
    /// Number of trials up to and including the first success, support 1, 2, ...
    Geometric { p: f64 },
    /// Number of failures before the `successes`-th success
    NegativeBinomial { successes: u64, p: f64 },
    Poisson { rate: f64 },
}

/// x grid with the matching PDF or PMF values.
#[derive(Debug, Clone)]
pub struct DistributionCurve {
    pub x: Array1<f64>,
    pub density: Array1<f64>,
}

trait ContinuousModel: Continuous<f64, f64> + ContinuousCDF<f64, f64> {}

impl<D> ContinuousModel for D where D: Continuous<f64, f64> + ContinuousCDF<f64, f64> {}

trait DiscreteModel: Discrete<u64, f64> + DiscreteCDF<u64, f64> {}

impl<D> DiscreteModel for D where D: Discrete<u64, f64> + DiscreteCDF<u64, f64> {}

enum Model {
    Continuous(Box<dyn ContinuousModel>),
    Discrete(Box<dyn DiscreteModel>),
}

fn check(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(InferenceError::invalid(message()))
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    check(value.is_finite() && value > 0.0, || {
        format!("{} must be positive and finite, got {}", name, value)
    })
}

fn probability(name: &str, value: f64, allow_zero: bool) -> Result<()> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    check(value.is_finite() && lower_ok && value <= 1.0, || {
        format!("{} must be a probability, got {}", name, value)
    })
}

fn statrs_error<E: std::fmt::Display>(e: E) -> InferenceError {
    InferenceError::invalid(e.to_string())
}

impl Distribution {
    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Normal { .. } => "Normal",
            Distribution::Uniform { .. } => "Uniform",
            Distribution::Exponential { .. } => "Exponential",
            Distribution::Gamma { .. } => "Gamma",
            Distribution::ChiSquared { .. } => "Chi-square",
            Distribution::StudentsT { .. } => "Student's t",
            Distribution::FisherSnedecor { .. } => "F",
            Distribution::Beta { .. } => "Beta",
            Distribution::Binomial { .. } => "Binomial",
            Distribution::Hypergeometric { .. } => "Hypergeometric",
            Distribution::Geometric { .. } => "Geometric",
            Distribution::NegativeBinomial { .. } => "Negative binomial",
            Distribution::Poisson { .. } => "Poisson",
        }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            Distribution::Binomial { .. }
                | Distribution::Hypergeometric { .. }
                | Distribution::Geometric { .. }
                | Distribution::NegativeBinomial { .. }
                | Distribution::Poisson { .. }
        )
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Distribution::Normal { mean, std_dev } => {
                check(mean.is_finite(), || format!("mean must be finite, got {}", mean))?;
                positive("standard deviation", std_dev)
            }
            Distribution::Uniform { lower, upper } => check(
                lower.is_finite() && upper.is_finite() && lower < upper,
                || format!("uniform bounds must satisfy a < b, got [{}, {}]", lower, upper),
            ),
            Distribution::Exponential { rate } => positive("rate", rate),
            Distribution::Gamma { shape, rate } => {
                positive("shape", shape)?;
                positive("rate", rate)
            }
            Distribution::ChiSquared { freedom } | Distribution::StudentsT { freedom } => {
                positive("degrees of freedom", freedom)
            }
            Distribution::FisherSnedecor { d1, d2 } => {
                positive("numerator degrees of freedom", d1)?;
                positive("denominator degrees of freedom", d2)
            }
            Distribution::Beta { alpha, beta } => {
                positive("alpha", alpha)?;
                positive("beta", beta)
            }
            Distribution::Binomial { p, .. } => probability("p", p, true),
            Distribution::Hypergeometric {
                population,
                successes,
                draws,
            } => {
                check(population >= 1, || "population size must be at least 1".to_string())?;
                check(successes <= population, || {
                    format!(
                        "successes ({}) cannot exceed the population ({})",
                        successes, population
                    )
                })?;
                check(draws <= population, || {
                    format!(
                        "draws ({}) cannot exceed the population ({})",
                        draws, population
                    )
                })
            }
            Distribution::Geometric { p } => probability("p", p, false),
            Distribution::NegativeBinomial { successes, p } => {
                check(successes >= 1, || "number of successes must be at least 1".to_string())?;
                probability("p", p, false)
            }
            Distribution::Poisson { rate } => positive("rate", rate),
        }
    }

    fn model(&self) -> Result<Model> {
        self.validate()?;
        let model = match *self {
            Distribution::Normal { mean, std_dev } => {
                Model::Continuous(Box::new(Normal::new(mean, std_dev).map_err(statrs_error)?))
            }
            Distribution::Uniform { lower, upper } => {
                Model::Continuous(Box::new(Uniform::new(lower, upper).map_err(statrs_error)?))
            }
            Distribution::Exponential { rate } => {
                Model::Continuous(Box::new(Exp::new(rate).map_err(statrs_error)?))
            }
            Distribution::Gamma { shape, rate } => {
                Model::Continuous(Box::new(Gamma::new(shape, rate).map_err(statrs_error)?))
            }
            Distribution::ChiSquared { freedom } => {
                Model::Continuous(Box::new(ChiSquared::new(freedom).map_err(statrs_error)?))
            }
            Distribution::StudentsT { freedom } => Model::Continuous(Box::new(
                StudentsT::new(0.0, 1.0, freedom).map_err(statrs_error)?,
            )),
            Distribution::FisherSnedecor { d1, d2 } => {
                Model::Continuous(Box::new(FisherSnedecor::new(d1, d2).map_err(statrs_error)?))
            }
            Distribution::Beta { alpha, beta } => {
                Model::Continuous(Box::new(Beta::new(alpha, beta).map_err(statrs_error)?))
            }
            Distribution::Binomial { trials, p } => {
                Model::Discrete(Box::new(Binomial::new(p, trials).map_err(statrs_error)?))
            }
            Distribution::Hypergeometric {
                population,
                successes,
                draws,
            } => Model::Discrete(Box::new(
                Hypergeometric::new(population, successes, draws).map_err(statrs_error)?,
            )),
            Distribution::Geometric { p } => {
                Model::Discrete(Box::new(Geometric::new(p).map_err(statrs_error)?))
            }
            Distribution::NegativeBinomial { successes, p } => Model::Discrete(Box::new(
                NegativeBinomial::new(successes as f64, p).map_err(statrs_error)?,
            )),
            Distribution::Poisson { rate } => {
                Model::Discrete(Box::new(Poisson::new(rate).map_err(statrs_error)?))
            }
        };
        Ok(model)
    }

    /// Smallest and largest values of the support; infinite when unbounded.
    pub fn support(&self) -> Result<(f64, f64)> {
        self.validate()?;
        let bounds = match *self {
            Distribution::Normal { .. } | Distribution::StudentsT { .. } => {
                (f64::NEG_INFINITY, f64::INFINITY)
            }
            Distribution::Uniform { lower, upper } => (lower, upper),
            Distribution::Exponential { .. }
            | Distribution::Gamma { .. }
            | Distribution::ChiSquared { .. }
            | Distribution::FisherSnedecor { .. } => (0.0, f64::INFINITY),
            Distribution::Beta { .. } => (0.0, 1.0),
            Distribution::Binomial { trials, .. } => (0.0, trials as f64),
            Distribution::Hypergeometric {
                population,
                successes,
                draws,
            } => {
                let lower = draws.saturating_sub(population - successes);
                let upper = draws.min(successes);
                (lower as f64, upper as f64)
            }
            Distribution::Geometric { .. } => (1.0, f64::INFINITY),
            Distribution::NegativeBinomial { .. } | Distribution::Poisson { .. } => {
                (0.0, f64::INFINITY)
            }
        };
        Ok(bounds)
    }

    /// PDF for continuous families, PMF for discrete ones. Non-integer or
    /// negative arguments have zero mass under a discrete family.
    pub fn density(&self, x: f64) -> Result<f64> {
        let value = match self.model()? {
            Model::Continuous(d) => d.pdf(x),
            Model::Discrete(d) => {
                if x < 0.0 || x.fract() != 0.0 || !x.is_finite() {
                    0.0
                } else {
                    d.pmf(x as u64)
                }
            }
        };
        Ok(value)
    }

    pub fn cdf(&self, x: f64) -> Result<f64> {
        let value = match self.model()? {
            Model::Continuous(d) => d.cdf(x),
            Model::Discrete(d) => {
                if x < 0.0 {
                    0.0
                } else if x.is_infinite() {
                    1.0
                } else {
                    d.cdf(x.floor() as u64)
                }
            }
        };
        Ok(value)
    }

    /// Inverse CDF at probability `p`.
    pub fn quantile(&self, p: f64) -> Result<f64> {
        probability("quantile probability", p, true)?;
        let value = match self.model()? {
            Model::Continuous(d) => d.inverse_cdf(p),
            Model::Discrete(d) => discrete_inverse_cdf(d.as_ref(), p, self.support()?),
        };
        Ok(value)
    }

    pub fn mean(&self) -> Result<f64> {
        self.validate()?;
        let mean = match *self {
            Distribution::Normal { mean, .. } => mean,
            Distribution::Uniform { lower, upper } => (lower + upper) / 2.0,
            Distribution::Exponential { rate } => 1.0 / rate,
            Distribution::Gamma { shape, rate } => shape / rate,
            Distribution::ChiSquared { freedom } => freedom,
            Distribution::StudentsT { freedom } => {
                if freedom <= 1.0 {
                    return Err(InferenceError::undefined(
                        Moment::Mean,
                        format!("Student's t needs ν > 1, got ν = {}", freedom),
                    ));
                }
                0.0
            }
            Distribution::FisherSnedecor { d2, .. } => {
                if d2 <= 2.0 {
                    return Err(InferenceError::undefined(
                        Moment::Mean,
                        format!("the F distribution needs d₂ > 2, got d₂ = {}", d2),
                    ));
                }
                d2 / (d2 - 2.0)
            }
            Distribution::Beta { alpha, beta } => alpha / (alpha + beta),
            Distribution::Binomial { trials, p } => trials as f64 * p,
            Distribution::Hypergeometric {
                population,
                successes,
                draws,
            } => draws as f64 * successes as f64 / population as f64,
            Distribution::Geometric { p } => 1.0 / p,
            Distribution::NegativeBinomial { successes, p } => successes as f64 * (1.0 - p) / p,
            Distribution::Poisson { rate } => rate,
        };
        Ok(mean)
    }

    pub fn variance(&self) -> Result<f64> {
        self.second_moment(Moment::Variance)
    }

    pub fn std_dev(&self) -> Result<f64> {
        self.second_moment(Moment::StdDev).map(f64::sqrt)
    }

    fn second_moment(&self, moment: Moment) -> Result<f64> {
        self.validate()?;
        let variance = match *self {
            Distribution::Normal { std_dev, .. } => std_dev * std_dev,
            Distribution::Uniform { lower, upper } => (upper - lower).powi(2) / 12.0,
            Distribution::Exponential { rate } => 1.0 / (rate * rate),
            Distribution::Gamma { shape, rate } => shape / (rate * rate),
            Distribution::ChiSquared { freedom } => 2.0 * freedom,
            Distribution::StudentsT { freedom } => {
                if freedom <= 2.0 {
                    return Err(InferenceError::undefined(
                        moment,
                        format!("Student's t needs ν > 2, got ν = {}", freedom),
                    ));
                }
                freedom / (freedom - 2.0)
            }
            Distribution::FisherSnedecor { d1, d2 } => {
                if d2 <= 4.0 {
                    return Err(InferenceError::undefined(
                        moment,
                        format!("the F distribution needs d₂ > 4, got d₂ = {}", d2),
                    ));
                }
                2.0 * d2 * d2 * (d1 + d2 - 2.0) / (d1 * (d2 - 2.0).powi(2) * (d2 - 4.0))
            }
            Distribution::Beta { alpha, beta } => {
                let total = alpha + beta;
                alpha * beta / (total * total * (total + 1.0))
            }
            Distribution::Binomial { trials, p } => trials as f64 * p * (1.0 - p),
            Distribution::Hypergeometric {
                population,
                successes,
                draws,
            } => {
                if population == 1 {
                    0.0
                } else {
                    let n_pop = population as f64;
                    let share = successes as f64 / n_pop;
                    draws as f64 * share * (1.0 - share) * (n_pop - draws as f64) / (n_pop - 1.0)
                }
            }
            Distribution::Geometric { p } => (1.0 - p) / (p * p),
            Distribution::NegativeBinomial { successes, p } => {
                successes as f64 * (1.0 - p) / (p * p)
            }
            Distribution::Poisson { rate } => rate,
        };
        Ok(variance)
    }

    /// x values to draw the distribution over.
    ///
    /// Continuous families get `points` evenly spaced values over a range that
    /// shows the bulk of the mass; discrete families get their integer support,
    /// cut at the 99.5% quantile when unbounded.
    pub fn plot_grid(&self, points: usize) -> Result<Array1<f64>> {
        self.validate()?;
        if !self.is_discrete() && points < 2 {
            return Err(InferenceError::invalid(format!(
                "a curve needs at least 2 points, got {}",
                points
            )));
        }

        let grid = match *self {
            Distribution::Normal { mean, std_dev } => {
                Array1::linspace(mean - 4.0 * std_dev, mean + 4.0 * std_dev, points)
            }
            Distribution::Uniform { lower, upper } => {
                let pad = (upper - lower) * 0.2;
                Array1::linspace(lower - pad, upper + pad, points)
            }
            Distribution::Exponential { .. } => Array1::linspace(0.0, 20.0, points),
            Distribution::Gamma { shape, rate } => {
                Array1::linspace(0.0, 5.0 * shape / rate, points)
            }
            Distribution::ChiSquared { freedom } => Array1::linspace(0.0, freedom + 50.0, points),
            Distribution::StudentsT { .. } => Array1::linspace(-5.0, 5.0, points),
            Distribution::FisherSnedecor { d2, .. } => {
                let upper = if d2 > 2.0 {
                    self.quantile(PLOT_UPPER_QUANTILE)?
                } else {
                    10.0
                };
                Array1::linspace(0.01, upper, points)
            }
            Distribution::Beta { .. } => Array1::linspace(0.0, 1.0, points),
            Distribution::Binomial { .. } | Distribution::Hypergeometric { .. } => {
                let (lower, upper) = self.support()?;
                integer_range(lower as u64, upper as u64)
            }
            Distribution::Geometric { .. }
            | Distribution::NegativeBinomial { .. }
            | Distribution::Poisson { .. } => {
                let (lower, _) = self.support()?;
                let upper = self.quantile(PLOT_UPPER_QUANTILE)?;
                integer_range(lower as u64, (upper as u64).max(lower as u64))
            }
        };
        Ok(grid)
    }

    pub fn curve(&self, points: usize) -> Result<DistributionCurve> {
        let x = self.plot_grid(points)?;
        let density = match self.model()? {
            Model::Continuous(d) => x.mapv(|v| d.pdf(v)),
            Model::Discrete(d) => x.mapv(|v| d.pmf(v as u64)),
        };
        Ok(DistributionCurve { x, density })
    }

    /// mean ± k standard deviations, clamped to the support.
    pub fn central_band(&self, k: f64) -> Result<(f64, f64)> {
        positive("band width", k)?;
        let mean = self.mean()?;
        let std_dev = self.std_dev()?;
        let (low, high) = self.support()?;

        let mut lower = (mean - k * std_dev).max(low);
        let mut upper = (mean + k * std_dev).min(high);
        if self.is_discrete() {
            lower = lower.ceil();
            upper = upper.floor();
        }
        Ok((lower, upper))
    }

    /// Draw `count` values by inverse-transform sampling.
    pub fn sample<R>(&self, count: usize, rng: &mut R) -> Result<Vec<f64>>
    where
        R: Rng + ?Sized,
    {
        let values = match self.model()? {
            Model::Continuous(d) => (0..count)
                .map(|_| d.inverse_cdf(rng.sample::<f64, _>(Open01)))
                .collect(),
            Model::Discrete(d) => {
                let bounds = self.support()?;
                (0..count)
                    .map(|_| {
                        let u = rng.sample::<f64, _>(Open01);
                        discrete_inverse_cdf(d.as_ref(), u, bounds)
                    })
                    .collect()
            }
        };
        Ok(values)
    }
}

/// Smallest support value `k` with `P(X <= k) >= p`.
///
/// statrs' own discrete inverse CDF panics when `p` falls below the mass of the
/// lowest support value, so the search lives here.
fn discrete_inverse_cdf(d: &dyn DiscreteModel, p: f64, (low, high): (f64, f64)) -> f64 {
    let low = low as u64;
    if p <= d.cdf(low) {
        return low as f64;
    }
    if p >= 1.0 {
        return high;
    }
    let cap = if high.is_finite() { high as u64 } else { u64::MAX };

    // cdf(below) < p throughout; grow `above` until it reaches p or the cap
    let mut below = low;
    let mut step = 1_u64;
    let mut above = low.saturating_add(step).min(cap);
    while above < cap && d.cdf(above) < p {
        below = above;
        step = step.saturating_mul(2);
        above = above.saturating_add(step).min(cap);
    }
    while above - below > 1 {
        let mid = below + (above - below) / 2;
        if d.cdf(mid) < p {
            below = mid;
        } else {
            above = mid;
        }
    }
    above as f64
}

fn integer_range(lower: u64, upper: u64) -> Array1<f64> {
    (lower..=upper).map(|k| k as f64).collect()
}
