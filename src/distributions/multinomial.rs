use crate::testing::{InferenceError, Result};
use ndarray::Array2;
use rand::Rng;

/// Tolerance on the sum of category probabilities.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

/// Counts of `trials` independent draws over `k` categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Multinomial {
    trials: u64,
    probabilities: Vec<f64>,
}

impl Multinomial {
    pub fn new(trials: u64, probabilities: Vec<f64>) -> Result<Self> {
        if probabilities.len() < 2 {
            return Err(InferenceError::invalid(format!(
                "a multinomial needs at least 2 categories, got {}",
                probabilities.len()
            )));
        }
        if let Some((i, p)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.is_finite() && **p >= 0.0 && **p <= 1.0))
        {
            return Err(InferenceError::invalid(format!(
                "category {} has invalid probability {}",
                i, p
            )));
        }
        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(InferenceError::invalid(format!(
                "category probabilities must sum to 1, got {}",
                total
            )));
        }

        Ok(Multinomial {
            trials,
            probabilities,
        })
    }

    /// Build the probabilities from the first `k - 1` categories; the last
    /// category takes the remaining mass.
    pub fn with_remainder(trials: u64, leading: &[f64]) -> Result<Self> {
        let used: f64 = leading.iter().sum();
        let mut probabilities = leading.to_vec();
        probabilities.push((1.0 - used).max(0.0));
        Self::new(trials, probabilities)
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn categories(&self) -> usize {
        self.probabilities.len()
    }

    /// n·pᵢ per category
    pub fn means(&self) -> Vec<f64> {
        let n = self.trials as f64;
        self.probabilities.iter().map(|p| n * p).collect()
    }

    /// n·pᵢ(1 - pᵢ) per category
    pub fn variances(&self) -> Vec<f64> {
        let n = self.trials as f64;
        self.probabilities.iter().map(|p| n * p * (1.0 - p)).collect()
    }

    /// Covariance matrix: variances on the diagonal, -n·pᵢ·pⱼ elsewhere.
    pub fn covariance(&self) -> Array2<f64> {
        let n = self.trials as f64;
        let k = self.categories();
        Array2::from_shape_fn((k, k), |(i, j)| {
            let (pi, pj) = (self.probabilities[i], self.probabilities[j]);
            if i == j {
                n * pi * (1.0 - pi)
            } else {
                // Multiply pᵢ·pⱼ first so (i, j) and (j, i) round identically
                -(n * (pi * pj))
            }
        })
    }

    /// Draw one vector of category counts.
    pub fn sample<R>(&self, rng: &mut R) -> Vec<u64>
    where
        R: Rng + ?Sized,
    {
        let last = self.categories() - 1;
        let mut counts = vec![0u64; self.categories()];
        for _ in 0..self.trials {
            let u: f64 = rng.r#gen();
            let mut cumulative = 0.0;
            let mut category = last;
            for (i, p) in self.probabilities.iter().enumerate() {
                cumulative += p;
                if u < cumulative {
                    category = i;
                    break;
                }
            }
            counts[category] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_moments() {
        let dist = Multinomial::new(20, vec![0.2, 0.3, 0.5]).unwrap();
        for (mean, expected) in dist.means().iter().zip([4.0, 6.0, 10.0]) {
            assert_abs_diff_eq!(*mean, expected, epsilon = 1e-12);
        }

        let variances = dist.variances();
        assert_abs_diff_eq!(variances[0], 3.2, epsilon = 1e-12);
        assert_abs_diff_eq!(variances[2], 5.0, epsilon = 1e-12);

        let cov = dist.covariance();
        assert_abs_diff_eq!(cov[[0, 1]], -1.2, epsilon = 1e-12);
        assert_eq!(cov[[0, 1]], cov[[1, 0]]);
        assert_abs_diff_eq!(cov[[1, 1]], 4.2, epsilon = 1e-12);
    }

    #[test]
    fn test_covariance_exactly_symmetric() {
        let dist = Multinomial::new(37, vec![0.1, 0.2, 0.3, 0.15, 0.25]).unwrap();
        let cov = dist.covariance();
        assert_eq!(cov, cov.t());
        for i in 0..dist.categories() {
            for j in 0..dist.categories() {
                if i != j {
                    assert!(cov[[i, j]] < 0.0);
                }
            }
        }
    }

    #[test]
    fn test_with_remainder() {
        let dist = Multinomial::with_remainder(10, &[0.25, 0.25]).unwrap();
        assert_eq!(dist.categories(), 3);
        assert_abs_diff_eq!(dist.probabilities()[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid() {
        assert!(Multinomial::new(10, vec![1.0]).is_err());
        assert!(Multinomial::new(10, vec![0.5, 0.6]).is_err());
        assert!(Multinomial::new(10, vec![-0.5, 1.5]).is_err());
    }

    #[test]
    fn test_sample_counts_sum_to_trials() {
        let dist = Multinomial::new(50, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let counts = dist.sample(&mut rng);
        assert_eq!(counts.iter().sum::<u64>(), 50);

        let again = dist.sample(&mut StdRng::seed_from_u64(42));
        assert_eq!(counts, again);
    }
}
