use crate::testing::{InferenceError, Result};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

pub fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(InferenceError::invalid(format!(
            "significance level must lie in (0, 1), got {}",
            alpha
        )))
    }
}

pub fn validate_dispersion(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InferenceError::invalid(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

pub fn validate_min_size(name: &str, size: usize, min: usize) -> Result<()> {
    if size >= min {
        Ok(())
    } else {
        Err(InferenceError::invalid(format!(
            "{} must be at least {}, got {}",
            name, min, size
        )))
    }
}

fn standard_normal() -> Normal {
    Normal::standard()
}

fn students_t(df: f64) -> Result<StudentsT> {
    if !(df.is_finite() && df > 0.0) {
        return Err(InferenceError::invalid(format!(
            "degrees of freedom must be positive, got {}",
            df
        )));
    }
    StudentsT::new(0.0, 1.0, df).map_err(|e| InferenceError::invalid(e.to_string()))
}

/// Two-tailed critical value of the standard normal, Φ⁻¹(1 - α/2).
pub fn normal_critical_value(alpha: f64) -> Result<f64> {
    validate_alpha(alpha)?;
    Ok(standard_normal().inverse_cdf(1.0 - alpha / 2.0))
}

/// Two-tailed critical value of Student's t with `df` degrees of freedom.
pub fn t_critical_value(alpha: f64, df: f64) -> Result<f64> {
    validate_alpha(alpha)?;
    Ok(students_t(df)?.inverse_cdf(1.0 - alpha / 2.0))
}

/// 2 × P(Z > |z|)
pub fn normal_two_tailed_p_value(statistic: f64) -> f64 {
    if let Some(p) = non_finite_p_value(statistic) {
        return p;
    }
    clamp_probability(2.0 * standard_normal().sf(statistic.abs()))
}

/// 2 × P(T > |t|) with `df` degrees of freedom.
pub fn t_two_tailed_p_value(statistic: f64, df: f64) -> Result<f64> {
    let dist = students_t(df)?;
    if let Some(p) = non_finite_p_value(statistic) {
        return Ok(p);
    }
    Ok(clamp_probability(2.0 * dist.sf(statistic.abs())))
}

#[inline]
fn non_finite_p_value(statistic: f64) -> Option<f64> {
    if statistic.is_finite() {
        None
    } else if statistic.is_infinite() {
        Some(0.0)
    } else {
        Some(1.0)
    }
}

#[inline]
fn clamp_probability(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normal_critical_values() {
        assert_abs_diff_eq!(normal_critical_value(0.10).unwrap(), 1.644854, epsilon = 1e-5);
        assert_abs_diff_eq!(normal_critical_value(0.05).unwrap(), 1.959964, epsilon = 1e-5);
        assert_abs_diff_eq!(normal_critical_value(0.01).unwrap(), 2.575829, epsilon = 1e-5);
    }

    #[test]
    fn test_t_critical_values() {
        assert_abs_diff_eq!(t_critical_value(0.05, 58.0).unwrap(), 2.001717, epsilon = 1e-4);
        assert_abs_diff_eq!(t_critical_value(0.05, 2.0).unwrap(), 4.302653, epsilon = 1e-4);
        assert_abs_diff_eq!(t_critical_value(0.05, 29.0).unwrap(), 2.045230, epsilon = 1e-4);
    }

    #[test]
    fn test_p_values() {
        assert_abs_diff_eq!(normal_two_tailed_p_value(1.959964), 0.05, epsilon = 1e-5);
        assert_abs_diff_eq!(normal_two_tailed_p_value(-1.959964), 0.05, epsilon = 1e-5);
        assert_abs_diff_eq!(normal_two_tailed_p_value(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t_two_tailed_p_value(2.001717, 58.0).unwrap(), 0.05, epsilon = 1e-4);
    }

    #[test]
    fn test_non_finite_statistics() {
        assert_eq!(normal_two_tailed_p_value(f64::INFINITY), 0.0);
        assert_eq!(normal_two_tailed_p_value(f64::NAN), 1.0);
        assert_eq!(t_two_tailed_p_value(f64::NEG_INFINITY, 5.0).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(normal_critical_value(0.0).is_err());
        assert!(normal_critical_value(1.0).is_err());
        assert!(normal_critical_value(f64::NAN).is_err());
        assert!(t_critical_value(0.05, 0.0).is_err());
        assert!(t_two_tailed_p_value(1.0, -1.0).is_err());
        assert!(validate_dispersion("sigma", 0.0).is_err());
        assert!(validate_min_size("n", 1, 2).is_err());
        assert!(validate_min_size("n", 2, 2).is_ok());
    }
}
