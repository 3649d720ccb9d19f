use stats_inference::testing::inference::one_sample::{one_sample_test, t_test, z_test};
use stats_inference::testing::inference::two_sample::{two_sample_test, welch_satterthwaite_df};
use stats_inference::testing::{InferenceError, SampleSummary, TestFamily, TestResult};

#[cfg(test)]
mod quick_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALPHAS: [f64; 7] = [0.001, 0.01, 0.05, 0.1, 0.2, 0.5, 0.9];

    fn summary(mean: f64, sd: f64, n: usize) -> SampleSummary {
        SampleSummary::new(mean, sd, n).unwrap()
    }

    fn assert_consistent(result: &TestResult, alpha: f64) {
        assert!(result.confidence_interval.lower <= result.confidence_interval.upper);
        assert!((0.0..=1.0).contains(&result.p_value));
        assert_eq!(
            result.p_value < alpha,
            result.reject_null,
            "alpha={} p={} ci=[{}, {}] null={}",
            alpha,
            result.p_value,
            result.confidence_interval.lower,
            result.confidence_interval.upper,
            result.null_value
        );
    }

    #[test]
    fn check_z_statistic_closed_form() {
        let cases = [
            (105.0, 15.0, 30, 100.0),
            (0.3, 2.0, 7, -1.0),
            (-12.5, 0.7, 150, -12.4),
            (50.0, 10.0, 1, 45.0),
        ];
        for (mean, sigma, n, null_mean) in cases {
            let result = z_test(&summary(mean, sigma, n), null_mean, 0.05).unwrap();
            let expected = (mean - null_mean) * (n as f64).sqrt() / sigma;
            assert_abs_diff_eq!(result.statistic, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn check_p_value_matches_interval_decision() {
        let sample = summary(105.0, 15.0, 30);
        let g2 = summary(110.0, 12.0, 25);
        for alpha in ALPHAS {
            for null_mean in [90.0, 99.0, 100.0, 104.0, 112.0] {
                assert_consistent(&z_test(&sample, null_mean, alpha).unwrap(), alpha);
                assert_consistent(&t_test(&sample, null_mean, alpha).unwrap(), alpha);
            }
            for family in [TestFamily::Pooled, TestFamily::Welch] {
                let result = two_sample_test(&sample, &g2, family, 0.0, alpha).unwrap();
                assert_consistent(&result, alpha);
            }
        }
    }

    #[test]
    fn check_paired_p_value_matches_interval_decision() {
        let before = summary(72.0, 8.0, 16);
        let after = summary(70.0, 9.0, 16);
        for alpha in ALPHAS {
            for sd_of_differences in [1.5, 4.0, 9.0] {
                let family = TestFamily::Paired { sd_of_differences };
                for null_value in [-1.0, 0.0, 2.0, 3.5] {
                    let result =
                        two_sample_test(&before, &after, family, null_value, alpha).unwrap();
                    assert_consistent(&result, alpha);
                }
            }
        }
    }

    #[test]
    fn check_idempotence() {
        let g1 = summary(100.0, 10.0, 10);
        let g2 = summary(105.0, 20.0, 50);
        for family in [
            TestFamily::Pooled,
            TestFamily::Welch,
            TestFamily::Paired {
                sd_of_differences: 3.0,
            },
        ] {
            let g2 = if matches!(family, TestFamily::Paired { .. }) {
                summary(105.0, 20.0, 10)
            } else {
                g2
            };
            let a = two_sample_test(&g1, &g2, family, 0.0, 0.05).unwrap();
            let b = two_sample_test(&g1, &g2, family, 0.0, 0.05).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.p_value.to_bits(), b.p_value.to_bits());
            assert_eq!(a.power.unwrap().beta.to_bits(), b.power.unwrap().beta.to_bits());
        }

        let a = one_sample_test(&g1, 98.0, 0.1, false).unwrap();
        let b = one_sample_test(&g1, 98.0, 0.1, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn check_interval_symmetry() {
        let sample = summary(42.0, 3.5, 12);
        for use_z in [true, false] {
            let result = one_sample_test(&sample, 40.0, 0.05, use_z).unwrap();
            let ci = result.confidence_interval;
            assert_abs_diff_eq!(ci.upper - 42.0, 42.0 - ci.lower, epsilon = 1e-9);
        }

        let g1 = summary(100.0, 10.0, 10);
        let g2 = summary(105.0, 20.0, 50);
        for family in [TestFamily::Pooled, TestFamily::Welch] {
            let result = two_sample_test(&g1, &g2, family, 0.0, 0.05).unwrap();
            let ci = result.confidence_interval;
            assert_abs_diff_eq!(ci.upper - (-5.0), (-5.0) - ci.lower, epsilon = 1e-9);
            assert_abs_diff_eq!(ci.center(), -5.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn check_minimum_pooled_df() {
        let result = two_sample_test(
            &summary(10.0, 2.0, 2),
            &summary(12.0, 3.0, 2),
            TestFamily::Pooled,
            0.0,
            0.05,
        )
        .unwrap();
        assert_eq!(result.degrees_of_freedom, Some(2.0));
    }

    #[test]
    fn check_scenario_a_z_test() {
        let result = z_test(&summary(105.0, 15.0, 30), 100.0, 0.05).unwrap();

        println!("=== SCENARIO A ===");
        println!("SE: {}", result.standard_error);
        println!("Z: {}", result.statistic);
        println!(
            "CI: [{}, {}]",
            result.confidence_interval.lower, result.confidence_interval.upper
        );
        println!("P-value: {}", result.p_value);

        assert_abs_diff_eq!(result.standard_error, 2.7386, epsilon = 1e-4);
        assert_abs_diff_eq!(result.statistic, 1.826, epsilon = 1e-3);
        assert_abs_diff_eq!(result.critical_value, 1.96, epsilon = 1e-3);
        assert_abs_diff_eq!(result.confidence_interval.lower, 99.64, epsilon = 1e-2);
        assert_abs_diff_eq!(result.confidence_interval.upper, 110.36, epsilon = 1e-2);
        assert_abs_diff_eq!(result.p_value, 0.0679, epsilon = 1e-4);
        assert!(!result.reject_null);
    }

    #[test]
    fn check_scenario_b_pooled() {
        let result = two_sample_test(
            &summary(100.0, 15.0, 30),
            &summary(110.0, 15.0, 30),
            TestFamily::Pooled,
            0.0,
            0.05,
        )
        .unwrap();

        println!("=== SCENARIO B ===");
        println!("T-statistic: {}", result.statistic);
        println!("df: {:?}", result.degrees_of_freedom);
        println!("P-value: {}", result.p_value);

        assert_abs_diff_eq!(result.standard_error, 3.8730, epsilon = 1e-4);
        assert_eq!(result.degrees_of_freedom, Some(58.0));
        assert_abs_diff_eq!(result.statistic, -2.582, epsilon = 1e-3);
        assert_abs_diff_eq!(result.critical_value, 2.0017, epsilon = 1e-3);
        assert_abs_diff_eq!(result.estimate, -10.0);
        assert!(result.confidence_interval.upper < 0.0);
        assert!(result.reject_null);
    }

    #[test]
    fn check_scenario_c_welch_df() {
        let g1 = summary(100.0, 10.0, 10);
        let g2 = summary(105.0, 20.0, 50);
        let df = welch_satterthwaite_df(&g1, &g2).unwrap();

        let lower = (g1.size.min(g2.size) - 1) as f64;
        let upper = (g1.size + g2.size - 2) as f64;
        assert!(df > lower && df < upper, "df {} outside ({}, {})", df, lower, upper);
        assert_ne!(df.fract(), 0.0);
    }

    #[test]
    fn check_single_observation_t_test_fails() {
        let result = one_sample_test(&summary(5.0, 1.0, 1), 0.0, 0.05, false);
        match result {
            Err(InferenceError::InvalidParameter(message)) => {
                println!("Rejected as expected: {}", message);
            }
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }
}
