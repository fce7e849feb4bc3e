//! Small pricing utilities: de-vig normalization and a Poisson CDF for the
//! league baseline model.

/// Normalize two complementary decimal prices into implied probabilities
/// that sum to 1, removing the bookmaker margin.
///
/// Returns `None` for prices that are not finite or not above 1.0 (a
/// decimal price at or below 1.0 is not a real quote).
pub fn devig_two_way(decimal_a: f64, decimal_b: f64) -> Option<(f64, f64)> {
    if !decimal_a.is_finite() || !decimal_b.is_finite() || decimal_a <= 1.0 || decimal_b <= 1.0 {
        return None;
    }
    let q_a = 1.0 / decimal_a;
    let q_b = 1.0 / decimal_b;
    let total = q_a + q_b;
    Some((q_a / total, q_b / total))
}

/// P(X <= k) for X ~ Poisson(lambda), by direct term summation.
pub fn poisson_cdf(k: u32, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let mut term = (-lambda).exp();
    let mut acc = term;
    for i in 1..=k {
        term *= lambda / i as f64;
        acc += term;
    }
    acc.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devig_symmetric_quote() {
        let (p_a, p_b) = devig_two_way(2.0, 2.0).unwrap();
        assert!((p_a - 0.5).abs() < 1e-12);
        assert!((p_b - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_devig_sums_to_one() {
        let (p_over, p_under) = devig_two_way(1.9, 1.85).unwrap();
        assert!((p_over + p_under - 1.0).abs() < 1e-12);
        assert!(p_over < p_under);
    }

    #[test]
    fn test_devig_rejects_bad_prices() {
        assert!(devig_two_way(1.0, 2.0).is_none());
        assert!(devig_two_way(0.0, 2.0).is_none());
        assert!(devig_two_way(f64::NAN, 2.0).is_none());
        assert!(devig_two_way(2.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_poisson_cdf_known_values() {
        // P(X <= 2) for lambda = 1: e^-1 * (1 + 1 + 0.5) ~= 0.9197
        assert!((poisson_cdf(2, 1.0) - 0.919_698).abs() < 1e-4);
        // Large k covers essentially all mass
        assert!(poisson_cdf(50, 2.5) > 0.999_999);
        assert_eq!(poisson_cdf(3, 0.0), 1.0);
    }
}
