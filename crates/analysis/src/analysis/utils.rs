//! Utility functions for analysis module
//!
//! Shared helper functions used across analysis submodules.

/// Calculate median of a vector
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;

    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Standard error of a proportion `p` estimated from `n` trials.
pub fn binomial_standard_error(p: f64, n: usize) -> f64 {
    if n == 0 {
        return f64::INFINITY;
    }
    (p * (1.0 - p) / n as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        let mut values = vec![1.0, 3.0, 2.0, 5.0, 4.0];
        assert_eq!(median(&mut values), 3.0);

        let mut values_even = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(median(&mut values_even), 2.5);
    }

    #[test]
    fn test_binomial_standard_error() {
        assert!((binomial_standard_error(0.5, 100) - 0.05).abs() < 1e-12);
        assert_eq!(binomial_standard_error(0.0, 10), 0.0);
        assert!(binomial_standard_error(0.5, 0).is_infinite());
    }
}
