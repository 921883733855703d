//! Uniformity-of-p-values goodness-of-fit test (NIST SP 800-22 §4.2.2, spec §4.5).

use statrs::function::gamma::checked_gamma_ur;

use crate::error::{MathError, MathResult};

const BIN_COUNT: usize = 10;

/// Partitions `p_values` into 10 equal-width bins over `[0, 1]` (a p-value of
/// exactly `1.0` falls in the last bin), computes the χ² statistic against
/// the uniform expectation, and returns `igamc(9/2, chi_sq/2)`.
pub fn probability_value_uniformity(p_values: &[f64]) -> MathResult<f64> {
    if p_values.is_empty() {
        return Err(MathError::InvalidArgument("p_values must be non-empty".into()));
    }
    let mut bins = [0u64; BIN_COUNT];
    for &p in p_values {
        if !(0.0..=1.0).contains(&p) {
            return Err(MathError::InvalidArgument(format!("p-value {p} outside [0,1]")));
        }
        let idx = ((p * BIN_COUNT as f64) as usize).min(BIN_COUNT - 1);
        bins[idx] += 1;
    }
    let expected = p_values.len() as f64 / BIN_COUNT as f64;
    let chi_sq: f64 = bins
        .iter()
        .map(|&count| {
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum();
    checked_gamma_ur(9.0 / 2.0, chi_sq / 2.0)
        .map_err(|e| MathError::GammaFunctionFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_uniform_p_values_pass_with_high_confidence() {
        let mut p_values = Vec::new();
        for i in 0..100 {
            p_values.push((i as f64 + 0.5) / 100.0);
        }
        let q = probability_value_uniformity(&p_values).unwrap();
        assert!(q > 0.99, "expected near-perfect uniformity, got {q}");
    }

    #[test]
    fn all_p_values_in_one_bin_fails_the_threshold() {
        let p_values = vec![0.05; 100];
        let q = probability_value_uniformity(&p_values).unwrap();
        assert!(q < 0.0001, "expected rejection, got {q}");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(probability_value_uniformity(&[]).is_err());
    }

    #[test]
    fn p_value_of_one_falls_in_last_bin() {
        let mut p_values = vec![0.05; 90];
        p_values.extend(std::iter::repeat(1.0).take(10));
        assert!(probability_value_uniformity(&p_values).is_ok());
    }
}
