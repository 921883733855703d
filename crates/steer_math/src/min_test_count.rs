//! Minimum-test-count derivation (spec §4.5).

use crate::error::{MathError, MathResult};

/// Derived counts that size a Configuration's acceptance criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommonCounts {
    pub minimum_test_count: u64,
    pub predicted_pass_count: u64,
    pub predicted_fail_count: u64,
}

/// Given `alpha` expressed with `precision` fractional decimal digits and
/// `bitstream_count = B`, derive `minimumTestCount`, `predictedPassCount`
/// and `predictedFailCount` (spec §4.5).
///
/// `F = alpha * 10^precision` (min failures, as an integer); `P = (1-alpha) *
/// 10^precision` (min passes); `minimumTestCount = P + F`.
/// `predictedFailCount = floor(B * alpha)`; `predictedPassCount = B -
/// predictedFailCount`.
pub fn common_counts(alpha: f64, precision: u32, bitstream_count: u64) -> MathResult<CommonCounts> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(MathError::InvalidArgument("alpha must satisfy 0 < alpha < 1".into()));
    }
    let scale = 10f64.powi(precision as i32);
    let f = (alpha * scale).round();
    let p = ((1.0 - alpha) * scale).round();
    if f < 0.0 || p < 0.0 {
        return Err(MathError::InvalidArgument("alpha/precision produced a negative count".into()));
    }
    let minimum_test_count = (p + f) as u64;
    let predicted_fail_count = (bitstream_count as f64 * alpha).floor() as u64;
    let predicted_pass_count = bitstream_count.saturating_sub(predicted_fail_count);
    Ok(CommonCounts {
        minimum_test_count,
        predicted_pass_count,
        predicted_fail_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_example() {
        let c = common_counts(0.01, 2, 100).unwrap();
        assert_eq!(c.minimum_test_count, 100);
        assert_eq!(c.predicted_fail_count, 1);
        assert_eq!(c.predicted_pass_count, 99);
    }

    #[test]
    fn rejects_alpha_outside_unit_interval() {
        assert!(common_counts(0.0, 2, 10).is_err());
        assert!(common_counts(1.0, 2, 10).is_err());
    }
}
