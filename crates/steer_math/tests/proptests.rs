//! Property tests over the aggregation math (mirroring the corpus's
//! `proptest!`-based numeric property suites).

use proptest::prelude::*;
use steer_math::{common_counts, confusion_matrix, proportion_threshold};

proptest! {
    #[test]
    fn common_counts_partition_the_bitstream_count(
        precision in 1u32..8,
        bitstream_count in 1u64..100_000,
        alpha_thousandths in 1i64..999,
    ) {
        let alpha = alpha_thousandths as f64 / 1000.0;
        let counts = common_counts(alpha, precision, bitstream_count).unwrap();
        let scale = 10f64.powi(precision as i32);
        let expected_minimum = ((alpha * scale).round() + ((1.0 - alpha) * scale).round()) as u64;
        prop_assert_eq!(counts.minimum_test_count, expected_minimum);
        prop_assert_eq!(counts.predicted_pass_count + counts.predicted_fail_count, bitstream_count);
    }

    #[test]
    fn proportion_threshold_is_centred_and_never_negative(
        bitstream_count in 1u64..100_000,
        alpha_thousandths in 1i64..999,
    ) {
        let alpha = alpha_thousandths as f64 / 1000.0;
        let threshold = proportion_threshold(alpha, bitstream_count).unwrap();
        prop_assert!(threshold.min <= threshold.max);
        prop_assert!(threshold.max as u64 <= bitstream_count || threshold.min < 0);
    }

    #[test]
    fn confusion_matrix_cells_never_exceed_actuals(
        actual_test_count in 0u64..1000,
        actual_pass_count in 0u64..1000,
        predicted_pass_count in 0u64..1000,
        predicted_fail_count in 0u64..1000,
    ) {
        let actual_pass_count = actual_pass_count.min(actual_test_count);
        let actual_fail_count = actual_test_count - actual_pass_count;
        let matrix = confusion_matrix(
            actual_test_count,
            actual_pass_count,
            actual_fail_count,
            predicted_pass_count,
            predicted_fail_count,
        );
        prop_assert!(matrix.tp <= actual_pass_count);
        prop_assert!(matrix.tn <= actual_fail_count);
    }
}
