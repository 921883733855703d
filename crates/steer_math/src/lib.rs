//! Aggregation mathematics (spec §4.5): the pure numerics behind a
//! Configuration's pass/fail rollup. No I/O, no knowledge of the report
//! tree or worker pool — callers feed in counts and p-values, and get back
//! thresholds and statistics to attach as Criteria/ValueSets.

pub mod confusion;
pub mod error;
pub mod min_test_count;
pub mod proportion;
pub mod uniformity;

pub use confusion::{confusion_matrix, stats_to_value_set, ConfusionMatrix, ConfusionStats};
pub use error::{MathError, MathResult};
pub use min_test_count::{common_counts, CommonCounts};
pub use proportion::{proportion_threshold, ProportionThreshold};
pub use uniformity::probability_value_uniformity;
