//! `CommonData`: bounds-validated, derived quantities built once at Init
//! from the ParameterSet (spec §4.4 Init, §4.5, §9 "no gCommonData global").

use steer_math::{common_counts, CommonCounts};
use steer_report::ParameterSet;

use crate::error::ShellResult;

#[derive(Clone, Debug)]
pub struct CommonData {
    pub bitstream_count: u64,
    pub bitstream_length: u64,
    pub buffer_size: usize,
    pub significance_level: f64,
    pub significance_level_precision: u32,
    pub thread_count: usize,
    pub minimum_test_count: u64,
    pub predicted_pass_count: u64,
    pub predicted_fail_count: u64,
}

impl CommonData {
    pub fn from_parameters(params: &ParameterSet) -> ShellResult<Self> {
        let bitstream_count = params.bitstream_count()?;
        let bitstream_length = params.bitstream_length()?;
        let significance_level = params.significance_level()?;
        let significance_level_precision = params.significance_level_precision()?;
        let thread_count = params.thread_count()?;
        let CommonCounts {
            minimum_test_count,
            predicted_pass_count,
            predicted_fail_count,
        } = common_counts(significance_level, significance_level_precision, bitstream_count)?;
        Ok(Self {
            bitstream_count,
            bitstream_length,
            buffer_size: (bitstream_length / 8) as usize,
            significance_level,
            significance_level_precision,
            thread_count,
            minimum_test_count,
            predicted_pass_count,
            predicted_fail_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steer_core::{DataType, Value};

    #[test]
    fn derives_buffer_size_and_minimum_test_count() {
        let params = ParameterSet::new("block_frequency", "default")
            .with_parameter(Value::new("bitstream_count", DataType::U64, None, None, "100").unwrap())
            .with_parameter(Value::new("bitstream_length", DataType::U64, None, None, "8000").unwrap())
            .with_parameter(Value::new("significance_level", DataType::F64, None, None, "0.01").unwrap());
        let common = CommonData::from_parameters(&params).unwrap();
        assert_eq!(common.buffer_size, 1000);
        assert_eq!(common.minimum_test_count, 100);
        assert_eq!(common.predicted_pass_count, 99);
        assert_eq!(common.predicted_fail_count, 1);
    }
}
