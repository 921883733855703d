//! Frequency Test within a Block (NIST SP 800-22 §2.2), the canonical
//! plug-in used to exercise the shell end-to-end.

use statrs::function::gamma::checked_gamma_ur;
use steer_core::{Criterion, DataType, Value};
use steer_report::{ParameterSet, Report};

use crate::bits::{bit_at, bit_len};
use crate::error::{PluginError, PluginResult};
use crate::info::{InputFormat, ParameterInfo, TestInfo};
use crate::trait_def::{ExecuteContext, InitOutcome, PerBitstreamOutcome, StatisticalTest};

pub struct BlockFrequencyState {
    block_length: u64,
    alpha: f64,
    configuration_id: u64,
}

/// Frequency Test within a Block: partitions each bitstream into
/// `numSubstringBlocks` non-overlapping blocks of `block_length` bits and
/// tests whether the fraction of ones in each block is close to 1/2.
pub struct BlockFrequencyTest;

impl StatisticalTest for BlockFrequencyTest {
    type State = BlockFrequencyState;

    fn get_test_info(&self) -> TestInfo {
        TestInfo {
            test_name: "block_frequency",
            suite: "NIST SP 800-22",
            description: "Frequency Test within a Block",
            complexity: "O(n)",
            references: vec!["NIST SP 800-22 Rev. 1a, Section 2.2"],
            program_name: "steer-block-frequency",
            program_version: env!("CARGO_PKG_VERSION"),
            input_format: InputFormat::RawBinary,
            uri: "",
            authors: vec![],
            contributors: vec![],
            maintainers: vec![],
            contact: "",
        }
    }

    fn get_parameters_info(&self) -> Vec<ParameterInfo> {
        vec![
            ParameterInfo {
                name: "block_length",
                data_type: DataType::U64,
                precision: None,
                units: Some("bits"),
                default: "100",
                min: Some("20"),
                max: None,
            },
            ParameterInfo {
                name: "significance_level",
                data_type: DataType::F64,
                precision: Some(2),
                units: None,
                default: "0.01",
                min: Some("0"),
                max: Some("1"),
            },
        ]
    }

    fn init_test(&self, params: &ParameterSet) -> PluginResult<InitOutcome<Self::State>> {
        let block_length = params
            .get_u64("block_length")?
            .ok_or_else(|| PluginError::InvalidArgument("missing parameter block_length".into()))?;
        if block_length == 0 {
            return Err(PluginError::InvalidArgument("block_length must be >= 1".into()));
        }
        let alpha = params.significance_level()?;
        let bitstream_length = params.bitstream_length()?;
        Ok(InitOutcome {
            state: BlockFrequencyState {
                block_length,
                alpha,
                configuration_id: 0,
            },
            buffer_size: (bitstream_length / 8) as usize,
        })
    }

    fn get_configuration_count(&self, _state: &Self::State) -> u32 {
        1
    }

    fn set_report(&self, state: &mut Self::State, configuration_id: u64) {
        state.configuration_id = configuration_id;
    }

    fn execute_test(&self, state: &Self::State, ctx: ExecuteContext<'_>) -> PluginResult<PerBitstreamOutcome> {
        let n = bit_len(ctx.buffer);
        let m = state.block_length as usize;
        let num_blocks = n / m;
        if num_blocks == 0 {
            return Err(PluginError::InvalidArgument("block_length exceeds bitstream length".into()));
        }

        let recommended_ok = state.block_length >= 20 && state.block_length as usize <= n;

        let mut sum_sq_dev = 0.0f64;
        for block in 0..num_blocks {
            let start = block * m;
            let ones: u32 = (0..m).map(|i| bit_at(ctx.buffer, start + i) as u32).sum();
            let pi = ones as f64 / m as f64;
            let dev = pi - 0.5;
            sum_sq_dev += dev * dev;
        }
        let chi_squared = 4.0 * m as f64 * sum_sq_dev;
        let p_value = checked_gamma_ur(num_blocks as f64 / 2.0, chi_squared / 2.0)
            .map_err(|e| PluginError::InvalidArgument(format!("igamc failed: {e}")))?;

        let calculations = vec![
            Value::new("numSubstringBlocks", DataType::U64, None, None, num_blocks.to_string())?,
            Value::new("blockFrequencyChiSquared", DataType::F64, Some(12), None, format!("{chi_squared:.12}"))?,
            Value::new("probabilityValue", DataType::F64, Some(12), None, format!("{p_value:.12}"))?,
        ];

        let criteria = vec![
            Criterion::new("block_length within recommended bounds", recommended_ok),
            Criterion::new("probabilityValue >= significance_level", p_value >= state.alpha),
        ];

        Ok(PerBitstreamOutcome {
            calculations,
            calculation_sets: vec![],
            criteria,
        })
    }

    fn finalize_test(
        &self,
        _state: &mut Self::State,
        _report: &mut Report,
        _configuration_id: u64,
        _supplied_bitstream_count: u64,
    ) -> PluginResult<()> {
        // Configuration-level aggregation (minimum-test-count, proportion,
        // uniformity) is generic shell behaviour, not test-specific; this
        // plug-in has nothing further to roll up.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steer_core::Value as CoreValue;

    fn params() -> ParameterSet {
        ParameterSet::new("block_frequency", "default")
            .with_parameter(CoreValue::new("bitstream_count", DataType::U64, None, None, "1").unwrap())
            .with_parameter(CoreValue::new("bitstream_length", DataType::U64, None, None, "8000").unwrap())
            .with_parameter(CoreValue::new("block_length", DataType::U64, None, None, "100").unwrap())
            .with_parameter(CoreValue::new("significance_level", DataType::F64, None, None, "0.01").unwrap())
    }

    #[test]
    fn all_zero_bitstream_fails() {
        let test = BlockFrequencyTest;
        let outcome = test.init_test(&params()).unwrap();
        let buffer = vec![0u8; 1000];
        let ctx = ExecuteContext { bitstream_id: 0, buffer: &buffer, zeros: 8000, ones: 0 };
        let result = test.execute_test(&outcome.state, ctx).unwrap();
        let p_value: f64 = result.calculations.iter().find(|v| v.name == "probabilityValue").unwrap().native().unwrap().as_f64().unwrap();
        assert!(p_value < 0.01);
        let num_blocks = &result.calculations[0].value;
        assert_eq!(num_blocks, "80");
    }

    #[test]
    fn alternating_bitstream_passes_with_p_value_one() {
        let test = BlockFrequencyTest;
        let outcome = test.init_test(&params()).unwrap();
        let buffer = vec![0xAAu8; 1000];
        let ctx = ExecuteContext { bitstream_id: 0, buffer: &buffer, zeros: 4000, ones: 4000 };
        let result = test.execute_test(&outcome.state, ctx).unwrap();
        let p_value: f64 = result.calculations.iter().find(|v| v.name == "probabilityValue").unwrap().native().unwrap().as_f64().unwrap();
        assert!((p_value - 1.0).abs() < 1e-9);
        assert!(result.criteria.iter().all(|c| c.result));
    }
}
