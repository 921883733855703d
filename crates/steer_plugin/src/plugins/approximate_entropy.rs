//! Approximate Entropy Test (NIST SP 800-22 §2.12).

use std::collections::HashMap;

use statrs::function::gamma::checked_gamma_ur;
use steer_core::{Criterion, DataType, Value};
use steer_report::{ParameterSet, Report};

use crate::bits::{bit_at, bit_len};
use crate::error::{PluginError, PluginResult};
use crate::info::{InputFormat, ParameterInfo, TestInfo};
use crate::trait_def::{ExecuteContext, InitOutcome, PerBitstreamOutcome, StatisticalTest};

pub struct ApproximateEntropyState {
    block_length: u64,
    alpha: f64,
    configuration_id: u64,
}

pub struct ApproximateEntropyTest;

/// Cyclic (wraparound) template frequency statistic φ(m): the sum, over
/// every distinct `m`-bit pattern observed among the `n` overlapping,
/// cyclically-extended windows, of `p * ln(p)` where `p` is that pattern's
/// observed frequency.
fn phi(buffer: &[u8], n: usize, m: usize) -> f64 {
    if m == 0 {
        return 0.0;
    }
    let mut counts: HashMap<u64, u64> = HashMap::new();
    for start in 0..n {
        let mut pattern = 0u64;
        for j in 0..m {
            let bit = bit_at(buffer, (start + j) % n);
            pattern = (pattern << 1) | bit as u64;
        }
        *counts.entry(pattern).or_insert(0) += 1;
    }
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / n as f64;
            p * p.ln()
        })
        .sum()
}

impl StatisticalTest for ApproximateEntropyTest {
    type State = ApproximateEntropyState;

    fn get_test_info(&self) -> TestInfo {
        TestInfo {
            test_name: "approximate_entropy",
            suite: "NIST SP 800-22",
            description: "Approximate Entropy Test",
            complexity: "O(n * 2^m)",
            references: vec!["NIST SP 800-22 Rev. 1a, Section 2.12"],
            program_name: "steer-approximate-entropy",
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
                default: "3",
                min: Some("1"),
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
        let recommended = (bitstream_length as f64).log2().floor() as u64;
        if block_length > recommended {
            return Err(PluginError::BlockLengthExceedsRecommended {
                actual: block_length,
                recommended,
            });
        }
        Ok(InitOutcome {
            state: ApproximateEntropyState {
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
        let phi_m = phi(ctx.buffer, n, m);
        let phi_m1 = phi(ctx.buffer, n, m + 1);
        let approximate_entropy = phi_m - phi_m1;
        let chi_squared = 2.0 * n as f64 * (std::f64::consts::LN_2 - approximate_entropy);
        let p_value = checked_gamma_ur(2f64.powi(m as i32 - 1), chi_squared / 2.0)
            .map_err(|e| PluginError::InvalidArgument(format!("igamc failed: {e}")))?;

        let calculations = vec![
            Value::new("approximateEntropy", DataType::F64, Some(12), None, format!("{approximate_entropy:.12}"))?,
            Value::new("approximateEntropyChiSquared", DataType::F64, Some(12), None, format!("{chi_squared:.12}"))?,
            Value::new("probabilityValue", DataType::F64, Some(12), None, format!("{p_value:.12}"))?,
        ];

        let criteria = vec![Criterion::new("probabilityValue >= significance_level", p_value >= state.alpha)];

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
        Ok(())
    }
}
