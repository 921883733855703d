//! End-to-end Test Shell scenarios against the `block_frequency` and
//! `approximate_entropy` plug-ins.

use std::io::Cursor;

use steer_core::DataType;
use steer_plugin::{ApproximateEntropyTest, BlockFrequencyTest};
use steer_report::{Header, ParameterSet, ReportLevel};
use steer_shell::{run, ShellState};

fn header(test_name: &str) -> Header {
    Header::new(
        test_name,
        "steer",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH,
        "test-fixture",
        "unix:0",
        ReportLevel::Full,
    )
}

fn block_frequency_params(bitstream_count: u64, bitstream_length: u64, block_length: u64, alpha: &str) -> ParameterSet {
    ParameterSet::new("block_frequency", "default")
        .with_parameter(steer_core::Value::new("bitstream_count", DataType::U64, None, None, bitstream_count.to_string()).unwrap())
        .with_parameter(steer_core::Value::new("bitstream_length", DataType::U64, None, None, bitstream_length.to_string()).unwrap())
        .with_parameter(steer_core::Value::new("block_length", DataType::U64, None, None, block_length.to_string()).unwrap())
        .with_parameter(steer_core::Value::new("significance_level", DataType::F64, None, None, alpha).unwrap())
}

#[test]
fn s1_block_frequency_all_zeros_fails() {
    let params = block_frequency_params(1, 8000, 100, "0.01");
    let input = vec![0u8; 1000];
    let (report, state) = run(BlockFrequencyTest, params, header("block_frequency"), Cursor::new(input)).unwrap();
    assert_eq!(state, ShellState::Reported);

    let cfg = report.configuration(0).unwrap();
    assert_eq!(cfg.tests[0].evaluation, steer_core::Evaluation::Fail);
    assert_eq!(cfg.evaluation, steer_core::Evaluation::Fail);

    let num_blocks = cfg.tests[0]
        .calculations
        .iter()
        .find(|v| v.name == "numSubstringBlocks")
        .unwrap();
    assert_eq!(num_blocks.value, "80");

    let accumulated_zeros = cfg.metrics.iter().find(|v| v.name == "accumulatedZeros").unwrap();
    assert_eq!(accumulated_zeros.value, "8000");
    let accumulated_ones = cfg.metrics.iter().find(|v| v.name == "accumulatedOnes").unwrap();
    assert_eq!(accumulated_ones.value, "0");
}

#[test]
fn s2_block_frequency_alternating_passes() {
    let params = block_frequency_params(1, 8000, 100, "0.01");
    let input = vec![0xAAu8; 1000];
    let (report, state) = run(BlockFrequencyTest, params, header("block_frequency"), Cursor::new(input)).unwrap();
    assert_eq!(state, ShellState::Reported);

    let cfg = report.configuration(0).unwrap();
    assert_eq!(cfg.tests[0].evaluation, steer_core::Evaluation::Pass);

    let p_value = cfg.tests[0]
        .calculations
        .iter()
        .find(|v| v.name == "probabilityValue")
        .unwrap()
        .native()
        .unwrap()
        .as_f64()
        .unwrap();
    assert!((p_value - 1.0).abs() < 1e-9);

    let accumulated_zeros = cfg.metrics.iter().find(|v| v.name == "accumulatedZeros").unwrap();
    assert_eq!(accumulated_zeros.value, "4000");
    let accumulated_ones = cfg.metrics.iter().find(|v| v.name == "accumulatedOnes").unwrap();
    assert_eq!(accumulated_ones.value, "4000");
}

#[test]
fn s3_approximate_entropy_consistent_across_thread_counts() {
    let mut input = vec![0u8; 128 * 32];
    for (i, b) in input.iter_mut().enumerate() {
        *b = ((i * 131 + 7) % 256) as u8;
    }

    let mut p_values_by_thread_count = Vec::new();
    for &thread_count in &[1u64, 8, 32] {
        let params = ParameterSet::new("approximate_entropy", "default")
            .with_parameter(steer_core::Value::new("bitstream_count", DataType::U64, None, None, "32").unwrap())
            .with_parameter(steer_core::Value::new("bitstream_length", DataType::U64, None, None, "1024").unwrap())
            .with_parameter(steer_core::Value::new("block_length", DataType::U64, None, None, "3").unwrap())
            .with_parameter(steer_core::Value::new("significance_level", DataType::F64, None, None, "0.01").unwrap())
            .with_parameter(steer_core::Value::new("thread_count", DataType::U64, None, None, thread_count.to_string()).unwrap());
        let (report, state) = run(ApproximateEntropyTest, params, header("approximate_entropy"), Cursor::new(input.clone())).unwrap();
        assert_eq!(state, ShellState::Reported);
        let cfg = report.configuration(0).unwrap();
        let p_values: Vec<String> = cfg
            .tests
            .iter()
            .map(|t| t.calculations.iter().find(|v| v.name == "probabilityValue").unwrap().value.clone())
            .collect();
        p_values_by_thread_count.push(p_values);
    }

    assert_eq!(p_values_by_thread_count[0], p_values_by_thread_count[1]);
    assert_eq!(p_values_by_thread_count[1], p_values_by_thread_count[2]);
}

#[test]
fn short_read_aborts_streaming_but_still_finalizes() {
    let params = block_frequency_params(4, 8000, 100, "0.01");
    let input = vec![0u8; 1000];
    let (report, state) = run(BlockFrequencyTest, params, header("block_frequency"), Cursor::new(input)).unwrap();
    assert_eq!(state, ShellState::Error);
    let cfg = report.configuration(0).unwrap();
    assert!(cfg.metrics.iter().any(|v| v.name == "testsRun"));
}
