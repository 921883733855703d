//! Drives one plug-in instance through the Test Shell lifecycle against a
//! stream of bitstreams (spec §4.4).

use std::io::{self, Read};
use std::sync::Arc;
use std::time::Instant;

use steer_core::{DataType, Value};
use steer_math::{confusion_matrix, proportion_threshold, probability_value_uniformity, stats_to_value_set};
use steer_plugin::{ExecuteContext, PerBitstreamOutcome, PluginResult, StatisticalTest};
use steer_pool::WorkerPool;
use steer_report::{Header, ParameterSet, Report};

use crate::common::CommonData;
use crate::error::{ShellError, ShellResult};
use crate::state::ShellState;

/// Counts set bits MSB-first across a whole buffer.
fn count_ones(buffer: &[u8]) -> u64 {
    buffer.iter().map(|b| b.count_ones() as u64).sum()
}

/// Fills `buffer` as far as the source allows, returning the number of bytes
/// actually read. Unlike `Read::read_exact`, a short read is not itself an
/// error here — it lets the caller distinguish a clean early EOF (reported as
/// `ShellError::ShortRead`) from a genuine I/O failure.
fn read_full(source: &mut impl Read, buffer: &mut [u8]) -> io::Result<usize> {
    let mut read = 0;
    while read < buffer.len() {
        match source.read(&mut buffer[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(read)
}

/// Invoked once per drained batch during Streaming, with the number of
/// bitstreams completed so far (out of `bitstream_count`). Supplements
/// `spec.md` with the `--report-progress` behaviour `original_source/`
/// shows; silent by default (`run` wires a no-op sink).
pub trait ProgressSink {
    fn on_batch_drained(&mut self, tests_completed: u64, bitstream_count: u64);
}

impl<F: FnMut(u64, u64)> ProgressSink for F {
    fn on_batch_drained(&mut self, tests_completed: u64, bitstream_count: u64) {
        self(tests_completed, bitstream_count)
    }
}

struct NoopProgress;
impl ProgressSink for NoopProgress {
    fn on_batch_drained(&mut self, _tests_completed: u64, _bitstream_count: u64) {}
}

/// Runs `plugin` over `bitstream_count` bitstreams read from `source`,
/// returning the finished Report and the state the shell ended in
/// (`Reported` on success, `Error` if Streaming was aborted).
pub fn run<P, R>(plugin: P, params: ParameterSet, header: Header, source: R) -> ShellResult<(Report, ShellState)>
where
    P: StatisticalTest + 'static,
    R: Read,
{
    run_with_progress(plugin, params, header, source, &mut NoopProgress)
}

/// Same as [`run`], but invokes `progress` once per drained batch.
pub fn run_with_progress<P, R, S>(
    plugin: P,
    params: ParameterSet,
    header: Header,
    mut source: R,
    progress: &mut S,
) -> ShellResult<(Report, ShellState)>
where
    P: StatisticalTest + 'static,
    R: Read,
    S: ProgressSink + ?Sized,
{
    let started_at = Instant::now();

    // Init
    let common = CommonData::from_parameters(&params)?;
    let init_outcome = plugin.init_test(&params)?;
    let mut plugin_state = init_outcome.state;
    let configuration_count = plugin.get_configuration_count(&plugin_state);

    // Configured
    let mut report = Report::new(header, params, configuration_count as u64, Some(common.bitstream_count));
    let configuration_id = 0u64;
    plugin.set_report(&mut plugin_state, configuration_id);

    let plugin = Arc::new(plugin);
    let state = Arc::new(plugin_state);

    let pool_plugin = plugin.clone();
    let pool_state = state.clone();
    let mut pool: WorkerPool<PluginResult<PerBitstreamOutcome>> =
        WorkerPool::new(common.thread_count, move |test_id, buffer: &[u8]| {
            let ones = count_ones(buffer);
            let zeros = buffer.len() as u64 * 8 - ones;
            let ctx = ExecuteContext {
                bitstream_id: test_id,
                buffer,
                zeros,
                ones,
            };
            pool_plugin.execute_test(&pool_state, ctx)
        })?;

    // Streaming ⇄ Draining
    let mut tests_run = 0u64;
    let mut tests_passed = 0u64;
    let mut tests_failed = 0u64;
    let mut accumulated_ones = 0u64;
    let mut accumulated_zeros = 0u64;
    let mut dispatched = 0usize;
    let mut abort_error: Option<ShellError> = None;

    'streaming: for test_id in 0..common.bitstream_count {
        let mut buffer = vec![0u8; common.buffer_size];
        match read_full(&mut source, &mut buffer) {
            Ok(actual) if actual < buffer.len() => {
                abort_error = Some(ShellError::ShortRead {
                    expected: buffer.len(),
                    actual,
                });
                break 'streaming;
            }
            Ok(_) => {}
            Err(e) => {
                abort_error = Some(ShellError::Io(e.to_string()));
                break 'streaming;
            }
        }
        let ones = count_ones(&buffer);
        accumulated_ones += ones;
        accumulated_zeros += buffer.len() as u64 * 8 - ones;

        let slot = dispatched;
        pool.dispatch(slot, test_id, buffer)?;
        dispatched += 1;

        // Batch barrier: draining happens in slot order, never completion
        // order (spec §4.3 step 2).
        if dispatched == common.thread_count {
            if let Err(e) = drain(&mut pool, &mut report, configuration_id, &mut tests_run, &mut tests_passed, &mut tests_failed) {
                abort_error = Some(e);
                break 'streaming;
            }
            dispatched = 0;
            progress.on_batch_drained(tests_run, common.bitstream_count);
        }
    }

    // End-of-stream drain for whatever fraction of slots is still occupied
    // (spec §4.3 step 3; mandatory even for a partial final batch).
    if abort_error.is_none() && dispatched > 0 {
        if let Err(e) = drain(&mut pool, &mut report, configuration_id, &mut tests_run, &mut tests_passed, &mut tests_failed) {
            abort_error = Some(e);
        }
        progress.on_batch_drained(tests_run, common.bitstream_count);
    }
    drop(pool);

    // Finalized: always run, even after an abort (spec §4.4 "Failure
    // semantics in T"), so whatever was accumulated still rolls up.
    let mut plugin_state = Arc::try_unwrap(state)
        .unwrap_or_else(|_| panic!("worker pool dropped; sole owner of plug-in state"));
    plugin.finalize_test(&mut plugin_state, &mut report, configuration_id, common.bitstream_count)?;

    finalize_configuration(
        &mut report,
        configuration_id,
        &common,
        tests_run,
        tests_passed,
        tests_failed,
        accumulated_ones,
        accumulated_zeros,
    )?;

    report.header.completed_at = Some(format_unix_now());
    report.header.duration = Some(format!("{:.3}s", started_at.elapsed().as_secs_f64()));
    report.add_evaluation_to_report();

    match abort_error {
        Some(e) => {
            tracing::warn!(error = %e, "streaming aborted; finalized with partial report");
            Ok((report, ShellState::Error))
        }
        None => Ok((report, ShellState::Reported)),
    }
}

fn drain(
    pool: &mut WorkerPool<PluginResult<PerBitstreamOutcome>>,
    report: &mut Report,
    configuration_id: u64,
    tests_run: &mut u64,
    tests_passed: &mut u64,
    tests_failed: &mut u64,
) -> ShellResult<()> {
    let results = pool.barrier()?;
    for (test_id, result) in results {
        let outcome: PerBitstreamOutcome = result.map_err(|e| ShellError::WorkerFailed {
            slot: test_id as usize,
            source: Box::new(ShellError::Plugin(e)),
        })?;
        for calc in outcome.calculations {
            report.add_calculation_to_test(configuration_id, test_id, calc)?;
        }
        for calc_set in outcome.calculation_sets {
            report.add_calculation_set_to_test(configuration_id, test_id, calc_set)?;
        }
        for criterion in outcome.criteria {
            report.add_criterion_to_test(configuration_id, test_id, criterion)?;
        }
        let evaluation = report.add_evaluation_to_test(configuration_id, test_id)?;
        *tests_run += 1;
        if evaluation.is_pass() {
            *tests_passed += 1;
        } else {
            *tests_failed += 1;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn finalize_configuration(
    report: &mut Report,
    configuration_id: u64,
    common: &CommonData,
    tests_run: u64,
    tests_passed: u64,
    tests_failed: u64,
    accumulated_ones: u64,
    accumulated_zeros: u64,
) -> ShellResult<()> {
    let p_values: Vec<f64> = report
        .configuration(configuration_id)
        .map(|cfg| {
            cfg.tests
                .iter()
                .filter_map(|t| t.calculations.iter().find(|v| v.name == "probabilityValue"))
                .filter_map(|v| v.native().ok()?.as_f64())
                .collect()
        })
        .unwrap_or_default();

    let uniformity = if p_values.is_empty() {
        None
    } else {
        Some(probability_value_uniformity(&p_values)?)
    };

    let proportion = proportion_threshold(common.significance_level, common.bitstream_count)?;
    let matrix = confusion_matrix(
        tests_run,
        tests_passed,
        tests_failed,
        common.predicted_pass_count,
        common.predicted_fail_count,
    );
    let stats = matrix.stats();

    report.add_metric_to_configuration(
        configuration_id,
        Value::new("testsRun", DataType::U64, None, None, tests_run.to_string())?,
    )?;
    report.add_metric_to_configuration(
        configuration_id,
        Value::new("testsPassed", DataType::U64, None, None, tests_passed.to_string())?,
    )?;
    report.add_metric_to_configuration(
        configuration_id,
        Value::new("testsFailed", DataType::U64, None, None, tests_failed.to_string())?,
    )?;
    report.add_metric_to_configuration(
        configuration_id,
        Value::new("minimumTestCount", DataType::U64, None, None, common.minimum_test_count.to_string())?,
    )?;
    report.add_metric_to_configuration(
        configuration_id,
        Value::new("accumulatedOnes", DataType::U64, None, None, accumulated_ones.to_string())?,
    )?;
    report.add_metric_to_configuration(
        configuration_id,
        Value::new("accumulatedZeros", DataType::U64, None, None, accumulated_zeros.to_string())?,
    )?;
    report.add_metric_to_configuration(
        configuration_id,
        Value::new("proportionThresholdMin", DataType::I64, None, None, proportion.min.to_string())?,
    )?;
    report.add_metric_to_configuration(
        configuration_id,
        Value::new("proportionThresholdMax", DataType::I64, None, None, proportion.max.to_string())?,
    )?;
    if let Some(q) = uniformity {
        report.add_metric_to_configuration(
            configuration_id,
            Value::new("probabilityValueUniformity", DataType::F64, Some(12), None, format!("{q:.12}"))?,
        )?;
    }
    report.add_metric_set_to_configuration(configuration_id, stats_to_value_set(&stats))?;

    report.add_criterion_to_configuration(
        configuration_id,
        steer_core::Criterion::new("actualTestCount >= minimumTestCount", tests_run >= common.minimum_test_count),
    )?;
    report.add_criterion_to_configuration(
        configuration_id,
        steer_core::Criterion::new("testsPassed within proportion threshold", proportion.contains(tests_passed)),
    )?;
    if let Some(q) = uniformity {
        report.add_criterion_to_configuration(
            configuration_id,
            steer_core::Criterion::new("probabilityValueUniformity >= 0.0001", q >= 0.0001),
        )?;
    }
    report.add_evaluation_to_configuration(configuration_id)?;
    Ok(())
}

/// Unix-seconds placeholder; spec §1 leaves the header's timestamp format
/// loosely specified and no date/time crate is part of the dependency
/// stack, so this does not attempt real RFC-3339 formatting.
fn format_unix_now() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("unix:{}", now.as_secs())
}
