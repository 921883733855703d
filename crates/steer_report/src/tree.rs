//! The Report Tree (R): Test, Configuration, Report, and their append-only
//! builder operations (spec §4.2). Workers never touch this tree directly —
//! the Test Shell folds per-slot results in under the recorded `test_id`.

use crate::error::{ReportError, ReportResult};
use crate::header::Header;
use crate::parameter_set::ParameterSet;
use steer_core::{evaluate, Criterion, Evaluation, Value, ValueSet};

/// One bitstream's result record within one Configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Test {
    pub test_id: u64,
    pub calculations: Vec<Value>,
    pub calculation_sets: Vec<ValueSet>,
    pub criteria: Vec<Criterion>,
    pub evaluation: Evaluation,
}

impl Test {
    fn new(test_id: u64) -> Self {
        Self {
            test_id,
            calculations: Vec::new(),
            calculation_sets: Vec::new(),
            criteria: Vec::new(),
            evaluation: Evaluation::Inconclusive,
        }
    }
}

/// A grouping of Tests sharing one parameter set and input source, plus the
/// configuration-level aggregate roll-up.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    pub configuration_id: u64,
    pub attributes: Vec<Value>,
    pub tests: Vec<Test>,
    pub metrics: Vec<Value>,
    pub metric_sets: Vec<ValueSet>,
    pub criteria: Vec<Criterion>,
    pub evaluation: Evaluation,
}

impl Configuration {
    fn new(configuration_id: u64) -> Self {
        Self {
            configuration_id,
            attributes: Vec::new(),
            tests: Vec::new(),
            metrics: Vec::new(),
            metric_sets: Vec::new(),
            criteria: Vec::new(),
            evaluation: Evaluation::Inconclusive,
        }
    }
}

/// The root accumulator. Built by the Test Shell at `init_test`, mutated
/// only by the shell and its finaliser, one Configuration/Test at a time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub header: Header,
    pub parameters: ParameterSet,
    pub configurations: Vec<Configuration>,
    pub criteria: Vec<Criterion>,
    pub evaluation: Evaluation,
}

impl Report {
    /// Pre-allocates `configuration_count` empty Configurations; when
    /// `bitstream_count` is `Some(n)`, each Configuration also gets `n`
    /// pre-allocated empty Tests so parallel writes by `test_id` need no
    /// growth (spec §4.2).
    pub fn new(
        header: Header,
        parameters: ParameterSet,
        configuration_count: u64,
        bitstream_count: Option<u64>,
    ) -> Self {
        let mut report = Self {
            header,
            parameters,
            configurations: Vec::new(),
            criteria: Vec::new(),
            evaluation: Evaluation::Inconclusive,
        };
        for _ in 0..configuration_count {
            let cfg_id = report.add_configuration_to_report();
            if let Some(n) = bitstream_count {
                for _ in 0..n {
                    report.add_test_to_configuration(cfg_id).expect("cfg_id was just allocated");
                }
            }
        }
        report
    }

    fn configuration_mut(&mut self, cfg_id: u64) -> ReportResult<&mut Configuration> {
        self.configurations
            .get_mut(cfg_id as usize)
            .filter(|c| c.configuration_id == cfg_id)
            .ok_or_else(|| ReportError::InvalidArgument(format!("no configuration with id {cfg_id}")))
    }

    fn test_mut(&mut self, cfg_id: u64, test_id: u64) -> ReportResult<&mut Test> {
        let cfg = self.configuration_mut(cfg_id)?;
        cfg.tests
            .get_mut(test_id as usize)
            .filter(|t| t.test_id == test_id)
            .ok_or_else(|| ReportError::InvalidArgument(format!("no test with id {test_id} in configuration {cfg_id}")))
    }

    /// Appends a new Configuration with a strictly monotonic id equal to the
    /// current count. Returns the new `configuration_id`.
    pub fn add_configuration_to_report(&mut self) -> u64 {
        let id = self.configurations.len() as u64;
        self.configurations.push(Configuration::new(id));
        id
    }

    /// Appends a new Test to `cfg_id` with `test_id` equal to that
    /// Configuration's current test count. Returns the new `test_id`.
    pub fn add_test_to_configuration(&mut self, cfg_id: u64) -> ReportResult<u64> {
        let cfg = self.configuration_mut(cfg_id)?;
        let id = cfg.tests.len() as u64;
        cfg.tests.push(Test::new(id));
        Ok(id)
    }

    pub fn add_attribute_to_configuration(&mut self, cfg_id: u64, attribute: Value) -> ReportResult<()> {
        self.configuration_mut(cfg_id)?.attributes.push(attribute);
        Ok(())
    }

    pub fn add_metric_to_configuration(&mut self, cfg_id: u64, metric: Value) -> ReportResult<()> {
        self.configuration_mut(cfg_id)?.metrics.push(metric);
        Ok(())
    }

    pub fn add_metric_set_to_configuration(&mut self, cfg_id: u64, metric_set: ValueSet) -> ReportResult<()> {
        self.configuration_mut(cfg_id)?.metric_sets.push(metric_set);
        Ok(())
    }

    pub fn add_calculation_to_test(&mut self, cfg_id: u64, test_id: u64, calc: Value) -> ReportResult<()> {
        self.test_mut(cfg_id, test_id)?.calculations.push(calc);
        Ok(())
    }

    pub fn add_calculation_set_to_test(&mut self, cfg_id: u64, test_id: u64, calc_set: ValueSet) -> ReportResult<()> {
        self.test_mut(cfg_id, test_id)?.calculation_sets.push(calc_set);
        Ok(())
    }

    pub fn add_criterion_to_test(&mut self, cfg_id: u64, test_id: u64, criterion: Criterion) -> ReportResult<()> {
        if criterion.basis.is_empty() {
            return Err(ReportError::InvalidArgument("Criterion.basis must not be empty".into()));
        }
        self.test_mut(cfg_id, test_id)?.criteria.push(criterion);
        Ok(())
    }

    pub fn add_criterion_to_configuration(&mut self, cfg_id: u64, criterion: Criterion) -> ReportResult<()> {
        if criterion.basis.is_empty() {
            return Err(ReportError::InvalidArgument("Criterion.basis must not be empty".into()));
        }
        self.configuration_mut(cfg_id)?.criteria.push(criterion);
        Ok(())
    }

    pub fn add_criterion_to_report(&mut self, criterion: Criterion) -> ReportResult<()> {
        if criterion.basis.is_empty() {
            return Err(ReportError::InvalidArgument("Criterion.basis must not be empty".into()));
        }
        self.criteria.push(criterion);
        Ok(())
    }

    /// Computes the evaluation tag deterministically from the current
    /// criteria list (AND over `result`) and records it on the Test.
    pub fn add_evaluation_to_test(&mut self, cfg_id: u64, test_id: u64) -> ReportResult<Evaluation> {
        let test = self.test_mut(cfg_id, test_id)?;
        test.evaluation = evaluate(&test.criteria);
        Ok(test.evaluation)
    }

    pub fn add_evaluation_to_configuration(&mut self, cfg_id: u64) -> ReportResult<Evaluation> {
        let cfg = self.configuration_mut(cfg_id)?;
        cfg.evaluation = evaluate(&cfg.criteria);
        Ok(cfg.evaluation)
    }

    pub fn add_evaluation_to_report(&mut self) -> Evaluation {
        self.evaluation = evaluate(&self.criteria);
        self.evaluation
    }

    pub fn configuration(&self, cfg_id: u64) -> Option<&Configuration> {
        self.configurations.get(cfg_id as usize)
    }

    pub fn test(&self, cfg_id: u64, test_id: u64) -> Option<&Test> {
        self.configuration(cfg_id)?.tests.get(test_id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::ReportLevel;

    fn report(configs: u64, bitstreams: u64) -> Report {
        let header = Header::new("block_frequency", "steer", "0.1.0", "linux", "x86_64", "dev-urandom", "2026-08-01T00:00:00-00:00", ReportLevel::Full);
        let params = ParameterSet::new("block_frequency", "default");
        Report::new(header, params, configs, Some(bitstreams))
    }

    #[test]
    fn preallocated_tests_are_indexable_by_id() {
        let r = report(1, 4);
        assert_eq!(r.configurations[0].tests.len(), 4);
        for (i, t) in r.configurations[0].tests.iter().enumerate() {
            assert_eq!(t.test_id, i as u64);
        }
    }

    #[test]
    fn configuration_ids_are_monotonic() {
        let mut r = report(0, 0);
        let a = r.add_configuration_to_report();
        let b = r.add_configuration_to_report();
        assert_eq!((a, b), (0, 1));
    }

    #[test]
    fn unknown_configuration_id_is_invalid_argument() {
        let mut r = report(1, 1);
        assert!(matches!(
            r.add_attribute_to_configuration(7, Value::new("x", steer_core::DataType::U8, None, None, "1").unwrap()),
            Err(ReportError::InvalidArgument(_))
        ));
    }

    #[test]
    fn evaluation_rolls_up_from_criteria() {
        let mut r = report(1, 1);
        r.add_criterion_to_test(0, 0, Criterion::new("p >= alpha", true)).unwrap();
        assert_eq!(r.add_evaluation_to_test(0, 0).unwrap(), Evaluation::Pass);
        r.add_criterion_to_test(0, 0, Criterion::new("secondary check", false)).unwrap();
        assert_eq!(r.add_evaluation_to_test(0, 0).unwrap(), Evaluation::Fail);
    }
}
