//! JSON rendering of a [`Report`] at a given [`ReportLevel`] (spec §3/§6).
//!
//! Projection only trims what gets *serialised* — the in-memory tree always
//! holds the full truth. IDs are carried as 1-based strings on the wire
//! (`"1"`, `"2"`, ...) while the tree itself indexes from 0; `parse_json`
//! reverses that shift so a Full-level round trip is lossless.

use serde_json::{json, Map, Value as Json};

use crate::error::{ReportError, ReportResult};
use crate::header::{Header, ReportLevel};
use crate::parameter_set::ParameterSet;
use crate::tree::{Configuration, Report, Test};
use steer_core::{Criterion, DataType, Evaluation, Value as CoreValue, ValueSet};

fn value_to_json(v: &CoreValue) -> Json {
    serde_json::to_value(v).unwrap_or(Json::Null)
}

fn value_set_to_json(vs: &ValueSet) -> Json {
    serde_json::to_value(vs).unwrap_or(Json::Null)
}

fn criteria_to_json(criteria: &[Criterion]) -> Json {
    Json::Array(criteria.iter().map(|c| serde_json::to_value(c).unwrap_or(Json::Null)).collect())
}

fn test_to_json(t: &Test, level: ReportLevel) -> Json {
    let mut obj = Map::new();
    obj.insert("testId".into(), json!((t.test_id + 1).to_string()));
    if level == ReportLevel::Full {
        obj.insert(
            "calculations".into(),
            Json::Array(t.calculations.iter().map(value_to_json).collect()),
        );
        obj.insert(
            "calculationSets".into(),
            Json::Array(t.calculation_sets.iter().map(value_set_to_json).collect()),
        );
    }
    obj.insert("criteria".into(), criteria_to_json(&t.criteria));
    obj.insert("evaluation".into(), serde_json::to_value(t.evaluation).unwrap_or(Json::Null));
    Json::Object(obj)
}

fn configuration_to_json(c: &Configuration, level: ReportLevel) -> Json {
    let mut obj = Map::new();
    obj.insert("configurationId".into(), json!((c.configuration_id + 1).to_string()));
    if level != ReportLevel::Summary {
        obj.insert(
            "attributes".into(),
            Json::Array(c.attributes.iter().map(value_to_json).collect()),
        );
        obj.insert(
            "tests".into(),
            Json::Array(c.tests.iter().map(|t| test_to_json(t, level)).collect()),
        );
    }
    if level == ReportLevel::Full {
        obj.insert("metrics".into(), Json::Array(c.metrics.iter().map(value_to_json).collect()));
        obj.insert(
            "metricSets".into(),
            Json::Array(c.metric_sets.iter().map(value_set_to_json).collect()),
        );
    }
    obj.insert("criteria".into(), criteria_to_json(&c.criteria));
    obj.insert("evaluation".into(), serde_json::to_value(c.evaluation).unwrap_or(Json::Null));
    Json::Object(obj)
}

/// Render `report` as the wire JSON shape appropriate for `report.header.report_level`.
pub fn serialize_json(report: &Report) -> Json {
    let level = report.header.report_level;
    let mut header = serde_json::to_value(&report.header).unwrap_or(Json::Null);
    let mut obj = Map::new();
    if let Some(h) = header.as_object_mut() {
        obj.append(h);
    }
    if level != ReportLevel::Summary {
        obj.insert("parameters".into(), serde_json::to_value(&report.parameters).unwrap_or(Json::Null));
        obj.insert(
            "configurations".into(),
            Json::Array(report.configurations.iter().map(|c| configuration_to_json(c, level)).collect()),
        );
    }
    obj.insert("criteria".into(), criteria_to_json(&report.criteria));
    obj.insert("evaluation".into(), serde_json::to_value(report.evaluation).unwrap_or(Json::Null));
    let _ = header;
    Json::Object(obj)
}

fn parse_wire_id(j: &Json, key: &str) -> ReportResult<u64> {
    let s = j
        .get(key)
        .and_then(Json::as_str)
        .ok_or_else(|| ReportError::JsonTagNotFound(key.to_string()))?;
    let n: u64 = s
        .parse()
        .map_err(|_| ReportError::JsonParseFailure(format!("{key} is not an integer string")))?;
    n.checked_sub(1)
        .ok_or_else(|| ReportError::JsonParseFailure(format!("{key} must be >= 1")))
}

fn parse_criteria(j: &Json, key: &str) -> ReportResult<Vec<Criterion>> {
    match j.get(key) {
        None => Ok(Vec::new()),
        Some(arr) => serde_json::from_value(arr.clone())
            .map_err(|e| ReportError::JsonParseFailure(format!("{key}: {e}"))),
    }
}

fn parse_evaluation(j: &Json) -> ReportResult<Evaluation> {
    match j.get("evaluation") {
        None => Ok(Evaluation::Inconclusive),
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| ReportError::JsonParseFailure(format!("evaluation: {e}"))),
    }
}

fn parse_values(j: &Json, key: &str) -> ReportResult<Vec<CoreValue>> {
    match j.get(key) {
        None => Ok(Vec::new()),
        Some(arr) => serde_json::from_value(arr.clone())
            .map_err(|e| ReportError::JsonParseFailure(format!("{key}: {e}"))),
    }
}

fn parse_value_sets(j: &Json, key: &str) -> ReportResult<Vec<ValueSet>> {
    match j.get(key) {
        None => Ok(Vec::new()),
        Some(arr) => serde_json::from_value(arr.clone())
            .map_err(|e| ReportError::JsonParseFailure(format!("{key}: {e}"))),
    }
}

fn parse_test(j: &Json) -> ReportResult<Test> {
    let test_id = parse_wire_id(j, "testId")?;
    Ok(Test {
        test_id,
        calculations: parse_values(j, "calculations")?,
        calculation_sets: parse_value_sets(j, "calculationSets")?,
        criteria: parse_criteria(j, "criteria")?,
        evaluation: parse_evaluation(j)?,
    })
}

fn parse_configuration(j: &Json) -> ReportResult<Configuration> {
    let configuration_id = parse_wire_id(j, "configurationId")?;
    let tests = match j.get("tests") {
        None => Vec::new(),
        Some(Json::Array(arr)) => arr.iter().map(parse_test).collect::<ReportResult<Vec<_>>>()?,
        Some(_) => return Err(ReportError::JsonParseFailure("tests must be an array".into())),
    };
    Ok(Configuration {
        configuration_id,
        attributes: parse_values(j, "attributes")?,
        tests,
        metrics: parse_values(j, "metrics")?,
        metric_sets: parse_value_sets(j, "metricSets")?,
        criteria: parse_criteria(j, "criteria")?,
        evaluation: parse_evaluation(j)?,
    })
}

/// Parse a wire-format Report. Only lossless at `ReportLevel::Full`; lower
/// levels necessarily drop information that cannot be recovered.
pub fn parse_json(json: &Json) -> ReportResult<Report> {
    let obj = json
        .as_object()
        .ok_or_else(|| ReportError::JsonParseFailure("report root must be an object".into()))?;
    let header: Header =
        serde_json::from_value(json.clone()).map_err(|e| ReportError::JsonParseFailure(format!("header: {e}")))?;
    let parameters: ParameterSet = match obj.get("parameters") {
        Some(p) => serde_json::from_value(p.clone())
            .map_err(|e| ReportError::JsonParseFailure(format!("parameters: {e}")))?,
        None => ParameterSet::new(header.test_name.clone(), "default"),
    };
    let configurations = match obj.get("configurations") {
        None => Vec::new(),
        Some(Json::Array(arr)) => arr.iter().map(parse_configuration).collect::<ReportResult<Vec<_>>>()?,
        Some(_) => return Err(ReportError::JsonParseFailure("configurations must be an array".into())),
    };
    let criteria = parse_criteria(json, "criteria")?;
    let evaluation = parse_evaluation(json)?;
    Ok(Report {
        header,
        parameters,
        configurations,
        criteria,
        evaluation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;

    fn full_report() -> Report {
        let header = Header::new(
            "block_frequency",
            "steer",
            "0.1.0",
            "linux",
            "x86_64",
            "dev-urandom",
            "2026-08-01T00:00:00-00:00",
            ReportLevel::Full,
        );
        let params = ParameterSet::new("block_frequency", "default")
            .with_parameter(CoreValue::new("bitstream_count", DataType::U64, None, None, "2").unwrap());
        let mut report = Report::new(header, params, 1, Some(2));
        report
            .add_criterion_to_test(0, 0, Criterion::new("p >= alpha", true))
            .unwrap();
        report.add_evaluation_to_test(0, 0).unwrap();
        report.add_evaluation_to_configuration(0).unwrap();
        report.add_evaluation_to_report();
        report
    }

    #[test]
    fn full_level_round_trips() {
        let report = full_report();
        let json = serialize_json(&report);
        let parsed = parse_json(&json).unwrap();
        assert_eq!(parsed.configurations.len(), report.configurations.len());
        assert_eq!(parsed.configurations[0].tests.len(), 2);
        assert_eq!(parsed.configurations[0].tests[0].evaluation, Evaluation::Pass);
    }

    #[test]
    fn summary_level_omits_configurations() {
        let mut report = full_report();
        report.header.report_level = ReportLevel::Summary;
        let json = serialize_json(&report);
        assert!(json.get("configurations").is_none());
        assert!(json.get("parameters").is_none());
        assert!(json.get("evaluation").is_some());
    }

    #[test]
    fn standard_level_omits_bodies_but_keeps_tests() {
        let mut report = full_report();
        report.header.report_level = ReportLevel::Standard;
        let json = serialize_json(&report);
        let cfg = &json["configurations"][0];
        assert!(cfg.get("metrics").is_none());
        assert!(cfg["tests"][0].get("calculations").is_none());
        assert!(cfg["tests"][0].get("criteria").is_some());
    }

    #[test]
    fn wire_ids_are_one_based() {
        let report = full_report();
        let json = serialize_json(&report);
        assert_eq!(json["configurations"][0]["configurationId"], "1");
        assert_eq!(json["configurations"][0]["tests"][0]["testId"], "1");
    }
}
