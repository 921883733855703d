//! End-to-end CLI smoke tests: runs the `steer` binary against a temp
//! entropy file and checks the Report JSON it writes.

use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;

fn parameters_file(dir: &tempfile::TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("parameters.json");
    std::fs::write(&path, json).unwrap();
    path
}

fn entropy_file(dir: &tempfile::TempDir, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("entropy.bin");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(bytes).unwrap();
    path
}

#[test]
fn run_block_frequency_writes_a_report() {
    let dir = tempfile::tempdir().unwrap();
    let params = parameters_file(
        &dir,
        r#"[
            {"name": "bitstream_count", "dataType": "u64", "value": "1"},
            {"name": "bitstream_length", "dataType": "u64", "value": "8000"},
            {"name": "block_length", "dataType": "u64", "value": "100"},
            {"name": "significance_level", "dataType": "f64", "precision": 2, "value": "0.01"}
        ]"#,
    );
    let input = entropy_file(&dir, &[0xAAu8; 1000]);
    let report_path = dir.path().join("report.json");

    Command::cargo_bin("steer")
        .unwrap()
        .arg("run")
        .arg("--program")
        .arg("block-frequency")
        .arg("--parameters")
        .arg(&params)
        .arg("--report")
        .arg(&report_path)
        .arg(&input)
        .assert()
        .success();

    let written = std::fs::read_to_string(&report_path).unwrap();
    assert!(written.contains("\"report\""));
    assert!(written.contains("\"evaluation\""));
}

#[test]
fn missing_input_file_fails_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.json");

    Command::cargo_bin("steer")
        .unwrap()
        .arg("run")
        .arg("--program")
        .arg("block-frequency")
        .arg("--report")
        .arg(&report_path)
        .arg(dir.path().join("does-not-exist.bin"))
        .assert()
        .failure()
        .stderr(contains("steer:"));
}

#[test]
fn schedule_with_missing_plan_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("steer")
        .unwrap()
        .arg("schedule")
        .arg(dir.path().join("does-not-exist.json"))
        .assert()
        .failure();
}
