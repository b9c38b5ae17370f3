use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

const HEALTHY: &str = r#"{
    "age": 44, "sex": 0, "education": 4, "is_smoking": 0,
    "totChol": 185, "sysBP": 115, "diaBP": 75, "BMI": 22.1, "heartRate": 66
}"#;

/// Input document in the temp dir, removed when dropped.
struct InputFile(PathBuf);

impl InputFile {
    fn path(&self) -> &str {
        self.0.to_str().unwrap()
    }
}

impl Drop for InputFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

fn write_input(test_name: &str, body: &str) -> InputFile {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let path = std::env::temp_dir().join(format!("chd_cli_{test_name}_{nanos}.json"));
    fs::write(&path, body).unwrap();
    InputFile(path)
}

fn run_raw(args: &[&str], stdin: Option<&str>) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_chd");
    let mut child = Command::new(exe)
        .args(args)
        .env_remove("CHD_GATEWAY")
        .env_remove("CHD_MOCK_DELAY_MS")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run chd");
    if let Some(text) = stdin {
        child.stdin.take().unwrap().write_all(text.as_bytes()).unwrap();
    }
    drop(child.stdin.take());
    child.wait_with_output().unwrap()
}

fn run_cli(args: &[&str], stdin: Option<&str>) -> (i32, Value) {
    let out = run_raw(args, stdin);
    let code = out.status.code().unwrap_or(-1);
    let stream = if code == 0 { &out.stdout } else { &out.stderr };
    let json = serde_json::from_slice(stream).unwrap_or(Value::Null);
    (code, json)
}

#[test]
fn envelope_wraps_successful_commands() {
    let input = write_input("envelope", HEALTHY);
    let (code, json) = run_cli(&["--json", "validate", input.path()], None);

    assert_eq!(code, 0);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], "1.0");
    assert_eq!(json["command"], "validate");
    assert!(json["error"].is_null());
    assert_eq!(json["data"]["input"]["BMI"], 22.1);
    assert_eq!(json["data"]["input"]["cigsPerDay"], 0.0);
    assert!(json["data"]["input"]["glucose"].is_null());

    let leftover = input.0.clone();
    drop(input);
    assert!(!leftover.exists());
}

#[test]
fn validation_failure_lists_fields() {
    let (code, json) = run_cli(&["--json", "validate", "-"], Some(r#"{"age": 19, "sysBP": "high"}"#));

    assert_eq!(code, 1);
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["type"], "ValidationError");
    let fields: Vec<&str> = json["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"age"));
    assert!(fields.contains(&"sysBP"));
    assert!(fields.contains(&"heartRate"));
}

#[test]
fn rejected_input_is_logged_as_a_warning() {
    let out = run_raw(&["validate", "-"], Some(r#"{"age": 19}"#));
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr.contains("form rejected with"), "{stderr}");
    assert!(stderr.contains("WARN"), "{stderr}");
}

#[test]
fn highlight_flags_high_values() {
    let (code, json) = run_cli(
        &["--json", "highlight", "-"],
        Some(r#"{"sysBP": 160, "diaBP": 95, "totChol": 245, "is_smoking": 1, "cigsPerDay": 5}"#),
    );

    assert_eq!(code, 0);
    let levels = &json["data"]["levels"];
    for key in ["sysBP", "diaBP", "totChol", "is_smoking"] {
        assert_eq!(levels[key], "high", "{key}");
    }
    assert_eq!(json["data"]["highest"], "high");
}

#[test]
fn predict_with_seeded_mock_is_repeatable() {
    let input = write_input("predict", HEALTHY);
    let args = [
        "--json",
        "predict",
        input.path(),
        "--gateway",
        "mock",
        "--mock-delay-ms",
        "0",
        "--seed",
        "7",
    ];
    let (code, first) = run_cli(&args, None);
    let (_, second) = run_cli(&args, None);

    assert_eq!(code, 0);
    let probability = first["data"]["result"]["probability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&probability));
    assert_eq!(first["data"]["result"], second["data"]["result"]);
    assert_eq!(first["data"]["report"]["kind"], "success");
}

#[test]
fn unreachable_endpoint_is_a_prediction_failure() {
    let input = write_input("unreachable", HEALTHY);
    let (code, json) = run_cli(
        &[
            "--json",
            "predict",
            input.path(),
            "--gateway",
            "http",
            "--endpoint",
            "http://127.0.0.1:9/predict",
            "--timeout-secs",
            "2",
        ],
        None,
    );

    assert_eq!(code, 4);
    assert_eq!(json["error"]["type"], "PredictionError");
}

#[test]
fn bmi_and_bad_arguments() {
    let (code, json) = run_cli(&["--json", "bmi", "--height-cm", "175", "--weight-kg", "70"], None);
    assert_eq!(code, 0);
    assert_eq!(json["data"]["bmi"], 22.86);

    let (code, _) = run_cli(&["--json", "bmi", "--height-cm", "0", "--weight-kg", "70"], None);
    assert_eq!(code, 3);

    let (code, json) = run_cli(&["--json", "diagnose"], None);
    assert_eq!(code, 3);
    assert_eq!(json["error"]["type"], "InvalidCommand");

    let (code, _) = run_cli(&["validate", "/nonexistent/chd_input.json"], None);
    assert_eq!(code, 2);
}
