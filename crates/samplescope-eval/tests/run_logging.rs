use samplescope_eval::{EvalError, init_run_logging, init_stderr_logging};
use uuid::Uuid;

#[test]
fn run_logging_writes_json_lines_at_every_level() {
    let dir = std::env::temp_dir().join(format!("samplescope_logs_{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create log dir");
    let path = dir.join("sweep.log");

    init_run_logging(&path).expect("install subscriber");
    tracing::info!(strategy = "UniformSampling", sample_size = 50, "row scored");
    tracing::debug!(group = "A", quota = 3, "group allocated");

    let contents = std::fs::read_to_string(&path).expect("read log");
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    let line = lines[0];
    let event: serde_json::Value = serde_json::from_str(line).expect("json log line");
    assert_eq!(event["level"], "INFO");
    assert_eq!(event["fields"]["message"], "row scored");
    assert_eq!(event["fields"]["sample_size"], 50);
    assert!(event["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));

    let debug: serde_json::Value = serde_json::from_str(lines[1]).expect("json log line");
    assert_eq!(debug["level"], "DEBUG");
    assert_eq!(debug["fields"]["quota"], 3);

    let err = init_stderr_logging().expect_err("global subscriber already set");
    assert!(matches!(err, EvalError::Logging(_)));

    std::fs::remove_dir_all(&dir).expect("cleanup");
}
