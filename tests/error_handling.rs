// tests/error_handling.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use initdag::config::{load_and_validate, load_from_path};
use initdag::errors::InitDagError;

fn task_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn dag_cycle_returns_structured_error() {
    let file = task_file(
        r#"
[task.A]
cmd = "echo A"
after = ["B"]

[task.B]
cmd = "echo B"
after = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(InitDagError::DagCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("A") || msg.contains("B"));
        }
        Err(e) => panic!("Expected DagCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_dependency_returns_config_error() {
    let file = task_file(
        r#"
[task.A]
cmd = "echo A"
after = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(InitDagError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn self_dependency_is_a_dag_cycle() {
    let file = task_file(
        r#"
[task.A]
cmd = "echo A"
after = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(InitDagError::DagCycle(msg)) => assert!(msg.contains("itself"), "{msg}"),
        other => panic!("Expected DagCycle, got: {:?}", other),
    }
}

#[test]
fn file_without_tasks_is_rejected() {
    let file = task_file(
        r#"
[config]
await_timeout_ms = 100
"#,
    );

    match load_and_validate(file.path()) {
        Err(InitDagError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn zero_workers_is_rejected() {
    let file = task_file(
        r#"
[config]
max_workers = 0

[task.A]
cmd = "echo A"
"#,
    );

    match load_and_validate(file.path()) {
        Err(InitDagError::ConfigError(msg)) => assert!(msg.contains("max_workers")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn unknown_log_level_is_rejected() {
    let file = task_file(
        r#"
[config]
log_level = "loud"

[task.A]
cmd = "echo A"
"#,
    );

    match load_and_validate(file.path()) {
        Err(InitDagError::ConfigError(msg)) => assert!(msg.contains("loud")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn empty_command_is_rejected() {
    let file = task_file(
        r#"
[task.A]
cmd = "   "
"#,
    );

    let result = load_and_validate(file.path());
    assert!(matches!(result, Err(InitDagError::ConfigError(_))), "{result:?}");
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = task_file("[task.A\ncmd = ");

    let result = load_from_path(file.path());
    assert!(matches!(result, Err(InitDagError::TomlError(_))), "{result:?}");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_from_path(dir.path().join("Initdag.toml"));
    assert!(matches!(result, Err(InitDagError::IoError(_))), "{result:?}");
}

#[test]
fn defaults_are_applied() {
    let file = task_file(
        r#"
[task.fetch]
cmd = "echo fetch"
caller_waits = true

[task.migrate]
cmd = "echo migrate"
after = ["fetch"]
on_caller = true
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.config.await_timeout(), Duration::from_secs(10));
    assert_eq!(cfg.config.max_workers, 64);
    assert_eq!(cfg.config.log_level, None);

    let fetch = &cfg.task["fetch"];
    assert!(fetch.caller_waits);
    assert!(!fetch.on_caller);
    assert!(fetch.after.is_empty());

    let migrate = &cfg.task["migrate"];
    assert!(migrate.on_caller);
    assert_eq!(migrate.after, vec!["fetch".to_string()]);
}
