use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const POLICY: &str = r#"
{
  "root": {
    "name": "restrict",
    "children": [
      { "name": "commands", "children": [ { "name": "command", "text": "read" } ] },
      { "name": "allow", "children": [
          { "name": "mbean", "children": [
              { "name": "name", "text": "java.lang:type=Memory" },
              { "name": "operation", "text": "gc" }
          ] }
      ] },
      { "name": "remote", "children": [ { "name": "host", "text": "10.0.0.0/8" } ] }
    ]
  }
}
"#;

fn jmxgate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jmxgate"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run jmxgate")
}

fn write_policy(dir: &Path, content: &str) -> String {
    let path = dir.join("policy.json");
    fs::write(&path, content).expect("write policy");
    path.to_str().expect("utf-8 path").to_string()
}

#[test]
fn validate_prints_summary() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let policy = write_policy(dir.path(), POLICY);

    let out = jmxgate(&["validate", &policy]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("is valid"));
    assert!(stdout.contains("read"));
    assert!(stdout.contains("10.0.0.0/8"));
}

#[test]
fn validate_rejects_malformed_policy() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let policy = write_policy(
        dir.path(),
        r#"{ "root": { "name": "restrict", "children": [
            { "name": "http", "children": [ { "name": "method", "text": "put" } ] }
        ] } }"#,
    );

    let out = jmxgate(&["validate", &policy]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid policy"));
}

#[test]
fn check_reports_decisions_through_exit_status() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let policy = write_policy(dir.path(), POLICY);

    let out = jmxgate(&["check", &policy, "exec", "java.lang:type=Memory", "gc"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("allowed"));

    let out = jmxgate(&["check", &policy, "exec", "java.lang:type=Memory", "dump"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stdout).contains("denied"));

    let out = jmxgate(&["check", &policy, "remote", "unknown.host", "10.1.2.3"]);
    assert_eq!(out.status.code(), Some(0));

    let out = jmxgate(&["check", &policy, "type", "write"]);
    assert_eq!(out.status.code(), Some(2));

    let out = jmxgate(&["check", &policy, "type", "bogus"]);
    assert_eq!(out.status.code(), Some(1));
}
