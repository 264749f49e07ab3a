#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the teco-server binary
//!
//! These tests run the compiled binary and check help output, configuration
//! validation, and the configuration dumps. None of them start a container.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn run_teco_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_teco-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute teco-server")
}

async fn run_teco_server_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_teco-server"));
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn()?;

    match timeout(timeout_duration, child.wait_with_output()).await {
        Ok(result) => result.map_err(Into::into),
        Err(_elapsed) => Err("elapsed".into()),
    }
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("teco.yaml");
    std::fs::write(&path, content).expect("Failed to write config file");
    path
}

#[test]
fn test_cli_help_command() {
    let output = run_teco_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("teco-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--port"), "Should mention port option");
}

#[test]
fn test_cli_version_command() {
    let output = run_teco_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("teco-server"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_teco_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the invalid command: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_teco_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail when config file doesn't exist");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "invalid: yaml: content: [unclosed");

    let output = run_teco_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parse"), "Should mention parsing issue: {stderr}");
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("logs").join("teco.log");
    let config_path = write_config(
        &temp_dir,
        &format!(
            r#"
server:
  bind_addr: "127.0.0.1:18888"

logging:
  level: warn
  format: json
  file: "{}"

modules:
  environment_provider:
    config:
      name: ci
      mysql:
        password: s3cret
        startup_timeout_secs: 120
"#,
            log_file.to_string_lossy().replace('\\', "/")
        ),
    );

    let output = run_teco_server(&["--config", config_path.to_str().unwrap(), "check"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
        eprintln!("STDOUT: {}", String::from_utf8_lossy(&output.stdout));
    }
    assert!(output.status.success(), "Should succeed with valid config");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("127.0.0.1:18888"));
}

#[test]
fn test_cli_check_rejects_invalid_module_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        r#"
modules:
  environment_provider:
    config:
      postgres:
        image: postgres
"#,
    );

    let output = run_teco_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("environment_provider"),
        "Should name the offending module: {stderr}"
    );
}

#[test]
fn test_cli_check_rejects_invalid_bind_address() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "server:\n  bind_addr: not-an-address\n");

    let output = run_teco_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid bind address");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("address"), "Should mention the address: {stderr}");
}

#[test]
fn test_cli_print_config_applies_overrides() {
    let output = run_teco_server(&["--port", "17777", "-vv", "--print-config"]);

    assert!(output.status.success(), "Print config should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: std::collections::HashMap<String, serde_json::Value> =
        serde_saphyr::from_str(&stdout).expect("Output should be valid YAML");

    assert_eq!(parsed["server"]["bind_addr"], "127.0.0.1:17777");
    assert_eq!(parsed["logging"]["level"], "debug");
}

#[test]
fn test_cli_dump_modules_config_json_redacts_password() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        r#"
modules:
  environment_provider:
    config:
      mysql:
        password: testpass
"#,
    );

    let output = run_teco_server(&[
        "--config",
        config_path.to_str().unwrap(),
        "--dump-modules-config-json",
    ]);

    assert!(output.status.success(), "Dump JSON command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    let config = &parsed["environment_provider"]["config"];

    assert_eq!(config["name"], "testcontainers");
    assert_eq!(config["mysql"]["password"], "***REDACTED***");
    assert_eq!(config["kafka"]["image"], "confluentinc/cp-kafka");
    assert!(!stdout.contains("testpass"), "Password should not appear in output");
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_teco_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Start the server"));

    let output = run_teco_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Validate configuration"));
}

#[tokio::test]
async fn test_cli_run_keeps_serving_until_stopped() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "server:\n  bind_addr: \"127.0.0.1:0\"\n");

    match run_teco_server_with_timeout(
        &["--config", config_path.to_str().unwrap(), "run"],
        Duration::from_secs(2),
    )
    .await
    {
        Err(e) if e.to_string().contains("elapsed") => {
            // still serving: the server started and is waiting for a signal
        }
        Ok(output) => panic!(
            "Server exited early: {}",
            String::from_utf8_lossy(&output.stderr)
        ),
        Err(other) => panic!("Unexpected failure: {other}"),
    }
}
