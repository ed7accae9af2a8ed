//! CLI Integration Tests
//!
//! These tests run the binary for commands that need no network access.
//!
//! ```
//! cargo test --package intelliclima-cli --test cli_integration
//! ```

use std::path::Path;
use std::process::{Command, Output};

/// Run intelliclima with an isolated data directory and no credentials.
fn run_intelliclima(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_intelliclima"))
        .args(args)
        .env("INTELLICLIMA_DATA_DIR", data_dir)
        .env("NO_COLOR", "1")
        .env_remove("LOGIN")
        .env_remove("PASSWORD")
        .env_remove("RUST_LOG")
        .current_dir(data_dir)
        .output()
        .expect("Failed to run intelliclima binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["--help"]);

    assert!(output.status.success(), "Help should succeed");
    let stdout = stdout(&output);
    for command in ["login", "houses", "sync", "devices", "send", "frame", "crc"] {
        assert!(stdout.contains(command), "Help should list {command}");
    }
}

#[test]
fn test_version_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("intelliclima"));
}

// =============================================================================
// Offline Commands
// =============================================================================

#[test]
fn test_frame_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["frame", "31377ABC", "speed1"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0A31377ABC000E2F005000000402E70D");
}

#[test]
fn test_frame_command_accepts_codes() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["frame", "deadbeef", "code:3"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0ADEADBEEF000E2F005000000403EA0D");
}

#[test]
fn test_frame_command_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["frame", "31377ABC", "auto", "--format", "json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["frame"], "0A31377ABC000E2F005000000410C60D");
    assert_eq!(json["speed"], "auto");
    assert_eq!(json["code"], 16);
    assert_eq!(json["checksum"], "C6");
}

#[test]
fn test_frame_command_digit_is_level_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["frame", "31377ABC", "1"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0A31377ABC000E2F005000000402E70D");
}

#[test]
fn test_frame_command_rejects_bad_serial() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["frame", "31377", "auto"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("31377"));
}

#[test]
fn test_frame_command_rejects_bad_speed() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["frame", "31377ABC", "7"]);

    assert!(!output.status.success());
}

#[test]
fn test_crc_command() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_intelliclima(dir.path(), &["crc", "31377ABC000E2F005000000402"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "E7");

    let output = run_intelliclima(dir.path(), &["crc", "00"]);
    assert_eq!(stdout(&output).trim(), "AC");
}

#[test]
fn test_crc_command_rejects_odd_length() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["crc", "ABC"]);

    assert!(!output.status.success());
}

// =============================================================================
// Registry Commands
// =============================================================================

#[test]
fn test_devices_with_empty_registry() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["devices"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("No devices cached"));
}

#[test]
fn test_devices_lists_registry() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("houses.json"),
        r#"[{"id": 1201, "name": "Casa Mare", "devices": [
            {"id": 31377, "is_master": true, "type": "ECO", "house_id": 1201,
             "serial": "31377ABC", "name": "Sala"}
        ]}]"#,
    )
    .unwrap();

    let output = run_intelliclima(dir.path(), &["devices"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Casa Mare"));
    assert!(text.contains("31377ABC"));

    let output = run_intelliclima(dir.path(), &["devices", "--format", "json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["devices"][0]["serial"], "31377ABC");
}

#[test]
fn test_send_without_devices_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["send", "auto"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No devices to command"));
}

#[test]
fn test_send_reports_corrupt_registry() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("houses.json"), "{broken").unwrap();

    let output = run_intelliclima(dir.path(), &["send", "auto"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read device registry"));
    assert!(!stderr.contains("No devices to command"));
    // The broken file is left for the user to inspect
    assert_eq!(
        std::fs::read_to_string(dir.path().join("houses.json")).unwrap(),
        "{broken"
    );
}

#[test]
fn test_login_without_credentials_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_intelliclima(dir.path(), &["login"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("LOGIN"));
}
