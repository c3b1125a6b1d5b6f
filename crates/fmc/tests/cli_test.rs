//! Integration tests for the `fmc` CLI binary.
//!
//! Argument parsing, help output, config handling and error exit codes run
//! without a server; the lifecycle commands run against a mocked FMC.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GLOBAL_UUID: &str = "e276abec-e0f2-11e3-8169-6d9ed49b625f";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `fmc` binary with env isolation.
///
/// Clears all `FMC_*` env vars and points the config file at a path that
/// does not exist so tests never touch the user's real configuration.
fn fmc_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fmc");
    cmd.env("HOME", "/tmp/fmc-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/fmc-cli-test-nonexistent")
        .env("FMC_CONFIG", "/tmp/fmc-cli-test-nonexistent/config.toml")
        .env("NO_COLOR", "1")
        .env_remove("FMC_PROFILE")
        .env_remove("FMC_URL")
        .env_remove("FMC_USERNAME")
        .env_remove("FMC_PASSWORD")
        .env_remove("FMC_DOMAIN")
        .env_remove("FMC_OUTPUT")
        .env_remove("FMC_INSECURE")
        .env_remove("FMC_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `fmc_cmd` already pointed at a mocked FMC.
fn fmc_at(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = fmc_cmd();
    cmd.args(["--url", &server.uri(), "--username", "api-user", "--password", "s3cret"]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_fmc(version: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/fmc_platform/v1/auth/generatetoken"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("x-auth-access-token", "token-1")
                .insert_header("x-auth-refresh-token", "refresh-1")
                .insert_header("domain_uuid", GLOBAL_UUID),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/fmc_platform/v1/info/serverversion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "serverVersion": version }]
        })))
        .mount(&server)
        .await;

    server
}

fn zones_path(rest: &str) -> String {
    format!("/api/fmc_config/v1/domain/{GLOBAL_UUID}/object/securityzones{rest}")
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = fmc_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    fmc_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Cisco FMC")
            .and(predicate::str::contains("apply"))
            .and(predicate::str::contains("refresh"))
            .and(predicate::str::contains("resolve")),
    );
}

#[test]
fn test_version_flag() {
    fmc_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("fmc "));
}

#[test]
fn test_completions_bash() {
    fmc_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fmc"));
}

#[test]
fn test_invalid_kind_is_usage_error() {
    let output = fmc_cmd().args(["show", "network-group", "--id", "x"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("access-rule"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fmc.toml");
    fmc_cmd()
        .env("FMC_CONFIG", &path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fmc.toml"));
}

#[test]
fn test_config_show_masks_passwords() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "default_profile = \"lab\"\n\n[profiles.lab]\nurl = \"https://fmc.lab\"\nusername = \"api\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    fmc_cmd()
        .env("FMC_CONFIG", &path)
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://fmc.lab").and(predicate::str::contains("hunter2").not()));
}

#[test]
fn test_missing_config_is_reported() {
    let output = fmc_cmd()
        .args(["show", "security-zone", "--name", "outside"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Configuration file not found"));
}

#[test]
fn test_unknown_profile_is_reported() {
    let output = fmc_cmd()
        .args(["--profile", "nowhere", "version"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Profile 'nowhere' not found"));
}

// ── Against a mocked FMC ────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_version_lists_capabilities() {
    let server = mock_fmc("7.2.5 (build 208)").await;

    fmc_at(&server)
        .args(["version", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("7.2.5 (build 208)")
                .and(predicate::str::contains("CertificateMap"))
                .and(predicate::str::contains("BulkHostDelete")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_by_id() {
    let server = mock_fmc("7.4.1 (build 172)").await;
    Mock::given(method("GET"))
        .and(path(zones_path("/z-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "z-1", "type": "SecurityZone", "name": "outside", "interfaceMode": "ROUTED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = fmc_at(&server)
        .args(["show", "security-zone", "--id", "z-1", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["name"], "outside");
    assert_eq!(shown["interface_type"], "ROUTED");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_prints_id() {
    let server = mock_fmc("7.4.1 (build 172)").await;
    Mock::given(method("GET"))
        .and(path(zones_path("")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "z-1", "type": "SecurityZone", "name": "inside" },
                { "id": "z-2", "type": "SecurityZone", "name": "outside" }
            ],
            "paging": { "offset": 0, "limit": 1000, "count": 2, "pages": 1 }
        })))
        .mount(&server)
        .await;

    fmc_at(&server)
        .args(["resolve", "security-zone", "--name", "outside"])
        .assert()
        .success()
        .stdout(predicate::str::diff("z-2\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_missing_name_exits_not_found() {
    let server = mock_fmc("7.4.1 (build 172)").await;
    Mock::given(method("GET"))
        .and(path(zones_path("")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "z-1", "type": "SecurityZone", "name": "Outside" }],
            "paging": { "offset": 0, "limit": 1000, "count": 1, "pages": 1 }
        })))
        .mount(&server)
        .await;

    let output = fmc_at(&server)
        .args(["resolve", "security-zone", "--name", "outside"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Failed to find fmc_security_zone with name 'outside'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gated_resource_exits_unsupported() {
    let server = mock_fmc("7.0.1 (build 84)").await;

    let output = fmc_at(&server)
        .args(["show", "certificate-map", "--id", "cm-1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
    assert!(combined_output(&output).contains("UnsupportedVersion"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_then_refresh_writes_state() {
    let server = mock_fmc("7.4.1 (build 172)").await;
    Mock::given(method("POST"))
        .and(path(zones_path("")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "z-9", "type": "SecurityZone", "name": "dmz", "interfaceMode": "ROUTED"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(zones_path("/z-9")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "z-9", "type": "SecurityZone", "name": "dmz", "interfaceMode": "SWITCHED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let desired = dir.path().join("dmz.yaml");
    let state = dir.path().join("dmz.state.json");
    std::fs::write(&desired, "name: dmz\ninterface_type: ROUTED\n").unwrap();

    let output = fmc_at(&server)
        .arg("apply")
        .arg("security-zone")
        .arg("-f")
        .arg(&desired)
        .arg("-s")
        .arg(&state)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(read_json(&state)["id"], "z-9");

    let output = fmc_at(&server)
        .arg("refresh")
        .arg("security-zone")
        .arg("-s")
        .arg(&state)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(read_json(&state)["interface_type"], "SWITCHED");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hosts_have_no_name_lookup() {
    let server = mock_fmc("7.4.1 (build 172)").await;

    let output = fmc_at(&server)
        .args(["resolve", "hosts", "--name", "web-1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_needs_id_or_name() {
    let server = mock_fmc("7.4.1 (build 172)").await;

    let output = fmc_at(&server).args(["show", "security-zone"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("exactly one of id or name"));
}
