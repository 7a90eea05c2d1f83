use std::path::PathBuf;

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

const KEA_SERVER_DOC: &str = r#"{
"Dhcp6": {
    "control-socket": { "socket-type": "unix", "socket-name": "/tmp/kea.sock" },
    "interfaces-config": { "interfaces": [ "eth0" ] },
    "renew-timer": 1000,
    "rebind-timer": 2000,
    "preferred-lifetime": 3000,
    "valid-lifetime": 4000,
    "subnet6": [
        {
            "subnet": "2001:db8::/32",
            "pools": [
                { "pool": "2001:db8::10-2001:db8::20" }
            ]
        }
    ]
}
}
"#;

#[test]
fn get_config_prints_translated_document() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kea-yang-plugin"));
    let output = cmd
        .arg("get-config")
        .arg(fixture("fixtures/kea-server.xml"))
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout, KEA_SERVER_DOC);
    serde_json::from_str::<serde_json::Value>(&stdout).expect("valid JSON");
}

#[test]
fn get_config_pretty_reindents() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kea-yang-plugin"));
    let output = cmd
        .arg("get-config")
        .arg(fixture("fixtures/kea-server.xml"))
        .arg("--pretty")
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("  \"Dhcp6\": {"));
    let doc: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(doc["Dhcp6"]["subnet6"][0]["pools"][0]["pool"], "2001:db8::10-2001:db8::20");
}

#[test]
fn get_config_without_subnets_ends_at_valid_lifetime() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kea-yang-plugin"));
    let output = cmd
        .arg("get-config")
        .arg(fixture("fixtures/kea-no-subnets.xml"))
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("    \"valid-lifetime\": 4000\n}\n}\n"));
    assert!(!stdout.contains("subnet6"));
    let doc: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(doc["Dhcp6"]["control-socket"]["socket-type"], "unix");
}

#[test]
fn get_config_reads_root_from_multi_module_snapshot() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kea-yang-plugin"));
    let output = cmd
        .arg("get-config")
        .arg(fixture("fixtures/kea-multi.xml"))
        .output()
        .expect("run");

    assert!(output.status.success());
    let doc: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(doc["Dhcp6"]["subnet6"].as_array().map(Vec::len), Some(3));
}

#[test]
fn get_config_fails_without_model_data() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kea-yang-plugin"));
    cmd.arg("get-config")
        .arg(fixture("fixtures/empty-datastore.xml"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no configuration found below"));
}

#[test]
fn get_config_honours_model_root_override() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kea-yang-plugin"));
    cmd.arg("get-config")
        .arg(fixture("fixtures/kea-server.xml"))
        .arg("--model-root")
        .arg("/other-module:server")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/other-module:server"));
}

#[test]
fn get_config_rejects_relative_model_root() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kea-yang-plugin"));
    cmd.arg("get-config")
        .arg(fixture("fixtures/kea-server.xml"))
        .arg("--model-root")
        .arg("server")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be an absolute path"));
}

#[test]
fn get_config_reads_model_root_from_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("plugin.toml");
    std::fs::write(&config, "model_root = \"/ietf-interfaces:interfaces\"\n").expect("config");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kea-yang-plugin"));
    cmd.arg("get-config")
        .arg(fixture("fixtures/kea-server.xml"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("/ietf-interfaces:interfaces"));
}

#[test]
fn get_config_reports_missing_snapshot() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kea-yang-plugin"));
    cmd.arg("get-config")
        .arg(fixture("fixtures/does-not-exist.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load snapshot"));
}
