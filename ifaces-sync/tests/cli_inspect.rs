use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn inspect_lists_discovered_interfaces() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"));
    cmd.arg("inspect")
        .arg(fixture("fixtures/basic.interfaces"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "eth0 family=inet method=dhcp onboot=false",
        ))
        .stdout(predicate::str::contains("  allow-hotplug true"))
        .stdout(predicate::str::contains(
            "lo family=inet method=loopback onboot=true",
        ));
}

#[test]
fn inspect_json_emits_records_by_name() {
    let output = Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"))
        .arg("inspect")
        .arg(fixture("fixtures/basic.interfaces"))
        .arg("--format")
        .arg("json")
        .output()
        .expect("command output");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["lo"]["method"], "loopback");
    assert_eq!(json["lo"]["onboot"], true);
    assert_eq!(json["eth0"]["options"]["allow-hotplug"], "true");
    assert_eq!(json["eth0"]["ensure"], "present");
}

#[test]
fn inspect_reports_malformed_file() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"));
    cmd.arg("inspect")
        .arg(fixture("fixtures/duplicate.interfaces"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate iface block for 'eth0'"));
}
