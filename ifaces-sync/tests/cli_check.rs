use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use ifaces_core::parse;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

#[test]
fn check_accepts_well_formed_file() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"));
    cmd.arg("check")
        .arg(fixture("fixtures/static.interfaces"))
        .assert()
        .success()
        .stdout(predicate::str::contains("(4 interfaces)"));
}

#[test]
fn check_rejects_orphan_option() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("interfaces");
    fs::write(&input, "address 192.168.1.1\niface eth0 inet static\n").expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"));
    cmd.arg("check")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("option line outside of any stanza"));
}

#[test]
fn check_reports_mapping_as_unimplemented() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"));
    cmd.arg("check")
        .arg(fixture("fixtures/mapping.interfaces"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("'mapping' stanza at line 1 is not implemented"));
}

#[test]
fn check_rejects_boot_reference_without_block() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("interfaces");
    fs::write(&input, "auto eth3\n").expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"));
    cmd.arg("check")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("interface 'eth3' does not have a family"));
}

#[test]
fn format_prints_normalized_text() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"));
    cmd.arg("format")
        .arg(fixture("fixtures/basic.interfaces"))
        .assert()
        .success()
        .stdout(predicate::str::contains("# HEADER: Managed interfaces(5) file, regenerated from declared state."))
        .stdout(predicate::str::contains(
            "auto lo\n\nallow-hotplug eth0\n\niface eth0 inet dhcp\n\niface lo inet loopback\n",
        ));
}

#[test]
fn format_output_round_trips() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("interfaces.normalized");
    let source = fixture("fixtures/static.interfaces");

    Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"))
        .arg("format")
        .arg(&source)
        .arg("--output")
        .arg(path_as_str(&output))
        .assert()
        .success();

    let original = parse(&fs::read_to_string(&source).expect("source")).expect("parse source");
    let normalized = parse(&fs::read_to_string(&output).expect("output")).expect("parse output");
    assert_eq!(original, normalized);
}

#[test]
fn format_refuses_to_overwrite_input() {
    let input = fixture("fixtures/basic.interfaces");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ifaces-sync"));
    cmd.arg("format")
        .arg(&input)
        .arg("--output")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite source file"));
}
