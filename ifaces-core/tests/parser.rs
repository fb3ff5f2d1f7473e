use std::collections::BTreeMap;
use std::path::PathBuf;

use ifaces_core::{parse, parse_file, Family, InterfaceRecord, Method, ParseError};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_loopback_and_hotplug_dhcp() {
    let records = parse_file(&fixture("fixtures/basic.interfaces")).expect("parse should succeed");
    assert_eq!(records.len(), 2);

    let lo = &records["lo"];
    assert_eq!(lo.family, Some(Family::Inet));
    assert_eq!(lo.method, Some(Method::Loopback));
    assert_eq!(lo.onboot, Some(true));
    assert!(lo.options.is_empty());

    let eth0 = &records["eth0"];
    assert_eq!(eth0.family, Some(Family::Inet));
    assert_eq!(eth0.method, Some(Method::Dhcp));
    assert_eq!(eth0.onboot, None);
    assert_eq!(
        eth0.options,
        BTreeMap::from([("allow-hotplug".to_string(), "true".to_string())])
    );
}

#[test]
fn promotes_address_and_netmask_out_of_options() {
    let records = parse_file(&fixture("fixtures/static.interfaces")).expect("parse should succeed");

    let eth0 = &records["eth0"];
    assert_eq!(eth0.ipaddress.as_deref(), Some("192.168.1.10"));
    assert_eq!(eth0.netmask.as_deref(), Some("255.255.255.0"));
    assert!(!eth0.options.contains_key("address"));
    assert!(!eth0.options.contains_key("netmask"));
    assert_eq!(eth0.options.get("gateway").map(String::as_str), Some("192.168.1.1"));
    assert_eq!(
        eth0.options.get("dns-nameservers").map(String::as_str),
        Some("192.168.1.1 1.1.1.1")
    );

    let eth1 = &records["eth1"];
    assert_eq!(eth1.family, Some(Family::Inet6));
    assert_eq!(eth1.method, Some(Method::Other("auto".to_string())));
    assert_eq!(eth1.onboot, Some(true));

    let br0 = &records["br0"];
    assert!(br0.has_marker("allow-ovs"));
}

#[test]
fn auto_line_before_iface_block_is_completed_later() {
    let records = parse("auto eth0\n\niface eth0 inet static\n  address 10.0.0.1\n")
        .expect("parse should succeed");
    let expected = InterfaceRecord {
        family: Some(Family::Inet),
        method: Some(Method::Static),
        ipaddress: Some("10.0.0.1".to_string()),
        onboot: Some(true),
        ..InterfaceRecord::new("eth0")
    };
    assert_eq!(records["eth0"], expected);
}

#[test]
fn auto_only_reference_has_no_block() {
    let records = parse("auto eth3\n").expect("parse should succeed");
    let eth3 = &records["eth3"];
    assert!(eth3.is_onboot());
    assert!(eth3.family.is_none());
    assert!(eth3.method.is_none());
}

#[test]
fn blank_lines_do_not_close_an_interface_block() {
    let records = parse("iface eth0 inet manual\n\n# comment\n  mtu 9000\n")
        .expect("parse should succeed");
    assert_eq!(records["eth0"].options.get("mtu").map(String::as_str), Some("9000"));
}

#[test]
fn duplicate_iface_block_is_malformed() {
    let err = parse_file(&fixture("fixtures/duplicate.interfaces")).expect_err("should fail");
    assert!(matches!(err, ParseError::Malformed { line: 5, .. }), "{err}");

    let err = parse("iface eth0 inet static\niface eth0 inet static\n").expect_err("should fail");
    assert!(matches!(err, ParseError::Malformed { line: 2, .. }), "{err}");
}

#[test]
fn option_before_any_stanza_is_malformed() {
    let err = parse("address 192.168.1.1\niface eth0 inet static\n").expect_err("should fail");
    assert!(matches!(err, ParseError::Malformed { line: 1, .. }), "{err}");
}

#[test]
fn mapping_stanza_is_unimplemented_not_malformed() {
    let err = parse_file(&fixture("fixtures/mapping.interfaces")).expect_err("should fail");
    match err {
        ParseError::Unimplemented { line, stanza } => {
            assert_eq!(line, 1);
            assert_eq!(stanza, "mapping");
        }
        other => panic!("unexpected error variant: {other}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_file(&fixture("fixtures/does-not-exist")).expect_err("should fail");
    assert!(matches!(err, ParseError::Io(_)));
}

#[test]
fn allow_auto_listing_marks_every_name_onboot() {
    let records = parse(
        "allow-auto eth0 eth1\nallow-hotplug eth1\niface eth0 inet dhcp\niface eth1 inet dhcp\n",
    )
    .expect("parse should succeed");

    for name in ["eth0", "eth1"] {
        assert_eq!(records[name].onboot, Some(true), "{name}");
        assert!(!records[name].options.contains_key("allow-auto"), "{name}");
    }
    assert!(records["eth1"].has_marker("allow-hotplug"));
    assert!(!records["eth0"].has_marker("allow-hotplug"));
}
