use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ifaces_core::record::PROMOTED_KEYS;
use ifaces_core::{Family, InterfaceRecord, LifecycleState, Method};
use serde::Deserialize;
use thiserror::Error;

/// Optional `[settings]` table of a desired-state file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Interfaces file to manage.
    pub target: Option<PathBuf>,
    /// Suffix appended to `target` for the pre-write backup.
    pub backup_suffix: Option<String>,
}

/// Parsed desired-state file.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredState {
    pub settings: Settings,
    pub interfaces: Vec<InterfaceRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DesiredFile {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    interface: Vec<DesiredInterface>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DesiredInterface {
    name: String,
    #[serde(default)]
    ensure: LifecycleState,
    family: Option<Family>,
    method: Option<Method>,
    ipaddress: Option<String>,
    netmask: Option<String>,
    onboot: Option<bool>,
    #[serde(default)]
    options: BTreeMap<String, OptionValue>,
}

/// Option values are opaque strings on disk; TOML lets users write flags and
/// numbers without quoting them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OptionValue {
    Flag(bool),
    Integer(i64),
    Text(String),
}

impl OptionValue {
    fn into_string(self) -> String {
        match self {
            OptionValue::Flag(flag) => flag.to_string(),
            OptionValue::Integer(number) => number.to_string(),
            OptionValue::Text(text) => text,
        }
    }
}

/// Errors returned when loading desired-state files.
#[derive(Debug, Error)]
pub enum DesiredLoadError {
    #[error("failed to read desired state {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse desired state {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid desired state {path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// Load a desired-state TOML file.
pub fn load_desired(path: &Path) -> Result<DesiredState, DesiredLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| DesiredLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_desired(&raw, path.display().to_string())
}

/// Parse desired-state TOML text. `path` is only used in error messages.
pub fn parse_desired(raw: &str, path: String) -> Result<DesiredState, DesiredLoadError> {
    let parsed: DesiredFile = toml::from_str(raw).map_err(|source| DesiredLoadError::Parse {
        path: path.clone(),
        source,
    })?;

    let mut interfaces = Vec::with_capacity(parsed.interface.len());
    for entry in parsed.interface {
        if let Some(key) = PROMOTED_KEYS
            .iter()
            .find(|key| entry.options.contains_key(**key))
        {
            return Err(DesiredLoadError::Invalid {
                path,
                reason: format!(
                    "interface '{}' sets '{key}' as an option; use the dedicated field instead",
                    entry.name
                ),
            });
        }
        interfaces.push(entry.into_record());
    }

    Ok(DesiredState {
        settings: parsed.settings,
        interfaces,
    })
}

impl DesiredInterface {
    fn into_record(self) -> InterfaceRecord {
        InterfaceRecord {
            family: self.family,
            method: self.method,
            ipaddress: self.ipaddress,
            netmask: self.netmask,
            onboot: self.onboot,
            options: self
                .options
                .into_iter()
                .map(|(key, value)| (key, value.into_string()))
                .collect(),
            state: self.ensure,
            ..InterfaceRecord::new(self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{load_desired, parse_desired, DesiredLoadError};
    use ifaces_core::{Family, LifecycleState, Method};
    use std::fs;

    #[test]
    fn loads_interfaces_and_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("desired.toml");
        fs::write(
            &path,
            r#"
[settings]
target = "/tmp/interfaces"

[[interface]]
name = "eth0"
family = "inet"
method = "static"
ipaddress = "10.0.0.2"

[interface.options]
allow-hotplug = true
mtu = 9000
gateway = "10.0.0.1"

[[interface]]
name = "eth1"
ensure = "absent"
"#,
        )
        .expect("write desired");

        let desired = load_desired(&path).expect("desired state should parse");
        assert_eq!(
            desired.settings.target.as_deref(),
            Some(std::path::Path::new("/tmp/interfaces"))
        );
        assert_eq!(desired.interfaces.len(), 2);

        let eth0 = &desired.interfaces[0];
        assert_eq!(eth0.family, Some(Family::Inet));
        assert_eq!(eth0.method, Some(Method::Static));
        assert_eq!(eth0.options["allow-hotplug"], "true");
        assert_eq!(eth0.options["mtu"], "9000");
        assert_eq!(eth0.options["gateway"], "10.0.0.1");
        assert_eq!(eth0.state, LifecycleState::Present);

        assert_eq!(desired.interfaces[1].state, LifecycleState::Absent);
    }

    #[test]
    fn rejects_promoted_keys_in_options() {
        let err = parse_desired(
            r#"
[[interface]]
name = "eth0"
[interface.options]
address = "10.0.0.1"
"#,
            "inline".to_string(),
        )
        .expect_err("should reject");
        assert!(matches!(err, DesiredLoadError::Invalid { .. }));
    }

    #[test]
    fn returns_parse_error_for_unknown_fields() {
        let err = parse_desired(
            "[[interface]]\nname = \"eth0\"\nmtu = 1500\n",
            "inline".to_string(),
        )
        .expect_err("should fail");
        match err {
            DesiredLoadError::Parse { .. } => {}
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn returns_io_error_for_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_desired(&dir.path().join("missing.toml")).expect_err("should fail");
        assert!(matches!(err, DesiredLoadError::Io { .. }));
    }
}
