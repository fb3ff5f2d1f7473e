use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Option keys the file format promotes to first-class record fields.
pub const PROMOTED_KEYS: [&str; 2] = ["address", "netmask"];

/// Stanza class that marks an interface as started at boot.
pub const ALLOW_AUTO: &str = "allow-auto";
/// Stanza class that marks an interface as started on hotplug events.
pub const ALLOW_HOTPLUG: &str = "allow-hotplug";

/// Address family of an `iface` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Inet,
    Inet6,
}

impl Display for Family {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Family::Inet => write!(f, "inet"),
            Family::Inet6 => write!(f, "inet6"),
        }
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inet" => Ok(Family::Inet),
            "inet6" => Ok(Family::Inet6),
            other => Err(format!("unknown address family '{other}'")),
        }
    }
}

/// Configuration method of an `iface` block.
///
/// The well-known methods get their own variants; anything else the format
/// allows (`ppp`, `bootp`, `auto`, ...) is kept verbatim in [`Method::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Method {
    Static,
    Manual,
    Dhcp,
    Loopback,
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Static => "static",
            Method::Manual => "manual",
            Method::Dhcp => "dhcp",
            Method::Loopback => "loopback",
            Method::Other(raw) => raw,
        }
    }
}

impl From<&str> for Method {
    fn from(raw: &str) -> Self {
        match raw {
            "static" => Method::Static,
            "manual" => Method::Manual,
            "dhcp" => Method::Dhcp,
            "loopback" => Method::Loopback,
            other => Method::Other(other.to_string()),
        }
    }
}

impl From<String> for Method {
    fn from(raw: String) -> Self {
        Method::from(raw.as_str())
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired lifecycle of a record. Parsed records are always `Present`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Present,
    Absent,
}

/// Structured configuration of one named network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    /// Interface name, unique within one file.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<Family>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipaddress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    /// `Some(true)` when listed on an `auto`/`allow-auto` line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboot: Option<bool>,
    /// In-block option lines plus synthetic `allow-<class>` stanza markers.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default, rename = "ensure")]
    pub state: LifecycleState,
}

impl InterfaceRecord {
    /// Create an empty, present record for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: None,
            method: None,
            ipaddress: None,
            netmask: None,
            onboot: None,
            options: BTreeMap::new(),
            state: LifecycleState::Present,
        }
    }

    /// Whether the record is listed on the `auto` line.
    pub fn is_onboot(&self) -> bool {
        self.onboot == Some(true)
    }

    /// Whether the record carries a truthy stanza marker under `class`.
    pub fn has_marker(&self, class: &str) -> bool {
        self.options.get(class).is_some_and(|value| is_truthy(value))
    }

    /// Set a synthetic stanza marker such as `allow-hotplug`.
    pub fn set_marker(&mut self, class: &str) {
        self.options.insert(class.to_string(), "true".to_string());
    }

    /// Fold an `allow-auto` marker into `onboot`.
    ///
    /// The parser reads `allow-auto` lines as `onboot`, so a record still
    /// carrying the marker would never compare equal to what is on disk.
    pub fn with_boot_marker_folded(mut self) -> Self {
        if let Some(value) = self.options.remove(ALLOW_AUTO) {
            if is_truthy(&value) {
                self.onboot = Some(true);
            }
        }
        self
    }

    /// Whether an `iface` block has been declared for this record.
    pub fn has_block(&self) -> bool {
        self.family.is_some()
    }

    /// Options that are rendered inside the `iface` block.
    ///
    /// Stanza markers are rendered as their own top-level lines instead.
    pub fn block_options(&self) -> impl Iterator<Item = (&String, &String)> {
        self.options
            .iter()
            .filter(|(key, _)| !is_stanza_marker(key))
    }
}

/// Whether an option key names an `allow-<class>` stanza marker.
pub fn is_stanza_marker(key: &str) -> bool {
    key.starts_with("allow-")
}

/// Interpret an option value as a boolean flag.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}
