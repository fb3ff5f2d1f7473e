use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::record::{
    is_stanza_marker, InterfaceRecord, LifecycleState, ALLOW_AUTO, ALLOW_HOTPLUG,
    PROMOTED_KEYS,
};

/// Prefix of every generated header line. Header lines are comments and are
/// never parsed back.
pub const HEADER_PREFIX: &str = "# HEADER:";

/// Keywords that start a stanza; an option line using one as its key would
/// be read back as a new stanza.
const STANZA_KEYWORDS: [&str; 3] = ["iface", "auto", "mapping"];

/// Errors that can occur while rendering records into interfaces text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// An `iface` header cannot be written without an address family.
    #[error("interface '{0}' does not have a family")]
    MissingFamily(String),
    /// An `iface` header cannot be written without a method.
    #[error("interface '{0}' does not have a method")]
    MissingMethod(String),
    /// Two records share a name; the output would contain duplicate blocks.
    #[error("interface '{0}' appears more than once")]
    DuplicateName(String),
    /// `address`/`netmask` stored as a plain option would shadow the field.
    #[error("interface '{name}' sets '{key}' as an option; use the dedicated field instead")]
    PromotedOption { name: String, key: String },
    /// A name, method or key that would not parse back as a single token.
    #[error("interface '{name}' has an unusable {field} '{token}'")]
    InvalidToken {
        name: String,
        field: &'static str,
        token: String,
    },
    /// An option value that would be lost or altered when read back.
    #[error("interface '{name}' has an unusable value for '{key}': {reason}")]
    InvalidValue {
        name: String,
        key: String,
        reason: &'static str,
    },
}

/// Render records into interfaces file text stamped with the current time.
///
/// Records whose state is [`LifecycleState::Absent`] are left out.
pub fn format(records: &[InterfaceRecord]) -> Result<String, FormatError> {
    format_at(records, Utc::now())
}

/// Render records into interfaces file text with an explicit generation
/// timestamp. Output is otherwise fully determined by the record contents.
pub fn format_at(
    records: &[InterfaceRecord],
    generated: DateTime<Utc>,
) -> Result<String, FormatError> {
    let mut present: Vec<&InterfaceRecord> = records
        .iter()
        .filter(|record| record.state == LifecycleState::Present)
        .collect();
    present.sort_by(|a, b| a.name.cmp(&b.name));
    validate(&present)?;

    let mut blocks = vec![header(generated)];

    let onboot: Vec<&str> = present
        .iter()
        .filter(|record| record.is_onboot())
        .map(|record| record.name.as_str())
        .collect();
    if !onboot.is_empty() {
        blocks.push(vec![format!("auto {}", onboot.join(" "))]);
    }

    for class in marker_classes(&present) {
        let names: Vec<&str> = present
            .iter()
            .filter(|record| record.has_marker(&class))
            .map(|record| record.name.as_str())
            .collect();
        if !names.is_empty() {
            blocks.push(vec![format!("{class} {}", names.join(" "))]);
        }
    }

    for record in &present {
        blocks.push(iface_block(record)?);
    }

    let mut out = String::new();
    for block in blocks {
        for line in block {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    Ok(out)
}

fn validate(records: &[&InterfaceRecord]) -> Result<(), FormatError> {
    let mut seen = HashSet::new();
    for record in records {
        let name = record.name.as_str();
        if !seen.insert(name) {
            return Err(FormatError::DuplicateName(record.name.clone()));
        }
        check_token(name, "name", name)?;
        if record.family.is_none() {
            return Err(FormatError::MissingFamily(record.name.clone()));
        }
        let method = record
            .method
            .as_ref()
            .ok_or_else(|| FormatError::MissingMethod(record.name.clone()))?;
        check_token(name, "method", method.as_str())?;

        for (key, value) in [("address", &record.ipaddress), ("netmask", &record.netmask)] {
            if let Some(value) = value {
                check_value(name, key, value)?;
            }
        }

        for (key, value) in &record.options {
            if is_stanza_marker(key) {
                check_token(name, "stanza class", key)?;
                continue;
            }
            if PROMOTED_KEYS.contains(&key.as_str()) {
                return Err(FormatError::PromotedOption {
                    name: record.name.clone(),
                    key: key.clone(),
                });
            }
            if STANZA_KEYWORDS.contains(&key.as_str()) {
                return Err(invalid_token(name, "option key", key));
            }
            check_token(name, "option key", key)?;
            check_value(name, key, value)?;
        }
    }
    Ok(())
}

fn check_token(name: &str, field: &'static str, token: &str) -> Result<(), FormatError> {
    let unusable = token.is_empty()
        || token.contains(char::is_whitespace)
        || token.contains('#')
        || token.ends_with('\\');
    if unusable {
        return Err(invalid_token(name, field, token));
    }
    Ok(())
}

fn invalid_token(name: &str, field: &'static str, token: &str) -> FormatError {
    FormatError::InvalidToken {
        name: name.to_string(),
        field,
        token: token.to_string(),
    }
}

/// Every physical line of a value must survive comment stripping, trimming
/// and line continuation unchanged.
fn check_value(name: &str, key: &str, value: &str) -> Result<(), FormatError> {
    let reason = if value.is_empty() {
        Some("empty value")
    } else {
        value.split('\n').find_map(|part| {
            if part.trim().is_empty() {
                Some("blank line inside value")
            } else if part.contains('#') {
                Some("'#' would start a comment")
            } else if part != part.trim() {
                Some("leading or trailing whitespace")
            } else if part.ends_with('\\') {
                Some("trailing backslash would join the next line")
            } else {
                None
            }
        })
    };

    match reason {
        Some(reason) => Err(FormatError::InvalidValue {
            name: name.to_string(),
            key: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn header(generated: DateTime<Utc>) -> Vec<String> {
    vec![
        format!("{HEADER_PREFIX} Managed interfaces(5) file, regenerated from declared state."),
        format!("{HEADER_PREFIX} Manual changes to managed interfaces will be overwritten."),
        format!(
            "{HEADER_PREFIX} Generated at {}",
            generated.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
    ]
}

/// `allow-auto`, `allow-hotplug`, then any other class in sorted order.
fn marker_classes(records: &[&InterfaceRecord]) -> Vec<String> {
    let others: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.options.keys())
        .map(String::as_str)
        .filter(|key| is_stanza_marker(key) && *key != ALLOW_AUTO && *key != ALLOW_HOTPLUG)
        .collect();

    [ALLOW_AUTO, ALLOW_HOTPLUG]
        .into_iter()
        .chain(others)
        .map(str::to_string)
        .collect()
}

fn iface_block(record: &InterfaceRecord) -> Result<Vec<String>, FormatError> {
    let family = record
        .family
        .ok_or_else(|| FormatError::MissingFamily(record.name.clone()))?;
    let method = record
        .method
        .as_ref()
        .ok_or_else(|| FormatError::MissingMethod(record.name.clone()))?;

    let mut lines = vec![format!("iface {} {family} {method}", record.name)];
    if let Some(address) = &record.ipaddress {
        lines.push(format!("address {address}"));
    }
    if let Some(netmask) = &record.netmask {
        lines.push(format!("netmask {netmask}"));
    }
    for (key, value) in record.block_options() {
        for part in value.split('\n') {
            lines.push(format!("{key} {part}"));
        }
    }
    Ok(lines)
}
