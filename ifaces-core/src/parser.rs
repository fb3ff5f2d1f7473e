use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::record::{Family, InterfaceRecord, Method, ALLOW_AUTO};

/// Discovered records keyed by interface name.
pub type Interfaces = BTreeMap<String, InterfaceRecord>;

/// Errors that can occur while parsing an interfaces file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Structural violation; the whole file is unusable.
    #[error("malformed interfaces file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    /// Stanza the parser recognizes but deliberately does not support.
    #[error("'{stanza}' stanza at line {line} is not implemented")]
    Unimplemented { line: usize, stanza: String },
    /// Failed to read input file.
    #[error("failed to read interfaces file: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ParseError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Line-to-line parser state. The grammar has no nesting delimiters, so
/// block membership depends only on the stanza opened most recently.
/// `mapping` stanzas are rejected as soon as they open, so only an open
/// `iface` block is ever tracked.
#[derive(Debug, Clone, Default)]
struct ParseState {
    current: Option<String>,
}

/// Parse interfaces file text into records keyed by interface name.
///
/// Any structural problem voids the whole parse; no partial mapping is
/// returned.
pub fn parse(text: &str) -> Result<Interfaces, ParseError> {
    let mut records = Interfaces::new();
    let mut state = ParseState::default();

    for (line_no, line) in logical_lines(text) {
        state = parse_line(state, line_no, &line, &mut records)?;
    }

    Ok(records)
}

/// Parse an interfaces file from disk.
pub fn parse_file(path: &Path) -> Result<Interfaces, ParseError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

fn parse_line(
    state: ParseState,
    line_no: usize,
    line: &str,
    records: &mut Interfaces,
) -> Result<ParseState, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(state);
    };

    match keyword {
        "auto" | ALLOW_AUTO => {
            for name in tokens {
                entry(records, name).onboot = Some(true);
            }
            debug!("line {line_no}: {keyword} stanza");
            Ok(ParseState::default())
        }
        class if class.starts_with("allow-") => {
            for name in tokens {
                entry(records, name).set_marker(class);
            }
            debug!("line {line_no}: {class} stanza");
            Ok(ParseState::default())
        }
        "iface" => {
            let fields: Vec<&str> = tokens.collect();
            let [name, family, method] = fields.as_slice() else {
                return Err(ParseError::malformed(
                    line_no,
                    format!("expected 'iface <name> <family> <method>', found '{line}'"),
                ));
            };
            let family: Family = family
                .parse()
                .map_err(|reason: String| ParseError::malformed(line_no, reason))?;

            let record = entry(records, name);
            if record.has_block() {
                return Err(ParseError::malformed(
                    line_no,
                    format!("duplicate iface block for '{name}'"),
                ));
            }
            record.family = Some(family);
            record.method = Some(Method::from(*method));
            debug!("line {line_no}: opened iface block for {name}");

            Ok(ParseState {
                current: Some(name.to_string()),
            })
        }
        "mapping" => Err(ParseError::Unimplemented {
            line: line_no,
            stanza: "mapping".to_string(),
        }),
        _ => parse_option(state, line_no, line, records),
    }
}

fn parse_option(
    state: ParseState,
    line_no: usize,
    line: &str,
    records: &mut Interfaces,
) -> Result<ParseState, ParseError> {
    match state.current.clone() {
        Some(name) => {
            let (key, value) = line
                .split_once(char::is_whitespace)
                .map(|(key, value)| (key, value.trim()))
                .filter(|(_, value)| !value.is_empty())
                .ok_or_else(|| {
                    ParseError::malformed(line_no, format!("expected '<key> <value>', found '{line}'"))
                })?;

            let record = entry(records, &name);
            match key {
                "address" => record.ipaddress = Some(value.to_string()),
                "netmask" => record.netmask = Some(value.to_string()),
                _ => {
                    // Repeated keys (several `up` hooks, for example) keep
                    // every value, one per line.
                    record
                        .options
                        .entry(key.to_string())
                        .and_modify(|existing| {
                            existing.push('\n');
                            existing.push_str(value);
                        })
                        .or_insert_with(|| value.to_string());
                }
            }
            Ok(state)
        }
        None => Err(ParseError::malformed(
            line_no,
            format!("option line outside of any stanza: '{line}'"),
        )),
    }
}

fn entry<'a>(records: &'a mut Interfaces, name: &str) -> &'a mut InterfaceRecord {
    records
        .entry(name.to_string())
        .or_insert_with(|| InterfaceRecord::new(name))
}

/// Split text into comment-free logical lines tagged with the physical line
/// number they start on. A trailing backslash joins the next physical line.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let stripped = raw.split('#').next().unwrap_or_default().trim();
        let (body, continued) = match stripped.strip_suffix('\\') {
            Some(body) => (body.trim(), true),
            None => (stripped, false),
        };

        let (_, joined) = pending.get_or_insert_with(|| (idx + 1, String::new()));
        if !joined.is_empty() && !body.is_empty() {
            joined.push(' ');
        }
        joined.push_str(body);

        if !continued {
            out.extend(pending.take());
        }
    }
    out.extend(pending);
    out
}
