use ifaces_core::{InterfaceRecord, Interfaces};

/// Render discovered records, one header line per interface followed by its
/// addressing and options.
pub fn render_records(records: &Interfaces) -> String {
    let mut out = String::new();
    for record in records.values() {
        render_record(record, &mut out);
    }
    out
}

fn render_record(record: &InterfaceRecord, out: &mut String) {
    let family = record
        .family
        .map(|f| f.to_string())
        .unwrap_or_else(|| "-".to_string());
    let method = record
        .method
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!(
        "{} family={family} method={method} onboot={}\n",
        record.name,
        record.is_onboot()
    ));

    if let Some(address) = &record.ipaddress {
        out.push_str(&format!("  address {address}\n"));
    }
    if let Some(netmask) = &record.netmask {
        out.push_str(&format!("  netmask {netmask}\n"));
    }
    for (key, value) in &record.options {
        for part in value.lines() {
            out.push_str(&format!("  {key} {part}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::render_records;
    use ifaces_core::parse;

    #[test]
    fn renders_blockless_references() {
        let records = parse("auto eth3\nallow-hotplug eth0\niface eth0 inet dhcp\n")
            .expect("parse");
        let text = render_records(&records);
        assert_eq!(
            text,
            "eth0 family=inet method=dhcp onboot=false\n  allow-hotplug true\neth3 family=- method=- onboot=true\n"
        );
    }
}
