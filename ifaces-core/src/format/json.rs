use serde::Serialize;

/// Format records, changesets or apply outcomes as pretty-printed JSON.
pub fn format_json<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string_pretty(value)
}
