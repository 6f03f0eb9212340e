use anyhow::Context;
use lqa_core::entities::LqaErrorEntry;
use lqa_core::enums::Severity;
use serde::de::DeserializeOwned;

/// Parse a `snake_case` enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse `TYPE:SEVERITY:COUNT`, e.g. `terminology:major:2`.
pub fn parse_error_entry(raw: &str) -> anyhow::Result<LqaErrorEntry> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(count), Some(severity), Some(error_type)) = (parts.next(), parts.next(), parts.next())
    else {
        anyhow::bail!("invalid error entry '{raw}': expected TYPE:SEVERITY:COUNT");
    };

    let error_type = error_type.trim();
    if error_type.is_empty() {
        anyhow::bail!("invalid error entry '{raw}': error type is empty");
    }

    let severity = parse_enum::<Severity>(severity, "severity")?;
    let count = count
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid error entry '{raw}': count must be a whole number"))?;

    Ok(LqaErrorEntry {
        error_type: error_type.to_string(),
        severity,
        count,
    })
}

/// Parse every `--error` value; an empty list stays empty.
pub fn parse_error_entries(raw: &[String]) -> anyhow::Result<Vec<LqaErrorEntry>> {
    raw.iter().map(|entry| parse_error_entry(entry)).collect()
}
