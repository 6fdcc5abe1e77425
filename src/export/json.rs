use crate::types::history::{HistoryEntry, HistoryExport};
use chrono::{DateTime, SecondsFormat, Utc};

/// Structured export: raw numbers, not the comma display form.
pub fn to_json(
    entries: &[HistoryEntry],
    exported_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    let export = HistoryExport {
        export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        total_entries: entries.len(),
        data: entries.to_vec(),
    };
    serde_json::to_string_pretty(&export)
}
