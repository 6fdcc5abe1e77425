pub mod delimited;
pub mod json;

use crate::error::SlamError;
use crate::types::history::HistoryEntry;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Delimited { delimiter: char },
    Json,
}

pub fn render(
    entries: &[HistoryEntry],
    format: ExportFormat,
    exported_at: DateTime<Utc>,
) -> Result<String, SlamError> {
    match format {
        ExportFormat::Delimited { delimiter } => Ok(delimited::to_delimited(entries, delimiter)),
        ExportFormat::Json => json::to_json(entries, exported_at).map_err(SlamError::Json),
    }
}

/// One decimal place with a comma as decimal separator: `27.8` -> `"27,8"`.
pub fn format_display(value: f64) -> String {
    format!("{value:.1}").replace('.', ",")
}
