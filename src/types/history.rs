use crate::types::score::CalculationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A committed calculation. Never mutated after the ledger creates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: String,
    #[serde(flatten)]
    pub result: CalculationResult,
}

/// Payload of the structured export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    pub export_date: String,
    pub total_entries: usize,
    pub data: Vec<HistoryEntry>,
}

/// In-progress form state written by the debounced auto-save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSaveSnapshot {
    pub participant_name: String,
    /// Raw field text keyed by slot id (`judge1`, `judge2`, ...).
    pub judge_scores: BTreeMap<String, String>,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

pub fn slot_id(index: usize) -> String {
    format!("judge{}", index + 1)
}

/// Inverse of [`slot_id`]; returns the zero-based slot index.
pub fn parse_slot_id(id: &str) -> Option<usize> {
    id.strip_prefix("judge")
        .and_then(|number| number.parse::<usize>().ok())
        .filter(|number| *number >= 1)
        .map(|number| number - 1)
}
