use crate::error::Result;
use crate::export::{self, ExportFormat};
use crate::storage::{self, KeyValueStore, HISTORY_KEY};
use crate::types::history::HistoryEntry;
use crate::types::score::CalculationResult;
use chrono::{DateTime, Local, Utc};

pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Committed results, newest first, mirrored to the store on every change.
///
/// Every mutation writes the whole list under [`HISTORY_KEY`]. If that write
/// fails the in-memory change is undone before the error is returned, so
/// memory and store never disagree about what was committed.
pub struct HistoryLedger<S: KeyValueStore> {
    store: S,
    entries: Vec<HistoryEntry>,
}

impl<S: KeyValueStore> HistoryLedger<S> {
    /// Loads the persisted list. Unreadable history is logged and treated as
    /// empty; it is replaced by the next successful write.
    pub fn open(store: S) -> Result<Self> {
        let entries: Vec<HistoryEntry> =
            storage::load_json(&store, HISTORY_KEY)?.unwrap_or_default();
        tracing::debug!(entries = entries.len(), "history loaded");
        Ok(Self { store, entries })
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn commit(&mut self, result: CalculationResult) -> Result<HistoryEntry> {
        self.commit_at(result, Local::now())
    }

    /// Commits with an explicit clock reading. The id is the commit time in
    /// epoch milliseconds, bumped past the newest existing id on collision.
    pub fn commit_at(
        &mut self,
        result: CalculationResult,
        now: DateTime<Local>,
    ) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            id: self.next_id(now.timestamp_millis()),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            result,
        };

        self.entries.insert(0, entry.clone());
        if let Err(error) = self.persist() {
            self.entries.remove(0);
            return Err(error);
        }

        tracing::info!(
            id = entry.id,
            participant = %entry.result.participant_name,
            total = entry.result.total,
            "result committed"
        );
        Ok(entry)
    }

    /// Removes the entry with `id`. Returns false if there was none.
    pub fn remove(&mut self, id: i64) -> Result<bool> {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return Ok(false);
        };

        let removed = self.entries.remove(index);
        if let Err(error) = self.persist() {
            self.entries.insert(index, removed);
            return Err(error);
        }

        tracing::info!(id, "history entry removed");
        Ok(true)
    }

    /// Empties the ledger. Confirmation is the caller's job.
    pub fn clear(&mut self) -> Result<()> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(error) = self.persist() {
            self.entries = previous;
            return Err(error);
        }

        tracing::info!(removed = previous.len(), "history cleared");
        Ok(())
    }

    pub fn to_delimited_text(&self, delimiter: char) -> String {
        export::delimited::to_delimited(&self.entries, delimiter)
    }

    pub fn to_structured_text(&self) -> Result<String> {
        self.export(ExportFormat::Json, Utc::now())
    }

    pub fn export(&self, format: ExportFormat, exported_at: DateTime<Utc>) -> Result<String> {
        export::render(&self.entries, format, exported_at)
    }

    fn next_id(&self, candidate: i64) -> i64 {
        match self.entries.iter().map(|entry| entry.id).max() {
            Some(newest) if newest >= candidate => newest + 1,
            _ => candidate,
        }
    }

    fn persist(&mut self) -> Result<()> {
        storage::save_json(&mut self.store, HISTORY_KEY, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlamError;
    use crate::panel::JudgePanel;
    use crate::storage::{MemoryStore, THEME_KEY};
    use chrono::TimeZone;

    fn result(name: &str, raw: &[&str]) -> CalculationResult {
        JudgePanel::from_raw(raw.iter().copied())
            .and_then(|panel| panel.calculate(name))
            .expect("calculation should succeed")
    }

    fn at(seconds: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 10, 16, 19, 30, seconds)
            .single()
            .expect("local time should be unambiguous")
    }

    #[test]
    fn commits_are_newest_first() {
        let mut ledger = HistoryLedger::open(MemoryStore::new()).expect("ledger should open");
        let a = ledger
            .commit_at(result("A", &["7", "8", "9"]), at(0))
            .expect("commit a");
        let b = ledger
            .commit_at(result("B", &["6", "7", "8"]), at(1))
            .expect("commit b");

        assert_eq!(ledger.entries()[0].id, b.id);
        assert_eq!(ledger.entries()[1].id, a.id);
        assert_eq!(b.timestamp, "16.10.2026 19:30:01");
    }

    #[test]
    fn ids_stay_unique_within_the_same_millisecond() {
        let mut ledger = HistoryLedger::open(MemoryStore::new()).expect("ledger should open");
        let first = ledger
            .commit_at(result("A", &["7", "8", "9"]), at(0))
            .expect("first commit");
        let second = ledger
            .commit_at(result("A", &["7", "8", "9"]), at(0))
            .expect("second commit");
        assert_eq!(second.id, first.id + 1);
    }

    #[test]
    fn commit_is_persisted_and_reloaded() {
        let mut ledger = HistoryLedger::open(MemoryStore::new()).expect("ledger should open");
        let entry = ledger
            .commit_at(result("Ana", &["9.2", "9.8", "9.5", "9.1", "8.9"]), at(0))
            .expect("commit should succeed");

        let store = ledger.store().clone();
        let reopened = HistoryLedger::open(store).expect("ledger should reopen");
        assert_eq!(reopened.len(), 1);
        let loaded = &reopened.entries()[0];
        assert_eq!(loaded.id, entry.id);
        assert_eq!(loaded.timestamp, entry.timestamp);
        assert_eq!(loaded.result.participant_name, "Ana");
        assert_eq!(loaded.result.all_scores, entry.result.all_scores);
        assert!((loaded.result.total - entry.result.total).abs() < 1e-9);
    }

    #[test]
    fn failed_persistence_rolls_back_commit() {
        let mut ledger =
            HistoryLedger::open(MemoryStore::with_quota(16)).expect("ledger should open");
        let error = ledger
            .commit_at(result("Ana", &["7", "8", "9"]), at(0))
            .expect_err("commit should exceed quota");

        assert!(matches!(error, SlamError::Persistence { .. }));
        assert!(ledger.is_empty());
    }

    #[test]
    fn remove_reports_presence() {
        let mut ledger = HistoryLedger::open(MemoryStore::new()).expect("ledger should open");
        let entry = ledger
            .commit_at(result("A", &["7", "8", "9"]), at(0))
            .expect("commit should succeed");

        assert!(!ledger.remove(entry.id + 100).expect("remove should not fail"));
        assert!(ledger.remove(entry.id).expect("remove should not fail"));
        assert!(ledger.is_empty());
        assert!(ledger.get(entry.id).is_none());
    }

    #[test]
    fn clear_empties_ledger_and_store() {
        let mut ledger = HistoryLedger::open(MemoryStore::new()).expect("ledger should open");
        ledger
            .commit_at(result("A", &["7", "8", "9"]), at(0))
            .expect("commit should succeed");
        ledger.clear().expect("clear should succeed");

        let reopened = HistoryLedger::open(ledger.store().clone()).expect("ledger should reopen");
        assert!(reopened.is_empty());
    }

    #[test]
    fn corrupt_history_opens_empty_without_touching_other_keys() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "[{oops").expect("set history");
        store.set(THEME_KEY, "\"dark\"").expect("set theme");

        let ledger = HistoryLedger::open(store).expect("ledger should open");
        assert!(ledger.is_empty());
        assert_eq!(
            ledger.store().get(THEME_KEY).expect("get theme").as_deref(),
            Some("\"dark\"")
        );
    }

    #[test]
    fn delimited_export_renders_total_with_comma() {
        let mut ledger = HistoryLedger::open(MemoryStore::new()).expect("ledger should open");
        ledger
            .commit_at(result("Ana", &["9.2", "9.8", "9.5", "9.1", "8.9"]), at(0))
            .expect("commit should succeed");

        let text = ledger.to_delimited_text(';');
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Date;Name;Total;Excluded;Included;All"));
        let row = lines.next().expect("row should exist");
        assert_eq!(row.split(';').nth(2), Some("27,8"));
    }

    #[test]
    fn structured_export_counts_entries() {
        let mut ledger = HistoryLedger::open(MemoryStore::new()).expect("ledger should open");
        ledger
            .commit_at(result("A", &["7", "8", "9"]), at(0))
            .expect("commit a");
        ledger
            .commit_at(result("B", &["7", "8", "9"]), at(1))
            .expect("commit b");

        let text = ledger.to_structured_text().expect("export should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&text).expect("json should parse");
        assert_eq!(parsed["totalEntries"], 2);
        assert_eq!(parsed["data"][0]["participantName"], "B");
    }
}
