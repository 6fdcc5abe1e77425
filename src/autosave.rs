use crate::error::Result;
use crate::storage::{self, KeyValueStore, AUTOSAVE_KEY};
use crate::types::history::AutoSaveSnapshot;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct PendingSave {
    snapshot: AutoSaveSnapshot,
    due: Instant,
}

/// Debounced auto-save with a single outstanding write.
///
/// Each [`schedule`](Self::schedule) replaces the pending snapshot and pushes
/// the deadline out by the debounce window; nothing is queued. Time is passed
/// in by the caller so any event loop (or a test) can drive it.
#[derive(Debug, Clone)]
pub struct AutoSave {
    debounce: Duration,
    pending: Option<PendingSave>,
}

impl AutoSave {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn schedule(&mut self, snapshot: AutoSaveSnapshot, now: Instant) {
        self.pending = Some(PendingSave {
            snapshot,
            due: now + self.debounce,
        });
    }

    /// Drops the pending write. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// Hands out the snapshot once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<AutoSaveSnapshot> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.due);
        if due {
            self.pending.take().map(|pending| pending.snapshot)
        } else {
            None
        }
    }

    /// Writes the snapshot if it is due. Returns true if a write happened.
    pub fn flush_due<S>(&mut self, store: &mut S, now: Instant) -> Result<bool>
    where
        S: KeyValueStore + ?Sized,
    {
        let Some(snapshot) = self.poll(now) else {
            return Ok(false);
        };
        storage::save_json(store, AUTOSAVE_KEY, &snapshot)?;
        tracing::debug!(slots = snapshot.judge_scores.len(), "auto-saved form");
        Ok(true)
    }

    /// Writes the pending snapshot right away, regardless of the deadline.
    pub fn flush_now<S>(&mut self, store: &mut S) -> Result<bool>
    where
        S: KeyValueStore + ?Sized,
    {
        match self.due_at() {
            Some(due) => self.flush_due(store, due),
            None => Ok(false),
        }
    }

    pub fn restore<S>(store: &S) -> Result<Option<AutoSaveSnapshot>>
    where
        S: KeyValueStore + ?Sized,
    {
        storage::load_json(store, AUTOSAVE_KEY)
    }

    /// Cancels any pending write and deletes the stored snapshot.
    pub fn discard<S>(&mut self, store: &mut S) -> Result<()>
    where
        S: KeyValueStore + ?Sized,
    {
        self.cancel();
        store.remove(AUTOSAVE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::collections::BTreeMap;

    fn snapshot(name: &str, first: &str) -> AutoSaveSnapshot {
        let mut judge_scores = BTreeMap::new();
        judge_scores.insert("judge1".to_string(), first.to_string());
        AutoSaveSnapshot {
            participant_name: name.to_string(),
            judge_scores,
            timestamp: 0,
        }
    }

    #[test]
    fn nothing_is_written_before_the_window_elapses() {
        let start = Instant::now();
        let mut autosave = AutoSave::new(Duration::from_millis(500));
        let mut store = MemoryStore::new();

        autosave.schedule(snapshot("Ana", "8"), start);
        assert!(!autosave
            .flush_due(&mut store, start + Duration::from_millis(499))
            .expect("flush should not fail"));
        assert!(AutoSave::restore(&store).expect("restore").is_none());
    }

    #[test]
    fn rescheduling_collapses_edits_into_last_state() {
        let start = Instant::now();
        let mut autosave = AutoSave::new(Duration::from_millis(500));
        let mut store = MemoryStore::new();

        autosave.schedule(snapshot("Ana", "8"), start);
        autosave.schedule(snapshot("Ana", "8,5"), start + Duration::from_millis(400));

        assert!(!autosave
            .flush_due(&mut store, start + Duration::from_millis(600))
            .expect("flush should not fail"));
        assert!(autosave
            .flush_due(&mut store, start + Duration::from_millis(900))
            .expect("flush should not fail"));
        assert!(!autosave.is_pending());

        let restored = AutoSave::restore(&store)
            .expect("restore")
            .expect("snapshot should exist");
        assert_eq!(restored.judge_scores.get("judge1").map(String::as_str), Some("8,5"));
    }

    #[test]
    fn cancel_prevents_stale_write() {
        let start = Instant::now();
        let mut autosave = AutoSave::new(Duration::from_millis(10));
        let mut store = MemoryStore::new();

        autosave.schedule(snapshot("Ana", "8"), start);
        assert!(autosave.cancel());
        assert!(!autosave.cancel());
        assert!(!autosave
            .flush_due(&mut store, start + Duration::from_secs(5))
            .expect("flush should not fail"));
        assert!(AutoSave::restore(&store).expect("restore").is_none());
    }

    #[test]
    fn discard_removes_stored_snapshot() {
        let mut autosave = AutoSave::new(Duration::from_millis(10));
        let mut store = MemoryStore::new();
        autosave.schedule(snapshot("Ana", "8"), Instant::now());
        assert!(autosave.flush_now(&mut store).expect("flush should not fail"));

        autosave.schedule(snapshot("Ana", "9"), Instant::now());
        autosave.discard(&mut store).expect("discard should succeed");
        assert!(!autosave.is_pending());
        assert!(AutoSave::restore(&store).expect("restore").is_none());
    }
}
