//! Explicit per-session state: the participant, the judge panel, the last
//! calculation, the pending auto-save and the ledger. The line commands
//! below are what the interactive CLI feeds in, but every step is a plain
//! method any other front end can call.

use crate::autosave::AutoSave;
use crate::error::{Result, SlamError};
use crate::export::format_display;
use crate::ledger::HistoryLedger;
use crate::panel::{JudgePanel, ScoreField};
use crate::scoring::ValidationError;
use crate::storage::KeyValueStore;
use crate::types::history::{parse_slot_id, slot_id, AutoSaveSnapshot, HistoryEntry};
use crate::types::score::{CalculationResult, Score};
use chrono::Utc;
use std::time::{Duration, Instant};

pub const HELP: &str = "\
commands:
  name <text>         set the participant name
  set <judge> <score> type a score into judge slot (1-based)
  leave <judge>       leave the field, rewriting it to canonical form
  add | remove        add or remove the last judge slot
  calc                calculate the result
  commit              save the last result to history
  reset               clear the form and the auto-saved draft
  show                print the form
  history             list saved results
  quit                exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Set { slot: usize, raw: String },
    Leave(usize),
    Add,
    Remove,
    Calc,
    Commit,
    Reset,
    Show,
    History,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name(rest.to_string())),
            "set" => {
                let (slot, raw) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(slot, raw)| (slot, raw.trim()));
                Ok(Self::Set {
                    slot: parse_judge_number(slot)?,
                    raw: raw.to_string(),
                })
            }
            "leave" => Ok(Self::Leave(parse_judge_number(rest)?)),
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "calc" => Ok(Self::Calc),
            "commit" => Ok(Self::Commit),
            "reset" => Ok(Self::Reset),
            "show" => Ok(Self::Show),
            "history" => Ok(Self::History),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command: {other} (try `help`)")),
        }
    }
}

fn parse_judge_number(text: &str) -> std::result::Result<usize, String> {
    text.parse::<usize>()
        .ok()
        .filter(|number| *number >= 1)
        .map(|number| number - 1)
        .ok_or_else(|| format!("expected a judge number, got {text:?}"))
}

pub struct Session<S: KeyValueStore> {
    participant_name: String,
    panel: JudgePanel,
    last_result: Option<CalculationResult>,
    /// The form has not changed since its result went into the ledger.
    saved: bool,
    autosave: AutoSave,
    ledger: HistoryLedger<S>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(ledger: HistoryLedger<S>, judges: usize, debounce: Duration) -> Result<Self> {
        Ok(Self {
            participant_name: String::new(),
            panel: JudgePanel::new(judges)?,
            last_result: None,
            saved: false,
            autosave: AutoSave::new(debounce),
            ledger,
        })
    }

    pub fn participant_name(&self) -> &str {
        &self.participant_name
    }

    pub fn panel(&self) -> &JudgePanel {
        &self.panel
    }

    pub fn last_result(&self) -> Option<&CalculationResult> {
        self.last_result.as_ref()
    }

    pub fn ledger(&self) -> &HistoryLedger<S> {
        &self.ledger
    }

    pub fn autosave(&self) -> &AutoSave {
        &self.autosave
    }

    /// Loads the auto-saved draft into the form. Returns true if one existed.
    pub fn restore(&mut self) -> Result<bool> {
        let Some(snapshot) = AutoSave::restore(self.ledger.store())? else {
            return Ok(false);
        };

        self.participant_name = snapshot.participant_name;
        for (id, raw) in snapshot.judge_scores {
            let Some(slot) = parse_slot_id(&id) else {
                tracing::warn!(slot = %id, "skipping unknown slot in auto-saved draft");
                continue;
            };
            self.panel.ensure_len(slot + 1);
            if self.panel.set_raw(slot, raw).is_err() {
                tracing::warn!(slot = %id, "auto-saved slot exceeds panel size");
            }
        }
        tracing::info!(judges = self.panel.len(), "restored auto-saved draft");
        Ok(true)
    }

    pub fn set_name(&mut self, name: &str, now: Instant) {
        self.participant_name = name.to_string();
        self.touch(now);
    }

    /// Stores the typed text and returns its preview validation.
    pub fn set_score(
        &mut self,
        slot: usize,
        raw: &str,
        now: Instant,
    ) -> Result<std::result::Result<Score, ValidationError>> {
        self.panel.set_raw(slot, raw)?;
        self.touch(now);
        Ok(self
            .panel
            .preview(slot)
            .unwrap_or(Err(ValidationError::Empty)))
    }

    pub fn leave_field(&mut self, slot: usize, now: Instant) -> Result<bool> {
        let changed = self
            .panel
            .leave_field(slot)
            .ok_or(SlamError::UnknownSlot(slot + 1))?;
        if changed {
            self.touch(now);
        }
        Ok(changed)
    }

    pub fn add_judge(&mut self, now: Instant) -> bool {
        let added = self.panel.add_judge();
        if added {
            self.touch(now);
        }
        added
    }

    pub fn remove_judge(&mut self, now: Instant) -> bool {
        let removed = self.panel.remove_judge();
        if removed {
            self.touch(now);
        }
        removed
    }

    pub fn calculate(&mut self) -> Result<&CalculationResult> {
        let result = self.panel.calculate(&self.participant_name)?;
        Ok(self.last_result.insert(result))
    }

    /// Commits the last calculation, calculating first if needed. Returns
    /// `None` when this form's result is already in the ledger.
    pub fn commit(&mut self) -> Result<Option<HistoryEntry>> {
        if self.saved {
            return Ok(None);
        }
        let result = match self.last_result.clone() {
            Some(result) => result,
            None => self.calculate()?.clone(),
        };
        let entry = self.ledger.commit(result)?;
        self.saved = true;
        Ok(Some(entry))
    }

    /// Clears the form, cancels the pending auto-save and deletes the draft.
    pub fn reset(&mut self) -> Result<()> {
        self.participant_name.clear();
        self.panel.reset();
        self.last_result = None;
        self.saved = false;
        self.autosave.discard(self.ledger.store_mut())
    }

    /// Performs the auto-save if its window has elapsed.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        self.autosave.flush_due(self.ledger.store_mut(), now)
    }

    /// Writes any pending auto-save immediately.
    pub fn flush(&mut self) -> Result<bool> {
        self.autosave.flush_now(self.ledger.store_mut())
    }

    pub fn snapshot(&self) -> AutoSaveSnapshot {
        AutoSaveSnapshot {
            participant_name: self.participant_name.clone(),
            judge_scores: self
                .panel
                .fields()
                .iter()
                .enumerate()
                .map(|(slot, field)| (slot_id(slot), field.raw().to_string()))
                .collect(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Runs one line command. Input problems come back as reply text;
    /// only storage failures are errors.
    pub fn execute(&mut self, command: Command, now: Instant) -> Result<String> {
        let reply = match command {
            Command::Name(name) => {
                self.set_name(&name, now);
                format!("participant: {name}")
            }
            Command::Set { slot, raw } => match self.set_score(slot, &raw, now) {
                Ok(Ok(score)) => format!("judge {}: {score}", slot + 1),
                Ok(Err(error)) => format!("judge {}: {raw:?} - {error}", slot + 1),
                Err(error @ SlamError::UnknownSlot(_)) => format!("error: {error}"),
                Err(error) => return Err(error),
            },
            Command::Leave(slot) => match self.leave_field(slot, now) {
                Ok(_) => {
                    let raw = self.panel.field(slot).map_or("", ScoreField::raw);
                    format!("judge {}: {raw}", slot + 1)
                }
                Err(error @ SlamError::UnknownSlot(_)) => format!("error: {error}"),
                Err(error) => return Err(error),
            },
            Command::Add => {
                if self.add_judge(now) {
                    format!("judges: {}", self.panel.len())
                } else {
                    format!("judges: {} (maximum)", self.panel.len())
                }
            }
            Command::Remove => {
                if self.remove_judge(now) {
                    format!("judges: {}", self.panel.len())
                } else {
                    format!("judges: {} (minimum)", self.panel.len())
                }
            }
            Command::Calc => match self.calculate() {
                Ok(result) => render_result(result),
                Err(error @ SlamError::IncompleteOrInvalidPanel { .. }) => {
                    format!("error: {error}")
                }
                Err(error) => return Err(error),
            },
            Command::Commit => match self.commit() {
                Ok(Some(entry)) => format!("saved #{} at {}", entry.id, entry.timestamp),
                Ok(None) => "already saved; change the form to save again".to_string(),
                Err(error @ SlamError::IncompleteOrInvalidPanel { .. }) => {
                    format!("error: {error}")
                }
                Err(error) => return Err(error),
            },
            Command::Reset => {
                self.reset()?;
                "form cleared".to_string()
            }
            Command::Show => self.render_form(),
            Command::History => render_history(self.ledger.entries()),
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };
        Ok(reply)
    }

    fn touch(&mut self, now: Instant) {
        self.last_result = None;
        self.saved = false;
        let snapshot = self.snapshot();
        self.autosave.schedule(snapshot, now);
    }

    fn render_form(&self) -> String {
        let mut output = format!("participant: {}\n", self.participant_name);
        for (slot, field) in self.panel.fields().iter().enumerate() {
            let status = match field.preview() {
                Ok(_) => "ok".to_string(),
                Err(error) => error.to_string(),
            };
            output.push_str(&format!("judge {}: {:<6} [{status}]\n", slot + 1, field.raw()));
        }
        output.truncate(output.trim_end().len());
        output
    }
}

pub fn render_result(result: &CalculationResult) -> String {
    let join = |scores: &[Score]| {
        scores
            .iter()
            .map(|score| format_display(score.value()))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let mut output = String::new();
    if !result.participant_name.is_empty() {
        output.push_str(&format!("participant: {}\n", result.participant_name));
    }
    output.push_str(&format!("scores:   {}\n", join(&result.all_scores)));
    output.push_str(&format!(
        "excluded: {} (min) {} (max)\n",
        format_display(result.excluded_min().value()),
        format_display(result.excluded_max().value())
    ));
    output.push_str(&format!("included: {}\n", join(&result.included_scores)));
    output.push_str(&format!("total:    {}", format_display(result.total)));
    output
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "history: empty".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "#{}  {}  {}  {}",
                entry.id,
                entry.timestamp,
                if entry.result.participant_name.is_empty() {
                    "-"
                } else {
                    entry.result.participant_name.as_str()
                },
                format_display(entry.result.total)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
