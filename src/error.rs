use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlamError {
    #[error("incomplete or invalid input: judge slot(s) {}", format_slots(.slots))]
    IncompleteOrInvalidPanel { slots: Vec<usize> },

    #[error("judge panel must have between {min} and {max} judges, got {actual}")]
    PanelSize {
        actual: usize,
        min: usize,
        max: usize,
    },

    #[error("no judge slot {0}")]
    UnknownSlot(usize),

    #[error("could not save {key}: {reason}")]
    Persistence { key: String, reason: String },

    #[error("history entry not found: {0}")]
    EntryNotFound(i64),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SlamError {
    pub fn persistence(key: &str, reason: impl ToString) -> Self {
        Self::Persistence {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

fn format_slots(slots: &[usize]) -> String {
    slots
        .iter()
        .map(|slot| (slot + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, SlamError>;
