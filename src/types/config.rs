use crate::error::SlamError;
use crate::panel::{MAX_JUDGES, MIN_JUDGES};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_JUDGES: usize = 5;
pub const DEFAULT_STORE_DIR: &str = ".slamscore/store";
pub const DEFAULT_DELIMITER: char = ';';
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlamConfig {
    pub panel: Option<PanelConfig>,
    pub storage: Option<StorageConfig>,
    pub export: Option<ExportConfig>,
    pub autosave: Option<AutoSaveConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    pub default_judges: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutoSaveConfig {
    pub debounce_ms: Option<u64>,
}

impl SlamConfig {
    /// Judge count for a fresh session, clamped into the panel bounds.
    pub fn default_judges(&self) -> usize {
        self.panel
            .as_ref()
            .and_then(|panel| panel.default_judges)
            .unwrap_or(DEFAULT_JUDGES)
            .clamp(MIN_JUDGES, MAX_JUDGES)
    }

    pub fn store_dir(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|storage| storage.dir.as_ref())
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_DIR), PathBuf::from)
    }

    pub fn delimiter(&self) -> char {
        self.export
            .as_ref()
            .and_then(|export| export.delimiter.as_ref())
            .and_then(|delimiter| delimiter.chars().next())
            .unwrap_or(DEFAULT_DELIMITER)
    }

    pub fn debounce_ms(&self) -> u64 {
        self.autosave
            .as_ref()
            .and_then(|autosave| autosave.debounce_ms)
            .unwrap_or(DEFAULT_DEBOUNCE_MS)
    }

    pub fn validate(&self) -> Result<(), SlamError> {
        if let Some(judges) = self.panel.as_ref().and_then(|panel| panel.default_judges) {
            if !(MIN_JUDGES..=MAX_JUDGES).contains(&judges) {
                return Err(SlamError::ConfigParse(format!(
                    "panel.default_judges must be between {MIN_JUDGES} and {MAX_JUDGES} (found {judges})"
                )));
            }
        }

        if let Some(delimiter) = self
            .export
            .as_ref()
            .and_then(|export| export.delimiter.as_ref())
        {
            let mut chars = delimiter.chars();
            let valid = matches!((chars.next(), chars.next()), (Some(c), None) if !matches!(c, '"' | '\n' | '\r' | ',' | '.'));
            if !valid {
                return Err(SlamError::ConfigParse(format!(
                    "export.delimiter must be a single character other than a quote, newline, comma or period (found {delimiter:?})"
                )));
            }
        }

        Ok(())
    }
}
