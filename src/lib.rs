//! Judge scoring for slam events.
//!
//! Raw judge text is normalized and validated ([`scoring`]), a complete
//! [`panel`] is aggregated into a trimmed sum, and committed results live in
//! the [`ledger`], which persists through a [`storage::KeyValueStore`] and
//! exports to delimited text or JSON.

pub mod autosave;
pub mod config;
pub mod error;
pub mod export;
pub mod ledger;
pub mod logging;
pub mod panel;
pub mod prefs;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod types;

pub use error::{Result, SlamError};
