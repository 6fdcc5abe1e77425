pub mod config;
pub mod history;
pub mod prefs;
pub mod score;
