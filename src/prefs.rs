use crate::error::Result;
use crate::storage::{self, KeyValueStore, THEME_KEY, VIEW_MODE_KEY};
use crate::types::prefs::{Theme, ViewMode};

pub fn load_theme<S: KeyValueStore + ?Sized>(store: &S) -> Result<Theme> {
    Ok(storage::load_json(store, THEME_KEY)?.unwrap_or_default())
}

pub fn save_theme<S: KeyValueStore + ?Sized>(store: &mut S, theme: Theme) -> Result<()> {
    storage::save_json(store, THEME_KEY, &theme)
}

pub fn load_view_mode<S: KeyValueStore + ?Sized>(store: &S) -> Result<ViewMode> {
    Ok(storage::load_json(store, VIEW_MODE_KEY)?.unwrap_or_default())
}

pub fn save_view_mode<S: KeyValueStore + ?Sized>(store: &mut S, mode: ViewMode) -> Result<()> {
    storage::save_json(store, VIEW_MODE_KEY, &mode)
}
