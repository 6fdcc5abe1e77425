//! The "load list / save list" boundary. Each key is written on its own, so
//! a failure on one key (history grown past quota, say) never touches
//! another.

pub mod file;
pub mod memory;

use crate::error::{Result, SlamError};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const HISTORY_KEY: &str = "slam-history";
pub const AUTOSAVE_KEY: &str = "slam-autosave";
pub const THEME_KEY: &str = "slam-theme";
pub const VIEW_MODE_KEY: &str = "slam-view-mode";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Reads and decodes a JSON value. A value that does not decode is logged
/// and reported as absent.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            tracing::warn!(key, %error, "ignoring unreadable stored value");
            Ok(None)
        }
    }
}

pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(value)?;
    store.set(key, &encoded).map_err(|error| {
        tracing::warn!(key, %error, "persistence write failed");
        match error {
            SlamError::Persistence { .. } => error,
            other => SlamError::persistence(key, other),
        }
    })
}
