use crate::error::{Result, SlamError};
use crate::storage::KeyValueStore;
use std::collections::HashMap;

/// In-process store. An optional byte quota, counted over all keys, makes
/// writes fail the way a full browser store does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.values
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(SlamError::persistence(
                    key,
                    format!("quota exceeded ({needed} > {quota} bytes)"),
                ));
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwriting_a_key_does_not_double_count_quota() {
        let mut store = MemoryStore::with_quota(16);
        store.set("k", "0123456789").expect("first write fits");
        store.set("k", "9876543210").expect("overwrite fits");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("9876543210"));
    }

    #[test]
    fn remove_is_a_noop_for_missing_keys() {
        let mut store = MemoryStore::new();
        assert!(store.remove("missing").is_ok());
    }
}
