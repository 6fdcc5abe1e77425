use crate::error::{Result, SlamError};
use crate::storage::KeyValueStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One JSON file per key under a directory. Values are written to a
/// sibling temp file and renamed into place, so a failed write leaves the
/// previous value readable.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(SlamError::Io(error)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        let write = || -> std::io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            fs::write(&staging, value)?;
            fs::rename(&staging, &target)
        };
        write().map_err(|error| {
            let _ = fs::remove_file(&staging);
            SlamError::persistence(key, error)
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(SlamError::persistence(key, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = FileStore::new(dir.path());
        assert!(store.get("slam-history").expect("get should succeed").is_none());
    }

    #[test]
    fn set_creates_directory_and_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut store = FileStore::new(dir.path().join("nested/store"));
        store.set("slam-theme", "\"dark\"").expect("set should succeed");

        let on_disk = fs::read_to_string(dir.path().join("nested/store/slam-theme.json"))
            .expect("file should exist");
        assert_eq!(on_disk, "\"dark\"");
        assert!(!dir.path().join("nested/store/.slam-theme.json.tmp").exists());
    }

    #[test]
    fn remove_deletes_only_the_given_key() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut store = FileStore::new(dir.path());
        store.set("a", "1").expect("set a");
        store.set("b", "2").expect("set b");
        store.remove("a").expect("remove a");
        store.remove("a").expect("second remove is a no-op");

        assert!(store.get("a").expect("get a").is_none());
        assert_eq!(store.get("b").expect("get b").as_deref(), Some("2"));
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut store = FileStore::new(dir.path());
        store.set("slam-history", "[]").expect("set should succeed");

        // A directory squatting on the temp path makes the staging write fail.
        fs::create_dir_all(dir.path().join(".slam-history.json.tmp")).expect("dir should create");
        let error = store.set("slam-history", "[1]").expect_err("write should fail");
        assert!(error.is_persistence());
        assert_eq!(
            store.get("slam-history").expect("get should succeed").as_deref(),
            Some("[]")
        );
    }
}
