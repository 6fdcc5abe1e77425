use crate::error::{Result, SlamError};
use crate::types::config::SlamConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "slamscore.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".slamscore/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/slamscore/config.toml";

/// Global, then `slamscore.toml`, then `.slamscore/local.toml`; later files
/// win key by key. Missing files are skipped.
pub fn load_config(root: &Path) -> Result<SlamConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<SlamConfig> {
    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: SlamConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| SlamError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    tracing::debug!(path = %path.display(), "loading config layer");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| SlamError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_defaults_when_no_files_exist() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert_eq!(cfg.default_judges(), 5);
        assert_eq!(cfg.delimiter(), ';');
    }

    #[test]
    fn load_config_merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[export]
delimiter = "|"

[autosave]
debounce_ms = 2000
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[panel]
default_judges = 7

[autosave]
debounce_ms = 500
"#,
        )
        .expect("repo config should write");

        fs::create_dir_all(root.path().join(".slamscore")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[panel]
default_judges = 9
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed");

        assert_eq!(cfg.default_judges(), 9);
        assert_eq!(cfg.debounce_ms(), 500);
        assert_eq!(cfg.delimiter(), '|');
    }

    #[test]
    fn invalid_values_are_reported_as_config_errors() {
        let root = TempDir::new().expect("temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            "[panel]\ndefault_judges = 2\n",
        )
        .expect("repo config should write");

        let result = load_config_with_global(root.path(), None);
        assert!(matches!(result, Err(SlamError::ConfigParse(_))));
    }

    #[test]
    fn malformed_toml_names_the_file() {
        let root = TempDir::new().expect("temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[panel\n").expect("write");

        match load_config_with_global(root.path(), None) {
            Err(SlamError::ConfigParse(message)) => assert!(message.contains(DEFAULT_CONFIG_FILE)),
            other => panic!("expected config parse error, got {other:?}"),
        }
    }
}
