use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

/// String key-value storage for the few settings that survive restarts.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse::<bool>().ok())
    }
}

/// Preferences kept as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::preferences_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    // Missing or malformed files read as empty.
    fn read_all(&self) -> BTreeMap<String, String> {
        fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }
}

impl Default for FilePreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut all = self.read_all();
        all.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&all)?;
        fs::write(&self.path, data)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = FilePreferenceStore::with_path(dir.path().join("preferences.json"));
        assert_eq!(store.get("audioMuted"), None);
        assert_eq!(store.get_bool("audioMuted"), None);
    }

    #[test]
    fn set_and_get_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let mut store = FilePreferenceStore::with_path(&path);

        store.set("audioMuted", "true").unwrap();
        assert!(path.exists());
        assert_eq!(store.get_bool("audioMuted"), Some(true));

        let reopened = FilePreferenceStore::with_path(&path);
        assert_eq!(reopened.get("audioMuted"), Some("true".to_string()));
    }

    #[test]
    fn set_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let mut store = FilePreferenceStore::with_path(dir.path().join("preferences.json"));
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("a", "3").unwrap();
        assert_eq!(store.get("a"), Some("3".to_string()));
        assert_eq!(store.get("b"), Some("2".to_string()));
    }

    #[test]
    fn malformed_file_is_ignored_and_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, b"not json").unwrap();

        let mut store = FilePreferenceStore::with_path(&path);
        assert_eq!(store.get("audioMuted"), None);

        store.set("audioMuted", "false").unwrap();
        assert_eq!(store.get_bool("audioMuted"), Some(false));
    }

    #[test]
    fn non_boolean_value_is_not_a_bool() {
        let mut store = MemoryPreferenceStore::new();
        store.set("audioMuted", "yes").unwrap();
        assert_eq!(store.get_bool("audioMuted"), None);
    }
}
