//! Label text storage keyed by image stem.
//!
//! The engine only needs `get`/`set` semantics from wherever label files
//! live. `DirectoryStore` keeps one `.txt` file per key in a folder, the way
//! YOLO datasets are laid out; `MemoryStore` is used by tests and hosts that
//! persist elsewhere.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::LabelError;

/// File holding class names in YOLO datasets; never treated as a label file.
pub const CLASSES_FILE: &str = "classes.txt";

/// Extension of label files.
pub const LABEL_EXTENSION: &str = "txt";

/// Access to label text by image key.
pub trait LabelStore {
    /// Read the label text for `key`, or `None` if the image has no labels yet.
    fn get(&self, key: &str) -> Result<Option<String>, LabelError>;

    /// Replace the label text for `key`.
    fn set(&mut self, key: &str, text: &str) -> Result<(), LabelError>;

    /// All keys that currently have label text, sorted.
    fn keys(&self) -> Result<Vec<String>, LabelError>;
}

/// Reject keys that would escape the store or name the classes file.
fn validate_key(key: &str) -> Result<(), LabelError> {
    let bad = key.is_empty()
        || key.contains(['/', '\\'])
        || key == "."
        || key == ".."
        || format!("{}.{}", key, LABEL_EXTENSION) == CLASSES_FILE;
    if bad {
        return Err(LabelError::invalid_key(key));
    }
    Ok(())
}

/// Label files stored as `<dir>/<key>.txt`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    /// Open a store over an existing directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LabelError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(LabelError::DirectoryNotFound { path: dir });
        }
        log::info!("Opened label directory {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, LABEL_EXTENSION))
    }
}

impl LabelStore for DirectoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LabelError> {
        validate_key(key)?;
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                log::warn!("Failed to read labels {:?}: {}", path, e);
                Err(e.into())
            }
        }
    }

    fn set(&mut self, key: &str, text: &str) -> Result<(), LabelError> {
        validate_key(key)?;
        let path = self.path_for(key);
        std::fs::write(&path, text).map_err(|e| {
            log::warn!("Failed to write labels {:?}: {}", path, e);
            LabelError::from(e)
        })?;
        log::debug!("Wrote {} bytes to {:?}", text.len(), path);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, LabelError> {
        let mut keys: Vec<String> = std::fs::read_dir(&self.dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension().is_some_and(|ext| ext == LABEL_EXTENSION)
                    && p.file_name().is_some_and(|n| n != CLASSES_FILE)
            })
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// In-memory label store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LabelStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LabelError> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, text: &str) -> Result<(), LabelError> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, LabelError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("img1").unwrap(), None);

        store.set("img1", "0 0.5 0.5 0.1 0.1").unwrap();
        assert_eq!(store.get("img1").unwrap().as_deref(), Some("0 0.5 0.5 0.1 0.1"));
        assert_eq!(store.keys().unwrap(), vec!["img1".to_string()]);
    }

    #[test]
    fn test_invalid_keys() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.set("", "x"), Err(LabelError::InvalidKey { .. })));
        assert!(matches!(store.get("../etc"), Err(LabelError::InvalidKey { .. })));
        assert!(matches!(store.set("classes", "x"), Err(LabelError::InvalidKey { .. })));
    }

    #[test]
    fn test_directory_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CLASSES_FILE), "person\ncar").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignore me").unwrap();

        let mut store = DirectoryStore::open(dir.path()).unwrap();
        assert_eq!(store.get("frame_01").unwrap(), None);

        store.set("frame_02", "1 0.5 0.5 0.2 0.2").unwrap();
        store.set("frame_01", "0 0.1 0.1 0.05 0.05").unwrap();

        assert_eq!(
            store.get("frame_02").unwrap().as_deref(),
            Some("1 0.5 0.5 0.2 0.2")
        );
        assert_eq!(
            store.keys().unwrap(),
            vec!["frame_01".to_string(), "frame_02".to_string()]
        );
    }

    #[test]
    fn test_directory_store_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            DirectoryStore::open(missing),
            Err(LabelError::DirectoryNotFound { .. })
        ));
    }
}
