//! JSON-file-backed record stores.
//!
//! Every feature keeps one JSON object on disk, keyed by an entity id
//! (user, message) rendered as a string. A store is loaded wholesale,
//! mutated in memory and rewritten wholesale by [`RecordStore::dump`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

/// A record store shared between command handlers and maintenance timers.
pub type SharedStore<V> = Arc<Mutex<RecordStore<V>>>;

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "record store '{}' I/O error: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "record store '{}' is not valid JSON: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Outcome of [`RecordStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Replaced,
}

pub struct RecordStore<V> {
    path: PathBuf,
    records: BTreeMap<String, V>,
}

impl<V> RecordStore<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Opens the store at `path`, writing an empty `{}` document first if
    /// the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: path.clone(),
                    source,
                })?;
            }
            std::fs::write(&path, "{}").map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            debug!("created empty record store {}", path.display());
        }

        let mut store = Self {
            path,
            records: BTreeMap::new(),
        };
        store.reload()?;
        Ok(store)
    }

    pub fn open_shared(path: impl AsRef<Path>) -> Result<SharedStore<V>, StoreError> {
        Ok(Arc::new(Mutex::new(Self::open(path)?)))
    }

    /// Replaces the in-memory mapping with the file contents, discarding any
    /// mutation made since the last dump.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.records = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    pub fn dump(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.records).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, raw).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut V> {
        self.records.get_mut(id)
    }

    /// Returns the record for `id`, inserting `V::default()` first if absent.
    pub fn get_or_default(&mut self, id: &str) -> &mut V
    where
        V: Default,
    {
        self.records.entry(id.to_string()).or_default()
    }

    pub fn upsert(&mut self, id: impl Into<String>, value: V) -> Upsert {
        match self.records.insert(id.into(), value) {
            Some(_) => Upsert::Replaced,
            None => Upsert::Added,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<V> {
        self.records.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut V)> {
        self.records.iter_mut()
    }

    pub fn records(&self) -> &BTreeMap<String, V> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("counts.json");

        let store: RecordStore<u64> = RecordStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_upsert_reports_added_then_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let mut store: RecordStore<u64> = RecordStore::open(dir.path().join("a.json")).unwrap();

        assert_eq!(store.upsert("1", 5), Upsert::Added);
        assert_eq!(store.upsert("1", 6), Upsert::Replaced);
        assert_eq!(store.get("1"), Some(&6));
    }

    #[test]
    fn test_reload_discards_undumped_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store: RecordStore<u64> = RecordStore::open(dir.path().join("a.json")).unwrap();
        store.upsert("kept", 1);
        store.dump().unwrap();

        store.upsert("lost", 2);
        store.reload().unwrap();

        assert_eq!(store.get("kept"), Some(&1));
        assert!(store.get("lost").is_none());
    }

    #[test]
    fn test_dump_then_reopen_yields_equal_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("times.json");

        let mut store: RecordStore<BTreeMap<String, u64>> = RecordStore::open(&path).unwrap();
        store.get_or_default("42").insert("Factorio".to_string(), 3600);
        store.get_or_default("42").insert("Celeste".to_string(), 60);
        store.upsert("7", BTreeMap::from([("Tetris".to_string(), 1)]));
        store.dump().unwrap();

        let reopened: RecordStore<BTreeMap<String, u64>> = RecordStore::open(&path).unwrap();
        assert_eq!(reopened.records(), store.records());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let result: Result<RecordStore<u64>, _> = RecordStore::open(&path);
        assert!(matches!(result, Err(StoreError::Json { .. })));
    }
}
