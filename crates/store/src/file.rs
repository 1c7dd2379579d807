use std::fs;
use std::path::PathBuf;

use sshconfig_core::{EntityId, Record};

use crate::error::StoreError;
use crate::in_memory::{InMemoryStorage, Tables};
use crate::storage::{Filter, Storage};

/// Store that keeps records in memory and rewrites a JSON snapshot after
/// every mutation.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    inner: InMemoryStorage,
}

impl JsonFileStorage {
    /// Load the snapshot at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tables = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Tables::default()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Tables::default()
        };
        tracing::debug!(path = %path.display(), "opened record store");
        Ok(Self {
            path,
            inner: InMemoryStorage::from_tables(tables),
        })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let tables = self.inner.snapshot()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // A failed write must leave the previous snapshot intact.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&tables)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn filter<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, StoreError> {
        self.inner.filter(filter)
    }

    fn save<R: Record>(&self, record: R) -> Result<R, StoreError> {
        let saved = self.inner.save(record)?;
        self.flush()?;
        Ok(saved)
    }

    fn delete<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        self.inner.delete(record)?;
        self.flush()
    }

    fn contains(&self, kind: &str, id: EntityId) -> Result<bool, StoreError> {
        self.inner.contains(kind, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sshconfig_core::Host;

    #[test]
    fn records_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStorage::open(&path).unwrap();
        let saved = store
            .save(Host {
                label: Some("web1".to_string()),
                address: Some("10.0.0.1".to_string()),
                ..Host::default()
            })
            .unwrap();
        drop(store);

        let reopened = JsonFileStorage::open(&path).unwrap();
        let hosts: Vec<Host> = reopened.all().unwrap();
        assert_eq!(hosts, vec![saved]);

        // The id sequence is persisted too.
        let next = reopened.save(Host::default()).unwrap();
        assert_eq!(next.id, Some(EntityId::new(2)));
    }

    #[test]
    fn deletes_are_flushed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStorage::open(&path).unwrap();
        let saved = store.save(Host::default()).unwrap();
        store.delete(&saved).unwrap();

        let reopened = JsonFileStorage::open(&path).unwrap();
        assert!(reopened.all::<Host>().unwrap().is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        match JsonFileStorage::open(&path).unwrap_err() {
            StoreError::Serde(_) => {}
            other => panic!("Expected Serde error, got {other:?}"),
        }
    }
}
