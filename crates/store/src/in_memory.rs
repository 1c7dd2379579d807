use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sshconfig_core::{EntityId, Record};

use crate::error::StoreError;
use crate::storage::{Filter, Storage};

/// Records of every kind, keyed by kind then id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Tables {
    /// Last id handed out per kind; ids are never reused.
    #[serde(default)]
    sequences: BTreeMap<String, u64>,
    #[serde(default)]
    records: BTreeMap<String, BTreeMap<u64, JsonValue>>,
}

/// In-memory record store.
///
/// Intended for tests and as the working set of [`crate::JsonFileStorage`].
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    tables: RwLock<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    pub(crate) fn snapshot(&self) -> Result<Tables, StoreError> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Storage for InMemoryStorage {
    fn filter<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, StoreError> {
        let tables = self.read()?;
        let Some(table) = tables.records.get(R::KIND) else {
            return Ok(vec![]);
        };

        let mut matched = Vec::new();
        for value in table.values() {
            let record: R = serde_json::from_value(value.clone())?;
            if filter.matches(&record) {
                matched.push(record);
            }
        }
        Ok(matched)
    }

    fn save<R: Record>(&self, mut record: R) -> Result<R, StoreError> {
        let mut tables = self.write()?;

        let id = match record.id() {
            Some(id) => {
                let exists = tables
                    .records
                    .get(R::KIND)
                    .is_some_and(|t| t.contains_key(&id.get()));
                if !exists {
                    return Err(StoreError::NotFound { kind: R::KIND, id });
                }
                id
            }
            None => {
                let seq = tables.sequences.entry(R::KIND.to_string()).or_insert(0);
                let id = EntityId::new(*seq).next();
                *seq = id.get();
                record.set_id(id);
                id
            }
        };

        let value = serde_json::to_value(&record)?;
        tables
            .records
            .entry(R::KIND.to_string())
            .or_default()
            .insert(id.get(), value);
        Ok(record)
    }

    fn delete<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let id = record
            .id()
            .ok_or(StoreError::NotPersisted { kind: R::KIND })?;
        let mut tables = self.write()?;
        let removed = tables
            .records
            .get_mut(R::KIND)
            .and_then(|t| t.remove(&id.get()));
        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound { kind: R::KIND, id }),
        }
    }

    fn contains(&self, kind: &str, id: EntityId) -> Result<bool, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .records
            .get(kind)
            .is_some_and(|t| t.contains_key(&id.get())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Predicate;
    use sshconfig_core::{Host, PfRule};

    fn labeled(label: &str) -> Host {
        Host {
            label: Some(label.to_string()),
            address: Some(format!("{label}.example.com")),
            ..Host::default()
        }
    }

    #[test]
    fn save_assigns_sequential_ids_per_kind() {
        let store = InMemoryStorage::new();
        let a = store.save(labeled("a")).unwrap();
        let b = store.save(labeled("b")).unwrap();
        let rule = store.save(PfRule::default()).unwrap();

        assert_eq!(a.id, Some(EntityId::new(1)));
        assert_eq!(b.id, Some(EntityId::new(2)));
        assert_eq!(rule.id, Some(EntityId::new(1)));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = InMemoryStorage::new();
        let a = store.save(labeled("a")).unwrap();
        store.delete(&a).unwrap();
        let b = store.save(labeled("b")).unwrap();
        assert_eq!(b.id, Some(EntityId::new(2)));
    }

    #[test]
    fn saving_an_existing_record_overwrites_it() {
        let store = InMemoryStorage::new();
        let mut a = store.save(labeled("a")).unwrap();
        a.port = Some(2222);
        store.save(a.clone()).unwrap();

        let all: Vec<Host> = store.all().unwrap();
        assert_eq!(all, vec![a]);
    }

    #[test]
    fn saving_a_vanished_record_fails() {
        let store = InMemoryStorage::new();
        let a = store.save(labeled("a")).unwrap();
        store.delete(&a).unwrap();
        match store.save(a).unwrap_err() {
            StoreError::NotFound { kind: "host", .. } => {}
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn delete_requires_a_persisted_record() {
        let store = InMemoryStorage::new();
        match store.delete(&Host::default()).unwrap_err() {
            StoreError::NotPersisted { kind: "host" } => {}
            other => panic!("Expected NotPersisted, got {other:?}"),
        }
    }

    #[test]
    fn filter_is_scoped_to_the_record_kind() {
        let store = InMemoryStorage::new();
        store.save(labeled("a")).unwrap();
        let rules: Vec<PfRule> = store.all().unwrap();
        assert!(rules.is_empty());

        let hosts: Vec<Host> = store
            .filter(&Filter::any([Predicate::LabelIn(vec!["a".to_string()])]))
            .unwrap();
        assert_eq!(hosts.len(), 1);
        assert!(store.contains("host", EntityId::new(1)).unwrap());
        assert!(!store.contains("pfrule", EntityId::new(1)).unwrap());
    }
}
