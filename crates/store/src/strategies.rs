//! Pluggable relation-resolution and persistence policies.
//!
//! Each entity handler names the strategies it wants as associated types, so
//! record kinds can resolve and persist relations differently without the
//! detail command knowing about it.

use sshconfig_core::{CoreError, CoreResult, EntityId, Record};

use crate::storage::{Filter, Predicate, Storage};

/// Resolves a single related record from a user token (ID or label).
pub trait GetStrategy: Default {
    fn get<S: Storage, R: Record>(&self, storage: &S, token: &str) -> CoreResult<R>;
}

/// Persists and removes records.
pub trait SaveStrategy: Default {
    fn save<S: Storage, R: Record>(&self, storage: &S, record: R) -> CoreResult<R>;

    fn delete<S: Storage, R: Record>(&self, storage: &S, record: &R) -> CoreResult<()>;
}

/// Matches the token against ids and labels; exactly one record must match.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelatedGetStrategy;

impl GetStrategy for RelatedGetStrategy {
    fn get<S: Storage, R: Record>(&self, storage: &S, token: &str) -> CoreResult<R> {
        let mut predicates = vec![Predicate::LabelIn(vec![token.to_string()])];
        if let Ok(id) = token.parse::<EntityId>() {
            predicates.push(Predicate::IdIn(vec![id]));
        }

        let mut found: Vec<R> = storage.filter(&Filter::any(predicates))?;
        match found.len() {
            0 => Err(CoreError::does_not_exist(format!(
                "{} '{token}' does not exist",
                R::KIND
            ))),
            1 => Ok(found.remove(0)),
            count => Err(CoreError::Ambiguous {
                kind: R::KIND,
                token: token.to_string(),
                count,
            }),
        }
    }
}

/// Verifies that every relation target still exists before saving.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelatedSaveStrategy;

impl SaveStrategy for RelatedSaveStrategy {
    fn save<S: Storage, R: Record>(&self, storage: &S, record: R) -> CoreResult<R> {
        for relation in record.relations() {
            if !storage.contains(relation.kind, relation.id)? {
                return Err(CoreError::does_not_exist(format!(
                    "{} {} referenced by {} does not exist",
                    relation.kind,
                    relation.id,
                    record.describe()
                )));
            }
        }
        let saved = storage.save(record)?;
        tracing::debug!(kind = R::KIND, id = ?saved.id(), "record saved");
        Ok(saved)
    }

    fn delete<S: Storage, R: Record>(&self, storage: &S, record: &R) -> CoreResult<()> {
        storage.delete(record)?;
        tracing::debug!(kind = R::KIND, id = ?record.id(), "record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStorage;
    use sshconfig_core::{Host, PfRule};

    fn seed(store: &InMemoryStorage, label: &str) -> Host {
        store
            .save(Host {
                label: Some(label.to_string()),
                ..Host::default()
            })
            .unwrap()
    }

    #[test]
    fn get_resolves_by_id_or_label() {
        let store = InMemoryStorage::new();
        let web = seed(&store, "web1");
        seed(&store, "db1");

        let by_label: Host = RelatedGetStrategy.get(&store, "web1").unwrap();
        let by_id: Host = RelatedGetStrategy.get(&store, "1").unwrap();
        assert_eq!(by_label, web);
        assert_eq!(by_id, web);
    }

    #[test]
    fn get_reports_missing_relation() {
        let store = InMemoryStorage::new();
        match RelatedGetStrategy.get::<_, Host>(&store, "nope").unwrap_err() {
            CoreError::DoesNotExist(msg) => assert_eq!(msg, "host 'nope' does not exist"),
            other => panic!("Expected DoesNotExist, got {other:?}"),
        }
    }

    #[test]
    fn get_refuses_to_pick_between_duplicates() {
        let store = InMemoryStorage::new();
        seed(&store, "web");
        seed(&store, "web");

        let err = RelatedGetStrategy.get::<_, Host>(&store, "web").unwrap_err();
        assert_eq!(
            err,
            CoreError::Ambiguous {
                kind: "host",
                token: "web".to_string(),
                count: 2,
            }
        );
    }

    #[test]
    fn numeric_label_colliding_with_an_id_is_ambiguous() {
        let store = InMemoryStorage::new();
        seed(&store, "alpha");
        seed(&store, "1");

        let err = RelatedGetStrategy.get::<_, Host>(&store, "1").unwrap_err();
        assert!(matches!(err, CoreError::Ambiguous { count: 2, .. }));
    }

    #[test]
    fn save_rejects_dangling_relations() {
        let store = InMemoryStorage::new();
        let host = seed(&store, "web1");
        let rule = PfRule {
            host: host.id,
            ..PfRule::default()
        };
        RelatedSaveStrategy.delete(&store, &host).unwrap();

        match RelatedSaveStrategy.save(&store, rule).unwrap_err() {
            CoreError::DoesNotExist(msg) => {
                assert_eq!(msg, "host 1 referenced by pfrule new does not exist")
            }
            other => panic!("Expected DoesNotExist, got {other:?}"),
        }
    }

    #[test]
    fn save_persists_records_with_live_relations() {
        let store = InMemoryStorage::new();
        let host = seed(&store, "web1");
        let rule = RelatedSaveStrategy
            .save(
                &store,
                PfRule {
                    host: host.id,
                    ..PfRule::default()
                },
            )
            .unwrap();
        assert!(rule.id.is_some());
    }
}
