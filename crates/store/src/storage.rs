use std::sync::Arc;

use sshconfig_core::{EntityId, Record};

use crate::error::StoreError;

/// How the predicates of a [`Filter`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// At least one predicate matches.
    Any,
    /// Every predicate matches.
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// The record id is one of these.
    IdIn(Vec<EntityId>),
    /// The record label is one of these.
    LabelIn(Vec<String>),
}

impl Predicate {
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Predicate::IdIn(ids) => record.id().is_some_and(|id| ids.contains(&id)),
            Predicate::LabelIn(labels) => record
                .label()
                .is_some_and(|label| labels.iter().any(|l| l == label)),
        }
    }
}

/// Record selection passed to [`Storage::filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub combine: Combine,
    pub predicates: Vec<Predicate>,
}

impl Filter {
    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self {
            combine: Combine::Any,
            predicates: predicates.into_iter().collect(),
        }
    }

    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self {
            combine: Combine::All,
            predicates: predicates.into_iter().collect(),
        }
    }

    /// Matches every record.
    pub fn everything() -> Self {
        Self::all([])
    }

    /// `Any` over no predicates matches nothing; `All` over none matches everything.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self.combine {
            Combine::Any => self.predicates.iter().any(|p| p.matches(record)),
            Combine::All => self.predicates.iter().all(|p| p.matches(record)),
        }
    }
}

/// Persistence contract the commands depend on.
///
/// Implementations return each stored record at most once per `filter`
/// call, ordered by id.
pub trait Storage: Send + Sync {
    fn filter<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, StoreError>;

    /// Insert (assigning an id) or overwrite an existing record.
    fn save<R: Record>(&self, record: R) -> Result<R, StoreError>;

    fn delete<R: Record>(&self, record: &R) -> Result<(), StoreError>;

    /// Whether a record of `kind` with `id` exists.
    fn contains(&self, kind: &str, id: EntityId) -> Result<bool, StoreError>;

    fn all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.filter(&Filter::everything())
    }
}

impl<S> Storage for Arc<S>
where
    S: Storage,
{
    fn filter<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, StoreError> {
        (**self).filter(filter)
    }

    fn save<R: Record>(&self, record: R) -> Result<R, StoreError> {
        (**self).save(record)
    }

    fn delete<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        (**self).delete(record)
    }

    fn contains(&self, kind: &str, id: EntityId) -> Result<bool, StoreError> {
        (**self).contains(kind, id)
    }
}
