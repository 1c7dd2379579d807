//! Record trait: identity, label and by-name field access.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::id::EntityId;

/// Reference from one record to another record of kind `kind`.
///
/// A lookup association, not ownership: the target must already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relation {
    pub kind: &'static str,
    pub id: EntityId,
}

impl Relation {
    pub const fn new(kind: &'static str, id: EntityId) -> Self {
        Self { kind, id }
    }
}

/// A typed record managed by the commands.
pub trait Record: Clone + core::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable storage name of the record type (e.g. `"host"`).
    const KIND: &'static str;

    /// Storage-assigned identifier; `None` until first saved.
    fn id(&self) -> Option<EntityId>;

    /// Called by storage when the record is first persisted.
    fn set_id(&mut self, id: EntityId);

    fn label(&self) -> Option<&str>;

    fn set_label(&mut self, label: Option<String>);

    /// Records this one refers to.
    fn relations(&self) -> Vec<Relation> {
        Vec::new()
    }

    /// Value of a named field, `None` when unset or empty.
    fn field(&self, name: &str) -> Option<String>;

    /// Short human-readable handle, e.g. `host 3 (web1)`.
    fn describe(&self) -> String {
        let id = self
            .id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "new".to_string());
        match self.label() {
            Some(label) => format!("{} {id} ({label})", Self::KIND),
            None => format!("{} {id}", Self::KIND),
        }
    }
}

/// Normalize an optional string field: empty strings count as unset.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
