//! Requirement rules: per-operation mandatory fields.

use std::collections::BTreeMap;

use crate::entity::Record;
use crate::error::{CoreError, CoreResult};
use crate::operation::Operation;

/// Ordered field names that must be non-empty before an operation completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredOptions {
    rules: BTreeMap<Operation, Vec<&'static str>>,
}

impl RequiredOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, op: Operation, fields: impl IntoIterator<Item = &'static str>) -> Self {
        self.rules.entry(op).or_default().extend(fields);
        self
    }

    pub fn fields(&self, op: Operation) -> &[&'static str] {
        self.rules.get(&op).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.rules.keys().copied()
    }

    /// Names of the fields required by `op` that `record` leaves empty.
    pub fn missing<R: Record>(&self, op: Operation, record: &R) -> Vec<&'static str> {
        self.fields(op)
            .iter()
            .copied()
            .filter(|name| record.field(name).is_none())
            .collect()
    }

    /// Fails with `ArgumentRequired` naming every missing field.
    pub fn validate<R: Record>(&self, op: Operation, record: &R) -> CoreResult<()> {
        let missing = self.missing(op, record);
        if missing.is_empty() {
            return Ok(());
        }
        Err(CoreError::argument_required(format!(
            "{} required to {op} {}",
            missing.join(", "),
            R::KIND
        )))
    }
}
