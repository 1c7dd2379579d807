//! Operations a detail command may perform, and the per-command configuration
//! that gates them.

use std::collections::BTreeSet;

use crate::error::{CoreError, CoreResult};
use crate::required::RequiredOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Every operation a detail command knows about.
    pub const ALL: [Operation; 3] = [Operation::Delete, Operation::Update, Operation::Create];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of operations a command type supports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOperations(BTreeSet<Operation>);

impl AllowedOperations {
    pub fn new(ops: impl IntoIterator<Item = Operation>) -> Self {
        Self(ops.into_iter().collect())
    }

    pub fn all() -> Self {
        Self::new(Operation::ALL)
    }

    pub fn allows(&self, op: Operation) -> bool {
        self.0.contains(&op)
    }

    pub fn allows_any(&self, ops: &[Operation]) -> bool {
        ops.iter().any(|op| self.allows(*op))
    }

    pub fn is_empty(&self) -> bool {
        !self.allows_any(&Operation::ALL)
    }

    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ {
        self.0.iter().copied()
    }
}

/// Validated capability configuration of a command type.
///
/// Built once when the command is constructed; the argument surface and the
/// dispatcher only read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConfig {
    allowed: AllowedOperations,
    required: RequiredOptions,
}

impl CommandConfig {
    /// Fails when no operation is allowed, or when requirement rules are
    /// declared for an operation the command does not allow.
    pub fn new(allowed: AllowedOperations, required: RequiredOptions) -> CoreResult<Self> {
        if allowed.is_empty() {
            return Err(CoreError::invalid_command(
                "a detail command must allow at least one of create, update, delete",
            ));
        }
        if let Some(op) = required.operations().find(|op| !allowed.allows(*op)) {
            return Err(CoreError::invalid_command(format!(
                "required options declared for '{op}', which is not allowed"
            )));
        }
        Ok(Self { allowed, required })
    }

    pub fn allowed(&self) -> &AllowedOperations {
        &self.allowed
    }

    pub fn required(&self) -> &RequiredOptions {
        &self.required
    }

    pub fn allows(&self, op: Operation) -> bool {
        self.allowed.allows(op)
    }
}
