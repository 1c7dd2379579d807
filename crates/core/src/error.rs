//! Command error model.

use thiserror::Error;

/// Result type used across commands, strategies and parsers.
pub type CoreResult<T> = Result<T, CoreError>;

/// Error raised by a command invocation.
///
/// Every variant is caller/input driven; none of them is retried. They
/// propagate unchanged to the binary, which renders the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A mandatory argument was omitted.
    #[error("{0}")]
    ArgumentRequired(String),

    /// A lookup found no matching record.
    #[error("{0}")]
    DoesNotExist(String),

    /// A supplied value failed structural validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A forwarding binding string did not match its grammar.
    #[error("invalid binding format: '{binding}'")]
    InvalidBinding { binding: String },

    /// A relation token matched more than one record.
    #[error("'{token}' matches {count} {kind} entries")]
    Ambiguous {
        kind: &'static str,
        token: String,
        count: usize,
    },

    /// A command type was declared with an unusable configuration.
    #[error("invalid command definition: {0}")]
    InvalidCommand(String),

    /// Some records of a batch operation failed; the others went through.
    #[error("{operation} failed for {}: {}", failures.len(), failures.join("; "))]
    PartialFailure {
        operation: &'static str,
        failures: Vec<String>,
    },

    /// The storage layer reported an error.
    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn argument_required(msg: impl Into<String>) -> Self {
        Self::ArgumentRequired(msg.into())
    }

    pub fn does_not_exist(msg: impl Into<String>) -> Self {
        Self::DoesNotExist(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_binding(binding: impl Into<String>) -> Self {
        Self::InvalidBinding {
            binding: binding.into(),
        }
    }

    pub fn invalid_command(msg: impl Into<String>) -> Self {
        Self::InvalidCommand(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// `true` for [`CoreError::InvalidArgument`] and its binding specialization.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidBinding { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_binding_is_an_invalid_argument() {
        let err = CoreError::invalid_binding("8080");
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "invalid binding format: '8080'");
    }

    #[test]
    fn partial_failure_lists_every_failed_entry() {
        let err = CoreError::PartialFailure {
            operation: "delete",
            failures: vec!["3 (web1): gone".to_string(), "4: gone".to_string()],
        };
        assert_eq!(err.to_string(), "delete failed for 2: 3 (web1): gone; 4: gone");
    }
}
