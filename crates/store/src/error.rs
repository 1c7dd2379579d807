use sshconfig_core::{CoreError, EntityId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} does not exist")]
    NotFound { kind: &'static str, id: EntityId },

    #[error("{kind} has not been saved yet")]
    NotPersisted { kind: &'static str },

    #[error("record (de)serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => CoreError::does_not_exist(err.to_string()),
            other => CoreError::storage(other.to_string()),
        }
    }
}
