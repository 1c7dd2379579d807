//! `sshconfig-core` — record types and rules shared by every command.
//!
//! This crate contains **pure** building blocks (no storage, no CLI parsing).

pub mod binding;
pub mod entity;
pub mod error;
pub mod id;
pub mod models;
pub mod operation;
pub mod required;

pub use binding::{BindingSpec, ForwardingType};
pub use entity::{Record, Relation};
pub use error::{CoreError, CoreResult};
pub use id::EntityId;
pub use models::{Host, PfRule};
pub use operation::{AllowedOperations, CommandConfig, Operation};
pub use required::RequiredOptions;
