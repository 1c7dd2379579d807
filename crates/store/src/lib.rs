//! Storage boundary for records.
//!
//! Commands only see the [`Storage`] contract and the get/save strategies
//! layered on top of it. How records are physically kept is up to the
//! implementation; an in-memory store and a JSON snapshot store ship here.

pub mod error;
pub mod file;
pub mod in_memory;
pub mod storage;
pub mod strategies;

pub use error::StoreError;
pub use file::JsonFileStorage;
pub use in_memory::InMemoryStorage;
pub use storage::{Combine, Filter, Predicate, Storage};
pub use strategies::{GetStrategy, RelatedGetStrategy, RelatedSaveStrategy, SaveStrategy};
