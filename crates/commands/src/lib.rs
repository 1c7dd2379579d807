//! Entity commands: the capability-gated detail command, list command,
//! entity lookup and the per-record-type handlers.

pub mod args;
pub mod detail;
pub mod handler;
pub mod handlers;
pub mod list;
pub mod lookup;
pub mod prompt;
pub mod relation;

pub use args::ParsedArgs;
pub use detail::{DetailCommand, Outcome, argument_surface};
pub use handler::EntityHandler;
pub use handlers::{HostHandler, PfRuleHandler};
pub use list::{ListArgs, ListCommand, list_surface};
pub use lookup::{get_objects, parse_ids_names};
pub use prompt::Prompter;
pub use relation::RelationResolver;
