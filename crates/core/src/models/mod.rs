//! Record types managed by the CLI.

pub mod host;
pub mod pf_rule;

pub use host::Host;
pub use pf_rule::PfRule;
