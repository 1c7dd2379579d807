//! Entity handlers, one per record type.

pub mod host;
pub mod pf_rule;

pub use host::HostHandler;
pub use pf_rule::PfRuleHandler;
