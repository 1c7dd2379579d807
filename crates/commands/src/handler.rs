use clap::{ArgMatches, Command};
use sshconfig_core::{AllowedOperations, CoreResult, Record, RequiredOptions};
use sshconfig_store::{GetStrategy, SaveStrategy, Storage};

use crate::args::ParsedArgs;
use crate::relation::RelationResolver;

/// Per-record-type part of a detail command.
///
/// The detail command owns dispatch, lookup, validation and persistence; a
/// handler only declares what its command supports and turns parsed
/// arguments into a record.
pub trait EntityHandler {
    type Record: Record;
    /// Relation-resolution policy used while serializing arguments.
    type Get: GetStrategy;
    /// Persistence policy used for create, update and delete.
    type Save: SaveStrategy;

    /// Subcommand name.
    fn name(&self) -> &'static str;

    fn about(&self) -> &'static str;

    fn allowed_operations(&self) -> AllowedOperations;

    fn required_options(&self) -> RequiredOptions {
        RequiredOptions::default()
    }

    /// Add record-specific arguments to the generated parser.
    fn extend_parser(&self, cmd: Command) -> Command {
        cmd
    }

    /// Copy record-specific arguments out of clap's matches.
    fn read_args(&self, _matches: &ArgMatches, _args: &mut ParsedArgs) {}

    /// Build a new record (`instance` is `None`) or apply `args` to an
    /// existing one.
    fn serialize_args<S: Storage>(
        &self,
        args: &ParsedArgs,
        instance: Option<Self::Record>,
        relations: &RelationResolver<'_, S, Self::Get>,
    ) -> CoreResult<Self::Record>;
}
