//! Detail command: create, update or delete records of one type.
//!
//! Lifecycle of an invocation:
//!
//! 1. **built**: [`DetailCommand::new`] validates the handler's capability
//!    configuration and [`DetailCommand::build_parser`] assembles the
//!    argument surface from it;
//! 2. **parsed**: raw input becomes [`ParsedArgs`];
//! 3. **dispatched**: [`DetailCommand::take_action`] runs exactly one of the
//!    create, update and delete paths and returns an [`Outcome`].

use std::ffi::OsString;

use clap::{Arg, ArgAction, ArgMatches, Command};
use sshconfig_core::{CommandConfig, CoreError, CoreResult, Operation, Record};
use sshconfig_store::{SaveStrategy, Storage};

use crate::args::ParsedArgs;
use crate::handler::EntityHandler;
use crate::lookup;
use crate::prompt::Prompter;
use crate::relation::RelationResolver;

/// Result of a dispatched invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R> {
    Created(R),
    Updated(Vec<R>),
    Deleted(Vec<R>),
    /// Entry tokens were given but no enabled operation consumes them.
    Nothing,
}

pub struct DetailCommand<H: EntityHandler, S> {
    handler: H,
    storage: S,
    config: CommandConfig,
    get_strategy: H::Get,
    save_strategy: H::Save,
    prompter: Option<Box<dyn Prompter>>,
}

impl<H, S> DetailCommand<H, S>
where
    H: EntityHandler,
    S: Storage,
{
    /// Fails with `InvalidCommand` when the handler allows no operation or
    /// declares requirement rules for an operation it does not allow.
    pub fn new(handler: H, storage: S) -> CoreResult<Self> {
        let config = CommandConfig::new(handler.allowed_operations(), handler.required_options())?;
        Ok(Self {
            handler,
            storage,
            config,
            get_strategy: H::Get::default(),
            save_strategy: H::Save::default(),
            prompter: None,
        })
    }

    /// Attach the prompter used when `--interactive` is passed.
    pub fn with_prompter(mut self, prompter: Box<dyn Prompter>) -> Self {
        self.prompter = Some(prompter);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn allows(&self, op: Operation) -> bool {
        self.config.allows(op)
    }

    /// Argument surface for this command.
    pub fn build_parser(&self) -> Command {
        argument_surface(&self.handler, &self.config)
    }

    pub fn parse_matches(&self, matches: &ArgMatches) -> ParsedArgs {
        let mut args = ParsedArgs::new();
        if self.allows(Operation::Delete) {
            args.delete = matches.get_flag("delete");
        }
        if exposes_record_options(&self.config) {
            args.interactive = matches.get_flag("interactive");
            args.label = matches.get_one::<String>("label").cloned();
        }
        if exposes_entries(&self.config) {
            args.entry = matches
                .get_many::<String>("entry")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
        }
        self.handler.read_args(matches, &mut args);
        args
    }

    /// Parse a full argument vector (program name first).
    pub fn parse_from<I, T>(&self, argv: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.build_parser().try_get_matches_from(argv)?;
        Ok(self.parse_matches(&matches))
    }

    /// Dispatch, in order: delete (flag set), create (no entries), update
    /// (entries given).
    pub fn take_action(&mut self, args: &ParsedArgs) -> CoreResult<Outcome<H::Record>> {
        if self.allows(Operation::Delete) && args.delete {
            return self.delete(args).map(Outcome::Deleted);
        }
        if self.allows(Operation::Create) && !args.has_entries() {
            return self.create(args).map(Outcome::Created);
        }
        if self.allows(Operation::Update) && args.has_entries() {
            return self.update(args).map(Outcome::Updated);
        }
        if !args.has_entries() {
            // Update- or delete-only command invoked without anything to act on.
            return Err(entries_required());
        }

        tracing::warn!(
            command = self.handler.name(),
            entries = ?args.entry,
            "no enabled operation accepts entry tokens; nothing done"
        );
        Ok(Outcome::Nothing)
    }

    pub fn create(&mut self, args: &ParsedArgs) -> CoreResult<H::Record> {
        let mut args = args.clone();
        self.fill_interactively(Operation::Create, &mut args, None)?;

        let resolver = RelationResolver::new(&self.storage, &self.get_strategy);
        let mut instance = self.handler.serialize_args(&args, None, &resolver)?;
        apply_label(&mut instance, &args);
        self.config.required().validate(Operation::Create, &instance)?;

        let saved = self.save_strategy.save(&self.storage, instance)?;
        tracing::info!(kind = H::Record::KIND, id = ?saved.id(), "created");
        Ok(saved)
    }

    /// Every resolved record is attempted; records that saved stay updated
    /// and the failures are reported together.
    pub fn update(&mut self, args: &ParsedArgs) -> CoreResult<Vec<H::Record>> {
        if !args.has_entries() {
            return Err(entries_required());
        }
        let instances = self.get_objects(&args.entry)?;

        let mut updated = Vec::with_capacity(instances.len());
        let mut failures = Vec::new();
        for instance in instances {
            let described = instance.describe();
            match self.update_instance(args, instance) {
                Ok(saved) => updated.push(saved),
                Err(err) => {
                    tracing::warn!(kind = H::Record::KIND, record = %described, error = %err, "update failed");
                    failures.push(format!("{described}: {err}"));
                }
            }
        }

        if failures.is_empty() {
            Ok(updated)
        } else {
            Err(CoreError::PartialFailure {
                operation: Operation::Update.as_str(),
                failures,
            })
        }
    }

    /// Every resolved record is attempted; failures are reported together.
    pub fn delete(&mut self, args: &ParsedArgs) -> CoreResult<Vec<H::Record>> {
        if !args.has_entries() {
            return Err(entries_required());
        }
        let instances = self.get_objects(&args.entry)?;

        let mut deleted = Vec::with_capacity(instances.len());
        let mut failures = Vec::new();
        for instance in instances {
            match self.save_strategy.delete(&self.storage, &instance) {
                Ok(()) => {
                    tracing::info!(kind = H::Record::KIND, id = ?instance.id(), "deleted");
                    deleted.push(instance);
                }
                Err(err) => {
                    tracing::warn!(kind = H::Record::KIND, id = ?instance.id(), error = %err, "delete failed");
                    failures.push(format!("{}: {err}", instance.describe()));
                }
            }
        }

        if failures.is_empty() {
            Ok(deleted)
        } else {
            Err(CoreError::PartialFailure {
                operation: Operation::Delete.as_str(),
                failures,
            })
        }
    }

    /// Records matching any of the ID or label tokens.
    pub fn get_objects(&self, tokens: &[String]) -> CoreResult<Vec<H::Record>> {
        lookup::get_objects(&self.storage, tokens)
    }

    fn update_instance(&mut self, args: &ParsedArgs, instance: H::Record) -> CoreResult<H::Record> {
        let mut args = args.clone();
        self.fill_interactively(Operation::Update, &mut args, Some(&instance))?;

        let resolver = RelationResolver::new(&self.storage, &self.get_strategy);
        let mut instance = self.handler.serialize_args(&args, Some(instance), &resolver)?;
        apply_label(&mut instance, &args);
        self.config.required().validate(Operation::Update, &instance)?;

        let saved = self.save_strategy.save(&self.storage, instance)?;
        tracing::info!(kind = H::Record::KIND, id = ?saved.id(), "updated");
        Ok(saved)
    }

    /// Ask for each required field that neither the arguments nor the
    /// existing record provide.
    fn fill_interactively(
        &mut self,
        op: Operation,
        args: &mut ParsedArgs,
        existing: Option<&H::Record>,
    ) -> CoreResult<()> {
        if !args.interactive {
            return Ok(());
        }
        let Some(prompter) = self.prompter.as_mut() else {
            return Ok(());
        };

        for field in self.config.required().fields(op) {
            let known = args.has(field) || existing.is_some_and(|r| r.field(field).is_some());
            if known {
                continue;
            }
            if let Some(answer) = prompter.prompt(field)? {
                let answer = answer.trim();
                if !answer.is_empty() {
                    args.set(*field, answer);
                }
            }
        }
        Ok(())
    }
}

/// Argument surface of a detail command; only options backed by an allowed
/// operation are present.
pub fn argument_surface<H: EntityHandler>(handler: &H, config: &CommandConfig) -> Command {
    let mut cmd = Command::new(handler.name()).about(handler.about());

    if config.allows(Operation::Delete) {
        cmd = cmd.arg(
            Arg::new("delete")
                .short('d')
                .long("delete")
                .action(ArgAction::SetTrue)
                .help("Delete entries."),
        );
    }
    if exposes_record_options(config) {
        cmd = cmd
            .arg(
                Arg::new("interactive")
                    .short('I')
                    .long("interactive")
                    .action(ArgAction::SetTrue)
                    .help("Enter interactive mode."),
            )
            .arg(
                Arg::new("label")
                    .short('L')
                    .long("label")
                    .value_name("NAME")
                    .help("Entry's label."),
            );
    }
    if exposes_entries(config) {
        cmd = cmd.arg(
            Arg::new("entry")
                .value_name("ID or NAME")
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Pass to edit existing entries."),
        );
    }

    handler.extend_parser(cmd)
}

fn exposes_record_options(config: &CommandConfig) -> bool {
    config.allows(Operation::Create) || config.allows(Operation::Update)
}

fn exposes_entries(config: &CommandConfig) -> bool {
    config.allows(Operation::Delete) || config.allows(Operation::Update)
}

fn entries_required() -> CoreError {
    CoreError::argument_required("at least one ID or NAME is required")
}

/// `--label ""` clears the label.
fn apply_label<R: Record>(instance: &mut R, args: &ParsedArgs) {
    if let Some(label) = &args.label {
        let label = (!label.is_empty()).then(|| label.clone());
        instance.set_label(label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sshconfig_core::{AllowedOperations, Host, RequiredOptions};
    use sshconfig_store::{InMemoryStorage, RelatedGetStrategy, RelatedSaveStrategy};

    /// Handler with configurable capabilities over plain hosts.
    struct TestHandler {
        ops: Vec<Operation>,
        required: RequiredOptions,
    }

    impl TestHandler {
        fn allowing(ops: &[Operation]) -> Self {
            Self {
                ops: ops.to_vec(),
                required: RequiredOptions::default(),
            }
        }
    }

    impl EntityHandler for TestHandler {
        type Record = Host;
        type Get = RelatedGetStrategy;
        type Save = RelatedSaveStrategy;

        fn name(&self) -> &'static str {
            "thing"
        }

        fn about(&self) -> &'static str {
            "Test records."
        }

        fn allowed_operations(&self) -> AllowedOperations {
            AllowedOperations::new(self.ops.iter().copied())
        }

        fn required_options(&self) -> RequiredOptions {
            self.required.clone()
        }

        fn serialize_args<St: Storage>(
            &self,
            args: &ParsedArgs,
            instance: Option<Host>,
            _relations: &RelationResolver<'_, St, RelatedGetStrategy>,
        ) -> CoreResult<Host> {
            let mut host = instance.unwrap_or_default();
            if let Some(address) = args.value("address") {
                host.address = Some(address.to_string());
            }
            Ok(host)
        }
    }

    fn command(ops: &[Operation]) -> DetailCommand<TestHandler, InMemoryStorage> {
        DetailCommand::new(TestHandler::allowing(ops), InMemoryStorage::new()).unwrap()
    }

    fn arg_ids(cmd: &Command) -> Vec<String> {
        cmd.get_arguments().map(|a| a.get_id().to_string()).collect()
    }

    #[test]
    fn construction_requires_an_allowed_operation() {
        let result = DetailCommand::new(TestHandler::allowing(&[]), InMemoryStorage::new());
        assert!(matches!(result, Err(CoreError::InvalidCommand(_))));
    }

    #[test]
    fn delete_only_surface_has_flag_and_entries() {
        let ids = arg_ids(&command(&[Operation::Delete]).build_parser());
        assert!(ids.contains(&"delete".to_string()));
        assert!(ids.contains(&"entry".to_string()));
        assert!(!ids.contains(&"interactive".to_string()));
        assert!(!ids.contains(&"label".to_string()));
    }

    #[test]
    fn create_only_surface_has_no_entries() {
        let ids = arg_ids(&command(&[Operation::Create]).build_parser());
        assert!(ids.contains(&"interactive".to_string()));
        assert!(ids.contains(&"label".to_string()));
        assert!(!ids.contains(&"delete".to_string()));
        assert!(!ids.contains(&"entry".to_string()));
    }

    #[test]
    fn create_only_rejects_positional_tokens_at_parse_time() {
        let cmd = command(&[Operation::Create]);
        assert!(cmd.parse_from(["thing", "3"]).is_err());
    }

    #[test]
    fn parse_reads_common_options() {
        let cmd = command(&Operation::ALL);
        let args = cmd.parse_from(["thing", "-d", "-L", "web", "3", "web1"]).unwrap();
        assert!(args.delete);
        assert_eq!(args.label.as_deref(), Some("web"));
        assert_eq!(args.entry, vec!["3".to_string(), "web1".to_string()]);
    }

    #[test]
    fn create_only_with_tokens_does_nothing() {
        let mut cmd = command(&[Operation::Create]);
        let outcome = cmd
            .take_action(&ParsedArgs::new().with_entries(["3"]))
            .unwrap();
        assert_eq!(outcome, Outcome::Nothing);
        assert!(cmd.storage().all::<Host>().unwrap().is_empty());
    }

    #[test]
    fn update_only_without_tokens_requires_entries() {
        let mut cmd = command(&[Operation::Update]);
        let err = cmd.take_action(&ParsedArgs::new()).unwrap_err();
        assert!(matches!(err, CoreError::ArgumentRequired(_)));
    }

    #[test]
    fn delete_flag_without_tokens_requires_entries() {
        let mut cmd = command(&Operation::ALL);
        let err = cmd.take_action(&ParsedArgs::new().with_delete()).unwrap_err();
        assert_eq!(
            err,
            CoreError::argument_required("at least one ID or NAME is required")
        );
    }

    #[test]
    fn delete_flag_is_ignored_when_delete_is_not_allowed() {
        let mut cmd = command(&[Operation::Create, Operation::Update]);
        let outcome = cmd.take_action(&ParsedArgs::new().with_delete()).unwrap();
        assert!(matches!(outcome, Outcome::Created(_)));
    }

    #[test]
    fn create_update_delete_roundtrip() {
        let mut cmd = command(&Operation::ALL);

        let created = match cmd
            .take_action(&ParsedArgs::new().with_label("web1").with_value("address", "10.0.0.1"))
            .unwrap()
        {
            Outcome::Created(host) => host,
            other => panic!("Expected Created, got {other:?}"),
        };
        assert_eq!(created.label.as_deref(), Some("web1"));

        let updated = cmd
            .take_action(&ParsedArgs::new().with_entries(["web1"]).with_value("address", "10.0.0.2"))
            .unwrap();
        match updated {
            Outcome::Updated(hosts) => {
                assert_eq!(hosts.len(), 1);
                assert_eq!(hosts[0].id, created.id);
                assert_eq!(hosts[0].address.as_deref(), Some("10.0.0.2"));
            }
            other => panic!("Expected Updated, got {other:?}"),
        }

        let deleted = cmd
            .take_action(&ParsedArgs::new().with_entries(["1"]).with_delete())
            .unwrap();
        assert!(matches!(deleted, Outcome::Deleted(ref hosts) if hosts.len() == 1));
        assert!(cmd.storage().all::<Host>().unwrap().is_empty());
    }

    #[test]
    fn empty_label_clears_it() {
        let mut cmd = command(&Operation::ALL);
        cmd.create(&ParsedArgs::new().with_label("web1")).unwrap();
        let hosts = cmd
            .update(&ParsedArgs::new().with_entries(["web1"]).with_label(""))
            .unwrap();
        assert_eq!(hosts[0].label, None);
    }

    #[test]
    fn interactive_mode_prompts_for_missing_required_fields() {
        let handler = TestHandler {
            ops: Operation::ALL.to_vec(),
            required: RequiredOptions::new().with(Operation::Create, ["address"]),
        };
        let mut asked = Vec::new();
        let mut cmd = DetailCommand::new(handler, InMemoryStorage::new())
            .unwrap()
            .with_prompter(Box::new(move |field: &str| -> CoreResult<Option<String>> {
                asked.push(field.to_string());
                assert_eq!(asked, vec!["address".to_string()]);
                Ok(Some(" 10.0.0.9 ".to_string()))
            }));

        let mut args = ParsedArgs::new();
        args.interactive = true;
        let host = cmd.create(&args).unwrap();
        assert_eq!(host.address.as_deref(), Some("10.0.0.9"));
    }

    #[test]
    fn missing_required_field_without_prompter_fails() {
        let handler = TestHandler {
            ops: Operation::ALL.to_vec(),
            required: RequiredOptions::new().with(Operation::Create, ["address"]),
        };
        let mut cmd = DetailCommand::new(handler, InMemoryStorage::new()).unwrap();
        let mut args = ParsedArgs::new();
        args.interactive = true;
        let err = cmd.create(&args).unwrap_err();
        assert_eq!(
            err,
            CoreError::argument_required("address required to create host")
        );
    }

    #[test]
    fn update_rules_are_checked_against_the_updated_record() {
        let handler = TestHandler {
            ops: Operation::ALL.to_vec(),
            required: RequiredOptions::new().with(Operation::Update, ["port"]),
        };
        let mut cmd = DetailCommand::new(handler, InMemoryStorage::new()).unwrap();
        cmd.create(&ParsedArgs::new().with_label("web1")).unwrap();

        let err = cmd
            .update(&ParsedArgs::new().with_entries(["web1"]).with_value("address", "10.0.0.2"))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::PartialFailure {
                operation: "update",
                failures: vec!["host 1 (web1): port required to update host".to_string()],
            }
        );

        let stored: Vec<Host> = cmd.storage().all().unwrap();
        assert_eq!(stored[0].address, None);
    }
}
