use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use sshconfig_core::{
    AllowedOperations, CoreError, CoreResult, ForwardingType, Host, Operation, PfRule,
    RequiredOptions,
};
use sshconfig_store::{RelatedGetStrategy, RelatedSaveStrategy, Storage};

use crate::args::ParsedArgs;
use crate::handler::EntityHandler;
use crate::relation::RelationResolver;

/// `(flag, discriminator, help)` for each forwarding type option.
const TYPE_FLAGS: [(&str, ForwardingType, &str); 3] = [
    ("dynamic", ForwardingType::Dynamic, "Dynamic port forwarding."),
    ("remote", ForwardingType::Remote, "Remote port forwarding."),
    ("local", ForwardingType::Local, "Local port forwarding."),
];

/// Operate with port-forwarding rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct PfRuleHandler;

impl PfRuleHandler {
    /// Type flags store the letter; interactive answers may also use the name.
    fn requested_type(args: &ParsedArgs) -> CoreResult<Option<ForwardingType>> {
        args.value("type").map(str::parse::<ForwardingType>).transpose()
    }
}

impl EntityHandler for PfRuleHandler {
    type Record = PfRule;
    type Get = RelatedGetStrategy;
    type Save = RelatedSaveStrategy;

    fn name(&self) -> &'static str {
        "pfrule"
    }

    fn about(&self) -> &'static str {
        "Operate with a port forwarding rule."
    }

    fn allowed_operations(&self) -> AllowedOperations {
        AllowedOperations::all()
    }

    fn required_options(&self) -> RequiredOptions {
        RequiredOptions::new().with(Operation::Create, ["host", "type", "binding"])
    }

    fn extend_parser(&self, cmd: Command) -> Command {
        let mut cmd = cmd.arg(
            Arg::new("host")
                .short('H')
                .long("host")
                .value_name("HOST_ID or HOST_NAME")
                .help("Create port forwarding rule for this host."),
        );
        for (flag, _, help) in TYPE_FLAGS {
            cmd = cmd.arg(
                Arg::new(flag)
                    .long(flag)
                    .action(ArgAction::SetTrue)
                    .help(help),
            );
        }
        cmd.group(
            ArgGroup::new("type")
                .args(TYPE_FLAGS.map(|(flag, _, _)| flag))
                .multiple(false),
        )
        .arg(
            Arg::new("binding")
                .long("binding")
                .value_name("BINDING")
                .help(
                    "Binding of ports and addresses: \
                     [bind_address:]port or [bind_address:]port:host:hostport",
                ),
        )
    }

    fn read_args(&self, matches: &ArgMatches, args: &mut ParsedArgs) {
        if let Some(host) = matches.get_one::<String>("host") {
            args.set("host", host.as_str());
        }
        if let Some((_, ty, _)) = TYPE_FLAGS.iter().find(|(flag, _, _)| matches.get_flag(flag)) {
            args.set("type", ty.letter().to_string());
        }
        if let Some(binding) = matches.get_one::<String>("binding") {
            args.set("binding", binding.as_str());
        }
    }

    fn serialize_args<S: Storage>(
        &self,
        args: &ParsedArgs,
        instance: Option<PfRule>,
        relations: &RelationResolver<'_, S, RelatedGetStrategy>,
    ) -> CoreResult<PfRule> {
        let requested = Self::requested_type(args)?;
        let creating = instance.is_none();
        let mut rule = instance.unwrap_or_default();

        if creating && requested.is_none() {
            return Err(CoreError::argument_required(
                "forwarding type is required (--dynamic, --local or --remote)",
            ));
        }

        if let Some(token) = args.value("host").filter(|t| !t.is_empty()) {
            let host: Host = relations.get(token)?;
            rule.host = host.id;
        }

        let previous = rule.pf_type;
        let pf_type = requested.or(previous);
        rule.pf_type = pf_type;

        match (args.value("binding").filter(|b| !b.is_empty()), pf_type) {
            (Some(binding), Some(ty)) => rule.apply_binding(ty.parse_binding(binding)?),
            (Some(_), None) => {
                return Err(CoreError::argument_required(
                    "forwarding type is required to parse a binding",
                ));
            }
            (None, Some(ty)) if previous.is_some_and(|p| p != ty) && !rule.binding.is_empty() => {
                // Local and remote share a grammar; other changes need a new binding.
                let reparsed = ty.parse_binding(&rule.binding.to_string()).map_err(|_| {
                    CoreError::invalid_argument(format!(
                        "changing the forwarding type to {ty} requires a new --binding"
                    ))
                })?;
                rule.apply_binding(reparsed);
            }
            (None, _) => {}
        }

        Ok(rule)
    }
}
