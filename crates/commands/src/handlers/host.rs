use clap::{Arg, ArgMatches, Command};
use sshconfig_core::{AllowedOperations, CoreError, CoreResult, Host, Operation, RequiredOptions};
use sshconfig_store::{RelatedGetStrategy, RelatedSaveStrategy, Storage};

use crate::args::ParsedArgs;
use crate::handler::EntityHandler;
use crate::relation::RelationResolver;

/// Operate with host records.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostHandler;

impl EntityHandler for HostHandler {
    type Record = Host;
    type Get = RelatedGetStrategy;
    type Save = RelatedSaveStrategy;

    fn name(&self) -> &'static str {
        "host"
    }

    fn about(&self) -> &'static str {
        "Operate with a host."
    }

    fn allowed_operations(&self) -> AllowedOperations {
        AllowedOperations::all()
    }

    fn required_options(&self) -> RequiredOptions {
        RequiredOptions::new().with(Operation::Create, ["address"])
    }

    fn extend_parser(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("address")
                .short('a')
                .long("address")
                .value_name("ADDRESS")
                .help("Hostname or IP address."),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("SSH port."),
        )
    }

    fn read_args(&self, matches: &ArgMatches, args: &mut ParsedArgs) {
        for name in ["address", "port"] {
            if let Some(value) = matches.get_one::<String>(name) {
                args.set(name, value.as_str());
            }
        }
    }

    fn serialize_args<S: Storage>(
        &self,
        args: &ParsedArgs,
        instance: Option<Host>,
        _relations: &RelationResolver<'_, S, RelatedGetStrategy>,
    ) -> CoreResult<Host> {
        let mut host = instance.unwrap_or_default();
        if let Some(address) = args.value("address") {
            host.address = Some(address.to_string());
        }
        if let Some(port) = args.value("port") {
            let port = port
                .parse::<u16>()
                .map_err(|_| CoreError::invalid_argument(format!("'{port}' is not a valid port")))?;
            host.port = Some(port);
        }
        Ok(host)
    }
}
