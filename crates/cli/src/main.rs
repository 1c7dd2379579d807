mod config;
mod prompt;

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgMatches, Command, value_parser};
use serde::Serialize;
use sshconfig_commands::{
    DetailCommand, EntityHandler, HostHandler, ListCommand, Outcome, PfRuleHandler,
    argument_surface, list_surface,
};
use sshconfig_core::{CommandConfig, Host, PfRule, Record};
use sshconfig_store::JsonFileStorage;

use crate::config::Config;
use crate::prompt::LinePrompter;

const HOSTS: (&str, &str) = ("hosts", "List hosts.");
const PFRULES: (&str, &str) = ("pfrules", "List port forwarding rules.");

fn main() -> ExitCode {
    sshconfig_observability::init();

    let stdout = std::io::stdout();
    match run(std::env::args_os(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn detail_surface<H: EntityHandler>(handler: &H) -> anyhow::Result<Command> {
    let config = CommandConfig::new(handler.allowed_operations(), handler.required_options())?;
    Ok(argument_surface(handler, &config))
}

fn root_command() -> anyhow::Result<Command> {
    Ok(Command::new("sshconfig")
        .about("Manage hosts and port forwarding rules.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Record store file (default: $SSHCONFIG_STORE or ~/.sshconfig/store.json)."),
        )
        .subcommand(detail_surface(&HostHandler)?)
        .subcommand(detail_surface(&PfRuleHandler)?)
        .subcommand(list_surface(HOSTS.0, HOSTS.1))
        .subcommand(list_surface(PFRULES.0, PFRULES.1)))
}

fn run<I, T>(argv: I, out: &mut dyn Write) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match root_command()?.try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(err) => err.exit(),
    };

    let Some((name, sub)) = matches.subcommand() else {
        anyhow::bail!("no command given");
    };
    let config = Config::resolve(sub.get_one::<PathBuf>("store").cloned());
    let store = JsonFileStorage::open(&config.store_path)
        .with_context(|| format!("cannot open store {}", config.store_path.display()))?;
    tracing::debug!(command = name, store = %config.store_path.display(), "dispatching");

    match name {
        "host" => run_detail(HostHandler, store, sub, out),
        "pfrule" => run_detail(PfRuleHandler, store, sub, out),
        "hosts" => run_list::<Host>(HOSTS, store, sub, out),
        "pfrules" => run_list::<PfRule>(PFRULES, store, sub, out),
        other => anyhow::bail!("unknown command '{other}'"),
    }
}

fn run_detail<H: EntityHandler>(
    handler: H,
    store: JsonFileStorage,
    matches: &ArgMatches,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut command = DetailCommand::new(handler, store)?;
    let args = command.parse_matches(matches);
    if args.interactive {
        command = command.with_prompter(Box::new(LinePrompter::new()?));
    }

    match command.take_action(&args)? {
        Outcome::Created(record) => print_records(out, [record]),
        Outcome::Updated(records) | Outcome::Deleted(records) => print_records(out, records),
        Outcome::Nothing => Ok(()),
    }
}

fn run_list<R: Record>(
    (name, about): (&'static str, &'static str),
    store: JsonFileStorage,
    matches: &ArgMatches,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let command: ListCommand<R, _> = ListCommand::new(name, about, store);
    let args = command.parse_matches(matches);
    print_records(out, command.take_action(&args)?)
}

/// One JSON object per line.
fn print_records<R: Serialize>(out: &mut dyn Write, records: impl IntoIterator<Item = R>) -> anyhow::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    }
    Ok(())
}
