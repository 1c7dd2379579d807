use std::ffi::OsString;
use std::marker::PhantomData;

use clap::{Arg, ArgMatches, Command};
use sshconfig_core::{CoreResult, Record};
use sshconfig_store::{Filter, Predicate, Storage};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    pub label: Option<String>,
}

/// Lists every stored record of one type.
pub struct ListCommand<R, S> {
    name: &'static str,
    about: &'static str,
    storage: S,
    _record: PhantomData<fn() -> R>,
}

impl<R, S> ListCommand<R, S>
where
    R: Record,
    S: Storage,
{
    pub fn new(name: &'static str, about: &'static str, storage: S) -> Self {
        Self {
            name,
            about,
            storage,
            _record: PhantomData,
        }
    }

    pub fn build_parser(&self) -> Command {
        list_surface(self.name, self.about)
    }

    pub fn parse_matches(&self, matches: &ArgMatches) -> ListArgs {
        ListArgs {
            label: matches.get_one::<String>("label").cloned(),
        }
    }

    pub fn parse_from<I, T>(&self, argv: I) -> Result<ListArgs, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.build_parser().try_get_matches_from(argv)?;
        Ok(self.parse_matches(&matches))
    }

    /// Records ordered by id.
    pub fn take_action(&self, args: &ListArgs) -> CoreResult<Vec<R>> {
        let filter = match &args.label {
            Some(label) => Filter::all([Predicate::LabelIn(vec![label.clone()])]),
            None => Filter::everything(),
        };
        let mut records: Vec<R> = self.storage.filter(&filter)?;
        records.sort_by_key(|r| r.id());
        Ok(records)
    }
}

/// Argument surface of a list command.
pub fn list_surface(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(
        Arg::new("label")
            .short('L')
            .long("label")
            .value_name("NAME")
            .help("Only list entries with this label."),
    )
}
