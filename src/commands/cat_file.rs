use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::{
    env,
    io::{self, Write},
};

use crate::commands::write_tree_entries;
use crate::error::{Error, Result};
use crate::utils::{ObjectKind, Repository, Tree};

pub fn get_cat_file_command() -> Command {
    Command::new("cat-file")
        .about("Show the content, kind or size of a stored object")
        .arg(
            Arg::new("pretty")
                .short('p')
                .action(ArgAction::SetTrue)
                .help("Pretty-print the object's content"),
        )
        .arg(
            Arg::new("type")
                .short('t')
                .action(ArgAction::SetTrue)
                .help("Show the object's kind"),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .action(ArgAction::SetTrue)
                .help("Show the object's payload size"),
        )
        .group(
            ArgGroup::new("mode")
                .args(["pretty", "type", "size"])
                .required(true),
        )
        .arg(
            Arg::new("object")
                .required(true)
                .help("Full or abbreviated (4+ hex characters) object id"),
        )
}

pub fn cat_file(matches: &ArgMatches) -> Result<()> {
    let object = matches
        .get_one::<String>("object")
        .map(String::as_str)
        .unwrap_or_default();

    let current_dir = env::current_dir().map_err(|e| Error::storage(".", e))?;
    let store = Repository::discover(&current_dir)?.objects();
    let id = store.resolve_prefix(object)?;
    let (kind, payload) = store.get(&id)?;

    let mut stdout = io::stdout().lock();
    let written = if matches.get_flag("type") {
        writeln!(stdout, "{kind}")
    } else if matches.get_flag("size") {
        writeln!(stdout, "{}", payload.len())
    } else {
        match kind {
            ObjectKind::Blob => stdout.write_all(&payload),
            ObjectKind::Tree => {
                write_tree_entries(&mut stdout, &Tree::parse(&payload)?, false, false)
            }
        }
    };

    written
        .and_then(|_| stdout.flush())
        .map_err(|e| Error::storage("<stdout>", e))
}
