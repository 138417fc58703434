use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, fs, path::Path};

use crate::error::{Error, Result};
use crate::utils::{ObjectKind, Repository, Tree, hash_object as fingerprint};

pub fn get_hash_object_command() -> Command {
    Command::new("hash-object")
        .about("Compute the object id of a file, optionally storing it")
        .arg(
            Arg::new("write")
                .short('w')
                .action(ArgAction::SetTrue)
                .help("Write the object into the object database"),
        )
        .arg(
            Arg::new("type")
                .short('t')
                .value_name("TYPE")
                .value_parser(["blob", "tree"])
                .default_value("blob")
                .help("Object kind to hash the content as"),
        )
        .arg(Arg::new("file").required(true).help("File to hash"))
}

pub fn hash_object(matches: &ArgMatches) -> Result<()> {
    let file = matches
        .get_one::<String>("file")
        .map(String::as_str)
        .unwrap_or_default();
    let kind: ObjectKind = matches
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("blob")
        .parse()?;
    let content = fs::read(file).map_err(|e| Error::traversal(file, e))?;
    if kind == ObjectKind::Tree {
        Tree::parse(&content)?;
    }

    let id = if matches.get_flag("write") {
        let current_dir = env::current_dir().map_err(|e| Error::storage(".", e))?;
        let repo = Repository::discover(&current_dir)?;
        repo.objects().put(kind, &content)?
    } else {
        fingerprint(kind, &content)
    };

    tracing::debug!(file = %Path::new(file).display(), %id, "hashed");
    println!("{id}");
    Ok(())
}
