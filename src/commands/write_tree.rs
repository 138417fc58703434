use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};
use crate::utils::{ObjectId, Repository, SpecialFiles, VIT_DIR_ENV};

pub fn get_write_tree_command() -> Command {
    Command::new("write-tree")
        .about("Store the working tree as tree objects and print the root id")
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail on symlinks and special files instead of skipping them"),
        )
}

/// Build the working tree of the repository found from `start`, or of
/// `vit_dir` when given.
pub fn write_tree_from(
    start: &Path,
    vit_dir: Option<PathBuf>,
    policy: SpecialFiles,
) -> Result<ObjectId> {
    let repo = Repository::discover_with(start, vit_dir)?;
    let store = repo.objects();

    repo.tree_builder(&store)
        .special_files(policy)
        .build(repo.work_tree())
}

pub fn write_tree(matches: &ArgMatches) -> Result<()> {
    let current_dir = env::current_dir().map_err(|e| Error::storage(".", e))?;

    let policy = if matches.get_flag("strict") {
        SpecialFiles::Fail
    } else {
        SpecialFiles::Skip
    };

    let vit_dir = env::var_os(VIT_DIR_ENV).map(PathBuf::from);
    let id = write_tree_from(&current_dir, vit_dir, policy)?;
    println!("{id}");
    Ok(())
}
