use clap::Command;
use std::env;

use crate::error::{Error, Result};
use crate::utils::{Repository, VIT_DIR_NAME};

pub fn get_init_command() -> Command {
    Command::new("init").about("Create an empty vit repository")
}

pub fn init() -> Result<()> {
    let current_dir = env::current_dir().map_err(|e| Error::storage(".", e))?;

    match Repository::init(&current_dir)? {
        Some(repo) => println!(
            "Initialized empty Vit repository in {}",
            repo.vit_dir().display()
        ),
        None => println!(
            "Vit repository already initialized in {}",
            current_dir.join(VIT_DIR_NAME).display()
        ),
    }

    Ok(())
}
