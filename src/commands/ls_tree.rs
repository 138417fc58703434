use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use std::{
    env,
    io::{self, Write},
};

use crate::error::{Error, Result};
use crate::utils::{EntryMode, ObjectKind, Repository, Tree};

pub fn get_ls_tree_command() -> Command {
    Command::new("ls-tree")
        .about("List the entries of a tree object")
        .arg(
            Arg::new("name-only")
                .long("name-only")
                .action(ArgAction::SetTrue)
                .help("List only entry names"),
        )
        .arg(Arg::new("tree").required(true).help("Tree object id"))
}

/// One line per entry: `<mode padded to 6> <kind> <id>\t<name>`, or just the
/// name. `color` highlights directory names in the long format only.
pub fn write_tree_entries<W: Write>(
    out: &mut W,
    tree: &Tree,
    name_only: bool,
    color: bool,
) -> io::Result<()> {
    for entry in tree.entries() {
        if name_only {
            writeln!(out, "{}", entry.name_lossy())?;
            continue;
        }
        let name = match entry.mode {
            EntryMode::Directory if color => entry.name_lossy().blue().to_string(),
            _ => entry.name_lossy(),
        };
        writeln!(
            out,
            "{:0>6} {} {}\t{}",
            entry.mode.as_str(),
            entry.mode.kind(),
            entry.id,
            name
        )?;
    }
    Ok(())
}

pub fn ls_tree(matches: &ArgMatches) -> Result<()> {
    let tree_ref = matches
        .get_one::<String>("tree")
        .map(String::as_str)
        .unwrap_or_default();

    let current_dir = env::current_dir().map_err(|e| Error::storage(".", e))?;
    let store = Repository::discover(&current_dir)?.objects();
    let id = store.resolve_prefix(tree_ref)?;

    let (kind, payload) = store.get(&id)?;
    if kind != ObjectKind::Tree {
        return Err(Error::Encoding(format!("{id} is a {kind}, not a tree")));
    }

    let name_only = matches.get_flag("name-only");
    let mut stdout = io::stdout().lock();
    write_tree_entries(&mut stdout, &Tree::parse(&payload)?, name_only, !name_only)
        .and_then(|_| stdout.flush())
        .map_err(|e| Error::storage("<stdout>", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{TreeEntry, hash_object};

    fn sample() -> Tree {
        Tree::new(vec![
            TreeEntry::new(
                EntryMode::File,
                "a.txt",
                hash_object(ObjectKind::Blob, b"hi\n"),
            ),
            TreeEntry::new(
                EntryMode::Directory,
                "sub",
                hash_object(ObjectKind::Tree, b""),
            ),
        ])
    }

    fn render(name_only: bool, color: bool) -> String {
        let mut out = Vec::new();
        write_tree_entries(&mut out, &sample(), name_only, color).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn long_format_pads_directory_mode() {
        assert_eq!(
            render(false, false),
            "100644 blob 45b983be36b73c0788dc9cbcb76cbb80fc7bb057\ta.txt\n\
             040000 tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\tsub\n"
        );
    }

    #[test]
    fn name_only_is_never_colored() {
        assert_eq!(render(true, true), "a.txt\nsub\n");
    }

    #[test]
    fn color_only_touches_directory_names() {
        let lines: Vec<String> = render(false, true).lines().map(String::from).collect();
        assert_eq!(
            lines[0],
            "100644 blob 45b983be36b73c0788dc9cbcb76cbb80fc7bb057\ta.txt"
        );
        assert!(lines[1].starts_with("040000 tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\t"));
        assert!(lines[1].contains("sub"));
    }
}
