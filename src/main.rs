use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;
use vit_store::cli;
use vit_store::commands::{cat_file, hash_object, init, ls_tree, write_tree};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("init", _sub_matches)) => init(),
        Some(("hash-object", sub_matches)) => hash_object(sub_matches),
        Some(("cat-file", sub_matches)) => cat_file(sub_matches),
        Some(("write-tree", sub_matches)) => write_tree(sub_matches),
        Some(("ls-tree", sub_matches)) => ls_tree(sub_matches),
        _ => unreachable!("Unknown subcommand!"),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "error:".red(), err);
        process::exit(1);
    }
}
