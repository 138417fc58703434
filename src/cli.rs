use crate::commands::{
    get_cat_file_command, get_hash_object_command, get_init_command, get_ls_tree_command,
    get_write_tree_command,
};
use clap::Command;

pub fn cli() -> Command {
    Command::new("vit")
        .about("Content-addressed object storage for vit repositories")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .allow_external_subcommands(false)
        .subcommand(get_init_command())
        .subcommand(get_hash_object_command())
        .subcommand(get_cat_file_command())
        .subcommand(get_write_tree_command())
        .subcommand(get_ls_tree_command())
}
