//! Clap command tree definition.
//!
//! `build_cli` parses the process arguments; `build_repl_cmd` parses each
//! shell line (via `try_get_matches_from`) in REPL and pipe mode.

use clap::{Arg, ArgAction, Command};

/// Build the process-level command line: `burrow <PATH> [--read-only]`.
pub fn build_cli() -> Command {
    Command::new("burrow")
        .about("Navigate a bucket store like a filesystem")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("path")
                .value_name("PATH")
                .help("Store file (created if missing, unless --read-only)")
                .required(true),
        )
        .arg(
            Arg::new("read-only")
                .long("read-only")
                .help("Open the store with a shared lock and refuse writes")
                .action(ArgAction::SetTrue),
        )
}

/// Build the command tree for one shell line.
pub fn build_repl_cmd() -> Command {
    Command::new("repl")
        .multicall(true)
        .subcommand_required(true)
        .subcommand(Command::new("ls").about("List buckets and keys at the current location"))
        .subcommand(
            Command::new("cd")
                .about("Change location: a bucket name, `..` or `/`")
                .arg(name_arg("bucket", "Bucket name, `..` or `/`")),
        )
        .subcommand(Command::new("pwd").about("Show the current location"))
        .subcommand(
            Command::new("get")
                .about("Show a value as stored")
                .arg(name_arg("key", "Key in the current bucket")),
        )
        .subcommand(
            Command::new("int")
                .about("Show a value decoded as an unsigned varint")
                .arg(name_arg("key", "Key in the current bucket")),
        )
        .subcommand(
            Command::new("time")
                .about("Show a value decoded as a binary timestamp")
                .arg(name_arg("key", "Key in the current bucket")),
        )
        .subcommand(
            Command::new("put")
                .about("Set a value; an empty or missing value deletes the key")
                .arg(name_arg("key", "Key in the current bucket"))
                .arg(value_arg("Value to store", false)),
        )
        .subcommand(
            Command::new("puti")
                .about("Set a value encoded as an unsigned varint")
                .arg(name_arg("key", "Key in the current bucket"))
                .arg(value_arg("Decimal u64", true)),
        )
        .subcommand(
            Command::new("putt")
                .about("Set a value encoded as a binary timestamp")
                .arg(name_arg("key", "Key in the current bucket"))
                .arg(value_arg("RFC 3339 time, or `now`", true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a key")
                .arg(name_arg("key", "Key in the current bucket")),
        )
        .subcommand(
            Command::new("mkdir")
                .about("Create a bucket at the current location")
                .arg(name_arg("bucket", "Bucket name")),
        )
        .subcommand(
            Command::new("rmdir")
                .about("Delete a bucket and everything under it")
                .arg(name_arg("bucket", "Bucket name")),
        )
}

fn name_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).help(help).required(true)
}

fn value_arg(help: &'static str, required: bool) -> Arg {
    Arg::new("value")
        .help(help)
        .required(required)
        .allow_hyphen_values(true)
}
