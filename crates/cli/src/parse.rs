//! ArgMatches → CliAction/MetaCommand conversion.
//!
//! Translates clap's parsed shell line into the navigator operation it
//! names. Meta-commands (`help`, `exit`, `clear`) are recognized before the
//! line ever reaches clap.

use clap::ArgMatches;

use burrow_core::Codec;

/// A navigator operation requested by one shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// `ls`
    List,
    /// `cd <bucket>`
    ChangeDirectory { name: String },
    /// `pwd`
    PrintWorkingPath,
    /// `get`, `int` or `time`
    Get { key: String, codec: Codec },
    /// `put`, `puti` or `putt`; `None` deletes
    Put {
        key: String,
        value: Option<String>,
        codec: Codec,
    },
    /// `rm <key>`
    Delete { key: String },
    /// `mkdir <bucket>`
    CreateBucket { name: String },
    /// `rmdir <bucket>`
    DeleteBucket { name: String },
}

/// REPL meta-commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Help { command: Option<String> },
    Quit,
    Clear,
}

/// Check for meta-commands before delegating to clap.
///
/// Returns `Some(MetaCommand)` if the line is a meta-command, `None` otherwise.
pub fn check_meta_command(line: &str) -> Option<MetaCommand> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next()?;

    match cmd {
        "quit" | "exit" => Some(MetaCommand::Quit),
        "clear" => Some(MetaCommand::Clear),
        "help" => Some(MetaCommand::Help {
            command: parts.next().map(str::to_string),
        }),
        _ => None,
    }
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    let action = match sub_name {
        "ls" => CliAction::List,
        "pwd" => CliAction::PrintWorkingPath,
        "cd" => CliAction::ChangeDirectory {
            name: required(sub, "bucket")?,
        },
        "get" | "int" | "time" => CliAction::Get {
            key: required(sub, "key")?,
            codec: codec_for(sub_name),
        },
        "put" | "puti" | "putt" => CliAction::Put {
            key: required(sub, "key")?,
            value: sub.get_one::<String>("value").cloned(),
            codec: codec_for(sub_name),
        },
        "rm" => CliAction::Delete {
            key: required(sub, "key")?,
        },
        "mkdir" => CliAction::CreateBucket {
            name: required(sub, "bucket")?,
        },
        "rmdir" => CliAction::DeleteBucket {
            name: required(sub, "bucket")?,
        },
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(action)
}

fn codec_for(verb: &str) -> Codec {
    match verb {
        "int" | "puti" => Codec::Uvarint,
        "time" | "putt" => Codec::Timestamp,
        _ => Codec::Raw,
    }
}

fn required(matches: &ArgMatches, id: &str) -> Result<String, String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", id))
}
