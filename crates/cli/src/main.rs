//! burrow: navigate a bucket store like a filesystem.
//!
//! Two modes:
//! - **REPL mode**: `burrow data.db`: interactive prompt (if stdin is TTY)
//! - **Pipe mode**: `echo "ls" | burrow data.db`: line-by-line from stdin

mod commands;
mod format;
mod parse;
mod repl;
mod state;

use std::io::IsTerminal;
use std::process;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use burrow_engine::Navigator;
use burrow_storage::{Database, OpenOptions};

use commands::build_cli;
use state::SessionState;

fn main() {
    // Usage errors exit with code 2 before anything is opened
    let matches = build_cli().get_matches();
    init_logging();

    let db = match open_database(&matches) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let banner = match db.path() {
        Some(path) if db.is_read_only() => format!("burrow shell: {} (read-only)", path.display()),
        Some(path) => format!("burrow shell: {}", path.display()),
        None => "burrow shell".to_string(),
    };
    let mut state = SessionState::new(Navigator::new(Arc::new(db)));

    let exit_code = if std::io::stdin().is_terminal() {
        repl::run_repl(&mut state, &banner)
    } else {
        repl::run_pipe(&mut state)
    };
    process::exit(exit_code);
}

/// Install the stderr subscriber; `BURROW_LOG` overrides the `warn` default.
fn init_logging() {
    let filter = EnvFilter::try_from_env("BURROW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_database(matches: &clap::ArgMatches) -> Result<Database, String> {
    let path = matches
        .get_one::<String>("path")
        .ok_or_else(|| "store path required".to_string())?;
    let read_only = matches.get_flag("read-only");

    let db = OpenOptions::new()
        .read_only(read_only)
        .open(path)
        .map_err(|e| format!("Failed to open store {}: {}", path, e))?;
    info!(target: "burrow::cli", path = %path, read_only, version = db.version(), "Session started");
    Ok(db)
}
