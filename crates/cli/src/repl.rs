//! REPL loop with rustyline.
//!
//! Interactive mode: prompt, meta-commands, history, TAB completion.
//! Pipe mode: read lines from stdin, execute each.

use std::io::{self, BufRead, Write};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};
use tracing::debug;

use crate::commands::build_repl_cmd;
use crate::format::{format_error, format_output};
use crate::parse::{check_meta_command, matches_to_action, MetaCommand};
use crate::state::SessionState;

/// What the loop should do after one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Keep reading; `false` if the line failed
    Continue(bool),
    Quit,
}

/// Run the interactive REPL. Returns the process exit code.
pub fn run_repl(state: &mut SessionState, banner: &str) -> i32 {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let mut rl: Editor<BurrowHelper, DefaultHistory> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("(error) cannot start line editor: {}", e);
            return 1;
        }
    };
    rl.set_helper(Some(BurrowHelper));

    let history_path = history_file();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    println!("{}", banner);
    let stdout = io::stdout();
    let stderr = io::stderr();

    loop {
        let prompt = state.prompt();
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let flow = execute_line(trimmed, state, &mut stdout.lock(), &mut stderr.lock());
                match flow {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue(_)) => {}
                    Err(e) => {
                        eprintln!("(error) {}", e);
                        break;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C: just show a new prompt
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("(error) {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }
    0
}

/// Run in pipe mode: read lines from stdin, execute each.
pub fn run_pipe(state: &mut SessionState) -> i32 {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    run_lines(state, stdin.lock(), &mut stdout.lock(), &mut stderr.lock())
}

/// Execute every line of `input`. Returns 1 if any line failed.
///
/// Blank lines and lines starting with `#` are skipped; `exit` stops early.
/// A line that is not valid UTF-8 is reported and skipped.
pub fn run_lines<R: BufRead, W: Write, E: Write>(
    state: &mut SessionState,
    mut input: R,
    out: &mut W,
    err: &mut E,
) -> i32 {
    let mut exit_code = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                let _ = writeln!(err, "(error) cannot read input: {}", e);
                return 1;
            }
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(_) => {
                let lossy = String::from_utf8_lossy(&buf);
                if writeln!(err, "(error) input is not valid UTF-8: {}", lossy.trim_end()).is_err() {
                    return 1;
                }
                exit_code = 1;
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match execute_line(trimmed, state, out, err) {
            Ok(Flow::Continue(true)) => {}
            Ok(Flow::Continue(false)) => exit_code = 1,
            Ok(Flow::Quit) => break,
            Err(_) => return 1,
        }
    }

    exit_code
}

/// Parse and execute one non-empty line.
fn execute_line<W: Write, E: Write>(
    line: &str,
    state: &mut SessionState,
    out: &mut W,
    err: &mut E,
) -> io::Result<Flow> {
    if let Some(meta) = check_meta_command(line) {
        match meta {
            MetaCommand::Quit => return Ok(Flow::Quit),
            MetaCommand::Clear => {
                // ANSI clear screen
                write!(out, "\x1B[2J\x1B[1;1H")?;
                out.flush()?;
            }
            MetaCommand::Help { command } => print_help(command.as_deref(), out)?,
        }
        return Ok(Flow::Continue(true));
    }

    // Tokenize with shlex (respects quotes)
    let tokens = match shlex::split(line) {
        Some(t) if !t.is_empty() => t,
        Some(_) => return Ok(Flow::Continue(true)),
        None => {
            writeln!(err, "(error) Invalid quoting: {}", line)?;
            return Ok(Flow::Continue(false));
        }
    };

    let matches = match build_repl_cmd().try_get_matches_from(tokens) {
        Ok(m) => m,
        Err(e) => {
            // clap error: show usage text
            write!(err, "{}", e.render())?;
            return Ok(Flow::Continue(false));
        }
    };

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            writeln!(err, "(error) {}", e)?;
            return Ok(Flow::Continue(false));
        }
    };

    debug!(target: "burrow::cli", ?action, "Executing");
    match state.execute(action) {
        Ok(output) => {
            let formatted = format_output(&output);
            if !formatted.is_empty() {
                writeln!(out, "{}", formatted)?;
            }
            Ok(Flow::Continue(true))
        }
        Err(e) => {
            writeln!(err, "{}", format_error(&e))?;
            Ok(Flow::Continue(false))
        }
    }
}

fn history_file() -> Option<String> {
    std::env::var("HOME")
        .ok()
        .map(|h| format!("{}/.burrow_history", h))
}

fn print_help<W: Write>(command: Option<&str>, out: &mut W) -> io::Result<()> {
    if let Some(cmd) = command {
        // Show help for a specific command
        match build_repl_cmd().try_get_matches_from([cmd, "--help"]) {
            Ok(_) => Ok(()),
            Err(e) => write!(out, "{}", e.render()),
        }
    } else {
        writeln!(out, "Available commands:")?;
        writeln!(out, "  ls                  List buckets and keys here")?;
        writeln!(out, "  cd <bucket|..|/>    Change location")?;
        writeln!(out, "  pwd                 Show the current location")?;
        writeln!(out, "  get <key>           Show a value as stored")?;
        writeln!(out, "  int <key>           Show a value as an unsigned varint")?;
        writeln!(out, "  time <key>          Show a value as a binary timestamp")?;
        writeln!(out, "  put <key> [value]   Set a value (no value deletes)")?;
        writeln!(out, "  puti <key> <u64>    Set a varint value")?;
        writeln!(out, "  putt <key> <time>   Set a timestamp value (RFC 3339 or now)")?;
        writeln!(out, "  rm <key>            Delete a key")?;
        writeln!(out, "  mkdir <bucket>      Create a bucket")?;
        writeln!(out, "  rmdir <bucket>      Delete a bucket and its contents")?;
        writeln!(out)?;
        writeln!(out, "Meta-commands:")?;
        writeln!(out, "  help [command]      Show help")?;
        writeln!(out, "  quit / exit         Exit")?;
        writeln!(out, "  clear               Clear screen")
    }
}

// =========================================================================
// TAB Completion
// =========================================================================

/// Known commands for TAB completion.
const COMMANDS: &[&str] = &[
    "ls", "cd", "pwd", "get", "int", "time", "put", "puti", "putt", "rm", "mkdir", "rmdir", "help",
    "quit", "exit", "clear",
];

struct BurrowHelper;

impl Helper for BurrowHelper {}
impl Validator for BurrowHelper {}
impl Highlighter for BurrowHelper {}
impl Hinter for BurrowHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Completer for BurrowHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_pos = &line[..pos];
        if line_to_pos.contains(char::is_whitespace) {
            return Ok((pos, vec![]));
        }
        let prefix = line_to_pos.trim_start();
        let start = pos - prefix.len();
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((start, candidates))
    }
}
