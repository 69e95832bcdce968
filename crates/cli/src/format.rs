//! Output → string formatting.
//!
//! - listings: `[Bucket] name` / `[Key] name=value`, one per line
//! - paths: `/` or `/ -> a -> b`
//! - errors: `(error) message`

use burrow_core::{EntryKind, Error};
use burrow_engine::Listing;

use crate::state::Output;

/// Format a successful output. Empty for writes.
pub fn format_output(output: &Output) -> String {
    match output {
        Output::Listing(rows) => rows.iter().map(format_row).collect::<Vec<_>>().join("\n"),
        Output::Path(path) => path.clone(),
        Output::Value(value) => value.to_string(),
        Output::Unit => String::new(),
    }
}

/// Format an error.
pub fn format_error(err: &Error) -> String {
    format!("(error) {}", err)
}

fn format_row(row: &Listing) -> String {
    match row.kind {
        EntryKind::Container => format!("[{}] {}", row.kind.label(), row.display_name()),
        EntryKind::Entry => format!(
            "[{}] {}={}",
            row.kind.label(),
            row.display_name(),
            row.display_value().unwrap_or_default()
        ),
    }
}
