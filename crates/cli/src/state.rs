//! Session wrapper around the navigator.
//!
//! Holds the one `Navigator` of this process and turns parsed actions into
//! navigator calls. No logic of its own beyond the dispatch.

use burrow_core::{Codec, DecodedValue, Result};
use burrow_engine::{Listing, Navigator};

use crate::parse::CliAction;

/// Successful result of one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Rows from `ls`
    Listing(Vec<Listing>),
    /// Rendered location from `cd` / `pwd`
    Path(String),
    /// Value from `get` / `int` / `time`
    Value(DecodedValue),
    /// Write succeeded, nothing to print
    Unit,
}

/// Wraps the navigator and tracks the prompt.
pub struct SessionState {
    nav: Navigator,
}

impl SessionState {
    /// Create a new SessionState positioned at the root.
    pub fn new(nav: Navigator) -> Self {
        Self { nav }
    }

    /// Run one action against the navigator.
    pub fn execute(&mut self, action: CliAction) -> Result<Output> {
        let nav = &mut self.nav;
        let output = match action {
            CliAction::List => Output::Listing(nav.list()?),
            CliAction::ChangeDirectory { name } => Output::Path(nav.change_directory(name)?),
            CliAction::PrintWorkingPath => Output::Path(nav.pwd()),
            CliAction::Get { key, codec } => Output::Value(nav.get_decoded(key, codec)?),
            CliAction::Put { key, value, codec } => {
                let value = value.unwrap_or_default();
                // Only raw `put` treats an empty value as a delete
                if codec == Codec::Raw && value.is_empty() {
                    nav.delete_entry(key)?;
                } else {
                    nav.put_encoded(key, &value, codec)?;
                }
                Output::Unit
            }
            CliAction::Delete { key } => {
                nav.delete_entry(key)?;
                Output::Unit
            }
            CliAction::CreateBucket { name } => {
                nav.create_container(name)?;
                Output::Unit
            }
            CliAction::DeleteBucket { name } => {
                nav.delete_container(name)?;
                Output::Unit
            }
        };
        Ok(output)
    }

    /// Generate the REPL prompt string, e.g. `burrow:/a/b> `.
    pub fn prompt(&self) -> String {
        let names: Vec<String> = self.nav.path().iter().map(|s| s.to_string()).collect();
        format!("burrow:/{}> ", names.join("/"))
    }
}
