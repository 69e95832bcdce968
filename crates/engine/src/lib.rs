//! Navigation engine for burrow
//!
//! This crate layers a filesystem-style current location over the bucket
//! store:
//! - PathStack: the chain of bucket names from the root
//! - Navigator: resolves the stack per transaction and runs list, cd, pwd,
//!   get, put and bucket create/delete against it
//!
//! The engine never parses command lines; callers pass names and values
//! already split into arguments.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod navigator;
pub mod path_stack;

pub use navigator::{Listing, Navigator};
pub use path_stack::PathStack;
