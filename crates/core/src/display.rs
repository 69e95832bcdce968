//! Display rule for byte strings
//!
//! Keys, bucket names and values are arbitrary bytes. When they are shown to
//! an operator they go through [`display_bytes`]:
//!
//! - printable ASCII (0x20..=0x7E) renders as text
//! - anything else renders as a decimal byte list, e.g. `[104 105 255]`
//!
//! This is a formatting concern only. Nothing in the navigator branches on
//! whether a name is printable.

use std::fmt::Write;

/// Check whether every byte is printable ASCII (space through tilde)
#[inline]
pub fn is_printable(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
}

/// Render bytes for terminal output
///
/// # Examples
///
/// ```
/// use burrow_core::display_bytes;
///
/// assert_eq!(display_bytes(b"users"), "users");
/// assert_eq!(display_bytes(&[0x01, 0xff]), "[1 255]");
/// ```
pub fn display_bytes(bytes: &[u8]) -> String {
    if is_printable(bytes) {
        // Printable ASCII is always valid UTF-8
        return bytes.iter().map(|&b| b as char).collect();
    }

    let mut out = String::with_capacity(bytes.len() * 4 + 2);
    out.push('[');
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", b);
    }
    out.push(']');
    out
}
