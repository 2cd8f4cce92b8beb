//! # Structural Scanning
//!
//! Separates "code" from "prose" in a markdown body so that embed-like syntax
//! inside code is never mistaken for a real reference.
//!
//! This is deliberately not a markdown parser. The scanner works on line
//! records and reports three kinds of byte ranges:
//!
//! - **fenced** blocks (```` ``` ```` / `~~~`), with card-link blocks flagged
//! - **indented** blocks (tab or four spaces after a blank line)
//! - **inline** code spans (single backticks, never across lines)
//!
//! Callers ask [`CodeRanges::contains`] whether an offset falls inside code.
//!
//! ## Fence matching
//!
//! Only one fence is tracked at a time. While it is open, any other fence-like
//! line is inert; only a bare line carrying the opener's exact run closes it.
//! A fence still open at end of input is discarded, so its lines are scanned
//! as ordinary text.

pub mod fence;
pub mod frontmatter;
pub mod lines;
pub mod scanner;
pub mod span;

pub use fence::{CodeFence, FenceSig};
pub use lines::{LineRecord, line_records};
pub use scanner::{CodeRanges, FencedBlock, scan};
pub use span::Span;

/// Upper bound on how much of a body is scanned.
pub const MAX_BODY_BYTES: usize = 50_000;

/// Strips frontmatter and caps the body at [`MAX_BODY_BYTES`], backing off to
/// the nearest char boundary.
pub fn prepare_body(body: &str) -> &str {
    let body = frontmatter::strip(body);
    if body.len() <= MAX_BODY_BYTES {
        return body;
    }
    let mut end = MAX_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
