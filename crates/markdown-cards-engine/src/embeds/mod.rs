//! # Embed Extraction
//!
//! Finds the media a document embeds, in document order:
//!
//! 1. the `image:` field of card-link blocks (when enabled)
//! 2. wiki embeds `![[path]]`
//! 3. markdown images `![caption](url)`
//!
//! Matches starting inside code (see [`crate::parsing::CodeRanges`]) are
//! dropped. Survivors are ordered by offset and deduplicated by raw path,
//! first occurrence winning. Collection order has no effect on the result.

pub mod kinds;

use std::collections::HashSet;

use crate::parsing::{prepare_body, scan};
use crate::thumbnails::is_video_url;

pub use kinds::{CardLink, ImageLink, WikiEmbed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedKind {
    WikiLink,
    ImageMarkdown,
    CardLink,
}

/// A media reference found in a body, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedCandidate {
    pub kind: EmbedKind,
    /// Path or URL as written (wrappers, captions and titles removed).
    pub raw_path: String,
    /// Byte offset of the syntax in the prepared body.
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmbedOptions {
    /// Keep video-sharing links (resolved to thumbnails later).
    pub include_youtube: bool,
    /// Read `image:` fields from card-link blocks.
    pub include_cardlink: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            include_youtube: true,
            include_cardlink: true,
        }
    }
}

/// `http://` or `https://`, case-insensitively.
pub fn is_external(path: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        path.get(..scheme.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(scheme))
    })
}

/// Extracts ordered, deduplicated embed candidates from a document body.
///
/// Frontmatter is stripped and the body capped before scanning. No cap on
/// the number of candidates is applied here: candidates can still fail to
/// resolve, so the per-document limit is enforced by
/// [`crate::resolve::ResourceResolver`].
pub fn extract(body: &str, options: &EmbedOptions) -> Vec<EmbedCandidate> {
    let body = prepare_body(body);
    let code = scan(body);
    let mut found = vec![];

    if options.include_cardlink {
        for block in code.fenced.iter().filter(|b| b.is_cardlink) {
            if let Some(image) = CardLink::image(block.content) {
                found.push(EmbedCandidate {
                    kind: EmbedKind::CardLink,
                    raw_path: image,
                    position: block.span.start,
                });
            }
        }
    }

    for (position, path) in WikiEmbed::find(body) {
        if !code.contains(position) {
            found.push(EmbedCandidate {
                kind: EmbedKind::WikiLink,
                raw_path: path,
                position,
            });
        }
    }

    for (position, url) in ImageLink::find(body) {
        if !code.contains(position) {
            found.push(EmbedCandidate {
                kind: EmbedKind::ImageMarkdown,
                raw_path: url,
                position,
            });
        }
    }

    if !options.include_youtube {
        found.retain(|c| !is_video_url(&c.raw_path));
    }

    found.sort_by_key(|c| c.position);
    let mut seen = HashSet::new();
    found.retain(|c| seen.insert(c.raw_path.clone()));
    found
}
