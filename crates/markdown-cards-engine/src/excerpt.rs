//! Plain-text excerpts of document bodies for card previews.

use std::borrow::Cow;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::embeds::WikiEmbed;
use crate::parsing::{prepare_body, scan};

pub const DEFAULT_EXCERPT_LENGTH: usize = 500;

static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!)?\[\[([^\]\n|]*)(?:\|([^\]\n]*))?\]\]").expect("wikilink regex")
});

/// Whether the first non-blank line of a body is left out of its excerpt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FirstLinePolicy {
    Never,
    Always,
    /// Only when the line (heading markers aside) repeats the card title.
    #[default]
    IfMatchesTitle,
}

/// Builds the excerpt for a raw document body.
pub fn excerpt(body: &str, title: &str, policy: FirstLinePolicy, max_chars: usize) -> String {
    let body = omit_first_line(prepare_body(body), title, policy);
    let body = rewrite_wikilinks(body);
    truncate(&collapse_whitespace(&plain_text(&body)), max_chars)
}

/// Collapses whitespace runs to single spaces and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters, without trailing whitespace.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].trim_end().to_string(),
        None => text.to_string(),
    }
}

fn omit_first_line<'a>(body: &'a str, title: &str, policy: FirstLinePolicy) -> &'a str {
    if policy == FirstLinePolicy::Never {
        return body;
    }

    let mut offset = 0usize;
    for line in body.split_inclusive('\n') {
        let text = line.trim();
        if text.is_empty() {
            offset += line.len();
            continue;
        }
        let omit = match policy {
            FirstLinePolicy::Always => true,
            FirstLinePolicy::IfMatchesTitle => matches_title(text, title),
            FirstLinePolicy::Never => false,
        };
        return if omit { &body[offset + line.len()..] } else { body };
    }
    body
}

fn matches_title(line: &str, title: &str) -> bool {
    let title = title.trim();
    let heading = line.trim_start_matches('#').trim();
    !title.is_empty() && heading.to_lowercase() == title.to_lowercase()
}

/// Drops wiki embeds and shows wikilinks by alias or target. Code is left
/// as written.
fn rewrite_wikilinks(body: &str) -> Cow<'_, str> {
    if !body.contains("[[") {
        return Cow::Borrowed(body);
    }

    let code = scan(body);
    let mut out = String::with_capacity(body.len());
    let mut last = 0;
    for cap in WIKILINK.captures_iter(body) {
        let Some(whole) = cap.get(0) else { continue };
        if code.contains(whole.start()) {
            continue;
        }
        out.push_str(&body[last..whole.start()]);
        if cap.get(1).is_none() {
            out.push_str(&link_text(&cap));
        }
        last = whole.end();
    }
    out.push_str(&body[last..]);
    Cow::Owned(out)
}

fn link_text(cap: &Captures<'_>) -> String {
    if let Some(alias) = cap.get(3) {
        return alias.as_str().trim().to_string();
    }
    let inner = cap.get(2).map_or("", |m| m.as_str());
    WikiEmbed::target(inner).unwrap_or_else(|| inner.trim_start_matches('#').trim().to_string())
}

/// Renders markdown to text. Code blocks, images and raw HTML are dropped.
fn plain_text(markdown: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let mut out = String::with_capacity(markdown.len());
    let mut hidden = 0usize;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Image { .. } | Tag::HtmlBlock) => hidden += 1,
            Event::End(TagEnd::CodeBlock | TagEnd::Image | TagEnd::HtmlBlock) => {
                hidden = hidden.saturating_sub(1);
            }
            _ if hidden > 0 => {}
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableCell) => {
                out.push(' ');
            }
            _ => {}
        }
    }
    out
}
