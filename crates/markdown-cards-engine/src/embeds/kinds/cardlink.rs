use std::sync::LazyLock;

use regex::Regex;

use super::WikiEmbed;

static IMAGE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*image[ \t]*:[ \t]*(.+?)[ \t\r]*$").expect("cardlink image regex")
});

/// Structured link-preview data held in a `cardlink` / `embed` fenced block:
///
/// ```text
/// url: https://example.com
/// title: "Example"
/// image: "https://example.com/cover.png"
/// ```
pub struct CardLink;

impl CardLink {
    /// The cleaned value of the first `image:` field in a block body.
    pub fn image(content: &str) -> Option<String> {
        let cap = IMAGE_FIELD.captures(content)?;
        let value = unquote(cap.get(1)?.as_str().trim());
        let value = WikiEmbed::unwrap_link(value);
        (!value.is_empty()).then_some(value)
    }
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)))
        .unwrap_or(value)
}
