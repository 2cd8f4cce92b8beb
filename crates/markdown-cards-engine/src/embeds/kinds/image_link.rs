use std::sync::LazyLock;

use regex::Regex;

use crate::embeds::is_external;

/// `![caption](destination)`; the destination may hold one level of parentheses.
static IMAGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]\n]*\]\(((?:[^()\n]|\([^()\n]*\))*)\)").expect("image link regex")
});

/// A destination followed by a `"title"`, `'title'` or `(title)`.
static TRAILING_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\S+)\s+(?:"[^"]*"|'[^']*'|\([^)]*\))$"#).expect("image title regex")
});

pub struct ImageLink;

impl ImageLink {
    /// `(offset, url)` for every markdown image in `body`, in document order.
    pub fn find(body: &str) -> impl Iterator<Item = (usize, String)> + '_ {
        IMAGE_LINK.captures_iter(body).filter_map(|cap| {
            let offset = cap.get(0)?.start();
            let url = Self::destination(cap.get(1)?.as_str())?;
            Some((offset, url))
        })
    }

    /// Cleans a raw destination: drops the title and angle brackets, and
    /// percent-decodes anything that is not an external URL.
    pub fn destination(raw: &str) -> Option<String> {
        let raw = raw.trim();
        let url = match raw.strip_prefix('<').and_then(|r| r.split_once('>')) {
            Some((inside, _)) => inside.trim(),
            None => TRAILING_TITLE
                .captures(raw)
                .and_then(|cap| cap.get(1))
                .map_or(raw, |m| m.as_str()),
        };
        if url.is_empty() {
            return None;
        }
        if is_external(url) {
            return Some(url.to_string());
        }
        Some(
            urlencoding::decode(url)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| url.to_string()),
        )
    }
}
