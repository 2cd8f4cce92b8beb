use std::sync::LazyLock;

use regex::Regex;

static WIKI_EMBED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\]\n]+)\]\]").expect("wiki embed regex"));

pub struct WikiEmbed;

impl WikiEmbed {
    pub const ALIAS: char = '|';
    pub const FRAGMENT: char = '#';

    /// `(offset, path)` for every `![[...]]` in `body`, in document order.
    pub fn find(body: &str) -> impl Iterator<Item = (usize, String)> + '_ {
        WIKI_EMBED.captures_iter(body).filter_map(|cap| {
            let offset = cap.get(0)?.start();
            let path = Self::target(cap.get(1)?.as_str())?;
            Some((offset, path))
        })
    }

    /// Path segment of a link body: everything before the first `|` or `#`.
    pub fn target(inner: &str) -> Option<String> {
        let path = inner
            .split([Self::ALIAS, Self::FRAGMENT])
            .next()
            .unwrap_or_default()
            .trim();
        (!path.is_empty()).then(|| path.to_string())
    }

    /// Unwraps `[[target]]` / `![[target]]` to `target`; other values pass through trimmed.
    pub fn unwrap_link(value: &str) -> String {
        let value = value.trim();
        let inner = value
            .strip_prefix('!')
            .unwrap_or(value)
            .strip_prefix("[[")
            .and_then(|v| v.strip_suffix("]]"));
        match inner {
            Some(inner) => Self::target(inner).unwrap_or_default(),
            None => value.to_string(),
        }
    }
}
