/// The signature of a fence-like line: its run of fence characters and the
/// text that follows the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceSig<'a> {
    /// Maximal run of `` ` `` / `~` characters, at least [`CodeFence::MIN_RUN`] long.
    pub run: &'a str,
    /// Everything after the run (info string on an opener).
    pub info: &'a str,
}

pub struct CodeFence;

impl CodeFence {
    pub const MIN_RUN: usize = 3;
    /// Info-string languages that mark a block as structured link-preview data.
    pub const CARDLINK_LANGUAGES: [&'static str; 2] = ["cardlink", "embed"];

    /// Matches `^\s*([`~]{3,})(.*)$` against a single line.
    pub fn sig(line: &str) -> Option<FenceSig<'_>> {
        let t = line.trim_end_matches(['\r', '\n']).trim_start();
        let run_len = t.bytes().take_while(|b| matches!(b, b'`' | b'~')).count();
        if run_len < Self::MIN_RUN {
            return None;
        }
        Some(FenceSig {
            run: &t[..run_len],
            info: &t[run_len..],
        })
    }

    /// First word of the info string.
    pub fn language<'a>(sig: &FenceSig<'a>) -> Option<&'a str> {
        sig.info.split_whitespace().next()
    }

    pub fn is_cardlink(sig: &FenceSig<'_>) -> bool {
        Self::language(sig).is_some_and(|lang| {
            Self::CARDLINK_LANGUAGES
                .iter()
                .any(|c| lang.eq_ignore_ascii_case(c))
        })
    }

    /// Only the opener's exact run, with nothing but whitespace after it,
    /// closes a block. Longer, shorter or other-character runs are inert.
    pub fn closes(opener: &FenceSig<'_>, line: Option<FenceSig<'_>>) -> bool {
        line.is_some_and(|sig| sig.run == opener.run && sig.info.trim().is_empty())
    }
}
