use std::sync::LazyLock;

use regex::Regex;

use super::{
    fence::{CodeFence, FenceSig},
    lines::{LineRecord, line_records},
    span::Span,
};

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`\n]+`").expect("inline code regex"));

/// A terminated fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// From the start of the opening line to the end of the closing line.
    pub span: Span,
    /// Declared language is `cardlink` or `embed`.
    pub is_cardlink: bool,
    /// Lines between the fences.
    pub content: &'a str,
}

/// Code regions of a body, as reported by [`scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeRanges<'a> {
    pub fenced: Vec<FencedBlock<'a>>,
    pub indented: Vec<Span>,
    pub inline: Vec<Span>,
}

impl CodeRanges<'_> {
    /// Whether an embed starting at `pos` sits inside code.
    ///
    /// Fenced and indented ranges include their end offset, inline ranges do
    /// not. Card-link blocks are data, not code, and never exclude.
    pub fn contains(&self, pos: usize) -> bool {
        self.fenced
            .iter()
            .any(|b| !b.is_cardlink && b.span.contains_inclusive(pos))
            || self.indented.iter().any(|s| s.contains_inclusive(pos))
            || self.inline.iter().any(|s| s.contains(pos))
    }

    fn in_fenced_block(&self, pos: usize) -> bool {
        self.fenced.iter().any(|b| b.span.contains_inclusive(pos))
    }
}

/// Classifies the fenced, indented and inline code ranges of `body`.
pub fn scan(body: &str) -> CodeRanges<'_> {
    let lines = line_records(body);

    let mut fences = FenceScanner::new(body);
    for line in &lines {
        fences.push(line);
    }

    let mut ranges = CodeRanges {
        fenced: fences.finish(),
        ..CodeRanges::default()
    };
    ranges.indented = scan_indented(&lines, &ranges);
    ranges.inline = INLINE_CODE
        .find_iter(body)
        .filter(|m| !ranges.in_fenced_block(m.start()))
        .map(|m| Span::new(m.start(), m.end()))
        .collect();
    ranges
}

#[derive(Debug, Clone, Copy)]
struct OpenFence<'a> {
    sig: FenceSig<'a>,
    start: usize,
    content_start: usize,
    is_cardlink: bool,
}

/// Tracks a single open fence at a time. Nested fences are not modelled:
/// while a block is open, only the opener's exact signature can end it.
struct FenceScanner<'a> {
    body: &'a str,
    open: Option<OpenFence<'a>>,
    out: Vec<FencedBlock<'a>>,
}

impl<'a> FenceScanner<'a> {
    fn new(body: &'a str) -> Self {
        Self {
            body,
            open: None,
            out: vec![],
        }
    }

    fn push(&mut self, line: &LineRecord<'a>) {
        let sig = CodeFence::sig(line.text);

        let Some(open) = self.open else {
            if let Some(sig) = sig {
                self.open = Some(OpenFence {
                    sig,
                    start: line.span.start,
                    content_start: (line.span.end + 1).min(self.body.len()),
                    is_cardlink: CodeFence::is_cardlink(&sig),
                });
            }
            return;
        };

        if CodeFence::closes(&open.sig, sig) {
            let content_end = line.span.start.max(open.content_start);
            let content = &self.body[open.content_start..content_end];
            let content = content.strip_suffix('\n').unwrap_or(content);
            self.out.push(FencedBlock {
                span: Span::new(open.start, line.span.end),
                is_cardlink: open.is_cardlink,
                content: content.strip_suffix('\r').unwrap_or(content),
            });
            self.open = None;
        }
    }

    fn finish(self) -> Vec<FencedBlock<'a>> {
        // An unterminated fence is not a block; its lines stay ordinary text.
        self.out
    }
}

/// Indented code needs a blank line (or start of input) before its first line.
/// Blank lines continue a run, any other unindented line ends it, and lines of
/// fenced blocks are skipped and end it too.
fn scan_indented(lines: &[LineRecord<'_>], ranges: &CodeRanges<'_>) -> Vec<Span> {
    let mut out = vec![];
    let mut run: Option<Span> = None;
    let mut prev_blank = true;

    for line in lines {
        if ranges.in_fenced_block(line.span.start) {
            out.extend(run.take());
            prev_blank = false;
            continue;
        }
        if line.is_blank() {
            prev_blank = true;
            continue;
        }

        let indented = line.text.starts_with('\t') || line.text.starts_with("    ");
        match run.as_mut() {
            Some(span) if indented => span.end = line.span.end,
            None if indented && prev_blank => run = Some(line.span),
            _ => out.extend(run.take()),
        }
        prev_blank = false;
    }

    out.extend(run);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fenced_block_spans_opener_to_closer() {
        let body = "intro\n```js\nlet x;\n```\nafter";
        let ranges = scan(body);
        assert_eq!(
            ranges.fenced,
            vec![FencedBlock {
                span: Span::new(6, 22),
                is_cardlink: false,
                content: "let x;",
            }]
        );
        assert!(ranges.contains(6));
        assert!(ranges.contains(22));
        assert!(!ranges.contains(23));
    }

    #[test]
    fn shorter_inner_fence_does_not_close() {
        let body = "````\n```\n![[in.png]]\n```\n````\n![[out.png]]";
        let ranges = scan(body);
        assert_eq!(ranges.fenced.len(), 1);
        assert_eq!(ranges.fenced[0].span, Span::new(0, 29));
        assert!(ranges.contains(body.find("![[in").unwrap()));
        assert!(!ranges.contains(body.find("![[out").unwrap()));
    }

    #[test]
    fn unterminated_fence_is_not_a_block() {
        let ranges = scan("```\n![[a.png]]\n");
        assert!(ranges.fenced.is_empty());
        assert!(!ranges.contains(4));
    }

    #[test]
    fn empty_fenced_block_has_empty_content() {
        let ranges = scan("```cardlink\n```");
        assert_eq!(ranges.fenced[0].content, "");
        assert!(ranges.fenced[0].is_cardlink);
    }

    #[test]
    fn cardlink_block_is_not_code() {
        let body = "```cardlink\nimage: x.png\n```";
        let ranges = scan(body);
        assert!(ranges.fenced[0].is_cardlink);
        assert!(!ranges.contains(12));
    }

    #[test]
    fn indented_block_requires_preceding_blank_line() {
        assert!(scan("Some text\n    code").indented.is_empty());
        assert_eq!(
            scan("Some text\n\n    code").indented,
            vec![Span::new(11, 19)]
        );
        assert_eq!(scan("\tfirst line").indented, vec![Span::new(0, 11)]);
    }

    #[test]
    fn blank_lines_do_not_end_indented_run() {
        let body = "\n    a\n\n    b\ntext\n    c";
        let ranges = scan(body);
        assert_eq!(ranges.indented, vec![Span::new(1, 13)]);
    }

    #[test]
    fn fence_lines_close_indented_run() {
        let body = "\n    a\n```\n    b\n```\n    c";
        let ranges = scan(body);
        assert_eq!(ranges.indented, vec![Span::new(1, 6)]);
    }

    #[test]
    fn inline_code_is_end_exclusive() {
        let ranges = scan("a `code` b");
        assert_eq!(ranges.inline, vec![Span::new(2, 8)]);
        assert!(ranges.contains(2));
        assert!(ranges.contains(7));
        assert!(!ranges.contains(8));
    }

    #[test]
    fn inline_code_inside_fence_is_discarded() {
        let ranges = scan("```\n`x`\n```\n`y`");
        assert_eq!(ranges.inline, vec![Span::new(12, 15)]);
    }

    #[test]
    fn inline_code_does_not_span_lines() {
        assert!(scan("`a\nb`").inline.is_empty());
    }
}
