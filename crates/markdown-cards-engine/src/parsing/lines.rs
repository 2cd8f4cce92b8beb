use super::span::Span;

/// A single newline-delimited line of a body with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord<'a> {
    /// Line text without its terminating `\n` (a trailing `\r` is kept).
    pub text: &'a str,
    /// `end` stops before the line's own newline.
    pub span: Span,
}

impl LineRecord<'_> {
    /// Whitespace-only line.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Splits `body` into line records whose spans are absolute offsets into it.
pub fn line_records(body: &str) -> Vec<LineRecord<'_>> {
    let mut offset = 0usize;
    body.split('\n')
        .map(|text| {
            let start = offset;
            offset += text.len() + 1;
            LineRecord {
                text,
                span: Span::new(start, start + text.len()),
            }
        })
        .collect()
}
