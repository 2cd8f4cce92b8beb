/// A byte range into a document body.
///
/// Whether `end` is treated as inclusive or exclusive depends on what the
/// span describes; see [`Span::contains`] and [`Span::contains_inclusive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// End byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// `start <= pos < end`
    #[must_use]
    pub fn contains(self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// `start <= pos <= end`
    #[must_use]
    pub fn contains_inclusive(self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_and_inclusive_ends() {
        let span = Span::new(2, 5);
        assert!(span.contains(2));
        assert!(!span.contains(5));
        assert!(span.contains_inclusive(5));
        assert!(!span.contains_inclusive(6));
        assert_eq!(span.len(), 3);
    }

    #[test]
    fn inverted_span_is_empty() {
        assert!(Span::new(4, 1).is_empty());
    }
}
