//! Span edits over an immutable source text.

use std::ops::Range;

/// A byte span of the source and the text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
}

/// Collects non-overlapping edits against `source` and applies them in one
/// pass, so every span refers to the source text no matter how many
/// substitutions come before it.
#[derive(Debug)]
pub struct EditList<'a> {
    source: &'a str,
    edits: Vec<Edit>,
}

impl<'a> EditList<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Queue a replacement.
    ///
    /// Edits must be pushed in source order and may not overlap.
    pub fn push(&mut self, span: Range<usize>, replacement: impl Into<String>) {
        debug_assert!(span.start <= span.end && span.end <= self.source.len());
        debug_assert!(
            self.edits.last().map_or(true, |last| last.span.end <= span.start),
            "edits must be ordered and disjoint"
        );
        self.edits.push(Edit {
            span,
            replacement: replacement.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Build the edited text.
    pub fn apply(self) -> String {
        let extra: usize = self.edits.iter().map(|e| e.replacement.len()).sum();
        let mut out = String::with_capacity(self.source.len() + extra);
        let mut cursor = 0;

        for edit in &self.edits {
            out.push_str(&self.source[cursor..edit.span.start]);
            out.push_str(&edit.replacement);
            cursor = edit.span.end;
        }
        out.push_str(&self.source[cursor..]);

        out
    }
}
