//! Scanner for delimiter-enclosed tags such as `[header]` and `%title%`.

use std::fmt;
use std::ops::Range;

/// Longest accepted tag name, in characters.
pub const MAX_TAG_NAME_LEN: usize = 49;

/// Opening and closing delimiters of one kind of tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSyntax {
    pub open: char,
    pub close: char,
}

/// `[name]`: template inclusion
pub const INCLUDE: TagSyntax = TagSyntax {
    open: '[',
    close: ']',
};

/// `%name%`: variable reference
pub const VARIABLE: TagSyntax = TagSyntax {
    open: '%',
    close: '%',
};

/// A well-formed tag located in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    /// Byte span of the whole tag, delimiters included
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    Empty,
    TooLong,
    Unterminated,
    LineBreak,
    NestedOpen,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MalformedReason::Empty => "empty tag name",
            MalformedReason::TooLong => "tag name is too long",
            MalformedReason::Unterminated => "tag is never closed",
            MalformedReason::LineBreak => "tag name spans a line break",
            MalformedReason::NestedOpen => "tag opened inside another tag",
        };
        f.write_str(msg)
    }
}

/// A tag opener that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Malformed {
    /// Byte offset of the opening delimiter
    pub offset: usize,
    pub reason: MalformedReason,
}

/// Result of looking for the next tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan<'a> {
    Found(Tag<'a>),
    NotPresent,
    Malformed(Malformed),
}

impl TagSyntax {
    /// Look for the first tag at or after byte offset `from`.
    pub fn scan<'a>(&self, text: &'a str, from: usize) -> Scan<'a> {
        let Some(rel) = text[from..].find(self.open) else {
            return Scan::NotPresent;
        };
        let start = from + rel;
        let name_start = start + self.open.len_utf8();
        let malformed = |reason| Scan::Malformed(Malformed {
            offset: start,
            reason,
        });

        for (count, (i, c)) in text[name_start..].char_indices().enumerate() {
            if c == self.close {
                let name = &text[name_start..name_start + i];
                if name.is_empty() {
                    return malformed(MalformedReason::Empty);
                }
                return Scan::Found(Tag {
                    name,
                    span: start..name_start + i + self.close.len_utf8(),
                });
            }
            if c == '\n' || c == '\r' {
                return malformed(MalformedReason::LineBreak);
            }
            if c == self.open {
                return malformed(MalformedReason::NestedOpen);
            }
            if count >= MAX_TAG_NAME_LEN {
                return malformed(MalformedReason::TooLong);
            }
        }

        malformed(MalformedReason::Unterminated)
    }

    /// Iterate over every tag of `text` in document order.
    ///
    /// The iterator yields a single `Err` and stops at the first malformed
    /// opener.
    pub fn tags<'a>(&self, text: &'a str) -> Tags<'a> {
        Tags {
            syntax: *self,
            text,
            pos: 0,
            done: false,
        }
    }
}

pub struct Tags<'a> {
    syntax: TagSyntax,
    text: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for Tags<'a> {
    type Item = Result<Tag<'a>, Malformed>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.syntax.scan(self.text, self.pos) {
            Scan::Found(tag) => {
                self.pos = tag.span.end;
                Some(Ok(tag))
            }
            Scan::NotPresent => {
                self.done = true;
                None
            }
            Scan::Malformed(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_include_tag() {
        let text = "<div>[header]</div>";
        match INCLUDE.scan(text, 0) {
            Scan::Found(tag) => {
                assert_eq!(tag.name, "header");
                assert_eq!(&text[tag.span], "[header]");
            }
            other => panic!("Expected a tag, got {:?}", other),
        }
    }

    #[test]
    fn test_tag_at_start_of_text() {
        assert!(matches!(INCLUDE.scan("[a]", 0), Scan::Found(Tag { name: "a", .. })));
    }

    #[test]
    fn test_not_present() {
        assert_eq!(INCLUDE.scan("plain text", 0), Scan::NotPresent);
        assert_eq!(VARIABLE.scan("", 0), Scan::NotPresent);
    }

    #[test]
    fn test_malformed_reasons() {
        let reason = |syntax: TagSyntax, text: &str| match syntax.scan(text, 0) {
            Scan::Malformed(m) => m.reason,
            other => panic!("Expected malformed for {:?}, got {:?}", text, other),
        };

        assert_eq!(reason(INCLUDE, "a [] b"), MalformedReason::Empty);
        assert_eq!(reason(VARIABLE, "100%% off"), MalformedReason::Empty);
        assert_eq!(reason(INCLUDE, "a [open"), MalformedReason::Unterminated);
        assert_eq!(reason(VARIABLE, "width: 100%;"), MalformedReason::Unterminated);
        assert_eq!(reason(INCLUDE, "[a\n]"), MalformedReason::LineBreak);
        assert_eq!(reason(INCLUDE, "[a[b]]"), MalformedReason::NestedOpen);

        let long = format!("[{}]", "x".repeat(MAX_TAG_NAME_LEN + 1));
        assert_eq!(reason(INCLUDE, &long), MalformedReason::TooLong);
    }

    #[test]
    fn test_max_length_name_is_accepted() {
        let text = format!("%{}%", "x".repeat(MAX_TAG_NAME_LEN));
        assert!(matches!(VARIABLE.scan(&text, 0), Scan::Found(_)));
    }

    #[test]
    fn test_malformed_offset() {
        match INCLUDE.scan("ok [fine] then [broken", 0) {
            Scan::Found(tag) => assert_eq!(tag.name, "fine"),
            other => panic!("unexpected {:?}", other),
        }
        match INCLUDE.scan("ok [fine] then [broken", 9) {
            Scan::Malformed(m) => assert_eq!(m.offset, 15),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_iterates_in_order() {
        let names: Vec<&str> = VARIABLE
            .tags("%a% and %b%, then %c%")
            .map(|t| t.unwrap().name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_iteration_stops_at_malformed() {
        let results: Vec<_> = INCLUDE.tags("[a] [b] [c").collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert_eq!(results[2].as_ref().unwrap_err().reason, MalformedReason::Unterminated);
    }

    #[test]
    fn test_multibyte_names() {
        let text = "é[café]";
        match INCLUDE.scan(text, 0) {
            Scan::Found(tag) => {
                assert_eq!(tag.name, "café");
                assert_eq!(&text[tag.span], "[café]");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
