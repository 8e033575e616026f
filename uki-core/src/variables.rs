//! Ordered key/value stores and the `key=value` line format that feeds them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// Longest accepted variable key, in characters.
pub const MAX_KEY_LEN: usize = 49;

/// Longest accepted variable value, in characters.
pub const MAX_VALUE_LEN: usize = 99;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid variable definition on line {line}: {content:?}")]
pub struct ParseError {
    pub line: usize,
    pub content: String,
}

/// A single `key=value` definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
}

static LINE_REGEX: OnceLock<Regex> = OnceLock::new();

fn line_regex() -> &'static Regex {
    LINE_REGEX.get_or_init(|| {
        Regex::new(&format!(
            r#"^([^=\r\n]{{1,{}}})=([0-9a-zA-Z '".,;:!@#$%^&*()_+=-]{{1,{}}})"#,
            MAX_KEY_LEN, MAX_VALUE_LEN
        ))
        .unwrap()
    })
}

/// Parse one definition line.
///
/// The value runs for as long as it stays inside the allowed character set;
/// anything after that is ignored.
///
/// ```
/// use uki_core::variables::parse_line;
///
/// let var = parse_line("title=My Wiki <b>ignored</b>").unwrap();
/// assert_eq!(var.key, "title");
/// assert_eq!(var.value, "My Wiki ");
/// ```
pub fn parse_line(line: &str) -> Option<Variable> {
    let captures = line_regex().captures(line)?;
    Some(Variable {
        key: captures[1].to_string(),
        value: captures[2].to_string(),
    })
}

/// Insertion-ordered mapping of unique keys to values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableStore {
    variables: Vec<Variable>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole definitions file.
    ///
    /// A blank line ends the definitions; whatever follows it is not read.
    pub fn parse(contents: &str) -> Result<Self, ParseError> {
        let mut store = Self::new();

        for (idx, line) in contents.lines().enumerate() {
            if line.trim_end_matches('\r').is_empty() {
                break;
            }

            let var = parse_line(line).ok_or_else(|| ParseError {
                line: idx + 1,
                content: line.to_string(),
            })?;
            store.insert(var.key, var.value);
        }

        Ok(store)
    }

    /// Add a variable. The first definition of a key wins.
    ///
    /// Returns `false` when the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains(&key) {
            tracing::warn!("Duplicate variable '{}' ignored", key);
            return false;
        }

        self.variables.push(Variable {
            key,
            value: value.into(),
        });
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get a variable by position
    pub fn get_index(&self, index: usize) -> Option<&Variable> {
        self.variables.get(index)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for VariableStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            store.insert(key, value);
        }
        store
    }
}

impl<'a> IntoIterator for &'a VariableStore {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_line() {
        let var = parse_line("main_template=layout").unwrap();
        assert_eq!(var.key, "main_template");
        assert_eq!(var.value, "layout");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let var = parse_line("query=a=b").unwrap();
        assert_eq!(var.key, "query");
        assert_eq!(var.value, "a=b");
    }

    #[test]
    fn test_value_stops_at_disallowed_character() {
        let var = parse_line("path=docs/index").unwrap();
        assert_eq!(var.value, "docs");
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert!(parse_line("no separator").is_none());
        assert!(parse_line("=value").is_none());
        assert!(parse_line("key=").is_none());
        assert!(parse_line(&format!("{}=v", "k".repeat(MAX_KEY_LEN + 1))).is_none());
    }

    #[test]
    fn test_value_length_is_capped() {
        let line = format!("k={}", "v".repeat(MAX_VALUE_LEN + 20));
        let var = parse_line(&line).unwrap();
        assert_eq!(var.value.len(), MAX_VALUE_LEN);
    }

    #[test]
    fn test_parse_stops_at_blank_line() {
        let store = VariableStore::parse("a=1\r\nb=2\r\n\r\nthis is not parsed\n").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some("1"));
        assert_eq!(store.get("b"), Some("2"));
    }

    #[test]
    fn test_parse_empty_file() {
        let store = VariableStore::parse("").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = VariableStore::parse("a=1\nbroken\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.content, "broken");
    }

    #[test]
    fn test_first_definition_wins() {
        let store = VariableStore::parse("name=first\nname=second\n").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("name"), Some("first"));
    }

    #[test]
    fn test_order_is_preserved() {
        let store: VariableStore = [("z", "1"), ("a", "2"), ("m", "3")].into_iter().collect();
        let keys: Vec<&str> = store.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(store.get_index(1).unwrap().value, "2");
        assert!(store.get_index(3).is_none());
    }
}
