//! Template expansion: `[name]` inclusions, `%variable%` references and
//! injection of an article at the `%_body_%` marker.
//!
//! Every pass scans its input once, records the tags it finds in an
//! [`EditList`] and materializes the result in a single step. Inclusions are
//! expanded depth-first before they are spliced in, and a depth counter
//! threaded through the recursion turns self-referencing templates or
//! variables into [`TemplateError::RecursionLimitExceeded`].

use crate::edit::EditList;
use crate::fs;
use crate::index::EntryIndex;
use crate::tag::{self, MalformedReason};
use crate::variables::VariableStore;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker replaced by the article body
pub const BODY_MARKER: &str = "%_body_%";

pub const DEFAULT_MAX_EXPANSION_DEPTH: usize = 32;

/// Highest nesting limit a manifest may configure
pub const MAX_EXPANSION_DEPTH_LIMIT: usize = 256;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template file not found: '{name}'")]
    TemplateNotFound { name: String },

    #[error("Error occurred while reading template '{name}' ({}): {source}", path.display())]
    TemplateReadFailed {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error occurred while parsing {context}: {reason} at byte {offset}")]
    TemplateParseFailed {
        context: String,
        offset: usize,
        reason: MalformedReason,
    },

    #[error("Variable not found: '{name}'")]
    VariableNotFound { name: String },

    #[error("Body variable %_body_% not found in the main template")]
    BodyMarkerNotFound,

    #[error("Error occurred while reading article {}: {source}", path.display())]
    ArticleReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Expanding '{name}' exceeded the maximum nesting depth of {limit}")]
    RecursionLimitExceeded { name: String, limit: usize },
}

/// Outcome of a variable pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// Every reference was resolved
    Complete(String),
    /// Substitution stopped at an undefined variable; text after it is
    /// left untouched
    Stopped { text: String, missing: String },
}

impl Substitution {
    pub fn text(&self) -> &str {
        match self {
            Substitution::Complete(text) | Substitution::Stopped { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Substitution::Complete(text) | Substitution::Stopped { text, .. } => text,
        }
    }

    pub fn missing(&self) -> Option<&str> {
        match self {
            Substitution::Complete(_) => None,
            Substitution::Stopped { missing, .. } => Some(missing),
        }
    }
}

/// Expands templates that live in a template index.
pub struct TemplateEngine<'a> {
    templates: &'a EntryIndex,
    max_depth: usize,
}

impl<'a> TemplateEngine<'a> {
    pub fn new(templates: &'a EntryIndex) -> Self {
        Self {
            templates,
            max_depth: DEFAULT_MAX_EXPANSION_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Load a template by relative name and expand every inclusion in it.
    pub fn render_template(&self, name: &str) -> Result<String, TemplateError> {
        self.expand(name, 0)
    }

    /// Expand inclusions in a piece of text that is not itself a template file.
    pub fn render_text(&self, text: &str) -> Result<String, TemplateError> {
        self.expand_text("inline text", text, 0)
    }

    fn expand(&self, name: &str, depth: usize) -> Result<String, TemplateError> {
        if depth > self.max_depth {
            return Err(TemplateError::RecursionLimitExceeded {
                name: name.to_string(),
                limit: self.max_depth,
            });
        }

        let text = self.load(name)?;
        self.expand_text(&format!("template '{}'", name), &text, depth)
    }

    fn expand_text(&self, context: &str, text: &str, depth: usize) -> Result<String, TemplateError> {
        let mut edits = EditList::new(text);

        for found in tag::INCLUDE.tags(text) {
            let found = found.map_err(|m| TemplateError::TemplateParseFailed {
                context: context.to_string(),
                offset: m.offset,
                reason: m.reason,
            })?;

            tracing::debug!("Including template '{}' at depth {}", found.name, depth + 1);
            let inner = self.expand(found.name, depth + 1)?;
            edits.push(found.span, inner);
        }

        Ok(edits.apply())
    }

    fn load(&self, name: &str) -> Result<String, TemplateError> {
        let entry = self
            .templates
            .find(name)
            .ok_or_else(|| TemplateError::TemplateNotFound {
                name: name.to_string(),
            })?;
        let path = self.templates.file_path(entry);

        let read_failed = |source| TemplateError::TemplateReadFailed {
            name: name.to_string(),
            path: path.clone(),
            source,
        };

        let text = fs::read_text(&path).map_err(read_failed)?;
        if text.is_empty() {
            return Err(read_failed(io::Error::new(
                io::ErrorKind::InvalidData,
                "template file is empty",
            )));
        }

        Ok(text)
    }
}

/// Substitute every `%variable%` in `text`, failing on the first undefined one.
pub fn render_variables(
    text: &str,
    variables: &VariableStore,
    max_depth: usize,
) -> Result<String, TemplateError> {
    match substitute_variables(text, variables, max_depth)? {
        Substitution::Complete(text) => Ok(text),
        Substitution::Stopped { missing, .. } => {
            Err(TemplateError::VariableNotFound { name: missing })
        }
    }
}

/// Substitute `%variable%` references in document order.
///
/// Values may reference other variables; they are expanded before being
/// spliced in. Reaching an undefined variable is not an error here: the
/// result is [`Substitution::Stopped`] and the caller decides whether the
/// partial text is acceptable.
///
/// ```
/// use uki_core::template::{substitute_variables, Substitution};
/// use uki_core::VariableStore;
///
/// let vars: VariableStore = [("name", "World")].into_iter().collect();
/// let out = substitute_variables("Hello %name%!", &vars, 8).unwrap();
/// assert_eq!(out, Substitution::Complete("Hello World!".to_string()));
/// ```
pub fn substitute_variables(
    text: &str,
    variables: &VariableStore,
    max_depth: usize,
) -> Result<Substitution, TemplateError> {
    substitute(text, "page text", variables, 0, max_depth)
}

fn substitute(
    text: &str,
    context: &str,
    variables: &VariableStore,
    depth: usize,
    max_depth: usize,
) -> Result<Substitution, TemplateError> {
    let mut edits = EditList::new(text);

    for found in tag::VARIABLE.tags(text) {
        let found = found.map_err(|m| TemplateError::TemplateParseFailed {
            context: context.to_string(),
            offset: m.offset,
            reason: m.reason,
        })?;

        let Some(value) = variables.get(found.name) else {
            return Ok(Substitution::Stopped {
                text: edits.apply(),
                missing: found.name.to_string(),
            });
        };

        let expanded = if value.contains(tag::VARIABLE.open) {
            if depth >= max_depth {
                return Err(TemplateError::RecursionLimitExceeded {
                    name: found.name.to_string(),
                    limit: max_depth,
                });
            }
            let context = format!("variable '{}'", found.name);
            match substitute(value, &context, variables, depth + 1, max_depth)? {
                Substitution::Complete(value) => value,
                Substitution::Stopped { missing, .. } => {
                    return Ok(Substitution::Stopped {
                        text: edits.apply(),
                        missing,
                    });
                }
            }
        } else {
            value.to_string()
        };

        edits.push(found.span, expanded);
    }

    Ok(Substitution::Complete(edits.apply()))
}

/// Replace the first `%_body_%` in `template` with the article at `article_path`.
///
/// The marker is checked before the article is read.
pub fn render_article_in_template(
    template: &str,
    article_path: &Path,
) -> Result<String, TemplateError> {
    let Some(start) = template.find(BODY_MARKER) else {
        return Err(TemplateError::BodyMarkerNotFound);
    };

    let article = fs::read_text(article_path).map_err(|source| TemplateError::ArticleReadFailed {
        path: article_path.to_path_buf(),
        source,
    })?;

    let mut edits = EditList::new(template);
    edits.push(start..start + BODY_MARKER.len(), article);
    Ok(edits.apply())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::EntryKind;
    use std::fs as stdfs;
    use tempfile::{tempdir, TempDir};

    fn template_dir(files: &[(&str, &str)]) -> (TempDir, EntryIndex) {
        let dir = tempdir().unwrap();
        for (rel, contents) in files {
            let path = dir.path().join(rel);
            stdfs::create_dir_all(path.parent().unwrap()).unwrap();
            stdfs::write(path, contents).unwrap();
        }
        let index = EntryIndex::build(EntryKind::Template, dir.path(), "html", true).unwrap();
        (dir, index)
    }

    fn store(pairs: &[(&str, &str)]) -> VariableStore {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_render_plain_template() {
        let (_dir, index) = template_dir(&[("layout.html", "<body>%_body_%</body>")]);
        let engine = TemplateEngine::new(&index);
        assert_eq!(engine.render_template("layout").unwrap(), "<body>%_body_%</body>");
    }

    #[test]
    fn test_nested_inclusions() {
        let (_dir, index) = template_dir(&[
            ("layout.html", "<html>[partials/head]<body>%_body_%</body>[footer]</html>"),
            ("partials/head.html", "<head>[partials/title]</head>"),
            ("partials/title.html", "<title>%title%</title>"),
            ("footer.html", "<footer>bye</footer>"),
        ]);
        let engine = TemplateEngine::new(&index);

        assert_eq!(
            engine.render_template("layout").unwrap(),
            "<html><head><title>%title%</title></head><body>%_body_%</body><footer>bye</footer></html>"
        );
    }

    #[test]
    fn test_repeated_inclusion() {
        let (_dir, index) = template_dir(&[
            ("page.html", "[hr]a[hr]b[hr]"),
            ("hr.html", "<hr>"),
        ]);
        let engine = TemplateEngine::new(&index);
        assert_eq!(engine.render_template("page").unwrap(), "<hr>a<hr>b<hr>");
    }

    #[test]
    fn test_expansion_is_idempotent() {
        let (_dir, index) = template_dir(&[
            ("layout.html", "<main>[inner]</main>"),
            ("inner.html", "<p>%_body_%</p>"),
        ]);
        let engine = TemplateEngine::new(&index);

        let once = engine.render_template("layout").unwrap();
        let twice = engine.render_text(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_template() {
        let (_dir, index) = template_dir(&[("layout.html", "<div>[nope]</div>")]);
        let engine = TemplateEngine::new(&index);

        match engine.render_template("layout") {
            Err(TemplateError::TemplateNotFound { name }) => assert_eq!(name, "nope"),
            other => panic!("Expected TemplateNotFound, got {:?}", other),
        }
        assert!(matches!(
            engine.render_template("absent"),
            Err(TemplateError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_template_is_read_failure() {
        let (_dir, index) = template_dir(&[("layout.html", "[empty]"), ("empty.html", "")]);
        let engine = TemplateEngine::new(&index);

        match engine.render_template("layout") {
            Err(TemplateError::TemplateReadFailed { name, .. }) => assert_eq!(name, "empty"),
            other => panic!("Expected TemplateReadFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_tag_is_reported() {
        let (_dir, index) = template_dir(&[("layout.html", "<div>[unclosed</div>")]);
        let engine = TemplateEngine::new(&index);

        match engine.render_template("layout") {
            Err(TemplateError::TemplateParseFailed { offset, reason, context }) => {
                assert_eq!(offset, 5);
                assert_eq!(reason, MalformedReason::Unterminated);
                assert!(context.contains("layout"));
            }
            other => panic!("Expected TemplateParseFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_self_inclusion_hits_recursion_limit() {
        let (_dir, index) = template_dir(&[("a.html", "loop [a]")]);
        let engine = TemplateEngine::new(&index).with_max_depth(5);

        match engine.render_template("a") {
            Err(TemplateError::RecursionLimitExceeded { name, limit }) => {
                assert_eq!(name, "a");
                assert_eq!(limit, 5);
            }
            other => panic!("Expected RecursionLimitExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_mutual_inclusion_hits_recursion_limit() {
        let (_dir, index) = template_dir(&[("a.html", "[b]"), ("b.html", "[a]")]);
        let engine = TemplateEngine::new(&index);
        assert!(matches!(
            engine.render_template("a"),
            Err(TemplateError::RecursionLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_render_variables() {
        let vars = store(&[("name", "World")]);
        assert_eq!(render_variables("Hello %name%!", &vars, 8).unwrap(), "Hello World!");
        assert_eq!(render_variables("no tags", &vars, 8).unwrap(), "no tags");
    }

    #[test]
    fn test_missing_variable() {
        let vars = store(&[("name", "World")]);
        match render_variables("Hello %missing%!", &vars, 8) {
            Err(TemplateError::VariableNotFound { name }) => assert_eq!(name, "missing"),
            other => panic!("Expected VariableNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_substitution_keeps_earlier_values() {
        let vars = store(&[("a", "1"), ("c", "3")]);
        let out = substitute_variables("%a% %b% %c%", &vars, 8).unwrap();

        assert_eq!(out.missing(), Some("b"));
        assert_eq!(out.text(), "1 %b% %c%");
    }

    #[test]
    fn test_variable_values_are_expanded() {
        let vars = store(&[("greeting", "Hello %name%"), ("name", "uki")]);
        assert_eq!(render_variables("%greeting%!", &vars, 8).unwrap(), "Hello uki!");
    }

    #[test]
    fn test_self_referencing_variable() {
        let vars = store(&[("a", "x%a%")]);
        assert!(matches!(
            render_variables("%a%", &vars, 4),
            Err(TemplateError::RecursionLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_malformed_variable_reference() {
        let vars = store(&[]);
        assert!(matches!(
            render_variables("width: 100%", &vars, 8),
            Err(TemplateError::TemplateParseFailed {
                reason: MalformedReason::Unterminated,
                ..
            })
        ));
    }

    #[test]
    fn test_article_injection() {
        let dir = tempdir().unwrap();
        let article = dir.path().join("home.html");
        stdfs::write(&article, "Hi %_body_%").unwrap();

        let out = render_article_in_template("<body>%_body_%</body>", &article).unwrap();
        assert_eq!(out, "<body>Hi %_body_%</body>");
    }

    #[test]
    fn test_missing_body_marker_skips_article() {
        let dir = tempdir().unwrap();
        let never_created = dir.path().join("missing.html");

        assert!(matches!(
            render_article_in_template("<body></body>", &never_created),
            Err(TemplateError::BodyMarkerNotFound)
        ));
    }

    #[test]
    fn test_unreadable_article() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            render_article_in_template("%_body_%", &dir.path().join("gone.html")),
            Err(TemplateError::ArticleReadFailed { .. })
        ));
    }
}
