//! Content index: the articles and templates discovered under a wiki root.

use crate::fs::{FileListing, ListingError};
use crate::path;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// An indexed article or template file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Path below the content root, `/`-separated, without extension
    pub relative_path: String,

    /// File base name without extension
    pub display_name: String,

    /// Name of the containing directory (absent at the top level)
    pub parent_name: Option<String>,

    /// Number of separators in `relative_path`
    pub depth: usize,
}

impl Entry {
    /// Build an entry from a path relative to the content root.
    ///
    /// `relative` may use either separator and may still carry `extension`.
    pub fn from_relative(relative: &str, extension: &str) -> Self {
        let normalized = path::normalize_relative(relative);
        let relative_path = path::strip_extension(&normalized, extension).to_string();
        let depth = path::depth(&relative_path);
        let parent_name = if depth > 0 {
            path::parent_dir_name(&relative_path).map(str::to_string)
        } else {
            None
        };

        Self {
            display_name: path::basename_noext(&normalized).to_string(),
            relative_path,
            parent_name,
            depth,
        }
    }
}

/// Ordering used by every index: deeper entries first, then by path.
///
/// Keeps the contents of a directory adjacent to each other when the index
/// is listed in order.
pub fn entry_ordering(a: &Entry, b: &Entry) -> Ordering {
    b.depth
        .cmp(&a.depth)
        .then_with(|| a.relative_path.cmp(&b.relative_path))
}

/// What kind of content an index holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Article,
    Template,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Article => "article",
            EntryKind::Template => "template",
        }
    }
}

/// Ordered collection of entries found under one content root.
#[derive(Debug, Clone)]
pub struct EntryIndex {
    kind: EntryKind,
    root: PathBuf,
    extension: String,
    entries: Vec<Entry>,
}

impl EntryIndex {
    /// Walk `root` and index every file whose extension is `extension`.
    pub fn build(
        kind: EntryKind,
        root: &Path,
        extension: &str,
        recursive: bool,
    ) -> Result<Self, ListingError> {
        let listing = FileListing::new(root, recursive, |p: &Path| {
            path::extension_matches(&p.to_string_lossy(), extension)
        });

        let mut entries = Vec::new();
        for file in listing.iter()? {
            let file = file?;
            let relative = file.strip_prefix(root).unwrap_or(&file);
            entries.push(Entry::from_relative(&relative.to_string_lossy(), extension));
        }
        entries.sort_by(entry_ordering);

        tracing::info!(
            "Indexed {} {}s under {:?}",
            entries.len(),
            kind.as_str(),
            root
        );

        Ok(Self {
            kind,
            root: root.to_path_buf(),
            extension: extension.to_string(),
            entries,
        })
    }

    /// Build an index from already known relative paths, without touching disk.
    pub fn from_paths<I, S>(kind: EntryKind, root: &Path, extension: &str, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<Entry> = paths
            .into_iter()
            .map(|p| Entry::from_relative(p.as_ref(), extension))
            .collect();
        entries.sort_by(entry_ordering);

        Self {
            kind,
            root: root.to_path_buf(),
            extension: extension.to_string(),
            entries,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Get an entry by its position in the index
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Find an entry by relative path.
    ///
    /// Leading or duplicate separators and a trailing content extension are
    /// ignored.
    pub fn find(&self, name: &str) -> Option<&Entry> {
        let normalized = path::normalize_relative(name);
        let wanted = path::strip_extension(&normalized, &self.extension);
        self.entries.iter().find(|e| e.relative_path == wanted)
    }

    /// Full on-disk path of an entry.
    pub fn file_path(&self, entry: &Entry) -> PathBuf {
        let mut file = self.root.clone();
        let (dirs, name) = match entry.relative_path.rsplit_once(path::SEPARATOR) {
            Some((dirs, name)) => (Some(dirs), name),
            None => (None, entry.relative_path.as_str()),
        };
        for segment in dirs.into_iter().flat_map(|d| d.split(path::SEPARATOR)) {
            file.push(segment);
        }
        file.push(path::with_extension(name, &self.extension));
        file
    }

    /// Group the index by parent directory, in index order.
    ///
    /// A [`TreeNode::Directory`] is emitted every time the full parent
    /// directory path changes, followed by the entries that live in it.
    pub fn tree(&self) -> Vec<TreeNode<'_>> {
        let mut nodes = Vec::new();
        let mut last_dir: Option<&str> = None;

        for entry in &self.entries {
            let dir = entry
                .relative_path
                .rsplit_once(path::SEPARATOR)
                .map(|(dir, _)| dir);
            if let (Some(_), Some(name)) = (dir, entry.parent_name.as_deref()) {
                if dir != last_dir {
                    nodes.push(TreeNode::Directory {
                        name,
                        depth: entry.depth - 1,
                    });
                }
            }
            last_dir = dir;
            nodes.push(TreeNode::Entry(entry));
        }

        nodes
    }
}

impl<'a> IntoIterator for &'a EntryIndex {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One line of a grouped index listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum TreeNode<'a> {
    Directory { name: &'a str, depth: usize },
    Entry(&'a Entry),
}
