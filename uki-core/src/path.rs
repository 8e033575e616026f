//! Path arithmetic on `/`-separated relative paths.
//!
//! Everything here works on strings rather than [`std::path::Path`] because
//! entry paths and tag names are compared and split textually, and must look
//! the same on every platform.

/// Separator used for every relative path handled by the engine.
pub const SEPARATOR: char = '/';

/// Convert platform separators to `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Collapse runs of duplicate separators into a single one.
///
/// ```
/// use uki_core::path::cleanup_path;
///
/// assert_eq!(cleanup_path("a//b///c"), "a/b/c");
/// assert_eq!(cleanup_path("/root//pages/"), "/root/pages/");
/// ```
pub fn cleanup_path(path: &str) -> String {
    let mut cleaned = String::with_capacity(path.len());
    let mut previous_was_separator = false;

    for c in path.chars() {
        if c == SEPARATOR {
            if previous_was_separator {
                continue;
            }
            previous_was_separator = true;
        } else {
            previous_was_separator = false;
        }
        cleaned.push(c);
    }

    cleaned
}

/// Join path segments with `/` and clean up the result.
///
/// Only the last segment is assumed to be a file; a separator is placed
/// between every pair of segments and duplicates are collapsed afterwards.
pub fn join(segments: &[&str]) -> String {
    cleanup_path(&segments.join("/"))
}

/// Base name of a path, without any extension.
///
/// The name is cut at its first `.`, so `notes/archive.2024.html` yields
/// `archive`.
pub fn basename_noext(path: &str) -> &str {
    let name = path.rsplit(SEPARATOR).next().unwrap_or(path);
    match name.find('.') {
        Some(dot) => &name[..dot],
        None => name,
    }
}

/// Name of the directory that directly contains `path`.
///
/// Returns `None` when the path has no parent directory. A leading separator
/// does not count as a parent.
pub fn parent_dir_name(path: &str) -> Option<&str> {
    let trimmed = path.strip_prefix(SEPARATOR).unwrap_or(path);
    let last = trimmed.rfind(SEPARATOR)?;
    let dir = &trimmed[..last];
    Some(match dir.rfind(SEPARATOR) {
        Some(prev) => &dir[prev + 1..],
        None => dir,
    })
}

/// Nesting depth of a path: the number of separators it contains.
pub fn depth(path: &str) -> usize {
    path.chars().filter(|&c| c == SEPARATOR).count()
}

/// Whether the file name in `path` ends in `.{ext}`.
///
/// A path without any dot in its file name never matches.
pub fn extension_matches(path: &str, ext: &str) -> bool {
    let name = path.rsplit(SEPARATOR).next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) => &name[dot + 1..] == ext,
        None => false,
    }
}

/// Remove a trailing `.{ext}` from `path` if it is present.
pub fn strip_extension<'a>(path: &'a str, ext: &str) -> &'a str {
    path.strip_suffix(ext)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(path)
}

/// Append `.{ext}` to `path`.
pub fn with_extension(path: &str, ext: &str) -> String {
    format!("{}.{}", path, ext)
}

/// Normalize a user- or template-supplied relative name.
///
/// Converts separators, collapses duplicates and trims surrounding
/// separators and whitespace, so `"/partials//header"` and
/// `"partials/header"` name the same entry.
pub fn normalize_relative(name: &str) -> String {
    let normalized = cleanup_path(&normalize_separators(name.trim()));
    normalized.trim_matches(SEPARATOR).to_string()
}
