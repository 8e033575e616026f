//! Filesystem access: file listings, existence checks and reads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Couldn't open directory for listing: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to classify the file type of {}", path.display())]
    UnknownFileType { path: PathBuf },
}

/// Regular files under a root directory that satisfy a predicate.
///
/// The listing itself holds no directory handles: every call to
/// [`FileListing::iter`] starts a fresh walk, so a listing can be replayed
/// after the tree changed. Hidden entries (names starting with `.`) are
/// skipped, and hidden directories are never descended into.
pub struct FileListing<F> {
    root: PathBuf,
    recursive: bool,
    filter: F,
}

impl<F> FileListing<F>
where
    F: Fn(&Path) -> bool,
{
    pub fn new(root: impl Into<PathBuf>, recursive: bool, filter: F) -> Self {
        Self {
            root: root.into(),
            recursive,
            filter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start walking the tree.
    pub fn iter(&self) -> Result<FileIter<'_, F>, ListingError> {
        if !self.root.exists() {
            return Err(ListingError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }
        if !self.root.is_dir() {
            return Err(ListingError::DirectoryUnreadable {
                path: self.root.clone(),
                source: io::Error::other("not a directory"),
            });
        }

        let mut walker = WalkDir::new(&self.root).min_depth(1).sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let is_visible: fn(&DirEntry) -> bool = is_visible;
        Ok(FileIter {
            root: &self.root,
            inner: walker.into_iter().filter_entry(is_visible),
            filter: &self.filter,
        })
    }

    /// Collect the whole listing, stopping at the first error.
    pub fn collect_paths(&self) -> Result<Vec<PathBuf>, ListingError> {
        self.iter()?.collect()
    }
}

pub struct FileIter<'a, F> {
    root: &'a Path,
    inner: walkdir::FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
    filter: &'a F,
}

impl<F> Iterator for FileIter<'_, F>
where
    F: Fn(&Path) -> bool,
{
    type Item = Result<PathBuf, ListingError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(self.walk_error(err))),
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if file_type.is_symlink() {
                tracing::debug!("Skipping symlink {:?}", entry.path());
                continue;
            }
            if is_special(&file_type) {
                tracing::debug!("Skipping special file {:?}", entry.path());
                continue;
            }
            if !file_type.is_file() {
                return Some(Err(ListingError::UnknownFileType {
                    path: entry.into_path(),
                }));
            }

            if (self.filter)(entry.path()) {
                return Some(Ok(entry.into_path()));
            }
        }
    }
}

impl<F> FileIter<'_, F> {
    fn walk_error(&self, err: walkdir::Error) -> ListingError {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.to_path_buf());

        let not_found = err.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound);
        if not_found && path == self.root {
            ListingError::DirectoryNotFound { path }
        } else {
            ListingError::DirectoryUnreadable {
                path,
                source: err.into(),
            }
        }
    }
}

/// Sockets, FIFOs and device nodes.
#[cfg(unix)]
fn is_special(file_type: &fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;

    file_type.is_socket()
        || file_type.is_fifo()
        || file_type.is_block_device()
        || file_type.is_char_device()
}

#[cfg(not(unix))]
fn is_special(_file_type: &fs::FileType) -> bool {
    false
}

fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0
        || !entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Whether `path` exists and is a regular file.
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}
