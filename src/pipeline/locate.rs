//! Input discovery: turn user-supplied files and directories into an
//! [`ImageSet`].
//!
//! Directories are listed one level deep only. Anything that does not exist,
//! cannot be read or has an unsupported extension contributes nothing;
//! deciding whether an empty result is a failure is up to the caller.

use super::format::is_supported_path;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Deduplicated list of absolute image paths.
///
/// Built sorted by [`ImageSet::from_paths`]; only
/// [`crate::pipeline::order::apply_order`] produces other orders, and a
/// permutation of a duplicate-free list stays duplicate-free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageSet {
    paths: Vec<PathBuf>,
}

impl ImageSet {
    /// Sort lexicographically by path string and drop duplicates.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut paths: Vec<PathBuf> = paths.into_iter().collect();
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        paths.dedup();
        Self { paths }
    }

    /// Wrap an already-ordered, duplicate-free list.
    pub(crate) fn from_ordered(paths: Vec<PathBuf>) -> Self {
        debug_assert!({
            let mut seen = std::collections::HashSet::new();
            paths.iter().all(|p| seen.insert(p))
        });
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.paths
    }
}

impl<'a> IntoIterator for &'a ImageSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Find every supported image among `inputs`.
///
/// Each input may be a file (kept if its extension is supported) or a
/// directory (its immediate supported files are kept; subdirectories are not
/// entered). The combined result is absolute, sorted and duplicate-free, so
/// passing a directory together with a file inside it yields that file once.
pub fn locate<I, P>(inputs: I) -> ImageSet
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut found = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            found.extend(scan_directory(input));
        } else if input.is_file() {
            if is_supported_path(input) {
                found.push(absolute(input));
            } else {
                debug!("Skipping unsupported file: {}", input.display());
            }
        } else {
            warn!("Input does not exist: {}", input.display());
        }
    }

    let set = ImageSet::from_paths(found);
    debug!("Located {} images", set.len());
    set
}

/// [`locate`] for a single path.
pub fn locate_one(input: impl AsRef<Path>) -> ImageSet {
    locate(std::iter::once(input))
}

/// Immediate supported files of `dir`.
fn scan_directory(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file() && is_supported_path(path) {
                    found.push(absolute(path));
                }
            }
            Err(e) => warn!("Skipping unreadable entry in {}: {}", dir.display(), e),
        }
    }
    found
}

/// Resolve to an absolute, symlink-free path where possible.
fn absolute(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
