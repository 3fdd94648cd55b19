//! Logical component paths.
//!
//! A component is identified by the root-relative path its four sibling
//! files share, without extension: `pages/home/index` stands for
//! `pages/home/index.json`, `pages/home/index.axml` and so on.

use std::{
    borrow::Borrow,
    fmt,
    path::{Path, PathBuf},
};

use serde::Serialize;

/// A normalized, root-relative, `/`-separated component path.
///
/// Never empty, never starts with `/`, and never contains `.` or `..`
/// segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LogicalPath(String);

impl LogicalPath {
    /// Normalize `path` into a logical path.
    ///
    /// A leading `/` is ignored, empty and `.` segments are dropped, and `..`
    /// removes the preceding segment. Returns `None` when nothing is left or
    /// when `..` would climb above the project root.
    ///
    /// ```
    /// # use mpcheck::LogicalPath;
    /// let path = LogicalPath::new("/pages/./home/../list/index").unwrap();
    /// assert_eq!(path.as_str(), "pages/list/index");
    /// assert!(LogicalPath::new("../outside").is_none());
    /// ```
    pub fn new(path: &str) -> Option<Self> {
        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop()?;
                }
                segment => segments.push(segment),
            }
        }

        if segments.is_empty() {
            return None;
        }
        Some(Self(segments.join("/")))
    }

    /// Recover the logical path of a root-relative file with extension `ext`.
    pub fn from_file(relative: &str, ext: &str) -> Option<Self> {
        let stem = relative.strip_suffix(ext)?.strip_suffix('.')?;
        Self::new(stem)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The directory containing this path, or `None` at the project root.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// The last segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Treat this path as a directory and append `relative` to it.
    pub fn join(&self, relative: &str) -> Option<Self> {
        Self::new(&format!("{}/{relative}", self.0))
    }

    /// Resolve `relative` against the directory containing this path.
    ///
    /// ```
    /// # use mpcheck::LogicalPath;
    /// let page = LogicalPath::new("pages/a").unwrap();
    /// let bar = page.resolve_relative("./widgets/bar").unwrap();
    /// assert_eq!(bar.as_str(), "pages/widgets/bar");
    /// ```
    pub fn resolve_relative(&self, relative: &str) -> Option<Self> {
        match self.parent() {
            Some(dir) => dir.join(relative),
            None => Self::new(relative),
        }
    }

    /// The root-relative file name with `ext` appended.
    pub fn with_extension(&self, ext: &str) -> String {
        format!("{}.{ext}", self.0)
    }

    /// The on-disk location of the sibling file with extension `ext`.
    pub fn to_fs_path(&self, root: &Path, ext: &str) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.with_extension(ext).split('/'));
        path
    }

    /// Whether this path is `dir` or lies inside it.
    pub fn is_under(&self, dir: &str) -> bool {
        let dir = dir.trim_matches('/');
        match self.0.strip_prefix(dir) {
            Some(rest) => dir.is_empty() || rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LogicalPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LogicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
