//! Filesystem access used by the resolver and orphan detection.
//!
//! The checker only needs three operations, captured by [`FileSystem`].
//! [`OsFileSystem`] is the production implementation; tests can provide
//! their own to check projects that only exist in memory.

use std::{fs, path::Path};

use log::trace;
use walkdir::WalkDir;

use crate::error::CheckError;

/// Read-only view of a project tree.
pub trait FileSystem {
    /// Whether `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Read a file that is expected to exist.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD, so legacy
    /// encodings still get checked.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Io`] carrying the path when the file cannot be read.
    fn read_to_string(&self, path: &Path) -> Result<String, CheckError>;

    /// List every file under `root` as a root-relative, `/`-separated path.
    ///
    /// Directories whose name appears in `excluded_dirs` are skipped at any
    /// depth. The result is sorted.
    fn list_files(&self, root: &Path, excluded_dirs: &[&str]) -> Result<Vec<String>, CheckError>;
}

/// [`FileSystem`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, CheckError> {
        trace!(path:? = path; "Reading file");
        let bytes = fs::read(path).map_err(|err| CheckError::io(path, err))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn list_files(&self, root: &Path, excluded_dirs: &[&str]) -> Result<Vec<String>, CheckError> {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !excluded_dirs
                        .iter()
                        .any(|dir| entry.file_name().to_str() == Some(*dir))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                CheckError::io(path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push(relative);
        }

        files.sort();
        Ok(files)
    }
}
