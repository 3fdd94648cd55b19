//! Error types for mpcheck runs.
//!
//! This module provides the run-level error type [`CheckError`]. Defects
//! found in the checked project are not errors in this sense: they are
//! recorded in the [`ErrorLedger`](crate::ledger::ErrorLedger) and the run
//! continues. A `CheckError` aborts the whole run.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for mpcheck operations.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A file that was expected to exist could not be read.
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A JSON manifest could not be decoded.
    #[error("Invalid manifest `{}`: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report error: {0}")]
    Report(String),
}

impl CheckError {
    /// Create an `Io` error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
