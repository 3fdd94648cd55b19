//! Severity levels for diagnostics.
//!
//! This module defines the severity of diagnostic messages,
//! distinguishing between fatal errors and advisory warnings.

use std::fmt;

use serde::Serialize;

/// The severity level of a diagnostic.
///
/// - [`Severity::Fatal`] marks a broken reference or a missing artifact
/// - [`Severity::Warning`] marks a hygiene issue that does not break resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A defect that breaks component resolution.
    Fatal,

    /// A non-fatal issue that should be addressed.
    Warning,
}

impl Severity {
    /// Returns `true` if this is a fatal severity.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Severity::Fatal)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "fatal"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
