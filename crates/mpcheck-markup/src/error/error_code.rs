//! Error codes for the mpcheck diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Markup syntax (recovered by the parser)
//! - `E2xx` - Interpolation delimiters
//! - `E3xx` - Component resolution

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::Severity;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    // =========================================================================
    // Markup Syntax (E1xx)
    // =========================================================================
    /// Unterminated comment.
    ///
    /// A `<!--` comment was opened but `-->` never follows.
    E100,

    /// Unterminated attribute value.
    ///
    /// A quoted attribute value runs to the end of the input.
    E101,

    /// Unexpected character in tag.
    ///
    /// A character inside a tag is neither an attribute nor a tag terminator.
    E102,

    /// Unterminated tag.
    ///
    /// The input ended before the tag was closed with `>` or `/>`.
    E103,

    /// Unexpected closing tag.
    ///
    /// A closing tag does not match any open element.
    E104,

    /// Unclosed element.
    ///
    /// An element was still open when its parent or the document ended.
    E105,

    /// Invalid tag name.
    ///
    /// A closing tag has no name, e.g. `</>`.
    E106,

    // =========================================================================
    // Interpolation (E2xx)
    // =========================================================================
    /// Unmatched interpolation brackets.
    ///
    /// A value contains `{{` without `}}` or the other way around.
    E200,

    // =========================================================================
    // Resolution (E3xx)
    // =========================================================================
    /// Missing component file.
    ///
    /// One of the four sibling files of a component does not exist.
    E300,

    /// Unresolved component alias.
    ///
    /// A `usingComponents` entry points at a component that does not exist.
    E301,

    /// Undefined component.
    ///
    /// An element is neither built in nor declared in `usingComponents`.
    E302,

    /// Unused definition.
    ///
    /// A declared alias is never used by the component's markup.
    E303,

    /// Orphan component.
    ///
    /// A markup file exists on disk but no entry page reaches it.
    E304,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E200 => "E200",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "unterminated comment",
            ErrorCode::E101 => "unterminated attribute value",
            ErrorCode::E102 => "unexpected character in tag",
            ErrorCode::E103 => "unterminated tag",
            ErrorCode::E104 => "unexpected closing tag",
            ErrorCode::E105 => "unclosed element",
            ErrorCode::E106 => "invalid tag name",
            ErrorCode::E200 => "unmatched brackets",
            ErrorCode::E300 => "missing file",
            ErrorCode::E301 => "unresolved alias",
            ErrorCode::E302 => "undefined component",
            ErrorCode::E303 => "unused definition",
            ErrorCode::E304 => "orphan component",
        }
    }

    /// The severity a diagnostic with this code is reported at.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorCode::E300 | ErrorCode::E301 | ErrorCode::E302 => Severity::Fatal,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
