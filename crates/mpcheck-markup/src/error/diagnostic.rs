//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single fatal error or warning with an
//! optional error code, labeled source spans, and help text.

use std::fmt;

use crate::{
    error::{ErrorCode, Label, Severity},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// warning[E200]: Unmatched brackets
///   --> pages/index/index.axml:3:21
///    |
///  3 | <view class="{{ active ? 'on' : 'off'">
///    |                                      ^ interpolation is not closed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create a diagnostic at the severity the code is reported at.
    ///
    /// # Example
    ///
    /// ```
    /// # use mpcheck_markup::error::{Diagnostic, ErrorCode};
    /// # use mpcheck_markup::Span;
    ///
    /// let diag = Diagnostic::from_code(ErrorCode::E302, "Undefined component: `foo`")
    ///     .with_label(Span::new(1..4), "not built in and not declared");
    /// assert!(diag.severity().is_fatal());
    /// ```
    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code.severity(), message).with_code(code)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The byte offset the diagnostic is reported at.
    ///
    /// This is the start of the first primary label, or `None` for
    /// diagnostics that are not tied to a source location.
    pub fn offset(&self) -> Option<usize> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(|label| label.span().start())
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "fatal[E302]: message" or "warning: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Fatal, "test error");

        assert!(diag.severity().is_fatal());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert!(diag.offset().is_none());
    }

    #[test]
    fn test_diagnostic_from_code_uses_code_severity() {
        let fatal = Diagnostic::from_code(ErrorCode::E302, "Undefined component: `foo`");
        let warning = Diagnostic::from_code(ErrorCode::E104, "Unexpected closing tag");

        assert!(fatal.severity().is_fatal());
        assert_eq!(fatal.code(), Some(ErrorCode::E302));
        assert!(warning.severity().is_warning());
    }

    #[test]
    fn test_diagnostic_offset_uses_primary_label() {
        let diag = Diagnostic::warning("unclosed element")
            .with_secondary_label(Span::new(2..4), "opened here")
            .with_label(Span::new(10..12), "closed here");

        assert_eq!(diag.offset(), Some(10));
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::from_code(ErrorCode::E302, "Undefined component: `foo`");

        assert_eq!(diag.to_string(), "fatal[E302]: Undefined component: `foo`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::warning("Unmatched brackets");

        assert_eq!(diag.to_string(), "warning: Unmatched brackets");
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::warning("Unexpected closing tag `</text>`")
            .with_code(ErrorCode::E104)
            .with_label(Span::new(30..37), "no open element matches")
            .with_secondary_label(Span::new(0..6), "innermost open element")
            .with_help("remove the closing tag");

        assert_eq!(diag.code(), Some(ErrorCode::E104));
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.help(), Some("remove the closing tag"));
    }
}
