//! Collector for accumulating diagnostics during a processing phase.
//!
//! The [`DiagnosticCollector`] lets a phase report every problem it
//! recovers from instead of stopping at the first one.

use crate::error::Diagnostic;

/// A collector for accumulating diagnostics during a processing phase.
///
/// # Example
///
/// ```
/// # use mpcheck_markup::error::{Diagnostic, DiagnosticCollector, ErrorCode};
/// # use mpcheck_markup::Span;
///
/// let mut collector = DiagnosticCollector::new();
/// collector.emit(
///     Diagnostic::warning("Unexpected closing tag `</text>`")
///         .with_code(ErrorCode::E104)
///         .with_label(Span::new(20..27), "no open element matches"),
/// );
///
/// assert_eq!(collector.len(), 1);
/// assert!(collector.finish()[0].severity().is_warning());
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Number of diagnostics collected so far.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Finish collection, returning diagnostics in emission order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_new_is_empty() {
        let collector = DiagnosticCollector::new();
        assert!(collector.is_empty());
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn test_collector_counts_emitted() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::warning("test warning"));

        assert!(!collector.is_empty());
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_collector_preserves_order() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(
            Diagnostic::warning("first")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(10..20), "here"),
        );
        collector.emit(Diagnostic::warning("second"));
        collector.emit(Diagnostic::warning("third"));

        let diagnostics = collector.finish();
        let messages: Vec<_> = diagnostics.iter().map(Diagnostic::message).collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }
}
