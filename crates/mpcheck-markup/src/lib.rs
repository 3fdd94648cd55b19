//! # mpcheck markup
//!
//! Error-tolerant parser for mini-program markup templates, together with
//! the interpolation delimiter check and the position utilities used to
//! report problems.
//!
//! ## Usage
//!
//! ```
//! # use mpcheck_markup::{balance, parse};
//!
//! let source = r#"<view class="{{ cls }}"><my-card title="{{ t"/></view>"#;
//!
//! let parsed = parse(source);
//! assert!(parsed.diagnostics.is_empty());
//!
//! let names: Vec<_> = parsed.document.elements().map(|e| e.name()).collect();
//! assert_eq!(names, ["view", "my-card"]);
//!
//! let warnings = balance::check_delimiters(&parsed.document);
//! assert_eq!(warnings.len(), 1);
//! ```

pub mod balance;
pub mod error;
mod lexer;
mod parser;
pub mod position;
mod span;
mod tokens;
pub mod tree;

pub use position::{Position, line_column, render_excerpt};
pub use span::{Span, Spanned};
pub use tree::Document;

use log::trace;

use error::{Diagnostic, DiagnosticCollector};

/// The result of parsing a markup source.
#[derive(Debug, Clone)]
pub struct ParsedMarkup {
    /// Best-effort tree; malformed regions are repaired or skipped.
    pub document: Document,
    /// Syntax warnings in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse markup source text.
///
/// Parsing never fails. The pipeline has two steps:
///
/// 1. **Tokenize** - Split the source into tags, attributes, text and comments
/// 2. **Build** - Assemble a [`Document`] tree, closing what was left open
///
/// Every recovery in either step is reported as a warning in
/// [`ParsedMarkup::diagnostics`].
pub fn parse(source: &str) -> ParsedMarkup {
    let mut diagnostics = DiagnosticCollector::new();

    // Step 1: Tokenize
    let tokens = lexer::tokenize(source, &mut diagnostics);
    trace!(count = tokens.len(); "Tokenized markup");

    // Step 2: Build
    let document = parser::build_document(&tokens, &mut diagnostics);

    ParsedMarkup {
        document,
        diagnostics: diagnostics.finish(),
    }
}
