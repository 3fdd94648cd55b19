//! Diagnostic system shared by the markup parser and the project checker.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Labeled spans pointing into the markup source
//! - Severity levels (fatal errors and advisory warnings)
//! - A collector that accumulates diagnostics without aborting
//!
//! # Example
//!
//! ```
//! # use mpcheck_markup::error::{Diagnostic, ErrorCode};
//! # use mpcheck_markup::Span;
//!
//! let diag = Diagnostic::warning("Unmatched brackets")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::point(42), "interpolation is not closed")
//!     .with_help("close the expression with `}}`");
//! assert!(diag.severity().is_warning());
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
