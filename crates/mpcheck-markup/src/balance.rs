//! Interpolation delimiter checks.
//!
//! Attribute values and text may embed expressions between `{{` and `}}`.
//! The check is a cheap heuristic over each value: it looks at which
//! markers are present, not at how they nest.

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
    tree::{Document, Node},
};

/// Marker opening an interpolated expression.
pub const OPEN_MARKER: &str = "{{";
/// Marker closing an interpolated expression.
pub const CLOSE_MARKER: &str = "}}";

/// Whether the interpolation markers in `value` are balanced.
///
/// A value is unbalanced when exactly one of the two markers appears in
/// it, or when an open marker follows the last close marker. Nesting depth
/// and marker counts are not compared, so `{{a{{b}}` passes.
///
/// ```
/// # use mpcheck_markup::balance::is_balanced;
/// assert!(is_balanced("{{ name }}"));
/// assert!(is_balanced("plain text"));
/// assert!(!is_balanced("{{ name"));
/// assert!(!is_balanced("{{x}}{{y"));
/// ```
pub fn is_balanced(value: &str) -> bool {
    match (value.rfind(OPEN_MARKER), value.rfind(CLOSE_MARKER)) {
        (None, None) => true,
        (Some(open), Some(close)) => open < close,
        _ => false,
    }
}

/// Check every attribute value and text node of `document`.
///
/// Returns one E200 warning per unbalanced value in document order. An
/// attribute is reported at the end of the attribute; text is reported at
/// the end of the text node.
pub fn check_delimiters(document: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for node in document.descendants() {
        match node {
            Node::Element(element) => {
                for attr in &element.attributes {
                    let Some(value) = attr.value() else {
                        continue;
                    };
                    if !is_balanced(value) {
                        diagnostics.push(unmatched(
                            Span::point(attr.span.end()),
                            format!("in the value of `{}`", *attr.name),
                        ));
                    }
                }
            }
            Node::Text(text) => {
                if !is_balanced(&text.value) {
                    diagnostics.push(unmatched(Span::point(text.span.end()), "in this text"));
                }
            }
            Node::Comment(_) => {}
        }
    }

    diagnostics
}

fn unmatched(span: Span, message: impl Into<String>) -> Diagnostic {
    Diagnostic::from_code(ErrorCode::E200, "Unmatched brackets")
        .with_label(span, message)
        .with_help(format!("every `{OPEN_MARKER}` needs a matching `{CLOSE_MARKER}`"))
}
