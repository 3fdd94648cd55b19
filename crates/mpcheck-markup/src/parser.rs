//! Tree builder for markup tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into a
//! [`Document`]. Building never fails: closing tags that match nothing are
//! dropped, elements left open are closed implicitly, and each repair is
//! reported as a warning.

use log::trace;
use winnow::stream::{Stream, TokenSlice};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
    tree::{Attribute, Comment, Document, Element, Node, Text},
};

type Input<'a, 'src> = TokenSlice<'a, PositionedToken<'src>>;

/// Stack-based builder; `open` holds the elements whose closing tag is pending.
struct TreeBuilder<'c> {
    roots: Vec<Node>,
    open: Vec<Element>,
    diagnostics: &'c mut DiagnosticCollector,
}

impl<'c> TreeBuilder<'c> {
    fn new(diagnostics: &'c mut DiagnosticCollector) -> Self {
        Self {
            roots: Vec::new(),
            open: Vec::new(),
            diagnostics,
        }
    }

    fn build(mut self, mut input: Input<'_, '_>) -> Document {
        while let Some(positioned) = input.next_token() {
            match &positioned.token {
                Token::TagOpen(name) => self.open_tag(name, positioned.span, &mut input),
                Token::CloseTag(name) => self.close_tag(name, positioned.span),
                Token::Text(value) => self.append(Node::Text(Text {
                    value: (*value).to_string(),
                    span: positioned.span,
                })),
                Token::Comment(value) => self.append(Node::Comment(Comment {
                    value: (*value).to_string(),
                    span: positioned.span,
                })),
                // Only reachable after a lexer repair; the lexer already warned
                Token::Attribute { .. } | Token::TagEnd | Token::SelfClose => {
                    trace!(span:% = positioned.span; "Skipping stray tag token");
                }
            }
        }

        while let Some(element) = self.open.pop() {
            self.diagnostics.emit(unclosed_element(&element, None));
            self.append(Node::Element(element));
        }

        Document {
            children: self.roots,
        }
    }

    /// Consume the attributes and terminator that follow `<name`.
    fn open_tag(&mut self, name: &str, name_span: Span, input: &mut Input<'_, '_>) {
        let mut attributes = Vec::new();
        let mut end = name_span.end();
        let mut terminator = None;

        while let Some(next) = input.peek_token() {
            match &next.token {
                Token::Attribute { name, value } => {
                    attributes.push(Attribute {
                        name: name.clone().map(str::to_string),
                        value: value.clone().map(|value| value.map(str::to_string)),
                        span: next.span,
                    });
                }
                Token::TagEnd => terminator = Some(false),
                Token::SelfClose => terminator = Some(true),
                _ => break,
            }
            end = next.span.end();
            input.next_token();
            if terminator.is_some() {
                break;
            }
        }

        let open_span = Span::new(name_span.start()..end);
        // The name follows the `<`
        let name_start = open_span.start() + 1;
        let element = Element {
            name: Spanned::new(name.to_string(), Span::new(name_start..name_start + name.len())),
            open_span,
            span: open_span,
            attributes,
            children: Vec::new(),
            self_closing: terminator == Some(true),
        };

        match terminator {
            Some(false) => self.open.push(element),
            // Self-closing, or cut short (already reported by the lexer)
            _ => self.append(Node::Element(element)),
        }
    }

    fn close_tag(&mut self, name: &str, span: Span) {
        if name.is_empty() {
            self.diagnostics.emit(
                Diagnostic::from_code(ErrorCode::E106, "Closing tag has no name")
                    .with_label(span, "expected an element name")
                    .with_help("write the name of the element to close, e.g. `</view>`"),
            );
            return;
        }

        let Some(index) = self.open.iter().rposition(|element| element.name() == name) else {
            let mut diagnostic =
                Diagnostic::from_code(ErrorCode::E104, format!("Unexpected closing tag `</{name}>`"))
                    .with_label(span, "no open element matches");
            if let Some(innermost) = self.open.last() {
                diagnostic = diagnostic
                    .with_secondary_label(innermost.open_span, "innermost open element");
            }
            self.diagnostics.emit(diagnostic);
            return;
        };

        // Elements opened after the match are closed implicitly
        while self.open.len() > index + 1 {
            if let Some(element) = self.open.pop() {
                self.diagnostics.emit(unclosed_element(&element, Some(span)));
                self.append(Node::Element(element));
            }
        }

        if let Some(mut element) = self.open.pop() {
            element.span = element.span.union(span);
            self.append(Node::Element(element));
        }
    }

    /// Attach a finished node to the innermost open element or the document.
    fn append(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => {
                parent.span = parent.span.union(node.span());
                parent.children.push(node);
            }
            None => self.roots.push(node),
        }
    }
}

fn unclosed_element(element: &Element, closed_by: Option<Span>) -> Diagnostic {
    let mut diagnostic = Diagnostic::from_code(
        ErrorCode::E105,
        format!("Unclosed element `<{}>`", element.name()),
    )
    .with_label(element.open_span, "opened here")
    .with_help(format!("add `</{}>` or make the tag self-closing", element.name()));

    if let Some(span) = closed_by {
        diagnostic = diagnostic.with_secondary_label(span, "implicitly closed here");
    }
    diagnostic
}

/// Build a document tree from lexer tokens, reporting repairs to `diagnostics`.
pub(crate) fn build_document(
    tokens: &[PositionedToken<'_>],
    diagnostics: &mut DiagnosticCollector,
) -> Document {
    TreeBuilder::new(diagnostics).build(TokenSlice::new(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn build(source: &str) -> (Document, Vec<Diagnostic>) {
        let mut diagnostics = DiagnosticCollector::new();
        let tokens = lexer::tokenize(source, &mut diagnostics);
        let document = build_document(&tokens, &mut diagnostics);
        (document, diagnostics.finish())
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
        diagnostics.iter().filter_map(Diagnostic::code).collect()
    }

    fn root_element(document: &Document, index: usize) -> &Element {
        document.children[index]
            .as_element()
            .expect("Expected element")
    }

    #[test]
    fn test_nested_elements() {
        let (document, diagnostics) = build("<view><text>hi</text><image/></view>");

        assert!(diagnostics.is_empty());
        assert_eq!(document.children.len(), 1);

        let view = root_element(&document, 0);
        assert_eq!(view.name(), "view");
        assert_eq!(view.span, Span::new(0..36));
        assert_eq!(view.open_span, Span::new(0..6));
        assert_eq!(view.children.len(), 2);

        let image = view.children[1].as_element().expect("Expected image");
        assert!(image.self_closing);
        assert_eq!(image.name.span(), Span::new(22..27));
    }

    #[test]
    fn test_attributes_are_kept() {
        let (document, _) = build(r#"<card title="{{ t }}" hidden/>"#);

        let card = root_element(&document, 0);
        assert_eq!(card.attributes.len(), 2);
        assert_eq!(card.attribute("title").and_then(Attribute::value), Some("{{ t }}"));
        assert!(card.attribute("hidden").is_some_and(|a| a.value.is_none()));
    }

    #[test]
    fn test_multiple_roots_and_text() {
        let (document, diagnostics) = build("hello <view/> <!-- c --> <text></text>");

        assert!(diagnostics.is_empty());
        let names: Vec<_> = document.elements().map(Element::name).collect();
        assert_eq!(names, ["view", "text"]);
        assert!(matches!(document.children[0], Node::Text(_)));
        assert!(document.children.iter().any(|n| matches!(n, Node::Comment(_))));
    }

    #[test]
    fn test_unexpected_closing_tag_is_dropped() {
        let (document, diagnostics) = build("<view></text></view>");

        assert_eq!(codes(&diagnostics), vec![ErrorCode::E104]);
        assert_eq!(document.children.len(), 1);
        assert!(root_element(&document, 0).children.is_empty());
    }

    #[test]
    fn test_implicit_close_reports_unclosed_element() {
        let (document, diagnostics) = build("<view><text>hi</view>");

        assert_eq!(codes(&diagnostics), vec![ErrorCode::E105]);
        let view = root_element(&document, 0);
        let text = view.children[0].as_element().expect("Expected text");
        assert_eq!(text.name(), "text");
        assert_eq!(text.children.len(), 1);
    }

    #[test]
    fn test_unclosed_at_end_of_document() {
        let (document, diagnostics) = build("<view><custom-card>");

        assert_eq!(codes(&diagnostics), vec![ErrorCode::E105, ErrorCode::E105]);
        let names: Vec<_> = document.elements().map(Element::name).collect();
        assert_eq!(names, ["view", "custom-card"]);
    }

    #[test]
    fn test_empty_closing_tag() {
        let (document, diagnostics) = build("<view></></view>");

        assert_eq!(codes(&diagnostics), vec![ErrorCode::E106]);
        assert_eq!(document.children.len(), 1);
    }

    #[test]
    fn test_unterminated_tag_still_yields_element() {
        let (document, diagnostics) = build("<view><my-card title=\"x\"");

        assert!(codes(&diagnostics).contains(&ErrorCode::E103));
        let names: Vec<_> = document.elements().map(Element::name).collect();
        assert_eq!(names, ["view", "my-card"]);
    }
}
