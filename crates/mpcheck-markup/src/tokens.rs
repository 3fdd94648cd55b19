use crate::span::{Span, Spanned};

/// Markup tokens produced by the [`lexer`](super::lexer).
///
/// Tokens borrow from the source text. Attribute tokens only appear between
/// a [`Token::TagOpen`] and the [`Token::TagEnd`] or [`Token::SelfClose`]
/// that finishes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<name`, the start of an opening tag
    TagOpen(&'a str),
    /// `name` or `name=value` inside an opening tag
    Attribute {
        name: Spanned<&'a str>,
        value: Option<Spanned<&'a str>>,
    },
    /// `>`
    TagEnd,
    /// `/>`
    SelfClose,
    /// `</name>`; the name is empty for `</>`
    CloseTag(&'a str),
    /// Character data between tags
    Text(&'a str),
    /// `<!-- ... -->`, without the markers
    Comment(&'a str),
}

/// A token together with the span it covers in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken<'a> {
    pub token: Token<'a>,
    pub span: Span,
}

impl<'a> PositionedToken<'a> {
    pub fn new(token: Token<'a>, span: Span) -> Self {
        Self { token, span }
    }
}
