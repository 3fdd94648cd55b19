//! Lexical analyzer for markup source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for the tree
//! builder. It is modal: between tags it recognises comments, closing tags,
//! the start of opening tags, and character data; inside an opening tag it
//! recognises attributes and the tag terminators.
//!
//! Lexing never fails. Malformed input is reported to a
//! [`DiagnosticCollector`] and the lexer resumes after the bad input.

use winnow::{
    Parser as _,
    ascii::{multispace0, multispace1},
    combinator::{alt, cut_err, delimited, opt, preceded, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Diagnostic information attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')
}

fn is_attribute_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
}

fn is_unquoted_value_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '>' | '"' | '\'' | '<' | '=' | '`')
}

/// Parse an element name such as `view`, `scroll-view` or `my_card`.
fn tag_name<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (one_of(is_name_start), take_while(0.., is_name_char))
        .take()
        .parse_next(input)
}

/// Parse `<!-- ... -->`.
fn comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    preceded(
        "<!--",
        cut_err(terminated(take_until(0.., "-->"), "-->")).context(LexerDiagnostic {
            code: ErrorCode::E100,
            message: "unterminated comment",
            help: Some("close the comment with `-->`"),
            start,
        }),
    )
    .map(Token::Comment)
    .parse_next(input)
}

/// Parse `</name>`, allowing whitespace around the name.
fn close_tag<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    preceded(
        "</",
        cut_err(delimited(
            multispace0,
            take_while(0.., is_name_char),
            (multispace0, '>'),
        ))
        .context(LexerDiagnostic {
            code: ErrorCode::E103,
            message: "unterminated tag",
            help: Some("close the tag with `>`"),
            start,
        }),
    )
    .map(Token::CloseTag)
    .parse_next(input)
}

/// Parse `<name`, switching the lexer into tag mode.
fn open_tag<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded('<', tag_name).map(Token::TagOpen).parse_next(input)
}

/// Parse character data up to the next `<`.
fn text<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c != '<')
        .map(Token::Text)
        .parse_next(input)
}

/// A `<` that starts no tag (`a < b`) is character data.
fn stray_angle<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    "<".map(Token::Text).parse_next(input)
}

fn content_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        comment,     // Must come before open/close tags
        close_tag,   // Must come before open_tag
        open_tag,    // Must come before stray_angle
        text,        // Everything up to the next `<`
        stray_angle, // Lone `<`
    ))
    .parse_next(input)
}

/// Parse `/>` or `>`.
fn tag_end<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt(("/>".value(Token::SelfClose), ">".value(Token::TagEnd))).parse_next(input)
}

fn attribute_name<'a>(input: &mut Input<'a>) -> IResult<Spanned<&'a str>> {
    take_while(1.., is_attribute_name_char)
        .with_span()
        .map(|(name, range)| Spanned::new(name, Span::from(range)))
        .parse_next(input)
}

fn equals_sign<'a>(input: &mut Input<'a>) -> IResult<()> {
    (multispace0, '=').void().parse_next(input)
}

/// Parse a quoted attribute value; the span covers the content only.
fn quoted_value<'a>(input: &mut Input<'a>, quote: char) -> IResult<Spanned<&'a str>> {
    let start = input.current_token_start();

    preceded(
        quote,
        cut_err(terminated(
            take_while(0.., move |c: char| c != quote).with_span(),
            quote,
        ))
        .context(LexerDiagnostic {
            code: ErrorCode::E101,
            message: "unterminated attribute value",
            help: Some("close the value with a matching quote"),
            start,
        }),
    )
    .map(|(content, range)| Spanned::new(content, Span::from(range)))
    .parse_next(input)
}

fn double_quoted_value<'a>(input: &mut Input<'a>) -> IResult<Spanned<&'a str>> {
    quoted_value(input, '"')
}

fn single_quoted_value<'a>(input: &mut Input<'a>) -> IResult<Spanned<&'a str>> {
    quoted_value(input, '\'')
}

fn unquoted_value<'a>(input: &mut Input<'a>) -> IResult<Spanned<&'a str>> {
    take_while(1.., is_unquoted_value_char)
        .with_span()
        .map(|(value, range)| Spanned::new(value, Span::from(range)))
        .parse_next(input)
}

fn attribute_value<'a>(input: &mut Input<'a>) -> IResult<Spanned<&'a str>> {
    alt((double_quoted_value, single_quoted_value, unquoted_value)).parse_next(input)
}

/// Parse the value after `=`; a missing value is a committed error.
fn assigned_value<'a>(input: &mut Input<'a>) -> IResult<Spanned<&'a str>> {
    let start = input.current_token_start();

    preceded(multispace0, cut_err(attribute_value))
        .context(LexerDiagnostic {
            code: ErrorCode::E102,
            message: "expected attribute value",
            help: Some("quote the value: `name=\"value\"`"),
            start,
        })
        .parse_next(input)
}

/// Parse `name`, `name=value`, `name="value"` or `name='value'`.
fn attribute<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let name = attribute_name(input)?;

    let value = if opt(equals_sign).parse_next(input)?.is_some() {
        Some(assigned_value(input)?)
    } else {
        None
    };

    Ok(Token::Attribute { name, value })
}

/// Parse one item inside an opening tag. Whitespace yields `None`.
fn tag_token<'a>(input: &mut Input<'a>) -> IResult<Option<Token<'a>>> {
    alt((
        multispace1.value(None),
        tag_end.map(Some),   // Must come before attribute
        attribute.map(Some), // Anything name-like
    ))
    .parse_next(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Between tags
    Content,
    /// Inside an opening tag that started at `start`
    Tag { start: usize },
}

/// Lexer that accumulates tokens and reports diagnostics during tokenization.
struct Lexer<'a, 'c> {
    source: &'a str,
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: &'c mut DiagnosticCollector,
    mode: Mode,
}

impl<'a, 'c> Lexer<'a, 'c> {
    fn new(source: &'a str, diagnostics: &'c mut DiagnosticCollector) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            diagnostics,
            mode: Mode::Content,
        }
    }

    /// Tokenize the input, collecting tokens and diagnostics.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            let start = input.current_token_start();

            let result = match self.mode {
                Mode::Content => content_token(&mut input).map(Some),
                Mode::Tag { start: tag_start } => {
                    if input.starts_with('<') {
                        // `<view <text>`: the open tag is cut short by the next one
                        self.diagnostics.emit(unterminated_tag(tag_start, start));
                        self.push(Token::TagEnd, Span::point(start));
                        continue;
                    }
                    tag_token(&mut input)
                }
            };

            match result {
                Ok(Some(token)) => {
                    let end = input.current_token_start();
                    self.push(token, Span::new(start..end));
                }
                Ok(None) => {}
                Err(e) => {
                    let error_pos = input.current_token_start();
                    let diagnostic = Self::convert_err_mode(e, error_pos);

                    if diagnostic.code() == Some(ErrorCode::E100) {
                        // An unterminated comment swallows the rest of the input
                        let remaining = input.eof_offset();
                        input.next_slice(remaining);
                    } else if error_pos <= start && !input.is_empty() {
                        // Skip a character only when nothing was consumed so
                        // the loop always makes progress.
                        input.next_token();
                    }

                    self.diagnostics.emit(diagnostic);
                }
            }
        }

        if let Mode::Tag { start } = self.mode {
            self.diagnostics
                .emit(unterminated_tag(start, self.source.len()));
        }
    }

    /// Record a token, merging adjacent character data.
    fn push(&mut self, token: Token<'a>, span: Span) {
        match &token {
            Token::TagOpen(_) => self.mode = Mode::Tag { start: span.start() },
            Token::TagEnd | Token::SelfClose => self.mode = Mode::Content,
            Token::Text(_) => {
                if let Some(last) = self.tokens.last_mut() {
                    if matches!(last.token, Token::Text(_)) && last.span.end() == span.start() {
                        let merged = last.span.union(span);
                        *last =
                            PositionedToken::new(Token::Text(&self.source[merged.range()]), merged);
                        return;
                    }
                }
            }
            _ => {}
        }
        self.tokens.push(PositionedToken::new(token, span));
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Uses the innermost `LexerDiagnostic` context when present and falls
    /// back to E102 (unexpected character in tag) otherwise.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let mut diag = Diagnostic::warning(*message)
                .with_code(*code)
                .with_label(Span::new(*start..error_pos), code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::warning("unexpected character in tag")
            .with_code(ErrorCode::E102)
            .with_label(span, ErrorCode::E102.description())
    }
}

fn unterminated_tag(start: usize, end: usize) -> Diagnostic {
    Diagnostic::warning("unterminated tag")
        .with_code(ErrorCode::E103)
        .with_label(Span::new(start..end), ErrorCode::E103.description())
        .with_help("close the tag with `>` or `/>`")
}

/// Tokenize markup source, reporting recovered problems to `diagnostics`.
///
/// Always returns a token stream; malformed input produces warnings and is
/// skipped or treated as character data.
pub(crate) fn tokenize<'a>(
    source: &'a str,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<PositionedToken<'a>> {
    let mut lexer = Lexer::new(source, diagnostics);
    lexer.tokenize(LocatingSlice::new(source));
    lexer.tokens
}
