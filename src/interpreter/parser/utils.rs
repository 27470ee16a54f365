use std::iter::Peekable;

use crate::{
    error::SyntaxError,
    interpreter::{lexer::Token, parser::core::ParseResult},
    span::Span,
};

/// Returns the next token without consuming it.
///
/// The stream always ends in [`Token::Eof`], which no rule consumes, so a
/// missing token means the stream was cut short.
///
/// # Errors
/// Returns [`SyntaxError::UnexpectedEndOfInput`] if no token is left.
pub(in crate::interpreter::parser) fn peek_token<'a, I>(tokens: &mut Peekable<I>)
                                                        -> ParseResult<&'a (Token, Span)>
    where I: Iterator<Item = &'a (Token, Span)>
{
    tokens.peek().copied().ok_or(SyntaxError::UnexpectedEndOfInput)
}

/// Checks whether the next token equals `expected`.
pub(in crate::interpreter::parser) fn next_is<'a, I>(tokens: &mut Peekable<I>,
                                                     expected: &Token)
                                                     -> bool
    where I: Iterator<Item = &'a (Token, Span)>
{
    matches!(tokens.peek(), Some((token, _)) if token == expected)
}

/// Consumes the next token if it equals `expected`.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `expected`: The token that must come next.
/// - `details`: Message used when it does not, such as `"Expected ')'"`.
///
/// # Returns
/// The span of the consumed token.
///
/// # Errors
/// Returns [`SyntaxError::InvalidSyntax`] pointing at the token found
/// instead.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    details: &str)
                                                    -> ParseResult<&'a Span>
    where I: Iterator<Item = &'a (Token, Span)>
{
    let (token, span) = peek_token(tokens)?;
    if token != expected {
        return Err(SyntaxError::invalid(details, span));
    }
    tokens.next();
    Ok(span)
}

/// Skips any run of statement terminators.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, Span)>
{
    while let Some((Token::Newline, _)) = tokens.peek() {
        tokens.next();
    }
}

/// Checks whether the token can only close or terminate an expression.
///
/// Used where a construct has an optional tail, such as `return` or a
/// function literal without a body.
pub(in crate::interpreter::parser) const fn ends_expression(token: &Token) -> bool {
    matches!(token,
             Token::Newline
             | Token::Eof
             | Token::RBrace
             | Token::RParen
             | Token::RBracket
             | Token::Comma
             | Token::Else)
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by list literals. It repeatedly calls `parse_item`
/// to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]`).
///
/// # Returns
/// A vector of parsed items and the span of the closing token.
///
/// # Errors
/// Returns a `SyntaxError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<(Vec<T>, &'a Span)>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut items = Vec::new();
    let (tok, span) = peek_token(tokens)?;
    if tok == closing {
        tokens.next();

        return Ok((items, span));
    }
    loop {
        items.push(parse_item(tokens)?);
        let (tok, span) = peek_token(tokens)?;
        match tok {
            Token::Comma => {
                tokens.next();
            },
            tok if tok == closing => {
                tokens.next();
                return Ok((items, span));
            },
            _ => return Err(SyntaxError::invalid("Expected ',' or the end of the list", span)),
        }
    }
}

/// Parses a plain identifier and returns its name with its span.
///
/// # Errors
/// Returns a `SyntaxError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<(String, &'a Span)>
    where I: Iterator<Item = &'a (Token, Span)>
{
    match peek_token(tokens)? {
        (Token::Identifier(name), span) => {
            tokens.next();
            Ok((name.clone(), span))
        },
        (_, span) => Err(SyntaxError::invalid("Expected an identifier", span)),
    }
}
