use std::iter::Peekable;

use crate::{
    ast::{Encapsulation, Node},
    error::SyntaxError,
    interpreter::{
        lexer::Token,
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{parse_identifier, peek_token},
        },
    },
    span::Span,
};

/// Parses an encap object literal, after its `encap` or `sencap` keyword.
///
/// Grammar:
/// ```text
///     encap := ("encap" | "sencap") block ("as" IDENTIFIER (":" expression)?)?
/// ```
///
/// The optional expression after the type name produces the object to
/// inherit from. It must start with an identifier.
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening `{`.
/// - `keyword_span`: Span of the `encap`/`sencap` keyword.
/// - `strict`: `true` for `sencap`.
pub(in crate::interpreter::parser) fn parse_encapsulation<'a, I>(tokens: &mut Peekable<I>,
                                                                 keyword_span: &Span,
                                                                 strict: bool)
                                                                 -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let body = parse_block(tokens, true)?;
    let mut end = body.span().clone();
    let mut type_name = None;
    let mut parent = None;

    if let Some((Token::As, _)) = tokens.peek() {
        tokens.next();
        let (name, name_span) = parse_identifier(tokens)?;
        end = name_span.clone();
        type_name = Some(name);

        if let Some((Token::Colon, _)) = tokens.peek() {
            tokens.next();
            let (token, span) = peek_token(tokens)?;
            if !matches!(token, Token::Identifier(_)) {
                return Err(SyntaxError::invalid("Expected an identifier", span));
            }
            let expr = parse_expression(tokens)?;
            end = expr.span().clone();
            parent = Some(Box::new(expr));
        }
    }

    Ok(Node::Encapsulation(Encapsulation { body: Box::new(body),
                                           type_name,
                                           strict,
                                           parent,
                                           span: keyword_span.to(&end) }))
}
