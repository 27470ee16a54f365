use std::iter::Peekable;

use crate::{
    ast::{Node, UnaryOperator},
    error::SyntaxError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            encap::parse_encapsulation,
            function::parse_function_literal,
            utils::{expect, parse_comma_separated, peek_token},
        },
    },
    span::Span,
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `+`  (identity)
/// - `-`  (numeric negation)
/// - `!`  (logical not)
///
/// Unary operators are right-associative, so an input like `!-x` is parsed as
/// `!( -x )`. If no unary operator is present, the function delegates to
/// [`parse_atom`].
///
/// Grammar:
/// ```text
///     unary := ("+" | "-" | "!") unary
///            | atom
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (token, span) = peek_token(tokens)?;
    let op = match token {
        Token::Plus => UnaryOperator::Plus,
        Token::Minus => UnaryOperator::Negate,
        Token::Bang => UnaryOperator::Not,
        _ => return parse_atom(tokens),
    };
    tokens.next();
    let operand = parse_unary(tokens)?;

    Ok(Node::UnaryOp { span: span.to(operand.span()),
                       op,
                       operand: Box::new(operand) })
}

/// Parses an atomic expression.
///
/// Atoms form the base of the expression grammar and include:
/// - numeric and string literals
/// - identifiers
/// - parenthesized expressions
/// - list literals (`[ ... ]`)
/// - function literals (`fun: x -> x`)
/// - `prev` expressions
/// - `encap` and `sencap` objects
///
/// Grammar (simplified):
/// ```text
///     atom := NUMBER | STRING | IDENTIFIER
///           | "(" expression ")"
///           | "[" (expression ("," expression)*)? "]"
///           | function_literal
///           | "prev" expression
///           | ("encap" | "sencap") block ("as" IDENTIFIER (":" expression)?)?
/// ```
///
/// # Errors
/// Returns a `SyntaxError` when the next token starts no atom.
pub(crate) fn parse_atom<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (token, span) = peek_token(tokens)?;
    match token {
        Token::Number(value) => {
            tokens.next();
            Ok(Node::Number { value: *value,
                              span:  span.clone(), })
        },
        Token::String(value) => {
            tokens.next();
            Ok(Node::String { value: value.clone(),
                              span:  span.clone(), })
        },
        Token::Identifier(name) => {
            tokens.next();
            Ok(Node::VarAccess { name: name.clone(),
                                 span: span.clone(), })
        },
        Token::LParen => {
            tokens.next();
            let inner = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, "Expected ')'")?;
            Ok(inner)
        },
        Token::LBracket => {
            tokens.next();
            let (elements, close) =
                parse_comma_separated(tokens, parse_expression, &Token::RBracket)?;
            Ok(Node::List { elements,
                            span: span.to(close) })
        },
        Token::Fun => {
            tokens.next();
            parse_function_literal(tokens, span, false)
        },
        Token::Prev => {
            tokens.next();
            let expr = parse_expression(tokens)?;
            Ok(Node::Prev { span: span.to(expr.span()),
                            expr: Box::new(expr) })
        },
        Token::Encap | Token::Sencap => {
            tokens.next();
            parse_encapsulation(tokens, span, matches!(token, Token::Sencap))
        },
        _ => Err(SyntaxError::invalid("Expected a number, string, identifier, 'fun', 'prev', \
                                       'encap', '[' or '('",
                                      span)),
    }
}
