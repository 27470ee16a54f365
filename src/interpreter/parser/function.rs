use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{FunctionDef, Node},
    error::SyntaxError,
    interpreter::{
        lexer::Token,
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            statement::parse_statement,
            utils::{ends_expression, parse_identifier, peek_token},
        },
    },
    span::Span,
};

/// Parses a function literal, after its `fun` keyword.
///
/// Grammar:
/// ```text
///     function := "fun" IDENTIFIER? (":" IDENTIFIER ("," IDENTIFIER)*)?
///                 ( ("=>" | "->") expression
///                 | block
///                 | statement )?
/// ```
///
/// An arrow introduces a single expression whose value is returned. Without
/// an arrow the body is a block, or, when parameters were given, any
/// statement. A literal with no body at all returns `null`.
///
/// # Parameters
/// - `tokens`: Token stream positioned after `fun`.
/// - `fun_span`: Span of the `fun` keyword.
/// - `named`: Whether a name may follow `fun`; only statements allow it.
///
/// # Errors
/// Returns a `SyntaxError` for a named lambda, an empty parameter list or a
/// malformed body.
pub(in crate::interpreter::parser) fn parse_function_literal<'a, I>(tokens: &mut Peekable<I>,
                                                                    fun_span: &Span,
                                                                    named: bool)
                                                                    -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let name = match peek_token(tokens)? {
        (Token::Identifier(_), span) if !named => {
            return Err(SyntaxError::invalid("Lambda expressions are not named", span));
        },
        (Token::Identifier(_), _) => Some(parse_identifier(tokens)?.0),
        _ => None,
    };

    let mut params = Vec::new();
    if let Some((Token::Colon, _)) = tokens.peek() {
        tokens.next();
        params.push(parse_identifier(tokens)?.0);
        while let Some((Token::Comma, _)) = tokens.peek() {
            tokens.next();
            params.push(parse_identifier(tokens)?.0);
        }
    }

    let (token, span) = peek_token(tokens)?;
    let (body, auto_return) = match token {
        Token::Arrow | Token::FatArrow => {
            tokens.next();
            (parse_expression(tokens)?, true)
        },
        Token::LBrace => (parse_block(tokens, true)?, false),
        token if !params.is_empty() && !ends_expression(token) => {
            (parse_statement(tokens, true)?, false)
        },
        _ => (Node::VarAccess { name: "null".to_string(),
                                span: span.clone(), },
              true),
    };

    Ok(Node::FunctionDef(FunctionDef { span: fun_span.to(body.span()),
                                       name,
                                       params,
                                       body: Rc::new(body),
                                       auto_return }))
}
