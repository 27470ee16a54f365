use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{ForLoop, FunctionDef, Node},
    interpreter::{
        lexer::Token,
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            function::parse_function_literal,
            utils::{ends_expression, expect, parse_identifier, peek_token, skip_newlines},
        },
    },
    span::Span,
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - an assignment (`name = expression`),
/// - an `if`, `while` or `for` statement,
/// - a nested block,
/// - `define name = expression`,
/// - a named function (`fun name: params -> body`),
/// - `return`, `break` or `continue`,
/// - an expression used as a statement.
///
/// The forms are recognized by their first token (and, for assignments, the
/// `=` after the identifier); anything else is parsed as an expression.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, Span)` pairs.
/// - `may_declare`: Whether a block parsed directly as this statement keeps
///   the function declarations hoisted out of it.
///
/// # Returns
/// The parsed statement node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>, may_declare: bool) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (token, span) = peek_token(tokens)?;
    match token {
        Token::Identifier(name) => {
            let mut lookahead = tokens.clone();
            lookahead.next();
            if !matches!(lookahead.peek(), Some((Token::Equals, _))) {
                return parse_expression(tokens);
            }
            tokens.next();
            tokens.next();
            let value = parse_expression(tokens)?;

            Ok(Node::VarAssign { span:      span.to(value.span()),
                                 name:      name.clone(),
                                 value:     Box::new(value),
                                 top_level: false, })
        },
        Token::If => {
            tokens.next();
            parse_if_statement(tokens, span)
        },
        Token::While => {
            tokens.next();
            let condition = parse_expression(tokens)?;
            let body = parse_statement(tokens, false)?;

            Ok(Node::While { span:      span.to(body.span()),
                             condition: Box::new(condition),
                             body:      Box::new(body), })
        },
        Token::For => {
            tokens.next();
            parse_for_statement(tokens, span)
        },
        Token::LBrace => parse_block(tokens, may_declare),
        Token::Define => {
            tokens.next();
            parse_define(tokens, span)
        },
        Token::Fun => {
            let mut lookahead = tokens.clone();
            lookahead.next();
            if !matches!(lookahead.peek(), Some((Token::Identifier(_), _))) {
                return parse_expression(tokens);
            }
            tokens.next();
            parse_function_literal(tokens, span, true)
        },
        Token::Return => {
            tokens.next();
            let (next, _) = peek_token(tokens)?;
            if ends_expression(next) {
                return Ok(Node::Return { value: None,
                                         span:  span.clone(), });
            }
            let value = parse_expression(tokens)?;

            Ok(Node::Return { span:  span.to(value.span()),
                              value: Some(Box::new(value)), })
        },
        Token::Break => {
            tokens.next();
            Ok(Node::Break { span: span.clone() })
        },
        Token::Continue => {
            tokens.next();
            Ok(Node::Continue { span: span.clone() })
        },
        _ => parse_expression(tokens),
    }
}

/// Parses an `if` statement, after its `if` keyword.
///
/// The `else` branch may start on a later line than the end of the `then`
/// branch. Both branches are statements whose blocks pass hoisted
/// declarations on to the enclosing block.
///
/// Grammar: `if := "if" expression statement (NEWLINE* "else" statement)?`
fn parse_if_statement<'a, I>(tokens: &mut Peekable<I>, if_span: &Span) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let condition = parse_expression(tokens)?;
    let then_branch = parse_statement(tokens, false)?;

    let mut lookahead = tokens.clone();
    skip_newlines(&mut lookahead);
    let else_branch = if let Some((Token::Else, _)) = lookahead.peek() {
        lookahead.next();
        *tokens = lookahead;
        Some(Box::new(parse_statement(tokens, false)?))
    } else {
        None
    };

    let end = else_branch.as_deref().map_or_else(|| then_branch.span(), Node::span);
    Ok(Node::If { span: if_span.to(end),
                  condition: Box::new(condition),
                  then_branch: Box::new(then_branch),
                  else_branch,
                  produces_value: false })
}

/// Parses a `for` statement, after its `for` keyword.
///
/// Grammar: `for := "for" IDENTIFIER "in" expression statement`
fn parse_for_statement<'a, I>(tokens: &mut Peekable<I>, for_span: &Span) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (variable, _) = parse_identifier(tokens)?;
    expect(tokens, &Token::In, "Expected 'in'")?;
    let source = parse_expression(tokens)?;
    let body = parse_statement(tokens, false)?;

    Ok(Node::For(ForLoop { span: for_span.to(body.span()),
                           variable,
                           source: Box::new(source),
                           body: Box::new(body),
                           comprehension: false,
                           filter: None }))
}

/// Parses `define name = expression`, after its `define` keyword.
///
/// This is shorthand for a function without parameters returning the value
/// of the expression.
fn parse_define<'a, I>(tokens: &mut Peekable<I>, define_span: &Span) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (name, _) = parse_identifier(tokens)?;
    expect(tokens, &Token::Equals, "Expected '='")?;
    let body = parse_expression(tokens)?;

    Ok(Node::FunctionDef(FunctionDef { span:        define_span.to(body.span()),
                                       name:        Some(name),
                                       params:      Vec::new(),
                                       body:        Rc::new(body),
                                       auto_return: true, }))
}
