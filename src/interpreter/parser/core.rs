use std::iter::Peekable;

use crate::{
    ast::{ForLoop, Node},
    error::SyntaxError,
    interpreter::{
        lexer::Token,
        parser::{
            binary::parse_logical,
            statement::parse_statement,
            utils::{expect, parse_identifier, peek_token, skip_newlines},
        },
    },
    span::Span,
};

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Parses a whole program.
///
/// A program is a flat sequence of declarations separated by terminators.
/// Bare expressions are not allowed at this level; every declaration binds a
/// name.
///
/// Grammar:
/// ```text
///     program     := NEWLINE* (declaration NEWLINE*)* EOF
///     declaration := IDENTIFIER "=" statement
/// ```
///
/// # Parameters
/// - `tokens`: The full token stream, ending in [`Token::Eof`].
///
/// # Returns
/// A [`Node::Block`] that may hold hoisted declarations, containing one
/// top level [`Node::VarAssign`] per declaration.
///
/// # Errors
/// Returns the first [`SyntaxError`] met.
pub fn parse_program(tokens: &[(Token, Span)]) -> ParseResult<Node> {
    let (Some((_, first)), Some((_, last))) = (tokens.first(), tokens.last()) else {
        return Err(SyntaxError::UnexpectedEndOfInput);
    };
    let mut iter = tokens.iter().peekable();
    let mut declarations = Vec::new();

    loop {
        skip_newlines(&mut iter);
        if matches!(peek_token(&mut iter)?, (Token::Eof, _)) {
            break;
        }
        declarations.push(parse_declaration(&mut iter)?);
    }

    Ok(Node::Block { statements:  declarations,
                     may_declare: true,
                     span:        first.to(last), })
}

/// Parses one top level `name = statement` declaration.
fn parse_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (name, name_span) = parse_identifier(tokens)?;
    expect(tokens, &Token::Equals, "Expected '='")?;
    let value = parse_statement(tokens, true)?;

    Ok(Node::VarAssign { span: name_span.to(value.span()),
                         name,
                         value: Box::new(value),
                         top_level: true })
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It parses a logical chain
/// and then at most one trailing suffix:
///
/// - `then if cond else other`: a conditional expression,
/// - `callee: arg, arg`: a call,
/// - `callee!`: a call without arguments,
/// - `body for x in list -> if cond`: a list comprehension.
///
/// Grammar:
/// ```text
///     expression := logical ( "if" expression "else" expression
///                           | ":" expression ("," expression)*
///                           | "!"
///                           | "for" IDENTIFIER "in" expression ("->" "if" expression)? )?
/// ```
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Span)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let left = parse_logical(tokens)?;

    match peek_token(tokens)? {
        (Token::If, _) => {
            tokens.next();
            let condition = parse_expression(tokens)?;
            expect(tokens, &Token::Else, "Expected 'else'")?;
            let else_branch = parse_expression(tokens)?;

            Ok(Node::If { span:           left.span().to(else_branch.span()),
                          condition:      Box::new(condition),
                          then_branch:    Box::new(left),
                          else_branch:    Some(Box::new(else_branch)),
                          produces_value: true, })
        },
        (Token::Colon, _) => {
            tokens.next();
            let mut arguments = vec![parse_expression(tokens)?];
            while let Some((Token::Comma, _)) = tokens.peek() {
                tokens.next();
                arguments.push(parse_expression(tokens)?);
            }
            let span = arguments.last()
                                .map_or_else(|| left.span().clone(), |arg| left.span().to(arg.span()));

            Ok(Node::FunctionCall { callee: Box::new(left),
                                    arguments,
                                    span })
        },
        (Token::Bang, bang) => {
            tokens.next();

            Ok(Node::FunctionCall { span:      left.span().to(bang),
                                    callee:    Box::new(left),
                                    arguments: Vec::new(), })
        },
        (Token::For, _) => {
            tokens.next();
            parse_comprehension(tokens, left)
        },
        _ => Ok(left),
    }
}

/// Parses the tail of a list comprehension, after its `for` keyword.
///
/// Grammar: `IDENTIFIER "in" expression ("->" "if" expression)?`
fn parse_comprehension<'a, I>(tokens: &mut Peekable<I>, body: Node) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let (variable, _) = parse_identifier(tokens)?;
    expect(tokens, &Token::In, "Expected 'in'")?;
    let source = parse_expression(tokens)?;

    let filter = if let Some((Token::Arrow, _)) = tokens.peek() {
        tokens.next();
        expect(tokens, &Token::If, "Expected 'if'")?;
        Some(Box::new(parse_expression(tokens)?))
    } else {
        None
    };

    let end = filter.as_ref().map_or_else(|| source.span(), |filter| filter.span());
    Ok(Node::For(ForLoop { span: body.span().to(end),
                           variable,
                           source: Box::new(source),
                           body: Box::new(body),
                           comprehension: true,
                           filter }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ast::BinaryOperator, interpreter::lexer::tokenize};

    fn parse(text: &str) -> ParseResult<Node> {
        parse_program(&tokenize("<test>", text)?)
    }

    fn declaration_value(text: &str) -> Node {
        let Node::Block { mut statements, .. } = parse(text).unwrap() else {
            panic!("a program parses into a block");
        };
        let Node::VarAssign { value, top_level, .. } = statements.remove(0) else {
            panic!("a program holds declarations");
        };
        assert!(top_level);
        *value
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let Node::BinaryOp { op, right, .. } = declaration_value("x = 1 + 2 * 3") else {
            panic!("expected a binary operation");
        };
        assert_eq!(op, BinaryOperator::Add);
        assert!(matches!(*right,
                         Node::BinaryOp { op: BinaryOperator::Mul,
                                          .. }));
    }

    #[test]
    fn logical_operators_are_loosest() {
        let Node::BinaryOp { op, left, .. } = declaration_value("x = 1 < 2 and 3 > 2") else {
            panic!("expected a binary operation");
        };
        assert_eq!(op, BinaryOperator::And);
        assert!(matches!(*left,
                         Node::BinaryOp { op: BinaryOperator::Less,
                                          .. }));
    }

    #[test]
    fn call_suffix_takes_every_argument() {
        let Node::FunctionCall { arguments, .. } = declaration_value("x = f: 1, 2 + 3, g") else {
            panic!("expected a call");
        };
        assert_eq!(arguments.len(), 3);
    }

    #[test]
    fn bang_suffix_is_a_call_without_arguments() {
        let Node::FunctionCall { arguments, .. } = declaration_value("x = f!") else {
            panic!("expected a call");
        };
        assert!(arguments.is_empty());
    }

    #[test]
    fn comprehension_with_filter() {
        let Node::For(for_loop) = declaration_value("x = y * 2 for y in [1, 2, 3] -> if y > 1")
        else {
            panic!("expected a comprehension");
        };
        assert!(for_loop.comprehension);
        assert_eq!(for_loop.variable, "y");
        assert!(for_loop.filter.is_some());
    }

    #[test]
    fn conditional_expression_keeps_its_value() {
        let Node::If { produces_value,
                       else_branch,
                       .. } = declaration_value("x = 1 if y else 2")
        else {
            panic!("expected a conditional");
        };
        assert!(produces_value);
        assert!(else_branch.is_some());
    }

    #[test]
    fn bare_expressions_are_rejected_at_top_level() {
        let error = parse("1 + 2").unwrap_err();
        assert_eq!(error.to_string(),
                   "Invalid Syntax: Expected an identifier, File <test> in line number 1");
    }

    #[test]
    fn empty_blocks_are_rejected() {
        assert!(parse("x = {}").is_err());
    }

    #[test]
    fn errors_report_the_line() {
        let error = parse("x = 1\ny = (2").unwrap_err();
        assert_eq!(error.to_string(),
                   "Invalid Syntax: Expected ')', File <test> in line number 2");
    }
}
