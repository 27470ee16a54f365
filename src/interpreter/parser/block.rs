use std::iter::Peekable;

use crate::{
    ast::Node,
    interpreter::{
        lexer::Token,
        parser::{
            core::ParseResult,
            statement::parse_statement,
            utils::{expect, next_is, skip_newlines},
        },
    },
    span::Span,
};

/// Parses a block delimited by braces.
///
/// A block holds at least one statement. Statements are separated by one or
/// more terminators (line breaks or `;`); leading and trailing terminators
/// inside the braces are ignored. Statements nested in a block may always
/// declare functions, whatever `may_declare` says about the block itself.
///
/// Grammar: `block := "{" NEWLINE* statement (NEWLINE+ statement)* NEWLINE* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
/// - `may_declare`: Whether hoisted declarations settle in this block.
///
/// # Returns
/// A [`Node::Block`] containing all parsed statements.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>, may_declare: bool) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let open = expect(tokens, &Token::LBrace, "Expected '{'")?;
    skip_newlines(tokens);

    let mut statements = vec![parse_statement(tokens, true)?];
    while next_is(tokens, &Token::Newline) {
        skip_newlines(tokens);
        if next_is(tokens, &Token::RBrace) {
            break;
        }
        statements.push(parse_statement(tokens, true)?);
    }

    let close = expect(tokens, &Token::RBrace, "Expected '}'")?;

    Ok(Node::Block { statements,
                     may_declare,
                     span: open.to(close) })
}
