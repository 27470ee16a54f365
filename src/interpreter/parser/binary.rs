use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Node},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary},
    },
    span::Span,
};

/// Parses one left-associative binary precedence level.
///
/// Parses an operand with `operand`, then keeps consuming an operator from
/// `accepted` followed by another operand, folding everything to the left:
/// `a - b - c` becomes `(a - b) - c`.
///
/// Grammar: `level := operand (OPERATOR operand)*`
///
/// # Parameters
/// - `tokens`: Token stream with span information.
/// - `operand`: Parser for the next tighter level.
/// - `accepted`: The operators belonging to this level.
///
/// # Returns
/// The operand itself, or a [`Node::BinaryOp`] tree.
fn parse_binary_chain<'a, I>(tokens: &mut Peekable<I>,
                             operand: impl Fn(&mut Peekable<I>) -> ParseResult<Node>,
                             accepted: &[BinaryOperator])
                             -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    let mut left = operand(tokens)?;
    loop {
        if let Some((token, _)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && accepted.contains(&op)
        {
            tokens.next();
            let right = operand(tokens)?;
            left = Node::BinaryOp { span: left.span().to(right.span()),
                                    left: Box::new(left),
                                    op,
                                    right: Box::new(right) };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses `and` / `or` chains, the loosest binary level.
///
/// The rule is: `logical := comparison (("and" | "or") comparison)*`
pub fn parse_logical<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    parse_binary_chain(tokens,
                       parse_comparison,
                       &[BinaryOperator::And, BinaryOperator::Or])
}

/// Parses relational and equality operators.
///
/// The rule is: `comparison := additive (("==" | "!=" | "<" | ">" | "<=" |
/// ">=") additive)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    parse_binary_chain(tokens,
                       parse_additive,
                       &[BinaryOperator::Equal,
                         BinaryOperator::NotEqual,
                         BinaryOperator::Less,
                         BinaryOperator::Greater,
                         BinaryOperator::LessEqual,
                         BinaryOperator::GreaterEqual])
}

/// Parses addition and subtraction expressions.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    parse_binary_chain(tokens,
                       parse_multiplicative,
                       &[BinaryOperator::Add, BinaryOperator::Sub])
}

/// Parses multiplication and division, which also covers indexing.
///
/// The rule is: `multiplicative := scope_access (("*" | "/") scope_access)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    parse_binary_chain(tokens,
                       parse_scope_access,
                       &[BinaryOperator::Mul, BinaryOperator::Div])
}

/// Parses field and method access on encap objects.
///
/// `object => name` evaluates `name` inside the object, so the right operand
/// is an ordinary unary expression.
///
/// The rule is: `scope_access := unary ("=>" unary)*`
pub fn parse_scope_access<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a (Token, Span)> + Clone
{
    parse_binary_chain(tokens, parse_unary, &[BinaryOperator::ScopeAccess])
}

/// Maps a token to the binary operator it spells, if any.
const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    Some(match token {
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Sub,
        Token::Star => BinaryOperator::Mul,
        Token::Slash => BinaryOperator::Div,
        Token::Less => BinaryOperator::Less,
        Token::Greater => BinaryOperator::Greater,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual => BinaryOperator::NotEqual,
        Token::And => BinaryOperator::And,
        Token::Or => BinaryOperator::Or,
        Token::FatArrow => BinaryOperator::ScopeAccess,
        _ => return None,
    })
}
