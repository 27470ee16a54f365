use std::rc::Rc;

use logos::Logos;

use crate::{
    error::SyntaxError,
    span::{Position, Span},
};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens, such as `3`, `3.14`, `2.` or `1e6`.
    #[regex(r"[0-9]+(\.[0-9]*)?", parse_number)]
    #[regex(r"[0-9]+e[0-9]+", parse_number)]
    Number(f64),
    /// String literal tokens, such as `"hello\n"`, with escapes resolved.
    #[regex(r#""([^"\\]|\\.)*""#, parse_string)]
    String(String),
    /// `fun`
    #[token("fun")]
    Fun,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `return`
    #[token("return")]
    Return,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `as`
    #[token("as")]
    As,
    /// `prev`
    #[token("prev")]
    Prev,
    /// `define`
    #[token("define")]
    Define,
    /// `encap`
    #[token("encap")]
    Encap,
    /// `sencap`
    #[token("sencap")]
    Sencap,
    /// `and` or `&`
    #[token("and")]
    #[token("&")]
    And,
    /// `or` or `|`
    #[token("or")]
    #[token("|")]
    Or,
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `->`
    #[token("->")]
    Arrow,
    /// `=>`
    #[token("=>")]
    FatArrow,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Bang,
    /// Statement terminators: a line break or `;`.
    #[token(";")]
    #[token("\n", |lex| {
        lex.extras.line      += 1;
        lex.extras.line_start = lex.span().end;
        Token::Newline
    })]
    Newline,
    /// Spaces, tabs and carriage returns.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
    /// End of input. Never produced by logos; appended by [`tokenize`].
    Eof,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and where it starts so that every token can be
/// given a line and column.
#[derive(Default)]
pub struct LexerExtras {
    /// The zero based line number the lexer is currently on.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

/// Turns source text into a token stream ending in [`Token::Eof`].
///
/// # Parameters
/// - `source_name`: Name reported in spans, such as a file name or `<stdin>`.
/// - `text`: The source text.
///
/// # Returns
/// Every token paired with its span.
///
/// # Errors
/// Returns [`SyntaxError::IllegalCharacter`] for the first character that
/// does not start a token.
pub fn tokenize(source_name: &str, text: &str) -> Result<Vec<(Token, Span)>, SyntaxError> {
    let source: Rc<str> = Rc::from(source_name);
    let mut lexer = Token::lexer(text);
    let mut tokens = Vec::new();

    loop {
        let start_line = lexer.extras.line;
        let start_of_line = lexer.extras.line_start;
        let Some(token) = lexer.next() else {
            break;
        };

        let range = lexer.span();
        let start = Position { index:  range.start,
                               line:   start_line,
                               column: range.start - start_of_line, };
        let end = Position { index:  range.end,
                             line:   lexer.extras.line,
                             column: range.end.saturating_sub(lexer.extras.line_start), };
        let span = Span::new(Rc::clone(&source), start, end);

        match token {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(SyntaxError::IllegalCharacter { character: lexer.slice().to_string(),
                                                           span });
            },
        }
    }

    let end = Position { index:  text.len(),
                         line:   lexer.extras.line,
                         column: text.len() - lexer.extras.line_start, };
    tokens.push((Token::Eof, Span::new(source, end, end)));

    Ok(tokens)
}

/// Parses a numeric literal from the current token slice.
///
/// # Parameters
/// - `lex`: Reference to the Logos lexer at the current token.
///
/// # Returns
/// - `Some(f64)`: The parsed value.
/// - `None`: If the slice is not a valid number.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Strips the quotes off a string literal and resolves its escapes.
///
/// Line breaks inside the literal advance the lexer's line counter.
fn parse_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    if let Some(last_break) = slice.rfind('\n') {
        lex.extras.line += slice.matches('\n').count();
        lex.extras.line_start = lex.span().start + last_break + 1;
    }

    let mut value = String::with_capacity(slice.len());
    let mut chars = slice[1..slice.len() - 1].chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some(other) => value.push(other),
            None => {},
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(text: &str) -> Vec<Token> {
        tokenize("<test>", text).unwrap()
                                .into_iter()
                                .map(|(token, _)| token)
                                .collect()
    }

    #[test]
    fn keywords_win_over_identifiers() {
        assert_eq!(kinds("fun funny sencap"),
                   vec![Token::Fun,
                        Token::Identifier("funny".into()),
                        Token::Sencap,
                        Token::Eof]);
    }

    #[test]
    fn semicolons_and_line_breaks_both_terminate() {
        assert_eq!(kinds("a;b\n"),
                   vec![Token::Identifier("a".into()),
                        Token::Newline,
                        Token::Identifier("b".into()),
                        Token::Newline,
                        Token::Eof]);
    }

    #[test]
    fn arrows_and_comparisons() {
        assert_eq!(kinds("-> => >= == != & |"),
                   vec![Token::Arrow,
                        Token::FatArrow,
                        Token::GreaterEqual,
                        Token::EqualEqual,
                        Token::BangEqual,
                        Token::And,
                        Token::Or,
                        Token::Eof]);
    }

    #[test]
    fn numbers_and_strings() {
        assert_eq!(kinds(r#"2.5 7 1e3 "a\tb\"c""#),
                   vec![Token::Number(2.5),
                        Token::Number(7.0),
                        Token::Number(1000.0),
                        Token::String("a\tb\"c".into()),
                        Token::Eof]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("x // trailing words\ny"),
                   vec![Token::Identifier("x".into()),
                        Token::Newline,
                        Token::Identifier("y".into()),
                        Token::Eof]);
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let tokens = tokenize("<test>", "a\n  bc").unwrap();
        let (_, span) = &tokens[2];
        assert_eq!(span.start.line, 1);
        assert_eq!(span.start.column, 2);
        assert_eq!(span.line_number(), 2);
    }

    #[test]
    fn unknown_characters_are_rejected() {
        let error = tokenize("<test>", "x = 1 $ 2").unwrap_err();
        assert_eq!(error.to_string(),
                   "Illegal Character: '$', File <test> in line number 1");
    }
}
