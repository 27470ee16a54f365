use thiserror::Error;

use crate::span::Span;

/// Represents all errors that can occur during lexing or parsing.
///
/// Both phases are fail-fast: the first error aborts the whole input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    /// The lexer met a character that starts no token.
    #[error("Illegal Character: '{character}', {span}")]
    IllegalCharacter {
        /// The offending character, or the rest of an unterminated string.
        character: String,
        /// Where the character was found.
        span:      Span,
    },
    /// The parser met a token it could not use at this point.
    #[error("Invalid Syntax: {details}, {span}")]
    InvalidSyntax {
        /// What the parser expected to find.
        details: String,
        /// The span of the offending token.
        span:    Span,
    },
    /// The token stream ended before the construct was complete.
    #[error("Invalid Syntax: unexpected end of input")]
    UnexpectedEndOfInput,
}

impl SyntaxError {
    /// Shorthand for [`SyntaxError::InvalidSyntax`].
    pub fn invalid(details: impl Into<String>, span: &Span) -> Self {
        Self::InvalidSyntax { details: details.into(),
                              span:    span.clone(), }
    }
}
