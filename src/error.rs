use thiserror::Error as ThisError;

/// Lexing and parsing errors.
///
/// Defines the errors raised before evaluation starts: characters the lexer
/// cannot tokenize and token sequences the parser cannot accept. Both render
/// as a single line naming the source and the one based line number.
pub mod syntax_error;
/// Runtime errors.
///
/// Contains the error raised while evaluating a program. A runtime error
/// remembers the frame it was raised in and renders a traceback through the
/// chain of frames that led there.
pub mod runtime_error;

pub use runtime_error::{RuntimeError, RuntimeErrorKind};
pub use syntax_error::SyntaxError;

/// Any error a call to [`Interpreter::run`](crate::Interpreter::run) can
/// report.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The input could not be tokenized or parsed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The program failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
