use std::fmt;

use thiserror::Error;

use crate::{
    interpreter::{scope::Context, value::Value},
    span::Span,
};

/// The condition that made evaluation fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    /// An operator was applied to operand types it does not support.
    #[error("illegal operation")]
    IllegalOperation,
    /// A number was divided by zero.
    #[error("Division by zero")]
    DivisionByZero,
    /// A string or list was indexed outside of its bounds.
    #[error("{container} has {len} {unit} as {rendered} but {index} was retrieved")]
    IndexOutOfRange {
        /// `List` or `String`.
        container: &'static str,
        /// Number of elements or characters in the container.
        len:       usize,
        /// `elements` or `characters`.
        unit:      &'static str,
        /// The rendered container.
        rendered:  String,
        /// The requested index, as written by the user.
        index:     f64,
    },
    /// Repeating a string would exceed the length limit.
    #[error("Repeating a string of {len} bytes {count} times exceeds the limit of {limit} bytes")]
    StringTooLong {
        /// Length of the repeated string, in bytes.
        len:   usize,
        /// The requested repetition count.
        count: usize,
        /// The largest string repetition may produce, in bytes.
        limit: usize,
    },
    /// A name was looked up that no visible scope binds.
    #[error("Undefined variable {0}")]
    UndefinedVariable(String),
    /// A function was called with more arguments than parameters.
    #[error("{count} too many args passed into '{name}'")]
    TooManyArguments {
        /// How many arguments were passed beyond the parameter count.
        count: usize,
        /// Name of the called function.
        name:  String,
    },
    /// A function was called with fewer arguments than parameters.
    #[error("{count} too few args passed into '{name}'")]
    TooFewArguments {
        /// How many arguments were missing.
        count: usize,
        /// Name of the called function.
        name:  String,
    },
    /// A top level name was assigned twice.
    #[error("Cannot re-initialize the variable '{0}'")]
    ReInitialization(String),
    /// The parent expression of an encap literal was not an encap object.
    #[error("Encaps can only inherit from other Encaps")]
    InheritFromNonEncap,
    /// An encap literal inherited from an object whose scope it was
    /// evaluated in.
    #[error("Encaps cannot inherit from an Encap they are created inside of")]
    InheritanceCycle,
    /// `prev` was used in a context without a parent.
    #[error("No parent context found")]
    NoParentContext,
    /// Building a sencap walked more contexts than allowed.
    #[error("Context nesting depth allowed inside Sencaps exceeded")]
    NestingDepthExceeded,
    /// The source of a `for` loop was not a list.
    #[error("{0} must be a list")]
    NotAList(String),
    /// `break` or `continue` escaped every loop.
    #[error("'{0}' used outside of a loop")]
    OutsideLoop(&'static str),
}

/// A runtime failure, together with where it happened.
///
/// The context is the frame that was active when the error was raised. It is
/// kept alive so the traceback can walk its parents when the error is
/// rendered.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    /// What went wrong.
    pub kind:    RuntimeErrorKind,
    /// The code that failed.
    pub span:    Span,
    /// The frame that was executing the failing code, if it still existed
    /// when the error was raised.
    pub context: Option<Context>,
}

impl RuntimeError {
    #[must_use]
    pub fn new(kind: RuntimeErrorKind, span: &Span, context: &Context) -> Self {
        Self { kind,
               span: span.clone(),
               context: Some(context.clone()) }
    }

    /// Creates an error raised in the frame `value` was produced in.
    #[must_use]
    pub fn raised_by(kind: RuntimeErrorKind, span: &Span, value: &Value) -> Self {
        Self { kind,
               span: span.clone(),
               context: value.context() }
    }

    /// Returns the traceback lines, outermost frame first.
    ///
    /// Each frame reports the position at which control entered its child, so
    /// the innermost line points at the failing code itself. Frames entered
    /// without a recorded position report line 0.
    #[must_use]
    pub fn traceback(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut position = Some(&self.span);
        let mut frame = self.context.as_ref();

        while let Some(context) = frame {
            let source = position.map_or(&self.span.source, |span| &span.source);
            let line = position.map_or(0, Span::line_number);
            lines.push(format!("File: {source}, line: {line} {} main", context.label()));
            position = context.entry();
            frame = context.parent();
        }

        lines.reverse();
        lines
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error Traceback, (Most recent call last):")?;
        for line in self.traceback() {
            writeln!(f, "{line}")?;
        }
        write!(f, "Runtime Error: {}", self.kind)
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
