//! # imperal
//!
//! imperal is an interpreter for Imperal, a small dynamically typed scripting
//! language written in Rust. A program is a sequence of top level
//! declarations; the language has numbers, strings, lists, first class
//! functions with closures, `encap` objects with inheritance, loops and list
//! comprehensions.
//!
//! Source text goes through four stages: the lexer turns it into tokens, the
//! parser builds an AST, the declarator hoists function declarations so that
//! functions can refer to each other in any order, and the evaluator walks
//! the tree. [`Interpreter`] ties them together into a session that keeps its
//! bindings from one run to the next.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::rc::Rc;

use crate::{
    interpreter::{
        declarator::declare_functions,
        evaluator::{core::Evaluator, utils::fill_builtins},
        lexer::tokenize,
        parser::core::parse_program,
        scope::{Context, Table},
    },
    span::{Position, Span},
};
pub use crate::{error::Error, interpreter::evaluator::core::EvaluatorConfig};

/// Defines the structure of parsed code.
///
/// This module declares the `Node` enum and related types that represent the
/// syntactic structure of source code as a tree. The AST is built by the
/// parser, rewritten by the declarator and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines node types for all language constructs.
/// - Attaches source spans to every node for error reporting.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing or
/// evaluating code. Syntax errors name the offending line; runtime errors
/// carry the frame they were raised in and render a traceback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Renders the messages shown to users.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, declaration hoisting,
/// evaluation, scopes and value representations to provide a complete
/// runtime for Imperal programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, declarator, evaluator,
///   scopes and value types.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Source positions and spans.
///
/// Every token, node and value carries a [`Span`](span::Span) naming the source
/// it came from and where in it, which is what error messages report.
pub mod span;
/// General utilities for numeric conversion.
///
/// This module provides helpers used by the operators to turn the numbers of
/// the language into positions and counts.
pub mod util;

/// The name given to the session's outermost frame.
pub const MODULE_LABEL: &str = "<module>";

/// An interpreter session.
///
/// A session owns the global frame, which binds `true`, `false` and `null`,
/// and remembers the frame the last successful run ended in. Every run gets
/// a fresh frame on top of it, which becomes the session's frame only if the
/// run succeeds. Names bound by earlier runs therefore stay visible, as in a
/// REPL, while a failed run leaves nothing behind.
///
/// After every run the frames nothing can reach anymore are cleared, and
/// dropping the session clears all of them.
///
/// ## Usage
///
/// ```
/// use imperal::Interpreter;
///
/// let mut session = Interpreter::new();
/// assert_eq!(session.run("<stdin>", "x = 5").unwrap(), "5");
/// assert_eq!(session.run("<stdin>", "y = x * 2").unwrap(), "10");
///
/// // Top level names cannot be bound twice.
/// assert!(session.run("<stdin>", "x = 6").is_err());
/// ```
#[derive(Debug)]
pub struct Interpreter {
    evaluator: Evaluator,
    context:   Context,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates a session with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }

    /// Creates a session whose evaluator uses `config`.
    #[must_use]
    pub fn with_config(config: EvaluatorConfig) -> Self {
        let global = Context::root(MODULE_LABEL, Table::new());
        let span = Span::new(Rc::from(MODULE_LABEL), Position::default(), Position::default());
        fill_builtins(global.table(), &span, &global);

        Self { evaluator: Evaluator::new(config),
               context:   global, }
    }

    /// The frame the next run starts from.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Runs a program and returns the rendering of its final value.
    ///
    /// The text is tokenized, parsed, has its function declarations hoisted
    /// and is then evaluated in a new frame chained to the session's current
    /// one. On success the frame the program ended in becomes the session's
    /// current frame; on failure the session stays as it was.
    ///
    /// # Parameters
    /// - `source_name`: Name used for the source in error messages, such as
    ///   a file name or `<stdin>`.
    /// - `text`: The program.
    ///
    /// # Returns
    /// The value of the last declaration as text, or the value of a top
    /// level `return`. An empty program yields an empty string.
    ///
    /// # Errors
    /// The first syntax error, or the runtime error that stopped the
    /// program.
    pub fn run(&mut self, source_name: &str, text: &str) -> Result<String, Error> {
        tracing::debug!(source = source_name, bytes = text.len(), "running program");

        let result = self.execute(source_name, text);
        self.context.collect_garbage();
        result
    }

    fn execute(&mut self, source_name: &str, text: &str) -> Result<String, Error> {
        let tokens = tokenize(source_name, text)?;
        let program = declare_functions(parse_program(&tokens)?);

        let frame = self.context
                        .detached(MODULE_LABEL, Table::with_parent(self.context.table()), None);
        match self.evaluator.eval_program(&program, &frame) {
            Ok(outcome) => {
                self.context = outcome.context;
                Ok(outcome.value.to_string())
            },
            Err(signal) => {
                let value = signal.into_result()?;
                Ok(value.to_string())
            },
        }
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        self.context.release_all();
    }
}
