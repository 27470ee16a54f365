/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// strings, identifiers, operators, delimiters, keywords and statement
/// terminators. This is the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with spans.
/// - Resolves escapes in string literals and skips comments.
/// - Reports illegal characters.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of a program: its top level
/// declarations, statements and expressions.
///
/// # Responsibilities
/// - Converts tokens into [`Node`](crate::ast::Node) trees.
/// - Validates the grammar, failing on the first unmet expectation.
pub mod parser;
/// The declarator hoists function declarations.
///
/// Runs between parsing and evaluation and rewrites the tree so that every
/// named function is bound, as an uninitialized placeholder, before any
/// statement of its block runs. This is what makes forward references and
/// mutual recursion work.
pub mod declarator;
/// Symbol tables and execution frames.
///
/// Defines the shared, mutable [`Table`](scope::Table) of bindings and the
/// [`Context`](scope::Context) frames that pair a table with a label, a parent
/// frame and the position at which control entered it. Frames are what
/// tracebacks are built from.
pub mod scope;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values a program computes with: numbers,
/// booleans, `null`, strings, lists, functions and encap objects. Every value
/// carries its span and the frame it belongs to.
///
/// # Responsibilities
/// - Defines the [`Value`](value::Value) type and all its variants.
/// - Implements truthiness, rendering and re-homing into other scopes.
/// - Provides shared function handles that can be initialized in place.
pub mod value;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// applies operators, manages bindings and frames, and produces results. It
/// is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, functions, objects and control flow.
/// - Reports runtime errors such as division by zero or undefined names.
pub mod evaluator;
