/// Program and expression entry points.
///
/// Holds the parse result type, the program rule and the expression rule with
/// its trailing suffixes (conditional, call, comprehension).
pub mod core;

/// Unary operators and atoms.
///
/// Parses prefix operators and the atomic building blocks of expressions:
/// literals, identifiers, parentheses and list literals.
pub mod unary;

/// Binary operator precedence levels.
///
/// Every level is an instance of one left-associative chain rule.
pub mod binary;

/// Brace delimited blocks.
pub mod block;

/// Statements.
///
/// Parses assignments, control flow, `define`, named functions and the
/// `return`, `break` and `continue` keywords.
pub mod statement;

/// Function literals.
pub mod function;

/// `encap` and `sencap` object literals.
pub mod encap;

/// Helpers shared by the grammar rules.
///
/// Provides token lookahead, expectation checks, identifier and
/// comma-separated list parsing.
pub mod utils;
