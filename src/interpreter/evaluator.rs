/// Core evaluation logic.
///
/// Contains the [`Evaluator`](core::Evaluator) itself, its configuration, the
/// [`Outcome`](core::Outcome) of evaluating a node and the
/// [`Signal`](core::Signal) used to unwind through `return`, `break`,
/// `continue` and runtime errors. Dispatches every AST node to the handler
/// for its variant.
pub mod core;

/// Binary operator evaluation.
///
/// Evaluates both operands and applies arithmetic, comparison, logical and
/// sequence operators to the resulting values. Scope access (`=>`) is handled
/// here as well, since it only evaluates its right side inside an object.
pub mod binary;

/// Unary operator evaluation.
///
/// Implements identity, numeric negation and logical NOT.
pub mod unary;

/// Blocks and whole programs.
///
/// Runs statement sequences while threading the context each statement
/// leaves behind into the next.
pub mod block;

/// Assignments, variable access, conditionals and jumps.
pub mod statement;

/// Function definitions, hoisted declarations and calls.
///
/// Handles creating function values, initializing placeholders in place,
/// argument checking and running bodies in a fresh frame chained to the
/// function's home scope.
pub mod function;

/// Evaluation of `for` loops and list comprehensions.
pub mod for_loop;

/// Evaluation of `while` loops.
pub mod while_loop;

/// Encapsulation objects and `prev`.
///
/// Builds `encap` and `sencap` objects from the bindings their bodies leave
/// behind, wires up inheritance and evaluates `prev` in the parent frame.
pub mod encap;

/// Helpers shared by the evaluation modules.
pub mod utils;
