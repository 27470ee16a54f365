/// Dispatch of binary operators on evaluated operands.
///
/// Evaluates both sides of an operation and routes the pair of values to the
/// handler for the left operand's type. Also hosts the error helpers shared
/// by all handlers.
pub mod core;

/// Numeric operators.
///
/// Arithmetic and ordering on numbers, booleans and `null`.
pub mod arithmetic;

/// String and list operators.
///
/// Concatenation, repetition, dropping a prefix, removing and indexing
/// elements, with negative positions counted from the end.
pub mod sequence;

/// Equality and logical operators.
///
/// Structural equality for every value type, plus `and` and `or` over
/// truthiness.
pub mod comparison;

/// Operators on encapsulation objects.
///
/// Merging two objects and looking up a field by name.
pub mod encap;
