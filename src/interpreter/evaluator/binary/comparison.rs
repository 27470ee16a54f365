use crate::{
    ast::BinaryOperator,
    interpreter::value::{EncapObject, Value, ValueKind},
};

/// Decides whether two values are equal.
///
/// Numbers, booleans and `null` compare by numeric value, strings by their
/// text, lists by length and then element by element, and objects by their
/// member names and values. Values of unrelated types, and functions, are
/// never equal.
#[allow(clippy::float_cmp)]
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (&left.kind, &right.kind) {
        (ValueKind::String(a), ValueKind::String(b)) => a == b,
        (ValueKind::List(a), ValueKind::List(b)) => {
            a.len() == b.len()
            && a.elements
                .iter()
                .zip(b.elements.iter())
                .all(|(a, b)| values_equal(a, b))
        },
        (ValueKind::Encap(a), ValueKind::Encap(b)) => objects_equal(a, b),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// Compares two objects member by member, ignoring member order.
fn objects_equal(left: &EncapObject, right: &EncapObject) -> bool {
    let left = left.members();
    let right = right.members();
    left.len() == right.len()
    && left.iter()
           .all(|(name, value)| right.get(name).is_some_and(|other| values_equal(value, other)))
}

/// Evaluates `and` and `or`.
///
/// Both operands have already been evaluated; only their truthiness counts.
/// The result is a boolean.
#[must_use]
pub fn eval_logic(op: BinaryOperator, left: &Value, right: &Value) -> Value {
    let result = match op {
        BinaryOperator::And => left.is_true() && right.is_true(),
        _ => left.is_true() || right.is_true(),
    };
    left.derive(ValueKind::Bool(result))
}
