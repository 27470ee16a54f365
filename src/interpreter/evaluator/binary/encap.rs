use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::binary::{comparison::values_equal, core::illegal_operation},
        scope::{Context, Table},
        value::{EncapObject, Value, ValueKind},
    },
};

/// Evaluates an operator whose left operand is an encap object.
///
/// Supported forms:
/// - `a + b`: a new object holding the members of both, `b` winning on
///   conflicts, tagged with the types of both.
/// - `a / "name"`: the member called `name`, or `null` if there is none.
/// - `a == v`, `a != v`: member wise comparison; anything but an object is
///   unequal.
///
/// # Errors
/// Returns an illegal operation for any other operator or operand.
pub fn eval_encap(op: BinaryOperator,
                  object: &EncapObject,
                  left: &Value,
                  right: &Value)
                  -> Result<Value, RuntimeError> {
    match (op, &right.kind) {
        (BinaryOperator::Add, ValueKind::Encap(other)) => {
            Ok(left.derive(ValueKind::Encap(Rc::new(merge(object, other, left)))))
        },
        (BinaryOperator::Div, ValueKind::String(name)) => {
            Ok(object.field(name).cloned().unwrap_or_else(|| left.derive(ValueKind::Null)))
        },
        (BinaryOperator::Equal, _) => Ok(left.derive(ValueKind::Bool(values_equal(left, right)))),
        (BinaryOperator::NotEqual, _) => Ok(left.derive(ValueKind::Bool(!values_equal(left, right)))),
        _ => Err(illegal_operation(left, right)),
    }
}

/// Builds the object produced by `left + right`.
///
/// The merged object resolves names through its own members first and then
/// through the scope of `left`.
fn merge(left: &EncapObject, right: &EncapObject, origin: &Value) -> EncapObject {
    let mut fields = left.members();
    fields.extend(right.members());

    let table = Table::with_parent(left.scope.table());
    for (name, value) in &fields {
        table.set(name.as_str(), value.clone());
    }
    let scope = Context::with_table(left.scope.label(), table, Some(&left.scope), &origin.span);

    tracing::trace!(members = fields.len(), "merged encap objects");
    EncapObject { fields,
                  inherited: IndexMap::new(),
                  types: left.types.iter().chain(&right.types).cloned().collect(),
                  scope }
}
