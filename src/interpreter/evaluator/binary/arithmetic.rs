use crate::{
    ast::BinaryOperator,
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::binary::core::illegal_operation,
        value::{Value, ValueKind},
    },
};

/// Evaluates an operator whose left operand is a number, boolean or `null`.
///
/// The right operand must be numeric as well. Arithmetic yields a number and
/// comparisons a boolean; booleans count as `1`/`0` and `null` as `0`.
///
/// # Errors
/// - Division by zero.
/// - An illegal operation for a non numeric right operand.
#[allow(clippy::float_cmp)]
pub fn eval_numeric(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    use BinaryOperator::{
        Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or,
        ScopeAccess, Sub,
    };

    let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
        return Err(illegal_operation(left, right));
    };

    let kind = match op {
        Add => ValueKind::Number(a + b),
        Sub => ValueKind::Number(a - b),
        Mul => ValueKind::Number(a * b),
        Div => {
            if b == 0.0 {
                return Err(RuntimeError::raised_by(RuntimeErrorKind::DivisionByZero,
                                                   &left.span.to(&right.span),
                                                   left));
            }
            ValueKind::Number(a / b)
        },
        Less => ValueKind::Bool(a < b),
        Greater => ValueKind::Bool(a > b),
        LessEqual => ValueKind::Bool(a <= b),
        GreaterEqual => ValueKind::Bool(a >= b),
        Equal => ValueKind::Bool(a == b),
        NotEqual => ValueKind::Bool(a != b),
        And | Or | ScopeAccess => return Err(illegal_operation(left, right)),
    };

    Ok(left.derive(kind))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{
        interpreter::scope::{Context, Table},
        span::{Position, Span},
    };

    fn span() -> Span {
        Span::new(Rc::from("<test>"), Position::default(), Position::default())
    }

    #[test]
    fn booleans_take_part_in_arithmetic() {
        let context = Context::root("<module>", Table::new());
        let left = Value::boolean(true, &span(), &context);
        let right = Value::number(2.0, &span(), &context);

        let sum = eval_numeric(BinaryOperator::Add, &left, &right).unwrap();
        assert_eq!(sum.to_string(), "3");
    }

    #[test]
    fn dividing_by_zero_fails() {
        let context = Context::root("<module>", Table::new());
        let left = Value::number(5.0, &span(), &context);
        let right = Value::null(&span(), &context);

        let error = eval_numeric(BinaryOperator::Div, &left, &right).unwrap_err();
        assert_eq!(error.kind, RuntimeErrorKind::DivisionByZero);
    }

    #[test]
    fn strings_are_not_numbers() {
        let context = Context::root("<module>", Table::new());
        let left = Value::number(5.0, &span(), &context);
        let right = Value::string("5", &span(), &context);

        let error = eval_numeric(BinaryOperator::Equal, &left, &right).unwrap_err();
        assert_eq!(error.kind, RuntimeErrorKind::IllegalOperation);
    }
}
