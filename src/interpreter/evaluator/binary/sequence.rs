use crate::{
    ast::BinaryOperator,
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::binary::{
            comparison::values_equal,
            core::{illegal_operation, index_out_of_range},
        },
        value::{List, Value, ValueKind},
    },
    util::num::{MAX_REPEAT_BYTES, element_index, repeat_count, repeated_len, split_offset},
};

/// Evaluates an operator whose left operand is a string.
///
/// Supported forms:
/// - `s + t`: concatenation with another string.
/// - `s - n`: drops the first `n` characters.
/// - `s * n`: repeats the string `n` times, up to
///   [`MAX_REPEAT_BYTES`] bytes.
/// - `s / n`: the character at position `n`.
/// - `s == t`, `s != t`: comparison with another string.
///
/// Negative positions count from the end of the string.
///
/// # Errors
/// An index error for positions outside the string, a length error for
/// repetitions past the limit, an illegal operation for anything else.
pub fn eval_string(op: BinaryOperator,
                   text: &str,
                   left: &Value,
                   right: &Value)
                   -> Result<Value, RuntimeError> {
    if let ValueKind::String(other) = &right.kind {
        return match op {
            BinaryOperator::Add => Ok(left.derive(ValueKind::String(format!("{text}{other}").into()))),
            BinaryOperator::Equal => Ok(left.derive(ValueKind::Bool(text == &**other))),
            BinaryOperator::NotEqual => Ok(left.derive(ValueKind::Bool(text != &**other))),
            _ => Err(illegal_operation(left, right)),
        };
    }

    let Some(number) = right.as_number() else {
        return Err(illegal_operation(left, right));
    };
    let len = text.chars().count();

    match op {
        BinaryOperator::Sub => {
            let offset =
                split_offset(number, len).ok_or_else(|| index_out_of_range("String", len, left, right))?;
            let rest: String = text.chars().skip(offset).collect();
            Ok(left.derive(ValueKind::String(rest.into())))
        },
        BinaryOperator::Mul => {
            let count = repeat_count(number).ok_or_else(|| illegal_operation(left, right))?;
            if repeated_len(text.len(), count).is_none() {
                let kind = RuntimeErrorKind::StringTooLong { len: text.len(),
                                                             count,
                                                             limit: MAX_REPEAT_BYTES };
                return Err(RuntimeError::raised_by(kind, &left.span.to(&right.span), left));
            }
            Ok(left.derive(ValueKind::String(text.repeat(count).into())))
        },
        BinaryOperator::Div => {
            let character = element_index(number, len).and_then(|index| text.chars().nth(index))
                                                      .ok_or_else(|| {
                                                          index_out_of_range("String", len, left, right)
                                                      })?;
            Ok(left.derive(ValueKind::String(character.to_string().into())))
        },
        _ => Err(illegal_operation(left, right)),
    }
}

/// Evaluates an operator whose left operand is a list.
///
/// Supported forms:
/// - `l + v`: a new list with `v` appended.
/// - `l - n`: a new list without the element at position `n`.
/// - `l * m`: the concatenation with the list `m`.
/// - `l / n`: the element at position `n`.
/// - `l == v`, `l != v`: element wise comparison; anything but a list is
///   unequal.
///
/// Negative positions count from the end of the list. The operand lists are
/// never modified.
///
/// # Errors
/// An index error for positions outside the list, an illegal operation for
/// anything else.
pub fn eval_list(op: BinaryOperator,
                 list: &List,
                 left: &Value,
                 right: &Value)
                 -> Result<Value, RuntimeError> {
    let derive_list = |elements: Vec<Value>| left.derive(ValueKind::List(list.sibling(elements)));

    match op {
        BinaryOperator::Add => {
            let mut elements = list.elements.to_vec();
            elements.push(right.clone());
            Ok(derive_list(elements))
        },
        BinaryOperator::Sub => {
            let index = list_index(list, left, right)?;
            let mut elements = list.elements.to_vec();
            elements.remove(index);
            Ok(derive_list(elements))
        },
        BinaryOperator::Mul => {
            let ValueKind::List(other) = &right.kind else {
                return Err(illegal_operation(left, right));
            };
            let elements = list.elements.iter().chain(other.elements.iter()).cloned().collect();
            Ok(derive_list(elements))
        },
        BinaryOperator::Div => {
            let index = list_index(list, left, right)?;
            Ok(list.elements[index].clone())
        },
        BinaryOperator::Equal => Ok(left.derive(ValueKind::Bool(values_equal(left, right)))),
        BinaryOperator::NotEqual => Ok(left.derive(ValueKind::Bool(!values_equal(left, right)))),
        _ => Err(illegal_operation(left, right)),
    }
}

/// Resolves the numeric right operand of a list operator to a position.
fn list_index(list: &List, left: &Value, right: &Value) -> Result<usize, RuntimeError> {
    let number = right.as_number().ok_or_else(|| illegal_operation(left, right))?;
    element_index(number, list.len()).ok_or_else(|| index_out_of_range("List", list.len(), left, right))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        interpreter::scope::{Context, Table},
        span::{Position, Span},
    };

    fn span() -> Span {
        Span::new(Rc::from("<test>"), Position::default(), Position::default())
    }

    fn numbers(values: &[f64], context: &Context) -> Value {
        let elements = values.iter().map(|&value| Value::number(value, &span(), context)).collect();
        Value::list(elements, &span(), context)
    }

    fn apply(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
        match &left.kind {
            ValueKind::String(text) => eval_string(op, text, left, right),
            ValueKind::List(list) => eval_list(op, list, left, right),
            _ => unreachable!("only sequences are tested here"),
        }
    }

    #[test]
    fn string_operators() {
        let context = Context::root("<module>", Table::new());
        let text = Value::string("hello", &span(), &context);
        let two = Value::number(2.0, &span(), &context);
        let last = Value::number(-1.0, &span(), &context);

        assert_eq!(apply(BinaryOperator::Sub, &text, &two).unwrap().to_string(), "llo");
        assert_eq!(apply(BinaryOperator::Mul, &text, &two).unwrap().to_string(), "hellohello");
        assert_eq!(apply(BinaryOperator::Div, &text, &last).unwrap().to_string(), "o");
    }

    #[test]
    fn string_repetition_is_bounded() {
        let context = Context::root("<module>", Table::new());
        let huge = Value::number(1e15, &span(), &context);

        let error = apply(BinaryOperator::Mul, &Value::string("a", &span(), &context), &huge).unwrap_err();
        assert!(matches!(error.kind,
                         RuntimeErrorKind::StringTooLong { len: 1,
                                                           count: 1_000_000_000_000_000,
                                                           .. }));

        let empty = Value::string("", &span(), &context);
        assert_eq!(apply(BinaryOperator::Mul, &empty, &huge).unwrap().to_string(), "");
    }

    #[test]
    fn list_operators_leave_their_operands_alone() {
        let context = Context::root("<module>", Table::new());
        let list = numbers(&[1.0, 2.0, 3.0], &context);
        let zero = Value::number(0.0, &span(), &context);

        assert_eq!(apply(BinaryOperator::Add, &list, &zero).unwrap().to_string(), "[1, 2, 3, 0]");
        assert_eq!(apply(BinaryOperator::Sub, &list, &zero).unwrap().to_string(), "[2, 3]");
        assert_eq!(apply(BinaryOperator::Mul, &list, &list).unwrap().to_string(),
                   "[1, 2, 3, 1, 2, 3]");
        assert_eq!(list.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn list_index_errors_name_the_size() {
        let context = Context::root("<module>", Table::new());
        let list = numbers(&[1.0, 2.0, 3.0], &context);
        let three = Value::number(3.0, &span(), &context);

        let error = apply(BinaryOperator::Div, &list, &three).unwrap_err();
        assert_eq!(error.kind.to_string(), "List has 3 elements as [1, 2, 3] but 3 was retrieved");
        assert!(matches!(error.kind, RuntimeErrorKind::IndexOutOfRange { len: 3, .. }));
    }

    #[test]
    fn lists_equal_other_lists_only() {
        let context = Context::root("<module>", Table::new());
        let short = numbers(&[1.0, 2.0], &context);
        let long = numbers(&[1.0, 2.0, 3.0], &context);
        let text = Value::string("[1, 2]", &span(), &context);

        assert_eq!(apply(BinaryOperator::Equal, &short, &short.clone()).unwrap().to_string(),
                   "true");
        assert_eq!(apply(BinaryOperator::Equal, &short, &long).unwrap().to_string(), "false");
        assert_eq!(apply(BinaryOperator::Equal, &short, &text).unwrap().to_string(), "false");
    }
}
