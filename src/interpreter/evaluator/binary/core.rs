use crate::{
    ast::{BinaryOperator, Node},
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::{
            binary::{arithmetic, comparison, encap, sequence},
            core::{EvalResult, Evaluator, Outcome},
        },
        scope::Context,
        value::{Value, ValueKind},
    },
    span::Span,
};

impl Evaluator {
    /// Evaluates a binary operation node.
    ///
    /// Both operands are evaluated from left to right in `context`, except
    /// for `=>`, whose right side runs inside the object produced by the left
    /// side. The result is stamped with the span of the whole operation.
    ///
    /// # Parameters
    /// - `left`: Left operand.
    /// - `op`: The operator.
    /// - `right`: Right operand.
    /// - `span`: Span of the whole operation.
    /// - `context`: The current frame.
    pub(crate) fn eval_binary_op(&self,
                                 left: &Node,
                                 op: BinaryOperator,
                                 right: &Node,
                                 span: &Span,
                                 context: &Context)
                                 -> EvalResult {
        let left = self.eval_value(left, context)?;

        let result = if op == BinaryOperator::ScopeAccess {
            let ValueKind::Encap(object) = &left.kind else {
                return Err(RuntimeError::raised_by(RuntimeErrorKind::IllegalOperation,
                                                   &left.span,
                                                   &left).into());
            };
            self.eval_value(right, &object.scope)?
        } else {
            let right = self.eval_value(right, context)?;
            eval_binary(op, &left, &right)?
        };

        Ok(Outcome::new(result.at(span, context), context))
    }
}

/// Applies a binary operator to two evaluated values.
///
/// `and` and `or` accept any operands. Every other operator is routed to the
/// handler for the type of the left operand, which decides what right
/// operands it accepts.
///
/// # Parameters
/// - `op`: The operator; `=>` is never valid here.
/// - `left`: Left operand.
/// - `right`: Right operand.
///
/// # Returns
/// The result, carrying the span and context of `left`.
///
/// # Errors
/// Returns an illegal operation error for unsupported pairings, and the
/// errors of the individual handlers such as division by zero.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use imperal::{
///     ast::BinaryOperator,
///     interpreter::{
///         evaluator::binary::core::eval_binary,
///         scope::{Context, Table},
///         value::Value,
///     },
///     span::{Position, Span},
/// };
///
/// let span = Span::new(Rc::from("<doc>"), Position::default(), Position::default());
/// let context = Context::root("<module>", Table::new());
/// let left = Value::string("ab", &span, &context);
/// let right = Value::number(3.0, &span, &context);
///
/// let result = eval_binary(BinaryOperator::Mul, &left, &right).unwrap();
/// assert_eq!(result.to_string(), "ababab");
/// ```
pub fn eval_binary(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if matches!(op, BinaryOperator::And | BinaryOperator::Or) {
        return Ok(comparison::eval_logic(op, left, right));
    }

    match &left.kind {
        ValueKind::Number(_) | ValueKind::Bool(_) | ValueKind::Null => {
            arithmetic::eval_numeric(op, left, right)
        },
        ValueKind::String(text) => sequence::eval_string(op, text, left, right),
        ValueKind::List(list) => sequence::eval_list(op, list, left, right),
        ValueKind::Encap(object) => encap::eval_encap(op, object, left, right),
        ValueKind::Function(_) | ValueKind::Empty => Err(illegal_operation(left, right)),
    }
}

/// Builds the error for an operator that does not accept its operands.
///
/// The error spans both operands and is raised in the frame the left operand
/// was produced in.
#[must_use]
pub fn illegal_operation(left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::raised_by(RuntimeErrorKind::IllegalOperation,
                            &left.span.to(&right.span),
                            left)
}

/// Builds the error for an index outside of a string or list.
///
/// # Parameters
/// - `container`: `String` or `List`.
/// - `len`: Number of characters or elements.
/// - `left`: The indexed value.
/// - `right`: The index value.
#[must_use]
pub fn index_out_of_range(container: &'static str,
                          len: usize,
                          left: &Value,
                          right: &Value)
                          -> RuntimeError {
    let unit = if container == "String" { "characters" } else { "elements" };
    RuntimeError::raised_by(RuntimeErrorKind::IndexOutOfRange { container,
                                                                len,
                                                                unit,
                                                                rendered: left.to_string(),
                                                                index: right.as_number()
                                                                            .unwrap_or_default() },
                            &left.span.to(&right.span),
                            left)
}
