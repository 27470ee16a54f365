use crate::{
    ast::{BinaryOperator, Node, UnaryOperator},
    interpreter::{
        evaluator::{
            binary::core::eval_binary,
            core::{EvalResult, Evaluator, Outcome},
        },
        scope::Context,
        value::{Value, ValueKind},
    },
    span::Span,
};

impl Evaluator {
    /// Evaluates a unary operation.
    ///
    /// Supported operators:
    /// - `Plus`: multiplies the operand by `1`.
    /// - `Negate`: multiplies the operand by `-1`.
    /// - `Not`: the negated truthiness of the operand, as a boolean.
    ///
    /// Since `+` and `-` go through multiplication, they also work on strings
    /// (`-s` is an error, `+s` is `s`) and fail on anything that cannot be
    /// multiplied by a number.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `operand`: The operand node.
    /// - `span`: Span of the whole operation.
    /// - `context`: The current frame.
    pub(crate) fn eval_unary_op(&self,
                                op: UnaryOperator,
                                operand: &Node,
                                span: &Span,
                                context: &Context)
                                -> EvalResult {
        let value = self.eval_value(operand, context)?;

        let result = match op {
            UnaryOperator::Plus => eval_binary(BinaryOperator::Mul, &value, &factor(1.0, &value))?,
            UnaryOperator::Negate => {
                eval_binary(BinaryOperator::Mul, &value, &factor(-1.0, &value))?
            },
            UnaryOperator::Not => value.derive(ValueKind::Bool(!value.is_true())),
        };

        Ok(Outcome::new(result.at(span, context), context))
    }
}

/// A number positioned like `value`, used as the right operand of `*`.
fn factor(number: f64, value: &Value) -> Value {
    value.derive(ValueKind::Number(number))
}
