use crate::{
    ast::Node,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator, Outcome, Signal},
            utils::resume_context,
        },
        scope::Context,
        value::Value,
    },
};

impl Evaluator {
    /// Evaluates a `while` loop.
    ///
    /// The condition is checked before every iteration, in the context the
    /// previous iteration left behind. `break` ends the loop and `continue`
    /// skips to the next condition check; in both cases the loop keeps the
    /// bindings the interrupted iteration made before the signal.
    ///
    /// # Returns
    /// The value of the last completed iteration, or `null` if the body
    /// never completed.
    pub(crate) fn eval_while(&self, condition: &Node, body: &Node, context: &Context) -> EvalResult {
        let mut current = context.clone();
        let mut last = Value::null(condition.span(), context);

        while self.eval_value(condition, &current)?.is_true() {
            match self.eval(body, &current) {
                Ok(outcome) => {
                    last = outcome.value;
                    current = outcome.context;
                },
                Err(Signal::Break { context, .. }) => {
                    current = resume_context(&current, &context);
                    break;
                },
                Err(Signal::Continue { context, .. }) => current = resume_context(&current, &context),
                Err(signal) => return Err(signal),
            }
        }

        Ok(Outcome::new(last, &current))
    }
}
