use crate::{
    ast::ForLoop,
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator, Outcome, Signal},
            utils::resume_context,
        },
        scope::Context,
        value::{Value, ValueKind},
    },
};

impl Evaluator {
    /// Evaluates a `for` loop or a list comprehension.
    ///
    /// The source must evaluate to a list. For each element a new frame is
    /// created as a child of the context the previous iteration left behind,
    /// binding the loop variable. The filter, if any, is evaluated in that
    /// frame; iterations for which it is falsy skip the body. `break` and
    /// `continue` raised by the body are consumed here.
    ///
    /// In comprehension form the body values are collected into a list and
    /// execution continues in `context`. In statement form the value is that
    /// of the last body that completed (`null` if none did) and execution
    /// continues in the last iteration's context.
    ///
    /// # Parameters
    /// - `for_loop`: Loop variable, source, body and filter.
    /// - `context`: The current frame.
    ///
    /// # Errors
    /// Fails if the source is not a list, and propagates errors and `return`
    /// from the source, filter and body.
    ///
    /// # Example
    /// ```
    /// use imperal::Interpreter;
    ///
    /// let mut session = Interpreter::new();
    /// let result = session.run("<doc>", "xs = x * 2 for x in [1, 2, 3] -> if x > 1").unwrap();
    /// assert_eq!(result, "[4, 6]");
    /// ```
    pub(crate) fn eval_for(&self, for_loop: &ForLoop, context: &Context) -> EvalResult {
        let source = self.eval_value(&for_loop.source, context)?;
        let ValueKind::List(list) = &source.kind else {
            return Err(RuntimeError::new(RuntimeErrorKind::NotAList(source.to_string()),
                                         &for_loop.span,
                                         context).into());
        };

        let mut current = context.clone();
        let mut last = Value::null(&for_loop.span, context);
        let mut collected = Vec::new();

        for element in list.elements.iter() {
            let iteration = current.child("<for>", &for_loop.span);
            iteration.define(for_loop.variable.as_str(), element.clone());
            current = iteration;

            if let Some(filter) = &for_loop.filter
               && !self.eval_value(filter, &current)?.is_true()
            {
                continue;
            }

            match self.eval(&for_loop.body, &current) {
                Ok(outcome) => {
                    if for_loop.comprehension {
                        collected.push(outcome.value.clone());
                    }
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

        if for_loop.comprehension {
            let list = Value::list(collected, &for_loop.span, &current);
            Ok(Outcome::new(list.at(&for_loop.span, context), context))
        } else {
            Ok(Outcome::new(last, &current))
        }
    }
}
