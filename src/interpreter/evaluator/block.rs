use crate::{
    ast::Node,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Outcome, Signal},
        scope::Context,
        value::Value,
    },
    span::Span,
};

impl Evaluator {
    /// Evaluates a whole program in `context`.
    ///
    /// Unlike a nested block, the program does not get a frame of its own:
    /// its declarations run directly in `context`, so a session can keep the
    /// resulting context and run the next program on top of it. A top level
    /// `return` ends the program with its value, keeping the context the
    /// declarations before it left behind.
    ///
    /// # Parameters
    /// - `program`: The program block, after function declarations were
    ///   hoisted.
    /// - `context`: The frame the program runs in.
    ///
    /// # Returns
    /// The value of the last declaration, or an empty value for an empty
    /// program, together with the frame the last declaration left behind.
    ///
    /// # Errors
    /// Runtime errors, and `break` or `continue` outside of a loop, as a
    /// [`Signal`].
    pub fn eval_program(&self, program: &Node, context: &Context) -> EvalResult {
        let Node::Block { statements, span, .. } = program else {
            return self.eval(program, context);
        };

        let mut current = context.clone();
        let mut last = Value::empty(span, context);

        for statement in statements {
            let outcome = match self.eval(statement, &current) {
                Err(Signal::Return(value)) => return Ok(Outcome::new(value, &current)),
                result => result?,
            };
            current = outcome.context;
            last = outcome.value;
        }

        Ok(Outcome::new(last, &current))
    }

    /// Evaluates a block in a fresh child frame.
    pub(crate) fn eval_block(&self, statements: &[Node], span: &Span, context: &Context) -> EvalResult {
        let scope = context.child("<block>", span);
        self.eval_statements(statements, span, &scope)
    }

    /// Runs statements in order, threading the context each one leaves
    /// behind into the next.
    ///
    /// A nested block statement keeps its bindings to itself: the statements
    /// after it continue in the context they would have used without it.
    fn eval_statements(&self, statements: &[Node], span: &Span, context: &Context) -> EvalResult {
        let mut current = context.clone();
        let mut last = Value::empty(span, context);

        for statement in statements {
            let outcome = self.eval(statement, &current)?;
            if !matches!(statement, Node::Block { .. }) {
                current = outcome.context;
            }
            last = outcome.value;
        }

        Ok(Outcome::new(last, &current))
    }
}
