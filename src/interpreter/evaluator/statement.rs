use crate::{
    ast::Node,
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Outcome, Signal},
        scope::Context,
        value::{Value, ValueKind},
    },
    span::Span,
};

impl Evaluator {
    /// Evaluates an assignment.
    ///
    /// The right hand side is evaluated first. If `name` currently resolves
    /// to a function placeholder and the new value is a function, the
    /// placeholder is initialized in place, so everything already holding it
    /// can call it, and the placeholder is what gets bound. Top level assignments may not rebind a visible name
    /// otherwise.
    ///
    /// The binding goes into `context` unless `name` is already bound there
    /// or the value is an encap object; then a child frame labelled with the
    /// name is created for it and execution continues in that frame.
    /// Functions and lists are re-homed to the frame they are bound in.
    ///
    /// # Errors
    /// - Re-initialization of a top level name.
    /// - Whatever evaluating the right hand side raises.
    pub(crate) fn eval_assignment(&self,
                                  name: &str,
                                  value: &Node,
                                  top_level: bool,
                                  span: &Span,
                                  context: &Context)
                                  -> EvalResult {
        let mut value = self.eval_value(value, context)?;
        let existing = context.lookup(name);
        let placeholder = existing.as_ref()
                                  .and_then(Value::as_function)
                                  .filter(|function| !function.is_initialized())
                                  .cloned();

        if let (Some(placeholder), Some(function)) = (placeholder, value.as_function().cloned()) {
            placeholder.initialize_from(&function);
            value = value.derive(ValueKind::Function(placeholder));
        } else if top_level && existing.is_some() {
            return Err(RuntimeError::new(RuntimeErrorKind::ReInitialization(name.to_string()),
                                         span,
                                         context).into());
        }

        let target = if context.table().contains_direct(name)
                        || matches!(value.kind, ValueKind::Encap(_))
        {
            context.child(name, span)
        } else {
            context.clone()
        };

        let bound = value.rehome(&target);
        target.define(name, bound.clone());
        Ok(Outcome::new(bound.at(span, &target), &target))
    }

    /// Reads a variable through the chain of visible tables.
    ///
    /// # Errors
    /// An undefined variable error if no visible table binds `name`.
    pub(crate) fn eval_variable(name: &str, span: &Span, context: &Context) -> EvalResult {
        let value = context.lookup(name).ok_or_else(|| {
                                            RuntimeError::new(RuntimeErrorKind::UndefinedVariable(name.to_string()),
                                                              span,
                                                              context)
                                        })?;

        Ok(Outcome::new(value.at(span, context), context))
    }

    /// Evaluates a conditional.
    ///
    /// At most one branch runs. The expression form yields the value of that
    /// branch; the statement form yields `false`. Both pass on the context
    /// the branch ended in.
    pub(crate) fn eval_if(&self,
                          condition: &Node,
                          then_branch: &Node,
                          else_branch: Option<&Node>,
                          produces_value: bool,
                          span: &Span,
                          context: &Context)
                          -> EvalResult {
        let condition = self.eval_value(condition, context)?;
        let branch = if condition.is_true() { Some(then_branch) } else { else_branch };

        let Some(branch) = branch else {
            return Ok(Outcome::new(Value::boolean(false, span, context), context));
        };

        let outcome = self.eval(branch, context)?;
        if produces_value {
            Ok(outcome)
        } else {
            Ok(Outcome::new(Value::boolean(false, span, context), &outcome.context))
        }
    }

    /// Evaluates `return`, raising a [`Signal::Return`] with the value, or
    /// with `null` when none was given.
    pub(crate) fn eval_return(&self,
                              value: Option<&Node>,
                              span: &Span,
                              context: &Context)
                              -> EvalResult {
        let value = match value {
            Some(node) => self.eval_value(node, context)?,
            None => Value::null(span, context),
        };

        Err(Signal::Return(value))
    }
}
