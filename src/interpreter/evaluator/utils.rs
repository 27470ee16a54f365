use crate::{
    ast::Node,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Outcome},
        scope::{Context, Table},
        value::Value,
    },
    span::Span,
};

/// The names bound in every global table.
pub const BUILTIN_NAMES: [&str; 3] = ["true", "false", "null"];

/// Creates a table binding `true`, `false` and `null`.
///
/// The values are owned by `context`, which should be the frame the table
/// belongs to. `span` is used as their origin.
#[must_use]
pub fn builtins_table(span: &Span, context: &Context) -> Table {
    let table = Table::new();
    fill_builtins(&table, span, context);
    table
}

/// Binds `true`, `false` and `null` in `table`.
pub fn fill_builtins(table: &Table, span: &Span, context: &Context) {
    table.set("true", Value::boolean(true, span, context));
    table.set("false", Value::boolean(false, span, context));
    table.set("null", Value::null(span, context));
}

/// Picks the frame a new binding for `name` goes into.
///
/// A name already bound directly in `context` is never overwritten: the new
/// binding goes into a child frame labelled `label`, which shadows the old
/// one for every statement that follows.
#[must_use]
pub fn binding_target(name: &str, label: &str, span: &Span, context: &Context) -> Context {
    if context.table().contains_direct(name) {
        context.child(label, span)
    } else {
        context.clone()
    }
}

/// Picks the frame a loop continues in after `break` or `continue`.
///
/// When the signal was raised in `current` or in a frame nested inside it,
/// the loop carries on from that frame, keeping the bindings the interrupted
/// iteration made. Signals coming from anywhere else, such as the body of a
/// called function, leave `current` as it was.
#[must_use]
pub fn resume_context(current: &Context, raised: &Context) -> Context {
    let mut frame = Some(raised);
    while let Some(candidate) = frame {
        if candidate.ptr_eq(current) {
            return raised.clone();
        }
        frame = candidate.parent();
    }
    current.clone()
}

impl Evaluator {
    /// Evaluates a subexpression and keeps only its value.
    ///
    /// Operands, arguments and conditions all run in the current context and
    /// never change it, so the context they hand back is dropped. A value
    /// whose own frame went away with it is re-owned by `context`.
    ///
    /// # Errors
    /// Propagates every [`Signal`](crate::interpreter::evaluator::core::Signal)
    /// raised by `node`.
    pub fn eval_value(&self, node: &Node, context: &Context) -> EvalResult<Value> {
        let value = self.eval(node, context)?.value;
        Ok(value.anchored(context))
    }

    /// Evaluates a list literal, element by element from left to right.
    pub(crate) fn eval_list(&self, elements: &[Node], span: &Span, context: &Context) -> EvalResult {
        let values = elements.iter()
                             .map(|element| self.eval_value(element, context))
                             .collect::<EvalResult<Vec<_>>>()?;

        Ok(Outcome::new(Value::list(values, span, context), context))
    }
}
