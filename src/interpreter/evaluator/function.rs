use std::{cmp::Ordering, rc::Rc};

use crate::{
    ast::{FunctionDef, Node},
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator, Outcome, Signal},
            utils::binding_target,
        },
        scope::{Context, Table},
        value::{Function, Value, ValueKind},
    },
    span::Span,
};

impl Evaluator {
    /// Evaluates a function literal.
    ///
    /// The new function captures `context` as its home. Lambdas are simply
    /// returned. A named function is bound under its name: if the name
    /// resolves to a placeholder that has not been initialized yet, the
    /// placeholder is initialized from the new function and the binding goes
    /// into `context`; otherwise a name already bound directly in `context`
    /// moves the binding into a child frame labelled `--name`.
    ///
    /// # Returns
    /// The function value and the frame holding its binding.
    pub(crate) fn eval_function_def(def: &FunctionDef, context: &Context) -> Outcome {
        let function = Function::new(def, context);
        let value = Value::new(ValueKind::Function(function.clone()), &def.span, context);
        let Some(name) = &def.name else {
            return Outcome::new(value, context);
        };

        let placeholder = context.lookup(name)
                                 .and_then(|existing| existing.as_function().cloned())
                                 .filter(|existing| !existing.is_initialized());
        let target = if let Some(placeholder) = placeholder {
            placeholder.initialize_from(&function);
            context.clone()
        } else {
            binding_target(name, &format!("--{name}"), &def.span, context)
        };

        let bound = value.rehome(&target);
        target.define(name.as_str(), bound.clone());
        Outcome::new(bound, &target)
    }

    /// Evaluates a hoisted declaration by binding an uninitialized function.
    ///
    /// Until its definition runs, calling the placeholder evaluates
    /// `placeholder`, which yields `null`.
    pub(crate) fn eval_function_declaration(name: &str,
                                            placeholder: &Rc<Node>,
                                            span: &Span,
                                            context: &Context)
                                            -> Outcome {
        let target = binding_target(name, &format!("--{name}"), span, context);
        let function = Function::placeholder(name, placeholder, &target);
        let value = Value::new(ValueKind::Function(function), span, &target);

        target.define(name, value.clone());
        Outcome::new(value, &target)
    }

    /// Evaluates a function call.
    ///
    /// The callee is evaluated first, then the arguments from left to right,
    /// all in the caller's context. The body runs in a new frame labelled
    /// with the function's name, whose table chains to the function's home
    /// scope and binds every parameter.
    ///
    /// # Parameters
    /// - `callee`: Expression producing the function.
    /// - `arguments`: Argument expressions.
    /// - `span`: Span of the whole call.
    /// - `context`: The caller's frame.
    ///
    /// # Returns
    /// The value of the body for auto returning functions, the value passed
    /// to `return` if one ran, and `null` otherwise.
    ///
    /// # Errors
    /// - An illegal operation if the callee is not a function.
    /// - Too many or too few arguments.
    /// - Anything the body raises, except `return`.
    #[tracing::instrument(level = "debug", skip_all, fields(line = span.line_number()))]
    pub(crate) fn eval_call(&self,
                            callee: &Node,
                            arguments: &[Node],
                            span: &Span,
                            context: &Context)
                            -> EvalResult {
        let callee = self.eval_value(callee, context)?.at(span, context);
        let arguments = arguments.iter()
                                 .map(|argument| self.eval_value(argument, context))
                                 .collect::<EvalResult<Vec<_>>>()?;

        let Some(function) = callee.as_function() else {
            return Err(RuntimeError::new(RuntimeErrorKind::IllegalOperation, span, context).into());
        };
        let data = function.data();
        tracing::debug!(function = %data.name, arguments = arguments.len(), "calling function");

        match arguments.len().cmp(&data.params.len()) {
            Ordering::Greater => {
                let kind = RuntimeErrorKind::TooManyArguments { count: arguments.len() - data.params.len(),
                                                                name:  data.name, };
                return Err(RuntimeError::new(kind, span, context).into());
            },
            Ordering::Less => {
                let kind = RuntimeErrorKind::TooFewArguments { count: data.params.len() - arguments.len(),
                                                               name:  data.name, };
                return Err(RuntimeError::new(kind, span, context).into());
            },
            Ordering::Equal => {},
        }

        let frame = Context::with_table(data.name.as_str(),
                                        Table::with_parent(data.home.table()),
                                        Some(&data.home),
                                        span);
        for (param, argument) in data.params.iter().zip(arguments) {
            frame.define(param.as_str(), Value::new(argument.kind, &argument.span, &frame));
        }

        let result = match self.eval(&data.body, &frame) {
            Ok(outcome) if data.auto_return => outcome.value,
            Ok(_) => Value::null(span, context),
            Err(Signal::Return(value)) => value,
            Err(signal) => return Err(signal),
        };

        Ok(Outcome::new(result.at(span, context), context))
    }
}
