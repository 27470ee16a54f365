use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    ast::{Encapsulation, Node},
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator, Outcome},
            utils::builtins_table,
        },
        scope::{Context, Table},
        value::{EncapObject, Value, ValueKind},
    },
    span::Span,
};

impl Evaluator {
    /// Evaluates an `encap` or `sencap` literal.
    ///
    /// The body block runs on top of `context`. With a parent object, the
    /// body instead runs on top of the parent's internal table, which is
    /// backlinked to `context` first (see [`Table::backlink`]). The body then
    /// sees inherited members before the surrounding scope, and `prev` inside
    /// it reaches them. The splice is shared with the parent object and
    /// everything else holding its tables.
    ///
    /// Afterwards, every binding made in the frames between the body's final
    /// context and that base becomes a field of the object, the nearest
    /// binding winning. The object's scope binds the fields and chains to
    /// the body's final context.
    ///
    /// A `sencap` additionally cuts every link from the body's frames and
    /// from the splice point to the tables of `context`, replacing it with a
    /// table that only binds `true`, `false` and `null`. Functions defined
    /// inside can then only see the object, its ancestors and those three
    /// names. The walk doing this is bounded by
    /// [`EvaluatorConfig::max_nesting_depth`].
    ///
    /// [`EvaluatorConfig::max_nesting_depth`]: crate::interpreter::evaluator::core::EvaluatorConfig::max_nesting_depth
    ///
    /// # Errors
    /// - The parent is not an encap object.
    /// - The literal is evaluated inside the parent's own scope, where the
    ///   backlink would make its chain cyclic.
    /// - The `sencap` walk exceeds the nesting bound.
    /// - Anything raised by the parent expression or the body.
    pub(crate) fn eval_encapsulation(&self, encap: &Encapsulation, context: &Context) -> EvalResult {
        let parent = match &encap.parent {
            Some(node) => Some(self.eval_parent(node, &encap.span, context)?),
            None => None,
        };

        let (base, splice) = match &parent {
            Some(parent) => {
                let chain = parent.scope.table().clone();
                let splice = chain.backlink(context.table()).ok_or_else(|| {
                                 RuntimeError::new(RuntimeErrorKind::InheritanceCycle, &encap.span, context)
                             })?;
                (Context::with_table("<inherits>", chain, Some(context), &encap.span), Some(splice))
            },
            None => (context.clone(), None),
        };

        let body = self.eval(&encap.body, &base)?.context;
        let fields = self.collect_fields(encap, &body, &base, context)?;

        if encap.strict
           && let Some(splice) = &splice
           && splice.parent().is_some_and(|parent| parent.ptr_eq(context.table()))
        {
            splice.set_parent(Some(builtins_table(&encap.span, &base)));
        }

        let table = Table::with_parent(body.table());
        for (name, value) in &fields {
            table.set(name.as_str(), value.clone());
        }
        let label = encap.type_name.clone().unwrap_or_else(|| "<encap>".to_string());
        let scope = if encap.strict {
            body.detached(label, table, Some(&encap.span))
        } else {
            Context::with_table(label, table, Some(&body), &encap.span)
        };

        let mut types = parent.as_ref().map(|parent| parent.types.clone()).unwrap_or_default();
        types.extend(encap.type_name.iter().cloned());
        let inherited = parent.as_ref().map(|parent| parent.members()).unwrap_or_default();

        tracing::trace!(fields = fields.len(), strict = encap.strict, "built encap object");
        let object = EncapObject { fields,
                                   inherited,
                                   types,
                                   scope };
        let value = Value::new(ValueKind::Encap(Rc::new(object)), &encap.span, context);
        Ok(Outcome::new(value, context))
    }

    /// Evaluates the parent expression of an encap literal.
    fn eval_parent(&self, node: &Node, span: &Span, context: &Context) -> EvalResult<Rc<EncapObject>> {
        let parent = self.eval_value(node, context)?;
        match &parent.kind {
            ValueKind::Encap(object) => Ok(Rc::clone(object)),
            _ => Err(RuntimeError::new(RuntimeErrorKind::InheritFromNonEncap, span, context).into()),
        }
    }

    /// Walks from the body's final context up to `context`, gathering the
    /// bindings made inside `base` and, for a `sencap`, cutting the links
    /// into `context`.
    ///
    /// Fields keep the order in which they were bound; a name bound in more
    /// than one frame takes the value of the innermost one.
    fn collect_fields(&self,
                      encap: &Encapsulation,
                      body: &Context,
                      base: &Context,
                      context: &Context)
                      -> EvalResult<IndexMap<String, Value>> {
        let mut frames = Vec::new();
        let mut inside_base = true;
        let mut depth = 0;
        let mut current = Some(body.clone());

        while let Some(frame) = current
              && !frame.ptr_eq(context)
        {
            if frame.ptr_eq(base) {
                inside_base = false;
            }
            if inside_base {
                frames.push(frame.clone());
            }

            if encap.strict {
                depth += 1;
                if depth > self.config().max_nesting_depth {
                    return Err(RuntimeError::new(RuntimeErrorKind::NestingDepthExceeded,
                                                 &encap.span,
                                                 &frame).into());
                }
                if frame.table().parent().is_some_and(|parent| parent.ptr_eq(context.table())) {
                    frame.table().set_parent(Some(builtins_table(&encap.span, &frame)));
                }
            }

            current = frame.parent().cloned();
        }

        let mut fields = IndexMap::new();
        for frame in frames.iter().rev() {
            for (name, value) in frame.table().entries() {
                fields.insert(name, value);
            }
        }
        Ok(fields)
    }

    /// Evaluates `prev expr` in the parent of the current frame.
    ///
    /// # Errors
    /// Fails when the current frame has no parent.
    pub(crate) fn eval_prev(&self, expr: &Node, span: &Span, context: &Context) -> EvalResult {
        let parent = context.parent().ok_or_else(|| {
                                         RuntimeError::new(RuntimeErrorKind::NoParentContext,
                                                           span,
                                                           context)
                                     })?;
        let value = self.eval_value(expr, parent)?;

        Ok(Outcome::new(value.at(span, context), context))
    }
}
