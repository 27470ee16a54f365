use std::{fmt, rc::Rc};

use crate::{
    interpreter::{
        scope::{Context, WeakContext},
        value::{encap::EncapObject, function::Function},
    },
    span::Span,
};

/// Represents a runtime value in the interpreter.
///
/// Every value carries the span of the code that produced it and the context
/// it was produced in. Operations use them to report errors; the evaluator
/// re-stamps results with the span and context of the node being evaluated.
///
/// The context is held weakly, since values are stored in the tables of the
/// very frames they name.
#[derive(Debug, Clone)]
pub struct Value {
    /// What the value is.
    pub kind:    ValueKind,
    /// The code that produced the value.
    pub span:    Span,
    context:     WeakContext,
}

/// The variants a [`Value`] can take.
///
/// `Bool` and `Null` behave as numbers (`1`/`0` and `0`) for every operator
/// that accepts numbers.
#[derive(Debug, Clone)]
pub enum ValueKind {
    /// A double precision number.
    Number(f64),
    /// `true` or `false`.
    Bool(bool),
    /// `null`, a number fixed at zero.
    Null,
    /// An immutable string.
    String(Rc<str>),
    /// An immutable list.
    List(List),
    /// A function, possibly still uninitialized.
    Function(Function),
    /// An object created by `encap` or `sencap`.
    Encap(Rc<EncapObject>),
    /// The absence of a value; never visible in the language itself.
    Empty,
}

/// The payload of a list value.
///
/// The elements are shared between copies. `scope` is the context the list
/// was created in or last bound into; function elements are homed there.
#[derive(Debug, Clone)]
pub struct List {
    /// The elements, in order.
    pub elements: Rc<Vec<Value>>,
    scope:        WeakContext,
}

impl List {
    #[must_use]
    pub fn new(elements: Vec<Value>, scope: &Context) -> Self {
        Self { elements: Rc::new(elements),
               scope:    scope.downgrade(), }
    }

    /// Creates a list owned by the same scope as this one.
    #[must_use]
    pub fn sibling(&self, elements: Vec<Value>) -> Self {
        Self { elements: Rc::new(elements),
               scope:    self.scope.clone(), }
    }

    /// The scope owning the list, unless it has been freed.
    #[must_use]
    pub fn scope(&self) -> Option<Context> {
        self.scope.upgrade()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Value {
    #[must_use]
    pub fn new(kind: ValueKind, span: &Span, context: &Context) -> Self {
        Self { kind,
               span: span.clone(),
               context: context.downgrade() }
    }

    #[must_use]
    pub fn number(value: f64, span: &Span, context: &Context) -> Self {
        Self::new(ValueKind::Number(value), span, context)
    }

    #[must_use]
    pub fn boolean(value: bool, span: &Span, context: &Context) -> Self {
        Self::new(ValueKind::Bool(value), span, context)
    }

    #[must_use]
    pub fn null(span: &Span, context: &Context) -> Self {
        Self::new(ValueKind::Null, span, context)
    }

    #[must_use]
    pub fn string(value: impl Into<Rc<str>>, span: &Span, context: &Context) -> Self {
        Self::new(ValueKind::String(value.into()), span, context)
    }

    /// Creates a list owned by `context`.
    #[must_use]
    pub fn list(elements: Vec<Self>, span: &Span, context: &Context) -> Self {
        Self::new(ValueKind::List(List::new(elements, context)), span, context)
    }

    #[must_use]
    pub fn empty(span: &Span, context: &Context) -> Self {
        Self::new(ValueKind::Empty, span, context)
    }

    /// Creates a value of `kind` carrying this value's span and context.
    #[must_use]
    pub fn derive(&self, kind: ValueKind) -> Self {
        Self { kind,
               span: self.span.clone(),
               context: self.context.clone() }
    }

    /// Returns a copy stamped with another span and context.
    #[must_use]
    pub fn at(&self, span: &Span, context: &Context) -> Self {
        Self::new(self.kind.clone(), span, context)
    }

    /// The context the value was produced in, unless it has been freed.
    #[must_use]
    pub fn context(&self) -> Option<Context> {
        self.context.upgrade()
    }

    /// Returns the value, re-owned by `context` if its own context is gone.
    ///
    /// Values coming out of a finished block or call may name a frame that
    /// nothing holds anymore.
    #[must_use]
    pub fn anchored(self, context: &Context) -> Self {
        if self.context().is_some() { self } else { self.at(&self.span, context) }
    }

    /// Returns the numeric value of numbers, booleans and `null`.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Number(value) => Some(value),
            ValueKind::Bool(value) => Some(if value { 1.0 } else { 0.0 }),
            ValueKind::Null => Some(0.0),
            _ => None,
        }
    }

    /// Returns the function held by this value, if any.
    #[must_use]
    pub const fn as_function(&self) -> Option<&Function> {
        match &self.kind {
            ValueKind::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Decides how the value behaves as a condition.
    ///
    /// Numbers are truthy unless zero, strings, lists and objects unless
    /// empty. Functions are never truthy.
    #[must_use]
    pub fn is_true(&self) -> bool {
        match &self.kind {
            ValueKind::String(value) => !value.is_empty(),
            ValueKind::List(list) => !list.is_empty(),
            ValueKind::Encap(object) => !object.members().is_empty(),
            ValueKind::Function(_) | ValueKind::Empty => false,
            ValueKind::Number(_) | ValueKind::Bool(_) | ValueKind::Null => {
                self.as_number().is_some_and(|value| value != 0.0)
            },
        }
    }

    /// Returns the value as it should be stored when bound in `scope`.
    ///
    /// Initialized functions are copied with `scope` as their home, and
    /// lists are rebuilt with their function elements re-homed. Uninitialized
    /// functions keep their identity so that initializing them later is seen
    /// through every binding.
    #[must_use]
    pub fn rehome(&self, scope: &Context) -> Self {
        match &self.kind {
            ValueKind::Function(function) if function.is_initialized() => {
                self.derive(ValueKind::Function(function.with_home(scope)))
            },
            ValueKind::List(list) => {
                let elements = list.elements.iter().map(|element| element.rehome(scope)).collect();
                self.derive(ValueKind::List(List::new(elements, scope)))
            },
            _ => self.clone(),
        }
    }

    /// Pushes the frames and values this value keeps alive.
    pub(crate) fn trace(&self, frames: &mut Vec<Context>, values: &mut Vec<Self>) {
        match &self.kind {
            ValueKind::List(list) => values.extend(list.elements.iter().cloned()),
            ValueKind::Function(function) => frames.push(function.home()),
            ValueKind::Encap(object) => {
                frames.push(object.scope.clone());
                values.extend(object.fields.values().cloned());
                values.extend(object.inherited.values().cloned());
            },
            ValueKind::Number(_)
            | ValueKind::Bool(_)
            | ValueKind::Null
            | ValueKind::String(_)
            | ValueKind::Empty => {},
        }
    }
}

/// Renders values the way the interpreter prints results.
///
/// Numbers use the shortest representation (`7`, `2.5`), strings are
/// printed without quotes and lists as `[a, b]`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Number(value) => write!(f, "{value}"),
            ValueKind::Bool(value) => write!(f, "{value}"),
            ValueKind::Null => write!(f, "null"),
            ValueKind::String(value) => write!(f, "{value}"),
            ValueKind::List(list) => {
                write!(f, "[")?;
                for (i, element) in list.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            },
            ValueKind::Function(function) => write!(f, "<{}>", function.name()),
            ValueKind::Encap(object) => match object.type_name() {
                Some(name) => write!(f, "<{name} Instance>"),
                None => write!(f, "<Anonymous Instance>"),
            },
            ValueKind::Empty => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{interpreter::scope::Table, span::Position};

    fn span() -> Span {
        Span::new(Rc::from("<test>"), Position::default(), Position::default())
    }

    #[test]
    fn numbers_render_without_trailing_zeroes() {
        let context = Context::root("<module>", Table::new());
        assert_eq!(Value::number(7.0, &span(), &context).to_string(), "7");
        assert_eq!(Value::number(2.5, &span(), &context).to_string(), "2.5");
        assert_eq!(Value::number(-3.0, &span(), &context).to_string(), "-3");
    }

    #[test]
    fn lists_render_their_elements() {
        let context = Context::root("<module>", Table::new());
        let list = Value::list(vec![Value::number(1.0, &span(), &context),
                                    Value::string("a", &span(), &context),
                                    Value::null(&span(), &context)],
                               &span(),
                               &context);
        assert_eq!(list.to_string(), "[1, a, null]");
    }

    #[test]
    fn truthiness() {
        let context = Context::root("<module>", Table::new());
        assert!(Value::boolean(true, &span(), &context).is_true());
        assert!(!Value::null(&span(), &context).is_true());
        assert!(!Value::number(0.0, &span(), &context).is_true());
        assert!(!Value::string("", &span(), &context).is_true());
        assert!(Value::list(vec![Value::null(&span(), &context)], &span(), &context).is_true());
    }

    #[test]
    fn booleans_and_null_are_numbers() {
        let context = Context::root("<module>", Table::new());
        assert_eq!(Value::boolean(true, &span(), &context).as_number(), Some(1.0));
        assert_eq!(Value::null(&span(), &context).as_number(), Some(0.0));
        assert_eq!(Value::string("1", &span(), &context).as_number(), None);
    }
}
