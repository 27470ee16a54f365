use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    ast::{FunctionDef, Node},
    interpreter::scope::Context,
};

/// The data making up a function.
#[derive(Clone)]
pub struct FunctionData {
    /// The name the function was defined with, `anonymous` for lambdas.
    pub name:        String,
    /// The parameter names.
    pub params:      Vec<String>,
    /// The body evaluated on every call.
    pub body:        Rc<Node>,
    /// The scope calls chain their bindings to.
    pub home:        Context,
    /// Whether the value of the body is the result of a call.
    pub auto_return: bool,
    /// `false` for hoisted placeholders whose definition has not run yet.
    pub initialized: bool,
}

/// A shared handle to a function.
///
/// Placeholders created by hoisted declarations are initialized in place once
/// the real definition runs, and every binding holding the same handle sees
/// the function become callable.
#[derive(Clone)]
pub struct Function(Rc<RefCell<FunctionData>>);

impl Function {
    /// Creates an initialized function from a definition.
    #[must_use]
    pub fn new(def: &FunctionDef, home: &Context) -> Self {
        let name = def.name.clone().unwrap_or_else(|| "anonymous".to_string());
        Self::from_data(FunctionData { name,
                                       params: def.params.clone(),
                                       body: Rc::clone(&def.body),
                                       home: home.clone(),
                                       auto_return: def.auto_return,
                                       initialized: true })
    }

    /// Creates an uninitialized placeholder returning the value of `body`.
    #[must_use]
    pub fn placeholder(name: &str, body: &Rc<Node>, home: &Context) -> Self {
        Self::from_data(FunctionData { name:        name.to_string(),
                                       params:      Vec::new(),
                                       body:        Rc::clone(body),
                                       home:        home.clone(),
                                       auto_return: true,
                                       initialized: false, })
    }

    fn from_data(data: FunctionData) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.0.borrow().initialized
    }

    /// The scope calls chain their bindings to.
    #[must_use]
    pub fn home(&self) -> Context {
        self.0.borrow().home.clone()
    }

    /// Returns a snapshot of the function's current data.
    #[must_use]
    pub fn data(&self) -> FunctionData {
        self.0.borrow().clone()
    }

    /// Turns this function into a copy of `other`, keeping its identity.
    ///
    /// The name is kept as well, so a placeholder keeps the name it was
    /// declared with.
    pub fn initialize_from(&self, other: &Self) {
        if self.ptr_eq(other) {
            return;
        }
        let source = other.data();
        let mut data = self.0.borrow_mut();
        data.params = source.params;
        data.body = source.body;
        data.home = source.home;
        data.auto_return = source.auto_return;
        data.initialized = true;
    }

    /// Returns a new function with the same definition and another home.
    #[must_use]
    pub fn with_home(&self, home: &Context) -> Self {
        let mut data = self.data();
        data.home = home.clone();
        Self::from_data(data)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Function")
         .field("name", &data.name)
         .field("params", &data.params)
         .field("home", &data.home)
         .field("initialized", &data.initialized)
         .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{
        interpreter::scope::Table,
        span::{Position, Span},
    };

    fn span() -> Span {
        Span::new(Rc::from("<test>"), Position::default(), Position::default())
    }

    fn null_body() -> Rc<Node> {
        Rc::new(Node::VarAccess { name: "null".to_string(),
                                  span: span(), })
    }

    #[test]
    fn initializing_a_placeholder_is_seen_through_every_handle() {
        let home = Context::root("<module>", Table::new());
        let placeholder = Function::placeholder("f", &null_body(), &home);
        let held_elsewhere = placeholder.clone();
        let def = FunctionDef { name:        Some("f".to_string()),
                                params:      vec!["x".to_string()],
                                body:        null_body(),
                                auto_return: true,
                                span:        span(), };

        placeholder.initialize_from(&Function::new(&def, &home));

        assert!(held_elsewhere.is_initialized());
        assert_eq!(held_elsewhere.data().params, ["x"]);
    }

    #[test]
    fn rehoming_copies_the_function() {
        let home = Context::root("<module>", Table::new());
        let other = home.child("<block>", &span());
        let function = Function::placeholder("f", &null_body(), &home);
        let moved = function.with_home(&other);

        assert!(!moved.ptr_eq(&function));
        assert!(moved.data().home.ptr_eq(&other));
        assert!(function.data().home.ptr_eq(&home));
    }
}
