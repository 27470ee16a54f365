use crate::{
    ast::Node,
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{scope::Context, value::Value},
    span::Span,
};

/// Default bound on the number of frames walked while building a `sencap`.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 1000;

/// Result type used by the evaluator.
///
/// Evaluation either produces a value of type `T`, usually an [`Outcome`], or
/// a [`Signal`] that unwinds until something consumes it.
pub type EvalResult<T = Outcome> = Result<T, Signal>;

/// Non local control flow.
///
/// Signals travel up the `Err` side of [`EvalResult`], so `?` propagates
/// them past every node that does not handle them. Functions and programs
/// consume `Return`, loops consume `Break` and `Continue`, and the session
/// turns whatever reaches it into an error.
#[derive(Debug, Clone)]
pub enum Signal {
    /// `return`, carrying the returned value.
    Return(Value),
    /// `break`, with where it was written and the frame it ran in.
    Break {
        /// The `break` keyword.
        span:    Span,
        /// The frame that executed it.
        context: Context,
    },
    /// `continue`, with where it was written and the frame it ran in.
    Continue {
        /// The `continue` keyword.
        span:    Span,
        /// The frame that executed it.
        context: Context,
    },
    /// A runtime error.
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(error: RuntimeError) -> Self {
        Self::Error(error)
    }
}

impl Signal {
    /// Resolves a signal that escaped every handler.
    ///
    /// A stray `return` yields its value; `break` and `continue` outside of
    /// a loop become errors.
    ///
    /// # Errors
    /// Every signal except `return`.
    pub fn into_result(self) -> Result<Value, RuntimeError> {
        match self {
            Self::Return(value) => Ok(value),
            Self::Break { span, context } => {
                Err(RuntimeError::new(RuntimeErrorKind::OutsideLoop("break"), &span, &context))
            },
            Self::Continue { span, context } => {
                Err(RuntimeError::new(RuntimeErrorKind::OutsideLoop("continue"), &span, &context))
            },
            Self::Error(error) => Err(error),
        }
    }
}

/// The result of evaluating one node.
///
/// Besides the value, evaluation hands back the context execution continues
/// in. Most nodes return the context they were given; assignments and
/// function definitions may return a new child frame holding their binding,
/// and statements like `if` pass on the frame their branch ended in.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The produced value.
    pub value:   Value,
    /// The context following statements run in.
    pub context: Context,
}

impl Outcome {
    #[must_use]
    pub fn new(value: Value, context: &Context) -> Self {
        Self { value,
               context: context.clone() }
    }
}

/// Tunable limits of the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// How many frames building a `sencap` may walk before giving up.
    pub max_nesting_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self { max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH }
    }
}

/// Executes AST nodes.
///
/// The evaluator holds no program state of its own: every binding lives in
/// the [`Context`] passed to [`Evaluator::eval`] and in the frames chained
/// to it. A single evaluator can therefore serve any number of programs.
///
/// ## Usage
///
/// ```
/// use imperal::interpreter::{
///     declarator::declare_functions,
///     evaluator::core::Evaluator,
///     lexer::tokenize,
///     parser::core::parse_program,
///     scope::{Context, Table},
/// };
///
/// let tokens = tokenize("<doc>", "x = 1 + 2 * 3").unwrap();
/// let program = declare_functions(parse_program(&tokens).unwrap());
///
/// let global = Context::root("<module>", Table::new());
/// let outcome = Evaluator::default().eval_program(&program, &global).unwrap();
/// assert_eq!(outcome.value.to_string(), "7");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    #[must_use]
    pub const fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates a node in `context`.
    ///
    /// This is the main entry point for evaluation. It dispatches on the node
    /// variant: literals, variables, operators, assignments, blocks, control
    /// flow, functions, encapsulation objects and `prev`.
    ///
    /// # Parameters
    /// - `node`: The node to evaluate.
    /// - `context`: The frame the node runs in.
    ///
    /// # Returns
    /// The produced value together with the context execution continues in.
    ///
    /// # Errors
    /// Returns a [`Signal`] for `return`, `break` and `continue` as well as
    /// for runtime errors.
    pub fn eval(&self, node: &Node, context: &Context) -> EvalResult {
        match node {
            Node::Number { value, span } => {
                Ok(Outcome::new(Value::number(*value, span, context), context))
            },
            Node::String { value, span } => {
                Ok(Outcome::new(Value::string(value.as_str(), span, context), context))
            },
            Node::List { elements, span } => self.eval_list(elements, span, context),
            Node::BinaryOp { left,
                             op,
                             right,
                             span, } => self.eval_binary_op(left, *op, right, span, context),
            Node::UnaryOp { op, operand, span } => self.eval_unary_op(*op, operand, span, context),
            Node::VarAssign { name,
                              value,
                              top_level,
                              span, } => self.eval_assignment(name, value, *top_level, span, context),
            Node::VarAccess { name, span } => Self::eval_variable(name, span, context),
            Node::Block { statements, span, .. } => self.eval_block(statements, span, context),
            Node::If { condition,
                       then_branch,
                       else_branch,
                       produces_value,
                       span, } => self.eval_if(condition,
                                               then_branch,
                                               else_branch.as_deref(),
                                               *produces_value,
                                               span,
                                               context),
            Node::FunctionDef(def) => Ok(Self::eval_function_def(def, context)),
            Node::FunctionDeclaration { name,
                                        placeholder,
                                        span, } => {
                Ok(Self::eval_function_declaration(name, placeholder, span, context))
            },
            Node::FunctionCall { callee,
                                 arguments,
                                 span, } => self.eval_call(callee, arguments, span, context),
            Node::Return { value, span } => self.eval_return(value.as_deref(), span, context),
            Node::Break { span } => Err(Signal::Break { span:    span.clone(),
                                                        context: context.clone(), }),
            Node::Continue { span } => Err(Signal::Continue { span:    span.clone(),
                                                              context: context.clone(), }),
            Node::While { condition, body, .. } => self.eval_while(condition, body, context),
            Node::For(for_loop) => self.eval_for(for_loop, context),
            Node::Encapsulation(encap) => self.eval_encapsulation(encap, context),
            Node::Prev { expr, span } => self.eval_prev(expr, span, context),
        }
    }
}
