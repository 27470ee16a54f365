use std::rc::Rc;

use crate::span::Span;

/// An abstract syntax tree (AST) node.
///
/// `Node` covers every construct of the language: literals, operators,
/// assignments, control flow, functions and encapsulation objects. Statements
/// and expressions share one type because almost every statement also yields
/// a value when evaluated. Each variant carries the span of the source text
/// it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A numeric literal.
    Number {
        /// The literal value.
        value: f64,
        /// Location in the source code.
        span:  Span,
    },
    /// A string literal, with escapes already resolved.
    String {
        /// The literal text.
        value: String,
        /// Location in the source code.
        span:  Span,
    },
    /// A list literal such as `[1, 2, x]`.
    List {
        /// The element expressions.
        elements: Vec<Node>,
        /// Location in the source code.
        span:     Span,
    },
    /// A binary operation like `a + b` or `obj => field`.
    BinaryOp {
        /// The left operand.
        left:  Box<Node>,
        /// The operator.
        op:    BinaryOperator,
        /// The right operand.
        right: Box<Node>,
        /// Location in the source code.
        span:  Span,
    },
    /// A unary operation like `-x` or `!x`.
    UnaryOp {
        /// The operator.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<Node>,
        /// Location in the source code.
        span:    Span,
    },
    /// Binding a name to the value of an expression.
    VarAssign {
        /// The bound name.
        name:      String,
        /// The expression producing the value.
        value:     Box<Node>,
        /// Whether this is one of the declarations making up a program.
        top_level: bool,
        /// Location in the source code.
        span:      Span,
    },
    /// Reading a variable.
    VarAccess {
        /// The name being read.
        name: String,
        /// Location in the source code.
        span: Span,
    },
    /// A sequence of statements run in a scope of their own.
    Block {
        /// The statements, in order.
        statements:  Vec<Node>,
        /// Whether hoisted function declarations settle in this block.
        may_declare: bool,
        /// Location in the source code.
        span:        Span,
    },
    /// A conditional, either a statement or a value producing expression.
    If {
        /// The condition.
        condition:      Box<Node>,
        /// Evaluated when the condition is truthy.
        then_branch:    Box<Node>,
        /// Evaluated when the condition is falsy, if present.
        else_branch:    Option<Box<Node>>,
        /// `true` for `a if c else b`; the statement form yields `false`.
        produces_value: bool,
        /// Location in the source code.
        span:           Span,
    },
    /// A function literal or a named function statement.
    FunctionDef(FunctionDef),
    /// A hoisted placeholder binding a name before its function is defined.
    FunctionDeclaration {
        /// The name of the function being declared.
        name:        String,
        /// The body the placeholder runs until it is initialized.
        placeholder: Rc<Node>,
        /// Location of the defining statement.
        span:        Span,
    },
    /// Calling a function.
    FunctionCall {
        /// The expression producing the function.
        callee:    Box<Node>,
        /// The argument expressions, evaluated left to right.
        arguments: Vec<Node>,
        /// Location in the source code.
        span:      Span,
    },
    /// `return` with an optional value.
    Return {
        /// The returned expression, if any.
        value: Option<Box<Node>>,
        /// Location in the source code.
        span:  Span,
    },
    /// `break`
    Break {
        /// Location in the source code.
        span: Span,
    },
    /// `continue`
    Continue {
        /// Location in the source code.
        span: Span,
    },
    /// A `while` loop.
    While {
        /// Checked before every iteration.
        condition: Box<Node>,
        /// The loop body.
        body:      Box<Node>,
        /// Location in the source code.
        span:      Span,
    },
    /// A `for` loop or list comprehension.
    For(ForLoop),
    /// An `encap` or `sencap` object literal.
    Encapsulation(Encapsulation),
    /// `prev expr`, evaluated in the parent context.
    Prev {
        /// The deferred expression.
        expr: Box<Node>,
        /// Location in the source code.
        span: Span,
    },
}

impl Node {
    /// Returns the span of the source text this node was parsed from.
    #[must_use]
    pub const fn span(&self) -> &Span {
        match self {
            Self::Number { span, .. }
            | Self::String { span, .. }
            | Self::List { span, .. }
            | Self::BinaryOp { span, .. }
            | Self::UnaryOp { span, .. }
            | Self::VarAssign { span, .. }
            | Self::VarAccess { span, .. }
            | Self::Block { span, .. }
            | Self::If { span, .. }
            | Self::FunctionDeclaration { span, .. }
            | Self::FunctionCall { span, .. }
            | Self::Return { span, .. }
            | Self::Break { span }
            | Self::Continue { span }
            | Self::While { span, .. }
            | Self::Prev { span, .. } => span,
            Self::FunctionDef(def) => &def.span,
            Self::For(for_loop) => &for_loop.span,
            Self::Encapsulation(encap) => &encap.span,
        }
    }
}

/// A function literal.
///
/// Bodies are reference counted so that every function value created from the
/// same definition shares one tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function; `None` for lambdas.
    pub name:        Option<String>,
    /// The parameter names.
    pub params:      Vec<String>,
    /// The body evaluated when the function is called.
    pub body:        Rc<Node>,
    /// Whether the value of the body is the result of a call.
    pub auto_return: bool,
    /// Location in the source code.
    pub span:        Span,
}

/// A `for` loop.
///
/// In comprehension form (`expr for x in list -> if cond`) the body is the
/// expression in front of `for` and the loop yields the list of its values.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    /// The loop variable name.
    pub variable:      String,
    /// The expression producing the list to iterate.
    pub source:        Box<Node>,
    /// The body evaluated once per element.
    pub body:          Box<Node>,
    /// Whether the loop collects its body values into a list.
    pub comprehension: bool,
    /// Iterations for which this evaluates falsy are skipped.
    pub filter:        Option<Box<Node>>,
    /// Location in the source code.
    pub span:          Span,
}

/// An encapsulation object literal: `encap { ... } as Name : parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Encapsulation {
    /// The body block whose bindings become the object's fields.
    pub body:      Box<Node>,
    /// The type name given with `as`.
    pub type_name: Option<String>,
    /// `true` for `sencap`, which is cut off from its lexical scope.
    pub strict:    bool,
    /// The expression producing the object to inherit from.
    pub parent:    Option<Box<Node>>,
    /// Location in the source code.
    pub span:      Span,
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons, logic and scope access.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division and indexing (`/`)
    Div,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`and`, `&`)
    And,
    /// Logical or (`or`, `|`)
    Or,
    /// Evaluating the right side inside an encap object (`=>`)
    ScopeAccess,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Identity (e.g. `+x`).
    Plus,
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::And => "and",
            Self::Or => "or",
            Self::ScopeAccess => "=>",
        };
        write!(f, "{operator}")
    }
}
