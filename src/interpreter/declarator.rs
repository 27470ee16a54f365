use std::rc::Rc;

use crate::{
    ast::{FunctionDef, Node},
    span::Span,
};

/// Hoists function declarations to the top of their blocks.
///
/// Every statement that defines a named function (`define`, `fun name ...`
/// or `name = fun ...`) gets a [`Node::FunctionDeclaration`] placed at the
/// start of the nearest enclosing block that may declare. When the block
/// runs, those declarations bind each name to an uninitialized function
/// before any other statement executes, so functions in the same block can
/// call each other whatever their order.
///
/// Blocks belonging to `if`, `while` and `for` statements may not declare;
/// their declarations move on to the enclosing block. Declarations never
/// leave a function body.
///
/// # Parameters
/// - `program`: The parsed program.
///
/// # Returns
/// The rewritten program.
#[must_use]
pub fn declare_functions(program: Node) -> Node {
    let (program, stray) = hoist(program);
    debug_assert!(stray.is_empty(), "programs always absorb their declarations");
    program
}

/// Rewrites `node`, returning it with the declarations it did not absorb.
fn hoist(node: Node) -> (Node, Vec<Node>) {
    match node {
        Node::VarAssign { name,
                          value,
                          top_level,
                          span, } => {
            let (value, declarations) = match *value {
                Node::FunctionDef(def) => {
                    (Node::FunctionDef(hoist_function_body(def)), vec![declaration(&name, &span)])
                },
                other => hoist(other),
            };
            (Node::VarAssign { name,
                               value: Box::new(value),
                               top_level,
                               span },
             declarations)
        },
        Node::FunctionDef(def) => {
            let declarations = def.name
                                  .as_ref()
                                  .map(|name| vec![declaration(name, &def.span)])
                                  .unwrap_or_default();
            (Node::FunctionDef(hoist_function_body(def)), declarations)
        },
        Node::Block { statements,
                      may_declare,
                      span, } => {
            let mut declarations = Vec::new();
            let mut rewritten = Vec::with_capacity(statements.len());
            for statement in statements {
                let (statement, found) = hoist(statement);
                declarations.extend(found);
                rewritten.push(statement);
            }

            if may_declare {
                declarations.extend(rewritten);
                (Node::Block { statements: declarations,
                               may_declare,
                               span },
                 Vec::new())
            } else {
                (Node::Block { statements: rewritten,
                               may_declare,
                               span },
                 declarations)
            }
        },
        Node::If { condition,
                   then_branch,
                   else_branch,
                   produces_value,
                   span, } => {
            let (then_branch, mut declarations) = hoist(*then_branch);
            let else_branch = else_branch.map(|branch| {
                                             let (branch, found) = hoist(*branch);
                                             declarations.extend(found);
                                             Box::new(branch)
                                         });
            (Node::If { condition,
                        then_branch: Box::new(then_branch),
                        else_branch,
                        produces_value,
                        span },
             declarations)
        },
        Node::While { condition, body, span } => {
            let (body, declarations) = hoist(*body);
            (Node::While { condition,
                           body: Box::new(body),
                           span },
             declarations)
        },
        Node::For(mut for_loop) => {
            let (body, declarations) = hoist(*for_loop.body);
            for_loop.body = Box::new(body);
            (Node::For(for_loop), declarations)
        },
        Node::Encapsulation(mut encap) => {
            let (body, declarations) = hoist(*encap.body);
            encap.body = Box::new(body);
            (Node::Encapsulation(encap), declarations)
        },
        Node::Prev { expr, span } => {
            let (expr, declarations) = hoist(*expr);
            (Node::Prev { expr: Box::new(expr),
                          span },
             declarations)
        },
        other => (other, Vec::new()),
    }
}

/// Rewrites a function body; whatever it does not absorb is dropped.
fn hoist_function_body(mut def: FunctionDef) -> FunctionDef {
    let body = Rc::try_unwrap(def.body).unwrap_or_else(|shared| (*shared).clone());
    let (body, _) = hoist(body);
    def.body = Rc::new(body);
    def
}

/// Builds the placeholder declaration for the function `name`.
fn declaration(name: &str, span: &Span) -> Node {
    Node::FunctionDeclaration { name:        name.to_string(),
                                placeholder: Rc::new(Node::VarAccess { name: "null".to_string(),
                                                                       span: span.clone(), }),
                                span:        span.clone(), }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::parse_program};

    fn hoisted(text: &str) -> Node {
        declare_functions(parse_program(&tokenize("<test>", text).unwrap()).unwrap())
    }

    fn statements(block: &Node) -> &[Node] {
        let Node::Block { statements, .. } = block else {
            panic!("expected a block");
        };
        statements
    }

    fn assigned_value(statement: &Node) -> &Node {
        let Node::VarAssign { value, .. } = statement else {
            panic!("expected an assignment");
        };
        value
    }

    fn summary(block: &Node) -> Vec<String> {
        statements(block).iter()
                         .map(|statement| match statement {
                             Node::FunctionDeclaration { name, .. } => format!("declare {name}"),
                             Node::VarAssign { name, .. } => format!("assign {name}"),
                             Node::FunctionDef(def) => {
                                 format!("define {}", def.name.as_deref().unwrap_or_default())
                             },
                             Node::If { .. } => "if".to_string(),
                             _ => "other".to_string(),
                         })
                         .collect()
    }

    #[test]
    fn top_level_functions_are_declared_first() {
        let program = hoisted("a = 1\nf = fun: x -> g: x\ng = fun: x -> x");
        assert_eq!(summary(&program),
                   ["declare f", "declare g", "assign a", "assign f", "assign g"]);
    }

    #[test]
    fn if_bodies_pass_declarations_to_their_block() {
        let program = hoisted("main = {\n  x = 1\n  if x { define y = 2 }\n}");
        let main = assigned_value(&statements(&program)[0]);
        assert_eq!(summary(main), ["declare y", "assign x", "if"]);
    }

    #[test]
    fn function_bodies_keep_their_declarations() {
        let program = hoisted("f = fun: x {\n  fun inner: y -> y\n  inner: x\n}");
        assert_eq!(summary(&program), ["declare f", "assign f"]);

        let Node::FunctionDef(def) = assigned_value(&statements(&program)[1]) else {
            panic!("expected a function literal");
        };
        assert_eq!(summary(&def.body), ["declare inner", "define inner", "other"]);
    }

    #[test]
    fn lambdas_are_not_declared() {
        let program = hoisted("xs = [fun: x -> x]");
        assert_eq!(summary(&program), ["assign xs"]);
    }
}
