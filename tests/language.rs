use std::fs;

use imperal::{Error, EvaluatorConfig, Interpreter};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_imperal_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = Interpreter::new().run("<book>", &code) {
                panic!("Imperal example {} in {:?} failed:\n{}\nError: {}",
                       i + 1,
                       path,
                       code,
                       e);
            }
        }
    }

    assert!(count > 0, "No Imperal examples found in book/src");
}

fn extract_imperal_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```imperal") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn run(src: &str) -> Result<String, Error> {
    Interpreter::new().run("<test>", src)
}

fn assert_output(src: &str, expected: &str) {
    match run(src) {
        Ok(output) => assert_eq!(output, expected, "unexpected result of:\n{src}"),
        Err(e) => panic!("Script failed:\n{src}\n{e}"),
    }
}

fn assert_failure(src: &str) -> String {
    match run(src) {
        Ok(output) => panic!("Script succeeded with '{output}' but was expected to fail:\n{src}"),
        Err(e) => e.to_string(),
    }
}

fn runtime_message(src: &str) -> String {
    let rendered = assert_failure(src);
    rendered.lines()
            .last()
            .and_then(|line| line.strip_prefix("Runtime Error: "))
            .unwrap_or_else(|| panic!("not a runtime error:\n{rendered}"))
            .to_string()
}

#[test]
fn operator_precedence() {
    assert_output("x = 1 + 2 * 3", "7");
    assert_output("x = (1 + 2) * 3", "9");
    assert_output("x = 1 < 2 and 3 > 2", "true");
    assert_output("x = 10 - 4 - 3", "3");
    assert_output("x = -2 * 3 + 1", "-5");
    assert_output("x = !(1 == 1) or 0", "false");
}

#[test]
fn numbers_render_in_their_shortest_form() {
    assert_output("x = 5 / 2", "2.5");
    assert_output("x = 2.0 * 3", "6");
    assert_output("x = 1e3", "1000");
}

#[test]
fn booleans_and_null_are_numbers() {
    assert_output("x = true + true", "2");
    assert_output("x = null + 1", "1");
    assert_output("x = true == 1", "true");
}

#[test]
fn empty_program_renders_nothing() {
    assert_output("", "");
    assert_output("\n\n// only a comment\n", "");
}

#[test]
fn the_last_declaration_is_the_result() {
    assert_output("a = 1\nb = a + 1; c = b * 10", "20");
}

#[test]
fn strings() {
    assert_output(r#"x = "ab" + "cd""#, "abcd");
    assert_output(r#"x = "ab" * 3"#, "ababab");
    assert_output(r#"x = "hello" - 2"#, "llo");
    assert_output(r#"x = "hello" / 1"#, "e");
    assert_output(r#"x = "hello" / -1"#, "o");
    assert_output(r#"x = "a" == "a""#, "true");
    assert_output(r#"x = "a\tb""#, "a\tb");
}

#[test]
fn list_indexing() {
    assert_output("xs = [1, 2, 3]\nx = xs / 0", "1");
    assert_output("xs = [1, 2, 3]\nx = xs / -1", "3");
    assert_eq!(runtime_message("xs = [1, 2, 3]\nx = xs / 3"),
               "List has 3 elements as [1, 2, 3] but 3 was retrieved");
    assert_eq!(runtime_message(r#"x = "abc" / 5"#),
               "String has 3 characters as abc but 5 was retrieved");
}

#[test]
fn list_operators() {
    assert_output("x = [1, 2] + 3", "[1, 2, 3]");
    assert_output("x = [1, 2, 3] - 1", "[1, 3]");
    assert_output("x = [1] * [2, 3]", "[1, 2, 3]");
    assert_output("x = []", "[]");
}

#[test]
fn list_equality() {
    assert_output("x = [1, 2] == [1, 2]", "true");
    assert_output("x = [1, 2] == [1, 2, 3]", "false");
    assert_output("x = [1, 2] != [2, 1]", "true");
    assert_output("x = [1, 2] == 3", "false");
}

#[test]
fn illegal_operations() {
    assert_eq!(runtime_message(r#"x = 1 + "a""#), "illegal operation");
    assert_eq!(runtime_message(r#"x = "a" * "b""#), "illegal operation");
    assert_eq!(runtime_message("x = 1: 2"), "illegal operation");
}

#[test]
fn division_by_zero() {
    assert_eq!(assert_failure("x = 5 / 0"),
               "Error Traceback, (Most recent call last):\n\
                File: <test>, line: 1 <module> main\n\
                Runtime Error: Division by zero");
}

#[test]
fn undefined_variables() {
    assert_eq!(runtime_message("x = y + 1"), "Undefined variable y");
}

#[test]
fn tracebacks_list_every_frame() {
    let rendered = assert_failure("f = fun: x -> x / 0\nr = f: 1");
    let lines = rendered.lines().collect::<Vec<_>>();

    assert_eq!(lines.first(), Some(&"Error Traceback, (Most recent call last):"));
    assert_eq!(lines.get(1), Some(&"File: <test>, line: 1 <module> main"));
    assert!(lines.contains(&"File: <test>, line: 2 f main"), "{rendered}");
    assert_eq!(lines.last(), Some(&"Runtime Error: Division by zero"));
}

#[test]
fn syntax_errors_name_the_line() {
    assert_eq!(assert_failure("x = 1\ny = 2 $"),
               "Illegal Character: '$', File <test> in line number 2");
    assert_eq!(assert_failure("x = 1\n\n1 + 2"),
               "Invalid Syntax: Expected an identifier, File <test> in line number 3");
    assert_eq!(assert_failure("x = (fun f -> 1)"),
               "Invalid Syntax: Lambda expressions are not named, File <test> in line number 1");
}

#[test]
fn top_level_names_cannot_be_reinitialized() {
    assert_eq!(runtime_message("x = 1\nx = 2"),
               "Cannot re-initialize the variable 'x'");
}

#[test]
fn nested_blocks_may_rebind() {
    assert_output("r = {\n    x = 1\n    x = 2\n    x\n}", "2");
}

#[test]
fn blocks_keep_their_bindings() {
    assert_eq!(runtime_message("r = {\n    a = 1\n}\ns = a"),
               "Undefined variable a");
}

#[test]
fn conditionals() {
    assert_output("x = 1 if 2 > 1 else 2", "1");
    assert_output("x = 1 if 0 else 2", "2");
    assert_output("x = \"yes\" if [1] else \"no\"", "yes");
    assert_output("x = \"yes\" if [] else \"no\"", "no");
    assert_output("x = if 1 > 2 { 3 }\nelse { 4 }", "false");
}

#[test]
fn functions() {
    assert_output("add = fun: a, b -> a + b\nx = add: 2, 5", "7");
    assert_output("square = fun: x => x * x\nx = square: 3", "9");
    assert_output("r = {\n    define seven = 3 + 4\n    seven!\n}", "7");
    assert_output("f = fun: x {\n    return x * 10\n}\nr = f: 2", "20");
    assert_output("f = fun: x {\n    x * 10\n}\nr = f: 2", "null");
    assert_output("f = fun\nr = f!", "null");
    assert_output("f = fun: x -> x\nr = f", "<f>");
    assert_output("r = [fun -> 1]", "[<anonymous>]");
}

#[test]
fn named_function_statements() {
    assert_output("r = {\n    fun double: x -> x * 2\n    double: 21\n}", "42");
}

#[test]
fn argument_counts_are_checked() {
    assert_eq!(runtime_message("f = fun: a, b -> a\nr = f: 1, 2, 3"),
               "1 too many args passed into 'f'");
    assert_eq!(runtime_message("f = fun: a, b, c -> a\nr = f: 1"),
               "2 too few args passed into 'f'");
}

#[test]
fn recursion() {
    assert_output("fact = fun: n -> 1 if n < 2 else n * (fact: n - 1)\nr = fact: 5",
                  "120");
}

#[test]
fn forward_references_resolve_at_call_time() {
    assert_output("r = {\n    f = fun: x -> (g: x) + 1\n    g = fun: x -> x * 2\n    f: 3\n}",
                  "7");
}

#[test]
fn mutual_recursion() {
    let src = "isEven = fun: n -> true if n == 0 else (isOdd: n - 1)\n\
               isOdd = fun: n -> false if n == 0 else (isEven: n - 1)\n\
               r = isEven: 10";
    assert_output(src, "true");
}

#[test]
fn closures_capture_their_scope() {
    assert_output("adder = fun: n -> fun: x -> x + n\nr = (adder: 2): 5", "7");
    assert_output("n = 3\nf = fun: x -> x + n\nr = f: 4", "7");
}

#[test]
fn assigned_functions_resolve_names_where_they_are_bound() {
    let src = "adder = fun: n -> fun: x -> x + n\n\
               addTwo = adder: 2\n\
               r = addTwo: 5";
    assert_eq!(runtime_message(src), "Undefined variable n");
}

#[test]
fn while_loops() {
    let src = "r = {\n    i = 0\n    total = 0\n    while i < 5 {\n        i = i + 1\n        total = total + i\n    }\n    total\n}";
    assert_output(src, "15");
}

#[test]
fn break_and_continue() {
    let src = "r = {\n    i = 0\n    while i < 10 {\n        if i == 4 break\n        i = i + 1\n    }\n    i\n}";
    assert_output(src, "4");

    let src = "r = {\n    i = 0\n    total = 0\n    while i < 5 {\n        i = i + 1\n        if i == 2 continue\n        total = total + i\n    }\n    total\n}";
    assert_output(src, "13");

    assert_output("r = x for x in [1, 2, 3, 4] -> if x != 3", "[1, 2, 4]");
}

#[test]
fn break_outside_of_a_loop_fails() {
    assert_eq!(runtime_message("r = {\n    break\n}"), "'break' used outside of a loop");
    assert_eq!(runtime_message("r = {\n    continue\n}"),
               "'continue' used outside of a loop");
}

#[test]
fn top_level_return_yields_its_value() {
    assert_output("r = {\n    return 5\n    6\n}", "5");
}

#[test]
fn comprehensions() {
    assert_output("xs = x * 2 for x in [1, 2, 3] -> if x > 1", "[4, 6]");
    assert_output("xs = x + 1 for x in []", "[]");
    assert_output("xs = (y * 10 for y in [1, 2]) for x in [0]", "[[10, 20]]");
}

#[test]
fn for_statements() {
    let src = "r = {\n    total = 0\n    for x in [1, 2, 3] {\n        total = total + x\n    }\n    total\n}";
    assert_output(src, "6");
    assert_eq!(runtime_message("r = {\n    for x in 5 x\n}"), "5 must be a list");
}

#[test]
fn encap_objects() {
    let src = "Point = encap {\n    x = 1\n    y = 2\n} as Point\nr = Point => x + Point => y";
    assert_output(src, "3");
    assert_output("p = encap {\n    x = 1\n}\nr = p", "<Anonymous Instance>");
    assert_output("p = encap {\n    x = 1\n} as Point\nr = p", "<Point Instance>");
    assert_output("p = encap {\n    x = 1\n}\nr = p / \"x\"", "1");
    assert_output("p = encap {\n    x = 1\n}\nr = p / \"y\"", "null");
}

#[test]
fn encap_methods_see_their_fields() {
    let src = "Counter = encap {\n    count = 3\n    double = fun -> count * 2\n} as Counter\nr = Counter => double!";
    assert_output(src, "6");
}

#[test]
fn encap_equality_and_merge() {
    assert_output("a = encap { x = 1 }\nb = encap { x = 1 }\nr = a == b", "true");
    assert_output("a = encap { x = 1 }\nb = encap { x = 2 }\nr = a == b", "false");
    assert_output("a = encap { x = 1 }\nb = encap { y = 2 }\nc = a + b\nr = c => x + c => y",
                  "3");
}

#[test]
fn scope_access_needs_an_object() {
    assert_eq!(runtime_message("x = 5\ny = x => z"), "illegal operation");
}

#[test]
fn inheritance_and_prev() {
    let src = "P = encap {\n    f = 1\n    h = 10\n} as Parent\n\
               C = encap {\n    f = 2\n    g = prev f\n} as Child: P\n\
               r = [C => f, C => g, C => h]";
    assert_output(src, "[2, 1, 10]");
}

#[test]
fn children_override_inherited_methods() {
    let src = "P = encap {\n    name = fun -> \"parent\"\n} as Parent\n\
               C = encap {\n    name = fun -> \"child\"\n} as Child: P\n\
               r = C => name!";
    assert_output(src, "child");
}

#[test]
fn inheritance_links_the_parent_into_the_child_scope() {
    let parent = "P = encap {\n    greet = fun -> name\n} as Parent\nname = \"late\"\n";
    assert_eq!(runtime_message(&format!("{parent}r = P => greet!")), "Undefined variable name");
    assert_output(&format!("{parent}C = encap {{ x = 1 }} as Child: P\nr = P => greet!"),
                  "late");
}

#[test]
fn inheriting_from_an_enclosing_encap_fails() {
    let src = "P = encap { x = 1 } as Parent\n\
               C = encap { y = 2 } as Child: P\n\
               r = P => (encap { z = 3 } as Inner: P)";
    assert_eq!(runtime_message(src),
               "Encaps cannot inherit from an Encap they are created inside of");
}

#[test]
fn sencap_children_are_cut_off_from_the_surrounding_scope() {
    let src = "secret = 42\n\
               P = encap { x = 1 } as Parent\n\
               S = sencap {\n    peek = fun -> secret\n} as Sealed: P\n";
    assert_eq!(runtime_message(&format!("{src}r = S => peek!")), "Undefined variable secret");
    assert_output(&format!("{src}r = S => x"), "1");
}

#[test]
fn inheriting_from_a_non_encap_fails() {
    assert_eq!(runtime_message("P = 5\nC = encap { x = 1 } as Child: P"),
               "Encaps can only inherit from other Encaps");
}

#[test]
fn prev_needs_a_parent_frame() {
    assert_eq!(runtime_message("x = prev 1"), "No parent context found");
}

#[test]
fn sencap_objects_are_isolated() {
    let src = "secret = 42\nS = sencap {\n    peek = fun -> secret\n} as Sealed\nr = S => peek!";
    assert_eq!(runtime_message(src), "Undefined variable secret");

    let src = "secret = 42\nE = encap {\n    peek = fun -> secret\n} as Open\nr = E => peek!";
    assert_output(src, "42");
}

#[test]
fn sencap_objects_keep_the_builtins() {
    let src = "S = sencap {\n    yes = fun -> true\n} as Sealed\nr = S => yes!";
    assert_output(src, "true");
}

#[test]
fn sencap_nesting_depth_is_configurable() {
    let src = "S = sencap {\n    a = 1\n    a = 2\n    a = 3\n}\nr = S => a";

    let mut shallow = Interpreter::with_config(EvaluatorConfig { max_nesting_depth: 1 });
    let rendered = shallow.run("<test>", src).unwrap_err().to_string();
    assert_eq!(rendered.lines().last(),
               Some("Runtime Error: Context nesting depth allowed inside Sencaps exceeded"));

    let mut deep = Interpreter::with_config(EvaluatorConfig { max_nesting_depth: 3 });
    assert_eq!(deep.run("<test>", src).unwrap(), "3");
}

#[test]
fn string_repetition_has_a_limit() {
    assert!(runtime_message("s = \"a\" * 1e15").starts_with("Repeating a string of 1 bytes"));
    assert_output("s = \"\" * 1e15", "");
}

#[test]
fn sessions_keep_their_bindings() {
    let mut session = Interpreter::new();
    assert_eq!(session.run("<stdin>", "x = 5").unwrap(), "5");
    assert_eq!(session.run("<stdin>", "y = x + 1").unwrap(), "6");
    assert!(session.run("<stdin>", "x = 7").is_err());
    assert_eq!(session.run("<stdin>", "z = x * y").unwrap(), "30");
}

#[test]
fn failed_runs_leave_the_session_intact() {
    let mut session = Interpreter::new();
    assert_eq!(session.run("<stdin>", "x = 5").unwrap(), "5");
    assert!(session.run("<stdin>", "y = x / 0").is_err());
    assert_eq!(session.run("<stdin>", "y = x - 1").unwrap(), "4");

    assert!(session.run("<stdin>", "a = 1\nb = 1 / 0").is_err());
    let rendered = session.run("<stdin>", "c = a").unwrap_err().to_string();
    assert_eq!(rendered.lines().last(), Some("Runtime Error: Undefined variable a"));
}

#[test]
fn top_level_return_keeps_earlier_bindings() {
    let mut session = Interpreter::new();
    assert_eq!(session.run("<stdin>", "x = 1\nr = {\n    return 2\n}\ny = 3").unwrap(), "2");
    assert_eq!(session.run("<stdin>", "z = x").unwrap(), "1");
    assert!(session.run("<stdin>", "z = y").is_err());
}

fn live_frames_after(src: &str) -> usize {
    let mut session = Interpreter::new();
    if let Err(e) = session.run("<test>", src) {
        panic!("Script failed:\n{src}\n{e}");
    }
    session.context().live_frames()
}

#[test]
fn finished_loops_release_their_frames() {
    let counting_to = |n: usize| {
        format!("r = {{\n    i = 0\n    while i < {n} {{\n        i = i + 1\n    }}\n    i\n}}")
    };
    assert_eq!(live_frames_after(&counting_to(10)), live_frames_after(&counting_to(1000)));
}

#[test]
fn finished_calls_release_their_frames() {
    let f = "f = fun: n {\n    define g = n\n    return g!\n}\n";
    assert_eq!(live_frames_after(&format!("{f}r = f: 1")),
               live_frames_after(&format!("{f}r = f: 1\ns = f: 2\nt = f: 3")));
}

#[test]
fn dropping_a_session_frees_its_frames() {
    let mut session = Interpreter::new();
    session.run("<test>", "f = fun: x -> f\nr = f: 1").unwrap();
    let frame = session.context().downgrade();

    drop(session);
    assert!(frame.upgrade().is_none());
}
