use std::{cell::RefCell, rc::Rc};

use crate::{
    environment::prelude::{Environment, Value},
    parser::prelude::parse_program
};

use super::eval;

fn run(input: &str) -> Value {
    let program = parse_program(input)
        .unwrap_or_else(|errors| panic!("`{input}` should parse: {errors:?}"));
    let env = Rc::new(RefCell::new(Environment::new()));

    eval(&program, env)
}

fn assert_error(input: &str, expected: &str) {
    match run(input) {
        Value::Error(message) => assert_eq!(
            message, expected,
            "Error message does not match for `{input}`"
        ),
        other => panic!("expected error for `{input}`, got {other:?}")
    }
}

#[test]
fn test_integer_expressions() {
    let cases = [
        ("5", 5),
        ("10", 10),
        ("-5", -5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("5 * 2 + 10", 20),
        ("5 + 2 * 10", 25),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("2 * (5 + 10)", 30),
        ("3 * 3 * 3 + 10", 37),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ("7 / 2", 3),
        ("-7 / 2", -3),
        ("2 ** 10", 1024),
        ("2 ** 0", 1),
        ("2 ** 3 ** 2", 64),
    ];

    for (input, expected) in cases {
        assert_eq!(
            run(input), Value::Integer(expected),
            "Result does not match for `{input}`"
        );
    }
}

#[test]
fn test_boolean_expressions() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 > 1", false),
        ("1 <= 1", true),
        ("1 >= 2", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("(1 < 2) == true", true),
        ("(1 > 2) == true", false),
        ("\"a\" == \"a\"", true),
        ("\"a\" != \"b\"", true),
    ];

    for (input, expected) in cases {
        assert_eq!(
            run(input), Value::Boolean(expected),
            "Result does not match for `{input}`"
        );
    }
}

#[test]
fn test_bang_operator() {
    let cases = [
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!!true", true),
        ("!!false", false),
        ("!!5", true),
        // Integer zero is truthy; only `false` and `null` are falsy.
        ("!0", false),
        ("!if (false) { 1 }", true),
    ];

    for (input, expected) in cases {
        assert_eq!(
            run(input), Value::Boolean(expected),
            "Result does not match for `{input}`"
        );
    }
}

#[test]
fn test_if_else_expressions() {
    let cases = [
        ("if (true) { 10 }", Some(10)),
        ("if (false) { 10 }", None),
        ("if (1) { 10 }", Some(10)),
        ("if (0) { 10 }", Some(10)),
        ("if (1 < 2) { 10 }", Some(10)),
        ("if (1 > 2) { 10 }", None),
        ("if (1 > 2) { 10 } else { 20 }", Some(20)),
        ("if (1 < 2) { 10 } else { 20 }", Some(10)),
    ];

    for (input, expected) in cases {
        let expected = match expected {
            Some(value) => Value::Integer(value),
            None => Value::Null
        };

        assert_eq!(
            run(input), expected,
            "Result does not match for `{input}`"
        );
    }
}

#[test]
fn test_return_statements() {
    let cases = [
        ("return 10;", 10),
        ("return 10; 9;", 10),
        ("return 2 * 5; 9;", 10),
        ("9; return 2 * 5; 9;", 10),
        ("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", 10),
    ];

    for (input, expected) in cases {
        assert_eq!(
            run(input), Value::Integer(expected),
            "Result does not match for `{input}`"
        );
    }
}

#[test]
fn test_let_statements() {
    let cases = [
        ("let a = 5; a;", 5),
        ("let a = 5 * 5; a;", 25),
        ("let a = 5; let b = a; b;", 5),
        ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
    ];

    for (input, expected) in cases {
        assert_eq!(
            run(input), Value::Integer(expected),
            "Result does not match for `{input}`"
        );
    }
}

#[test]
fn test_function_application() {
    let cases = [
        ("let identity = fn(x) { x; }; identity(5);", 5),
        ("let identity = fn(x) { return x; }; identity(5);", 5),
        ("let double = fn(x) { x * 2; }; double(5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("fn(x) { x + 1; }(5);", 6),
    ];

    for (input, expected) in cases {
        assert_eq!(
            run(input), Value::Integer(expected),
            "Result does not match for `{input}`"
        );
    }
}

#[test]
fn test_closures() {
    let input = r#"
        let newAdder = fn(x) { fn(y) { x + y }; };
        let addTwo = newAdder(2);
        addTwo(3);
    "#;

    assert_eq!(run(input), Value::Integer(5));
}

// Captured environments are shared, not copied: a closure sees bindings
// created in its defining scope after the closure itself.
#[test]
fn test_closure_observes_later_bindings() {
    let input = r#"
        let f = fn() { x };
        let x = 10;
        f();
    "#;

    assert_eq!(run(input), Value::Integer(10));
}

#[test]
fn test_function_inspect() {
    assert_eq!(run("fn(x) { x + 2; }").to_string(), "fn(x) { (x + 2) }");
}

#[test]
fn test_string_expressions() {
    assert_eq!(
        run("\"Hello\" + \" \" + \"World!\""),
        Value::String("Hello World!".to_string())
    );
    assert_eq!(run("let s = \"abc\"; s;"), Value::String("abc".to_string()));
}

#[test]
fn test_error_handling() {
    let cases = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
        (
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
            "unknown operator: BOOLEAN + BOOLEAN"
        ),
        ("foobar", "identifier not found: foobar"),
        ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
        ("5 / 0", "division by zero: 5 / 0"),
        ("[1, 2] == [1, 2]", "unknown operator: ARRAY == ARRAY"),
        ("10(5)", "not a function: INTEGER"),
        ("\"str\"[0]", "index operator not supported: STRING"),
        ("2 ** -1", "exponent out of range: -1"),
    ];

    for (input, expected) in cases {
        assert_error(input, expected);
    }
}

// Positional binding never runs past either list, it is an error instead.
#[test]
fn test_arity_mismatch() {
    assert_error("fn(x) { x }(1, 2)", "wrong number of arguments: got 2, want 1");
    assert_error("fn(x, y) { x + y }()", "wrong number of arguments: got 0, want 2");
}

#[test]
fn test_array_literals() {
    let expected = Value::Array(Rc::new(RefCell::new(vec![
        Value::Integer(1),
        Value::Integer(4),
        Value::Integer(6),
    ])));

    assert_eq!(run("[1, 2 * 2, 3 + 3]"), expected);
}

#[test]
fn test_index_expressions() {
    let cases = [
        ("[1, 2, 3][0]", Some(1)),
        ("[1, 2, 3][1]", Some(2)),
        ("[1, 2, 3][2]", Some(3)),
        ("let i = 0; [1][i];", Some(1)),
        ("[1, 2, 3][1 + 1];", Some(3)),
        ("let myArray = [1, 2, 3]; myArray[2];", Some(3)),
        ("let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];", Some(6)),
        ("[1, 2, 3][3]", None),
        ("[1, 2, 3][-1]", None),
    ];

    for (input, expected) in cases {
        let expected = match expected {
            Some(value) => Value::Integer(value),
            None => Value::Null
        };

        assert_eq!(
            run(input), expected,
            "Result does not match for `{input}`"
        );
    }
}

#[test]
fn test_builtin_len() {
    let cases = [
        ("len(\"\")", 0),
        ("len(\"four\")", 4),
        ("len(\"hello world\")", 11),
        ("len([1, 2, 3])", 3),
        ("len([])", 0),
    ];

    for (input, expected) in cases {
        assert_eq!(
            run(input), Value::Integer(expected),
            "Result does not match for `{input}`"
        );
    }

    assert_error("len(1)", "len: type not supported, got INTEGER");
    assert_error("len(\"one\", \"two\")", "len: wrong number of arguments: got 2, want 1");
}

#[test]
fn test_builtin_append() {
    let cases = [
        ("let a = [1]; append(a, 2, 3); len(a)", 3),
        ("append([], 1)[0]", 1),
        // Aliasing: the appended elements are visible through every
        // binding that holds the same array.
        ("let a = [1]; let b = a; append(a, 2); b[1]", 2),
        ("let a = [1]; let b = append(a, 2); a[1] + b[1]", 4),
    ];

    for (input, expected) in cases {
        assert_eq!(
            run(input), Value::Integer(expected),
            "Result does not match for `{input}`"
        );
    }

    assert_error("append()", "append: no arguments provided");
    assert_error("append(1, 2)", "append: first argument must be an array");
}

#[test]
fn test_builtins_resolve_after_environment() {
    // A `let` binding shadows a builtin without removing it elsewhere.
    assert_eq!(run("let len = 5; len"), Value::Integer(5));
}

// The REPL reuses one global environment for every line.
#[test]
fn test_environment_persists_across_programs() {
    let env = Rc::new(RefCell::new(Environment::new()));

    let program = parse_program("let x = 5;").expect("program should parse");
    eval(&program, env.clone());

    let program = parse_program("let double = fn(n) { n * 2 };").expect("program should parse");
    eval(&program, env.clone());

    let program = parse_program("double(x);").expect("program should parse");
    assert_eq!(eval(&program, env), Value::Integer(10));
}

#[test]
fn test_error_halts_statement_sequence() {
    let env = Rc::new(RefCell::new(Environment::new()));

    let program = parse_program("5 + true; let x = 1;").expect("program should parse");
    let value = eval(&program, env.clone());

    assert!(value.is_error());
    // The `let` after the failing statement never ran.
    assert_eq!(env.borrow().get("x"), None);
}

#[test]
fn test_inspect_forms() {
    let cases = [
        ("5", "5"),
        ("true", "true"),
        ("\"hi\"", "hi"),
        ("[1, \"two\", [3]]", "[1, two, [3]]"),
        ("if (false) { 1 }", "null"),
        ("5 + true;", "error: type mismatch: INTEGER + BOOLEAN"),
        ("len", "builtin function `len`"),
    ];

    for (input, expected) in cases {
        assert_eq!(
            run(input).to_string(), expected,
            "Inspect form does not match for `{input}`"
        );
    }
}
