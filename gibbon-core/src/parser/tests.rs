use crate::parser::prelude::{
    parse_program, Expression, ParseErrorType, Statement
};

fn assert_canonical(input: &str, expected: &str) {
    let program = parse_program(input)
        .unwrap_or_else(|errors| panic!("`{input}` should parse: {errors:?}"));

    assert_eq!(
        program.to_string(), expected,
        "Canonical form does not match for `{input}`"
    );
}

#[test]
fn test_operator_precedence() {
    let cases = [
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a + b - c", "((a + b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b / c", "(a + (b / c))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
        ("3 <= 4 == true", "((3 <= 4) == true)"),
        ("5 >= 4 != false", "((5 >= 4) != false)"),
        ("2 ** 3 * 4", "((2 ** 3) * 4)"),
        ("3 > 5 == false", "((3 > 5) == false)"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("2 / (5 + 5)", "(2 / (5 + 5))"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("!(true == true)", "(!(true == true))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))"
        ),
        ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
        ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
        (
            "add(a * b[2], b[1], 2 * [1, 2][1])",
            "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))"
        ),
    ];

    for (input, expected) in cases {
        assert_canonical(input, expected);
    }
}

#[test]
fn test_let_statements() {
    let program = parse_program("let x = 5; let y = 10; let foobar = 838383;")
        .expect("program should parse");

    let names = ["x", "y", "foobar"];

    assert_eq!(program.statements.len(), 3);

    for (statement, name) in program.statements.iter().zip(names) {
        match statement {
            Statement::Let(let_) => assert_eq!(let_.name.value, name),
            other => panic!("expected let statement, got {other:?}")
        }
    }

    assert_canonical(
        "let x = 5; let y = x + 1;",
        "let x = 5; let y = (x + 1)"
    );
}

#[test]
fn test_return_statements() {
    let program = parse_program("return 5; return 10; return 2 * 3;")
        .expect("program should parse");

    assert_eq!(program.statements.len(), 3);

    for statement in &program.statements {
        assert!(matches!(statement, Statement::Return(_)));
    }

    assert_canonical("return 2 * 3", "return (2 * 3)");
}

#[test]
fn test_if_expressions() {
    assert_canonical("if (x < y) { x }", "if ((x < y)) { x }");
    assert_canonical("if (x < y) { x } else { y }", "if ((x < y)) { x } else { y }");
    assert_canonical("if (x) {}", "if (x) {}");

    let program = parse_program("if (x < y) { x }").expect("program should parse");

    match &program.statements[0] {
        Statement::Expression(statement) => match &statement.expression {
            Expression::If(if_) => {
                assert_eq!(if_.consequence.statements.len(), 1);
                assert!(if_.alternative.is_none());
            },
            other => panic!("expected if expression, got {other:?}")
        },
        other => panic!("expected expression statement, got {other:?}")
    }
}

#[test]
fn test_function_literals() {
    assert_canonical("fn(x, y) { x + y; }", "fn(x, y) { (x + y) }");
    assert_canonical("fn() { 5 }", "fn() { 5 }");
    assert_canonical("fn(x) {}", "fn(x) {}");

    let program = parse_program("fn(x, y) { x + y; }").expect("program should parse");

    match &program.statements[0] {
        Statement::Expression(statement) => match &statement.expression {
            Expression::Function(function) => {
                let params = function.params.iter()
                    .map(|param| param.value.as_str())
                    .collect::<Vec<&str>>();

                assert_eq!(params, vec!["x", "y"]);
            },
            other => panic!("expected function literal, got {other:?}")
        },
        other => panic!("expected expression statement, got {other:?}")
    }
}

#[test]
fn test_call_expressions() {
    assert_canonical(
        "add(1, 2 * 3, 4 + 5)",
        "add(1, (2 * 3), (4 + 5))"
    );
    assert_canonical("fn(x) { x }(5)", "fn(x) { x }(5)");
    assert_canonical("noargs()", "noargs()");
}

#[test]
fn test_array_and_index_expressions() {
    assert_canonical("[1, 2 * 2, 3 + 3]", "[1, (2 * 2), (3 + 3)]");
    assert_canonical("[]", "[]");
    assert_canonical("myArray[1 + 1]", "(myArray[(1 + 1)])");
    assert_canonical("[\"a\", \"b\"][0]", "([\"a\", \"b\"][0])");
}

#[test]
fn test_string_literals() {
    assert_canonical("\"hello world\"", "\"hello world\"");
    assert_canonical("\"a\" + \"b\"", "(\"a\" + \"b\")");
}

// Re-parsing a canonical rendering must yield the same rendering.
#[test]
fn test_round_trip() {
    let inputs = [
        "let x = 5; let y = x + 1; y",
        "if (a) { b } else { c }",
        "if (a < b) { a; -b } else { !c }",
        "fn(x) { x }(5)",
        "let a = [1, 2, \"three\"]; a[2]",
        "!true; -x; 2 ** 3 ** 4",
        "let newAdder = fn(x) { fn(y) { x + y }; }; newAdder(2)(3)",
    ];

    for input in inputs {
        let first = parse_program(input)
            .unwrap_or_else(|errors| panic!("`{input}` should parse: {errors:?}"))
            .to_string();

        let second = parse_program(&first)
            .unwrap_or_else(|errors| panic!("`{first}` should re-parse: {errors:?}"))
            .to_string();

        assert_eq!(first, second, "Rendering is not stable for `{input}`");
    }
}

#[test]
fn test_collects_multiple_errors() {
    let errors = parse_program("let = 5; let y 10;")
        .expect_err("program should not parse");

    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0].error, ParseErrorType::ExpectedIdent));
    assert!(matches!(errors[1].error, ParseErrorType::UnexpectedToken { .. }));
}

#[test]
fn test_no_prefix_error() {
    let errors = parse_program("5 + ;").expect_err("program should not parse");

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].error, ParseErrorType::NoPrefixFunction { .. }));
}

#[test]
fn test_missing_token_error() {
    let errors = parse_program("if (x { 1 }").expect_err("program should not parse");

    assert!(matches!(errors[0].error, ParseErrorType::UnexpectedToken { .. }));
}

// A lexical failure surfaces through the same error list, and nothing
// after the offending character is parsed.
#[test]
fn test_lex_error_surfaces() {
    let errors = parse_program("let x = 5 @ 3;").expect_err("program should not parse");

    assert!(errors.iter().any(|error| matches!(error.error, ParseErrorType::LexError { .. })));
}

#[test]
fn test_error_spans() {
    let errors = parse_program("let 5 = x;").expect_err("program should not parse");

    assert!(matches!(errors[0].error, ParseErrorType::ExpectedIdent));
    assert_eq!(errors[0].span.start, 4);
    assert_eq!(errors[0].span.end, 5);
}
