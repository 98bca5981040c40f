#[cfg(test)]
mod tests;

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use utf8_chars::BufReadCharsExt;

use crate::{
    environment::prelude::{Builtin, Environment, Function, Value, FALSE, NULL, TRUE},
    lexer::prelude::Token,
    parser::prelude::{
        parse_program_from_stream, ArrayLiteral, Block, Call, Expression, Identifier, If,
        Index, Infix, Let, Prefix, Program, Statement
    },
    utils::prelude::Error
};

/// Reads and runs a whole script. The source is streamed into the lexer
/// character by character while a copy is accumulated for diagnostics.
/// The returned value may be a runtime [`Value::Error`]; only IO and
/// parse failures are `Err`.
pub fn interpret(path: PathBuf) -> Result<(Program, Value), Error> {
    let file = match std::fs::File::open(&path) {
        Ok(file) => file,
        Err(err) => return Err(Error::StdIo { err: err.kind() })
    };

    let file_size = file.metadata()
        .map_err(|err| Error::StdIo { err: err.kind() })?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut reader = std::io::BufReader::new(file);
    let stream = reader.chars()
        .map(|c| {
            let c = c.unwrap();
            src.push(c);
            c
        });

    let program = match parse_program_from_stream(stream) {
        Ok(program) => program,
        Err(errors) => {
            return Err(Error::Parse { path, src, errors })
        }
    };

    let env = Rc::new(RefCell::new(Environment::new()));
    let value = eval(&program, env);

    Ok((program, value))
}

/// Reduces a program to a single value. Statements run in order; a
/// `return` or a runtime error cuts the run short, and a `return` is
/// unwrapped here, at the outermost level only.
pub fn eval(program: &Program, env: Rc<RefCell<Environment>>) -> Value {
    let mut result = NULL;

    for statement in &program.statements {
        match eval_statement(statement, env.clone()) {
            Value::Return(value) => return *value,
            error @ Value::Error(_) => return error,
            value => result = value
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: Rc<RefCell<Environment>>) -> Value {
    match statement {
        Statement::Let(let_) => eval_let(let_, env),
        Statement::Return(return_) => {
            let value = eval_expression(&return_.value, env);

            if value.is_error() {
                value
            } else {
                Value::Return(Box::new(value))
            }
        },
        Statement::Expression(statement) => eval_expression(&statement.expression, env)
    }
}

fn eval_let(let_: &Let, env: Rc<RefCell<Environment>>) -> Value {
    let value = eval_expression(&let_.value, env.clone());

    if value.is_error() {
        return value;
    }

    env.borrow_mut().set(let_.name.value.clone(), value);

    NULL
}

// Unlike `eval`, blocks pass `Return` through untouched so that it
// unwinds nested blocks up to the enclosing call.
fn eval_block(block: &Block, env: Rc<RefCell<Environment>>) -> Value {
    let mut result = NULL;

    for statement in &block.statements {
        result = eval_statement(statement, env.clone());

        if matches!(result, Value::Return(_) | Value::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_expression(expression: &Expression, env: Rc<RefCell<Environment>>) -> Value {
    match expression {
        Expression::Identifier(identifier) => eval_identifier(identifier, env),
        Expression::Integer(literal) => Value::Integer(literal.value),
        Expression::String(literal) => Value::String(literal.value.clone()),
        Expression::Boolean(literal) => Value::from_bool(literal.value),
        Expression::Prefix(prefix) => eval_prefix(prefix, env),
        Expression::Infix(infix) => eval_infix(infix, env),
        Expression::If(if_) => eval_if(if_, env),
        Expression::Function(function) => Value::Function(Function {
            params: function.params.clone(),
            body: function.body.clone(),
            env
        }),
        Expression::Call(call) => eval_call(call, env),
        Expression::Array(array) => eval_array(array, env),
        Expression::Index(index) => eval_index(index, env)
    }
}

fn eval_identifier(identifier: &Identifier, env: Rc<RefCell<Environment>>) -> Value {
    if let Some(value) = env.borrow().get(&identifier.value) {
        return value;
    }

    if let Some(builtin) = Builtin::lookup(&identifier.value) {
        return Value::Builtin(builtin);
    }

    Value::Error(format!("identifier not found: {}", identifier.value))
}

fn eval_prefix(prefix: &Prefix, env: Rc<RefCell<Environment>>) -> Value {
    let value = eval_expression(&prefix.expression, env);

    if value.is_error() {
        return value;
    }

    match &prefix.operator {
        Token::Bang => {
            if value.is_truthy() { FALSE } else { TRUE }
        },
        Token::Minus => match value {
            Value::Integer(value) => Value::Integer(value.wrapping_neg()),
            other => Value::Error(format!("unknown operator: -{}", other.type_name()))
        },
        operator => Value::Error(format!(
            "unknown operator: {}{}",
            operator.as_literal(),
            value.type_name()
        ))
    }
}

fn eval_infix(infix: &Infix, env: Rc<RefCell<Environment>>) -> Value {
    let left = eval_expression(&infix.left, env.clone());

    if left.is_error() {
        return left;
    }

    let right = eval_expression(&infix.right, env);

    if right.is_error() {
        return right;
    }

    match (left, right) {
        (
            Value::Integer(left_value),
            Value::Integer(right_value)
        ) => eval_integer_infix(&infix.operator, left_value, right_value),
        (
            Value::String(left_value),
            Value::String(right_value)
        ) => {
            match infix.operator {
                Token::Plus => Value::String(format!("{left_value}{right_value}")),
                Token::Equal => Value::from_bool(left_value == right_value),
                Token::NotEqual => Value::from_bool(left_value != right_value),
                ref operator => Value::Error(format!(
                    "unknown operator: STRING {} STRING",
                    operator.as_literal()
                ))
            }
        },
        (
            Value::Boolean(left_value),
            Value::Boolean(right_value)
        ) => {
            match infix.operator {
                Token::Equal => Value::from_bool(left_value == right_value),
                Token::NotEqual => Value::from_bool(left_value != right_value),
                ref operator => Value::Error(format!(
                    "unknown operator: BOOLEAN {} BOOLEAN",
                    operator.as_literal()
                ))
            }
        },
        (Value::Null, Value::Null) => {
            match infix.operator {
                Token::Equal => TRUE,
                Token::NotEqual => FALSE,
                ref operator => Value::Error(format!(
                    "unknown operator: NULL {} NULL",
                    operator.as_literal()
                ))
            }
        },
        (left, right) => {
            if left.type_name() != right.type_name() {
                Value::Error(format!(
                    "type mismatch: {} {} {}",
                    left.type_name(),
                    infix.operator.as_literal(),
                    right.type_name()
                ))
            } else {
                Value::Error(format!(
                    "unknown operator: {} {} {}",
                    left.type_name(),
                    infix.operator.as_literal(),
                    right.type_name()
                ))
            }
        }
    }
}

// 64-bit two's-complement semantics: arithmetic wraps, division truncates
// toward zero. Division by zero is an ordinary runtime error.
fn eval_integer_infix(operator: &Token, left: i64, right: i64) -> Value {
    match operator {
        Token::Plus => Value::Integer(left.wrapping_add(right)),
        Token::Minus => Value::Integer(left.wrapping_sub(right)),
        Token::Asterisk => Value::Integer(left.wrapping_mul(right)),
        Token::Slash => {
            if right == 0 {
                Value::Error(format!("division by zero: {left} / 0"))
            } else {
                Value::Integer(left.wrapping_div(right))
            }
        },
        Token::Power => {
            match u32::try_from(right) {
                Ok(exponent) => Value::Integer(left.wrapping_pow(exponent)),
                Err(_) => Value::Error(format!("exponent out of range: {right}"))
            }
        },
        Token::LessThan => Value::from_bool(left < right),
        Token::LessThanOrEqual => Value::from_bool(left <= right),
        Token::GreaterThan => Value::from_bool(left > right),
        Token::GreaterThanOrEqual => Value::from_bool(left >= right),
        Token::Equal => Value::from_bool(left == right),
        Token::NotEqual => Value::from_bool(left != right),
        operator => Value::Error(format!(
            "unknown operator: INTEGER {} INTEGER",
            operator.as_literal()
        ))
    }
}

fn eval_if(if_: &If, env: Rc<RefCell<Environment>>) -> Value {
    let condition = eval_expression(&if_.condition, env.clone());

    if condition.is_error() {
        return condition;
    }

    if condition.is_truthy() {
        eval_block(&if_.consequence, env)
    } else {
        match &if_.alternative {
            Some(alternative) => eval_block(alternative, env),
            None => NULL
        }
    }
}

fn eval_call(call: &Call, env: Rc<RefCell<Environment>>) -> Value {
    let function = eval_expression(&call.function, env.clone());

    if function.is_error() {
        return function;
    }

    let args = match eval_expressions(&call.arguments, env) {
        Ok(args) => args,
        Err(error) => return error
    };

    apply_function(function, args)
}

fn eval_expressions(
    expressions: &[Expression],
    env: Rc<RefCell<Environment>>
) -> Result<Vec<Value>, Value> {
    let mut values = vec![];

    for expression in expressions {
        let value = eval_expression(expression, env.clone());

        if value.is_error() {
            return Err(value);
        }

        values.push(value);
    }

    Ok(values)
}

fn apply_function(function: Value, args: Vec<Value>) -> Value {
    match function {
        Value::Function(function) => {
            if args.len() != function.params.len() {
                return Value::Error(format!(
                    "wrong number of arguments: got {}, want {}",
                    args.len(),
                    function.params.len()
                ));
            }

            let mut call_env = Environment::new_enclosed(function.env.clone());

            for (param, arg) in function.params.iter().zip(args) {
                call_env.set(param.value.clone(), arg);
            }

            match eval_block(&function.body, Rc::new(RefCell::new(call_env))) {
                Value::Return(value) => *value,
                value => value
            }
        },
        Value::Builtin(builtin) => builtin.apply(args),
        other => Value::Error(format!("not a function: {}", other.type_name()))
    }
}

fn eval_array(array: &ArrayLiteral, env: Rc<RefCell<Environment>>) -> Value {
    match eval_expressions(&array.elements, env) {
        Ok(elements) => Value::Array(Rc::new(RefCell::new(elements))),
        Err(error) => error
    }
}

fn eval_index(index: &Index, env: Rc<RefCell<Environment>>) -> Value {
    let left = eval_expression(&index.left, env.clone());

    if left.is_error() {
        return left;
    }

    let index_value = eval_expression(&index.index, env);

    if index_value.is_error() {
        return index_value;
    }

    match (left, index_value) {
        (Value::Array(elements), Value::Integer(idx)) => {
            let elements = elements.borrow();

            if idx < 0 || idx as usize >= elements.len() {
                NULL
            } else {
                elements[idx as usize].clone()
            }
        },
        (left, _) => Value::Error(format!(
            "index operator not supported: {}",
            left.type_name()
        ))
    }
}
