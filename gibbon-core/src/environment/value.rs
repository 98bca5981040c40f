use std::{cell::RefCell, fmt::Display, rc::Rc};

use crate::parser::prelude::{Block, Identifier};

use super::prelude::{Builtin, Environment};

pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);
pub const NULL: Value = Value::Null;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Null,
    Function(Function),
    Builtin(Builtin),
    /// Carries a `return`ed value up to the nearest call or program
    /// boundary. Never observable by user code.
    Return(Box<Value>),
    Error(String),
}

/// A function literal together with the environment that was active at its
/// definition site. The environment is shared, not copied, so bindings
/// created or updated later in the defining scope are visible at call time.
#[derive(Debug, Clone)]
pub struct Function {
    pub params: Vec<Identifier>,
    pub body: Block,
    pub env: Rc<RefCell<Environment>>,
}

// Captured environments take no part in comparisons; the global scope
// usually holds the function itself, and following that cycle would
// never terminate.
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body
    }
}

impl Value {
    pub fn from_bool(value: bool) -> Value {
        if value { TRUE } else { FALSE }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Null => "NULL",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Return(_) => "RETURN",
            Value::Error(_) => "ERROR",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::String(value) => write!(f, "{value}"),
            Value::Array(elements) => {
                let elements = elements.borrow()
                    .iter()
                    .map(|element| element.to_string())
                    .collect::<Vec<String>>();

                write!(f, "[{}]", elements.join(", "))
            },
            Value::Null => write!(f, "null"),
            Value::Function(function) => {
                let params = function.params.iter()
                    .map(|param| param.to_string())
                    .collect::<Vec<String>>();

                write!(f, "fn({}) {}", params.join(", "), function.body)
            },
            Value::Builtin(builtin) => write!(f, "builtin function `{}`", builtin.name()),
            Value::Return(value) => write!(f, "{value}"),
            Value::Error(message) => write!(f, "error: {message}")
        }
    }
}
