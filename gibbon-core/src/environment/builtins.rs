use super::prelude::Value;

/// The fixed, process-wide table of native functions. Identifier resolution
/// falls back to this table after the environment chain is exhausted, so a
/// `let` binding can shadow a builtin without removing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    Append,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "len" => Some(Builtin::Len),
            "append" => Some(Builtin::Append),
            _ => None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Append => "append"
        }
    }

    pub fn apply(&self, args: Vec<Value>) -> Value {
        match self {
            Builtin::Len => {
                if args.len() != 1 {
                    return Value::Error(format!(
                        "len: wrong number of arguments: got {}, want 1",
                        args.len()
                    ));
                }

                match &args[0] {
                    Value::String(value) => Value::Integer(value.chars().count() as i64),
                    Value::Array(elements) => Value::Integer(elements.borrow().len() as i64),
                    other => Value::Error(format!(
                        "len: type not supported, got {}",
                        other.type_name()
                    ))
                }
            },
            Builtin::Append => {
                if args.is_empty() {
                    return Value::Error("append: no arguments provided".to_string());
                }

                let mut args = args.into_iter();

                match args.next() {
                    Some(Value::Array(elements)) => {
                        // Push onto the shared vector: every binding holding
                        // this array observes the appended elements.
                        elements.borrow_mut().extend(args);

                        Value::Array(elements)
                    },
                    _ => Value::Error("append: first argument must be an array".to_string())
                }
            }
        }
    }
}
