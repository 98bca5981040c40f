use std::{cell::RefCell, io::Write, path::PathBuf, rc::Rc};

use gibbon_core::{
    environment::prelude::{Environment, Value},
    eval::eval,
    lexer::prelude::Lexer,
    parser::prelude::Parser,
    utils::prelude::Error
};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
    ctrlc::set_handler(|| {
        println!();
        std::process::exit(0);
    }).expect("Setting Ctrl-C handler");

    let stdin = std::io::stdin();

    // One global environment for the whole session, so `let` bindings
    // survive from line to line.
    let env = Rc::new(RefCell::new(Environment::new()));

    loop {
        let mut input = String::from("");

        print!("{}", PROMPT);
        std::io::stdout().flush()?;
        stdin.read_line(&mut input)?;

        if let Some('\n') = input.chars().next_back() {
            input.pop();
        }
        if let Some('\r') = input.chars().next_back() {
            input.pop();
        }

        match input.as_str() {
            "" => {},
            ".exit" => return Ok(()),
            _ => {
                let mut parser = Parser::new(Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c))));
                let program = parser.parse();

                if !parser.errors().is_empty() {
                    let err = Error::Parse {
                        path: PathBuf::from("repl"),
                        src: input.clone(),
                        errors: parser.into_errors()
                    };

                    let buf_writer = crate::cli::stderr_buffer_writer();
                    let mut buf = buf_writer.buffer();
                    err.pretty(&mut buf);
                    buf_writer
                        .print(&buf)
                        .expect("Writing diagnostics to stderr");

                    continue;
                }

                let value = eval(&program, env.clone());

                if !matches!(value, Value::Null) {
                    println!("{value}");
                }
            }
        }
    }
}
