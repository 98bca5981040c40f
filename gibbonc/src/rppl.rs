use std::{io::Write, path::PathBuf};

use gibbon_core::{parser::prelude::parse_program, utils::prelude::Error};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
    let stdin = std::io::stdin();

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
                match parse_program(&input) {
                    Ok(program) => {
                        println!("{program}");
                    },
                    Err(errors) => {
                        let err = Error::Parse {
                            path: PathBuf::from("repl"),
                            src: input.clone(),
                            errors
                        };

                        let buf_writer = crate::cli::stderr_buffer_writer();
                        let mut buf = buf_writer.buffer();
                        err.pretty(&mut buf);
                        buf_writer
                            .print(&buf)
                            .expect("Writing diagnostics to stderr");
                    }
                }
            }
        }
    }
}
