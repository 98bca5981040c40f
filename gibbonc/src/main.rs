mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::path::PathBuf;

use clap::Parser;
use cli::{print_finished, print_running};
use gibbon_core::{environment::prelude::Value, eval::interpret};

#[derive(Parser)]
enum Command {
    /// Runs a script file
    Run {
        /// Path of source file
        path: PathBuf,
        /// Do not print the resulting value
        #[arg(short, long, default_value_t = false)]
        no_output: bool,
        /// Print the parsed ast before running
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Runs the interactive Read Eval Print Loop
    Repl,
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl
}

fn main() {
    let _ = match Command::parse() {
        Command::Run { path, no_output, print_ast } => {
            let buf_writer = crate::cli::stderr_buffer_writer();
            let mut buf = buf_writer.buffer();

            print_running(path.to_str().unwrap());
            let start = std::time::Instant::now();

            match interpret(path) {
                Ok((program, value)) => {
                    if print_ast {
                        println!("{program:#?}");
                    }

                    if !no_output && !matches!(value, Value::Null) {
                        println!("{value}");
                    }
                },
                Err(err) => {
                    err.pretty(&mut buf);
                    buf_writer
                        .print(&buf)
                        .expect("Writing diagnostics to stderr");
                }
            };

            print_finished(std::time::Instant::now() - start);
        },
        Command::Repl => {
            let _ = repl::start();
        },
        Command::Rlpl => {
            let _ = rlpl::start();
        },
        Command::Rppl => {
            let _ = rppl::start();
        }
    };
}
