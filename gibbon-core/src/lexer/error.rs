use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    UnterminatedString,
    InvalidNumber,
    NumberOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedToken { tok } => {
                ("Unrecognized character", vec![
                    format!("`{tok}` cannot appear in a program")
                ])
            },
            LexicalErrorType::UnterminatedString => {
                ("Unterminated string literal", vec![
                    "The closing `\"` is missing".to_string()
                ])
            },
            LexicalErrorType::InvalidNumber => {
                ("Invalid integer literal", vec![
                    "Only 64-bit integer literals are supported".to_string()
                ])
            },
            LexicalErrorType::NumberOutOfRange => {
                ("Integer literal out of range", vec![
                    "Integer literals must fit in 64 bits".to_string()
                ])
            }
        }
    }
}
