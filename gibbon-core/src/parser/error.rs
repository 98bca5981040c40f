use crate::{lexer::prelude::{LexicalError, Token}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedIdent,
    UnexpectedEof,
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    NoPrefixFunction {
        token: Token,
    },
    LexError { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedIdent => ("Expected identifier", vec![]),
            ParseErrorType::UnexpectedEof => ("Unexpected end of input", vec![]),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = match token {
                    Token::Int(_) => "an integer".to_string(),
                    Token::String(_) => "a string".to_string(),
                    Token::Ident(_) => "an identifier".to_string(),
                    Token::Eof => "the end of input".to_string(),
                    _ if token.is_keyword() => format!("the keyword `{}`", token.as_literal()),
                    _ => format!("`{}`", token.as_literal())
                };

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- `{s}`")))
                    .collect();

                ("Unexpected token", messages)
            },
            ParseErrorType::NoPrefixFunction { token } => {
                let messages = vec![
                    format!("`{}` cannot start an expression", token.as_literal())
                ];

                ("Expected an expression", messages)
            },
            ParseErrorType::LexError { error } => error.details()
        }
    }
}
