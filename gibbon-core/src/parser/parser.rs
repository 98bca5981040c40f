use crate::{lexer::prelude::{LexResult, Lexer, LexicalError, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Expression, Program, Statement};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub lex_errors: Vec<LexicalError>,
    errors: Vec<ParseError>,

    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            lex_errors: vec![],
            errors: vec![],

            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();
        let mut next = None;

        match self.tokens.next() {
            Some(Err(err)) => {
                self.lex_errors.push(err);
            },
            Some(Ok(tok)) => {
                next = Some(tok);
            },
            None => {}
        }

        self.current_token = self.next_token.take();
        self.next_token = next.take();

        t
    }

    pub fn current_is(&self, token: &Token) -> bool {
        matches!(&self.current_token, Some((_, t, _)) if t == token)
    }

    pub fn current_precedence(&self) -> Precedence {
        match &self.current_token {
            Some((_, token, _)) => Precedence::from(token),
            None => Precedence::Lowest
        }
    }

    /// Builds the program statement by statement, recording every error and
    /// resynchronizing at the next `;` so one bad statement does not hide
    /// the rest. Callers must consult [`Parser::errors`] before evaluating.
    pub fn parse(&mut self) -> Program {
        let start = match &self.current_token {
            Some((start, _, _)) => *start,
            None => 0
        };
        let mut end = start;

        let mut statements = vec![];

        while !self.is_at_end() {
            match Statement::parse(self, None) {
                Ok(statement) => {
                    end = statement.location().end;
                    statements.push(statement);
                },
                Err(error) => {
                    self.errors.push(error);
                    self.recover();
                }
            }
        }

        for error in std::mem::take(&mut self.lex_errors) {
            let location = error.location;

            self.errors.push(ParseError {
                error: ParseErrorType::LexError { error },
                span: location
            });
        }

        Program {
            statements,
            location: SrcSpan { start, end }
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token, Some((_, Token::Eof, _)) | None)
    }

    // Skip to just past the next statement boundary.
    fn recover(&mut self) {
        loop {
            match &self.current_token {
                Some((_, Token::Semicolon, _)) => {
                    self.step();
                    break;
                },
                Some((_, Token::Eof, _))
                | None => break,
                Some(_) => self.step()
            }
        }
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match self.current_token.take() {
            Some((start, tok, end)) if tok == token => {
                self.step();
                Ok((start, end))
            },
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: vec![token.as_literal()],
                    },
                    SrcSpan { start, end }
                )
            },
            None => {
                self.current_token = None;

                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Ident(value), end)) => {
                self.step();
                Ok((start, value, end))
            },
            Some(t) => {
                let (start, _, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::ExpectedIdent,
                    SrcSpan { start, end }
                )
            },
            None => {
                self.current_token = None;

                parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }

    /// Shared by call arguments and array literals: `open`, a possibly empty
    /// comma-separated expression list, `close`.
    pub fn parse_expression_list(
        &mut self,
        open: Token,
        close: Token
    ) -> Result<(Vec<Expression>, SrcSpan), ParseError> {
        let (start, _) = self.expect_one(open)?;

        if self.current_is(&close) {
            let (_, end) = self.expect_one(close)?;

            return Ok((vec![], SrcSpan { start, end }));
        }

        let mut list = vec![Expression::parse(self, None)?];

        while self.current_is(&Token::Comma) {
            self.step();
            list.push(Expression::parse(self, None)?);
        }

        let (_, end) = self.expect_one(close)?;

        Ok((list, SrcSpan { start, end }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::Equal | Token::NotEqual => Self::Equals,
            Token::LessThan | Token::GreaterThan |
            Token::LessThanOrEqual | Token::GreaterThanOrEqual => Self::LessGreater,
            Token::Plus | Token::Minus => Self::Sum,
            Token::Slash | Token::Asterisk | Token::Power => Self::Product,
            Token::LParen => Self::Call,
            Token::LSBracket => Self::Index,
            _ => Self::Lowest,
        }
    }
}

pub fn parse_program(src: &str) -> Result<Program, Vec<ParseError>> {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);
    let program = parser.parse();

    if parser.errors().is_empty() {
        Ok(program)
    } else {
        Err(parser.into_errors())
    }
}

pub fn parse_program_from_stream(
    stream: impl Iterator<Item = char>
) -> Result<Program, Vec<ParseError>> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);
    let program = parser.parse();

    if parser.errors().is_empty() {
        Ok(program)
    } else {
        Err(parser.into_errors())
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
