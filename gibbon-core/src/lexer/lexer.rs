use super::error::{LexicalError, LexicalErrorType};
use super::token::{str_to_keyword, Token};
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
    position: u32,
    next_position: u32,
    ch: Option<char>,
    next_ch: Option<char>,
    input: T,

    // Once the scan hits an unrecognized character or a malformed literal
    // the stream is over; only `Eof` tokens come out afterwards.
    failed: bool,
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
    pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
            ch: None,
            next_ch: None,
            input,

            failed: false,
        };

        lexer.next_char();
        lexer.next_char();

        lexer
    }

    pub fn next_token(&mut self) -> LexResult {
        if self.failed {
            return Ok((self.position, Token::Eof, self.position));
        }

        let span = match self.ch {
            Some(ch) => match ch {
                '=' => self.eat_with_lookahead('=', Token::Equal, Token::Assign),
                '!' => self.eat_with_lookahead('=', Token::NotEqual, Token::Bang),
                '<' => self.eat_with_lookahead('=', Token::LessThanOrEqual, Token::LessThan),
                '>' => self.eat_with_lookahead('=', Token::GreaterThanOrEqual, Token::GreaterThan),
                '*' => self.eat_with_lookahead('*', Token::Power, Token::Asterisk),
                '+' => self.eat_one_char(Token::Plus),
                '-' => self.eat_one_char(Token::Minus),
                '/' => self.eat_one_char(Token::Slash),
                ',' => self.eat_one_char(Token::Comma),
                ';' => self.eat_one_char(Token::Semicolon),
                '(' => self.eat_one_char(Token::LParen),
                ')' => self.eat_one_char(Token::RParen),
                '{' => self.eat_one_char(Token::LBrace),
                '}' => self.eat_one_char(Token::RBrace),
                '[' => self.eat_one_char(Token::LSBracket),
                ']' => self.eat_one_char(Token::RSBracket),
                '"' => return self.lex_string(),
                '0'..='9' => return self.lex_number(),
                c if c.is_alphabetic() || c == '_' => {
                    return Ok(self.lex_ident());
                },
                ' ' | '\t' | '\n' | '\r' | '\x0C' => {
                    let _ = self.next_char();

                    return self.next_token();
                },
                c => {
                    let location = self.position;
                    self.failed = true;

                    return Err(LexicalError {
                        error: LexicalErrorType::UnrecognizedToken { tok: c },
                        location: SrcSpan {
                            start: location,
                            end: location,
                        },
                    });
                }
            },
            None => {
                self.eat_one_char(Token::Eof)
            }
        };

        Ok(span)
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.ch;

        let next = match self.input.next() {
            Some((pos, ch)) => {
                self.position = self.next_position;
                self.next_position = pos;

                Some(ch)
            },
            None => {
                self.position = self.next_position;
                self.next_position += 1;

                None
            }
        };

        self.ch = self.next_ch;
        self.next_ch = next;

        ch
    }

    fn eat_one_char(&mut self, token: Token) -> Spanned {
        let start_pos = self.position;
        self.next_char();
        let end_pos = self.position;

        (start_pos, token, end_pos)
    }

    fn eat_with_lookahead(&mut self, follow: char, double: Token, single: Token) -> Spanned {
        let start_pos = self.position;
        self.next_char();

        if self.ch == Some(follow) {
            self.next_char();
            (start_pos, double, self.position)
        } else {
            (start_pos, single, self.position)
        }
    }

    fn lex_ident(&mut self) -> Spanned {
        let start_pos = self.position;
        let mut ident = String::new();

        loop {
            match self.ch {
                Some(ch) if ch.is_alphanumeric() || ch == '_' => {
                    ident.push(self.next_char().unwrap())
                },
                _ => break
            }
        }

        let end_pos = self.position;

        match str_to_keyword(&ident) {
            Some(token) => (start_pos, token, end_pos),
            None => (start_pos, Token::Ident(ident), end_pos)
        }
    }

    fn lex_number(&mut self) -> LexResult {
        let start_pos = self.position;

        let mut value = String::new();
        let mut is_integer = true;

        while matches!(self.ch, Some(ch) if ch.is_ascii_digit()) {
            value.push(self.next_char().unwrap());
        }

        // The full literal shape is consumed before the verdict so that
        // `1.5` is reported as one bad literal, not `1` then garbage.
        if self.ch == Some('.') && matches!(self.next_ch, Some(ch) if ch.is_ascii_digit()) {
            is_integer = false;
            value.push(self.next_char().unwrap());

            while matches!(self.ch, Some(ch) if ch.is_ascii_digit()) {
                value.push(self.next_char().unwrap());
            }
        }

        if matches!(self.ch, Some('e') | Some('E')) {
            is_integer = false;
            value.push(self.next_char().unwrap());

            if matches!(self.ch, Some('+') | Some('-')) {
                value.push(self.next_char().unwrap());
            }

            while matches!(self.ch, Some(ch) if ch.is_ascii_digit()) {
                value.push(self.next_char().unwrap());
            }
        }

        let end_pos = self.position;

        if !is_integer {
            self.failed = true;

            return Err(LexicalError {
                error: LexicalErrorType::InvalidNumber,
                location: SrcSpan { start: start_pos, end: end_pos }
            });
        }

        match value.parse::<i64>() {
            Ok(value) => Ok((start_pos, Token::Int(value), end_pos)),
            Err(_) => {
                self.failed = true;

                Err(LexicalError {
                    error: LexicalErrorType::NumberOutOfRange,
                    location: SrcSpan { start: start_pos, end: end_pos }
                })
            }
        }
    }

    fn lex_string(&mut self) -> LexResult {
        let start_pos = self.position;

        self.next_char(); // skip opening quote

        let mut value = String::new();

        loop {
            match self.ch {
                Some('"') => {
                    self.next_char(); // skip closing quote
                    break;
                },
                Some(_) => value.push(self.next_char().unwrap()),
                None => {
                    self.failed = true;

                    return Err(LexicalError {
                        error: LexicalErrorType::UnterminatedString,
                        location: SrcSpan { start: start_pos, end: self.position }
                    });
                }
            }
        }

        Ok((start_pos, Token::String(value), self.position))
    }
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
    type Item = LexResult;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();

        Some(token)
    }
}
