use std::fmt::Display;

use crate::{
    lexer::prelude::{LexResult, Token},
    parser::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::SrcSpan
};

// program -> <statement> { <statement> }
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join("; "))
    }
}

// statement -> (<let> | <return> | <expression_statement>)
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(Let),
    Return(Return),
    Expression(ExpressionStatement),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let res = match &parser.current_token {
            Some((_, Token::Let, _)) => Self::Let(Let::parse(parser, None)?),
            Some((_, Token::Return, _)) => Self::Return(Return::parse(parser, None)?),
            Some(_) => Self::Expression(ExpressionStatement::parse(parser, None)?),
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        Ok(res)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Let(let_) => write!(f, "{let_}"),
            Self::Return(return_) => write!(f, "{return_}"),
            Self::Expression(statement) => write!(f, "{statement}")
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Let(let_) => let_.location,
            Self::Return(return_) => return_.location,
            Self::Expression(statement) => statement.location
        }
    }
}

// let -> let <identifier> = <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub name: Identifier,
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Let {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Let)?;
        let name = Identifier::parse(parser, None)?;

        parser.expect_one(Token::Assign)?;

        let value = Expression::parse(parser, None)?;

        let mut end = value.location().end;
        if parser.current_is(&Token::Semicolon) {
            end = parser.expect_one(Token::Semicolon)?.1;
        }

        Ok(Self {
            name,
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Let {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "let {} = {}", self.name, self.value)
    }
}

// return -> return <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Return {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Return)?;
        let value = Expression::parse(parser, None)?;

        let mut end = value.location().end;
        if parser.current_is(&Token::Semicolon) {
            end = parser.expect_one(Token::Semicolon)?.1;
        }

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {}", self.value)
    }
}

// expression_statement -> <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ExpressionStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let expression = Expression::parse(parser, None)?;

        let mut location = expression.location();
        if parser.current_is(&Token::Semicolon) {
            location.end = parser.expect_one(Token::Semicolon)?.1;
        }

        Ok(Self {
            expression,
            location
        })
    }
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

// block -> { <statement> { <statement> } }
// A block cut short by end of input simply ends; the surrounding
// construct reports the missing pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Block {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, mut end) = parser.expect_one(Token::LBrace)?;

        let mut statements = vec![];

        loop {
            match &parser.current_token {
                Some((_, Token::RBrace, _)) => {
                    end = parser.expect_one(Token::RBrace)?.1;
                    break;
                },
                Some((_, Token::Eof, _))
                | None => break,
                Some(_) => {
                    let statement = Statement::parse(parser, None)?;
                    end = statement.location().end;
                    statements.push(statement);
                }
            }
        }

        Ok(Self {
            statements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{}}");
        }

        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{{ {} }}", statements.join("; "))
    }
}

// expression -> <prefix_expression> { <infix_operator> <expression> }
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    String(StringLiteral),
    Boolean(BooleanLiteral),
    Prefix(Prefix),
    Infix(Infix),
    If(If),
    Function(FunctionLiteral),
    Call(Call),
    Array(ArrayLiteral),
    Index(Index),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let min_precedence = precedence.unwrap_or(Precedence::Lowest);

        let mut left = Expression::parse_prefix(parser)?;

        loop {
            if parser.current_is(&Token::Semicolon) {
                break;
            }

            if min_precedence >= parser.current_precedence() {
                break;
            }

            left = match &parser.current_token {
                Some((_, token, _)) if token.is_infix_operator() => {
                    Self::Infix(Infix::parse(parser, left, None)?)
                },
                Some((_, Token::LParen, _)) => Self::Call(Call::parse(parser, left, None)?),
                Some((_, Token::LSBracket, _)) => Self::Index(Index::parse(parser, left, None)?),
                _ => break
            };
        }

        Ok(left)
    }
}

impl Expression {
    fn parse_prefix<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>
    ) -> Result<Self, ParseError> {
        match &parser.current_token {
            Some((_, Token::Ident(_), _)) => Ok(Self::Identifier(Identifier::parse(parser, None)?)),
            Some((_, Token::Int(_), _)) => Ok(Self::Integer(IntegerLiteral::parse(parser, None)?)),
            Some((_, Token::String(_), _)) => Ok(Self::String(StringLiteral::parse(parser, None)?)),
            Some((_, Token::True, _))
            | Some((_, Token::False, _)) => Ok(Self::Boolean(BooleanLiteral::parse(parser, None)?)),
            Some((_, Token::Bang, _))
            | Some((_, Token::Minus, _)) => Ok(Self::Prefix(Prefix::parse(parser, None)?)),
            Some((_, Token::LParen, _)) => {
                parser.step();
                let expression = Expression::parse(parser, None)?;
                parser.expect_one(Token::RParen)?;

                Ok(expression)
            },
            Some((_, Token::If, _)) => Ok(Self::If(If::parse(parser, None)?)),
            Some((_, Token::Function, _)) => Ok(Self::Function(FunctionLiteral::parse(parser, None)?)),
            Some((_, Token::LSBracket, _)) => Ok(Self::Array(ArrayLiteral::parse(parser, None)?)),
            Some((start, token, end)) => {
                let span = SrcSpan { start: *start, end: *end };
                let token = token.clone();

                parse_error(ParseErrorType::NoPrefixFunction { token }, span)
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        }
    }

    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Identifier(identifier) => identifier.location,
            Self::Integer(literal) => literal.location,
            Self::String(literal) => literal.location,
            Self::Boolean(literal) => literal.location,
            Self::Prefix(prefix) => prefix.location,
            Self::Infix(infix) => infix.location,
            Self::If(if_) => if_.location,
            Self::Function(function) => function.location,
            Self::Call(call) => call.location,
            Self::Array(array) => array.location,
            Self::Index(index) => index.location
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(identifier) => write!(f, "{identifier}"),
            Self::Integer(literal) => write!(f, "{literal}"),
            Self::String(literal) => write!(f, "{literal}"),
            Self::Boolean(literal) => write!(f, "{literal}"),
            Self::Prefix(prefix) => write!(f, "{prefix}"),
            Self::Infix(infix) => write!(f, "{infix}"),
            Self::If(if_) => write!(f, "{if_}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Call(call) => write!(f, "{call}"),
            Self::Array(array) => write!(f, "{array}"),
            Self::Index(index) => write!(f, "{index}")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Identifier {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, value, end) = parser.expect_ident()?;

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub value: i64,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for IntegerLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        match parser.current_token.take() {
            Some((start, Token::Int(value), end)) => {
                parser.step();

                Ok(Self {
                    value,
                    location: SrcSpan { start, end }
                })
            },
            Some(t) => {
                let (start, token, end) = t.clone();
                parser.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token,
                        expected: vec!["an integer literal".to_string()],
                    },
                    SrcSpan { start, end }
                )
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        }
    }
}

impl Display for IntegerLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for StringLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        match parser.current_token.take() {
            Some((start, Token::String(value), end)) => {
                parser.step();

                Ok(Self {
                    value,
                    location: SrcSpan { start, end }
                })
            },
            Some(t) => {
                let (start, token, end) = t.clone();
                parser.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token,
                        expected: vec!["a string literal".to_string()],
                    },
                    SrcSpan { start, end }
                )
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        }
    }
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for BooleanLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        match parser.current_token.take() {
            Some((start, Token::True, end)) => {
                parser.step();

                Ok(Self {
                    value: true,
                    location: SrcSpan { start, end }
                })
            },
            Some((start, Token::False, end)) => {
                parser.step();

                Ok(Self {
                    value: false,
                    location: SrcSpan { start, end }
                })
            },
            Some(t) => {
                let (start, token, end) = t.clone();
                parser.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token,
                        expected: vec!["true".to_string(), "false".to_string()],
                    },
                    SrcSpan { start, end }
                )
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        }
    }
}

impl Display for BooleanLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

// prefix -> (! | -) <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub operator: Token,
    pub expression: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Prefix {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, operator, _) = match parser.next_token() {
            Some(spanned) => spanned,
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        let expression = Expression::parse(parser, Some(Precedence::Prefix))?;
        let end = expression.location().end;

        Ok(Self {
            operator,
            expression: Box::new(expression),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}{})", self.operator.as_literal(), self.expression)
    }
}

// infix -> <expression> <infix_operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Infix {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (_, operator, _) = match parser.next_token() {
            Some(spanned) => spanned,
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };

        let precedence = Precedence::from(&operator);
        let right = Expression::parse(parser, Some(precedence))?;

        let location = SrcSpan {
            start: left.location().start,
            end: right.location().end
        };

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location
        })
    }
}

impl Display for Infix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator.as_literal(), self.right)
    }
}

// if -> if ( <expression> ) <block> [else <block>]
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Box<Expression>,
    pub consequence: Block,
    pub alternative: Option<Block>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for If {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        parser.expect_one(Token::LParen)?;
        let condition = Expression::parse(parser, None)?;
        parser.expect_one(Token::RParen)?;

        let consequence = Block::parse(parser, None)?;
        let mut end = consequence.location.end;

        let alternative = if parser.current_is(&Token::Else) {
            parser.step();

            let block = Block::parse(parser, None)?;
            end = block.location.end;

            Some(block)
        } else {
            None
        };

        Ok(Self {
            condition: Box::new(condition),
            consequence,
            alternative,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for If {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if ({}) {}", self.condition, self.consequence)?;

        match &self.alternative {
            Some(alternative) => write!(f, " else {alternative}"),
            None => Ok(())
        }
    }
}

// function -> fn ( [<identifier> {, <identifier>}] ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub params: Vec<Identifier>,
    pub body: Block,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for FunctionLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Function)?;

        parser.expect_one(Token::LParen)?;

        let mut params = vec![];

        if parser.current_is(&Token::RParen) {
            parser.step();
        } else {
            params.push(Identifier::parse(parser, None)?);

            while parser.current_is(&Token::Comma) {
                parser.step();
                params.push(Identifier::parse(parser, None)?);
            }

            parser.expect_one(Token::RParen)?;
        }

        let body = Block::parse(parser, None)?;
        let end = body.location.end;

        Ok(Self {
            params,
            body,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params.iter()
            .map(|param| param.to_string())
            .collect::<Vec<String>>();

        write!(f, "fn({}) {}", params.join(", "), self.body)
    }
}

// call -> <expression> ( [<expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Call {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (arguments, list_span) = parser.parse_expression_list(Token::LParen, Token::RParen)?;

        let location = SrcSpan {
            start: left.location().start,
            end: list_span.end
        };

        Ok(Self {
            function: Box::new(left),
            arguments,
            location
        })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arguments = self.arguments.iter()
            .map(|argument| argument.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}({})", self.function, arguments.join(", "))
    }
}

// array -> [ [<expression> {, <expression>}] ]
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ArrayLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (elements, location) = parser.parse_expression_list(Token::LSBracket, Token::RSBracket)?;

        Ok(Self {
            elements,
            location
        })
    }
}

impl Display for ArrayLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let elements = self.elements.iter()
            .map(|element| element.to_string())
            .collect::<Vec<String>>();

        write!(f, "[{}]", elements.join(", "))
    }
}

// index -> <expression> [ <expression> ]
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Index {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        parser.expect_one(Token::LSBracket)?;

        let index = Expression::parse(parser, None)?;
        let (_, end) = parser.expect_one(Token::RSBracket)?;

        let location = SrcSpan {
            start: left.location().start,
            end
        };

        Ok(Self {
            left: Box::new(left),
            index: Box::new(index),
            location
        })
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}[{}])", self.left, self.index)
    }
}
