use std::fmt::Display;

use thiserror::Error;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("unexpected end of input at {line}:{column}, expected {expected}")]
    PrematureEndOfInput {
        expected: Expected,
        line: usize,
        column: usize,
    },
    #[error("expected {expected}, got {got}")]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("invalid integer literal {token}: {source}")]
    InvalidInteger {
        token: Token,
        source: std::num::ParseIntError,
    },
    #[error("no prefix parse rule for {0}")]
    NoPrefixFunction(Token),
    #[error("illegal token {0}")]
    IllegalToken(Token),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Identifier => write!(f, "identifier"),
            Expected::Expression => write!(f, "expression"),
        }
    }
}
