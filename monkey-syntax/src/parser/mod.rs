pub mod error;
pub mod expressions;
pub mod statements;

use crate::ast::Program;
use crate::lexer::{Token, TokenKind};
pub use error::{Expected, ParseError};
use statements::parse_statement;

pub struct Parser<'a> {
    pub(crate) iter: std::iter::Peekable<crate::lexer::Tokenizer<'a>>,
    end: (usize, usize),
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: crate::lexer::Tokenizer<'a>) -> Self {
        let end = tokenizer.end_position();
        let iter = tokenizer.peekable();
        Self { iter, end }
    }

    /// Consumes an identifier. Any other token is left in place.
    pub(crate) fn parse_ident(&mut self) -> Result<std::rc::Rc<str>, ParseError> {
        let token = self
            .iter
            .next_if(|token| matches!(token.kind, TokenKind::Ident(_)));
        match token {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            _ => Err(self.unexpected(Expected::Identifier)),
        }
    }

    /// Consumes a token of `token_kind`. Any other token is left in place.
    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        match self.iter.next_if(|token| token.kind == token_kind) {
            Some(_) => Ok(()),
            None => Err(self.unexpected(Expected::Token(token_kind))),
        }
    }

    /// Error for the upcoming token, which did not match `expected`.
    pub(crate) fn unexpected(&mut self, expected: Expected) -> ParseError {
        match self.iter.peek().cloned() {
            Some(got) => ParseError::UnexpectedToken { expected, got },
            None => self.premature_end(expected),
        }
    }

    pub(crate) fn premature_end(&self, expected: Expected) -> ParseError {
        let (line, column) = self.end;
        ParseError::PrematureEndOfInput {
            expected,
            line,
            column,
        }
    }

    pub(crate) fn skip_semicolons(&mut self) {
        while self
            .iter
            .next_if(|token| token.kind == TokenKind::SemiColon)
            .is_some()
        {}
    }

    /// Discards tokens up to and including the next `;`, or up to a `let` or
    /// `return` that starts the next statement. A failed statement has always
    /// consumed its first token, so this never stalls.
    fn synchronize(&mut self) {
        while let Some(token) = self.iter.peek() {
            match token.kind {
                TokenKind::Let | TokenKind::Return => break,
                TokenKind::SemiColon => {
                    self.iter.next();
                    break;
                }
                _ => {
                    self.iter.next();
                }
            }
        }
    }

    /// Parses every statement of the input. A statement that fails to parse is
    /// recorded and skipped, so one call reports all the errors it can find.
    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_semicolons();
            if self.iter.peek().is_none() {
                break;
            }
            match parse_statement(self) {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    tracing::trace!(error = %err, "skipping malformed statement");
                    errors.push(err);
                    self.synchronize();
                }
            }
        }

        tracing::debug!(
            statements = statements.len(),
            errors = errors.len(),
            "parsed program"
        );
        if errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(errors)
        }
    }
}
