pub use crate::token::{Token, TokenKind};

use crate::token::keywords;

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    line_start: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            line: 1,
            line_start: 0,
        }
    }

    /// Line and column just past the last character of the input, where an
    /// end-of-input error is reported.
    pub fn end_position(&self) -> (usize, usize) {
        let line = self.input.matches('\n').count() + 1;
        let line_start = self.input.rfind('\n').map_or(0, |idx| idx + 1);
        (line, self.input[line_start..].chars().count() + 1)
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    /// Returns the next token. Once the input is exhausted every call yields
    /// [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token {
        while self.bump_if(|ch| ch.is_whitespace()).is_some() {}

        let Some((idx, ch)) = self.bump() else {
            let end = self.input.len();
            return self.token(TokenKind::Eof, end);
        };

        match ch {
            '=' => {
                if self.bump_if(|ch| ch == '=').is_some() {
                    self.token(TokenKind::Equal, idx)
                } else {
                    self.token(TokenKind::Assign, idx)
                }
            }
            '!' => {
                if self.bump_if(|ch| ch == '=').is_some() {
                    self.token(TokenKind::NotEqual, idx)
                } else {
                    self.token(TokenKind::Bang, idx)
                }
            }
            '+' => self.token(TokenKind::Plus, idx),
            '-' => self.token(TokenKind::Minus, idx),
            '*' => self.token(TokenKind::Asterisk, idx),
            '/' => self.token(TokenKind::Slash, idx),
            '<' => self.token(TokenKind::LessThan, idx),
            '>' => self.token(TokenKind::GreaterThan, idx),
            ',' => self.token(TokenKind::Comma, idx),
            ':' => self.token(TokenKind::Colon, idx),
            ';' => self.token(TokenKind::SemiColon, idx),
            '(' => self.token(TokenKind::LParen, idx),
            ')' => self.token(TokenKind::RParen, idx),
            '{' => self.token(TokenKind::LBrace, idx),
            '}' => self.token(TokenKind::RBrace, idx),
            '[' => self.token(TokenKind::LBracket, idx),
            ']' => self.token(TokenKind::RBracket, idx),
            '"' => self.read_string(idx),
            c if Tokenizer::is_letter(c) => self.read_identifier(idx),
            c if c.is_ascii_digit() => self.read_number(idx),
            _ => self.token(TokenKind::Illegal(ch.to_string().into()), idx),
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.bump_if(Self::is_letter).is_some() {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        let kind = keywords(ident).unwrap_or_else(|| TokenKind::Ident(ident.into()));
        self.token(kind, start)
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.bump_if(|ch| ch.is_ascii_digit()).is_some() {}

        let end = self.next_idx();
        let digits = &self.input[start..end];
        self.token(TokenKind::Int(digits.into()), start)
    }

    fn read_string(&mut self, start: usize) -> Token {
        // Line and column of the opening quote, the string may span lines.
        let (line, column) = self.position_of(start);
        let input = self.input;
        let kind = loop {
            match self.bump() {
                Some((end, '"')) => break TokenKind::String(input[start + 1..end].into()),
                None => break TokenKind::Illegal("unterminated string".into()),
                _ => {}
            }
        };

        Token {
            kind,
            start,
            end: self.next_idx(),
            line,
            column,
        }
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Token {
        let (line, column) = self.position_of(start);
        Token {
            kind,
            start,
            end: self.next_idx(),
            line,
            column,
        }
    }

    fn position_of(&self, idx: usize) -> (usize, usize) {
        let column = self.input[self.line_start..idx].chars().count() + 1;
        (self.line, column)
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.iter.next();
        if let Some((idx, '\n')) = next {
            self.line += 1;
            self.line_start = idx + 1;
        }
        next
    }

    fn bump_if(&mut self, predicate: impl Fn(char) -> bool) -> Option<(usize, char)> {
        match self.iter.peek() {
            Some(&(_, ch)) if predicate(ch) => self.bump(),
            _ => None,
        }
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => None,
            _ => Some(token),
        }
    }
}
