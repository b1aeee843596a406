//! Recursive-descent parser over the token stream.

mod expressions;
mod statements;
#[cfg(test)]
mod tests;

use crate::ast::Statement;
use crate::error::{SquealError, SquealResult};
use crate::lexer::{tokenize, TokenizeOptions};
use crate::token::{Token, TokenKind};

/// Tokenize and parse a query string.
pub fn parse(sql: &str) -> SquealResult<Statement> {
    let tokens = tokenize(sql, &TokenizeOptions::default())?;
    parse_tokens(&tokens)
}

/// Parse an already-tokenized stream. The stream must not contain
/// whitespace tokens; a trailing EOF sentinel is optional.
pub fn parse_tokens(tokens: &[Token]) -> SquealResult<Statement> {
    let mut parser = Parser::new(tokens);
    let stmt = parser.parse_statement()?;
    parser.expect(TokenKind::Eof)?;
    Ok(stmt)
}

pub(crate) struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Stand-in when the caller's slice lacks the EOF sentinel.
    eof: Token,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let line = tokens.last().map_or(1, |t| t.line);
        let offset = tokens.last().map_or(0, |t| t.offset + t.text.len());
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, "", line, offset),
        }
    }

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn peek_at(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    /// Consume and return the current token.
    pub(crate) fn bump(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> SquealResult<Token> {
        if self.peek_kind() == kind {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&[kind]))
        }
    }

    /// Build a parse error naming the token kinds that were acceptable.
    pub(crate) fn unexpected(&self, expected: &[TokenKind]) -> SquealError {
        let tok = self.peek();
        SquealError::Parse {
            kind: tok.kind,
            text: tok.text.clone(),
            line: tok.line,
            expected: expected.to_vec(),
        }
    }
}
