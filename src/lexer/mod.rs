//! Tokenizer.
//!
//! Scans the source left to right, trying the rule categories in a fixed
//! order at each position and taking the first match. After the scan a
//! single post-pass reclassifies `*` tokens: a star is the wildcard only
//! when the next token is a separator or `FROM`, otherwise it is the
//! multiplication operator.

mod rules;

use crate::error::{SquealError, SquealResult};
use crate::token::{Token, TokenKind};
use rules::ScanMatch;

/// Tokenizer knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizeOptions {
    /// Emit WHITESPACE tokens instead of discarding them. Off by default;
    /// the parser expects a stream without them.
    pub preserve_whitespace: bool,
}

/// Tokenize `sql` into a stream terminated by an EOF sentinel.
///
/// Fails with [`SquealError::Lex`] when no rule matches at some position.
pub fn tokenize(sql: &str, opts: &TokenizeOptions) -> SquealResult<Vec<Token>> {
    Lexer::new(sql, opts).run()
}

/// First-match-wins rule order. Keywords come first so `SELECT` never
/// lexes as an identifier; the signed-number rule precedes the additive
/// operators; the catch-all identifier rule is last.
const RULES: &[fn(&str) -> Option<ScanMatch>] = &[
    rules::keyword,
    rules::star,
    rules::boolean,
    rules::builtin_function,
    rules::window_extension,
    rules::sort_order,
    rules::separator,
    rules::operator,
    rules::number,
    rules::math,
    rules::dot,
    rules::conditional,
    rules::between,
    rules::sub_select_op,
    rules::sub_select_unary_op,
    rules::string,
    rules::parameter,
    rules::parens,
    rules::whitespace,
    rules::with_primary_key,
    rules::field_function,
    rules::placeholder,
    rules::literal,
];

struct Lexer<'a> {
    src: &'a str,
    preserve_whitespace: bool,
    tokens: Vec<Token>,
    line: u32,
    offset: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str, opts: &TokenizeOptions) -> Self {
        Self {
            src,
            preserve_whitespace: opts.preserve_whitespace,
            tokens: Vec::new(),
            line: 1,
            offset: 0,
        }
    }

    fn run(mut self) -> SquealResult<Vec<Token>> {
        while self.offset < self.src.len() {
            let chunk = &self.src[self.offset..];
            let m = RULES
                .iter()
                .find_map(|rule| rule(chunk))
                .ok_or_else(|| SquealError::lex(self.line, chunk))?;
            debug_assert!(m.consumed > 0, "rule matched without consuming input");
            for (kind, text) in m.emits {
                if kind == TokenKind::Whitespace {
                    let newlines = text.matches('\n').count() as u32;
                    if self.preserve_whitespace {
                        self.push(kind, text);
                    }
                    self.line += newlines;
                } else {
                    self.push(kind, text);
                }
            }
            self.offset += m.consumed;
        }
        self.push(TokenKind::Eof, String::new());
        self.reclassify_stars();
        Ok(self.tokens)
    }

    fn push(&mut self, kind: TokenKind, text: String) {
        self.tokens.push(Token::new(kind, text, self.line, self.offset));
    }

    /// `*` is multiplication unless the token after it is a separator or
    /// `FROM`. The EOF sentinel guarantees every star has a successor.
    fn reclassify_stars(&mut self) {
        for i in 0..self.tokens.len() {
            if self.tokens[i].kind != TokenKind::Star {
                continue;
            }
            let next = self.tokens.get(i + 1).map(|t| t.kind);
            if !matches!(next, Some(TokenKind::Separator | TokenKind::From)) {
                self.tokens[i].kind = TokenKind::MathMulti;
            }
        }
    }
}
