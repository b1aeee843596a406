//! Error types for squeal.

use crate::token::TokenKind;
use thiserror::Error;

/// The error type for tokenizing and parsing.
///
/// Both kinds are fatal: there is no partial tree and no recovery path.
/// Callers should treat either as "input is not valid query text".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SquealError {
    /// No lexical rule matched at the current scan position.
    #[error("nothing consumed at line {line}, stopped at '{preview}'")]
    Lex { line: u32, preview: String },

    /// The grammar has no valid continuation for the current token.
    #[error("unexpected {kind} '{text}' at line {line}, expected one of: {}", expected_list(.expected))]
    Parse {
        kind: TokenKind,
        text: String,
        line: u32,
        /// Token kinds that would have been accepted at this point.
        expected: Vec<TokenKind>,
    },
}

impl SquealError {
    /// Create a lex error with a preview of the unconsumed input, cut to
    /// at most 30 bytes on a character boundary.
    pub fn lex(line: u32, rest: &str) -> Self {
        let end = rest
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .take_while(|&e| e <= 30)
            .last()
            .unwrap_or(0);
        Self::Lex {
            line,
            preview: rest[..end].to_string(),
        }
    }
}

fn expected_list(expected: &[TokenKind]) -> String {
    expected
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for squeal operations.
pub type SquealResult<T> = Result<T, SquealError>;
