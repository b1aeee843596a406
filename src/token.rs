//! Lexeme model: token kinds and positioned tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of lexeme kinds produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Structural keywords
    Select,
    Delete,
    Update,
    Upsert,
    Insert,
    Into,
    Values,
    Set,
    Distinct,
    From,
    Where,
    Group,
    Order,
    By,
    Having,
    Limit,
    Join,
    Left,
    Right,
    Inner,
    Outer,
    On,
    As,
    Case,
    When,
    Then,
    Else,
    End,
    Union,
    All,
    Offset,
    Fetch,
    Row,
    Rows,
    Only,
    Next,
    First,
    // Literals
    Number,
    String,
    DblString,
    Boolean,
    Literal,
    Parameter,
    Placeholder,
    FieldFunction,
    // Punctuation
    LeftParen,
    RightParen,
    Separator,
    Dot,
    Star,
    // Operators
    Math,
    MathMulti,
    Operator,
    Between,
    Conditional,
    SubSelectOp,
    SubSelectUnaryOp,
    // Built-in function names and sort directions
    Function,
    Direction,
    // Vendor extensions
    Window,
    WindowFunction,
    WithPrimaryKey,
    // Only emitted when explicitly requested
    Whitespace,
    // Sentinel, always last
    Eof,
}

impl TokenKind {
    /// Diagnostic name, matching the dialect's grammar vocabulary.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Select => "SELECT",
            TokenKind::Delete => "DELETE",
            TokenKind::Update => "UPDATE",
            TokenKind::Upsert => "UPSERT",
            TokenKind::Insert => "INSERT",
            TokenKind::Into => "INTO",
            TokenKind::Values => "VALUES",
            TokenKind::Set => "SET",
            TokenKind::Distinct => "DISTINCT",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::Group => "GROUP",
            TokenKind::Order => "ORDER",
            TokenKind::By => "BY",
            TokenKind::Having => "HAVING",
            TokenKind::Limit => "LIMIT",
            TokenKind::Join => "JOIN",
            TokenKind::Left => "LEFT",
            TokenKind::Right => "RIGHT",
            TokenKind::Inner => "INNER",
            TokenKind::Outer => "OUTER",
            TokenKind::On => "ON",
            TokenKind::As => "AS",
            TokenKind::Case => "CASE",
            TokenKind::When => "WHEN",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::End => "END",
            TokenKind::Union => "UNION",
            TokenKind::All => "ALL",
            TokenKind::Offset => "OFFSET",
            TokenKind::Fetch => "FETCH",
            TokenKind::Row => "ROW",
            TokenKind::Rows => "ROWS",
            TokenKind::Only => "ONLY",
            TokenKind::Next => "NEXT",
            TokenKind::First => "FIRST",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::DblString => "DBLSTRING",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Literal => "LITERAL",
            TokenKind::Parameter => "PARAMETER",
            TokenKind::Placeholder => "PLACEHOLDER",
            TokenKind::FieldFunction => "FIELD_FUNCTION",
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Dot => "DOT",
            TokenKind::Star => "STAR",
            TokenKind::Math => "MATH",
            TokenKind::MathMulti => "MATH_MULTI",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Between => "BETWEEN",
            TokenKind::Conditional => "CONDITIONAL",
            TokenKind::SubSelectOp => "SUB_SELECT_OP",
            TokenKind::SubSelectUnaryOp => "SUB_SELECT_UNARY_OP",
            TokenKind::Function => "FUNCTION",
            TokenKind::Direction => "DIRECTION",
            TokenKind::Window => "WINDOW",
            TokenKind::WindowFunction => "WINDOW_FUNCTION",
            TokenKind::WithPrimaryKey => "WITH_PRIMARY_KEY",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified, positioned slice of source text.
///
/// Immutable once produced; `line` is 1-based, `offset` is the byte
/// offset of the token's first character in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            offset,
        }
    }
}
