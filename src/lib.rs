//! # squeal — a SQL dialect front end
//!
//! > Text in, tree out, text back.
//!
//! squeal tokenizes a SQL-like dialect (with vendor extensions such as
//! streaming table windows, `UPSERT ... WITH PRIMARY KEY`, `$name`
//! parameters and `?` placeholders), builds a typed syntax tree, and
//! renders that tree back to canonical query text.
//!
//! ## Quick Example
//!
//! ```rust
//! use squeal::prelude::*;
//!
//! let stmt = squeal::parse("SELECT a, b FROM users WHERE id = 1").unwrap();
//! let canonical = stmt.to_string();
//!
//! // Canonical text re-parses to the same tree.
//! assert_eq!(squeal::parse(&canonical).unwrap(), stmt);
//! ```
//!
//! squeal is a front end only: it does not plan, optimize, execute, or
//! semantically validate queries, and it performs no error recovery —
//! any malformed input is a hard [`SquealError`](error::SquealError).

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::lexer::{tokenize, TokenizeOptions};
    pub use crate::parser::{parse, parse_tokens};
    pub use crate::token::{Token, TokenKind};
}

/// Parse a query string into a [`Statement`](ast::Statement) tree.
///
/// # Example
///
/// ```
/// use squeal::ast::Statement;
///
/// let stmt = squeal::parse("DELETE FROM sessions WHERE expired = TRUE").unwrap();
/// assert!(matches!(stmt, Statement::Delete(_)));
/// ```
pub fn parse(input: &str) -> Result<ast::Statement, error::SquealError> {
    parser::parse(input)
}
