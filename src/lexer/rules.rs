//! Lexical rule categories.
//!
//! Each rule inspects the unconsumed suffix of the source and, on a hit,
//! reports how many bytes it consumed and which tokens to emit. The lexer
//! tries the rules in a fixed order; the first hit wins, which is what
//! disambiguates overlapping categories (keywords before identifiers, `*`
//! before the multiplication operator, `>=` before `>`, and so on).

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1, take_while_m_n},
    character::complete::{char, digit1, one_of},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::token::TokenKind;

/// Result of one rule application: bytes consumed plus tokens to emit.
/// The window-extension rule is the only one emitting more than a single
/// token; whitespace emission is decided by the lexer, not the rule.
pub struct ScanMatch {
    pub consumed: usize,
    pub emits: Vec<(TokenKind, String)>,
}

impl ScanMatch {
    fn one(consumed: usize, kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            consumed,
            emits: vec![(kind, text.into())],
        }
    }
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("SELECT", TokenKind::Select),
    ("DELETE", TokenKind::Delete),
    ("UPDATE", TokenKind::Update),
    ("UPSERT", TokenKind::Upsert),
    ("INSERT", TokenKind::Insert),
    ("INTO", TokenKind::Into),
    ("VALUES", TokenKind::Values),
    ("SET", TokenKind::Set),
    ("DISTINCT", TokenKind::Distinct),
    ("FROM", TokenKind::From),
    ("WHERE", TokenKind::Where),
    ("GROUP", TokenKind::Group),
    ("ORDER", TokenKind::Order),
    ("BY", TokenKind::By),
    ("HAVING", TokenKind::Having),
    ("LIMIT", TokenKind::Limit),
    ("JOIN", TokenKind::Join),
    ("LEFT", TokenKind::Left),
    ("RIGHT", TokenKind::Right),
    ("INNER", TokenKind::Inner),
    ("OUTER", TokenKind::Outer),
    ("ON", TokenKind::On),
    ("AS", TokenKind::As),
    ("CASE", TokenKind::Case),
    ("WHEN", TokenKind::When),
    ("THEN", TokenKind::Then),
    ("ELSE", TokenKind::Else),
    ("END", TokenKind::End),
    ("UNION", TokenKind::Union),
    ("ALL", TokenKind::All),
    ("OFFSET", TokenKind::Offset),
    ("FETCH", TokenKind::Fetch),
    ("ROW", TokenKind::Row),
    ("ROWS", TokenKind::Rows),
    ("ONLY", TokenKind::Only),
    ("NEXT", TokenKind::Next),
    ("FIRST", TokenKind::First),
];

const FUNCTIONS: &[&str] = &[
    "AVG",
    "COUNT",
    "MIN",
    "MAX",
    "SUM",
    "HASH_SHA256",
    "TO_BINARY",
    "UPPER",
    "LOWER",
];

/// Multi-character forms must precede their prefixes.
const OPERATORS: &[&str] = &[
    "=", "!=", ">=", ">", "<=", "<>", "<", "LIKE", "NOT LIKE", "ILIKE", "NOT ILIKE", "IS NOT",
    "IS", "REGEXP", "NOT REGEXP",
];

const MATH: &[&str] = &["+", "-", "||", "&&"];
const MATH_MULTI: &[&str] = &["/", "*"];
const CONDITIONALS: &[&str] = &["AND", "OR"];
const BETWEENS: &[&str] = &["BETWEEN", "NOT BETWEEN"];
const SUB_SELECT_OPS: &[&str] = &["IN", "NOT IN", "ANY", "ALL", "SOME"];
const SUB_SELECT_UNARY_OPS: &[&str] = &["EXISTS"];
const SORT_ORDERS: &[&str] = &["ASC", "DESC"];
const BOOLEANS: &[&str] = &["TRUE", "FALSE", "NULL"];
const FIELD_FUNCTIONS: &[&str] = &["CURRENT_UTCTIMESTAMP"];

const LITERAL_TYPES: &[&str] = &["number", "float", "string", "date", "boolean"];

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Case-insensitive match of `word`, returning the slice as it appears in
/// the input. Entries ending in a word character are boundary-checked so
/// they never match inside a longer identifier (`IN` vs `INDEX`).
fn match_word<'a>(chunk: &'a str, word: &str) -> Option<&'a str> {
    let r: IResult<&str, &str> = tag_no_case(word)(chunk);
    let (rest, matched) = r.ok()?;
    let bounded = word.chars().last().is_some_and(is_word_char);
    if bounded && rest.chars().next().is_some_and(is_word_char) {
        return None;
    }
    Some(matched)
}

fn match_list<'a>(chunk: &'a str, entries: &[&str]) -> Option<&'a str> {
    entries.iter().find_map(|w| match_word(chunk, w))
}

/// Byte length of a `:type` suffix at the start of `chunk`, when one of
/// the known type names follows the colon. Identifier annotations fold
/// case; parameter annotations do not.
fn type_suffix(chunk: &str, fold_case: bool) -> Option<usize> {
    let rest = chunk.strip_prefix(':')?;
    LITERAL_TYPES.iter().find_map(|t| {
        let head = rest.get(..t.len())?;
        let hit = if fold_case {
            head.eq_ignore_ascii_case(t)
        } else {
            head == *t
        };
        hit.then(|| 1 + t.len())
    })
}

fn from_list(chunk: &str, entries: &[&str], kind: TokenKind) -> Option<ScanMatch> {
    match_list(chunk, entries).map(|m| ScanMatch::one(m.len(), kind, m))
}

pub fn keyword(chunk: &str) -> Option<ScanMatch> {
    KEYWORDS
        .iter()
        .find_map(|(w, k)| match_word(chunk, w).map(|m| ScanMatch::one(m.len(), *k, m)))
}

pub fn star(chunk: &str) -> Option<ScanMatch> {
    chunk
        .starts_with('*')
        .then(|| ScanMatch::one(1, TokenKind::Star, "*"))
}

pub fn boolean(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, BOOLEANS, TokenKind::Boolean)
}

pub fn builtin_function(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, FUNCTIONS, TokenKind::Function)
}

/// Vendor streaming-window suffix `.win:length` / `.win:time`, emitted as a
/// WINDOW + WINDOW_FUNCTION pair. Must run before the DOT rule.
pub fn window_extension(chunk: &str) -> Option<ScanMatch> {
    let r: IResult<&str, (char, &str, char, &str)> = tuple((
        char('.'),
        tag_no_case("win"),
        char(':'),
        alt((tag_no_case("length"), tag_no_case("time"))),
    ))(chunk);
    let (rest, (_, win, _, func)) = r.ok()?;
    Some(ScanMatch {
        consumed: chunk.len() - rest.len(),
        emits: vec![
            (TokenKind::Window, win.to_string()),
            (TokenKind::WindowFunction, func.to_string()),
        ],
    })
}

pub fn sort_order(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, SORT_ORDERS, TokenKind::Direction)
}

pub fn separator(chunk: &str) -> Option<ScanMatch> {
    chunk
        .starts_with(',')
        .then(|| ScanMatch::one(1, TokenKind::Separator, ","))
}

pub fn operator(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, OPERATORS, TokenKind::Operator)
}

/// Signed numeric literal. Runs before the additive-operator rule, so
/// `1 +2` lexes as two numbers; that is what feeds the whitespace-list
/// compatibility construct downstream.
pub fn number(chunk: &str) -> Option<ScanMatch> {
    let r: IResult<&str, &str> = recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(chunk);
    let (_, m) = r.ok()?;
    Some(ScanMatch::one(m.len(), TokenKind::Number, m))
}

pub fn math(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, MATH, TokenKind::Math)
        .or_else(|| from_list(chunk, MATH_MULTI, TokenKind::MathMulti))
}

pub fn dot(chunk: &str) -> Option<ScanMatch> {
    chunk
        .starts_with('.')
        .then(|| ScanMatch::one(1, TokenKind::Dot, "."))
}

pub fn conditional(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, CONDITIONALS, TokenKind::Conditional)
}

pub fn between(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, BETWEENS, TokenKind::Between)
}

pub fn sub_select_op(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, SUB_SELECT_OPS, TokenKind::SubSelectOp)
}

pub fn sub_select_unary_op(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, SUB_SELECT_UNARY_OPS, TokenKind::SubSelectUnaryOp)
}

/// String literals. Single-quoted first: a doubled `''` collapses to one
/// quote in the token text, backslash escapes pass through untouched.
/// Double-quoted content is kept raw (escaped `\"` permitted, no doubling).
pub fn string(chunk: &str) -> Option<ScanMatch> {
    single_quoted(chunk).or_else(|| double_quoted(chunk))
}

fn single_quoted(chunk: &str) -> Option<ScanMatch> {
    let mut rest = chunk.strip_prefix('\'')?;
    let mut content = String::new();
    loop {
        let c = rest.chars().next()?;
        rest = &rest[c.len_utf8()..];
        match c {
            '\\' => {
                let escaped = rest.chars().next()?;
                rest = &rest[escaped.len_utf8()..];
                content.push('\\');
                content.push(escaped);
            }
            '\'' if rest.starts_with('\'') => {
                rest = &rest[1..];
                content.push('\'');
            }
            '\'' => {
                return Some(ScanMatch::one(
                    chunk.len() - rest.len(),
                    TokenKind::String,
                    content,
                ))
            }
            _ => content.push(c),
        }
    }
}

fn double_quoted(chunk: &str) -> Option<ScanMatch> {
    let mut rest = chunk.strip_prefix('"')?;
    let mut content = String::new();
    loop {
        let c = rest.chars().next()?;
        rest = &rest[c.len_utf8()..];
        match c {
            '\\' => {
                let escaped = rest.chars().next()?;
                rest = &rest[escaped.len_utf8()..];
                content.push('\\');
                content.push(escaped);
            }
            '"' => {
                return Some(ScanMatch::one(
                    chunk.len() - rest.len(),
                    TokenKind::DblString,
                    content,
                ))
            }
            _ => content.push(c),
        }
    }
}

/// `$name` / `$name:type` parameter. Names are lowercase; the token text
/// keeps the type suffix but drops the `$`.
pub fn parameter(chunk: &str) -> Option<ScanMatch> {
    let body = chunk.strip_prefix('$')?;
    let r: IResult<&str, &str> =
        take_while1(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')(body);
    let (rest, name) = r.ok()?;
    let len = name.len() + type_suffix(rest, false).unwrap_or(0);
    Some(ScanMatch::one(
        1 + len,
        TokenKind::Parameter,
        &body[..len],
    ))
}

pub fn parens(chunk: &str) -> Option<ScanMatch> {
    match chunk.as_bytes().first()? {
        b'(' => Some(ScanMatch::one(1, TokenKind::LeftParen, "(")),
        b')' => Some(ScanMatch::one(1, TokenKind::RightParen, ")")),
        _ => None,
    }
}

/// Whitespace is always consumed; whether the token reaches the output
/// stream is the lexer's call. Newline accounting also happens there.
pub fn whitespace(chunk: &str) -> Option<ScanMatch> {
    let r: IResult<&str, &str> =
        take_while1(|c: char| c == ' ' || c == '\n' || c == '\r')(chunk);
    let (_, m) = r.ok()?;
    Some(ScanMatch::one(m.len(), TokenKind::Whitespace, m))
}

pub fn with_primary_key(chunk: &str) -> Option<ScanMatch> {
    match_word(chunk, "WITH PRIMARY KEY")
        .map(|m| ScanMatch::one(m.len(), TokenKind::WithPrimaryKey, m))
}

pub fn field_function(chunk: &str) -> Option<ScanMatch> {
    from_list(chunk, FIELD_FUNCTIONS, TokenKind::FieldFunction)
}

pub fn placeholder(chunk: &str) -> Option<ScanMatch> {
    chunk
        .starts_with('?')
        .then(|| ScanMatch::one(1, TokenKind::Placeholder, "?"))
}

/// Catch-all identifier: optionally backtick-quoted, optionally suffixed
/// with a `:type` annotation. The token text excludes the backticks but
/// keeps the annotation.
pub fn literal(chunk: &str) -> Option<ScanMatch> {
    let mut rest = chunk;
    if let Some(stripped) = rest.strip_prefix('`') {
        rest = stripped;
    }
    let r: IResult<&str, &str> = recognize(pair(
        take_while_m_n(1, 1, |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(is_word_char),
    ))(rest);
    let (mut after, name) = r.ok()?;
    let mut text = name.to_string();
    if let Some(n) = type_suffix(after, true) {
        text.push_str(&after[..n]);
        after = &after[n..];
    }
    if let Some(stripped) = after.strip_prefix('`') {
        after = stripped;
    }
    Some(ScanMatch::one(
        chunk.len() - after.len(),
        TokenKind::Literal,
        text,
    ))
}
