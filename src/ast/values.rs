//! Leaf values of the syntax tree.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::Expression;

/// A terminal value inside an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(NumberValue),
    Boolean(BooleanValue),
    String(StringValue),
    Literal(LiteralValue),
    Parameter(ParameterValue),
    Placeholder,
    Function(FunctionValue),
    /// Zero-argument builtin rendered without parentheses,
    /// e.g. `CURRENT_UTCTIMESTAMP`.
    FieldFunction(String),
    List(ListValue),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => v.fmt(f),
            Value::Boolean(v) => v.fmt(f),
            Value::String(v) => v.fmt(f),
            Value::Literal(v) => v.fmt(f),
            Value::Parameter(v) => v.fmt(f),
            Value::Placeholder => f.write_str("?"),
            Value::Function(v) => v.fmt(f),
            Value::FieldFunction(name) => f.write_str(name),
            Value::List(v) => v.fmt(f),
        }
    }
}

/// Numeric literal, coerced to a double at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberValue(pub f64);

impl NumberValue {
    pub fn new(text: &str) -> Self {
        Self(text.parse().unwrap_or(0.0))
    }
}

impl fmt::Display for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Integral values print without a fractional part, the way a
        // dynamically typed number would.
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Tri-state boolean: `TRUE`, `FALSE`, or `NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanValue(pub Option<bool>);

impl BooleanValue {
    pub fn new(text: &str) -> Self {
        if text.eq_ignore_ascii_case("true") {
            Self(Some(true))
        } else if text.eq_ignore_ascii_case("false") {
            Self(Some(false))
        } else {
            Self(None)
        }
    }
}

impl fmt::Display for BooleanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.0 {
            Some(true) => "TRUE",
            Some(false) => "FALSE",
            None => "NULL",
        })
    }
}

/// Which quote character delimited a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStyle {
    Single,
    Double,
}

/// String literal, possibly a dotted chain (`'a'."b"`). Parts store the
/// unquoted content; single-quoted rendering re-doubles embedded quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringValue {
    pub parts: Vec<String>,
    pub quote: QuoteStyle,
}

impl StringValue {
    pub fn new(part: impl Into<String>, quote: QuoteStyle) -> Self {
        Self {
            parts: vec![part.into()],
            quote,
        }
    }

    pub fn push(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self
            .parts
            .iter()
            .map(|p| match self.quote {
                QuoteStyle::Single => format!("'{}'", escape_single(p)),
                QuoteStyle::Double => format!("\"{p}\""),
            })
            .collect();
        f.write_str(&quoted.join("."))
    }
}

/// Re-double single quotes that are not already backslash-escaped.
fn escape_single(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '\'' => out.push_str("''"),
            _ => out.push(c),
        }
    }
    out
}

/// Identifier, possibly dotted (`schema.table.column`). `dbl_quote`
/// records that a trailing part arrived double-quoted, in which case all
/// parts after the first render quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralValue {
    pub parts: Vec<String>,
    pub dbl_quote: bool,
}

impl LiteralValue {
    pub fn new(part: impl Into<String>) -> Self {
        Self {
            parts: vec![part.into()],
            dbl_quote: false,
        }
    }

    /// A name that arrived double-quoted, such as `"the table"`.
    pub fn quoted(part: impl Into<String>) -> Self {
        Self {
            parts: vec![part.into()],
            dbl_quote: true,
        }
    }

    pub fn push(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }

    pub fn push_quoted(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
        self.dbl_quote = true;
    }

    /// Render, backtick-quoting every part when asked.
    pub fn render(&self, backtick: bool) -> String {
        if backtick {
            format!("`{}`", self.parts.join("`.`"))
        } else {
            self.parts
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    if i > 0 && self.dbl_quote {
                        format!("\"{p}\"")
                    } else {
                        p.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(".")
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Named parameter, `$name` or `$name:type`. The stored name excludes
/// the `$` sigil.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub name: String,
}

impl ParameterValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 1-based position for conventionally numbered parameters such as
    /// `$p1`, `$p2`. `None` when the name is not of that shape.
    pub fn position(&self) -> Option<usize> {
        self.name.get(1..)?.parse().ok()
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

/// Function call. `udf` distinguishes user-defined names from the builtin
/// aggregate set; `args` is `None` for an empty call like `now()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionValue {
    pub name: String,
    pub args: Option<ArgumentList>,
    pub udf: bool,
}

impl FunctionValue {
    pub fn new(name: &str, args: Option<ArgumentList>, udf: bool) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            args,
            udf,
        }
    }
}

impl fmt::Display for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if let Some(args) = &self.args {
            args.fmt(f)?;
        }
        f.write_str(")")
    }
}

/// Comma-separated expression list, with an optional `DISTINCT` prefix
/// inside aggregate calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentList {
    pub args: Vec<Expression>,
    pub distinct: bool,
}

impl ArgumentList {
    pub fn new(args: Vec<Expression>) -> Self {
        Self {
            args,
            distinct: false,
        }
    }

    pub fn distinct(args: Vec<Expression>) -> Self {
        Self {
            args,
            distinct: true,
        }
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        let rendered: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        f.write_str(&rendered.join(", "))
    }
}

/// Parenthesized value list, the right-hand side of `IN (1, 2, 3)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListValue(pub Vec<Expression>);

impl fmt::Display for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|a| a.to_string()).collect();
        write!(f, "({})", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_number_integral_prints_without_fraction() {
        assert_eq!(NumberValue::new("42").to_string(), "42");
        assert_eq!(NumberValue::new("-5").to_string(), "-5");
        assert_eq!(NumberValue::new("+2").to_string(), "2");
    }

    #[test]
    fn test_number_fractional_prints_as_float() {
        assert_eq!(NumberValue::new("1.5").to_string(), "1.5");
    }

    #[test]
    fn test_boolean_render() {
        assert_eq!(BooleanValue::new("true").to_string(), "TRUE");
        assert_eq!(BooleanValue::new("NULL").to_string(), "NULL");
    }

    #[test]
    fn test_string_requotes_embedded_quote() {
        let v = StringValue::new("it's", QuoteStyle::Single);
        assert_eq!(v.to_string(), "'it''s'");
    }

    #[test]
    fn test_string_double_quoted() {
        let v = StringValue::new("col name", QuoteStyle::Double);
        assert_eq!(v.to_string(), "\"col name\"");
    }

    #[test]
    fn test_literal_dotted_render() {
        let mut lit = LiteralValue::new("schema");
        lit.push("table");
        assert_eq!(lit.to_string(), "schema.table");
        assert_eq!(lit.render(true), "`schema`.`table`");
    }

    #[test]
    fn test_literal_quoted_tail() {
        let mut lit = LiteralValue::new("t");
        lit.push_quoted("weird name");
        assert_eq!(lit.to_string(), "t.\"weird name\"");
    }

    #[test]
    fn test_parameter_position() {
        assert_eq!(ParameterValue::new("p3").position(), Some(3));
        assert_eq!(ParameterValue::new("age").position(), None);
        assert_eq!(ParameterValue::new("age:number").position(), None);
    }
}
