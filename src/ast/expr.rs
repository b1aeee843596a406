//! Expression nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::{SubSelect, Value};

/// An expression tree node. Binary operations always render fully
/// parenthesized, so precedence survives a round trip through text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Op {
        op: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    UnaryOp {
        op: String,
        operand: Box<Expression>,
    },
    /// The `low AND high` pair on the right of `BETWEEN`.
    BetweenBounds(Vec<Expression>),
    Case {
        whens: Vec<CaseWhen>,
        else_result: Option<Box<Expression>>,
    },
    SubSelect(SubSelect),
    /// Adjacent terminal values with no operator between them, kept for
    /// compatibility with interval-style text such as `INTERVAL 1 DAY`.
    WhitespaceList(Vec<Value>),
    Value(Value),
}

impl Expression {
    /// Binary operation; the operator text is uppercased so `like`
    /// and `LIKE` build identical trees.
    pub fn op(op: impl Into<String>, left: Expression, right: Expression) -> Self {
        Expression::Op {
            op: op.into().to_ascii_uppercase(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: impl Into<String>, operand: Expression) -> Self {
        Expression::UnaryOp {
            op: op.into().to_ascii_uppercase(),
            operand: Box::new(operand),
        }
    }

    pub fn value(value: Value) -> Self {
        Expression::Value(value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Op { op, left, right } => write!(f, "({left} {op} {right})"),
            Expression::UnaryOp { op, operand } => write!(f, "({op} {operand})"),
            Expression::BetweenBounds(bounds) => {
                let rendered: Vec<String> = bounds.iter().map(|b| b.to_string()).collect();
                f.write_str(&rendered.join(" AND "))
            }
            Expression::Case { whens, else_result } => {
                f.write_str("CASE")?;
                for when in whens {
                    write!(f, " {when}")?;
                }
                if let Some(e) = else_result {
                    write!(f, " ELSE {e}")?;
                }
                f.write_str(" END")
            }
            Expression::SubSelect(sub) => sub.fmt(f),
            Expression::WhitespaceList(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                f.write_str(&rendered.join(" "))
            }
            Expression::Value(v) => v.fmt(f),
        }
    }
}

/// One `WHEN cond THEN result` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub condition: Expression,
    pub result: Expression,
}

impl fmt::Display for CaseWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WHEN {} THEN {}", self.condition, self.result)
    }
}

/// A projected output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub value: FieldValue,
    pub alias: Option<String>,
}

impl Field {
    pub fn star() -> Self {
        Self {
            value: FieldValue::Star,
            alias: None,
        }
    }

    pub fn expr(expr: Expression) -> Self {
        Self {
            value: FieldValue::Expression(expr),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS \"{alias}\"")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Star,
    Expression(Expression),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Star => f.write_str("*"),
            FieldValue::Expression(e) => e.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LiteralValue, NumberValue};
    use pretty_assertions::assert_eq;

    fn lit(name: &str) -> Expression {
        Expression::Value(Value::Literal(LiteralValue::new(name)))
    }

    fn num(n: f64) -> Expression {
        Expression::Value(Value::Number(NumberValue(n)))
    }

    #[test]
    fn test_op_renders_parenthesized() {
        let e = Expression::op("=", lit("a"), num(1.0));
        assert_eq!(e.to_string(), "(a = 1)");
    }

    #[test]
    fn test_nested_ops_keep_grouping() {
        let e = Expression::op(
            "OR",
            Expression::op("AND", Expression::op("=", lit("a"), num(1.0)), lit("b")),
            lit("c"),
        );
        assert_eq!(e.to_string(), "(((a = 1) AND b) OR c)");
    }

    #[test]
    fn test_between_renders_bounds() {
        let e = Expression::op(
            "BETWEEN",
            lit("a"),
            Expression::BetweenBounds(vec![num(1.0), num(10.0)]),
        );
        assert_eq!(e.to_string(), "(a BETWEEN 1 AND 10)");
    }

    #[test]
    fn test_case_with_else() {
        let e = Expression::Case {
            whens: vec![CaseWhen {
                condition: Expression::op(">", lit("a"), num(0.0)),
                result: num(1.0),
            }],
            else_result: Some(Box::new(num(0.0))),
        };
        assert_eq!(e.to_string(), "CASE WHEN (a > 0) THEN 1 ELSE 0 END");
    }

    #[test]
    fn test_field_alias_is_double_quoted() {
        let field = Field::expr(lit("a")).with_alias("total");
        assert_eq!(field.to_string(), "a AS \"total\"");
    }

    #[test]
    fn test_operator_text_is_uppercased() {
        let e = Expression::op("like", lit("a"), lit("b"));
        assert_eq!(e.to_string(), "(a LIKE b)");
    }
}
