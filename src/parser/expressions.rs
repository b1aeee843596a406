//! Expression productions: precedence climbing plus value terminals.

use crate::ast::*;
use crate::error::SquealResult;
use crate::token::TokenKind;

use super::Parser;

/// Token kinds that can start a value terminal. Used both for dispatch
/// and for the expected-set of terminal-position parse errors.
const VALUE_START: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::Boolean,
    TokenKind::String,
    TokenKind::DblString,
    TokenKind::Literal,
    TokenKind::Function,
    TokenKind::Parameter,
    TokenKind::Placeholder,
    TokenKind::FieldFunction,
];

// Binding powers, weakest first. OR binds weaker than AND; comparison
// operators sit between the logical connectives and BETWEEN; membership
// operators outrank BETWEEN; additive math outranks those and
// multiplicative math binds tightest.
const BP_OR: u8 = 1;
const BP_AND: u8 = 2;
const BP_COMPARE: u8 = 3;
const BP_BETWEEN: u8 = 4;
const BP_MEMBERSHIP: u8 = 5;
const BP_ADDITIVE: u8 = 6;
const BP_MULTIPLICATIVE: u8 = 7;

impl Parser<'_> {
    pub(crate) fn parse_expression(&mut self) -> SquealResult<Expression> {
        self.parse_expr_bp(BP_OR)
    }

    fn infix_bp(&self) -> Option<u8> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Conditional => {
                if tok.text.eq_ignore_ascii_case("or") {
                    Some(BP_OR)
                } else {
                    Some(BP_AND)
                }
            }
            TokenKind::Operator => Some(BP_COMPARE),
            TokenKind::Between => Some(BP_BETWEEN),
            TokenKind::SubSelectOp | TokenKind::All => Some(BP_MEMBERSHIP),
            TokenKind::Math => Some(BP_ADDITIVE),
            TokenKind::MathMulti => Some(BP_MULTIPLICATIVE),
            _ => None,
        }
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> SquealResult<Expression> {
        let mut left = self.parse_prefix()?;
        loop {
            let bp = match self.infix_bp() {
                Some(bp) if bp >= min_bp => bp,
                _ => break,
            };
            left = match self.peek_kind() {
                TokenKind::Between => self.parse_between(left)?,
                TokenKind::SubSelectOp | TokenKind::All => {
                    let op = self.bump().text;
                    let right = self.parse_membership_rhs()?;
                    Expression::op(op, left, right)
                }
                _ => {
                    // Left-associative: the right side may only bind tighter.
                    let op = self.bump().text;
                    let right = self.parse_expr_bp(bp + 1)?;
                    Expression::op(op, left, right)
                }
            };
        }
        Ok(left)
    }

    /// `expr [NOT] BETWEEN low AND high`. The bounds parse at additive
    /// strength so the separating AND is never swallowed by a bound.
    fn parse_between(&mut self, left: Expression) -> SquealResult<Expression> {
        let op = self.bump().text;
        let low = self.parse_expr_bp(BP_ADDITIVE)?;
        self.expect(TokenKind::Conditional)?;
        let high = self.parse_expr_bp(BP_ADDITIVE)?;
        Ok(Expression::op(
            op,
            left,
            Expression::BetweenBounds(vec![low, high]),
        ))
    }

    /// Right-hand side of IN/ANY/ALL/SOME: a parenthesized subquery or
    /// a parenthesized value list.
    fn parse_membership_rhs(&mut self) -> SquealResult<Expression> {
        self.expect(TokenKind::LeftParen)?;
        if self.peek_kind() == TokenKind::Select {
            let select = self.parse_select_query(true)?;
            self.expect(TokenKind::RightParen)?;
            Ok(Expression::SubSelect(SubSelect {
                select: Box::new(select),
                alias: None,
            }))
        } else {
            let args = self.parse_argument_list()?;
            self.expect(TokenKind::RightParen)?;
            Ok(Expression::Value(Value::List(ListValue(args))))
        }
    }

    fn parse_prefix(&mut self) -> SquealResult<Expression> {
        match self.peek_kind() {
            TokenKind::SubSelectUnaryOp => {
                let op = self.bump().text;
                self.expect(TokenKind::LeftParen)?;
                let select = self.parse_select_query(true)?;
                self.expect(TokenKind::RightParen)?;
                Ok(Expression::unary(
                    op,
                    Expression::SubSelect(SubSelect {
                        select: Box::new(select),
                        alias: None,
                    }),
                ))
            }
            TokenKind::LeftParen => {
                self.bump();
                if self.peek_kind() == TokenKind::Select {
                    let select = self.parse_select_query(true)?;
                    self.expect(TokenKind::RightParen)?;
                    Ok(Expression::SubSelect(SubSelect {
                        select: Box::new(select),
                        alias: None,
                    }))
                } else {
                    // Grouping parens are not recorded; operation nodes
                    // re-parenthesize on render.
                    let expr = self.parse_expr_bp(BP_OR)?;
                    self.expect(TokenKind::RightParen)?;
                    Ok(expr)
                }
            }
            TokenKind::Case => self.parse_case(),
            _ => self.parse_value_expression(),
        }
    }

    fn parse_case(&mut self) -> SquealResult<Expression> {
        self.expect(TokenKind::Case)?;
        let mut whens = Vec::new();
        while self.eat(TokenKind::When) {
            let condition = self.parse_expression()?;
            self.expect(TokenKind::Then)?;
            let result = self.parse_expression()?;
            whens.push(CaseWhen { condition, result });
        }
        if whens.is_empty() {
            return Err(self.unexpected(&[TokenKind::When]));
        }
        let else_result = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        self.expect(TokenKind::End)?;
        Ok(Expression::Case { whens, else_result })
    }

    /// One value terminal, or a run of adjacent terminals collected into
    /// a whitespace list.
    fn parse_value_expression(&mut self) -> SquealResult<Expression> {
        let first = self.parse_value()?;
        if !self.starts_value() {
            return Ok(Expression::Value(first));
        }
        let mut values = vec![first];
        while self.starts_value() {
            values.push(self.parse_value()?);
        }
        Ok(Expression::WhitespaceList(values))
    }

    fn starts_value(&self) -> bool {
        VALUE_START.contains(&self.peek_kind())
    }

    pub(crate) fn parse_value(&mut self) -> SquealResult<Value> {
        match self.peek_kind() {
            TokenKind::Number => Ok(Value::Number(NumberValue::new(&self.bump().text))),
            TokenKind::Boolean => Ok(Value::Boolean(BooleanValue::new(&self.bump().text))),
            TokenKind::String => self.parse_string_value(QuoteStyle::Single),
            TokenKind::DblString => self.parse_string_value(QuoteStyle::Double),
            TokenKind::Parameter => Ok(Value::Parameter(ParameterValue::new(self.bump().text))),
            TokenKind::Placeholder => {
                self.bump();
                Ok(Value::Placeholder)
            }
            TokenKind::FieldFunction => {
                Ok(Value::FieldFunction(self.bump().text.to_ascii_uppercase()))
            }
            TokenKind::Function => {
                let name = self.bump().text;
                Ok(Value::Function(self.parse_call(&name, false)?))
            }
            TokenKind::Literal => {
                if self.peek_at(1).kind == TokenKind::LeftParen {
                    let name = self.bump().text;
                    Ok(Value::Function(self.parse_call(&name, true)?))
                } else {
                    Ok(Value::Literal(self.parse_literal_value()?))
                }
            }
            _ => Err(self.unexpected(VALUE_START)),
        }
    }

    fn parse_call(&mut self, name: &str, udf: bool) -> SquealResult<FunctionValue> {
        self.expect(TokenKind::LeftParen)?;
        let args = if self.peek_kind() == TokenKind::RightParen {
            None
        } else {
            let distinct = self.eat(TokenKind::Distinct);
            let args = self.parse_argument_list()?;
            Some(if distinct {
                ArgumentList::distinct(args)
            } else {
                ArgumentList::new(args)
            })
        };
        self.expect(TokenKind::RightParen)?;
        Ok(FunctionValue::new(name, args, udf))
    }

    /// String, possibly continued as a dotted chain; any continuation
    /// switches the whole chain to double-quote rendering.
    fn parse_string_value(&mut self, quote: QuoteStyle) -> SquealResult<Value> {
        let mut value = StringValue::new(self.bump().text, quote);
        while self.peek_kind() == TokenKind::Dot && self.peek_at(1).kind == TokenKind::DblString {
            self.bump();
            value.push(self.bump().text);
            value.quote = QuoteStyle::Double;
        }
        Ok(Value::String(value))
    }
}
