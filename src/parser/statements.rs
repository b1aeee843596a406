//! Statement-level productions.

use crate::ast::*;
use crate::error::SquealResult;
use crate::token::TokenKind;

use super::Parser;

impl Parser<'_> {
    pub(crate) fn parse_statement(&mut self) -> SquealResult<Statement> {
        match self.peek_kind() {
            TokenKind::Select => Ok(Statement::Select(self.parse_select_query(true)?)),
            TokenKind::Insert => self.parse_insert(),
            TokenKind::Upsert => self.parse_upsert(),
            TokenKind::Update => self.parse_update(),
            TokenKind::Delete => self.parse_delete(),
            _ => Err(self.unexpected(&[
                TokenKind::Select,
                TokenKind::Insert,
                TokenKind::Upsert,
                TokenKind::Update,
                TokenKind::Delete,
            ])),
        }
    }

    /// A full SELECT with its optional clauses in fixed order: joins,
    /// WHERE, GROUP BY (with HAVING), ORDER BY (with OFFSET/FETCH),
    /// LIMIT, then unions. Union arms may not nest further unions but
    /// do carry their own LIMIT.
    pub(crate) fn parse_select_query(
        &mut self,
        allow_unions: bool,
    ) -> SquealResult<SelectStatement> {
        self.expect(TokenKind::Select)?;
        let distinct = self.eat(TokenKind::Distinct);
        let fields = self.parse_fields()?;
        self.expect(TokenKind::From)?;
        let source = self.parse_source()?;
        let mut stmt = SelectStatement::new(fields, source, distinct);

        while matches!(
            self.peek_kind(),
            TokenKind::Join | TokenKind::Left | TokenKind::Right | TokenKind::Inner
        ) {
            stmt = stmt.with_join(self.parse_join()?);
        }
        if self.eat(TokenKind::Where) {
            stmt = stmt.with_where(self.parse_expression()?);
        }
        if self.eat(TokenKind::Group) {
            self.expect(TokenKind::By)?;
            let mut group = GroupBy::new(self.parse_argument_list()?);
            if self.eat(TokenKind::Having) {
                group = group.with_having(self.parse_expression()?);
            }
            stmt = stmt.with_group(group);
        }
        if self.eat(TokenKind::Order) {
            self.expect(TokenKind::By)?;
            stmt = stmt.with_order(self.parse_order_by()?);
        }
        if self.peek_kind() == TokenKind::Limit {
            stmt = stmt.with_limit(self.parse_limit()?);
        }
        if allow_unions {
            while self.eat(TokenKind::Union) {
                let all = self.eat(TokenKind::All);
                let query = self.parse_select_query(false)?;
                stmt = stmt.with_union(Union { query, all });
            }
        }
        Ok(stmt)
    }

    fn parse_fields(&mut self) -> SquealResult<Vec<Field>> {
        let mut fields = vec![self.parse_field()?];
        while self.eat(TokenKind::Separator) {
            fields.push(self.parse_field()?);
        }
        Ok(fields)
    }

    fn parse_field(&mut self) -> SquealResult<Field> {
        if self.eat(TokenKind::Star) {
            return Ok(Field::star());
        }
        let expr = self.parse_expression()?;
        let mut field = Field::expr(expr);
        if self.eat(TokenKind::As) {
            match self.peek_kind() {
                TokenKind::Literal | TokenKind::DblString => {
                    field = field.with_alias(self.bump().text);
                }
                _ => return Err(self.unexpected(&[TokenKind::Literal, TokenKind::DblString])),
            }
        }
        Ok(field)
    }

    pub(crate) fn parse_source(&mut self) -> SquealResult<Source> {
        match self.peek_kind() {
            TokenKind::LeftParen => {
                self.bump();
                let select = self.parse_select_query(true)?;
                self.expect(TokenKind::RightParen)?;
                let alias = (self.peek_kind() == TokenKind::Literal)
                    .then(|| LiteralValue::new(self.bump().text));
                Ok(Source::SubSelect(SubSelect {
                    select: Box::new(select),
                    alias,
                }))
            }
            TokenKind::Literal | TokenKind::DblString => {
                Ok(Source::Table(self.parse_table(true)?))
            }
            _ => Err(self.unexpected(&[
                TokenKind::LeftParen,
                TokenKind::Literal,
                TokenKind::DblString,
            ])),
        }
    }

    /// Table reference: a (possibly dotted or quoted) name, then at most
    /// one of an alias or a streaming-window suffix. Write targets
    /// (INSERT, UPSERT, UPDATE) take the bare name only.
    fn parse_table(&mut self, allow_suffix: bool) -> SquealResult<Table> {
        let name = match self.peek_kind() {
            TokenKind::DblString => TableName::Quoted(self.bump().text),
            TokenKind::Literal => {
                let lit = self.parse_literal_value()?;
                if allow_suffix && self.eat(TokenKind::Window) {
                    let func = self.expect(TokenKind::WindowFunction)?;
                    self.expect(TokenKind::LeftParen)?;
                    let arg = self.expect(TokenKind::Number)?;
                    self.expect(TokenKind::RightParen)?;
                    return Ok(Table {
                        name: TableName::Literal(lit),
                        suffix: Some(TableSuffix::Window(TableWindow {
                            func: if func.text.eq_ignore_ascii_case("time") {
                                WindowFunc::Time
                            } else {
                                WindowFunc::Length
                            },
                            arg: NumberValue::new(&arg.text),
                        })),
                    });
                }
                TableName::Literal(lit)
            }
            _ => return Err(self.unexpected(&[TokenKind::Literal, TokenKind::DblString])),
        };
        let mut suffix = None;
        if allow_suffix {
            if self.eat(TokenKind::As) {
                let alias = match self.peek_kind() {
                    TokenKind::Literal => LiteralValue::new(self.bump().text),
                    TokenKind::DblString => LiteralValue::quoted(self.bump().text),
                    _ => return Err(self.unexpected(&[TokenKind::Literal, TokenKind::DblString])),
                };
                suffix = Some(TableSuffix::Alias(alias));
            } else if self.peek_kind() == TokenKind::Literal {
                suffix = Some(TableSuffix::Alias(LiteralValue::new(self.bump().text)));
            }
        }
        Ok(Table { name, suffix })
    }

    /// Dotted identifier chain; a double-quoted part marks the chain as
    /// quote-rendered from there on.
    pub(crate) fn parse_literal_value(&mut self) -> SquealResult<LiteralValue> {
        let first = self.expect(TokenKind::Literal)?;
        let mut lit = LiteralValue::new(first.text);
        while self.peek_kind() == TokenKind::Dot {
            match self.peek_at(1).kind {
                TokenKind::Literal => {
                    self.bump();
                    let part = self.bump();
                    lit.push(part.text);
                }
                TokenKind::DblString => {
                    self.bump();
                    let part = self.bump();
                    lit.push_quoted(part.text);
                }
                _ => break,
            }
        }
        Ok(lit)
    }

    fn parse_join(&mut self) -> SquealResult<Join> {
        let mut side = None;
        let mut mode = None;
        match self.peek_kind() {
            TokenKind::Left | TokenKind::Right => {
                side = Some(if self.bump().kind == TokenKind::Left {
                    JoinSide::Left
                } else {
                    JoinSide::Right
                });
                match self.peek_kind() {
                    TokenKind::Inner => {
                        self.bump();
                        mode = Some(JoinMode::Inner);
                    }
                    TokenKind::Outer => {
                        self.bump();
                        mode = Some(JoinMode::Outer);
                    }
                    _ => {}
                }
            }
            TokenKind::Inner => {
                self.bump();
                mode = Some(JoinMode::Inner);
            }
            _ => {}
        }
        self.expect(TokenKind::Join)?;
        let right = self.parse_source()?;
        self.expect(TokenKind::On)?;
        let conditions = Some(self.parse_expression()?);
        Ok(Join {
            right,
            conditions,
            side,
            mode,
        })
    }

    fn parse_order_by(&mut self) -> SquealResult<OrderBy> {
        let mut args = vec![self.parse_order_arg()?];
        while self.eat(TokenKind::Separator) {
            args.push(self.parse_order_arg()?);
        }
        let mut order = OrderBy::new(args);
        if self.eat(TokenKind::Offset) {
            order = order.with_offset(self.parse_offset_clause()?);
        }
        Ok(order)
    }

    fn parse_order_arg(&mut self) -> SquealResult<OrderArg> {
        let value = self.parse_value()?;
        let direction = if self.peek_kind() == TokenKind::Direction {
            Direction::parse(&self.bump().text)
        } else {
            Direction::default()
        };
        Ok(OrderArg { value, direction })
    }

    fn parse_offset_clause(&mut self) -> SquealResult<OffsetClause> {
        let row_count = NumberValue::new(&self.expect(TokenKind::Number)?.text);
        self.expect_row_or_rows()?;
        let mut fetch = None;
        if self.eat(TokenKind::Fetch) {
            match self.peek_kind() {
                TokenKind::First | TokenKind::Next => {
                    self.bump();
                }
                _ => return Err(self.unexpected(&[TokenKind::First, TokenKind::Next])),
            }
            fetch = Some(NumberValue::new(&self.expect(TokenKind::Number)?.text));
            self.expect_row_or_rows()?;
            self.expect(TokenKind::Only)?;
        }
        Ok(OffsetClause { row_count, fetch })
    }

    fn expect_row_or_rows(&mut self) -> SquealResult<()> {
        match self.peek_kind() {
            TokenKind::Row | TokenKind::Rows => {
                self.bump();
                Ok(())
            }
            _ => Err(self.unexpected(&[TokenKind::Row, TokenKind::Rows])),
        }
    }

    /// `LIMIT n`, `LIMIT n OFFSET m`, or the comma form `LIMIT m, n`.
    fn parse_limit(&mut self) -> SquealResult<Limit> {
        self.expect(TokenKind::Limit)?;
        let first = NumberValue::new(&self.expect(TokenKind::Number)?.text);
        if self.eat(TokenKind::Separator) {
            let count = NumberValue::new(&self.expect(TokenKind::Number)?.text);
            return Ok(Limit {
                value: count,
                offset: Some(first),
            });
        }
        if self.eat(TokenKind::Offset) {
            let offset = NumberValue::new(&self.expect(TokenKind::Number)?.text);
            return Ok(Limit {
                value: first,
                offset: Some(offset),
            });
        }
        Ok(Limit {
            value: first,
            offset: None,
        })
    }

    fn parse_insert(&mut self) -> SquealResult<Statement> {
        self.expect(TokenKind::Insert)?;
        self.expect(TokenKind::Into)?;
        let (table, fields, values) = self.parse_insert_core()?;
        Ok(Statement::Insert(InsertStatement {
            table,
            fields,
            values,
        }))
    }

    fn parse_upsert(&mut self) -> SquealResult<Statement> {
        self.expect(TokenKind::Upsert)?;
        let (table, fields, values) = self.parse_insert_core()?;
        let with_primary_key = self.eat(TokenKind::WithPrimaryKey);
        Ok(Statement::Upsert(UpsertStatement {
            table,
            fields,
            values,
            with_primary_key,
        }))
    }

    /// Shared tail of INSERT and UPSERT: target table, column tuple,
    /// then either a VALUES tuple or a feeding SELECT.
    fn parse_insert_core(&mut self) -> SquealResult<(Table, Vec<Field>, InsertSource)> {
        let table = self.parse_table(false)?;
        self.expect(TokenKind::LeftParen)?;
        let fields = self.parse_fields()?;
        self.expect(TokenKind::RightParen)?;
        let values = match self.peek_kind() {
            TokenKind::Values => {
                self.bump();
                self.expect(TokenKind::LeftParen)?;
                let args = self.parse_argument_list()?;
                self.expect(TokenKind::RightParen)?;
                InsertSource::List(args)
            }
            TokenKind::Select => InsertSource::Select(Box::new(self.parse_select_query(true)?)),
            _ => return Err(self.unexpected(&[TokenKind::Values, TokenKind::Select])),
        };
        Ok((table, fields, values))
    }

    fn parse_update(&mut self) -> SquealResult<Statement> {
        self.expect(TokenKind::Update)?;
        let table = self.parse_table(false)?;
        self.expect(TokenKind::Set)?;
        let assignments = ArgumentList::new(self.parse_argument_list()?);
        let where_clause = if self.eat(TokenKind::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Statement::Update(UpdateStatement {
            table,
            assignments,
            where_clause,
        }))
    }

    fn parse_delete(&mut self) -> SquealResult<Statement> {
        self.expect(TokenKind::Delete)?;
        self.expect(TokenKind::From)?;
        let table = self.parse_table(true)?;
        let where_clause = if self.eat(TokenKind::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Statement::Delete(DeleteStatement {
            table,
            where_clause,
        }))
    }

    pub(crate) fn parse_argument_list(&mut self) -> SquealResult<Vec<Expression>> {
        let mut args = vec![self.parse_expression()?];
        while self.eat(TokenKind::Separator) {
            args.push(self.parse_expression()?);
        }
        Ok(args)
    }
}
