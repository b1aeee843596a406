//! Statement nodes and canonical text rendering.
//!
//! Rendering is the inverse of parsing up to normalization: the emitted
//! text always re-parses to an identical tree, and rendering that tree
//! again yields identical text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::{ArgumentList, Expression, Field, LiteralValue, NumberValue, Value};

/// Prefix every line with two spaces.
pub(crate) fn indent(s: &str) -> String {
    s.lines()
        .map(|l| format!("  {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A complete parsed statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Upsert(UpsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(s) => s.fmt(f),
            Statement::Insert(s) => s.fmt(f),
            Statement::Upsert(s) => s.fmt(f),
            Statement::Update(s) => s.fmt(f),
            Statement::Delete(s) => s.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub fields: Vec<Field>,
    pub source: Source,
    pub distinct: bool,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expression>,
    pub group: Option<GroupBy>,
    pub order: Option<OrderBy>,
    pub limit: Option<Limit>,
    pub unions: Vec<Union>,
}

impl SelectStatement {
    pub fn new(fields: Vec<Field>, source: Source, distinct: bool) -> Self {
        Self {
            fields,
            source,
            distinct,
            joins: Vec::new(),
            where_clause: None,
            group: None,
            order: None,
            limit: None,
            unions: Vec::new(),
        }
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn with_where(mut self, expr: Expression) -> Self {
        self.where_clause = Some(expr);
        self
    }

    pub fn with_group(mut self, group: GroupBy) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_union(mut self, union: Union) -> Self {
        self.unions.push(union);
        self
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.fields.iter().map(|x| x.to_string()).collect();
        write!(
            f,
            "SELECT {}{}",
            if self.distinct { "DISTINCT " } else { "" },
            fields.join(", ")
        )?;
        write!(f, "\n{}", indent(&format!("FROM {}", self.source)))?;
        for join in &self.joins {
            write!(f, "\n{}", indent(&join.to_string()))?;
        }
        if let Some(w) = &self.where_clause {
            write!(f, "\n{}", indent(&format!("WHERE {w}")))?;
        }
        if let Some(g) = &self.group {
            write!(f, "\n{}", indent(&g.to_string()))?;
        }
        if let Some(o) = &self.order {
            write!(f, "\n{}", indent(&o.to_string()))?;
        }
        if let Some(l) = &self.limit {
            write!(f, "\n{}", indent(&l.to_string()))?;
        }
        for union in &self.unions {
            write!(f, "\n{union}")?;
        }
        Ok(())
    }
}

/// The thing after FROM or JOIN: a table reference or a subquery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Source {
    Table(Table),
    SubSelect(SubSelect),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Table(t) => t.fmt(f),
            Source::SubSelect(s) => s.fmt(f),
        }
    }
}

/// A table reference, with an optional alias or streaming-window suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: TableName,
    pub suffix: Option<TableSuffix>,
}

impl Table {
    pub fn named(name: TableName) -> Self {
        Self { name, suffix: None }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)?;
        match &self.suffix {
            // A single-part quoted alias keeps its quotes; LiteralValue
            // itself only quotes the tail parts of a dotted chain.
            Some(TableSuffix::Alias(alias)) if alias.dbl_quote && alias.parts.len() == 1 => {
                write!(f, " AS \"{}\"", alias.parts[0])
            }
            Some(TableSuffix::Alias(alias)) => write!(f, " AS {alias}"),
            Some(TableSuffix::Window(w)) => write!(f, ".win:{}({})", w.func, w.arg),
            None => Ok(()),
        }
    }
}

/// Dotted names render as-is; a double-quoted name keeps its quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableName {
    Literal(LiteralValue),
    Quoted(String),
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableName::Literal(lit) => lit.fmt(f),
            TableName::Quoted(name) => write!(f, "\"{name}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableSuffix {
    Alias(LiteralValue),
    Window(TableWindow),
}

/// Streaming extension: `events.win:length(10)` reads the last ten rows,
/// `events.win:time(30)` the last thirty seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableWindow {
    pub func: WindowFunc,
    pub arg: NumberValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowFunc {
    Length,
    Time,
}

impl fmt::Display for WindowFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WindowFunc::Length => "length",
            WindowFunc::Time => "time",
        })
    }
}

/// A parenthesized SELECT used as a source or an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSelect {
    pub select: Box<SelectStatement>,
    pub alias: Option<LiteralValue>,
}

impl fmt::Display for SubSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(\n{}\n)", indent(&self.select.to_string()))?;
        if let Some(alias) = &self.alias {
            write!(f, " {alias}")?;
        }
        Ok(())
    }
}

/// The grammar always requires `ON`, but a tree built directly may
/// leave `conditions` empty; such a join renders without an `ON` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub right: Source,
    pub conditions: Option<Expression>,
    pub side: Option<JoinSide>,
    pub mode: Option<JoinMode>,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(side) = &self.side {
            write!(f, "{side} ")?;
        }
        if let Some(mode) = &self.mode {
            write!(f, "{mode} ")?;
        }
        write!(f, "JOIN {}", self.right)?;
        if let Some(conditions) = &self.conditions {
            write!(f, "\n{}", indent(&format!("ON {conditions}")))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinSide {
    Left,
    Right,
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinSide::Left => "LEFT",
            JoinSide::Right => "RIGHT",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinMode {
    Inner,
    Outer,
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinMode::Inner => "INNER",
            JoinMode::Outer => "OUTER",
        })
    }
}

/// A trailing `UNION [ALL] <query>` arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    pub query: SelectStatement,
    pub all: bool,
}

impl fmt::Display for Union {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UNION{}\n{}", if self.all { " ALL" } else { "" }, self.query)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBy {
    pub fields: Vec<Expression>,
    pub having: Option<Expression>,
}

impl GroupBy {
    pub fn new(fields: Vec<Expression>) -> Self {
        Self {
            fields,
            having: None,
        }
    }

    pub fn with_having(mut self, having: Expression) -> Self {
        self.having = Some(having);
        self
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.fields.iter().map(|x| x.to_string()).collect();
        write!(f, "GROUP BY {}", fields.join(", "))?;
        if let Some(h) = &self.having {
            write!(f, "\nHAVING {h}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub args: Vec<OrderArg>,
    pub offset: Option<OffsetClause>,
}

impl OrderBy {
    pub fn new(args: Vec<OrderArg>) -> Self {
        Self { args, offset: None }
    }

    pub fn with_offset(mut self, offset: OffsetClause) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(|x| x.to_string()).collect();
        write!(f, "ORDER BY {}", args.join(", "))?;
        if let Some(o) = &self.offset {
            write!(f, "\n{o}")?;
        }
        Ok(())
    }
}

/// A sort key with its direction. Direction is always rendered, so the
/// implicit ascending default becomes explicit in canonical text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderArg {
    pub value: Value,
    pub direction: Direction,
}

impl fmt::Display for OrderArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn parse(text: &str) -> Self {
        if text.eq_ignore_ascii_case("desc") {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        })
    }
}

/// ANSI `OFFSET n ROWS [FETCH NEXT m ROWS ONLY]`, attached to ORDER BY.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetClause {
    pub row_count: NumberValue,
    pub fetch: Option<NumberValue>,
}

impl fmt::Display for OffsetClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OFFSET {} ROWS", self.row_count)?;
        if let Some(fetch) = &self.fetch {
            write!(f, "\nFETCH NEXT {fetch} ROWS ONLY")?;
        }
        Ok(())
    }
}

/// `LIMIT n [OFFSET m]`. The comma form `LIMIT m, n` normalizes into the
/// same shape: `m` is the offset, `n` the count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub value: NumberValue,
    pub offset: Option<NumberValue>,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LIMIT {}", self.value)?;
        if let Some(offset) = &self.offset {
            write!(f, "\nOFFSET {offset}")?;
        }
        Ok(())
    }
}

/// The VALUES tuple or feeding query of an INSERT/UPSERT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    List(Vec<Expression>),
    Select(Box<SelectStatement>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub table: Table,
    pub fields: Vec<Field>,
    pub values: InsertSource,
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_insert_core(f, "INSERT INTO", &self.table, &self.fields, &self.values)
    }
}

/// `UPSERT` writes through to the store, inserting or replacing by key;
/// `WITH PRIMARY KEY` requests key-based replacement semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertStatement {
    pub table: Table,
    pub fields: Vec<Field>,
    pub values: InsertSource,
    pub with_primary_key: bool,
}

impl fmt::Display for UpsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_insert_core(f, "UPSERT", &self.table, &self.fields, &self.values)?;
        if self.with_primary_key {
            f.write_str(" WITH PRIMARY KEY")?;
        }
        Ok(())
    }
}

fn write_insert_core(
    f: &mut fmt::Formatter<'_>,
    verb: &str,
    table: &Table,
    fields: &[Field],
    values: &InsertSource,
) -> fmt::Result {
    let fields: Vec<String> = fields.iter().map(|x| x.to_string()).collect();
    write!(f, "{verb} {table} ({})", fields.join(", "))?;
    match values {
        InsertSource::List(args) => {
            let args: Vec<String> = args.iter().map(|x| x.to_string()).collect();
            write!(f, " VALUES ({})", args.join(", "))
        }
        InsertSource::Select(query) => write!(f, "\n{query}"),
    }
}

/// `UPDATE table SET a = 1, b = 2 [WHERE ...]`. The target takes no alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub table: Table,
    pub assignments: ArgumentList,
    pub where_clause: Option<Expression>,
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET {}", self.table, self.assignments)?;
        if let Some(w) = &self.where_clause {
            write!(f, " WHERE {w}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub table: Table,
    pub where_clause: Option<Expression>,
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;
        if let Some(w) = &self.where_clause {
            write!(f, "\n{}", indent(&format!("WHERE {w}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FieldValue;
    use pretty_assertions::assert_eq;

    fn table(name: &str) -> Source {
        Source::Table(Table::named(TableName::Literal(LiteralValue::new(name))))
    }

    fn col(name: &str) -> Field {
        Field {
            value: FieldValue::Expression(Expression::Value(Value::Literal(LiteralValue::new(
                name,
            )))),
            alias: None,
        }
    }

    #[test]
    fn test_select_renders_indented_clauses() {
        let stmt = SelectStatement::new(vec![col("a"), col("b")], table("users"), false)
            .with_where(Expression::op(
                "=",
                Expression::Value(Value::Literal(LiteralValue::new("id"))),
                Expression::Value(Value::Number(NumberValue(1.0))),
            ));
        assert_eq!(
            stmt.to_string(),
            "SELECT a, b\n  FROM users\n  WHERE (id = 1)"
        );
    }

    #[test]
    fn test_distinct_is_rendered() {
        let stmt = SelectStatement::new(vec![col("a")], table("t"), true);
        assert_eq!(stmt.to_string(), "SELECT DISTINCT a\n  FROM t");
    }

    #[test]
    fn test_window_suffix_render() {
        let t = Table {
            name: TableName::Literal(LiteralValue::new("events")),
            suffix: Some(TableSuffix::Window(TableWindow {
                func: WindowFunc::Length,
                arg: NumberValue(10.0),
            })),
        };
        assert_eq!(t.to_string(), "events.win:length(10)");
    }

    #[test]
    fn test_quoted_table_name() {
        let t = Table::named(TableName::Quoted("my table".to_string()));
        assert_eq!(t.to_string(), "\"my table\"");
    }

    #[test]
    fn test_left_outer_join_render() {
        let join = Join {
            right: table("b"),
            conditions: Some(Expression::op(
                "=",
                Expression::Value(Value::Literal(LiteralValue::new("x"))),
                Expression::Value(Value::Literal(LiteralValue::new("y"))),
            )),
            side: Some(JoinSide::Left),
            mode: Some(JoinMode::Outer),
        };
        assert_eq!(join.to_string(), "LEFT OUTER JOIN b\n  ON (x = y)");
    }

    #[test]
    fn test_join_without_conditions_renders_no_on() {
        let join = Join {
            right: table("b"),
            conditions: None,
            side: None,
            mode: None,
        };
        assert_eq!(join.to_string(), "JOIN b");
    }

    #[test]
    fn test_limit_with_offset() {
        let l = Limit {
            value: NumberValue(10.0),
            offset: Some(NumberValue(20.0)),
        };
        assert_eq!(l.to_string(), "LIMIT 10\nOFFSET 20");
    }

    #[test]
    fn test_offset_fetch_render() {
        let o = OffsetClause {
            row_count: NumberValue(5.0),
            fetch: Some(NumberValue(10.0)),
        };
        assert_eq!(o.to_string(), "OFFSET 5 ROWS\nFETCH NEXT 10 ROWS ONLY");
    }

    #[test]
    fn test_upsert_with_primary_key_render() {
        let stmt = UpsertStatement {
            table: Table::named(TableName::Literal(LiteralValue::new("kv"))),
            fields: vec![col("k"), col("v")],
            values: InsertSource::List(vec![
                Expression::Value(Value::Number(NumberValue(1.0))),
                Expression::Value(Value::Number(NumberValue(2.0))),
            ]),
            with_primary_key: true,
        };
        assert_eq!(
            stmt.to_string(),
            "UPSERT kv (k, v) VALUES (1, 2) WITH PRIMARY KEY"
        );
    }

    #[test]
    fn test_delete_where_renders_once() {
        let stmt = DeleteStatement {
            table: Table::named(TableName::Literal(LiteralValue::new("t"))),
            where_clause: Some(Expression::op(
                "=",
                Expression::Value(Value::Literal(LiteralValue::new("a"))),
                Expression::Value(Value::Number(NumberValue(1.0))),
            )),
        };
        assert_eq!(stmt.to_string(), "DELETE FROM t\n  WHERE (a = 1)");
    }
}
