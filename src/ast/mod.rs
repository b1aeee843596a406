//! Typed syntax tree.
//!
//! Every node serializes with serde and renders canonical query text via
//! `Display`. Nodes are built once and not mutated afterwards; optional
//! clauses attach through `with_*` builders.

pub mod expr;
pub mod statement;
pub mod values;

pub use expr::{CaseWhen, Expression, Field, FieldValue};
pub use statement::{
    DeleteStatement, Direction, GroupBy, InsertSource, InsertStatement, Join, JoinMode, JoinSide,
    Limit, OffsetClause, OrderArg, OrderBy, SelectStatement, Source, Statement, SubSelect, Table,
    TableName, TableSuffix, TableWindow, Union, UpdateStatement, UpsertStatement, WindowFunc,
};
pub use values::{
    ArgumentList, BooleanValue, FunctionValue, ListValue, LiteralValue, NumberValue,
    ParameterValue, QuoteStyle, StringValue, Value,
};
