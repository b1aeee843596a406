use pretty_assertions::assert_eq;

use crate::ast::*;
use crate::error::SquealError;
use crate::lexer::{tokenize, TokenizeOptions};
use crate::parser::{parse, parse_tokens};
use crate::token::TokenKind;

/// Parse, render, re-parse: the canonical text must produce the same
/// tree, and rendering that tree must reproduce the same text.
fn assert_stable(sql: &str) {
    let first = parse(sql).unwrap_or_else(|e| panic!("parse failed for {sql:?}: {e}"));
    let canonical = first.to_string();
    let second = parse(&canonical)
        .unwrap_or_else(|e| panic!("re-parse failed for {canonical:?}: {e}"));
    assert_eq!(second, first, "tree changed across a render round trip");
    assert_eq!(second.to_string(), canonical, "render is not a fixpoint");
}

#[test]
fn test_simple_select() {
    let stmt = parse("SELECT * FROM users").unwrap();
    let Statement::Select(select) = &stmt else {
        panic!("expected select");
    };
    assert_eq!(select.fields, vec![Field::star()]);
    assert!(!select.distinct);
    assert_eq!(stmt.to_string(), "SELECT *\n  FROM users");
}

#[test]
fn test_select_with_aliases() {
    let stmt = parse("SELECT a AS x, b AS \"the b\" FROM t").unwrap();
    let Statement::Select(select) = stmt else {
        panic!("expected select");
    };
    assert_eq!(select.fields[0].alias.as_deref(), Some("x"));
    assert_eq!(select.fields[1].alias.as_deref(), Some("the b"));
}

#[test]
fn test_distinct_survives_round_trip() {
    let stmt = parse("SELECT DISTINCT name FROM users").unwrap();
    assert_eq!(stmt.to_string(), "SELECT DISTINCT name\n  FROM users");
    assert_stable("SELECT DISTINCT name FROM users");
}

#[test]
fn test_and_binds_tighter_than_or() {
    let stmt = parse("SELECT a FROM t WHERE a = 1 AND b = 2 OR c = 3").unwrap();
    let Statement::Select(select) = stmt else {
        panic!("expected select");
    };
    let Some(Expression::Op { op, left, .. }) = select.where_clause else {
        panic!("expected where clause");
    };
    assert_eq!(op, "OR");
    assert!(matches!(*left, Expression::Op { ref op, .. } if op == "AND"));
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let stmt = parse("SELECT a + b * c FROM t").unwrap();
    let Statement::Select(select) = stmt else {
        panic!("expected select");
    };
    let FieldValue::Expression(Expression::Op { op, right, .. }) = &select.fields[0].value
    else {
        panic!("expected op field");
    };
    assert_eq!(op, "+");
    assert!(matches!(**right, Expression::Op { ref op, .. } if op == "*"));
}

#[test]
fn test_math_is_left_associative() {
    let stmt = parse("SELECT a FROM t WHERE x = 1 + 2 + 3").unwrap();
    assert!(stmt.to_string().contains("(x = ((1 + 2) + 3))"));
}

#[test]
fn test_grouping_parens_override_precedence() {
    let stmt = parse("SELECT a FROM t WHERE a = 1 AND (b = 2 OR c = 3)").unwrap();
    let Statement::Select(select) = stmt else {
        panic!("expected select");
    };
    let Some(Expression::Op { op, right, .. }) = select.where_clause else {
        panic!("expected where clause");
    };
    assert_eq!(op, "AND");
    assert!(matches!(*right, Expression::Op { ref op, .. } if op == "OR"));
}

#[test]
fn test_between() {
    let stmt = parse("SELECT a FROM t WHERE a BETWEEN 1 AND 10").unwrap();
    assert!(stmt.to_string().contains("(a BETWEEN 1 AND 10)"));
    assert_stable("SELECT a FROM t WHERE a BETWEEN 1 AND 10");
}

#[test]
fn test_not_between_after_conjunction() {
    assert_stable("SELECT a FROM t WHERE b = 1 AND a NOT BETWEEN 1 AND 10");
}

#[test]
fn test_between_missing_upper_bound_is_an_error() {
    let err = parse("SELECT a FROM t WHERE a BETWEEN 1").unwrap_err();
    let SquealError::Parse { expected, .. } = err else {
        panic!("expected parse error");
    };
    assert_eq!(expected, vec![TokenKind::Conditional]);
}

#[test]
fn test_in_list() {
    let stmt = parse("SELECT a FROM t WHERE a IN (1, 2, 3)").unwrap();
    assert!(stmt.to_string().contains("(a IN (1, 2, 3))"));
    assert_stable("SELECT a FROM t WHERE a IN (1, 2, 3)");
}

#[test]
fn test_not_in_subquery() {
    assert_stable("SELECT a FROM t WHERE a NOT IN (SELECT b FROM u)");
}

#[test]
fn test_exists_subquery() {
    let stmt = parse("SELECT a FROM t WHERE EXISTS (SELECT b FROM u)").unwrap();
    let Statement::Select(select) = stmt else {
        panic!("expected select");
    };
    assert!(matches!(
        select.where_clause,
        Some(Expression::UnaryOp { ref op, .. }) if op == "EXISTS"
    ));
}

#[test]
fn test_is_not_null() {
    let stmt = parse("SELECT a FROM t WHERE a IS NOT NULL").unwrap();
    assert!(stmt.to_string().contains("(a IS NOT NULL)"));
}

#[test]
fn test_case_expression() {
    assert_stable("SELECT CASE WHEN a > 0 THEN 'pos' ELSE 'neg' END AS sign FROM t");
}

#[test]
fn test_case_without_else() {
    let stmt = parse("SELECT CASE WHEN a = 1 THEN b END FROM t").unwrap();
    let Statement::Select(select) = stmt else {
        panic!("expected select");
    };
    let FieldValue::Expression(Expression::Case { whens, else_result }) =
        &select.fields[0].value
    else {
        panic!("expected case field");
    };
    assert_eq!(whens.len(), 1);
    assert!(else_result.is_none());
}

#[test]
fn test_subselect_source_with_alias() {
    let stmt = parse("SELECT x FROM (SELECT a AS x FROM t) inner_q").unwrap();
    let Statement::Select(select) = &stmt else {
        panic!("expected select");
    };
    let Source::SubSelect(sub) = &select.source else {
        panic!("expected subselect source");
    };
    assert_eq!(sub.alias, Some(LiteralValue::new("inner_q")));
    assert_stable("SELECT x FROM (SELECT a AS x FROM t) inner_q");
}

#[test]
fn test_scalar_subselect_in_where() {
    assert_stable("SELECT a FROM t WHERE b = (SELECT MAX(c) FROM u)");
}

#[test]
fn test_joins() {
    let stmt = parse(
        "SELECT * FROM a LEFT OUTER JOIN b ON a.id = b.a_id INNER JOIN c ON b.id = c.b_id",
    )
    .unwrap();
    let Statement::Select(select) = &stmt else {
        panic!("expected select");
    };
    assert_eq!(select.joins.len(), 2);
    assert_eq!(select.joins[0].side, Some(JoinSide::Left));
    assert_eq!(select.joins[0].mode, Some(JoinMode::Outer));
    assert_eq!(select.joins[1].side, None);
    assert_eq!(select.joins[1].mode, Some(JoinMode::Inner));
    assert_stable("SELECT * FROM a LEFT JOIN b ON a.id = b.a_id");
}

#[test]
fn test_join_without_on_is_an_error() {
    assert!(parse("SELECT * FROM a JOIN b").is_err());
}

#[test]
fn test_group_by_with_having() {
    assert_stable("SELECT kind, COUNT(1) FROM t GROUP BY kind HAVING COUNT(1) > 5");
}

#[test]
fn test_group_must_precede_order() {
    assert!(parse("SELECT a FROM t ORDER BY a GROUP BY a").is_err());
}

#[test]
fn test_order_by_directions() {
    let stmt = parse("SELECT a FROM t ORDER BY a, b DESC").unwrap();
    let Statement::Select(select) = &stmt else {
        panic!("expected select");
    };
    let order = select.order.as_ref().unwrap();
    assert_eq!(order.args[0].direction, Direction::Asc);
    assert_eq!(order.args[1].direction, Direction::Desc);
    // The implicit ASC becomes explicit in canonical text.
    assert!(stmt.to_string().contains("ORDER BY a ASC, b DESC"));
}

#[test]
fn test_order_by_offset_fetch() {
    assert_stable("SELECT a FROM t ORDER BY a OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY");
}

#[test]
fn test_limit_forms_normalize() {
    let plain = parse("SELECT a FROM t LIMIT 10").unwrap();
    let Statement::Select(s) = &plain else {
        panic!("expected select");
    };
    assert_eq!(s.limit, Some(Limit { value: NumberValue(10.0), offset: None }));

    // LIMIT offset, count and LIMIT count OFFSET offset mean the same.
    let comma = parse("SELECT a FROM t LIMIT 20, 10").unwrap();
    let keyword = parse("SELECT a FROM t LIMIT 10 OFFSET 20").unwrap();
    assert_eq!(comma, keyword);
    assert_stable("SELECT a FROM t LIMIT 10 OFFSET 20");
}

#[test]
fn test_unions() {
    let stmt = parse("SELECT a FROM t UNION SELECT b FROM u UNION ALL SELECT c FROM v").unwrap();
    let Statement::Select(select) = &stmt else {
        panic!("expected select");
    };
    assert_eq!(select.unions.len(), 2);
    assert!(!select.unions[0].all);
    assert!(select.unions[1].all);
    assert_stable("SELECT a FROM t UNION ALL SELECT b FROM u");
}

#[test]
fn test_union_arm_keeps_its_limit() {
    let stmt = parse("SELECT a FROM t UNION SELECT b FROM u LIMIT 5").unwrap();
    let Statement::Select(select) = stmt else {
        panic!("expected select");
    };
    assert!(select.limit.is_none());
    assert_eq!(
        select.unions[0].query.limit,
        Some(Limit { value: NumberValue(5.0), offset: None })
    );
}

#[test]
fn test_table_window_length() {
    let stmt = parse("SELECT * FROM events.win:length(10)").unwrap();
    let Statement::Select(select) = &stmt else {
        panic!("expected select");
    };
    let Source::Table(table) = &select.source else {
        panic!("expected table source");
    };
    assert_eq!(
        table.suffix,
        Some(TableSuffix::Window(TableWindow {
            func: WindowFunc::Length,
            arg: NumberValue(10.0),
        }))
    );
    assert_stable("SELECT * FROM events.win:length(10)");
}

#[test]
fn test_table_window_time() {
    assert_stable("SELECT AVG(price) FROM ticks.win:time(30)");
}

#[test]
fn test_quoted_table_name() {
    assert_stable("SELECT a FROM \"my table\"");
}

#[test]
fn test_dotted_table_and_column_names() {
    assert_stable("SELECT s.t.col FROM s.t");
}

#[test]
fn test_table_alias_can_be_double_quoted() {
    let stmt = parse("SELECT a FROM t AS \"x y\"").unwrap();
    let Statement::Select(select) = &stmt else {
        panic!("expected select");
    };
    let Source::Table(table) = &select.source else {
        panic!("expected table source");
    };
    assert_eq!(
        table.suffix,
        Some(TableSuffix::Alias(LiteralValue::quoted("x y")))
    );
    assert_stable("SELECT a FROM t AS \"x y\"");
}

#[test]
fn test_update_target_takes_no_window() {
    assert!(parse("UPDATE t.win:length(5) SET a = 1").is_err());
}

#[test]
fn test_insert_target_takes_no_window() {
    assert!(parse("INSERT INTO t.win:time(5) (a) VALUES (1)").is_err());
}

#[test]
fn test_select_source_still_takes_window() {
    assert_stable("SELECT * FROM t.win:time(5)");
}

#[test]
fn test_insert_values() {
    let stmt = parse("INSERT INTO t (a, b) VALUES (1, 'x')").unwrap();
    assert_eq!(stmt.to_string(), "INSERT INTO t (a, b) VALUES (1, 'x')");
    assert_stable("INSERT INTO t (a, b) VALUES (1, 'x')");
}

#[test]
fn test_insert_from_select() {
    assert_stable("INSERT INTO t (a) SELECT b FROM u WHERE b > 0");
}

#[test]
fn test_upsert_with_primary_key() {
    let stmt = parse("UPSERT kv (k, v) VALUES (1, 2) WITH PRIMARY KEY").unwrap();
    let Statement::Upsert(upsert) = &stmt else {
        panic!("expected upsert");
    };
    assert!(upsert.with_primary_key);
    assert_stable("UPSERT kv (k, v) VALUES (1, 2) WITH PRIMARY KEY");
}

#[test]
fn test_upsert_without_primary_key() {
    let stmt = parse("UPSERT kv (k, v) VALUES (1, 2)").unwrap();
    let Statement::Upsert(upsert) = stmt else {
        panic!("expected upsert");
    };
    assert!(!upsert.with_primary_key);
}

#[test]
fn test_update() {
    let stmt = parse("UPDATE t SET a = 1, b = 2 WHERE id = 3").unwrap();
    let Statement::Update(update) = &stmt else {
        panic!("expected update");
    };
    assert_eq!(update.assignments.args.len(), 2);
    // Exactly one WHERE in the canonical text.
    assert_eq!(stmt.to_string().matches("WHERE").count(), 1);
    assert_stable("UPDATE t SET a = 1, b = 2 WHERE id = 3");
}

#[test]
fn test_delete_keeps_where() {
    let stmt = parse("DELETE FROM t WHERE a = 1").unwrap();
    let Statement::Delete(delete) = &stmt else {
        panic!("expected delete");
    };
    assert!(delete.where_clause.is_some());
    assert!(stmt.to_string().contains("WHERE (a = 1)"));
    assert_stable("DELETE FROM t WHERE a = 1");
}

#[test]
fn test_aggregate_with_distinct() {
    let stmt = parse("SELECT COUNT(DISTINCT user_id) FROM visits").unwrap();
    assert!(stmt.to_string().contains("COUNT(DISTINCT user_id)"));
    assert_stable("SELECT COUNT(DISTINCT user_id) FROM visits");
}

#[test]
fn test_udf_call_and_empty_args() {
    let stmt = parse("SELECT my_func(a, 1), nullary() FROM t").unwrap();
    let Statement::Select(select) = &stmt else {
        panic!("expected select");
    };
    let FieldValue::Expression(Expression::Value(Value::Function(call))) =
        &select.fields[0].value
    else {
        panic!("expected function field");
    };
    assert!(call.udf);
    assert_eq!(call.name, "MY_FUNC");
    assert_stable("SELECT MY_FUNC(a, 1), NULLARY() FROM t");
}

#[test]
fn test_string_escaping_round_trip() {
    let stmt = parse("SELECT a FROM t WHERE b = 'it''s'").unwrap();
    assert!(stmt.to_string().contains("'it''s'"));
    assert_stable("SELECT a FROM t WHERE b = 'it''s'");
}

#[test]
fn test_parameters_and_placeholders() {
    let stmt = parse("SELECT a FROM t WHERE b = $min:number AND c = ?").unwrap();
    assert!(stmt.to_string().contains("$min:number"));
    assert!(stmt.to_string().contains("= ?"));
    assert_stable("SELECT a FROM t WHERE b = $min:number AND c = ?");
}

#[test]
fn test_field_function() {
    assert_stable("SELECT a FROM t WHERE created < CURRENT_UTCTIMESTAMP");
}

#[test]
fn test_whitespace_list_of_adjacent_values() {
    let stmt = parse("SELECT a FROM t WHERE b > x 1 y").unwrap();
    let Statement::Select(select) = &stmt else {
        panic!("expected select");
    };
    let Some(Expression::Op { right, .. }) = &select.where_clause else {
        panic!("expected where clause");
    };
    let Expression::WhitespaceList(values) = right.as_ref() else {
        panic!("expected whitespace list, got {right:?}");
    };
    assert_eq!(values.len(), 3);
    assert_stable("SELECT a FROM t WHERE b > x 1 y");
}

#[test]
fn test_missing_fields_is_an_error() {
    let err = parse("SELECT FROM t").unwrap_err();
    let SquealError::Parse { kind, expected, .. } = err else {
        panic!("expected parse error");
    };
    assert_eq!(kind, TokenKind::From);
    assert!(!expected.is_empty());
}

#[test]
fn test_dangling_operator_is_an_error() {
    let err = parse("SELECT a FROM t WHERE a =").unwrap_err();
    let SquealError::Parse { kind, expected, .. } = err else {
        panic!("expected parse error");
    };
    assert_eq!(kind, TokenKind::Eof);
    assert!(expected.contains(&TokenKind::Number));
}

#[test]
fn test_trailing_tokens_are_an_error() {
    assert!(parse("SELECT a FROM t t2 extra junk").is_err());
}

#[test]
fn test_parse_tokens_without_eof_sentinel() {
    let tokens = tokenize("SELECT a FROM t", &TokenizeOptions::default()).unwrap();
    let without_eof = &tokens[..tokens.len() - 1];
    assert_eq!(parse_tokens(without_eof).unwrap(), parse_tokens(&tokens).unwrap());
}

#[test]
fn test_serde_json_round_trip() {
    let stmt = parse("SELECT a, COUNT(1) AS n FROM t WHERE a > 0 GROUP BY a LIMIT 5").unwrap();
    let json = serde_json::to_string(&stmt).unwrap();
    let back: Statement = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stmt);
}

#[test]
fn test_round_trip_battery() {
    for sql in [
        "SELECT * FROM t",
        "SELECT *, a FROM t",
        "SELECT a * b FROM t",
        "SELECT a, b, c FROM t AS x WHERE (a = 1 OR b = 2) AND c LIKE 'z%'",
        "SELECT a FROM t WHERE a ILIKE '%x%' OR a REGEXP 'p.*'",
        "SELECT SUM(amount) FROM orders o JOIN users u ON o.user_id = u.id",
        "SELECT a FROM t WHERE b = TRUE AND c IS NULL",
        "SELECT UPPER(name) FROM t ORDER BY name DESC LIMIT 3",
        "SELECT a FROM (SELECT a FROM t WHERE a ANY (1, 2)) q",
        "SELECT a FROM t WHERE score BETWEEN lo + 1 AND hi - 1",
        "INSERT INTO t (a) VALUES (NULL)",
        "UPSERT s (k) SELECT k FROM u WITH PRIMARY KEY",
        "UPDATE t SET n = n + 1",
        "DELETE FROM logs",
    ] {
        assert_stable(sql);
    }
}
