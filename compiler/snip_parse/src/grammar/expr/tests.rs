#![allow(clippy::unwrap_used, reason = "tests unwrap parses known to succeed")]

use crate::{parse_body, ParsedBody};
use pretty_assertions::assert_eq;
use snip_ir::{
    AssignOp, BinaryOp, ExprId, ExprKind, FunctionBody, LogicalOp, StmtKind, UnaryOp, UpdateOp,
};

/// Parse `return <source>;` and hand back the returned expression.
fn parse_return_expr(source: &str) -> (ParsedBody, ExprId) {
    let parsed = parse_body(&[], &format!("return {source};")).unwrap();
    let root = parsed.arena.function(parsed.root);
    let FunctionBody::Block(stmts) = &root.body else {
        panic!("root body is a block");
    };
    let StmtKind::Return(Some(expr)) = parsed.arena.stmt(stmts[0]).kind else {
        panic!("expected return statement");
    };
    (parsed, expr)
}

fn kind(parsed: &ParsedBody, id: ExprId) -> &ExprKind {
    &parsed.arena.expr(id).kind
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let (parsed, expr) = parse_return_expr("1 + 2 * 3");
    let ExprKind::Binary { op, left, right } = kind(&parsed, expr) else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert_eq!(kind(&parsed, *left), &ExprKind::Number(1.0));
    assert!(matches!(
        kind(&parsed, *right),
        ExprKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_exponent_is_right_associative() {
    let (parsed, expr) = parse_return_expr("2 ** 3 ** 2");
    let ExprKind::Binary { op, left, right } = kind(&parsed, expr) else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Pow);
    assert_eq!(kind(&parsed, *left), &ExprKind::Number(2.0));
    assert!(matches!(
        kind(&parsed, *right),
        ExprKind::Binary {
            op: BinaryOp::Pow,
            ..
        }
    ));
}

#[test]
fn test_subtraction_is_left_associative() {
    let (parsed, expr) = parse_return_expr("10 - 4 - 3");
    let ExprKind::Binary { left, right, .. } = kind(&parsed, expr) else {
        panic!("expected binary");
    };
    assert!(matches!(kind(&parsed, *left), ExprKind::Binary { .. }));
    assert_eq!(kind(&parsed, *right), &ExprKind::Number(3.0));
}

#[test]
fn test_logical_precedence() {
    let (parsed, expr) = parse_return_expr("a || b && c");
    let ExprKind::Logical { op, right, .. } = kind(&parsed, expr) else {
        panic!("expected logical");
    };
    assert_eq!(*op, LogicalOp::Or);
    assert!(matches!(
        kind(&parsed, *right),
        ExprKind::Logical {
            op: LogicalOp::And,
            ..
        }
    ));
}

#[test]
fn test_comparison_below_arithmetic() {
    let (parsed, expr) = parse_return_expr("a + 1 === b");
    assert!(matches!(
        kind(&parsed, expr),
        ExprKind::Binary {
            op: BinaryOp::StrictEq,
            ..
        }
    ));
}

#[test]
fn test_conditional() {
    let (parsed, expr) = parse_return_expr("x > 0 ? 'pos' : 'neg'");
    let ExprKind::Conditional { consequent, .. } = kind(&parsed, expr) else {
        panic!("expected conditional");
    };
    assert_eq!(kind(&parsed, *consequent), &ExprKind::Str("pos".into()));
}

#[test]
fn test_unary_and_typeof() {
    let (parsed, expr) = parse_return_expr("typeof !x");
    let ExprKind::Unary { op, operand } = kind(&parsed, expr) else {
        panic!("expected unary");
    };
    assert_eq!(*op, UnaryOp::Typeof);
    assert!(matches!(
        kind(&parsed, *operand),
        ExprKind::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
}

#[test]
fn test_member_call_chain() {
    let (parsed, expr) = parse_return_expr("engine.message.createMessage('info', 't')");
    let ExprKind::Call { callee, args } = kind(&parsed, expr) else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 2);
    let ExprKind::Member { property, object } = kind(&parsed, *callee) else {
        panic!("expected member");
    };
    assert_eq!(&**property, "createMessage");
    assert!(matches!(kind(&parsed, *object), ExprKind::Member { .. }));
}

#[test]
fn test_keyword_property_names() {
    let (parsed, expr) = parse_return_expr("promise.catch");
    let ExprKind::Member { property, .. } = kind(&parsed, expr) else {
        panic!("expected member");
    };
    assert_eq!(&**property, "catch");
}

#[test]
fn test_index_expression() {
    let (parsed, expr) = parse_return_expr("xs[i + 1]");
    assert!(matches!(kind(&parsed, expr), ExprKind::Index { .. }));
}

#[test]
fn test_new_with_arguments() {
    let (parsed, expr) = parse_return_expr("new Error('boom')");
    let ExprKind::New { callee, args } = kind(&parsed, expr) else {
        panic!("expected new");
    };
    assert_eq!(kind(&parsed, *callee), &ExprKind::Ident("Error".into()));
    assert_eq!(args.len(), 1);
}

#[test]
fn test_single_param_arrow() {
    let (parsed, expr) = parse_return_expr("x => x * 2");
    let ExprKind::Function(id) = kind(&parsed, expr) else {
        panic!("expected function");
    };
    let function = parsed.arena.function(*id);
    assert!(function.is_arrow);
    assert!(!function.is_async);
    assert_eq!(function.params.len(), 1);
    assert!(matches!(function.body, FunctionBody::Expr(_)));
}

#[test]
fn test_async_paren_arrow_with_block() {
    let (parsed, expr) = parse_return_expr("async (a, b) => { await a; return b }");
    let ExprKind::Function(id) = kind(&parsed, expr) else {
        panic!("expected function");
    };
    let function = parsed.arena.function(*id);
    assert!(function.is_async && function.is_arrow);
    let names: Vec<_> = function.params.iter().map(|p| &*p.name).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_parenthesized_expression_is_not_arrow() {
    let (parsed, expr) = parse_return_expr("(a + b) * c");
    assert!(matches!(
        kind(&parsed, expr),
        ExprKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_function_expression() {
    let (parsed, expr) = parse_return_expr("function named(a) { return a }");
    let ExprKind::Function(id) = kind(&parsed, expr) else {
        panic!("expected function");
    };
    assert_eq!(parsed.arena.function(*id).display_name(), "named");
}

#[test]
fn test_object_literal_forms() {
    let (parsed, expr) = parse_return_expr("{ a: 1, 'b c': 2, d, 3: 4, get() { return 1 } }");
    let ExprKind::Object(properties) = kind(&parsed, expr) else {
        panic!("expected object");
    };
    let keys: Vec<_> = properties.iter().map(|p| &*p.key).collect();
    assert_eq!(keys, vec!["a", "b c", "d", "3", "get"]);
    assert_eq!(kind(&parsed, properties[2].value), &ExprKind::Ident("d".into()));
    assert!(matches!(
        kind(&parsed, properties[4].value),
        ExprKind::Function(_)
    ));
}

#[test]
fn test_array_literal_with_trailing_comma() {
    let (parsed, expr) = parse_return_expr("[1, 'two', [3],]");
    let ExprKind::Array(elements) = kind(&parsed, expr) else {
        panic!("expected array");
    };
    assert_eq!(elements.len(), 3);
}

#[test]
fn test_compound_assignment() {
    let (parsed, expr) = parse_return_expr("total += item.price");
    let ExprKind::Assign { op, target, .. } = kind(&parsed, expr) else {
        panic!("expected assignment");
    };
    assert_eq!(*op, AssignOp::Add);
    assert_eq!(kind(&parsed, *target), &ExprKind::Ident("total".into()));
}

#[test]
fn test_assignment_is_right_associative() {
    let (parsed, expr) = parse_return_expr("a = b = 3");
    let ExprKind::Assign { value, .. } = kind(&parsed, expr) else {
        panic!("expected assignment");
    };
    assert!(matches!(kind(&parsed, *value), ExprKind::Assign { .. }));
}

#[test]
fn test_prefix_and_postfix_update() {
    let (parsed, expr) = parse_return_expr("i++ + --j");
    let ExprKind::Binary { left, right, .. } = kind(&parsed, expr) else {
        panic!("expected binary");
    };
    assert!(matches!(
        kind(&parsed, *left),
        ExprKind::Update {
            op: UpdateOp::Increment,
            prefix: false,
            ..
        }
    ));
    assert!(matches!(
        kind(&parsed, *right),
        ExprKind::Update {
            op: UpdateOp::Decrement,
            prefix: true,
            ..
        }
    ));
}

#[test]
fn test_await_in_root_body() {
    let (parsed, expr) = parse_return_expr("await sleep(5)");
    let ExprKind::Await(inner) = kind(&parsed, expr) else {
        panic!("expected await");
    };
    assert!(matches!(kind(&parsed, *inner), ExprKind::Call { .. }));
}

#[test]
fn test_spans_cover_whole_expression() {
    let (parsed, expr) = parse_return_expr("foo(1, 2)");
    let span = parsed.arena.expr(expr).span;
    assert_eq!(span.slice("return foo(1, 2);"), "foo(1, 2)");
}
