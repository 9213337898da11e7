#![allow(clippy::unwrap_used, reason = "tests unwrap parses known to succeed")]

use super::*;
use pretty_assertions::assert_eq;
use snip_ir::{CatchClause, StmtId, StmtKind};

fn params(names: &[&str]) -> Vec<Arc<str>> {
    names.iter().map(|name| Arc::from(*name)).collect()
}

fn root_stmts(parsed: &ParsedBody) -> Vec<StmtId> {
    match &parsed.arena.function(parsed.root).body {
        FunctionBody::Block(stmts) => stmts.clone(),
        FunctionBody::Expr(_) => panic!("root body is always a block"),
    }
}

fn parse_ok(source: &str) -> ParsedBody {
    match parse_body(&[], source) {
        Ok(parsed) => parsed,
        Err(diagnostics) => panic!("unexpected diagnostics for {source:?}: {diagnostics:?}"),
    }
}

fn parse_err(source: &str) -> Diagnostic {
    match parse_body(&[], source) {
        Ok(_) => panic!("expected {source:?} to fail"),
        Err(mut diagnostics) => diagnostics.remove(0),
    }
}

// === Root function ===

#[test]
fn test_root_is_async_with_given_params() {
    let parsed = parse_body(&params(&["app", "engine", "context", "x"]), "return x * 2;").unwrap();
    let root = parsed.arena.function(parsed.root);
    assert!(root.is_async);
    assert!(!root.is_arrow);
    let names: Vec<_> = root.params.iter().map(|p| &*p.name).collect();
    assert_eq!(names, vec!["app", "engine", "context", "x"]);
}

#[test]
fn test_duplicate_params_are_allowed() {
    assert!(parse_body(&params(&["app", "engine", "context", "app"]), "return app").is_ok());
}

#[test]
fn test_empty_source_parses() {
    assert!(root_stmts(&parse_ok("")).is_empty());
    assert!(root_stmts(&parse_ok("  // just a comment\n")).is_empty());
}

#[test]
fn test_invalid_binding_name_is_rejected() {
    let err = parse_body(&params(&["app", "not valid"]), "return 1").unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err[0].code, ErrorCode::E2001);
    assert!(err[0].message.contains("#1"));
}

#[test]
fn test_binding_name_validation() {
    assert!(is_valid_binding_name("x"));
    assert!(is_valid_binding_name("$el"));
    assert!(is_valid_binding_name("_private1"));
    assert!(!is_valid_binding_name(""));
    assert!(!is_valid_binding_name("1abc"));
    assert!(!is_valid_binding_name("let"));
    assert!(!is_valid_binding_name(" x"));
    assert!(!is_valid_binding_name("a-b"));
}

// === Statements ===

#[test]
fn test_declarations() {
    let parsed = parse_ok("let a = 1, b; const c = 2; var d");
    let stmts = root_stmts(&parsed);
    assert_eq!(stmts.len(), 3);
    let StmtKind::Decl { kind, declarators } = &parsed.arena.stmt(stmts[0]).kind else {
        panic!("expected declaration");
    };
    assert_eq!(*kind, DeclKind::Let);
    assert_eq!(declarators.len(), 2);
    assert!(declarators[1].init.is_none());
}

#[test]
fn test_automatic_semicolon_insertion() {
    let parsed = parse_ok("let a = 1\nlet b = a + 1\nreturn b");
    assert_eq!(root_stmts(&parsed).len(), 3);
}

#[test]
fn test_return_followed_by_newline_returns_nothing() {
    let parsed = parse_ok("return\n42");
    let stmts = root_stmts(&parsed);
    assert_eq!(parsed.arena.stmt(stmts[0]).kind, StmtKind::Return(None));
    assert_eq!(stmts.len(), 2);
}

#[test]
fn test_missing_semicolon_on_one_line_is_an_error() {
    let err = parse_err("let a = 1 let b = 2");
    assert_eq!(err.code, ErrorCode::E1001);
}

#[test]
fn test_control_flow_statements() {
    let source = "
        if (a) { b() } else if (c) d(); else { e() }
        while (i < 3) { i++; if (i == 2) continue; }
        for (let i = 0; i < 10; i += 1) { if (i > 5) break }
        for (;;) { break }
        for (const item of items) { total += item }
        try { risky() } catch (e) { handle(e) } finally { done() }
        try { risky() } catch { }
        throw new Error('x')
    ";
    let parsed = parse_ok(source);
    let stmts = root_stmts(&parsed);
    assert_eq!(stmts.len(), 8);
    assert!(matches!(parsed.arena.stmt(stmts[4]).kind, StmtKind::ForOf { .. }));
    assert!(matches!(
        parsed.arena.stmt(stmts[6]).kind,
        StmtKind::Try {
            handler: Some(CatchClause { param: None, .. }),
            ..
        }
    ));
}

#[test]
fn test_function_declarations() {
    let parsed = parse_ok("function add(a, b) { return a + b }\nasync function later() { await sleep(1) }");
    let stmts = root_stmts(&parsed);
    let StmtKind::Function(add) = parsed.arena.stmt(stmts[0]).kind else {
        panic!("expected function declaration");
    };
    let StmtKind::Function(later) = parsed.arena.stmt(stmts[1]).kind else {
        panic!("expected function declaration");
    };
    assert_eq!(parsed.arena.function(add).display_name(), "add");
    assert!(!parsed.arena.function(add).is_async);
    assert!(parsed.arena.function(later).is_async);
}

#[test]
fn test_of_is_still_an_identifier() {
    parse_ok("let of = 1; for (let x of [of]) {}");
}

// === Errors ===

#[test]
fn test_unclosed_paren_at_end_of_input() {
    let err = parse_err("function(");
    assert!(matches!(err.code, ErrorCode::E1003 | ErrorCode::E1004));
}

#[test]
fn test_unclosed_brace_reports_e1003() {
    let err = parse_err("if (a) { b()");
    assert_eq!(err.code, ErrorCode::E1003);
}

#[test]
fn test_expected_expression() {
    let err = parse_err("let x = ;");
    assert_eq!(err.code, ErrorCode::E1002);
}

#[test]
fn test_await_in_sync_function_is_rejected() {
    let err = parse_err("function f() { await g() }");
    assert_eq!(err.code, ErrorCode::E1006);
    let err = parse_err("const f = x => await x");
    assert_eq!(err.code, ErrorCode::E1006);
    parse_ok("const f = async x => await x");
}

#[test]
fn test_break_outside_loop() {
    assert_eq!(parse_err("break").code, ErrorCode::E1007);
    assert_eq!(
        parse_err("while (true) { const f = () => { continue } }").code,
        ErrorCode::E1007
    );
}

#[test]
fn test_duplicate_let_in_same_block() {
    assert_eq!(parse_err("let x = 1; let x = 2;").code, ErrorCode::E1008);
    parse_ok("let x = 1; { let x = 2; }");
    parse_ok("var y = 1; var y = 2;");
}

#[test]
fn test_let_may_not_redeclare_a_function_parameter() {
    assert_eq!(parse_err("function f(a) { let a = 1 }").code, ErrorCode::E1008);
}

#[test]
fn test_root_bindings_may_be_shadowed() {
    assert!(parse_body(&params(&["context"]), "const context = 1; return context").is_ok());
}

#[test]
fn test_const_requires_initializer() {
    assert_eq!(parse_err("const x;").code, ErrorCode::E1009);
}

#[test]
fn test_invalid_assignment_target() {
    assert_eq!(parse_err("1 = 2").code, ErrorCode::E1005);
    assert_eq!(parse_err("f()++").code, ErrorCode::E1005);
}

#[test]
fn test_lexer_errors_short_circuit() {
    assert_eq!(parse_err("let s = 'open").code, ErrorCode::E0001);
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 2_000;
    let source = format!("return {}1{}", "(".repeat(depth), ")".repeat(depth));
    parse_ok(&source);
}

#[test]
fn test_deeply_nested_parentheses_parse_in_linear_time() {
    let depth = 20_000;
    let source = format!("return {}(x) => x{}", "(".repeat(depth), ")".repeat(depth));
    let start = std::time::Instant::now();
    parse_ok(&source);
    assert!(
        start.elapsed() < std::time::Duration::from_secs(5),
        "parsing took {:?}",
        start.elapsed()
    );
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parser_never_panics(source in "\\PC{0,120}") {
            let _ = parse_body(&[], &source);
        }

        #[test]
        fn parser_never_panics_on_token_soup(
            pieces in proptest::collection::vec(
                prop_oneof![
                    Just("("), Just(")"), Just("{"), Just("}"), Just("["), Just("]"),
                    Just("=>"), Just("async"), Just("await"), Just("x"), Just("1"),
                    Just(","), Just(";"), Just("\n"), Just("return"), Just("function"),
                    Just("for"), Just("of"), Just("let"), Just("="), Just("+"), Just("?"),
                    Just(":"), Just("."), Just("++"),
                ],
                0..40,
            )
        ) {
            let _ = parse_body(&[], &pieces.join(" "));
        }

        #[test]
        fn arithmetic_chains_parse(values in proptest::collection::vec(0u32..1000, 1..20)) {
            let joined = values.iter().map(u32::to_string).collect::<Vec<_>>().join(" + ");
            let source = format!("return {joined}");
            prop_assert!(parse_body(&[], &source).is_ok());
        }
    }
}
