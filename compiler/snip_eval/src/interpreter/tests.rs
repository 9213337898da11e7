#![allow(clippy::unwrap_used, reason = "tests unwrap known-good scripts")]

use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::{CompiledFunction, EvalOptions, RunFault, Value};

async fn run_with(params: &[&str], args: Vec<Value>, source: &str) -> Result<Value, RunFault> {
    let params: Vec<Arc<str>> = params.iter().map(|p| Arc::from(*p)).collect();
    let function = CompiledFunction::compile(&params, source).unwrap();
    function.invoke(args).await
}

async fn run(source: &str) -> Result<Value, RunFault> {
    run_with(&[], Vec::new(), source).await
}

/// Inspect the script's return value.
async fn eval(source: &str) -> String {
    run(source).await.unwrap().inspect()
}

/// The message of the fault the script ends with.
async fn fault(source: &str) -> String {
    run(source).await.unwrap_err().message
}

// Expressions

#[tokio::test]
async fn arithmetic_and_precedence() {
    assert_eq!(eval("return 1 + 2 * 3 ** 2").await, "19");
    assert_eq!(eval("return (1 + 2) * 3").await, "9");
    assert_eq!(eval("return 2 ** 3 ** 2").await, "512");
    assert_eq!(eval("return -7 % 3").await, "-1");
    assert_eq!(eval("return 0.1 + 0.2").await, "0.30000000000000004");
}

#[tokio::test]
async fn string_concatenation_coerces() {
    assert_eq!(eval(r#"return "a" + 1 + 2"#).await, r#""a12""#);
    assert_eq!(eval(r#"return 1 + 2 + "a""#).await, r#""3a""#);
    assert_eq!(eval(r#"return "n=" + null"#).await, r#""n=null""#);
}

#[tokio::test]
async fn logical_operators_short_circuit() {
    let source = r"
        let calls = 0;
        function touch() { calls++; return true; }
        const a = false && touch();
        const b = true || touch();
        const c = null ?? 'fallback';
        const d = 0 ?? 'unused';
        return [a, b, c, d, calls];
    ";
    assert_eq!(eval(source).await, r#"[false, true, "fallback", 0, 0]"#);
}

#[tokio::test]
async fn typeof_tolerates_undeclared_names() {
    assert_eq!(eval("return typeof missing").await, r#""undefined""#);
    assert_eq!(eval("return typeof (() => 1)").await, r#""function""#);
    assert_eq!(eval("return typeof null").await, r#""object""#);
}

#[tokio::test]
async fn compound_assignment_and_update() {
    let source = r"
        let x = 10;
        x += 5;
        x -= 3;
        x *= 2;
        x /= 4;
        x %= 4;
        let y = x++;
        let z = --x;
        return [x, y, z];
    ";
    assert_eq!(eval(source).await, "[2, 2, 2]");
}

#[tokio::test]
async fn objects_and_arrays_alias() {
    let source = r"
        const obj = { a: 1, nested: { b: 2 } };
        const alias = obj;
        alias.a = 10;
        obj.nested.b += 1;
        obj['c'] = 3;
        const list = [1, 2];
        list[3] = 4;
        return [obj, list.length, list[2]];
    ";
    assert_eq!(
        eval(source).await,
        "[{ a: 10, nested: { b: 3 }, c: 3 }, 4, undefined]"
    );
}

#[tokio::test]
async fn shorthand_properties_and_methods() {
    let source = r"
        const name = 'snip';
        const obj = { name, greet(who) { return 'hi ' + who; } };
        return obj.greet(obj.name);
    ";
    assert_eq!(eval(source).await, r#""hi snip""#);
}

// Functions and scope

#[tokio::test]
async fn closures_keep_their_environment() {
    let source = r"
        function counter() {
            let n = 0;
            return () => ++n;
        }
        const c = counter();
        c();
        c();
        return c();
    ";
    assert_eq!(eval(source).await, "3");
}

#[tokio::test]
async fn function_declarations_are_hoisted() {
    assert_eq!(eval("return double(4); function double(x) { return x * 2 }").await, "8");
}

#[tokio::test]
async fn missing_arguments_are_undefined() {
    assert_eq!(eval("function f(a, b) { return b } return f(1)").await, "undefined");
}

#[tokio::test]
async fn var_is_function_scoped() {
    let source = r"
        function f() {
            if (true) { var inner = 'seen'; }
            return inner;
        }
        return f();
    ";
    assert_eq!(eval(source).await, r#""seen""#);
}

#[tokio::test]
async fn block_scoped_let_shadows() {
    let source = r"
        let x = 'outer';
        { let x = 'inner'; }
        return x;
    ";
    assert_eq!(eval(source).await, r#""outer""#);
}

#[tokio::test]
async fn parameters_are_bound_in_order() {
    let result = run_with(
        &["a", "b"],
        vec![Value::Number(2.0), Value::Number(3.0)],
        "return a * 10 + b",
    )
    .await
    .unwrap();
    assert_eq!(result.as_number(), Some(23.0));
}

#[tokio::test]
async fn body_may_shadow_a_parameter() {
    let result = run_with(&["x"], vec![Value::Number(1.0)], "let x = 5; return x")
        .await
        .unwrap();
    assert_eq!(result.as_number(), Some(5.0));
}

// Control flow

#[tokio::test]
async fn loops_with_break_and_continue() {
    let source = r"
        let sum = 0;
        let i = 0;
        while (true) {
            i++;
            if (i > 9) break;
            if (i % 2 === 0) continue;
            sum += i;
        }
        return sum;
    ";
    assert_eq!(eval(source).await, "25");
}

#[tokio::test]
async fn for_loop_closures_capture_each_iteration() {
    let source = r"
        const fns = [];
        for (let i = 0; i < 3; i++) {
            fns.push(() => i);
        }
        return fns.map(f => f());
    ";
    assert_eq!(eval(source).await, "[0, 1, 2]");
}

#[tokio::test]
async fn for_of_over_arrays_and_strings() {
    let source = r"
        let out = '';
        for (const n of [1, 2, 3]) { out += n; }
        for (const c of 'ab') { out += c; }
        return out;
    ";
    assert_eq!(eval(source).await, r#""123ab""#);
}

#[tokio::test]
async fn for_of_rejects_non_iterables() {
    assert_eq!(
        fault("for (const x of 5) {}").await,
        "TypeError: 5 is not iterable"
    );
}

#[tokio::test]
async fn return_inside_loop_exits_function() {
    let source = r"
        function find(xs) {
            for (const x of xs) {
                if (x > 1) return x;
            }
            return -1;
        }
        return [find([1, 2, 3]), find([])];
    ";
    assert_eq!(eval(source).await, "[2, -1]");
}

// Errors

#[tokio::test]
async fn runtime_errors_are_catchable() {
    let source = r"
        try {
            undefinedName;
        } catch (e) {
            return e.name + ': ' + e.message;
        }
    ";
    assert_eq!(
        eval(source).await,
        r#""ReferenceError: undefinedName is not defined""#
    );
}

#[tokio::test]
async fn catch_without_binding() {
    assert_eq!(eval("try { null.x } catch { return 'caught' }").await, r#""caught""#);
}

#[tokio::test]
async fn finally_runs_and_can_override() {
    let source = r"
        const log = [];
        function f() {
            try { return 1; } finally { log.push('cleanup'); }
        }
        function g() {
            try { return 1; } finally { return 2; }
        }
        return [f(), g(), log];
    ";
    assert_eq!(eval(source).await, r#"[1, 2, ["cleanup"]]"#);
}

#[tokio::test]
async fn const_reassignment_throws() {
    assert_eq!(
        fault("const x = 1; x = 2;").await,
        "TypeError: Assignment to constant variable."
    );
}

#[tokio::test]
async fn calling_a_non_function_names_the_callee() {
    assert_eq!(
        fault("const obj = { x: 1 }; obj.x();").await,
        "TypeError: obj.x is not a function"
    );
}

#[tokio::test]
async fn reading_from_undefined_throws() {
    assert_eq!(
        fault("let o; return o.a;").await,
        "TypeError: Cannot read properties of undefined (reading 'a')"
    );
}

#[tokio::test]
async fn user_functions_are_not_constructors() {
    assert_eq!(
        fault("function Point() {} new Point();").await,
        "TypeError: Point is not a constructor"
    );
}

#[tokio::test]
async fn thrown_non_errors_keep_their_value() {
    let fault = run("throw { code: 42 }").await.unwrap_err();
    assert_eq!(fault.message, "Uncaught { code: 42 }");
    assert_eq!(fault.error_message(), "{ code: 42 }");
}

#[tokio::test]
async fn error_stack_lists_script_frames() {
    let source = "function inner() {\n  throw new Error(\"boom\");\n}\nfunction outer() { inner(); }\nouter();";
    let fault = run(source).await.unwrap_err();
    assert_eq!(fault.message, "Error: boom");
    let lines: Vec<&str> = fault.detail().lines().collect();
    assert_eq!(
        lines,
        vec![
            "Error: boom",
            "    at inner (2:9)",
            "    at outer (4:20)",
            "    at <anonymous> (5:1)",
        ]
    );
}

#[tokio::test]
async fn runaway_recursion_is_a_range_error() {
    let function = CompiledFunction::compile_with(
        &[],
        "function f(n) { return f(n + 1) } return f(0)",
        EvalOptions::default().with_max_call_depth(64),
    )
    .unwrap();
    let fault = function.invoke(Vec::new()).await.unwrap_err();
    assert_eq!(fault.message, "RangeError: Maximum call stack size exceeded");
}

#[tokio::test]
async fn deep_recursion_within_the_limit_succeeds() {
    let source = "function depth(n) { return n === 0 ? 0 : 1 + depth(n - 1) } return depth(400)";
    assert_eq!(eval(source).await, "400");
}

// Async

#[tokio::test]
async fn top_level_await_of_sleep() {
    assert_eq!(eval("await sleep(1); return 'done'").await, r#""done""#);
}

#[tokio::test]
async fn async_functions_return_promises() {
    let source = r"
        async function f() { return 5; }
        const p = f();
        return typeof p + ' ' + (await p);
    ";
    assert_eq!(eval(source).await, r#""object 5""#);
}

#[tokio::test]
async fn promise_all_preserves_order() {
    let source = r"
        const slow = async () => { await sleep(10); return 'slow'; };
        const fast = async () => { await sleep(1); return 'fast'; };
        return await Promise.all([slow(), fast(), 3]);
    ";
    assert_eq!(eval(source).await, r#"["slow", "fast", 3]"#);
}

#[tokio::test]
async fn rejections_surface_at_await() {
    let source = r"
        async function fail() { await sleep(1); throw new TypeError('late'); }
        try {
            await fail();
        } catch (e) {
            return e.name;
        }
    ";
    assert_eq!(eval(source).await, r#""TypeError""#);
}

#[tokio::test]
async fn then_and_catch_chain() {
    let source = r"
        const doubled = await Promise.resolve(21).then(x => x * 2);
        const recovered = await Promise.reject('no').catch(e => 'recovered from ' + e);
        return [doubled, recovered];
    ";
    assert_eq!(eval(source).await, r#"[42, "recovered from no"]"#);
}

#[tokio::test]
async fn uncaught_error_after_suspension() {
    let fault = fault(r#"await sleep(5); throw new Error("boom");"#).await;
    assert_eq!(fault, "Error: boom");
}
