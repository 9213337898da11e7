#![allow(clippy::unwrap_used, reason = "tests unwrap known-good scripts")]

use pretty_assertions::assert_eq;

use crate::{CompiledFunction, Value};

async fn eval(source: &str) -> String {
    let function = CompiledFunction::compile(&[], source).unwrap();
    function.invoke(Vec::new()).await.unwrap().inspect()
}

async fn fault(source: &str) -> String {
    let function = CompiledFunction::compile(&[], source).unwrap();
    function.invoke(Vec::new()).await.unwrap_err().message
}

#[tokio::test]
async fn array_mutators() {
    let source = r"
        const xs = [1, 2];
        const len = xs.push(3, 4);
        const last = xs.pop();
        const reversed = xs.reverse();
        return [len, last, xs, reversed === xs];
    ";
    assert_eq!(eval(source).await, "[4, 4, [3, 2, 1], true]");
}

#[tokio::test]
async fn array_callbacks() {
    let source = r"
        const xs = [1, 2, 3, 4];
        const seen = [];
        xs.forEach((x, i) => seen.push(i));
        return [
            xs.map(x => x * x),
            xs.filter(x => x % 2 === 0),
            xs.find(x => x > 2),
            xs.find(x => x > 10),
            xs.reduce((acc, x) => acc + x),
            xs.reduce((acc, x) => acc + x, 100),
            seen,
        ];
    ";
    assert_eq!(
        eval(source).await,
        "[[1, 4, 9, 16], [2, 4], 3, undefined, 10, 110, [0, 1, 2, 3]]"
    );
}

#[tokio::test]
async fn callbacks_may_be_async_natives_or_closures() {
    let source = r"
        const words = ['a', 'b'].map(String);
        const upper = words.map(w => w.toUpperCase());
        return upper.join('-');
    ";
    assert_eq!(eval(source).await, r#""A-B""#);
}

#[tokio::test]
async fn reduce_of_empty_array_throws() {
    assert_eq!(
        fault("[].reduce((a, b) => a + b)").await,
        "TypeError: Reduce of empty array with no initial value"
    );
}

#[tokio::test]
async fn callback_must_be_callable() {
    assert_eq!(fault("[1].map(5)").await, "TypeError: 5 is not a function");
}

#[tokio::test]
async fn array_queries() {
    let source = r"
        const xs = [1, 'two', NaN, null];
        return [
            xs.includes('two'),
            xs.includes(NaN),
            xs.indexOf(NaN),
            xs.indexOf(null),
            xs.join(),
            [1, [2, 3]].concat([4], 5).length,
            xs.slice(1, -1),
            xs.slice(-1),
        ];
    ";
    assert_eq!(
        eval(source).await,
        r#"[true, true, -1, 3, "1,two,NaN,", 4, ["two", NaN], [null]]"#
    );
}

#[tokio::test]
async fn array_length_can_be_set() {
    assert_eq!(eval("const xs = [1, 2, 3]; xs.length = 1; return xs").await, "[1]");
    assert_eq!(
        fault("const xs = []; xs.length = -1").await,
        "RangeError: Invalid array length"
    );
}

#[tokio::test]
async fn string_methods() {
    let source = r"
        const s = '  Hello, World  ';
        const t = s.trim();
        return [
            t.length,
            t.toUpperCase(),
            t.toLowerCase(),
            t.includes('World'),
            t.startsWith('Hell'),
            t.endsWith('!'),
            t.indexOf('o'),
            t.slice(7),
            t.slice(-5, -1),
            t.split(', '),
            'abc'.split(''),
            t[0],
            'ab'.repeat(3),
        ];
    ";
    assert_eq!(
        eval(source).await,
        r#"[12, "HELLO, WORLD", "hello, world", true, true, false, 4, "World", "Worl", ["Hello", "World"], ["a", "b", "c"], "H", "ababab"]"#
    );
}

#[tokio::test]
async fn split_honours_the_limit() {
    assert_eq!(eval("return 'a,b,c'.split(',', 2)").await, r#"["a", "b"]"#);
    assert_eq!(eval("return 'a,b'.split(',', 0)").await, "[]");
    assert_eq!(eval("return 'abc'.split('', 1)").await, r#"["a"]"#);
    assert_eq!(eval("return 'abc'.split(undefined, 0)").await, "[]");
    assert_eq!(eval("return 'a,b'.split(',', -1)").await, r#"["a", "b"]"#);
    assert_eq!(eval("return 'a,b'.split(',', undefined)").await, r#"["a", "b"]"#);
}

#[tokio::test]
async fn string_positions_count_characters() {
    assert_eq!(eval("return 'héllo'.indexOf('l')").await, "2");
    assert_eq!(eval("return 'héllo'.length").await, "5");
}

#[tokio::test]
async fn string_replace_first_match() {
    assert_eq!(eval("return 'a-b-c'.replace('-', '+')").await, r#""a+b-c""#);
    assert_eq!(
        eval("return 'x1'.replace('1', m => '[' + m + ']')").await,
        r#""x[1]""#
    );
    assert_eq!(eval("return 'abc'.replace('z', 'y')").await, r#""abc""#);
}

#[tokio::test]
async fn repeat_rejects_negative_counts() {
    assert_eq!(
        fault("'a'.repeat(-1)").await,
        "RangeError: Invalid count value: -1"
    );
}

#[tokio::test]
async fn number_methods() {
    let source = r"
        const n = 3.14159;
        return [n.toFixed(2), (10).toFixed(1), (255).toString(16), (-5).toString(2), (1.5).toString()];
    ";
    assert_eq!(
        eval(source).await,
        r#"["3.14", "10.0", "ff", "-101", "1.5"]"#
    );
}

#[tokio::test]
async fn bound_methods_remember_their_receiver() {
    let source = r"
        const xs = [];
        const push = xs.push;
        push(1);
        push(2);
        return xs;
    ";
    assert_eq!(eval(source).await, "[1, 2]");
}

#[test]
fn relative_index_clamps() {
    use super::relative_index;

    assert_eq!(relative_index(&Value::Undefined, 5, 5), 5);
    assert_eq!(relative_index(&Value::Number(-2.0), 5, 0), 3);
    assert_eq!(relative_index(&Value::Number(-20.0), 5, 0), 0);
    assert_eq!(relative_index(&Value::Number(20.0), 5, 0), 5);
    assert_eq!(relative_index(&Value::Number(f64::NAN), 5, 0), 0);
    assert_eq!(relative_index(&Value::Number(1.7), 5, 0), 1);
}
