//! Global bindings available to every script.
//!
//! Each invocation gets a fresh global scope, so scripts that overwrite a
//! global (`Math = 1`) cannot affect later runs.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{try_join_all, FutureExt};
use serde::Serialize;

use crate::environment::{Env, Mutability};
use crate::errors::{make_error, syntax_error, type_error, ErrorKind};
use crate::native::arg;
use crate::promise::Promise;
use crate::{Interpreter, Thrown, Value};

/// Build a fresh global scope.
pub fn globals() -> Env {
    let env = Env::new();
    let define = |name: &str, value: Value| {
        env.define(Arc::from(name), value, Mutability::Mutable);
    };

    define("sleep", Value::native("sleep", sleep));
    define("console", console());
    define("Math", math());
    define("JSON", json());
    define(
        "String",
        Value::native("String", |_, args| {
            Ok(match args.first() {
                Some(value) => Value::string(value.to_display()),
                None => Value::string(""),
            })
        }),
    );
    define(
        "Number",
        Value::native("Number", |_, args| {
            Ok(Value::Number(args.first().map_or(0.0, Value::to_number)))
        }),
    );
    define(
        "Boolean",
        Value::native("Boolean", |_, args| {
            Ok(Value::Bool(arg(&args, 0).is_truthy()))
        }),
    );
    define(
        "Array",
        Value::object([(
            "isArray",
            Value::native("isArray", |_, args| {
                Ok(Value::Bool(matches!(arg(&args, 0), Value::Array(_))))
            }),
        )]),
    );
    define("Object", object());
    define("Promise", promise());
    for kind in ErrorKind::ALL {
        define(kind.name(), error_constructor(kind));
    }

    env.define(Arc::from("NaN"), Value::Number(f64::NAN), Mutability::Immutable);
    env.define(
        Arc::from("Infinity"),
        Value::Number(f64::INFINITY),
        Mutability::Immutable,
    );
    env
}

/// `sleep(ms)`: a promise resolving to `undefined` after `ms` milliseconds.
/// The timer starts at the call, not at the first `await`.
fn sleep(interp: &Interpreter, args: Vec<Value>) -> Result<Value, Thrown> {
    let ms = arg(&args, 0).to_number();
    let ms = if ms.is_finite() && ms > 0.0 { ms as u64 } else { 0 };
    let deadline = tokio::time::Instant::now() + Duration::from_millis(ms);
    let promise = Promise::from_future(async move {
        tokio::time::sleep_until(deadline).await;
        Ok(Value::Undefined)
    });
    interp.track(&promise);
    Ok(Value::Promise(promise))
}

#[derive(Copy, Clone)]
enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

fn console() -> Value {
    let method = |name: &'static str, level: ConsoleLevel| {
        (
            name,
            Value::native(name, move |interp, args| {
                if interp.options().echo_console {
                    let line = format_console_line(&args);
                    match level {
                        ConsoleLevel::Info => tracing::info!(target: "snip::console", "{line}"),
                        ConsoleLevel::Warn => tracing::warn!(target: "snip::console", "{line}"),
                        ConsoleLevel::Error => tracing::error!(target: "snip::console", "{line}"),
                    }
                }
                Ok(Value::Undefined)
            }),
        )
    };
    Value::object([
        method("log", ConsoleLevel::Info),
        method("info", ConsoleLevel::Info),
        method("warn", ConsoleLevel::Warn),
        method("error", ConsoleLevel::Error),
    ])
}

/// Top-level strings print raw; everything else is inspected.
pub(crate) fn format_console_line(args: &[Value]) -> String {
    args.iter()
        .map(|value| match value {
            Value::Str(s) => s.to_string(),
            other => other.inspect(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn math() -> Value {
    fn unary(name: &'static str, f: fn(f64) -> f64) -> (&'static str, Value) {
        (
            name,
            Value::native(name, move |_, args| Ok(Value::Number(f(arg(&args, 0).to_number())))),
        )
    }

    fn fold(name: &'static str, empty: f64, pick: fn(f64, f64) -> f64) -> (&'static str, Value) {
        (
            name,
            Value::native(name, move |_, args| {
                let mut result = empty;
                for value in &args {
                    let n = value.to_number();
                    if n.is_nan() {
                        return Ok(Value::Number(f64::NAN));
                    }
                    result = pick(result, n);
                }
                Ok(Value::Number(result))
            }),
        )
    }

    Value::object([
        unary("floor", f64::floor),
        unary("ceil", f64::ceil),
        unary("round", |n| (n + 0.5).floor()),
        unary("abs", f64::abs),
        unary("sqrt", f64::sqrt),
        unary("trunc", f64::trunc),
        fold("min", f64::INFINITY, f64::min),
        fold("max", f64::NEG_INFINITY, f64::max),
        (
            "pow",
            Value::native("pow", |_, args| {
                let base = arg(&args, 0);
                let exponent = arg(&args, 1);
                Ok(crate::operators::evaluate_binary(
                    snip_ir::BinaryOp::Pow,
                    &base,
                    &exponent,
                ))
            }),
        ),
        ("PI", Value::Number(std::f64::consts::PI)),
        ("E", Value::Number(std::f64::consts::E)),
    ])
}

fn json() -> Value {
    Value::object([
        ("stringify", Value::native("stringify", stringify)),
        (
            "parse",
            Value::native("parse", |interp, args| {
                let text = arg(&args, 0).to_display();
                serde_json::from_str::<serde_json::Value>(&text)
                    .map(|json| Value::from_json(&json))
                    .map_err(|err| syntax_error(interp, format!("JSON.parse: {err}")))
            }),
        ),
    ])
}

/// `JSON.stringify(value, replacer, indent)`. The replacer is ignored.
fn stringify(interp: &Interpreter, args: Vec<Value>) -> Result<Value, Thrown> {
    let json = match arg(&args, 0).try_to_json() {
        Ok(Some(json)) => json,
        Ok(None) => return Ok(Value::Undefined),
        Err(_) => {
            return Err(type_error(interp, "Converting circular structure to JSON"));
        }
    };
    let indent = match arg(&args, 2) {
        Value::Number(n) if n >= 1.0 => " ".repeat((n as usize).min(10)),
        Value::Str(s) => s.chars().take(10).collect(),
        _ => String::new(),
    };
    let text = if indent.is_empty() {
        serde_json::to_string(&json)
    } else {
        to_string_indented(&json, &indent)
    };
    text.map(Value::string)
        .map_err(|err| type_error(interp, err.to_string()))
}

fn to_string_indented(json: &serde_json::Value, indent: &str) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    json.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn object() -> Value {
    Value::object([
        (
            "keys",
            Value::native("keys", |_, args| {
                let keys = entries_of(&arg(&args, 0))
                    .into_iter()
                    .map(|(key, _)| Value::Str(key))
                    .collect();
                Ok(Value::array(keys))
            }),
        ),
        (
            "values",
            Value::native("values", |_, args| {
                let values = entries_of(&arg(&args, 0))
                    .into_iter()
                    .map(|(_, value)| value)
                    .collect();
                Ok(Value::array(values))
            }),
        ),
        (
            "entries",
            Value::native("entries", |_, args| {
                let entries = entries_of(&arg(&args, 0))
                    .into_iter()
                    .map(|(key, value)| Value::array(vec![Value::Str(key), value]))
                    .collect();
                Ok(Value::array(entries))
            }),
        ),
    ])
}

/// Own enumerable entries of a value, in insertion order.
fn entries_of(value: &Value) -> Vec<(Arc<str>, Value)> {
    match value {
        Value::Object(properties) => properties
            .read()
            .iter()
            .map(|(key, value)| (Arc::clone(key), value.clone()))
            .collect(),
        Value::Array(items) => items
            .read()
            .iter()
            .enumerate()
            .map(|(index, item)| (Arc::from(index.to_string()), item.clone()))
            .collect(),
        Value::Str(s) => s
            .chars()
            .enumerate()
            .map(|(index, c)| (Arc::from(index.to_string()), Value::string(c.to_string())))
            .collect(),
        Value::Host(host) => host
            .keys()
            .into_iter()
            .map(|key| {
                let value = host.get(&key).unwrap_or(Value::Undefined);
                (key, value)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn promise() -> Value {
    Value::object([
        (
            "all",
            Value::native("all", |interp, args| {
                let Some(items) = arg(&args, 0).array_items() else {
                    return Err(type_error(interp, "Promise.all expects an array"));
                };
                let pending = items.into_iter().map(|item| async move {
                    match item {
                        Value::Promise(promise) => promise.settle().await,
                        value => Ok(value),
                    }
                });
                let all = try_join_all(pending).map(|settled| settled.map(Value::array));
                let promise = Promise::from_future(all);
                interp.track(&promise);
                Ok(Value::Promise(promise))
            }),
        ),
        (
            "resolve",
            Value::native("resolve", |_, args| {
                Ok(match arg(&args, 0) {
                    promise @ Value::Promise(_) => promise,
                    value => Value::Promise(Promise::resolved(value)),
                })
            }),
        ),
        (
            "reject",
            Value::native("reject", |interp, args| {
                let thrown = Thrown::new(arg(&args, 0), interp);
                Ok(Value::Promise(Promise::rejected(thrown)))
            }),
        ),
    ])
}

/// `Error(message)` and `new Error(message)` behave the same.
fn error_constructor(kind: ErrorKind) -> Value {
    Value::native(kind.name(), move |interp, args| {
        let message = match arg(&args, 0) {
            Value::Undefined => String::new(),
            other => other.to_display(),
        };
        Ok(make_error(interp, kind.name(), &message))
    })
}
