//! `Array.prototype` methods.

use futures::FutureExt;

use super::{relative_index, same_value_zero};
use crate::errors::type_error;
use crate::native::arg;
use crate::value::ArrayRef;
use crate::{Interpreter, Thrown, Value};

pub(crate) fn array_method(items: &ArrayRef, name: &str) -> Option<Value> {
    let items = items.clone();
    let method = match name {
        "push" => Value::native(name, move |_, args| {
            let mut items = items.write();
            items.extend(args);
            Ok(Value::Number(items.len() as f64))
        }),
        "pop" => Value::native(name, move |_, _| {
            Ok(items.write().pop().unwrap_or(Value::Undefined))
        }),
        "includes" => Value::native(name, move |_, args| {
            let needle = arg(&args, 0);
            Ok(Value::Bool(
                items.read().iter().any(|item| same_value_zero(item, &needle)),
            ))
        }),
        "indexOf" => Value::native(name, move |_, args| {
            let needle = arg(&args, 0);
            let position = items.read().iter().position(|item| item.strict_equals(&needle));
            Ok(Value::Number(position.map_or(-1.0, |i| i as f64)))
        }),
        "join" => Value::native(name, move |_, args| {
            let separator = match arg(&args, 0) {
                Value::Undefined => ",".to_string(),
                other => other.to_display(),
            };
            let snapshot = items.read().clone();
            let parts: Vec<String> = snapshot
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_display()
                    }
                })
                .collect();
            Ok(Value::string(parts.join(&separator)))
        }),
        "slice" => Value::native(name, move |_, args| {
            let snapshot = items.read();
            let len = snapshot.len();
            let start = relative_index(&arg(&args, 0), len, 0);
            let end = relative_index(&arg(&args, 1), len, len);
            let sliced = snapshot.get(start..end.max(start)).unwrap_or_default().to_vec();
            Ok(Value::array(sliced))
        }),
        "concat" => Value::native(name, move |_, args| {
            let mut joined = items.read().clone();
            for value in args {
                match value.array_items() {
                    Some(more) => joined.extend(more),
                    None => joined.push(value),
                }
            }
            Ok(Value::array(joined))
        }),
        "reverse" => Value::native(name, move |_, _| {
            items.write().reverse();
            Ok(Value::Array(items.clone()))
        }),
        "map" | "filter" | "forEach" | "find" | "reduce" => return Some(callback_method(items, name)),
        _ => return None,
    };
    Some(method)
}

/// Methods that call back into script code.
fn callback_method(items: ArrayRef, name: &str) -> Value {
    let method = name.to_string();
    Value::native_async(name, move |interp, args| {
        let items = items.clone();
        let method = method.clone();
        async move {
            let callback = arg(&args, 0);
            if !callback.is_callable() {
                return Err(type_error(
                    &interp,
                    format!("{} is not a function", callback.inspect()),
                ));
            }
            let snapshot = items.read().clone();
            match method.as_str() {
                "map" => {
                    let mut mapped = Vec::with_capacity(snapshot.len());
                    for (index, item) in snapshot.into_iter().enumerate() {
                        mapped.push(invoke(&interp, &callback, item, index, &items).await?);
                    }
                    Ok(Value::array(mapped))
                }
                "filter" => {
                    let mut kept = Vec::new();
                    for (index, item) in snapshot.into_iter().enumerate() {
                        if invoke(&interp, &callback, item.clone(), index, &items)
                            .await?
                            .is_truthy()
                        {
                            kept.push(item);
                        }
                    }
                    Ok(Value::array(kept))
                }
                "forEach" => {
                    for (index, item) in snapshot.into_iter().enumerate() {
                        invoke(&interp, &callback, item, index, &items).await?;
                    }
                    Ok(Value::Undefined)
                }
                "find" => {
                    for (index, item) in snapshot.into_iter().enumerate() {
                        if invoke(&interp, &callback, item.clone(), index, &items)
                            .await?
                            .is_truthy()
                        {
                            return Ok(item);
                        }
                    }
                    Ok(Value::Undefined)
                }
                _ => reduce(&interp, &callback, args.get(1).cloned(), snapshot, &items).await,
            }
        }
        .boxed()
    })
}

async fn invoke(
    interp: &Interpreter,
    callback: &Value,
    item: Value,
    index: usize,
    items: &ArrayRef,
) -> Result<Value, Thrown> {
    interp
        .call(
            callback.clone(),
            vec![item, Value::Number(index as f64), Value::Array(items.clone())],
        )
        .await
}

async fn reduce(
    interp: &Interpreter,
    callback: &Value,
    initial: Option<Value>,
    snapshot: Vec<Value>,
    items: &ArrayRef,
) -> Result<Value, Thrown> {
    let mut entries = snapshot.into_iter().enumerate();
    let mut accumulator = match initial {
        Some(initial) => initial,
        None => match entries.next() {
            Some((_, first)) => first,
            None => {
                return Err(type_error(
                    interp,
                    "Reduce of empty array with no initial value",
                ))
            }
        },
    };
    for (index, item) in entries {
        accumulator = interp
            .call(
                callback.clone(),
                vec![
                    accumulator,
                    item,
                    Value::Number(index as f64),
                    Value::Array(items.clone()),
                ],
            )
            .await?;
    }
    Ok(accumulator)
}
