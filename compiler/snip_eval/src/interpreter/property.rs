//! Property reads and writes on every kind of value.

use std::sync::Arc;

use super::Interpreter;
use crate::errors::{range_error, read_of_nullish, type_error, write_to_nullish};
use crate::methods;
use crate::{Thrown, Value};

/// Writes may grow an array at most this far past its end in one step.
const MAX_ARRAY_GROWTH: usize = 1 << 20;

/// Canonical array index: digits only, no leading zero.
pub(crate) fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// `target[key]`.
pub(crate) fn get_property(interp: &Interpreter, target: &Value, key: &str) -> Result<Value, Thrown> {
    let value = match target {
        Value::Undefined | Value::Null => return Err(read_of_nullish(interp, target, key)),
        Value::Str(s) => match key {
            "length" => Value::Number(s.chars().count() as f64),
            _ => match array_index(key) {
                Some(index) => s
                    .chars()
                    .nth(index)
                    .map_or(Value::Undefined, |c| Value::string(c.to_string())),
                None => methods::string_method(s, key).unwrap_or(Value::Undefined),
            },
        },
        Value::Array(items) => match key {
            "length" => Value::Number(items.read().len() as f64),
            _ => match array_index(key) {
                Some(index) => items.read().get(index).cloned().unwrap_or(Value::Undefined),
                None => methods::array_method(items, key).unwrap_or(Value::Undefined),
            },
        },
        Value::Object(properties) => properties
            .read()
            .get(key)
            .cloned()
            .unwrap_or(Value::Undefined),
        Value::Number(n) => methods::number_method(*n, key).unwrap_or(Value::Undefined),
        Value::Error(error) => match key {
            "name" => Value::Str(Arc::clone(&error.name)),
            "message" => Value::Str(Arc::clone(&error.message)),
            "stack" => Value::Str(Arc::clone(&error.stack)),
            _ => Value::Undefined,
        },
        Value::Function(closure) => match key {
            "name" => Value::string(closure.name()),
            "length" => Value::Number(closure.param_count() as f64),
            _ => Value::Undefined,
        },
        Value::Native(native) => match key {
            "name" => Value::string(native.name()),
            _ => Value::Undefined,
        },
        Value::Promise(promise) => methods::promise_method(promise, key).unwrap_or(Value::Undefined),
        Value::Host(host) => host.get(key).unwrap_or(Value::Undefined),
        Value::Bool(_) => Value::Undefined,
    };
    Ok(value)
}

/// `target[key] = value`.
pub(crate) fn set_property(
    interp: &Interpreter,
    target: &Value,
    key: &str,
    value: Value,
) -> Result<(), Thrown> {
    match target {
        Value::Undefined | Value::Null => Err(write_to_nullish(interp, target, key)),
        Value::Object(properties) => {
            properties.write().set(Arc::from(key), value);
            Ok(())
        }
        Value::Array(items) => {
            let (index, fill_to) = if key == "length" {
                let length = value.to_number();
                if length < 0.0 || length.fract() != 0.0 || !length.is_finite() {
                    return Err(range_error(interp, "Invalid array length"));
                }
                (None, length as usize)
            } else if let Some(index) = array_index(key) {
                (Some(index), index + 1)
            } else {
                return Err(type_error(
                    interp,
                    format!("Cannot create property '{key}' on array"),
                ));
            };

            let mut items = items.write();
            if fill_to > items.len() + MAX_ARRAY_GROWTH {
                return Err(range_error(interp, "Invalid array length"));
            }
            match index {
                Some(index) => {
                    if index >= items.len() {
                        items.resize(index + 1, Value::Undefined);
                    }
                    items[index] = value;
                }
                None => items.resize(fill_to, Value::Undefined),
            }
            Ok(())
        }
        Value::Host(host) => {
            if host.set(key, value) {
                Ok(())
            } else {
                Err(type_error(
                    interp,
                    format!(
                        "Cannot assign to read only property '{key}' of object '[object {}]'",
                        host.type_name()
                    ),
                ))
            }
        }
        other => Err(type_error(
            interp,
            format!(
                "Cannot create property '{key}' on {} '{}'",
                other.type_of(),
                other.to_display()
            ),
        )),
    }
}
