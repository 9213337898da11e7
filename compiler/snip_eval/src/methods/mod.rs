//! Builtin methods of primitive and container values.
//!
//! A method read (`items.push`) yields a native function bound to its
//! receiver, so `const push = items.push; push(1)` still works.

mod array;
mod number;
mod promise;
mod string;

pub(crate) use array::array_method;
pub(crate) use number::number_method;
pub(crate) use promise::promise_method;
pub(crate) use string::string_method;

use crate::Value;

/// Resolve a possibly-negative `start`/`end` argument against `len`, the
/// way `slice` does. `undefined` yields `default`.
pub(crate) fn relative_index(value: &Value, len: usize, default: usize) -> usize {
    if value.is_undefined() {
        return default;
    }
    let n = value.to_number();
    if n.is_nan() {
        return 0;
    }
    let n = n.trunc();
    if n < 0.0 {
        (len as f64 + n).max(0.0) as usize
    } else {
        n.min(len as f64) as usize
    }
}

/// `undefined` and `NaN` are matched too, unlike `===`.
pub(crate) fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_equals(b),
    }
}

#[cfg(test)]
mod tests;
