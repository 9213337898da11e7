//! `String.prototype` methods. Positions count characters, not bytes.

use std::sync::Arc;

use futures::FutureExt;

use super::relative_index;
use crate::errors::range_error;
use crate::native::arg;
use crate::Value;

/// Longest string `repeat` may build, in bytes.
const MAX_STRING_LENGTH: usize = 1 << 29;

pub(crate) fn string_method(s: &Arc<str>, name: &str) -> Option<Value> {
    let s = Arc::clone(s);
    let method = match name {
        "toUpperCase" => Value::native(name, move |_, _| Ok(Value::string(s.to_uppercase()))),
        "toLowerCase" => Value::native(name, move |_, _| Ok(Value::string(s.to_lowercase()))),
        "trim" => Value::native(name, move |_, _| Ok(Value::string(s.trim()))),
        "includes" => Value::native(name, move |_, args| {
            Ok(Value::Bool(s.contains(arg(&args, 0).to_display().as_str())))
        }),
        "startsWith" => Value::native(name, move |_, args| {
            Ok(Value::Bool(s.starts_with(arg(&args, 0).to_display().as_str())))
        }),
        "endsWith" => Value::native(name, move |_, args| {
            Ok(Value::Bool(s.ends_with(arg(&args, 0).to_display().as_str())))
        }),
        "indexOf" => Value::native(name, move |_, args| {
            let needle = arg(&args, 0).to_display();
            let position = s
                .find(needle.as_str())
                .map_or(-1.0, |byte| s[..byte].chars().count() as f64);
            Ok(Value::Number(position))
        }),
        "split" => Value::native(name, move |_, args| {
            let limit = match arg(&args, 1) {
                Value::Undefined => usize::MAX,
                limit => split_limit(limit.to_number()),
            };
            let parts: Vec<Value> = match arg(&args, 0) {
                Value::Undefined => vec![Value::Str(Arc::clone(&s))],
                separator => {
                    let separator = separator.to_display();
                    if separator.is_empty() {
                        s.chars().map(|c| Value::string(c.to_string())).collect()
                    } else {
                        s.split(separator.as_str()).map(Value::from).collect()
                    }
                }
            };
            Ok(Value::array(parts.into_iter().take(limit).collect()))
        }),
        "slice" => Value::native(name, move |_, args| {
            let chars: Vec<char> = s.chars().collect();
            let len = chars.len();
            let start = relative_index(&arg(&args, 0), len, 0);
            let end = relative_index(&arg(&args, 1), len, len);
            let sliced: String = chars.get(start..end.max(start)).unwrap_or_default().iter().collect();
            Ok(Value::string(sliced))
        }),
        "repeat" => Value::native(name, move |interp, args| {
            let count = arg(&args, 0).to_number();
            let count = if count.is_nan() { 0.0 } else { count.trunc() };
            if count < 0.0 || count.is_infinite() {
                return Err(range_error(
                    interp,
                    format!("Invalid count value: {}", crate::value::number_to_string(count)),
                ));
            }
            let count = count as usize;
            if s.len().saturating_mul(count) > MAX_STRING_LENGTH {
                return Err(range_error(interp, "Invalid string length"));
            }
            Ok(Value::string(s.repeat(count)))
        }),
        // First occurrence only. The replacement may be a function of the match.
        "replace" => {
            return Some(Value::native_async(name, move |interp, args| {
                let s = Arc::clone(&s);
                async move {
                    let pattern = arg(&args, 0).to_display();
                    let Some(start) = s.find(pattern.as_str()) else {
                        return Ok(Value::Str(s));
                    };
                    let replacement = match arg(&args, 1) {
                        callback if callback.is_callable() => interp
                            .call(callback, vec![Value::string(pattern.as_str())])
                            .await?
                            .to_display(),
                        other => other.to_display(),
                    };
                    let mut replaced = String::with_capacity(s.len() + replacement.len());
                    replaced.push_str(&s[..start]);
                    replaced.push_str(&replacement);
                    replaced.push_str(&s[start + pattern.len()..]);
                    Ok(Value::string(replaced))
                }
                .boxed()
            }))
        }
        _ => return None,
    };
    Some(method)
}

/// `split`'s limit wraps to an unsigned 32-bit count; `NaN` and infinities
/// mean zero.
fn split_limit(n: f64) -> usize {
    if n.is_finite() {
        n.trunc().rem_euclid(4_294_967_296.0) as usize
    } else {
        0
    }
}
