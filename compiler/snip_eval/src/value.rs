//! Runtime values.
//!
//! Scalars are stored inline; strings are shared `Arc<str>`; arrays and
//! objects are shared behind `parking_lot` locks so that a value handed to a
//! closure or a host object aliases the original, as script authors expect.
//! Every variant is `Send + Sync`, which keeps evaluation futures `Send`.
//!
//! Locks are only ever held for the duration of a read or write of the
//! container itself, never across an `.await`.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::host::HostObject;
use crate::native::NativeFunction;
use crate::promise::Promise;
use crate::script::Closure;

pub type ArrayRef = Arc<RwLock<Vec<Value>>>;
pub type ObjectRef = Arc<RwLock<Properties>>;

/// A script value.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Arc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    /// Script-defined function.
    Function(Arc<Closure>),
    /// Builtin or host-provided function.
    Native(Arc<NativeFunction>),
    Promise(Promise),
    Host(Arc<dyn HostObject>),
    Error(Arc<ErrorValue>),
}

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(RwLock::new(items)))
    }

    pub fn object<K: Into<Arc<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut properties = Properties::default();
        for (key, value) in entries {
            properties.set(key.into(), value);
        }
        Value::Object(Arc::new(RwLock::new(properties)))
    }

    pub fn host(object: impl HostObject + 'static) -> Self {
        Value::Host(Arc::new(object))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Snapshot of an array's elements.
    pub fn array_items(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.read().clone()),
            _ => None,
        }
    }

    /// The `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Null
            | Value::Array(_)
            | Value::Object(_)
            | Value::Promise(_)
            | Value::Host(_)
            | Value::Error(_) => "object",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Numeric conversion (`Number(x)`, unary `+`).
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_display()),
            _ => f64::NAN,
        }
    }

    /// String conversion (`String(x)`, `+` concatenation, template output).
    pub fn to_display(&self) -> String {
        let mut seen = Vec::new();
        self.display_into(&mut seen)
    }

    fn display_into(&self, seen: &mut Vec<usize>) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::Str(s) => s.to_string(),
            Value::Array(items) => {
                let id = Arc::as_ptr(items) as usize;
                if seen.contains(&id) {
                    return String::new();
                }
                seen.push(id);
                let snapshot = items.read().clone();
                let parts: Vec<String> = snapshot
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            item.display_into(seen)
                        }
                    })
                    .collect();
                seen.pop();
                parts.join(",")
            }
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(closure) => closure.source_text().to_string(),
            Value::Native(native) => format!("function {}() {{ [native code] }}", native.name()),
            Value::Promise(_) => "[object Promise]".to_string(),
            Value::Host(host) => format!("[object {}]", host.type_name()),
            Value::Error(error) => error.to_string(),
        }
    }

    /// Reference equality for containers and functions, value equality for
    /// primitives (`===`).
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Arc::ptr_eq(a, b),
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            (Value::Host(a), Value::Host(b)) => {
                Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
            }
            (Value::Error(a), Value::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Equality with type coercion (`==`).
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Number(_), Value::Str(_)) | (Value::Str(_), Value::Number(_)) => {
                self.to_number() == other.to_number()
            }
            (Value::Bool(_), _) => Value::Number(self.to_number()).loose_equals(other),
            (_, Value::Bool(_)) => self.loose_equals(&Value::Number(other.to_number())),
            (Value::Array(_) | Value::Object(_), Value::Number(_) | Value::Str(_)) => {
                Value::string(self.to_display()).loose_equals(other)
            }
            (Value::Number(_) | Value::Str(_), Value::Array(_) | Value::Object(_)) => {
                self.loose_equals(&Value::string(other.to_display()))
            }
            _ => self.strict_equals(other),
        }
    }

    /// Developer-facing rendering used by `console.log` and the CLI:
    /// strings nested in containers are quoted, containers are expanded.
    pub fn inspect(&self) -> String {
        let mut seen = Vec::new();
        self.inspect_into(&mut seen)
    }

    fn inspect_into(&self, seen: &mut Vec<usize>) -> String {
        match self {
            Value::Str(s) => format!("{s:?}"),
            Value::Array(items) => {
                let id = Arc::as_ptr(items) as usize;
                if seen.contains(&id) {
                    return "[Circular]".to_string();
                }
                seen.push(id);
                let snapshot = items.read().clone();
                let parts: Vec<String> = snapshot.iter().map(|item| item.inspect_into(seen)).collect();
                seen.pop();
                format!("[{}]", parts.join(", "))
            }
            Value::Object(properties) => {
                let id = Arc::as_ptr(properties) as usize;
                if seen.contains(&id) {
                    return "[Circular]".to_string();
                }
                seen.push(id);
                let snapshot = properties.read().clone();
                let rendered = if snapshot.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<String> = snapshot
                        .iter()
                        .map(|(key, value)| format!("{key}: {}", value.inspect_into(seen)))
                        .collect();
                    format!("{{ {} }}", parts.join(", "))
                };
                seen.pop();
                rendered
            }
            Value::Function(closure) => format!("[Function: {}]", closure.name()),
            Value::Native(native) => format!("[Function: {}]", native.name()),
            Value::Promise(promise) => promise.inspect(),
            Value::Host(host) => format!("[{}]", host.type_name()),
            other => other.to_display(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

/// Insertion-ordered property map of a script object.
#[derive(Clone, Debug, Default)]
pub struct Properties {
    entries: Vec<(Arc<str>, Value)>,
}

impl Properties {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| &**k == key).map(|(_, v)| v)
    }

    /// Insert or overwrite; an overwritten key keeps its original position.
    pub fn set(&mut self, key: Arc<str>, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| &**k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Arc<str>> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An `Error` object: `new Error("boom")` or a runtime fault.
#[derive(Clone, Debug)]
pub struct ErrorValue {
    pub name: Arc<str>,
    pub message: Arc<str>,
    /// Header line plus one `    at` line per script frame.
    pub stack: Arc<str>,
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

/// Number formatting with script conventions: integral values print
/// without a fraction, very large and very small magnitudes use exponent
/// notation, and `-0` prints as `0`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{n}");
    }
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.contains(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
            f64::NAN
        }
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

#[cfg(test)]
mod tests;
