//! Seam for host-provided objects.

use std::sync::Arc;

use crate::Value;

/// An object implemented in Rust and exposed to scripts.
///
/// Property reads go through [`get`](HostObject::get); methods are returned
/// as [`Value::Native`] functions that close over whatever state they need.
/// Implementations must be thread-safe because evaluation futures are `Send`.
pub trait HostObject: Send + Sync {
    /// Name shown by `String(x)` and the inspector.
    fn type_name(&self) -> &str;

    /// Read a property. `None` reads as `undefined`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a property. Returns `false` if the object is read-only, which
    /// the evaluator reports as a `TypeError`.
    fn set(&self, key: &str, value: Value) -> bool {
        let _ = (key, value);
        false
    }

    /// Enumerable keys, for `Object.keys` and serialization.
    fn keys(&self) -> Vec<Arc<str>> {
        Vec::new()
    }
}
