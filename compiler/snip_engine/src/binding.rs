//! Named values injected into an execution's scope.

use std::sync::Arc;

use snip_eval::Value;

/// Binding name of the host application handle.
pub const HOST_BINDING: &str = "app";
/// Binding name of the per-execution API handle.
pub const API_BINDING: &str = "engine";
/// Binding name of the caller-supplied execution context.
pub const CONTEXT_BINDING: &str = "context";

/// A `name = value` pair. Position in a binding list is the parameter
/// position of the compiled function.
#[derive(Clone, Debug)]
pub struct ArgumentBinding {
    pub name: Arc<str>,
    pub value: Value,
}

impl ArgumentBinding {
    pub fn new(name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        ArgumentBinding {
            name: name.into(),
            value: value.into(),
        }
    }
}
