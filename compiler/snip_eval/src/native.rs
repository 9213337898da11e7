//! Functions implemented in Rust.

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::{Interpreter, Thrown, Value};

/// Boxed native implementation.
///
/// Receives an interpreter handle (for calling back into script functions
/// and for building errors with the caller's stack) and the argument list.
pub type NativeFn =
    Arc<dyn Fn(Interpreter, Vec<Value>) -> BoxFuture<'static, Result<Value, Thrown>> + Send + Sync>;

pub struct NativeFunction {
    name: Arc<str>,
    func: NativeFn,
}

impl NativeFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn call(
        &self,
        interp: Interpreter,
        args: Vec<Value>,
    ) -> BoxFuture<'static, Result<Value, Thrown>> {
        (self.func)(interp, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[native {}]", self.name)
    }
}

impl Value {
    /// Wrap a synchronous Rust function.
    pub fn native<F>(name: &str, func: F) -> Value
    where
        F: Fn(&Interpreter, Vec<Value>) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        let func: NativeFn = Arc::new(move |interp, args| {
            let result = func(&interp, args);
            futures::future::ready(result).boxed()
        });
        Value::Native(Arc::new(NativeFunction {
            name: Arc::from(name),
            func,
        }))
    }

    /// Wrap an asynchronous Rust function. Calling it suspends the caller
    /// until the returned future resolves.
    pub fn native_async<F, Fut>(name: &str, func: F) -> Value
    where
        F: Fn(Interpreter, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value, Thrown>> + Send + 'static,
    {
        let func: NativeFn = Arc::new(move |interp, args| func(interp, args).boxed());
        Value::Native(Arc::new(NativeFunction {
            name: Arc::from(name),
            func,
        }))
    }
}

/// Argument `index`, or `undefined` when missing.
pub fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}
