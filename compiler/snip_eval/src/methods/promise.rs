//! `then` and `catch` on promises.

use futures::FutureExt;

use crate::native::arg;
use crate::promise::Promise;
use crate::{Interpreter, Value};

pub(crate) fn promise_method(promise: &Promise, name: &str) -> Option<Value> {
    let promise = promise.clone();
    let catch_only = match name {
        "then" => false,
        "catch" => true,
        _ => return None,
    };
    Some(Value::native(name, move |interp, args| {
        let (on_fulfilled, on_rejected) = if catch_only {
            (Value::Undefined, arg(&args, 0))
        } else {
            (arg(&args, 0), arg(&args, 1))
        };
        let chained = chain(interp.clone(), promise.clone(), on_fulfilled, on_rejected);
        interp.track(&chained);
        Ok(Value::Promise(chained))
    }))
}

/// A promise settling with the outcome of the matching handler, or with the
/// source outcome when no handler applies.
fn chain(interp: Interpreter, source: Promise, on_fulfilled: Value, on_rejected: Value) -> Promise {
    Promise::from_future(
        async move {
            let (handler, input) = match source.settle().await {
                Ok(value) if on_fulfilled.is_callable() => (on_fulfilled, value),
                Ok(value) => return Ok(value),
                Err(thrown) if on_rejected.is_callable() => (on_rejected, thrown.value),
                Err(thrown) => return Err(thrown),
            };
            match interp.call(handler, vec![input]).await? {
                Value::Promise(inner) => inner.settle().await,
                value => Ok(value),
            }
        }
        .boxed(),
    )
}
