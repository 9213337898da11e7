//! Awaitable values.
//!
//! A promise wraps a shared future, so it may be awaited any number of times
//! and every awaiter sees the same outcome. Async calls poll their promise
//! once on creation ([`Promise::start`]), and the invocation's task set
//! drives it from there.

use std::task::Poll;

use futures::future::{poll_fn, BoxFuture, FutureExt, Shared};

use crate::{Thrown, Value};

type Settlement = Result<Value, Thrown>;

#[derive(Clone)]
pub struct Promise {
    inner: Shared<BoxFuture<'static, Settlement>>,
}

impl Promise {
    pub fn from_future(
        future: impl std::future::Future<Output = Settlement> + Send + 'static,
    ) -> Self {
        Promise {
            inner: future.boxed().shared(),
        }
    }

    pub fn resolved(value: Value) -> Self {
        Self::from_future(futures::future::ready(Ok(value)))
    }

    pub fn rejected(thrown: Thrown) -> Self {
        Self::from_future(futures::future::ready(Err(thrown)))
    }

    /// Run the work behind the promise up to its first suspension point.
    pub(crate) async fn start(&self) {
        let mut pending = self.inner.clone();
        poll_fn(|cx| {
            let _ = pending.poll_unpin(cx);
            Poll::Ready(())
        })
        .await;
    }

    /// Drive the promise to completion.
    pub async fn settle(&self) -> Settlement {
        self.inner.clone().await
    }

    pub fn ptr_eq(&self, other: &Promise) -> bool {
        self.inner.ptr_eq(&other.inner)
    }

    pub(crate) fn inspect(&self) -> String {
        match self.inner.peek() {
            None => "Promise { <pending> }".to_string(),
            Some(Ok(value)) => format!("Promise {{ {} }}", value.inspect()),
            Some(Err(thrown)) => format!("Promise {{ <rejected> {} }}", thrown.value.inspect()),
        }
    }
}
