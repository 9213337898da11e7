//! Promises started during one invocation.
//!
//! Async calls begin running as soon as they are made. The promises they
//! create are registered with the invocation's [`TaskSet`], and the driver
//! polls the whole set next to the root body, so work nobody awaits still
//! runs to completion. Nothing is spawned onto the runtime.

use std::future::Future;
use std::pin::pin;
use std::task::Poll;

use futures::future::{poll_fn, BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::task::AtomicWaker;
use parking_lot::Mutex;

use crate::promise::Promise;

#[derive(Default)]
pub(crate) struct TaskSet {
    /// Registered since the driver last looked.
    incoming: Mutex<Vec<Promise>>,
    waker: AtomicWaker,
}

impl TaskSet {
    pub(crate) fn track(&self, promise: Promise) {
        self.incoming.lock().push(promise);
        self.waker.wake();
    }

    fn has_incoming(&self) -> bool {
        !self.incoming.lock().is_empty()
    }

    /// Run `main` while polling every tracked promise, then keep polling
    /// until the tracked promises have all settled.
    pub(crate) async fn drive<T>(&self, main: impl Future<Output = T>) -> T {
        let mut main = pin!(main);
        let mut output = None;
        let mut running: FuturesUnordered<BoxFuture<'static, ()>> = FuturesUnordered::new();

        poll_fn(|cx| {
            self.waker.register(cx.waker());
            if output.is_none() {
                if let Poll::Ready(value) = main.as_mut().poll(cx) {
                    output = Some(value);
                }
            }
            loop {
                running.extend(self.incoming.lock().drain(..).map(settle_quietly));
                match running.poll_next_unpin(cx) {
                    Poll::Ready(Some(())) => {}
                    Poll::Ready(None) if !self.has_incoming() => break,
                    Poll::Ready(None) => {}
                    Poll::Pending if !self.has_incoming() => return Poll::Pending,
                    Poll::Pending => {}
                }
            }
            match output.take() {
                Some(value) => Poll::Ready(value),
                None => Poll::Pending,
            }
        })
        .await
    }
}

fn settle_quietly(promise: Promise) -> BoxFuture<'static, ()> {
    async move {
        if let Err(thrown) = promise.settle().await {
            tracing::debug!(error = %thrown.message(), "tracked promise rejected");
        }
    }
    .boxed()
}
