//! Stack safety for deep recursion.
//!
//! Evaluation futures nest one inside another for every script call and
//! nested statement, so polling a deep recursion recurses on the native
//! stack. [`guarded`] wraps a future so each poll first makes sure enough
//! stack remains, growing it with `stacker` when needed.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;

/// Run `f`, growing the native stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Wrap `future` so every poll runs with sufficient stack.
pub(crate) fn guarded<'a, T: 'a>(future: BoxFuture<'a, T>) -> BoxFuture<'a, T> {
    Box::pin(Guarded(future))
}

struct Guarded<'a, T>(BoxFuture<'a, T>);

impl<T> Future for Guarded<'_, T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let inner = &mut self.0;
        ensure_sufficient_stack(|| inner.as_mut().poll(cx))
    }
}
