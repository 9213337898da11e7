//! Reactive components: a render function re-run only when its arguments
//! change.

use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use snip_eval::{HostObject, Interpreter, Thrown, Value};

/// A render function plus the arguments it last ran with.
///
/// Cloning shares the component; scripts see it as a host object with
/// `render()`, `refresh(...args)` and `args`.
#[derive(Clone)]
pub struct ReactiveComponent {
    inner: Arc<ReactiveInner>,
}

struct ReactiveInner {
    render: Value,
    state: Mutex<ReactiveState>,
}

struct ReactiveState {
    args: Vec<Value>,
    last_result: Option<Value>,
    /// Bumped whenever `args` is replaced; a render only caches its result
    /// if the arguments it ran with are still the tracked ones.
    generation: u64,
}

impl ReactiveState {
    fn differs(&self, args: &[Value]) -> bool {
        self.args.len() != args.len()
            || self
                .args
                .iter()
                .zip(args)
                .any(|(old, new)| !old.strict_equals(new))
    }
}

impl ReactiveComponent {
    pub fn new(render: Value, args: Vec<Value>) -> Self {
        ReactiveComponent {
            inner: Arc::new(ReactiveInner {
                render,
                state: Mutex::new(ReactiveState {
                    args,
                    last_result: None,
                    generation: 0,
                }),
            }),
        }
    }

    pub fn args(&self) -> Vec<Value> {
        self.inner.state.lock().args.clone()
    }

    pub fn last_result(&self) -> Option<Value> {
        self.inner.state.lock().last_result.clone()
    }

    /// Whether `args` differ from the tracked arguments: a different length
    /// or any element not strictly equal.
    pub fn args_changed(&self, args: &[Value]) -> bool {
        self.inner.state.lock().differs(args)
    }

    /// Run the render function with the tracked arguments.
    pub async fn render(&self, interp: &Interpreter) -> Result<Value, Thrown> {
        let (args, generation) = {
            let state = self.inner.state.lock();
            (state.args.clone(), state.generation)
        };
        self.render_with(interp, args, generation).await
    }

    /// Re-render with `args` if they changed; otherwise return the cached
    /// result.
    pub async fn refresh(&self, interp: &Interpreter, args: Vec<Value>) -> Result<Value, Thrown> {
        let generation = {
            let mut state = self.inner.state.lock();
            if !state.differs(&args) {
                if let Some(cached) = &state.last_result {
                    tracing::trace!("reactive refresh skipped: arguments unchanged");
                    return Ok(cached.clone());
                }
            }
            state.args = args.clone();
            state.generation += 1;
            state.generation
        };
        self.render_with(interp, args, generation).await
    }

    async fn render_with(
        &self,
        interp: &Interpreter,
        args: Vec<Value>,
        generation: u64,
    ) -> Result<Value, Thrown> {
        let result = match interp.call(self.inner.render.clone(), args).await? {
            Value::Promise(promise) => promise.settle().await?,
            value => value,
        };
        let mut state = self.inner.state.lock();
        if state.generation == generation {
            state.last_result = Some(result.clone());
        } else {
            tracing::trace!("reactive render superseded by newer arguments");
        }
        Ok(result)
    }
}

impl HostObject for ReactiveComponent {
    fn type_name(&self) -> &str {
        "ReactiveComponent"
    }

    fn get(&self, key: &str) -> Option<Value> {
        let component = self.clone();
        match key {
            "args" => Some(Value::array(self.args())),
            "render" => Some(Value::native_async("render", move |interp, _| {
                let component = component.clone();
                async move { component.render(&interp).await }.boxed()
            })),
            "refresh" => Some(Value::native_async("refresh", move |interp, args| {
                let component = component.clone();
                async move { component.refresh(&interp, args).await }.boxed()
            })),
            _ => None,
        }
    }

    fn keys(&self) -> Vec<Arc<str>> {
        vec![Arc::from("args")]
    }
}

#[cfg(test)]
mod tests;
