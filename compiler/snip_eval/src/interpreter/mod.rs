//! Tree-walking evaluator.
//!
//! Evaluation is asynchronous end to end: every statement and expression
//! evaluates to a boxed `Send` future, so a script suspended on `await`
//! yields to the executor instead of blocking a thread.
//!
//! An [`Interpreter`] is a cheap handle carrying the evaluation options and
//! the current call stack. Each script call pushes a [`Frame`]; the frame
//! count enforces the call-depth limit and produces error stack traces.
//!
//! Calling an async function runs its body up to the first suspension
//! before the call returns its promise. When the handle belongs to a driven
//! invocation, the promise is also tracked so the rest of the body runs even
//! if nothing awaits it.

mod expr;
mod property;
mod stmt;

use std::sync::{Arc, Weak};

use futures::future::{BoxFuture, FutureExt};
use snip_ir::{FunctionBody, Span};

use crate::environment::{Env, Mutability};
use crate::errors::{call_depth_exceeded, not_a_function};
use crate::native::arg;
use crate::promise::Promise;
use crate::script::{Closure, Script};
use crate::stack::guarded;
use crate::tasks::TaskSet;
use crate::{Thrown, Value};

pub(crate) use property::{get_property, set_property};

/// Default limit on nested script calls.
pub const MAX_CALL_DEPTH: usize = 512;

/// Knobs for one evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalOptions {
    /// Script calls nested deeper than this throw a `RangeError`.
    pub max_call_depth: usize,
    /// Whether `console.*` output is forwarded to `tracing`.
    pub echo_console: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_call_depth: MAX_CALL_DEPTH,
            echo_console: true,
        }
    }
}

impl EvalOptions {
    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn with_echo_console(mut self, echo: bool) -> Self {
        self.echo_console = echo;
        self
    }
}

/// One active script call.
#[derive(Debug)]
struct Frame {
    name: Arc<str>,
    script: Arc<Script>,
    /// Where the caller invoked this frame, in the caller's script.
    call_site: Option<Span>,
    depth: usize,
    parent: Option<Arc<Frame>>,
}

/// Evaluation handle: options plus the current call stack.
#[derive(Clone, Debug)]
pub struct Interpreter {
    options: Arc<EvalOptions>,
    frame: Option<Arc<Frame>>,
    /// Source position currently executing in the innermost frame.
    site: Option<Span>,
    tasks: Weak<TaskSet>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(EvalOptions::default())
    }
}

impl Interpreter {
    pub fn new(options: EvalOptions) -> Self {
        Interpreter {
            options: Arc::new(options),
            frame: None,
            site: None,
            tasks: Weak::new(),
        }
    }

    /// The same handle, tracking new promises in `tasks`.
    #[must_use]
    pub(crate) fn with_tasks(self, tasks: &Arc<TaskSet>) -> Self {
        Interpreter {
            tasks: Arc::downgrade(tasks),
            ..self
        }
    }

    /// Keep `promise` running when nothing awaits it. A no-op outside a
    /// driven invocation.
    pub(crate) fn track(&self, promise: &Promise) {
        if let Some(tasks) = self.tasks.upgrade() {
            tasks.track(promise.clone());
        }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Number of script frames on the stack.
    pub fn depth(&self) -> usize {
        self.frame.as_ref().map_or(0, |frame| frame.depth)
    }

    /// The same stack, positioned at `site` in the innermost frame.
    #[must_use]
    pub(crate) fn at(&self, site: Span) -> Self {
        Interpreter {
            site: Some(site),
            ..self.clone()
        }
    }

    fn enter(&self, name: &str, script: Arc<Script>) -> Result<Self, Thrown> {
        let depth = self.depth() + 1;
        if depth > self.options.max_call_depth {
            return Err(call_depth_exceeded(self));
        }
        Ok(Interpreter {
            options: Arc::clone(&self.options),
            frame: Some(Arc::new(Frame {
                name: Arc::from(name),
                script,
                call_site: self.site,
                depth,
                parent: self.frame.clone(),
            })),
            site: None,
            tasks: self.tasks.clone(),
        })
    }

    /// `    at name (line:col)` lines, innermost frame first.
    pub fn stack_trace(&self) -> String {
        let mut lines = Vec::new();
        let mut site = self.site;
        let mut frame = self.frame.clone();
        while let Some(current) = frame {
            let location = match site {
                Some(span) => {
                    let (line, column) = current.script.location(span.start);
                    format!(" ({line}:{column})")
                }
                None => String::new(),
            };
            lines.push(format!("    at {}{location}", current.name));
            site = current.call_site;
            frame = current.parent.clone();
        }
        lines.join("\n")
    }

    /// Call any callable value. Non-callables throw a `TypeError`.
    pub fn call(&self, callee: Value, args: Vec<Value>) -> BoxFuture<'static, Result<Value, Thrown>> {
        match callee {
            Value::Native(native) => native.call(self.clone(), args),
            Value::Function(closure) => self.call_closure(closure, args),
            other => {
                let thrown = not_a_function(self, &other.inspect());
                futures::future::ready(Err(thrown)).boxed()
            }
        }
    }

    /// Call a script function. Async functions start their body and return
    /// its promise; everything else runs to completion when awaited.
    fn call_closure(
        &self,
        closure: Arc<Closure>,
        args: Vec<Value>,
    ) -> BoxFuture<'static, Result<Value, Thrown>> {
        let interp = match self.enter(closure.name(), Arc::clone(&closure.script)) {
            Ok(interp) => interp,
            Err(thrown) => return futures::future::ready(Err(thrown)).boxed(),
        };
        tracing::trace!(function = closure.name(), depth = interp.depth(), "call");

        let is_async = closure.is_async();
        let body = guarded(
            async move {
                let def = closure.def();
                let params = closure.env.child();
                for (index, param) in def.params.iter().enumerate() {
                    params.define(Arc::clone(&param.name), arg(&args, index), Mutability::Mutable);
                }
                let ctx = Ctx::new(interp, Arc::clone(&closure.script), params.child());
                match &def.body {
                    FunctionBody::Block(stmts) => ctx.run_function_block(stmts).await,
                    FunctionBody::Expr(expr) => ctx.eval(*expr).await,
                }
            }
            .boxed(),
        );

        if is_async {
            // A promise returned from an async function is adopted.
            let promise = Promise::from_future(async move {
                match body.await? {
                    Value::Promise(inner) => inner.settle().await,
                    value => Ok(value),
                }
            });
            self.track(&promise);
            async move {
                promise.start().await;
                Ok(Value::Promise(promise))
            }
            .boxed()
        } else {
            body
        }
    }
}

/// Evaluation context for one scope of one script frame.
pub(crate) struct Ctx {
    interp: Interpreter,
    script: Arc<Script>,
    env: Env,
    /// Scope receiving `var` declarations.
    function_env: Env,
}

impl Ctx {
    pub(crate) fn new(interp: Interpreter, script: Arc<Script>, env: Env) -> Self {
        Ctx {
            interp,
            script,
            function_env: env.clone(),
            env,
        }
    }

    /// Same frame, nested block scope.
    fn block_scope(&self) -> Ctx {
        Ctx {
            interp: self.interp.clone(),
            script: Arc::clone(&self.script),
            env: self.env.child(),
            function_env: self.function_env.clone(),
        }
    }

    /// Interpreter positioned at `span` for error stacks and call sites.
    fn at(&self, span: Span) -> Interpreter {
        self.interp.at(span)
    }

    fn closure(&self, function: snip_ir::FunctionId) -> Value {
        Value::Function(Arc::new(Closure {
            script: Arc::clone(&self.script),
            function,
            env: self.env.clone(),
        }))
    }
}

#[cfg(test)]
mod tests;
