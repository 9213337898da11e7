//! Compile a source text into a callable and invoke it.

use std::sync::Arc;

use snip_diagnostic::emitter::render_report;
use snip_diagnostic::Diagnostic;
use snip_parse::parse_body;

use crate::prelude::globals;
use crate::script::{Closure, Script};
use crate::tasks::TaskSet;
use crate::{EvalOptions, Interpreter, Thrown, Value};

/// Name under which build reports refer to the source text.
const SOURCE_NAME: &str = "script";

/// A source text compiled as the body of an `async` function.
///
/// Compilation only parses; each [`invoke`](CompiledFunction::invoke) runs
/// the body against a fresh global scope.
#[derive(Clone, Debug)]
pub struct CompiledFunction {
    script: Arc<Script>,
    params: Vec<Arc<str>>,
    options: EvalOptions,
}

impl CompiledFunction {
    /// Compile with default evaluation options.
    pub fn compile(params: &[Arc<str>], source: &str) -> Result<Self, BuildFault> {
        Self::compile_with(params, source, EvalOptions::default())
    }

    pub fn compile_with(
        params: &[Arc<str>],
        source: &str,
        options: EvalOptions,
    ) -> Result<Self, BuildFault> {
        let parsed = parse_body(params, source).map_err(|diagnostics| {
            tracing::debug!(errors = diagnostics.len(), "script failed to compile");
            BuildFault::new(diagnostics, source)
        })?;
        tracing::debug!(
            params = params.len(),
            exprs = parsed.arena.expr_count(),
            stmts = parsed.arena.stmt_count(),
            "compiled script"
        );
        Ok(CompiledFunction {
            script: Arc::new(Script::new(parsed.arena, parsed.root, source)),
            params: params.to_vec(),
            options,
        })
    }

    pub fn params(&self) -> &[Arc<str>] {
        &self.params
    }

    pub fn source(&self) -> &str {
        self.script.source()
    }

    /// Call the function with `args` in parameter order and wait for the
    /// body to finish, including every `await` inside it and every promise
    /// it started without awaiting.
    pub async fn invoke(&self, args: Vec<Value>) -> Result<Value, RunFault> {
        let root = Value::Function(Arc::new(Closure {
            script: Arc::clone(&self.script),
            function: self.script.root,
            env: globals(),
        }));
        let interp = Interpreter::new(self.options.clone());
        run_call(interp, root, args).await.map_err(RunFault::from)
    }
}

/// Call a script (or native) function from Rust, waiting for a returned
/// promise to settle.
pub async fn call_function(callee: Value, args: Vec<Value>) -> Result<Value, RunFault> {
    run_call(Interpreter::default(), callee, args)
        .await
        .map_err(RunFault::from)
}

/// Make the call and settle its result, driving every promise started along
/// the way. Promises nothing awaited still settle before this returns.
async fn run_call(interp: Interpreter, callee: Value, args: Vec<Value>) -> Result<Value, Thrown> {
    let tasks = Arc::new(TaskSet::default());
    let interp = interp.with_tasks(&tasks);
    tasks
        .drive(async move { settle(interp.call(callee, args).await?).await })
        .await
}

async fn settle(value: Value) -> Result<Value, Thrown> {
    match value {
        Value::Promise(promise) => promise.settle().await,
        value => Ok(value),
    }
}

/// The source could not be compiled.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{report}")]
pub struct BuildFault {
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics rendered against the source text.
    pub report: String,
}

impl BuildFault {
    pub fn new(diagnostics: Vec<Diagnostic>, source: &str) -> Self {
        let report = render_report(&diagnostics, SOURCE_NAME, source);
        BuildFault {
            diagnostics,
            report,
        }
    }
}

/// The function threw while running.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct RunFault {
    /// The thrown value.
    pub value: Value,
    /// `Error: boom`, or `Uncaught <value>` for non-error throws.
    pub message: String,
    /// Script stack at the throw site, headed by the message.
    pub stack: Arc<str>,
}

impl RunFault {
    /// The thrown error's own message, or the rendered value for
    /// non-error throws.
    pub fn error_message(&self) -> String {
        match &self.value {
            Value::Error(error) => error.message.to_string(),
            other => other.inspect(),
        }
    }

    /// Full detail for reports: the stack, which starts with the message.
    pub fn detail(&self) -> &str {
        &self.stack
    }
}

impl From<Thrown> for RunFault {
    fn from(thrown: Thrown) -> Self {
        RunFault {
            message: thrown.message(),
            value: thrown.value,
            stack: thrown.stack,
        }
    }
}
