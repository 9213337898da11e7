//! One run of user code, from source text to terminal outcome.
//!
//! An [`ExecutionRecord`] goes through two phases. [`compile`] parses the
//! source as the body of an `async` function whose parameters are the
//! record's bindings; on success it hands out an [`Invocation`], the only
//! way to run the compiled function. Running the invocation produces a
//! [`RunReport`], which [`finish_run`] folds back into the record.
//!
//! Failures of the user's code in either phase are captured on the record
//! (`build_error` / `run_error`) together with an error message; they never
//! escape as Rust errors. Only out-of-order driving of the record itself is
//! reported as a [`ContractViolation`].
//!
//! [`compile`]: ExecutionRecord::compile
//! [`finish_run`]: ExecutionRecord::finish_run

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use snip_eval::{BuildFault, CompiledFunction, EvalOptions, RunFault, Value};

use crate::api::EngineApi;
use crate::binding::{ArgumentBinding, API_BINDING, CONTEXT_BINDING, HOST_BINDING};
use crate::errors::ContractViolation;
use crate::id::{ExecutionId, InstanceId};
use crate::messages::{Message, MessageManager, MessageType};

pub const BUILD_FAILURE_TITLE: &str = "Failed to parse script";
pub const RUN_FAILURE_TITLE: &str = "Failed to execute script";

/// Lifecycle position of a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExecutionStatus {
    Created,
    Building,
    BuildFailed,
    Built,
    Running,
    RunSucceeded,
    RunFailed,
}

impl ExecutionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExecutionStatus::BuildFailed | ExecutionStatus::RunSucceeded | ExecutionStatus::RunFailed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStatus::Created => "created",
            ExecutionStatus::Building => "building",
            ExecutionStatus::BuildFailed => "build failed",
            ExecutionStatus::Built => "built",
            ExecutionStatus::Running => "running",
            ExecutionStatus::RunSucceeded => "succeeded",
            ExecutionStatus::RunFailed => "run failed",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a record's `result` slot holds.
#[derive(Clone, Debug)]
pub enum ExecutionResult {
    /// The value the script returned (possibly `undefined`).
    Value(Value),
    /// The error message created when a phase failed.
    Message(Message),
}

impl ExecutionResult {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ExecutionResult::Value(value) => Some(value),
            ExecutionResult::Message(_) => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            ExecutionResult::Message(message) => Some(message),
            ExecutionResult::Value(_) => None,
        }
    }

    /// Developer-facing rendering.
    pub fn render(&self) -> String {
        match self {
            ExecutionResult::Value(value) => value.inspect(),
            ExecutionResult::Message(message) => message.to_string(),
        }
    }
}

/// Outcome of the build phase.
#[derive(Debug)]
pub enum BuildOutcome {
    Built(Invocation),
    /// The source did not compile; the fault is on the record.
    Failed,
    /// `compile` was called on a record that was already built or failed.
    Rejected(ContractViolation),
}

/// Permission to run a successfully compiled record, exactly once.
#[derive(Debug)]
pub struct Invocation {
    execution: ExecutionId,
    function: CompiledFunction,
    args: Vec<Value>,
}

impl Invocation {
    pub fn execution(&self) -> ExecutionId {
        self.execution
    }

    /// Call the compiled function with the binding values in order and
    /// wait for it, including any suspension inside it.
    pub async fn run(self) -> RunReport {
        tracing::debug!(execution = %self.execution, "run started");
        let start = Instant::now();
        let outcome = self.function.invoke(self.args).await;
        let duration = start.elapsed();
        tracing::debug!(
            execution = %self.execution,
            ok = outcome.is_ok(),
            ms = duration.as_secs_f64() * 1000.0,
            "run finished"
        );
        RunReport {
            execution: self.execution,
            outcome,
            duration,
        }
    }
}

/// Result of running an [`Invocation`].
#[derive(Debug)]
pub struct RunReport {
    execution: ExecutionId,
    outcome: Result<Value, RunFault>,
    duration: Duration,
}

impl RunReport {
    pub fn execution(&self) -> ExecutionId {
        self.execution
    }

    pub fn outcome(&self) -> &Result<Value, RunFault> {
        &self.outcome
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// One execution of user code.
#[derive(Clone, Debug)]
pub struct ExecutionRecord {
    id: ExecutionId,
    source: Arc<str>,
    bindings: Vec<ArgumentBinding>,
    context: Option<Value>,
    api: EngineApi,
    messages: Arc<MessageManager>,
    options: EvalOptions,
    status: ExecutionStatus,
    compiled: Option<CompiledFunction>,
    result: Option<ExecutionResult>,
    build_error: Option<BuildFault>,
    run_error: Option<RunFault>,
    build_duration: Option<Duration>,
    run_duration: Option<Duration>,
}

impl ExecutionRecord {
    /// A fresh record. The bindings are `app`, `engine`, `context`, then
    /// `extra_bindings` in order; a later binding with a reused name shadows
    /// the earlier one.
    pub fn new(
        host: Value,
        messages: Arc<MessageManager>,
        source: impl Into<Arc<str>>,
        context: Option<Value>,
        extra_bindings: Vec<ArgumentBinding>,
    ) -> Self {
        let id = ExecutionId::new();
        let api = EngineApi::new(InstanceId::execution(&id), Arc::clone(&messages));

        let mut bindings = Vec::with_capacity(extra_bindings.len() + 3);
        bindings.push(ArgumentBinding::new(HOST_BINDING, host));
        bindings.push(ArgumentBinding::new(API_BINDING, Value::host(api.clone())));
        bindings.push(ArgumentBinding::new(
            CONTEXT_BINDING,
            context.clone().unwrap_or(Value::Undefined),
        ));
        bindings.extend(extra_bindings);

        ExecutionRecord {
            id,
            source: source.into(),
            bindings,
            context,
            api,
            messages,
            options: EvalOptions::default(),
            status: ExecutionStatus::Created,
            compiled: None,
            result: None,
            build_error: None,
            run_error: None,
            build_duration: None,
            run_duration: None,
        }
    }

    #[must_use]
    pub fn with_eval_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    // Build phase

    /// Compile the source. Never fails: a build fault is recorded on the
    /// record and reported as [`BuildOutcome::Failed`].
    pub fn compile(&mut self) -> BuildOutcome {
        if self.status != ExecutionStatus::Created {
            return BuildOutcome::Rejected(self.violation("compile"));
        }
        self.status = ExecutionStatus::Building;
        tracing::debug!(execution = %self.id, bindings = self.bindings.len(), "build started");

        let start = Instant::now();
        let names: Vec<Arc<str>> = self
            .bindings
            .iter()
            .map(|binding| Arc::clone(&binding.name))
            .collect();
        let compiled = CompiledFunction::compile_with(&names, &self.source, self.options.clone());

        let outcome = match compiled {
            Ok(function) => {
                self.compiled = Some(function.clone());
                self.status = ExecutionStatus::Built;
                BuildOutcome::Built(Invocation {
                    execution: self.id,
                    function,
                    args: self.bindings.iter().map(|b| b.value.clone()).collect(),
                })
            }
            Err(fault) => {
                let message = self.messages.add(
                    self.api.instance_id().clone(),
                    MessageType::Error,
                    BUILD_FAILURE_TITLE,
                    format!("Failed to parse script during execution \"{}\"", self.id),
                    Some(fault.report.clone()),
                );
                self.result = Some(ExecutionResult::Message(message));
                self.build_error = Some(fault);
                self.status = ExecutionStatus::BuildFailed;
                BuildOutcome::Failed
            }
        };

        let duration = start.elapsed();
        self.build_duration = Some(duration);
        tracing::debug!(
            execution = %self.id,
            status = %self.status,
            ms = duration.as_secs_f64() * 1000.0,
            "build finished"
        );
        outcome
    }

    // Run phase

    /// Mark a built record as running.
    pub fn mark_running(&mut self) -> Result<(), ContractViolation> {
        if self.status != ExecutionStatus::Built {
            return Err(self.violation("start running"));
        }
        self.status = ExecutionStatus::Running;
        Ok(())
    }

    /// Fold the report of this record's invocation into the record.
    pub fn finish_run(&mut self, report: RunReport) -> Result<(), ContractViolation> {
        if report.execution != self.id {
            return Err(ContractViolation::ForeignReport {
                record: self.id,
                report: report.execution,
            });
        }
        if !matches!(self.status, ExecutionStatus::Built | ExecutionStatus::Running) {
            return Err(self.violation("finish a run"));
        }

        self.run_duration = Some(report.duration);
        match report.outcome {
            Ok(value) => {
                self.result = Some(ExecutionResult::Value(value));
                self.status = ExecutionStatus::RunSucceeded;
            }
            Err(fault) => {
                let message = self.messages.add(
                    self.api.instance_id().clone(),
                    MessageType::Error,
                    RUN_FAILURE_TITLE,
                    format!("Failed to execute script during execution \"{}\"", self.id),
                    Some(fault.detail().to_string()),
                );
                self.result = Some(ExecutionResult::Message(message));
                self.run_error = Some(fault);
                self.status = ExecutionStatus::RunFailed;
            }
        }
        Ok(())
    }

    fn violation(&self, action: &'static str) -> ContractViolation {
        ContractViolation::InvalidState {
            id: self.id,
            action,
            status: self.status,
        }
    }

    // Queries

    pub fn id(&self) -> ExecutionId {
        self.id
    }

    pub fn instance_id(&self) -> &InstanceId {
        self.api.instance_id()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bindings(&self) -> &[ArgumentBinding] {
        &self.bindings
    }

    pub fn binding_names(&self) -> Vec<Arc<str>> {
        self.bindings.iter().map(|b| Arc::clone(&b.name)).collect()
    }

    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    pub fn api(&self) -> &EngineApi {
        &self.api
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status
    }

    pub fn compiled(&self) -> Option<&CompiledFunction> {
        self.compiled.as_ref()
    }

    pub fn result(&self) -> Option<&ExecutionResult> {
        self.result.as_ref()
    }

    /// The returned value of a successful run.
    pub fn value(&self) -> Option<&Value> {
        self.result.as_ref().and_then(ExecutionResult::as_value)
    }

    pub fn build_error(&self) -> Option<&BuildFault> {
        self.build_error.as_ref()
    }

    pub fn run_error(&self) -> Option<&RunFault> {
        self.run_error.as_ref()
    }

    pub fn build_duration(&self) -> Option<Duration> {
        self.build_duration
    }

    pub fn run_duration(&self) -> Option<Duration> {
        self.run_duration
    }

    pub fn build_duration_ms(&self) -> Option<f64> {
        self.build_duration.map(|d| d.as_secs_f64() * 1000.0)
    }

    pub fn run_duration_ms(&self) -> Option<f64> {
        self.run_duration.map(|d| d.as_secs_f64() * 1000.0)
    }

    /// Neither phase recorded a fault.
    pub fn succeeded(&self) -> bool {
        self.build_error.is_none() && self.run_error.is_none()
    }

    /// Messages created under this execution's instance id.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.messages_from_source(self.api.instance_id())
    }

    pub fn snapshot(&self) -> ExecutionSnapshot {
        ExecutionSnapshot {
            id: self.id,
            status: self.status,
            source: Arc::clone(&self.source),
            binding_names: self.binding_names(),
            build_duration: self.build_duration,
            run_duration: self.run_duration,
            result: self.result.as_ref().map(ExecutionResult::render),
            build_error: self.build_error.as_ref().map(|fault| fault.report.clone()),
            run_error: self.run_error.as_ref().map(|fault| fault.detail().to_string()),
            message_count: self.messages().len(),
        }
    }
}

/// Read-only copy of a record's observable fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionSnapshot {
    pub id: ExecutionId,
    pub status: ExecutionStatus,
    pub source: Arc<str>,
    pub binding_names: Vec<Arc<str>>,
    pub build_duration: Option<Duration>,
    pub run_duration: Option<Duration>,
    /// Rendered result value or failure message.
    pub result: Option<String>,
    pub build_error: Option<String>,
    pub run_error: Option<String>,
    pub message_count: usize,
}
