//! The execution engine: drives records through both phases and tracks
//! the ones in flight.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use snip_eval::Value;

use crate::api::EngineApi;
use crate::binding::ArgumentBinding;
use crate::config::EngineConfig;
use crate::execution::{BuildOutcome, ExecutionRecord, ExecutionSnapshot};
use crate::id::{ExecutionId, InstanceId};
use crate::messages::MessageManager;
use crate::stats::ExecutionStatsView;

type SharedRecord = Arc<RwLock<ExecutionRecord>>;

/// Runs scripts on behalf of one host.
///
/// `execute` takes `&self` and its future is `Send`, so one engine can
/// drive any number of executions concurrently. The in-flight registry
/// holds exactly the records between creation and their terminal state.
pub struct Engine {
    host: Value,
    messages: Arc<MessageManager>,
    api: EngineApi,
    config: EngineConfig,
    active: DashMap<ExecutionId, SharedRecord>,
    stats_view: Mutex<ExecutionStatsView>,
}

impl Engine {
    /// An engine whose scripts see `host` as `app`.
    pub fn new(host: Value) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    pub fn with_config(host: Value, config: EngineConfig) -> Self {
        Self::with_messages(host, Arc::new(MessageManager::new()), config)
    }

    /// An engine reporting into an existing message store.
    pub fn with_messages(host: Value, messages: Arc<MessageManager>, config: EngineConfig) -> Self {
        let api = EngineApi::new(InstanceId::engine(), Arc::clone(&messages));
        Engine {
            host,
            messages,
            api,
            config,
            active: DashMap::new(),
            stats_view: Mutex::new(ExecutionStatsView::new()),
        }
    }

    pub fn messages(&self) -> &Arc<MessageManager> {
        &self.messages
    }

    /// The engine's own API instance.
    pub fn api(&self) -> &EngineApi {
        &self.api
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build and run `source`, returning the terminal record.
    ///
    /// Never fails: faults in the user's code are captured on the record.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(execution = tracing::field::Empty, bytes = source.len())
    )]
    pub async fn execute(
        &self,
        source: &str,
        bindings: Vec<ArgumentBinding>,
        context: Option<Value>,
    ) -> ExecutionRecord {
        let record = ExecutionRecord::new(
            self.host.clone(),
            Arc::clone(&self.messages),
            source,
            context,
            bindings,
        )
        .with_eval_options(self.config.eval.clone());
        let id = record.id();
        tracing::Span::current().record("execution", tracing::field::display(id));

        let shared = Arc::new(RwLock::new(record));
        self.active.insert(id, Arc::clone(&shared));

        let outcome = shared.write().compile();
        match outcome {
            BuildOutcome::Built(invocation) => {
                let started = shared.write().mark_running();
                if let Err(violation) = started {
                    tracing::error!(%violation, "contract violation");
                }
                let report = invocation.run().await;
                let finished = shared.write().finish_run(report);
                if let Err(violation) = finished {
                    tracing::error!(%violation, "contract violation");
                }
            }
            BuildOutcome::Failed => {}
            BuildOutcome::Rejected(violation) => {
                tracing::error!(%violation, "contract violation");
            }
        }

        self.active.remove(&id);
        let record = match Arc::try_unwrap(shared) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => shared.read().clone(),
        };
        tracing::debug!(status = %record.status(), "execution finished");
        record
    }

    /// Snapshots of every execution currently building or running.
    pub fn active_executions(&self) -> Vec<ExecutionSnapshot> {
        self.active
            .iter()
            .map(|entry| entry.value().read().snapshot())
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Snapshot of one in-flight execution.
    pub fn execution(&self, id: &ExecutionId) -> Option<ExecutionSnapshot> {
        let shared = self.active.get(id).map(|entry| Arc::clone(entry.value()))?;
        let snapshot = shared.read().snapshot();
        Some(snapshot)
    }

    /// Show `record` in the statistics view and return the rendering.
    pub fn open_execution_stats(&self, record: &ExecutionRecord) -> String {
        let mut view = self.stats_view.lock();
        view.set_execution(record.snapshot());
        view.render()
    }
}
