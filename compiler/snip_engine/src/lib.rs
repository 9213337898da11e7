//! Dynamic execution engine for Snip scripts.
//!
//! An [`Engine`] turns a source text plus named [`ArgumentBinding`]s into an
//! [`ExecutionRecord`]: it compiles the source as the body of an `async`
//! function whose parameters are the bindings, runs it, and records the
//! result, the fault of whichever phase failed, and how long each phase
//! took. Every execution sees three bindings first:
//!
//! - `app`: the host handle given to the engine
//! - `engine`: a per-execution [`EngineApi`] (messages, reactive components)
//! - `context`: the caller's context value, or `undefined`
//!
//! followed by the caller's own bindings.
//!
//! # Tracing
//!
//! The engine logs through `tracing`. Call [`init_tracing`] to install a
//! subscriber filtered by `RUST_LOG` (nothing is installed when it is unset):
//!
//! ```bash
//! RUST_LOG=snip_engine=debug snip run script.snip
//! RUST_LOG=snip::console=info snip run script.snip   # script console output
//! ```

mod api;
mod binding;
pub mod commands;
mod config;
mod engine;
mod errors;
mod execution;
mod id;
mod messages;
mod reactive;
mod stats;

pub use api::{message_to_value, EngineApi};
pub use binding::{ArgumentBinding, API_BINDING, CONTEXT_BINDING, HOST_BINDING};
pub use config::EngineConfig;
pub use engine::Engine;
pub use errors::ContractViolation;
pub use execution::{
    BuildOutcome, ExecutionRecord, ExecutionResult, ExecutionSnapshot, ExecutionStatus,
    Invocation, RunReport, BUILD_FAILURE_TITLE, RUN_FAILURE_TITLE,
};
pub use id::{ExecutionId, InstanceId, InstanceKind};
pub use messages::{Message, MessageManager, MessageType};
pub use reactive::ReactiveComponent;
pub use stats::ExecutionStatsView;

pub use snip_eval::{EvalOptions, HostObject, Value};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber if `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has any effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
