//! Engine configuration.

use snip_eval::EvalOptions;

/// Settings applied to every execution an engine runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub eval: EvalOptions,
}

impl EngineConfig {
    /// Script calls nested deeper than `depth` throw a `RangeError`.
    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.eval = self.eval.with_max_call_depth(depth);
        self
    }

    /// Forward `console.*` output to `tracing`.
    #[must_use]
    pub fn with_echo_console(mut self, echo: bool) -> Self {
        self.eval = self.eval.with_echo_console(echo);
        self
    }
}
