//! Identifiers for executions and message sources.

use std::fmt;

use uuid::Uuid;

/// Process-unique identifier of one execution (a random UUID v4).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        ExecutionId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// What kind of owner a message source is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InstanceKind {
    /// The engine's own API instance.
    Engine,
    /// One execution's API instance.
    Execution,
}

impl InstanceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceKind::Engine => "engine",
            InstanceKind::Execution => "execution",
        }
    }
}

/// Identity of an API instance; messages are keyed by it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId {
    pub kind: InstanceKind,
    pub id: String,
}

impl InstanceId {
    /// A fresh engine-level instance.
    pub fn engine() -> Self {
        InstanceId {
            kind: InstanceKind::Engine,
            id: Uuid::new_v4().to_string(),
        }
    }

    pub fn execution(id: &ExecutionId) -> Self {
        InstanceId {
            kind: InstanceKind::Execution,
            id: id.to_string(),
        }
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}
