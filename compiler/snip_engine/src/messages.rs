//! In-process message store.
//!
//! Executions report failures (and scripts report anything they like)
//! as messages keyed by the reporting API instance. Every added message is
//! also logged through `tracing` at the matching level.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use parking_lot::RwLock;

use crate::id::InstanceId;

/// Severity of a message.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Info => "info",
            MessageType::Warning => "warning",
            MessageType::Error => "error",
        }
    }

    /// Parse the script-facing name (`"info"`, `"warning"`, `"error"`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "info" => Some(MessageType::Info),
            "warning" => Some(MessageType::Warning),
            "error" => Some(MessageType::Error),
            _ => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub source: InstanceId,
    pub kind: MessageType,
    pub title: String,
    pub content: String,
    /// Code, stack trace or build report.
    pub detail: Option<String>,
    pub created_at: SystemTime,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.title, self.content)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n{detail}")?;
        }
        Ok(())
    }
}

/// Thread-safe message store, shared between an engine and its executions.
#[derive(Debug, Default)]
pub struct MessageManager {
    next_id: AtomicU64,
    messages: RwLock<Vec<Message>>,
}

impl MessageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &self,
        source: InstanceId,
        kind: MessageType,
        title: impl Into<String>,
        content: impl Into<String>,
        detail: Option<String>,
    ) -> Message {
        let message = Message {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            source,
            kind,
            title: title.into(),
            content: content.into(),
            detail,
            created_at: SystemTime::now(),
        };
        match kind {
            MessageType::Info => {
                tracing::info!(source = %message.source, title = %message.title, "{}", message.content);
            }
            MessageType::Warning => {
                tracing::warn!(source = %message.source, title = %message.title, "{}", message.content);
            }
            MessageType::Error => {
                tracing::error!(source = %message.source, title = %message.title, "{}", message.content);
            }
        }
        self.messages.write().push(message.clone());
        message
    }

    /// Messages added by `source`, oldest first.
    pub fn messages_from_source(&self, source: &InstanceId) -> Vec<Message> {
        self.messages
            .read()
            .iter()
            .filter(|message| &message.source == source)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    /// Remove one message. Returns whether it existed.
    pub fn remove(&self, id: u64) -> bool {
        let mut messages = self.messages.write();
        let before = messages.len();
        messages.retain(|message| message.id != id);
        messages.len() != before
    }

    /// Remove every message from `source`, returning how many were removed.
    pub fn clear_source(&self, source: &InstanceId) -> usize {
        let mut messages = self.messages.write();
        let before = messages.len();
        messages.retain(|message| &message.source != source);
        before - messages.len()
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

#[cfg(test)]
mod tests;
