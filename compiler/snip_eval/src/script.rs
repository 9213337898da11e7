//! Parsed scripts and the closures created from them.

use std::sync::Arc;

use snip_ir::{ExprArena, FunctionDef, FunctionId, Span};

use crate::environment::Env;

/// One parsed source text. Shared by every closure created while running it.
#[derive(Debug)]
pub struct Script {
    pub(crate) arena: ExprArena,
    pub(crate) root: FunctionId,
    source: Arc<str>,
    /// Byte offset of the start of each line.
    line_starts: Vec<u32>,
}

impl Script {
    pub(crate) fn new(arena: ExprArena, root: FunctionId, source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .match_indices('\n')
                    .map(|(i, _)| u32::try_from(i + 1).unwrap_or(u32::MAX)),
            )
            .collect();
        Script {
            arena,
            root,
            source: Arc::from(source),
            line_starts,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn function(&self, id: FunctionId) -> &FunctionDef {
        self.arena.function(id)
    }

    /// One-based line and column of a byte offset.
    pub fn location(&self, offset: u32) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let column = self
            .source
            .get(line_start as usize..offset as usize)
            .map_or(0, |prefix| prefix.chars().count());
        (line + 1, column + 1)
    }

    pub(crate) fn slice(&self, span: Span) -> &str {
        self.source.get(span.to_range()).unwrap_or("")
    }
}

/// A script function value: code plus the environment it closed over.
#[derive(Debug)]
pub struct Closure {
    pub(crate) script: Arc<Script>,
    pub(crate) function: FunctionId,
    pub(crate) env: Env,
}

impl Closure {
    pub(crate) fn def(&self) -> &FunctionDef {
        self.script.function(self.function)
    }

    pub fn name(&self) -> &str {
        self.def().display_name()
    }

    pub fn param_count(&self) -> usize {
        self.def().params.len()
    }

    pub fn is_async(&self) -> bool {
        self.def().is_async
    }

    /// The function's own source text.
    pub fn source_text(&self) -> &str {
        self.script.slice(self.def().span)
    }
}
