//! Lexical environments.
//!
//! Each scope is shared behind an `Arc<RwLock<_>>` so closures can capture
//! it and later calls observe writes made after the capture. Lookups walk
//! the parent chain one lock at a time; no two scope locks are ever held at
//! once.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Value;

/// Whether a binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// `let`, `var`, parameters, function declarations.
    Mutable,
    /// `const`.
    Immutable,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Why an assignment failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The binding is `const`.
    Immutable,
    /// No binding with that name is visible.
    Undefined,
}

#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

#[derive(Debug, Default)]
struct Scope {
    bindings: FxHashMap<Arc<str>, Binding>,
    parent: Option<Env>,
}

/// Handle to one scope in a chain.
#[derive(Clone, Debug, Default)]
pub struct Env(Arc<RwLock<Scope>>);

impl Env {
    /// A root scope with no parent.
    pub fn new() -> Self {
        Env::default()
    }

    /// A fresh scope whose parent is `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Env(Arc::new(RwLock::new(Scope {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
        })))
    }

    /// Define (or redefine) a binding in this scope.
    pub fn define(&self, name: Arc<str>, value: Value, mutability: Mutability) {
        self.0
            .write()
            .bindings
            .insert(name, Binding { value, mutability });
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.0.read().bindings.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let scope = current.0.read();
                if let Some(binding) = scope.bindings.get(name) {
                    return Some(binding.value.clone());
                }
                scope.parent.clone()
            };
            current = next?;
        }
    }

    pub fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        let mut current = self.clone();
        loop {
            let next = {
                let mut scope = current.0.write();
                if let Some(binding) = scope.bindings.get_mut(name) {
                    if !binding.mutability.is_mutable() {
                        return Err(AssignError::Immutable);
                    }
                    binding.value = value;
                    return Ok(());
                }
                scope.parent.clone()
            };
            match next {
                Some(parent) => current = parent,
                None => return Err(AssignError::Undefined),
            }
        }
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut parent = self.0.read().parent.clone();
        while let Some(env) = parent {
            depth += 1;
            parent = env.0.read().parent.clone();
        }
        depth
    }
}

#[cfg(test)]
mod tests;
