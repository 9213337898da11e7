//! Statement execution.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use snip_ir::{DeclKind, Declarator, ExprId, StmtId, StmtKind};

use super::Ctx;
use crate::environment::Mutability;
use crate::errors::type_error;
use crate::stack::guarded;
use crate::{Thrown, Value};

/// How a statement finished.
pub(crate) enum Completion {
    Normal,
    Return(Value),
    Break,
    Continue,
}

type ExecResult = Result<Completion, Thrown>;

impl Ctx {
    /// Run a function's top-level statements and produce its return value.
    pub(crate) async fn run_function_block(&self, stmts: &[StmtId]) -> Result<Value, Thrown> {
        match self.exec_stmts(stmts).await? {
            Completion::Return(value) => Ok(value),
            Completion::Normal | Completion::Break | Completion::Continue => Ok(Value::Undefined),
        }
    }

    /// Run statements in this scope after hoisting function declarations.
    fn exec_stmts<'a>(&'a self, stmts: &'a [StmtId]) -> BoxFuture<'a, ExecResult> {
        async move {
            self.hoist_functions(stmts);
            for &id in stmts {
                let completion = self.exec(id).await?;
                if !matches!(completion, Completion::Normal) {
                    return Ok(completion);
                }
            }
            Ok(Completion::Normal)
        }
        .boxed()
    }

    fn hoist_functions(&self, stmts: &[StmtId]) {
        for &id in stmts {
            if let StmtKind::Function(function) = self.script.arena.stmt(id).kind {
                if let Some(name) = &self.script.function(function).name {
                    self.env
                        .define(Arc::clone(name), self.closure(function), Mutability::Mutable);
                }
            }
        }
    }

    fn exec(&self, id: StmtId) -> BoxFuture<'_, ExecResult> {
        guarded(self.exec_inner(id).boxed())
    }

    async fn exec_inner(&self, id: StmtId) -> ExecResult {
        let stmt = self.script.arena.stmt(id);
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval(*expr).await?;
                Ok(Completion::Normal)
            }
            StmtKind::Decl { kind, declarators } => {
                self.declare(*kind, declarators).await?;
                Ok(Completion::Normal)
            }
            StmtKind::Block(stmts) => self.block_scope().exec_stmts(stmts).await,
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(*test).await?.is_truthy() {
                    self.exec(*consequent).await
                } else if let Some(alternate) = alternate {
                    self.exec(*alternate).await
                } else {
                    Ok(Completion::Normal)
                }
            }
            StmtKind::While { test, body } => {
                while self.eval(*test).await?.is_truthy() {
                    match self.exec(*body).await? {
                        Completion::Break => break,
                        Completion::Return(value) => return Ok(Completion::Return(value)),
                        Completion::Normal | Completion::Continue => {}
                    }
                }
                Ok(Completion::Normal)
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => self.exec_for(*init, *test, *update, *body).await,
            StmtKind::ForOf {
                kind,
                name,
                iterable,
                body,
            } => self.exec_for_of(*kind, name, *iterable, *body).await,
            StmtKind::Break => Ok(Completion::Break),
            StmtKind::Continue => Ok(Completion::Continue),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(*expr).await?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            StmtKind::Throw(expr) => {
                let value = self.eval(*expr).await?;
                Err(Thrown::new(value, &self.at(stmt.span)))
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                let outcome = match (self.exec(*block).await, handler) {
                    (Err(thrown), Some(handler)) => {
                        let catch_scope = self.block_scope();
                        if let Some(param) = &handler.param {
                            catch_scope.env.define(
                                Arc::clone(param),
                                thrown.value,
                                Mutability::Mutable,
                            );
                        }
                        catch_scope.exec(handler.body).await
                    }
                    (outcome, _) => outcome,
                };
                if let Some(finalizer) = finalizer {
                    match self.exec(*finalizer).await {
                        Ok(Completion::Normal) => {}
                        abrupt => return abrupt,
                    }
                }
                outcome
            }
            // Hoisted when the enclosing block started.
            StmtKind::Function(_) | StmtKind::Empty => Ok(Completion::Normal),
        }
    }

    async fn declare(&self, kind: DeclKind, declarators: &[Declarator]) -> Result<(), Thrown> {
        for declarator in declarators {
            let value = match declarator.init {
                Some(init) => self.eval(init).await?,
                None => Value::Undefined,
            };
            let name = Arc::clone(&declarator.name);
            match kind {
                DeclKind::Let => self.env.define(name, value, Mutability::Mutable),
                DeclKind::Const => self.env.define(name, value, Mutability::Immutable),
                DeclKind::Var => {
                    if !self.function_env.has_own(&name) {
                        self.function_env.define(name, value, Mutability::Mutable);
                    } else if declarator.init.is_some() {
                        let _ = self.function_env.assign(&name, value);
                    }
                }
            }
        }
        Ok(())
    }

    /// C-style `for`. Each iteration runs in its own copy of the loop's
    /// `let` bindings, so closures created in the body keep that
    /// iteration's values.
    async fn exec_for(
        &self,
        init: Option<StmtId>,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    ) -> ExecResult {
        let loop_scope = self.block_scope();
        let mut per_iteration = Vec::new();
        if let Some(init) = init {
            if let StmtKind::Decl {
                kind: DeclKind::Let,
                declarators,
            } = &self.script.arena.stmt(init).kind
            {
                per_iteration.extend(declarators.iter().map(|d| Arc::clone(&d.name)));
            }
            loop_scope.exec(init).await?;
        }

        loop {
            if let Some(test) = test {
                if !loop_scope.eval(test).await?.is_truthy() {
                    break;
                }
            }

            let iteration = loop_scope.block_scope();
            for name in &per_iteration {
                let value = loop_scope.env.lookup(name).unwrap_or(Value::Undefined);
                iteration.env.define(Arc::clone(name), value, Mutability::Mutable);
            }
            let completion = iteration.exec(body).await?;
            for name in &per_iteration {
                if let Some(value) = iteration.env.lookup(name) {
                    let _ = loop_scope.env.assign(name, value);
                }
            }

            match completion {
                Completion::Break => break,
                Completion::Return(value) => return Ok(Completion::Return(value)),
                Completion::Normal | Completion::Continue => {}
            }
            if let Some(update) = update {
                loop_scope.eval(update).await?;
            }
        }
        Ok(Completion::Normal)
    }

    async fn exec_for_of(
        &self,
        kind: DeclKind,
        name: &Arc<str>,
        iterable: ExprId,
        body: StmtId,
    ) -> ExecResult {
        let source = self.eval(iterable).await?;
        let items = match &source {
            Value::Array(items) => items.read().clone(),
            Value::Str(s) => s.chars().map(|c| Value::string(c.to_string())).collect(),
            other => {
                let span = self.script.arena.expr(iterable).span;
                return Err(type_error(
                    &self.at(span),
                    format!("{} is not iterable", other.inspect()),
                ));
            }
        };

        let mutability = if kind.is_const() {
            Mutability::Immutable
        } else {
            Mutability::Mutable
        };
        for item in items {
            let iteration = self.block_scope();
            iteration.env.define(Arc::clone(name), item, mutability);
            match iteration.exec(body).await? {
                Completion::Break => break,
                Completion::Return(value) => return Ok(Completion::Return(value)),
                Completion::Normal | Completion::Continue => {}
            }
        }
        Ok(Completion::Normal)
    }
}
