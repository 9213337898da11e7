//! Expression evaluation.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use snip_ir::{AssignOp, ExprId, ExprKind, LogicalOp, Span, UnaryOp, UpdateOp};

use super::{get_property, set_property, Ctx};
use crate::environment::AssignError;
use crate::errors::{const_assignment, not_a_function, not_defined, type_error};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::stack::guarded;
use crate::{Thrown, Value};

type EvalResult = Result<Value, Thrown>;

/// An assignable location.
enum Place {
    Binding(Arc<str>),
    Property(Value, Arc<str>),
}

impl Ctx {
    pub(crate) fn eval(&self, id: ExprId) -> BoxFuture<'_, EvalResult> {
        guarded(self.eval_inner(id).boxed())
    }

    async fn eval_inner(&self, id: ExprId) -> EvalResult {
        let expr = self.script.arena.expr(id);
        let span = expr.span;
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::Str(Arc::clone(s))),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Undefined => Ok(Value::Undefined),
            ExprKind::Ident(name) => self
                .env
                .lookup(name)
                .ok_or_else(|| not_defined(&self.at(span), name)),
            ExprKind::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for &element in elements {
                    items.push(self.eval(element).await?);
                }
                Ok(Value::array(items))
            }
            ExprKind::Object(properties) => {
                let mut entries = Vec::with_capacity(properties.len());
                for property in properties {
                    let value = self.eval(property.value).await?;
                    entries.push((Arc::clone(&property.key), value));
                }
                Ok(Value::object(entries))
            }
            ExprKind::Member { object, property } => {
                let target = self.eval(*object).await?;
                get_property(&self.at(span), &target, property)
            }
            ExprKind::Index { object, index } => {
                let target = self.eval(*object).await?;
                let key = self.eval(*index).await?.to_display();
                get_property(&self.at(span), &target, &key)
            }
            ExprKind::Call { callee, args } => {
                let function = self.eval(*callee).await?;
                let args = self.eval_args(args).await?;
                let interp = self.at(span);
                if !function.is_callable() {
                    let callee_span = self.script.arena.expr(*callee).span;
                    return Err(not_a_function(&interp, self.script.slice(callee_span)));
                }
                interp.call(function, args).await
            }
            ExprKind::New { callee, args } => {
                let constructor = self.eval(*callee).await?;
                let args = self.eval_args(args).await?;
                let interp = self.at(span);
                match constructor {
                    Value::Native(_) => interp.call(constructor, args).await,
                    _ => {
                        let callee_span = self.script.arena.expr(*callee).span;
                        Err(type_error(
                            &interp,
                            format!("{} is not a constructor", self.script.slice(callee_span)),
                        ))
                    }
                }
            }
            ExprKind::Unary { op, operand } => {
                // `typeof missing` is "undefined", not a ReferenceError.
                if *op == UnaryOp::Typeof {
                    if let ExprKind::Ident(name) = &self.script.arena.expr(*operand).kind {
                        let value = self.env.lookup(name).unwrap_or(Value::Undefined);
                        return Ok(Value::string(value.type_of()));
                    }
                }
                let value = self.eval(*operand).await?;
                Ok(evaluate_unary(*op, &value))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(*left).await?;
                let right = self.eval(*right).await?;
                Ok(evaluate_binary(*op, &left, &right))
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.eval(*left).await?;
                let short_circuit = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::Coalesce => !left.is_nullish(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.eval(*right).await
                }
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(*test).await?.is_truthy() {
                    self.eval(*consequent).await
                } else {
                    self.eval(*alternate).await
                }
            }
            ExprKind::Assign { op, target, value } => {
                self.eval_assign(*op, *target, *value, span).await
            }
            ExprKind::Update { op, prefix, target } => {
                self.eval_update(*op, *prefix, *target, span).await
            }
            ExprKind::Function(function) => Ok(self.closure(*function)),
            ExprKind::Await(operand) => match self.eval(*operand).await? {
                Value::Promise(promise) => promise.settle().await,
                value => Ok(value),
            },
        }
    }

    async fn eval_args(&self, args: &[ExprId]) -> Result<Vec<Value>, Thrown> {
        let mut values = Vec::with_capacity(args.len());
        for &arg in args {
            values.push(self.eval(arg).await?);
        }
        Ok(values)
    }

    async fn eval_assign(
        &self,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
        span: Span,
    ) -> EvalResult {
        let place = self.resolve_place(target).await?;
        let new_value = match op.binary() {
            None => self.eval(value).await?,
            Some(binary) => {
                let current = self.read_place(&place, span)?;
                let operand = self.eval(value).await?;
                evaluate_binary(binary, &current, &operand)
            }
        };
        self.write_place(&place, new_value.clone(), span)?;
        Ok(new_value)
    }

    async fn eval_update(
        &self,
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
        span: Span,
    ) -> EvalResult {
        let place = self.resolve_place(target).await?;
        let old = self.read_place(&place, span)?.to_number();
        let new = old + op.delta();
        self.write_place(&place, Value::Number(new), span)?;
        Ok(Value::Number(if prefix { new } else { old }))
    }

    /// Evaluate the object and key parts of an assignment target.
    async fn resolve_place(&self, target: ExprId) -> Result<Place, Thrown> {
        match &self.script.arena.expr(target).kind {
            ExprKind::Ident(name) => Ok(Place::Binding(Arc::clone(name))),
            ExprKind::Member { object, property } => {
                let object = self.eval(*object).await?;
                Ok(Place::Property(object, Arc::clone(property)))
            }
            ExprKind::Index { object, index } => {
                let object = self.eval(*object).await?;
                let key = self.eval(*index).await?.to_display();
                Ok(Place::Property(object, Arc::from(key)))
            }
            // The parser only produces the three forms above.
            _ => {
                let span = self.script.arena.expr(target).span;
                Err(type_error(&self.at(span), "Invalid assignment target"))
            }
        }
    }

    fn read_place(&self, place: &Place, span: Span) -> EvalResult {
        match place {
            Place::Binding(name) => self
                .env
                .lookup(name)
                .ok_or_else(|| not_defined(&self.at(span), name)),
            Place::Property(object, key) => get_property(&self.at(span), object, key),
        }
    }

    fn write_place(&self, place: &Place, value: Value, span: Span) -> Result<(), Thrown> {
        match place {
            Place::Binding(name) => match self.env.assign(name, value) {
                Ok(()) => Ok(()),
                Err(AssignError::Immutable) => Err(const_assignment(&self.at(span))),
                Err(AssignError::Undefined) => Err(not_defined(&self.at(span), name)),
            },
            Place::Property(object, key) => set_property(&self.at(span), object, key, value),
        }
    }
}
