//! Intermediate representation for Snip scripts.
//!
//! Everything downstream of the lexer speaks these types:
//! - [`Span`]: byte ranges into the source text
//! - [`Token`] / [`TokenKind`] / [`TokenFlags`]: lexer output
//! - [`ExprArena`]: flat storage for expressions, statements, and functions,
//!   addressed by [`ExprId`], [`StmtId`], and [`FunctionId`]
//!
//! The arena is immutable once parsing finishes and is shared behind an `Arc`
//! by every closure created while evaluating it.

mod arena;
mod ast;
mod operators;
mod span;
mod token;

pub use arena::ExprArena;
pub use ast::{
    CatchClause, DeclKind, Declarator, Expr, ExprId, ExprKind, FunctionBody, FunctionDef,
    FunctionId, Param, Property, Stmt, StmtId, StmtKind,
};
pub use operators::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
pub use span::{Span, SpanError};
pub use token::{Token, TokenFlags, TokenKind, TokenList};
