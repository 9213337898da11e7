//! Syntax tree node types.
//!
//! Children are referenced by index into an [`ExprArena`](crate::ExprArena)
//! rather than boxed, so a whole parsed script is one allocation group that
//! can be shared cheaply between the closures created from it.

use std::sync::Arc;

use crate::{AssignOp, BinaryOp, LogicalOp, Span, UnaryOp, UpdateOp};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Index of an [`Expr`] in the arena.
    ExprId
);
arena_id!(
    /// Index of a [`Stmt`] in the arena.
    StmtId
);
arena_id!(
    /// Index of a [`FunctionDef`] in the arena.
    FunctionId
);

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(Arc<str>),
    Bool(bool),
    Null,
    Undefined,
    Ident(Arc<str>),
    Array(Vec<ExprId>),
    Object(Vec<Property>),
    /// `object.property`
    Member {
        object: ExprId,
        property: Arc<str>,
    },
    /// `object[index]`
    Index {
        object: ExprId,
        index: ExprId,
    },
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    New {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Logical {
        op: LogicalOp,
        left: ExprId,
        right: ExprId,
    },
    Conditional {
        test: ExprId,
        consequent: ExprId,
        alternate: ExprId,
    },
    /// Target is an `Ident`, `Member`, or `Index` expression.
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
    },
    Function(FunctionId),
    Await(ExprId),
}

/// `key: value` entry of an object literal.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub key: Arc<str>,
    pub value: ExprId,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Declaration keyword.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Let,
    Const,
    Var,
}

impl DeclKind {
    pub fn is_const(self) -> bool {
        matches!(self, DeclKind::Const)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declarator {
    pub name: Arc<str>,
    pub init: Option<ExprId>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub param: Option<Arc<str>>,
    pub body: StmtId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Expr(ExprId),
    Decl {
        kind: DeclKind,
        declarators: Vec<Declarator>,
    },
    Block(Vec<StmtId>),
    If {
        test: ExprId,
        consequent: StmtId,
        alternate: Option<StmtId>,
    },
    While {
        test: ExprId,
        body: StmtId,
    },
    For {
        init: Option<StmtId>,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    },
    ForOf {
        kind: DeclKind,
        name: Arc<str>,
        iterable: ExprId,
        body: StmtId,
    },
    Break,
    Continue,
    Return(Option<ExprId>),
    Throw(ExprId),
    Try {
        block: StmtId,
        handler: Option<CatchClause>,
        finalizer: Option<StmtId>,
    },
    /// Hoisted `function name() {}` declaration.
    Function(FunctionId),
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Arc<str>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FunctionBody {
    Block(Vec<StmtId>),
    /// Concise arrow body: `x => x * 2`.
    Expr(ExprId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: Option<Arc<str>>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub is_async: bool,
    pub is_arrow: bool,
    pub span: Span,
}

impl FunctionDef {
    /// Name used in stack traces.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None if self.is_arrow => "<arrow>",
            None => "<anonymous>",
        }
    }
}
