//! Recursive descent parser for Snip.
//!
//! The unit of parsing is a function body: callers supply the parameter
//! names and the source text, and get back an [`ExprArena`] whose root
//! function is `async`, so top-level `await` and `return` are legal.
//!
//! Parsing stops at the first error. Lexer diagnostics short-circuit the
//! parser entirely.

mod cursor;
mod grammar;
mod stack;

use std::sync::Arc;

use rustc_hash::FxHashMap;
use snip_diagnostic::{invalid_binding_name, unexpected_token, Diagnostic, ErrorCode};
use snip_ir::{
    DeclKind, ExprArena, FunctionBody, FunctionDef, FunctionId, Param, Span, Token, TokenKind,
    TokenList,
};
use snip_lexer::lex;

use cursor::Cursor;

pub(crate) type ParseResult<T> = Result<T, Diagnostic>;

/// A successfully parsed function body.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedBody {
    pub arena: ExprArena,
    /// The `async` function wrapping the whole source.
    pub root: FunctionId,
}

/// Parse `source` as the body of an `async` function taking `params`.
///
/// Every parameter name must itself be a valid identifier; the first one
/// that is not yields an E2001 diagnostic without looking at the source.
pub fn parse_body(params: &[Arc<str>], source: &str) -> Result<ParsedBody, Vec<Diagnostic>> {
    for (position, name) in params.iter().enumerate() {
        if !is_valid_binding_name(name) {
            return Err(vec![invalid_binding_name(position, name)]);
        }
    }

    let lexed = lex(source);
    if lexed.has_errors() {
        return Err(lexed.diagnostics);
    }

    let mut parser = Parser::new(&lexed.tokens);
    match parser.parse_root(params, source.len()) {
        Ok(root) => Ok(ParsedBody {
            arena: parser.arena,
            root,
        }),
        Err(diagnostic) => Err(vec![diagnostic]),
    }
}

/// Whether `name` lexes as exactly one identifier token.
pub fn is_valid_binding_name(name: &str) -> bool {
    let lexed = lex(name);
    let mut tokens = lexed.tokens.iter();
    matches!(
        (tokens.next(), tokens.next()),
        (Some(Token { kind: TokenKind::Ident(ident), span, .. }), Some(Token { kind: TokenKind::Eof, .. }))
            if **ident == *name && span.start == 0
    )
}

/// Per-function parsing state.
#[derive(Copy, Clone, Debug)]
struct FunctionContext {
    is_async: bool,
    loop_depth: u32,
}

/// Parser state.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
    functions: Vec<FunctionContext>,
    /// Lexically scoped names declared in each open block.
    scopes: Vec<FxHashMap<Arc<str>, DeclKind>>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: ExprArena::new(),
            functions: Vec::new(),
            scopes: Vec::new(),
        }
    }

    fn parse_root(&mut self, params: &[Arc<str>], source_len: usize) -> ParseResult<FunctionId> {
        let params = params
            .iter()
            .map(|name| Param {
                name: Arc::clone(name),
                span: Span::DUMMY,
            })
            .collect();

        let body = self.in_function(true, |p| {
            let mut stmts = Vec::new();
            while !p.cursor.is_at_end() {
                stmts.push(p.parse_statement()?);
            }
            Ok(stmts)
        })?;

        let end = u32::try_from(source_len).unwrap_or(u32::MAX);
        Ok(self.arena.alloc_function(FunctionDef {
            name: None,
            params,
            body: FunctionBody::Block(body),
            is_async: true,
            is_arrow: false,
            span: Span::new(0, end),
        }))
    }

    // Context tracking

    fn in_function<T>(
        &mut self,
        is_async: bool,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.functions.push(FunctionContext {
            is_async,
            loop_depth: 0,
        });
        self.scopes.push(FxHashMap::default());
        let result = f(self);
        self.scopes.pop();
        self.functions.pop();
        result
    }

    fn in_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.scopes.push(FxHashMap::default());
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn in_loop<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if let Some(ctx) = self.functions.last_mut() {
            ctx.loop_depth += 1;
        }
        let result = f(self);
        if let Some(ctx) = self.functions.last_mut() {
            ctx.loop_depth -= 1;
        }
        result
    }

    fn in_async(&self) -> bool {
        self.functions.last().is_some_and(|ctx| ctx.is_async)
    }

    fn in_loop_body(&self) -> bool {
        self.functions.last().is_some_and(|ctx| ctx.loop_depth > 0)
    }

    /// Record a declaration in the innermost scope.
    ///
    /// `var` may repeat a `var`; any other combination in one block is E1008.
    fn declare(&mut self, name: &Arc<str>, kind: DeclKind, span: Span) -> ParseResult<()> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        match scope.get(name) {
            Some(DeclKind::Var) if kind == DeclKind::Var => Ok(()),
            Some(_) => Err(Diagnostic::error(ErrorCode::E1008)
                .with_message(format!("identifier `{name}` has already been declared"))
                .with_label(span, "redeclared here")),
            None => {
                scope.insert(Arc::clone(name), kind);
                Ok(())
            }
        }
    }

    // Token helpers

    fn unexpected(&self, expected: &str) -> Diagnostic {
        unexpected_token(
            self.cursor.current_span(),
            expected,
            self.cursor.current_kind().display_name(),
        )
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Span> {
        if self.cursor.check(kind) {
            Ok(self.cursor.advance().span)
        } else {
            Err(self.unexpected(&format!("`{}`", kind.display_name())))
        }
    }

    /// Expect the closing delimiter for `open`, reporting an unclosed
    /// delimiter at end of input.
    fn expect_close(&mut self, close: &TokenKind, open_span: Span, open: char) -> ParseResult<Span> {
        if self.cursor.check(close) {
            Ok(self.cursor.advance().span)
        } else if self.cursor.is_at_end() {
            Err(snip_diagnostic::unclosed_delimiter(
                open_span,
                self.cursor.current_span(),
                open,
            ))
        } else {
            Err(self.unexpected(&format!("`{}`", close.display_name())))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<(Arc<str>, Span)> {
        match self.cursor.current_kind().clone() {
            TokenKind::Ident(name) => {
                let span = self.cursor.advance().span;
                Ok((name, span))
            }
            other => Err(Diagnostic::error(ErrorCode::E1004)
                .with_message(format!("expected identifier, found `{}`", other.display_name()))
                .with_label(self.cursor.current_span(), "expected identifier")),
        }
    }

    /// Statement terminator with automatic semicolon insertion: a `;`, or
    /// nothing before `}`, end of input, or a line break.
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.cursor.eat(&TokenKind::Semicolon)
            || self.cursor.check(&TokenKind::RBrace)
            || self.cursor.is_at_end()
            || self.cursor.newline_before()
        {
            Ok(())
        } else {
            Err(self.unexpected("`;`"))
        }
    }
}

#[cfg(test)]
mod tests;
