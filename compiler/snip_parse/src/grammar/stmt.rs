//! Statement parsing.

use std::sync::Arc;

use snip_diagnostic::{Diagnostic, ErrorCode};
use snip_ir::{CatchClause, DeclKind, Declarator, Span, Stmt, StmtId, StmtKind, TokenKind};

use crate::stack::ensure_sufficient_stack;
use crate::{ParseResult, Parser};

impl Parser<'_> {
    pub(crate) fn parse_statement(&mut self) -> ParseResult<StmtId> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> ParseResult<StmtId> {
        let start = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::LBrace => self.in_scope(Self::parse_block),
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                let kind = self.parse_declaration()?;
                self.consume_semicolon()?;
                Ok(self.alloc_stmt(kind, start))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Break | TokenKind::Continue => self.parse_jump(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Throw => {
                self.cursor.advance();
                let value = self.parse_expr()?;
                self.consume_semicolon()?;
                Ok(self.alloc_stmt(StmtKind::Throw(value), start))
            }
            TokenKind::Try => self.parse_try(),
            TokenKind::Semicolon => {
                self.cursor.advance();
                Ok(self.alloc_stmt(StmtKind::Empty, start))
            }
            TokenKind::Function => self.parse_function_declaration(false),
            TokenKind::Async
                if matches!(self.cursor.peek_kind(1), TokenKind::Function)
                    && !self.cursor.peek(1).flags.has_newline_before() =>
            {
                self.cursor.advance();
                self.parse_function_declaration(true)
            }
            _ => {
                let expr = self.parse_expr()?;
                self.consume_semicolon()?;
                Ok(self.alloc_stmt(StmtKind::Expr(expr), start))
            }
        }
    }

    pub(crate) fn alloc_stmt(&mut self, kind: StmtKind, start: Span) -> StmtId {
        let span = start.merge(self.cursor.previous_span());
        self.arena.alloc_stmt(Stmt::new(kind, span))
    }

    /// `{ stmt* }`. The caller opens the scope.
    pub(crate) fn parse_block(&mut self) -> ParseResult<StmtId> {
        let start = self.cursor.current_span();
        let stmts = self.parse_block_statements()?;
        Ok(self.alloc_stmt(StmtKind::Block(stmts), start))
    }

    pub(crate) fn parse_block_statements(&mut self) -> ParseResult<Vec<StmtId>> {
        let open = self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) && !self.cursor.is_at_end() {
            stmts.push(self.parse_statement()?);
        }
        self.expect_close(&TokenKind::RBrace, open, '{')?;
        Ok(stmts)
    }

    /// `let|const|var name (= init)? (, ...)*` without the terminator.
    fn parse_declaration(&mut self) -> ParseResult<StmtKind> {
        let kind = match self.cursor.advance().kind {
            TokenKind::Const => DeclKind::Const,
            TokenKind::Var => DeclKind::Var,
            _ => DeclKind::Let,
        };

        let mut declarators = Vec::new();
        loop {
            let (name, span) = self.expect_ident()?;
            let init = if self.cursor.eat(&TokenKind::Eq) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            if kind.is_const() && init.is_none() {
                return Err(Diagnostic::error(ErrorCode::E1009)
                    .with_message(format!("missing initializer in const declaration `{name}`"))
                    .with_label(span, "const needs a value"));
            }
            self.declare(&name, kind, span)?;
            declarators.push(Declarator {
                name,
                init,
                span: span.merge(self.cursor.previous_span()),
            });
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(StmtKind::Decl { kind, declarators })
    }

    fn parse_if(&mut self) -> ParseResult<StmtId> {
        let start = self.cursor.advance().span;
        let open = self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect_close(&TokenKind::RParen, open, '(')?;
        let consequent = self.parse_statement()?;
        let alternate = if self.cursor.eat(&TokenKind::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.alloc_stmt(
            StmtKind::If {
                test,
                consequent,
                alternate,
            },
            start,
        ))
    }

    fn parse_while(&mut self) -> ParseResult<StmtId> {
        let start = self.cursor.advance().span;
        let open = self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect_close(&TokenKind::RParen, open, '(')?;
        let body = self.in_loop(Self::parse_statement)?;
        Ok(self.alloc_stmt(StmtKind::While { test, body }, start))
    }

    /// `for (init; test; update) body` or `for (let x of xs) body`.
    fn parse_for(&mut self) -> ParseResult<StmtId> {
        let start = self.cursor.advance().span;
        let open = self.expect(&TokenKind::LParen)?;

        self.in_scope(|p| {
            let is_decl = matches!(
                p.cursor.current_kind(),
                TokenKind::Let | TokenKind::Const | TokenKind::Var
            );
            if is_decl
                && matches!(p.cursor.peek_kind(1), TokenKind::Ident(_))
                && p.cursor.peek_kind(2).is_ident("of")
            {
                return p.parse_for_of(start, open);
            }

            let init = if p.cursor.check(&TokenKind::Semicolon) {
                None
            } else if is_decl {
                let init_start = p.cursor.current_span();
                let kind = p.parse_declaration()?;
                Some(p.alloc_stmt(kind, init_start))
            } else {
                let init_start = p.cursor.current_span();
                let expr = p.parse_expr()?;
                Some(p.alloc_stmt(StmtKind::Expr(expr), init_start))
            };
            p.expect(&TokenKind::Semicolon)?;

            let test = if p.cursor.check(&TokenKind::Semicolon) {
                None
            } else {
                Some(p.parse_expr()?)
            };
            p.expect(&TokenKind::Semicolon)?;

            let update = if p.cursor.check(&TokenKind::RParen) {
                None
            } else {
                Some(p.parse_expr()?)
            };
            p.expect_close(&TokenKind::RParen, open, '(')?;

            let body = p.in_loop(Self::parse_statement)?;
            Ok(p.alloc_stmt(
                StmtKind::For {
                    init,
                    test,
                    update,
                    body,
                },
                start,
            ))
        })
    }

    fn parse_for_of(&mut self, start: Span, open: Span) -> ParseResult<StmtId> {
        let kind = match self.cursor.advance().kind {
            TokenKind::Const => DeclKind::Const,
            TokenKind::Var => DeclKind::Var,
            _ => DeclKind::Let,
        };
        let (name, span) = self.expect_ident()?;
        self.declare(&name, kind, span)?;
        // Contextual `of`, checked by the caller.
        self.cursor.advance();
        let iterable = self.parse_assignment()?;
        self.expect_close(&TokenKind::RParen, open, '(')?;
        let body = self.in_loop(Self::parse_statement)?;
        Ok(self.alloc_stmt(
            StmtKind::ForOf {
                kind,
                name,
                iterable,
                body,
            },
            start,
        ))
    }

    fn parse_jump(&mut self) -> ParseResult<StmtId> {
        let token = self.cursor.advance();
        if !self.in_loop_body() {
            let keyword = token.kind.display_name();
            return Err(Diagnostic::error(ErrorCode::E1007)
                .with_message(format!("`{keyword}` outside of a loop"))
                .with_label(token.span, format!("`{keyword}` must be inside a loop body")));
        }
        self.consume_semicolon()?;
        let kind = if matches!(token.kind, TokenKind::Break) {
            StmtKind::Break
        } else {
            StmtKind::Continue
        };
        Ok(self.alloc_stmt(kind, token.span))
    }

    fn parse_return(&mut self) -> ParseResult<StmtId> {
        let start = self.cursor.advance().span;
        let ends_here = self.cursor.newline_before()
            || self.cursor.is_at_end()
            || matches!(
                self.cursor.current_kind(),
                TokenKind::Semicolon | TokenKind::RBrace
            );
        let value = if ends_here {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume_semicolon()?;
        Ok(self.alloc_stmt(StmtKind::Return(value), start))
    }

    fn parse_try(&mut self) -> ParseResult<StmtId> {
        let start = self.cursor.advance().span;
        let block = self.in_scope(Self::parse_block)?;

        let handler = if self.cursor.eat(&TokenKind::Catch) {
            Some(self.in_scope(|p| {
                let param = if p.cursor.check(&TokenKind::LParen) {
                    let open = p.cursor.advance().span;
                    let (name, span) = p.expect_ident()?;
                    p.declare(&name, DeclKind::Let, span)?;
                    p.expect_close(&TokenKind::RParen, open, '(')?;
                    Some(name)
                } else {
                    None
                };
                let body = p.in_scope(Self::parse_block)?;
                Ok(CatchClause { param, body })
            })?)
        } else {
            None
        };

        let finalizer = if self.cursor.eat(&TokenKind::Finally) {
            Some(self.in_scope(Self::parse_block)?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected("`catch` or `finally`"));
        }

        Ok(self.alloc_stmt(
            StmtKind::Try {
                block,
                handler,
                finalizer,
            },
            start,
        ))
    }

    /// `function name(params) { body }`, hoisted by the evaluator.
    fn parse_function_declaration(&mut self, is_async: bool) -> ParseResult<StmtId> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        let (name, name_span) = self.expect_ident()?;
        self.declare(&name, DeclKind::Let, name_span)?;
        let function = self.parse_function_rest(Some(Arc::clone(&name)), is_async, start)?;
        Ok(self.alloc_stmt(StmtKind::Function(function), start))
    }
}
