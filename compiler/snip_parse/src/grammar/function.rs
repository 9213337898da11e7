//! Function declarations, function expressions, and arrow functions.

use std::sync::Arc;

use snip_ir::{DeclKind, FunctionBody, FunctionDef, FunctionId, Param, Span, TokenKind};

use crate::{ParseResult, Parser};

impl Parser<'_> {
    /// Parameter list and block body, after `function name?`.
    pub(crate) fn parse_function_rest(
        &mut self,
        name: Option<Arc<str>>,
        is_async: bool,
        start: Span,
    ) -> ParseResult<FunctionId> {
        let params = self.parse_params()?;
        let body = self.in_function(is_async, |p| {
            p.declare_params(&params)?;
            p.parse_block_statements()
        })?;
        Ok(self.alloc_function(name, params, FunctionBody::Block(body), is_async, false, start))
    }

    /// `( ident, ident, ... )` with an optional trailing comma.
    pub(crate) fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        let open = self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            let (name, span) = self.expect_ident()?;
            params.push(Param { name, span });
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_close(&TokenKind::RParen, open, '(')?;
        Ok(params)
    }

    /// Arrow function after its parameters have been read; the current
    /// token is `=>`.
    pub(crate) fn parse_arrow_rest(
        &mut self,
        params: Vec<Param>,
        is_async: bool,
        start: Span,
    ) -> ParseResult<FunctionId> {
        self.expect(&TokenKind::FatArrow)?;
        let body = self.in_function(is_async, |p| {
            p.declare_params(&params)?;
            if p.cursor.check(&TokenKind::LBrace) {
                p.parse_block_statements().map(FunctionBody::Block)
            } else {
                p.parse_assignment().map(FunctionBody::Expr)
            }
        })?;
        Ok(self.alloc_function(None, params, body, is_async, true, start))
    }

    /// Parameters share the body's top-level scope, so `let x` may not
    /// redeclare parameter `x`. Repeated parameter names are allowed.
    fn declare_params(&mut self, params: &[Param]) -> ParseResult<()> {
        for param in params {
            self.declare(&param.name, DeclKind::Var, param.span)?;
        }
        Ok(())
    }

    fn alloc_function(
        &mut self,
        name: Option<Arc<str>>,
        params: Vec<Param>,
        body: FunctionBody,
        is_async: bool,
        is_arrow: bool,
        start: Span,
    ) -> FunctionId {
        let span = start.merge(self.cursor.previous_span());
        self.arena.alloc_function(FunctionDef {
            name,
            params,
            body,
            is_async,
            is_arrow,
            span,
        })
    }
}
