//! Expression parsing.
//!
//! Binary operators use precedence climbing over the levels defined on
//! [`BinaryOp`] and [`LogicalOp`]; assignment and the conditional operator
//! are handled above that, unary and postfix forms below.

use std::sync::Arc;

use snip_diagnostic::{await_outside_async, expected_expression, invalid_assignment_target};
use snip_ir::{
    AssignOp, BinaryOp, Expr, ExprId, ExprKind, LogicalOp, Param, Property, Span, TokenKind,
    UnaryOp, UpdateOp,
};

use crate::stack::ensure_sufficient_stack;
use crate::{ParseResult, Parser};

/// A binary-level operator: arithmetic/comparison or short-circuiting.
#[derive(Copy, Clone)]
enum InfixOp {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

impl InfixOp {
    fn precedence(self) -> u8 {
        match self {
            InfixOp::Binary(op) => op.precedence(),
            InfixOp::Logical(op) => op.precedence(),
        }
    }

    fn is_right_assoc(self) -> bool {
        matches!(self, InfixOp::Binary(op) if op.is_right_assoc())
    }
}

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> ParseResult<ExprId> {
        self.parse_assignment()
    }

    fn alloc_expr(&mut self, kind: ExprKind, start: Span) -> ExprId {
        let span = start.merge(self.cursor.previous_span());
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    /// Assignment, arrow functions, and everything below.
    pub(crate) fn parse_assignment(&mut self) -> ParseResult<ExprId> {
        ensure_sufficient_stack(|| self.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> ParseResult<ExprId> {
        if let Some(arrow) = self.try_parse_arrow()? {
            return Ok(arrow);
        }

        let start = self.cursor.current_span();
        let target = self.parse_conditional()?;

        let Some(op) = self.assign_op() else {
            return Ok(target);
        };
        if !self.is_assignable(target) {
            return Err(invalid_assignment_target(self.arena.expr(target).span));
        }
        self.cursor.advance();
        let value = self.parse_assignment()?;
        Ok(self.alloc_expr(ExprKind::Assign { op, target, value }, start))
    }

    fn assign_op(&self) -> Option<AssignOp> {
        Some(match self.cursor.current_kind() {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            _ => return None,
        })
    }

    fn is_assignable(&self, id: ExprId) -> bool {
        matches!(
            self.arena.expr(id).kind,
            ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        )
    }

    /// Recognize `x => ...`, `(a, b) => ...`, and their `async` forms.
    fn try_parse_arrow(&mut self) -> ParseResult<Option<ExprId>> {
        let start = self.cursor.current_span();
        let is_async = matches!(self.cursor.current_kind(), TokenKind::Async)
            && !self.cursor.peek(1).flags.has_newline_before()
            && matches!(
                self.cursor.peek_kind(1),
                TokenKind::Ident(_) | TokenKind::LParen
            );
        let offset = usize::from(is_async);

        let params_end = match self.cursor.peek_kind(offset) {
            TokenKind::Ident(_) => Some(offset + 1),
            TokenKind::LParen => self.cursor.matching_close(offset).map(|close| close + 1),
            _ => None,
        };

        let is_arrow = params_end.is_some_and(|end| {
            matches!(self.cursor.peek_kind(end), TokenKind::FatArrow)
                && !self.cursor.peek(end).flags.has_newline_before()
        });
        if !is_arrow {
            return Ok(None);
        }

        if is_async {
            self.cursor.advance();
        }
        let params = if let TokenKind::Ident(name) = self.cursor.current_kind().clone() {
            let span = self.cursor.advance().span;
            vec![Param { name, span }]
        } else {
            self.parse_params()?
        };
        let function = self.parse_arrow_rest(params, is_async, start)?;
        Ok(Some(self.alloc_expr(ExprKind::Function(function), start)))
    }

    fn parse_conditional(&mut self) -> ParseResult<ExprId> {
        let start = self.cursor.current_span();
        let test = self.parse_binary(0)?;
        if !self.cursor.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;
        Ok(self.alloc_expr(
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            },
            start,
        ))
    }

    fn infix_op(&self) -> Option<InfixOp> {
        let op = match self.cursor.current_kind() {
            TokenKind::AmpAmp => return Some(InfixOp::Logical(LogicalOp::And)),
            TokenKind::PipePipe => return Some(InfixOp::Logical(LogicalOp::Or)),
            TokenKind::DoubleQuestion => return Some(InfixOp::Logical(LogicalOp::Coalesce)),
            TokenKind::StarStar => BinaryOp::Pow,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::Ge,
            TokenKind::EqEq => BinaryOp::LooseEq,
            TokenKind::NotEq => BinaryOp::LooseNe,
            TokenKind::EqEqEq => BinaryOp::StrictEq,
            TokenKind::NotEqEq => BinaryOp::StrictNe,
            _ => return None,
        };
        Some(InfixOp::Binary(op))
    }

    /// Precedence climbing: parse operators binding at least `min_prec`.
    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<ExprId> {
        let start = self.cursor.current_span();
        let mut left = self.parse_unary()?;

        while let Some(op) = self.infix_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.cursor.advance();
            let next_min = if op.is_right_assoc() { prec } else { prec + 1 };
            let right = ensure_sufficient_stack(|| self.parse_binary(next_min))?;
            let kind = match op {
                InfixOp::Binary(op) => ExprKind::Binary { op, left, right },
                InfixOp::Logical(op) => ExprKind::Logical { op, left, right },
            };
            left = self.alloc_expr(kind, start);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<ExprId> {
        let start = self.cursor.current_span();
        let op = match self.cursor.current_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Typeof => UnaryOp::Typeof,
            TokenKind::Await => {
                if !self.in_async() {
                    return Err(await_outside_async(start));
                }
                self.cursor.advance();
                let operand = ensure_sufficient_stack(|| self.parse_unary())?;
                return Ok(self.alloc_expr(ExprKind::Await(operand), start));
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if matches!(self.cursor.advance().kind, TokenKind::PlusPlus) {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                let target = ensure_sufficient_stack(|| self.parse_unary())?;
                if !self.is_assignable(target) {
                    return Err(invalid_assignment_target(self.arena.expr(target).span));
                }
                return Ok(self.alloc_expr(
                    ExprKind::Update {
                        op,
                        prefix: true,
                        target,
                    },
                    start,
                ));
            }
            _ => return self.parse_postfix(),
        };
        self.cursor.advance();
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        Ok(self.alloc_expr(ExprKind::Unary { op, operand }, start))
    }

    /// Postfix `++`/`--`, which may not follow a line break.
    fn parse_postfix(&mut self) -> ParseResult<ExprId> {
        let start = self.cursor.current_span();
        let target = self.parse_call_member()?;
        let op = match self.cursor.current_kind() {
            TokenKind::PlusPlus if !self.cursor.newline_before() => UpdateOp::Increment,
            TokenKind::MinusMinus if !self.cursor.newline_before() => UpdateOp::Decrement,
            _ => return Ok(target),
        };
        if !self.is_assignable(target) {
            return Err(invalid_assignment_target(self.arena.expr(target).span));
        }
        self.cursor.advance();
        Ok(self.alloc_expr(
            ExprKind::Update {
                op,
                prefix: false,
                target,
            },
            start,
        ))
    }

    /// Calls, member access, indexing, and `new`.
    fn parse_call_member(&mut self) -> ParseResult<ExprId> {
        let start = self.cursor.current_span();
        let mut expr = if self.cursor.eat(&TokenKind::New) {
            let callee = self.parse_member_chain()?;
            let args = if self.cursor.check(&TokenKind::LParen) {
                self.parse_args()?
            } else {
                Vec::new()
            };
            self.alloc_expr(ExprKind::New { callee, args }, start)
        } else {
            self.parse_primary()?
        };

        loop {
            if self.cursor.check(&TokenKind::LParen) {
                let args = self.parse_args()?;
                expr = self.alloc_expr(ExprKind::Call { callee: expr, args }, start);
            } else if let Some(next) = self.parse_member_suffix(expr, start)? {
                expr = next;
            } else {
                return Ok(expr);
            }
        }
    }

    /// Callee of `new`: a primary with member and index suffixes, no calls.
    fn parse_member_chain(&mut self) -> ParseResult<ExprId> {
        let start = self.cursor.current_span();
        let mut expr = self.parse_primary()?;
        while let Some(next) = self.parse_member_suffix(expr, start)? {
            expr = next;
        }
        Ok(expr)
    }

    fn parse_member_suffix(&mut self, object: ExprId, start: Span) -> ParseResult<Option<ExprId>> {
        if self.cursor.eat(&TokenKind::Dot) {
            let property = self.parse_property_name()?;
            return Ok(Some(self.alloc_expr(ExprKind::Member { object, property }, start)));
        }
        if self.cursor.check(&TokenKind::LBracket) {
            let open = self.cursor.advance().span;
            let index = self.parse_expr()?;
            self.expect_close(&TokenKind::RBracket, open, '[')?;
            return Ok(Some(self.alloc_expr(ExprKind::Index { object, index }, start)));
        }
        Ok(None)
    }

    /// Identifier or keyword after `.`.
    fn parse_property_name(&mut self) -> ParseResult<Arc<str>> {
        if let Some(text) = self.cursor.current_kind().keyword_text() {
            self.cursor.advance();
            return Ok(Arc::from(text));
        }
        self.expect_ident().map(|(name, _)| name)
    }

    fn parse_args(&mut self) -> ParseResult<Vec<ExprId>> {
        let open = self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) && !self.cursor.is_at_end() {
            args.push(self.parse_assignment()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_close(&TokenKind::RParen, open, '(')?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> ParseResult<ExprId> {
        let start = self.cursor.current_span();
        let kind = match self.cursor.current_kind().clone() {
            TokenKind::Number(n) => ExprKind::Number(n),
            TokenKind::Str(s) => ExprKind::Str(s),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Undefined => ExprKind::Undefined,
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::LParen => {
                let open = self.cursor.advance().span;
                let inner = self.parse_expr()?;
                self.expect_close(&TokenKind::RParen, open, '(')?;
                return Ok(inner);
            }
            TokenKind::LBracket => return self.parse_array(),
            TokenKind::LBrace => return self.parse_object(),
            TokenKind::Function => {
                self.cursor.advance();
                return self.parse_function_expr(false, start);
            }
            TokenKind::Async if matches!(self.cursor.peek_kind(1), TokenKind::Function) => {
                self.cursor.advance();
                self.cursor.advance();
                return self.parse_function_expr(true, start);
            }
            other => return Err(expected_expression(start, other.display_name())),
        };
        self.cursor.advance();
        Ok(self.alloc_expr(kind, start))
    }

    /// `function name?(params) { body }` after the `function` keyword.
    fn parse_function_expr(&mut self, is_async: bool, start: Span) -> ParseResult<ExprId> {
        let name = match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                let name = Arc::clone(name);
                self.cursor.advance();
                Some(name)
            }
            _ => None,
        };
        let function = self.parse_function_rest(name, is_async, start)?;
        Ok(self.alloc_expr(ExprKind::Function(function), start))
    }

    fn parse_array(&mut self) -> ParseResult<ExprId> {
        let open = self.cursor.advance().span;
        let mut elements = Vec::new();
        while !self.cursor.check(&TokenKind::RBracket) && !self.cursor.is_at_end() {
            elements.push(self.parse_assignment()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_close(&TokenKind::RBracket, open, '[')?;
        Ok(self.alloc_expr(ExprKind::Array(elements), open))
    }

    /// `{ key: value, shorthand, method() {} }`.
    fn parse_object(&mut self) -> ParseResult<ExprId> {
        let open = self.cursor.advance().span;
        let mut properties = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) && !self.cursor.is_at_end() {
            properties.push(self.parse_property()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_close(&TokenKind::RBrace, open, '{')?;
        Ok(self.alloc_expr(ExprKind::Object(properties), open))
    }

    fn parse_property(&mut self) -> ParseResult<Property> {
        let start = self.cursor.current_span();
        let current = self.cursor.current_kind().clone();
        let key: Arc<str> = match &current {
            TokenKind::Ident(name) | TokenKind::Str(name) => Arc::clone(name),
            TokenKind::Number(n) => Arc::from(number_key(*n)),
            other => match other.keyword_text() {
                Some(text) => Arc::from(text),
                None => return Err(self.unexpected("property name")),
            },
        };
        self.cursor.advance();

        let value = match self.cursor.current_kind() {
            TokenKind::Colon => {
                self.cursor.advance();
                self.parse_assignment()?
            }
            TokenKind::LParen => {
                let function = self.parse_function_rest(Some(Arc::clone(&key)), false, start)?;
                self.alloc_expr(ExprKind::Function(function), start)
            }
            TokenKind::Comma | TokenKind::RBrace if matches!(current, TokenKind::Ident(_)) => {
                self.alloc_expr(ExprKind::Ident(Arc::clone(&key)), start)
            }
            _ => return Err(self.unexpected("`:`")),
        };

        Ok(Property {
            key,
            value,
            span: start.merge(self.cursor.previous_span()),
        })
    }
}

/// Object keys written as numbers use their canonical string form.
fn number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests;
