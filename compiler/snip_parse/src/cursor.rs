//! Token cursor for navigating the token stream.

use snip_ir::{Span, Token, TokenKind, TokenList};

/// Cursor over a lexed token list.
///
/// The lexer always terminates the list with `Eof`; the cursor never moves
/// past it, so `current()` is always valid.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    eof: Token,
    pos: usize,
    /// For each opening delimiter, the index of the token closing it.
    closers: Vec<Option<usize>>,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        let end = tokens.iter().last().map_or(Span::DUMMY, |t| t.span);
        Cursor {
            tokens,
            eof: Token::new(TokenKind::Eof, end),
            pos: 0,
            closers: match_delimiters(tokens),
        }
    }

    #[inline]
    pub fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    #[inline]
    pub fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span,
            None => Span::DUMMY,
        }
    }

    /// Look `n` tokens ahead of the current one (`peek(0)` is `current`).
    pub fn peek(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    #[inline]
    pub fn peek_kind(&self, n: usize) -> &TokenKind {
        &self.peek(n).kind
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check the current token's kind, ignoring literal payloads.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    /// Whether a line break separates the current token from the previous one.
    #[inline]
    pub fn newline_before(&self) -> bool {
        self.current().flags.has_newline_before()
    }

    /// Consume the current token. Stays on `Eof` once reached.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Find the offset (relative to current) of the token closing the
    /// delimiter `from` tokens ahead, if balanced before `Eof`.
    pub fn matching_close(&self, from: usize) -> Option<usize> {
        let open = self.pos + from;
        let close = self.closers.get(open).copied().flatten()?;
        Some(close - self.pos)
    }
}

/// Pair every opening `(`, `[` or `{` with the token that closes it.
///
/// Any closing delimiter closes the innermost open one; the parser reports
/// mismatched kinds when it gets there.
fn match_delimiters(tokens: &TokenList) -> Vec<Option<usize>> {
    let mut closers = vec![None; tokens.len()];
    let mut open = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => open.push(index),
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                if let Some(opener) = open.pop() {
                    closers[opener] = Some(index);
                }
            }
            _ => {}
        }
    }
    closers
}
