//! Lexer for Snip scripts.
//!
//! Turns source text into a [`TokenList`] terminated by `Eof`. Comments and
//! newlines are not emitted as tokens; they are folded into the
//! [`TokenFlags`] of the following token so the parser can apply automatic
//! semicolon insertion.
//!
//! Lexing never fails outright: malformed input produces an
//! [`TokenKind::Error`] token plus a diagnostic, and the parser refuses to
//! build a function from a token list that carries lexer diagnostics.

mod cook;
mod raw_token;

use logos::Logos;
use snip_diagnostic::{Diagnostic, ErrorCode};
use snip_ir::{Span, Token, TokenFlags, TokenKind, TokenList};

use raw_token::RawToken;

/// Tokens plus any lexer diagnostics.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub diagnostics: Vec<Diagnostic>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Lex all tokens from `source`.
pub fn lex(source: &str) -> LexOutput {
    let mut output = LexOutput::default();
    let mut logos = RawToken::lexer(source);
    let mut pending = TokenFlags::EMPTY;

    while let Some(result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();

        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                output.diagnostics.push(invalid_input(span, slice));
                push(&mut output.tokens, TokenKind::Error, span, &mut pending);
                continue;
            }
        };

        match raw {
            RawToken::Newline => pending.set(TokenFlags::NEWLINE_BEFORE),
            RawToken::LineComment => pending.set(TokenFlags::TRIVIA_BEFORE),
            RawToken::BlockComment => {
                pending.set(TokenFlags::TRIVIA_BEFORE);
                if slice.contains('\n') {
                    pending.set(TokenFlags::NEWLINE_BEFORE);
                }
            }
            RawToken::UnterminatedBlockComment => {
                output.diagnostics.push(
                    Diagnostic::error(ErrorCode::E0004)
                        .with_message("unterminated block comment")
                        .with_label(Span::new(span.start, span.start + 2), "comment starts here")
                        .with_suggestion("add `*/` to close the comment"),
                );
                push(&mut output.tokens, TokenKind::Error, span, &mut pending);
            }
            RawToken::UnterminatedString => {
                output.diagnostics.push(
                    Diagnostic::error(ErrorCode::E0001)
                        .with_message("unterminated string literal")
                        .with_label(span, "string is never closed"),
                );
                push(&mut output.tokens, TokenKind::Error, span, &mut pending);
            }
            raw => {
                let kind = cook::convert(raw, slice);
                push(&mut output.tokens, kind, span, &mut pending);
            }
        }
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    push(&mut output.tokens, TokenKind::Eof, Span::point(end), &mut pending);
    output
}

fn push(tokens: &mut TokenList, kind: TokenKind, span: Span, pending: &mut TokenFlags) {
    tokens.push(Token::new(kind, span).with_flags(std::mem::take(pending)));
}

fn invalid_input(span: Span, slice: &str) -> Diagnostic {
    let looks_numeric = slice.chars().next().is_some_and(|c| c.is_ascii_digit());
    if looks_numeric {
        Diagnostic::error(ErrorCode::E0003)
            .with_message(format!("invalid number literal `{slice}`"))
            .with_label(span, "not a valid number")
    } else {
        Diagnostic::error(ErrorCode::E0002)
            .with_message(format!("invalid character `{}`", slice.escape_debug()))
            .with_label(span, "unexpected character")
    }
}
