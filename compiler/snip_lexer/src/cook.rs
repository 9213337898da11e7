//! Conversion from raw logos tokens to cooked [`TokenKind`]s.

use std::sync::Arc;

use snip_ir::TokenKind;

use crate::raw_token::RawToken;

pub(crate) fn convert(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Number(n) | RawToken::HexNumber(n) => TokenKind::Number(n),
        RawToken::String => {
            let content = slice.get(1..slice.len().saturating_sub(1)).unwrap_or("");
            TokenKind::Str(Arc::from(unescape(content)))
        }
        RawToken::Ident => TokenKind::Ident(Arc::from(slice)),

        RawToken::Async => TokenKind::Async,
        RawToken::Await => TokenKind::Await,
        RawToken::Break => TokenKind::Break,
        RawToken::Catch => TokenKind::Catch,
        RawToken::Const => TokenKind::Const,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Else => TokenKind::Else,
        RawToken::False => TokenKind::False,
        RawToken::Finally => TokenKind::Finally,
        RawToken::For => TokenKind::For,
        RawToken::Function => TokenKind::Function,
        RawToken::If => TokenKind::If,
        RawToken::In => TokenKind::In,
        RawToken::Let => TokenKind::Let,
        RawToken::New => TokenKind::New,
        RawToken::Null => TokenKind::Null,
        RawToken::Return => TokenKind::Return,
        RawToken::Throw => TokenKind::Throw,
        RawToken::True => TokenKind::True,
        RawToken::Try => TokenKind::Try,
        RawToken::Typeof => TokenKind::Typeof,
        RawToken::Undefined => TokenKind::Undefined,
        RawToken::Var => TokenKind::Var,
        RawToken::While => TokenKind::While,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Question => TokenKind::Question,
        RawToken::DoubleQuestion => TokenKind::DoubleQuestion,
        RawToken::FatArrow => TokenKind::FatArrow,

        RawToken::Eq => TokenKind::Eq,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::NotEqEq => TokenKind::NotEqEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::StarStar => TokenKind::StarStar,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,

        // Trivia and malformed literals are handled by the caller.
        RawToken::LineComment
        | RawToken::BlockComment
        | RawToken::UnterminatedBlockComment
        | RawToken::Newline
        | RawToken::UnterminatedString => TokenKind::Error,
    }
}

/// Process string escape sequences.
///
/// Unknown escapes yield the escaped character itself, so `"\q"` is `"q"`.
pub(crate) fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some('v') => result.push('\u{b}'),
            Some('0') => result.push('\0'),
            Some('x') => push_code_point(&mut result, &mut chars, 2, 'x'),
            Some('u') => push_code_point(&mut result, &mut chars, 4, 'u'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

fn push_code_point(out: &mut String, chars: &mut std::str::Chars<'_>, digits: usize, marker: char) {
    let hex: String = chars.clone().take(digits).collect();
    let decoded = (hex.len() == digits)
        .then(|| u32::from_str_radix(&hex, 16).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(c) => {
            out.push(c);
            for _ in 0..digits {
                chars.next();
            }
        }
        None => out.push(marker),
    }
}
