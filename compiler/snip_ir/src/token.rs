//! Token types produced by the lexer.

use std::fmt;
use std::sync::Arc;

use crate::Span;

/// A token with its span in the source and whitespace flags.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            span,
            flags: TokenFlags::EMPTY,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds for Snip.
///
/// `of` is not a keyword: the parser recognizes it contextually inside
/// `for (... of ...)` so scripts may still use it as a variable name.
#[derive(Clone, PartialEq, Debug)]
pub enum TokenKind {
    /// Numeric literal: 42, 3.5, 1e3, 0xff
    Number(f64),
    /// String literal with escapes already processed.
    Str(Arc<str>),
    Ident(Arc<str>),

    Async,
    Await,
    Break,
    Catch,
    Const,
    Continue,
    Else,
    False,
    Finally,
    For,
    Function,
    If,
    In,
    Let,
    New,
    Null,
    Return,
    Throw,
    True,
    Try,
    Typeof,
    Undefined,
    Var,
    While,

    LParen,         // (
    RParen,         // )
    LBrace,         // {
    RBrace,         // }
    LBracket,       // [
    RBracket,       // ]
    Comma,          // ,
    Semicolon,      // ;
    Colon,          // :
    Dot,            // .
    Question,       // ?
    DoubleQuestion, // ??
    FatArrow,       // =>

    Eq,             // =
    PlusEq,         // +=
    MinusEq,        // -=
    StarEq,         // *=
    SlashEq,        // /=
    PercentEq,      // %=
    EqEq,           // ==
    NotEq,          // !=
    EqEqEq,         // ===
    NotEqEq,        // !==
    Lt,             // <
    LtEq,           // <=
    Gt,             // >
    GtEq,           // >=
    Plus,           // +
    Minus,          // -
    Star,           // *
    StarStar,       // **
    Slash,          // /
    Percent,        // %
    Bang,           // !
    AmpAmp,         // &&
    PipePipe,       // ||
    PlusPlus,       // ++
    MinusMinus,     // --

    Eof,

    /// Unrecognized input; the lexer also records a diagnostic for it.
    Error,
}

impl TokenKind {
    /// Human-readable name used in parser diagnostics.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::Str(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Async => "async",
            TokenKind::Await => "await",
            TokenKind::Break => "break",
            TokenKind::Catch => "catch",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Else => "else",
            TokenKind::False => "false",
            TokenKind::Finally => "finally",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::In => "in",
            TokenKind::Let => "let",
            TokenKind::New => "new",
            TokenKind::Null => "null",
            TokenKind::Return => "return",
            TokenKind::Throw => "throw",
            TokenKind::True => "true",
            TokenKind::Try => "try",
            TokenKind::Typeof => "typeof",
            TokenKind::Undefined => "undefined",
            TokenKind::Var => "var",
            TokenKind::While => "while",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Question => "?",
            TokenKind::DoubleQuestion => "??",
            TokenKind::FatArrow => "=>",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::EqEqEq => "===",
            TokenKind::NotEqEq => "!==",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Eof => "end of input",
            TokenKind::Error => "invalid token",
        }
    }

    /// Keywords that may still appear after `.` as a property name.
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            TokenKind::Async
            | TokenKind::Await
            | TokenKind::Break
            | TokenKind::Catch
            | TokenKind::Const
            | TokenKind::Continue
            | TokenKind::Else
            | TokenKind::False
            | TokenKind::Finally
            | TokenKind::For
            | TokenKind::Function
            | TokenKind::If
            | TokenKind::In
            | TokenKind::Let
            | TokenKind::New
            | TokenKind::Null
            | TokenKind::Return
            | TokenKind::Throw
            | TokenKind::True
            | TokenKind::Try
            | TokenKind::Typeof
            | TokenKind::Undefined
            | TokenKind::Var
            | TokenKind::While => Some(self.display_name()),
            _ => None,
        }
    }

    /// Check for a specific identifier, e.g. the contextual `of`.
    pub fn is_ident(&self, text: &str) -> bool {
        matches!(self, TokenKind::Ident(name) if &**name == text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::Str(s) => write!(f, "{s:?}"),
            TokenKind::Ident(name) => write!(f, "{name}"),
            other => f.write_str(other.display_name()),
        }
    }
}

/// Per-token whitespace flags.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TokenFlags(u8);

impl TokenFlags {
    /// Whitespace preceded this token.
    pub const SPACE_BEFORE: u8 = 1 << 0;
    /// A newline preceded this token. Drives automatic semicolon insertion.
    pub const NEWLINE_BEFORE: u8 = 1 << 1;
    /// A comment preceded this token.
    pub const TRIVIA_BEFORE: u8 = 1 << 2;

    pub const EMPTY: Self = TokenFlags(0);

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        TokenFlags(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    #[inline]
    pub const fn has_newline_before(self) -> bool {
        self.contains(Self::NEWLINE_BEFORE)
    }
}

/// Lexer output. Always terminated by a single [`TokenKind::Eof`] token.
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    pub tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }
}
