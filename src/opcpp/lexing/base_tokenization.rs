//! Core tokenization using the logos scanner.
//!
//! The scanner is a vanilla logos lexer over the opC++ surface: identifiers,
//! keywords, literals, comments, and punctuation. Whitespace is skipped
//! outright; line numbers are recovered afterwards from byte offsets, so no
//! custom lexer state is needed.
//!
//! Punctuation the grammars never disambiguate on (arithmetic operators,
//! arrows, shifts, ...) is folded into a single `Punct` kind. Multi-char
//! C++ operators are matched as units so that, e.g., `a == b` does not scan
//! as two assignment tokens and `a << b` does not fake a template opener.

use logos::Logos;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::LexError;
use crate::opcpp::token::{Kind, Token};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    Comment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    #[regex(r"[0-9]+")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Int,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r"'([^'\\\n]|\\.)+'")]
    Char,

    #[token("::")]
    ScopeSep,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("=")]
    Assign,
    #[token("*")]
    Star,
    #[token("&")]
    Amp,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,

    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("->")]
    #[token("++")]
    #[token("--")]
    #[token("+=")]
    #[token("-=")]
    #[token("&&")]
    #[token("||")]
    #[token("<<")]
    #[token(">>")]
    #[regex(r#"[!#$%+./?@^~|\\-]"#)]
    Punct,
}

/// opC++ extension keywords plus the C++ modifier keywords the member
/// grammars disambiguate on. Everything else scans as a plain identifier.
static KEYWORDS: Lazy<HashMap<&'static str, Kind>> = Lazy::new(|| {
    HashMap::from([
        ("object", Kind::KwObject),
        ("enum", Kind::KwEnum),
        ("dialect", Kind::KwDialect),
        ("note", Kind::KwNote),
        ("map", Kind::KwMap),
        ("category", Kind::KwCategory),
        ("data", Kind::KwData),
        ("function", Kind::KwFunction),
        ("location", Kind::KwLocation),
        ("static", Kind::KwStatic),
        ("virtual", Kind::KwVirtual),
        ("const", Kind::KwConst),
        ("mutable", Kind::KwMutable),
        ("inline", Kind::KwInline),
    ])
});

/// Scan source text into a flat token stream.
///
/// Comments are kept (the standard [lex](super::lex) front drops them);
/// the end-of-input sentinel is not appended here.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let line_starts = line_starts(source);
    let mut tokens = Vec::new();

    for (raw, span) in RawToken::lexer(source).spanned() {
        let text = &source[span.clone()];
        let line = line_of(&line_starts, span.start);
        let raw = raw.map_err(|_| LexError::UnrecognizedText {
            text: text.to_string(),
            line,
        })?;

        let kind = match raw {
            RawToken::Comment => Kind::Comment,
            RawToken::Word => KEYWORDS.get(text).copied().unwrap_or(Kind::Identifier),
            RawToken::Int => Kind::IntLiteral,
            RawToken::Str => Kind::StringLiteral,
            RawToken::Char => Kind::CharLiteral,
            RawToken::ScopeSep => Kind::ScopeSep,
            RawToken::Semicolon => Kind::Semicolon,
            RawToken::Colon => Kind::Colon,
            RawToken::Comma => Kind::Comma,
            RawToken::Assign => Kind::Assign,
            RawToken::Star => Kind::Star,
            RawToken::Amp => Kind::Amp,
            RawToken::Less => Kind::Less,
            RawToken::Greater => Kind::Greater,
            RawToken::OpenBrace => Kind::OpenBrace,
            RawToken::CloseBrace => Kind::CloseBrace,
            RawToken::OpenParen => Kind::OpenParen,
            RawToken::CloseParen => Kind::CloseParen,
            RawToken::OpenBracket => Kind::OpenBracket,
            RawToken::CloseBracket => Kind::CloseBracket,
            RawToken::Punct => Kind::Punct,
        };

        tokens.push(Token::new(kind, text, line));
    }

    Ok(tokens)
}

/// Byte offsets at which each line starts, for offset-to-line recovery.
fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (offset, byte) in source.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(offset + 1);
        }
    }
    starts
}

/// 1-based line number of a byte offset.
fn line_of(line_starts: &[usize], offset: usize) -> usize {
    match line_starts.binary_search(&offset) {
        Ok(index) => index + 1,
        Err(index) => index,
    }
}
