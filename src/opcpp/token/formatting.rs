//! Token-to-text rendering.
//!
//! Detokenization is deliberately lossy about whitespace: the scanner skips
//! it, so the best we can do is a canonical single-space join with a few
//! punctuation rules. Downstream printers that need byte-faithful output
//! work from the original source, not from here.

use super::core::{Kind, Token};

/// Render a token sequence back to approximate source text.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        if token.kind == Kind::EndOfInput {
            continue;
        }
        if needs_space_before(token.kind) && !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&token.text);
    }
    out
}

fn needs_space_before(kind: Kind) -> bool {
    !matches!(
        kind,
        Kind::Semicolon
            | Kind::Comma
            | Kind::CloseParen
            | Kind::CloseBracket
            | Kind::ScopeSep
            | Kind::Greater
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: Kind, text: &str) -> Token {
        Token::new(kind, text, 1)
    }

    #[test]
    fn test_detokenize_joins_with_spaces() {
        let tokens = vec![
            tok(Kind::KwStatic, "static"),
            tok(Kind::Identifier, "int"),
            tok(Kind::Identifier, "counter"),
            tok(Kind::Semicolon, ";"),
        ];
        assert_eq!(detokenize(&tokens), "static int counter;");
    }

    #[test]
    fn test_detokenize_skips_sentinel() {
        let tokens = vec![tok(Kind::Identifier, "x"), Token::end_of_input(1)];
        assert_eq!(detokenize(&tokens), "x");
    }
}
