//! Scanning support for the opC++ surface.
//!
//!     The structural parser itself only consumes a flat `Vec<Token>`; this
//!     module is the thin front that produces one from source text so the
//!     pipeline, the CLI, and the tests can start from a file.
//!
//!     Scanning stages:
//!
//!         1. Core tokenization with the logos scanner. Whitespace is
//!            skipped; line numbers are recovered from byte offsets.
//!            See [base_tokenization].
//!         2. Comment filtering. Comments are scanned (tools may want
//!            them) but dropped before parsing so the grammars never have
//!            to step around filler mid-statement.
//!         3. Sentinel append. The stream always ends with an explicit
//!            end-of-input token so premature-end detection never has to
//!            special-case an empty remainder.

pub mod base_tokenization;

use std::fmt;

use crate::opcpp::token::{Kind, Token};

/// Errors that can occur during scanning.
///
/// Scan errors are the one condition the parser treats as fatal for the
/// whole file: there is no statement boundary to recover at before a tree
/// exists.
#[derive(Debug, Clone)]
pub enum LexError {
    /// A span of text matched no token rule (e.g. an unterminated string).
    UnrecognizedText { text: String, line: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnrecognizedText { text, line } => {
                write!(f, "unrecognized text {:?} on line {}", text, line)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Scan source text into the token stream the parser consumes.
///
/// Comments are dropped and the end-of-input sentinel is appended.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = base_tokenization::tokenize(source)?;
    tokens.retain(|token| token.kind != Kind::Comment);
    let last_line = tokens.last().map(|t| t.line).unwrap_or(1);
    tokens.push(Token::end_of_input(last_line));
    Ok(tokens)
}
