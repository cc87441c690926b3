//! Core token types shared across the scanner, parser, and tooling.

pub mod core;
pub mod formatting;

pub use self::core::{Kind, Token};
pub use formatting::detokenize;
