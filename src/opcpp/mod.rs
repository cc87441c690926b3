//! The opC++ structural parser.
//!
//! Module layout, leaves first:
//!
//!   - [token] - token kinds and the scanned token type
//!   - [lexing] - logos-based scanner producing flat token streams
//!   - [node] - the universal tree node, ownership model, and the
//!     movement/rewrite primitives every recognizer pass is built from
//!   - [diagnostics] - recoverable/fatal parse failures and the buffered
//!     diagnostic log
//!   - [context] - per-file parse context (context stack, diagnostics,
//!     dialect registry)
//!   - [grammar] - the pass-composition machinery, the statement
//!     disambiguation loop, and the concrete opC++ grammars
//!   - [pipeline] - the phased parse pipeline and file-level driver
//!   - [testing] - tree assertion helpers for tests

pub mod context;
pub mod diagnostics;
pub mod grammar;
pub mod lexing;
pub mod node;
pub mod pipeline;
pub mod testing;
pub mod token;
