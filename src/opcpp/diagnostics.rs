//! Parse failures and the buffered diagnostic log.
//!
//!     Failure control flow in this parser is ordinary `Result` plumbing:
//!     every primitive and every recognizer pass returns
//!     `Result<_, ParseFailure>`. Recoverable failures unwind only as far
//!     as the nearest enclosing statement loop, which records them in the
//!     context's diagnostic buffer, discards the malformed span, and keeps
//!     scanning. Fatal failures unwind to the file driver and abort the
//!     file. Contract violations inside the engine itself (extracting from
//!     an empty child list, seeking past the end) are panics, never
//!     diagnostics.
//!
//!     Diagnostics are buffered, not printed: parsing never touches a
//!     device, and one run reports every independent error in a file.

use std::fmt;

use crate::opcpp::token::Kind;

/// What went wrong, structurally.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FailureKind {
    /// The cursor's node (or, reversed, the node before it) matched no
    /// wanted kind.
    Expect { wanted: Vec<Kind>, found: String },
    /// A non-consuming lookahead matched nothing.
    CheckNone { wanted: Vec<Kind>, found: String },
    /// Input ended while a primitive still expected more.
    Premature { wanted: Vec<Kind> },
    /// Structurally complete but forbidden content remained.
    Disallow { offending: String },
    /// Two incompatible kinds were both present; `first` is the one that
    /// appears earlier in source order.
    MutualExclusion { first: Kind, second: Kind },
    /// The scanner could not produce a token stream.
    Scan { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    /// Caught at the nearest enclosing statement boundary.
    Recoverable,
    /// Aborts the whole file.
    Fatal,
}

/// One parse failure with its source location and the grammar context
/// stack captured at the failure site (innermost last).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseFailure {
    pub kind: FailureKind,
    pub severity: Severity,
    pub file: String,
    pub line: usize,
    pub context: Vec<String>,
}

impl ParseFailure {
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }

    pub fn into_fatal(mut self) -> Self {
        self.severity = Severity::Fatal;
        self
    }
}

fn write_wanted(f: &mut fmt::Formatter<'_>, wanted: &[Kind]) -> fmt::Result {
    match wanted {
        [] => write!(f, "nothing"),
        [one] => write!(f, "{}", one),
        [head @ .., last] => {
            for kind in head {
                write!(f, "{}, ", kind)?;
            }
            write!(f, "or {}", last)
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: ", self.file, self.line)?;
        match &self.kind {
            FailureKind::Expect { wanted, found } => {
                write!(f, "expected ")?;
                write_wanted(f, wanted)?;
                write!(f, ", found {}", found)?;
            }
            FailureKind::CheckNone { wanted, found } => {
                write!(f, "lookahead expected ")?;
                write_wanted(f, wanted)?;
                write!(f, ", found {}", found)?;
            }
            FailureKind::Premature { wanted } => {
                write!(f, "input ended while expecting ")?;
                write_wanted(f, wanted)?;
            }
            FailureKind::Disallow { offending } => {
                write!(f, "{} is not allowed here", offending)?;
            }
            FailureKind::MutualExclusion { first, second } => {
                write!(f, "{} cannot be combined with {}", first, second)?;
            }
            FailureKind::Scan { message } => {
                write!(f, "scan error: {}", message)?;
            }
        }
        if let Some(innermost) = self.context.last() {
            write!(f, " (in {}", innermost)?;
            for outer in self.context.iter().rev().skip(1) {
                write!(f, ", in {}", outer)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseFailure {}

/// Result type threaded through every primitive and pass.
pub type ParseResult<T> = Result<T, ParseFailure>;

/// The buffered diagnostic log for one file.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Diagnostics {
    entries: Vec<ParseFailure>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: ParseFailure) {
        self.entries.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ParseFailure] {
        &self.entries
    }

    /// One line per diagnostic, in the order they were recorded.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }
}
