//! Per-file parse context.
//!
//! Everything the original design kept in process-wide singletons (the
//! dialect registry, the error log) is threaded through this one context
//! object instead, with lifetime scoped to a single file parse.

use std::collections::HashMap;
use std::sync::Arc;

use crate::opcpp::diagnostics::{Diagnostics, FailureKind, ParseFailure, Severity};

/// Context threaded into every pass and primitive.
///
/// Carries the owning file name, the grammar context stack (for error
/// messages), the buffered diagnostics, and the dialect registry.
#[derive(Debug)]
pub struct ParseContext {
    file: Arc<str>,
    context: Vec<&'static str>,
    pub diagnostics: Diagnostics,
    pub registry: DialectRegistry,
}

impl ParseContext {
    pub fn new(file: &str) -> Self {
        Self {
            file: Arc::from(file),
            context: Vec::new(),
            diagnostics: Diagnostics::new(),
            registry: DialectRegistry::new(),
        }
    }

    pub fn file(&self) -> &Arc<str> {
        &self.file
    }

    /// Enter a grammar context. Every failure created while the context is
    /// on the stack names it, innermost first.
    pub fn push_context(&mut self, name: &'static str) {
        self.context.push(name);
    }

    pub fn pop_context(&mut self) {
        self.context.pop();
    }

    /// Build a recoverable failure at `line`, snapshotting the current
    /// context stack.
    pub fn failure(&self, kind: FailureKind, line: usize) -> ParseFailure {
        ParseFailure {
            kind,
            severity: Severity::Recoverable,
            file: self.file.to_string(),
            line,
            context: self.context.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Record a recoverable failure in the diagnostic buffer.
    pub fn record(&mut self, failure: ParseFailure) {
        debug_assert!(!failure.is_fatal(), "fatal failures must unwind, not buffer");
        self.diagnostics.push(failure);
    }

    /// Dissolve the context into its run products.
    pub fn finish(self) -> (Diagnostics, DialectRegistry) {
        (self.diagnostics, self.registry)
    }
}

/// What one `dialect` declaration contributes.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DialectEntry {
    pub line: usize,
    pub notes: Vec<String>,
    pub maps: Vec<String>,
    pub categories: Vec<String>,
}

/// Registry of dialects declared during one run.
///
/// Filled by the dialect grammar's post-parse; consumed by downstream
/// semantic validation and code generation.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DialectRegistry {
    dialects: HashMap<String, DialectEntry>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dialect. Returns false if the name was already taken
    /// (the caller reports the duplicate; the first entry wins).
    pub fn register(&mut self, name: &str, entry: DialectEntry) -> bool {
        if self.dialects.contains_key(name) {
            return false;
        }
        self.dialects.insert(name.to_string(), entry);
        true
    }

    pub fn get(&self, name: &str) -> Option<&DialectEntry> {
        self.dialects.get(name)
    }

    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }
}
