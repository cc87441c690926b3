//! The file parse driver.
//!
//!     Parsing one file is three phases over the whole tree:
//!
//!         pre-parse   depth-first setup hooks (sentinel insertion, ...)
//!         parse       each node's recognizer passes, then its children
//!         post-parse  validation over the fully reduced subtree
//!
//!     A node's parse runs before its children's because the passes are
//!     what create the children worth descending into: the file pass
//!     sequence reduces a flat token run to declaration composites, whose
//!     body grammars then reduce their own interiors, and so on down.
//!
//!     Recovery boundaries live in the grammar dispatch: when a child
//!     subtree fails recoverably under a grammar that recovers, the child
//!     is marked failed, the failure is buffered, and the driver moves to
//!     the next child. Fatal failures unwind all the way out of `run`.

use crate::opcpp::context::{DialectRegistry, ParseContext};
use crate::opcpp::diagnostics::{
    Diagnostics, FailureKind, ParseFailure, ParseResult, Severity,
};
use crate::opcpp::grammar::grammar_for;
use crate::opcpp::lexing::{self, LexError};
use crate::opcpp::node::{Node, ParseState};
use crate::opcpp::token::Token;

/// Everything one file parse produces.
#[derive(Debug)]
pub struct ParseOutput {
    /// The reduced tree. Present even when diagnostics were recorded;
    /// malformed spans are simply absent from it.
    pub root: Node,
    /// Recoverable failures, in source order of discovery.
    pub diagnostics: Diagnostics,
    /// Dialects declared by the file.
    pub registry: DialectRegistry,
}

/// The reusable file parse driver.
#[derive(Debug, Default)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    /// Scan and parse one file's source text.
    pub fn run(&self, source: &str, file: &str) -> Result<ParseOutput, ParseFailure> {
        let tokens = lexing::lex(source).map_err(|error| scan_failure(error, file))?;
        self.run_tokens(tokens, file)
    }

    /// Parse an already-scanned token stream.
    pub fn run_tokens(&self, tokens: Vec<Token>, file: &str) -> Result<ParseOutput, ParseFailure> {
        let mut ctx = ParseContext::new(file);
        let mut root = Node::source_file(tokens, ctx.file());

        pre_parse_tree(&mut root, &mut ctx)?;
        if let Err(failure) = parse_subtree(&mut root, &mut ctx) {
            if failure.is_fatal() {
                return Err(failure);
            }
            // The root is its own last-resort recovery boundary.
            root.set_state(ParseState::Failed);
            ctx.record(failure);
        }

        let (diagnostics, registry) = ctx.finish();
        Ok(ParseOutput {
            root,
            diagnostics,
            registry,
        })
    }
}

/// One-call convenience over [Pipeline::run].
pub fn parse_source(source: &str, file: &str) -> Result<ParseOutput, ParseFailure> {
    Pipeline::new().run(source, file)
}

fn scan_failure(error: LexError, file: &str) -> ParseFailure {
    let (message, line) = match error {
        LexError::UnrecognizedText { text, line } => {
            (format!("unrecognized text {:?}", text), line)
        }
    };
    ParseFailure {
        kind: FailureKind::Scan { message },
        severity: Severity::Fatal,
        file: file.to_string(),
        line,
        context: Vec::new(),
    }
}

fn pre_parse_tree(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    if let Some(grammar) = grammar_for(node.kind()) {
        grammar.pre_parse(node, ctx)?;
    }
    let mut index = 0;
    while index < node.child_count() {
        pre_parse_tree(node.child_mut(index), ctx)?;
        index += 1;
    }
    Ok(())
}

fn parse_subtree(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    let grammar = grammar_for(node.kind());
    if let Some(grammar) = grammar {
        ctx.push_context(grammar.name());
    }
    let result = parse_subtree_inner(node, ctx);
    if grammar.is_some() {
        ctx.pop_context();
    }
    match result {
        Ok(()) => {
            node.set_state(ParseState::Done);
            Ok(())
        }
        Err(failure) => {
            node.set_state(ParseState::Failed);
            Err(failure)
        }
    }
}

fn parse_subtree_inner(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    let grammar = grammar_for(node.kind());

    node.set_state(ParseState::Parsing);
    if let Some(grammar) = grammar {
        grammar.parse(node, ctx)?;
    }

    // Descend by index: the child list was just rewritten by the passes,
    // and a recovering grammar keeps going past a failed child.
    let recovers = grammar.map(|g| g.recovers()).unwrap_or(false);
    let mut index = 0;
    while index < node.child_count() {
        match parse_subtree(node.child_mut(index), ctx) {
            Ok(()) => {}
            Err(failure) if recovers && !failure.is_fatal() => ctx.record(failure),
            Err(failure) => return Err(failure),
        }
        index += 1;
    }

    node.set_state(ParseState::PostParsing);
    if let Some(grammar) = grammar {
        grammar.post_parse(node, ctx)?;
    }
    node.set_state(ParseState::Done);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcpp::token::Kind;

    #[test]
    fn test_clean_file_parses_without_diagnostics() {
        let source = "object Player { int health; };";
        let output = parse_source(source, "demo.op").unwrap();
        assert!(output.diagnostics.is_empty());
        let object = output.root.find_child(Kind::Object).unwrap();
        assert_eq!(object.name(), Some("Player"));
    }

    #[test]
    fn test_scan_error_is_fatal() {
        let failure = parse_source("int x = `;", "demo.op").unwrap_err();
        assert!(failure.is_fatal());
        assert!(matches!(failure.kind, FailureKind::Scan { .. }));
    }

    #[test]
    fn test_malformed_statement_costs_one_diagnostic() {
        let source = "object Player { int health; location; int mana; };";
        let output = parse_source(source, "demo.op").unwrap();
        assert_eq!(output.diagnostics.len(), 1);
        let body = output
            .root
            .find_child(Kind::Object)
            .unwrap()
            .find_child(Kind::ObjectBody)
            .unwrap();
        // Both well-formed members survive around the discarded one.
        assert_eq!(body.children_of_kind(Kind::Statement).count(), 2);
    }

    #[test]
    fn test_dialect_registration_reaches_the_output() {
        let source = "dialect game { map Serializable; category fast { data pure; }; };";
        let output = parse_source(source, "demo.op").unwrap();
        assert!(output.diagnostics.is_empty());
        let entry = output.registry.get("game").unwrap();
        assert_eq!(entry.maps, vec!["Serializable"]);
        assert_eq!(entry.categories, vec!["fast"]);
    }
}
