//! Grammar composition.
//!
//!     A grammar is an ordered list of independent recognizer passes. Each
//!     pass scans the current node's children exactly once, rewriting every
//!     occurrence of its pattern; the grammar's parse simply invokes the
//!     passes in declared order. Order is the disambiguation: later passes
//!     only ever see what earlier passes left unreduced, and there is no
//!     backtracking across passes. A pass that depends on another one
//!     having run (e.g. scoped-name reduction assumes blocks are already
//!     grouped) documents the dependency and relies on the declared order.
//!
//!     Passes are monotonic reductions: running a finished pass again must
//!     match nothing and leave the tree unchanged. This is what makes the
//!     fixed-order composition safe.
//!
//!     The original design composed capabilities through deep mixin
//!     inheritance chains; here a grammar is just a unit struct returning
//!     a slice of pass functions.

pub mod capabilities;
pub mod dialects;
pub mod enums;
pub mod objects;
pub mod source_file;
pub mod statements;

use crate::opcpp::context::ParseContext;
use crate::opcpp::diagnostics::ParseResult;
use crate::opcpp::node::Node;
use crate::opcpp::token::Kind;

/// One recognizer pass: a single left-to-right scan over `node`'s children.
pub type Pass = fn(&mut Node, &mut ParseContext) -> ParseResult<()>;

/// A composite node's grammar: its pass sequence plus the phased hooks.
///
/// `parse` defaults to running the declared passes in order; grammars with
/// nothing beyond that only implement `passes`.
pub trait Grammar: Sync {
    /// Context name used in diagnostics ("object body", "dialect body", ...).
    fn name(&self) -> &'static str;

    /// The ordered recognizer-pass sequence.
    fn passes(&self) -> &[Pass] {
        &[]
    }

    /// Runs before any node's parse, depth-first across the whole tree.
    fn pre_parse(&self, _node: &mut Node, _ctx: &mut ParseContext) -> ParseResult<()> {
        Ok(())
    }

    /// The node's own recognizer-pass sequence over its own children.
    fn parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        for pass in self.passes() {
            pass(node, ctx)?;
        }
        Ok(())
    }

    /// Runs after the node's entire subtree has parsed; validation that
    /// depends on the fully reduced children (residue whitelists,
    /// cross-field consistency) lives here.
    fn post_parse(&self, _node: &mut Node, _ctx: &mut ParseContext) -> ParseResult<()> {
        Ok(())
    }

    /// Whether this grammar is a recovery boundary: a recoverable failure
    /// in a child subtree is recorded here and parsing continues with the
    /// next child, instead of unwinding further.
    fn recovers(&self) -> bool {
        false
    }
}

/// Kind-to-grammar dispatch. Kinds without a grammar (terminals, raw
/// bodies, modifier spans) parse as leaves.
pub fn grammar_for(kind: Kind) -> Option<&'static dyn Grammar> {
    match kind {
        Kind::SourceFile => Some(&source_file::SourceFileGrammar),
        Kind::Object => Some(&objects::ObjectGrammar),
        Kind::ObjectBody => Some(&objects::ObjectBodyGrammar),
        Kind::Enumeration => Some(&enums::EnumerationGrammar),
        Kind::EnumBody => Some(&enums::EnumBodyGrammar),
        Kind::Dialect => Some(&dialects::DialectGrammar),
        Kind::DialectBody => Some(&dialects::DialectBodyGrammar),
        Kind::CategoryBody => Some(&dialects::CategoryBodyGrammar),
        Kind::LocationBody => Some(&dialects::LocationBodyGrammar),
        _ => None,
    }
}
