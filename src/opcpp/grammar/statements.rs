//! The statement disambiguation loop.
//!
//!     Every block grammar (object bodies, dialect bodies, category bodies,
//!     enum bodies, ...) partitions its flat child sequence into typed
//!     statements with this one algorithm:
//!
//!         1. Greedily collect everything up to the next terminator or the
//!            start of a statement-introducing construct; the collected
//!            span is the pending modifier list.
//!         2. Empty buffer at the end of input: clean finish.
//!         3. Otherwise try the statement rules in declared priority
//!            order. The first whose structural test matches wins and is
//!            never re-evaluated; its recognizer builds the typed node,
//!            which is wrapped together with the pending modifiers in a
//!            Statement node.
//!         4. A bare terminator is a null statement: erase it, splice the
//!            buffer back, keep looping.
//!         5. Anything else is a hard disambiguation failure: splice the
//!            buffer back and stop. The residue is surfaced later by the
//!            grammar's residual whitelist, not here.
//!
//!     This loop is also the recovery boundary: a rule that matches but
//!     then fails recoverably produces one buffered diagnostic, its span
//!     is discarded up to the next terminator, and scanning resumes. One
//!     malformed statement costs one diagnostic, never the file.

use crate::opcpp::context::ParseContext;
use crate::opcpp::diagnostics::ParseResult;
use crate::opcpp::node::Node;
use crate::opcpp::token::Kind;

/// One statement kind a block grammar can recognize.
///
/// `matches` is a cheap structural test over the pending buffer and the
/// block at its cursor; `recognize` consumes the matched construct (from
/// the buffer, the block, or both) and returns the typed node.
pub struct StatementRule {
    pub name: &'static str,
    pub matches: fn(buffer: &Node, block: &Node) -> bool,
    pub recognize: fn(buffer: &mut Node, block: &mut Node, ctx: &mut ParseContext) -> ParseResult<Node>,
}

/// The generic statement loop for one block grammar.
pub struct StatementLoop<'a> {
    /// Statement terminator for this block (`;` for bodies, `,` for enums).
    pub terminator: Kind,
    /// Kinds that introduce a recognized statement and therefore stop
    /// buffer collection (`note`, `category`, `location`, ...).
    pub leading: &'a [Kind],
    /// Statement rules in priority order. First match wins.
    pub rules: &'a [StatementRule],
}

impl StatementLoop<'_> {
    pub fn run(&self, block: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        let mut stops = vec![self.terminator];
        stops.extend_from_slice(self.leading);

        block.rewind();
        loop {
            let start = block.cursor();
            let buffer = block.push_until(Kind::Modifiers, &stops, false, ctx)?;

            if buffer.child_count() == 0 && block.at_end_of_input() {
                return Ok(());
            }

            let rule = self
                .rules
                .iter()
                .find(|rule| (rule.matches)(&buffer, block));

            match rule {
                Some(rule) => {
                    let mut buffer = buffer;
                    let before = block.child_count();
                    match (rule.recognize)(&mut buffer, block, ctx) {
                        Ok(recognized) => {
                            let consumed = before.saturating_sub(block.child_count());
                            assert!(
                                consumed > 0 || buffer.child_count() > 0 || recognized.child_count() > 0,
                                "statement rule `{}` consumed no input",
                                rule.name
                            );
                            if block.peek_kind() == Some(self.terminator) {
                                drop(block.extract_at_cursor());
                            }
                            let mut statement =
                                Node::composite(Kind::Statement, recognized.source().clone());
                            if buffer.child_count() > 0 {
                                statement.push_child(buffer);
                            }
                            statement.push_child(recognized);
                            block.insert_child(start, statement);
                            block.seek(start + 1);
                        }
                        Err(failure) if !failure.is_fatal() => {
                            // One diagnostic, discard the span, resume at
                            // the next statement.
                            ctx.record(failure);
                            self.skip_past_terminator(block);
                        }
                        Err(fatal) => return Err(fatal),
                    }
                }
                None if block.peek_kind() == Some(self.terminator) => {
                    // Null statement.
                    drop(block.extract_at_cursor());
                    let position = block.cursor();
                    block.collapse(buffer, position);
                }
                None => {
                    // Hard disambiguation failure; the residue is left for
                    // the grammar's allow_only.
                    let position = block.cursor();
                    block.collapse(buffer, position);
                    return Ok(());
                }
            }
        }
    }

    /// Discard everything up to and including the next terminator. The
    /// end-of-input sentinel is never discarded.
    fn skip_past_terminator(&self, block: &mut Node) {
        while let Some(kind) = block.peek_kind() {
            if kind == Kind::EndOfInput {
                return;
            }
            let discarded = block.extract_at_cursor();
            if discarded.kind() == self.terminator {
                return;
            }
        }
    }
}

/// Split a Statement node into its optional modifier list and its typed
/// inner node.
pub fn statement_parts(statement: &Node) -> (Option<&Node>, &Node) {
    debug_assert_eq!(statement.kind(), Kind::Statement);
    match statement.children() {
        [modifiers, inner] if modifiers.kind() == Kind::Modifiers => (Some(modifiers), inner),
        [inner] => (None, inner),
        other => panic!("malformed statement shape: {} children", other.len()),
    }
}
