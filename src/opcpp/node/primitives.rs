//! Movement/rewrite primitives.
//!
//!     Every recognizer pass in the system is built from this fixed
//!     vocabulary. All primitives operate relative to the current node's
//!     own cursor, scan strictly left to right, and distinguish "input
//!     ended" from "wrong node" in their failures: the end-of-input
//!     sentinel is always matched before generic wrong-token handling.
//!
//!     The multi-kind variants take a slice of kinds; there is no
//!     fixed-arity overload family.

use crate::opcpp::context::ParseContext;
use crate::opcpp::diagnostics::{FailureKind, ParseResult};
use crate::opcpp::node::{Node, SourceInfo};
use crate::opcpp::token::Kind;

impl Node {
    /// Line to report for a failure at the current cursor position.
    fn line_at_cursor(&self) -> usize {
        if let Some(child) = self.peek() {
            return child.line();
        }
        match self.children().last() {
            Some(last) => last.line(),
            None => self.line(),
        }
    }

    fn describe_at_cursor(&self) -> String {
        match self.peek() {
            Some(child) => child.describe(),
            None => Kind::EndOfInput.to_string(),
        }
    }

    /// Remove and return the child at the cursor if it has exactly `kind`.
    pub fn expect(&mut self, kind: Kind, ctx: &ParseContext) -> ParseResult<Node> {
        self.expect_any(&[kind], ctx)
    }

    /// Remove and return the child at the cursor if its kind is one of
    /// `kinds`.
    pub fn expect_any(&mut self, kinds: &[Kind], ctx: &ParseContext) -> ParseResult<Node> {
        match self.peek() {
            Some(child) if kinds.contains(&child.kind()) => Ok(self.extract_at_cursor()),
            Some(child) if child.kind() == Kind::EndOfInput => Err(ctx.failure(
                FailureKind::Premature {
                    wanted: kinds.to_vec(),
                },
                child.line(),
            )),
            Some(child) => Err(ctx.failure(
                FailureKind::Expect {
                    wanted: kinds.to_vec(),
                    found: child.describe(),
                },
                child.line(),
            )),
            None => Err(ctx.failure(
                FailureKind::Premature {
                    wanted: kinds.to_vec(),
                },
                self.line_at_cursor(),
            )),
        }
    }

    /// Lookahead: succeed if the child at the cursor has exactly `kind`,
    /// without removing it or moving the cursor.
    pub fn check(&self, kind: Kind, ctx: &ParseContext) -> ParseResult<&Node> {
        self.check_any(&[kind], ctx)
    }

    pub fn check_any(&self, kinds: &[Kind], ctx: &ParseContext) -> ParseResult<&Node> {
        match self.peek() {
            Some(child) if kinds.contains(&child.kind()) => Ok(child),
            _ => Err(ctx.failure(
                FailureKind::CheckNone {
                    wanted: kinds.to_vec(),
                    found: self.describe_at_cursor(),
                },
                self.line_at_cursor(),
            )),
        }
    }

    /// Remove and return the node immediately *before* the cursor if it has
    /// exactly `kind`. Used by backward-looking constructs, e.g. recovering
    /// the identifier that precedes an already-consumed argument list.
    ///
    /// The failure cites the node found *after* the cursor (the boundary)
    /// for context, since that is usually what the caller just consumed.
    pub fn reverse_expect(&mut self, kind: Kind, ctx: &ParseContext) -> ParseResult<Node> {
        self.reverse_expect_any(&[kind], ctx)
    }

    pub fn reverse_expect_any(&mut self, kinds: &[Kind], ctx: &ParseContext) -> ParseResult<Node> {
        let boundary = self.describe_at_cursor();
        match self.peek_back() {
            Some(prev) if kinds.contains(&prev.kind()) => Ok(self.extract_before_cursor()),
            Some(prev) => Err(ctx.failure(
                FailureKind::Expect {
                    wanted: kinds.to_vec(),
                    found: format!("{} (before {})", prev.describe(), boundary),
                },
                prev.line(),
            )),
            None => Err(ctx.failure(
                FailureKind::Expect {
                    wanted: kinds.to_vec(),
                    found: format!("nothing before {}", boundary),
                },
                self.line_at_cursor(),
            )),
        }
    }

    /// Collect children starting at the cursor into a fresh `wrapper`
    /// composite until one of `stops` is seen (left in place). The
    /// end-of-input sentinel is an implicit stop.
    ///
    /// With `require_stop`, running out of input is a premature-end
    /// failure; otherwise whatever was collected (possibly nothing) is
    /// returned.
    pub fn push_until(
        &mut self,
        wrapper: Kind,
        stops: &[Kind],
        require_stop: bool,
        ctx: &ParseContext,
    ) -> ParseResult<Node> {
        let source = SourceInfo::new(self.line_at_cursor(), &self.source().file);
        let mut collected = Node::composite(wrapper, source);
        loop {
            let at_stop = match self.peek() {
                Some(child) if stops.contains(&child.kind()) => true,
                Some(child) if child.kind() == Kind::EndOfInput => {
                    if require_stop {
                        return Err(ctx.failure(
                            FailureKind::Premature {
                                wanted: stops.to_vec(),
                            },
                            child.line(),
                        ));
                    }
                    true
                }
                Some(_) => false,
                None => {
                    if require_stop {
                        return Err(ctx.failure(
                            FailureKind::Premature {
                                wanted: stops.to_vec(),
                            },
                            self.line_at_cursor(),
                        ));
                    }
                    true
                }
            };
            if at_stop {
                return Ok(collected);
            }
            collected.push_child(self.extract_at_cursor());
        }
    }

    /// Collect every remaining child unconditionally.
    pub fn push_until_end(&mut self, wrapper: Kind) -> Node {
        let source = SourceInfo::new(self.line_at_cursor(), &self.source().file);
        let mut collected = Node::composite(wrapper, source);
        while !self.at_end() {
            collected.push_child(self.extract_at_cursor());
        }
        collected
    }

    /// Re-parent all of `node`'s children under a fresh composite of
    /// another kind, preserving order and source position. The discarded
    /// wrapper's synthesized fields do not carry over.
    pub fn transform(mut node: Node, kind: Kind) -> Node {
        let mut out = Node::composite(kind, node.source().clone());
        for child in node.take_children() {
            out.push_child(child);
        }
        out
    }

    /// Splice `wrapper`'s children into this node's children at
    /// `position`, discarding the wrapper. The cursor is repositioned to
    /// the splice point.
    pub fn collapse(&mut self, mut wrapper: Node, position: usize) {
        assert!(position <= self.child_count(), "collapse position out of range");
        let mut insert_at = position;
        for child in wrapper.take_children() {
            self.insert_child(insert_at, child);
            insert_at += 1;
        }
        self.seek(position);
    }

    /// Assert that the cursor references exactly `expected` (without
    /// consuming it) and return a fresh empty composite of kind
    /// `composite`, carrying the matched node's source position.
    pub fn make(&self, expected: Kind, composite: Kind, ctx: &ParseContext) -> ParseResult<Node> {
        let matched = match self.peek() {
            Some(child) if child.kind() == expected => child,
            Some(child) if child.kind() == Kind::EndOfInput => {
                return Err(ctx.failure(
                    FailureKind::Premature {
                        wanted: vec![expected],
                    },
                    child.line(),
                ))
            }
            Some(child) => {
                return Err(ctx.failure(
                    FailureKind::Expect {
                        wanted: vec![expected],
                        found: child.describe(),
                    },
                    child.line(),
                ))
            }
            None => {
                return Err(ctx.failure(
                    FailureKind::Premature {
                        wanted: vec![expected],
                    },
                    self.line_at_cursor(),
                ))
            }
        };
        Ok(Node::composite(composite, matched.source().clone()))
    }

    /// Residual-content whitelist: scan the full child list (ignoring
    /// comment filler and the sentinel) and fail on the first child whose
    /// kind is outside `allowed`.
    pub fn allow_only(&self, allowed: &[Kind], ctx: &ParseContext) -> ParseResult<()> {
        for child in self.children() {
            if child.kind().is_filler() || allowed.contains(&child.kind()) {
                continue;
            }
            return Err(ctx.failure(
                FailureKind::Disallow {
                    offending: child.describe(),
                },
                child.line(),
            ));
        }
        Ok(())
    }

    /// Forbid `kind` among the children (or, recursively, anywhere in the
    /// subtree) regardless of position.
    pub fn disallow(&self, kind: Kind, recursive: bool, ctx: &ParseContext) -> ParseResult<()> {
        for child in self.children() {
            if child.kind() == kind {
                return Err(ctx.failure(
                    FailureKind::Disallow {
                        offending: child.describe(),
                    },
                    child.line(),
                ));
            }
            if recursive {
                child.disallow(kind, true, ctx)?;
            }
        }
        Ok(())
    }

    /// Fail if both kinds appear among the children. The reported "first
    /// offender" is whichever occurs earlier in source order, regardless
    /// of argument order.
    pub fn disallow_both(&self, a: Kind, b: Kind, ctx: &ParseContext) -> ParseResult<()> {
        let mut first_a = None;
        let mut first_b = None;
        for (index, child) in self.children().iter().enumerate() {
            if child.kind() == a && first_a.is_none() {
                first_a = Some(index);
            }
            if child.kind() == b && first_b.is_none() {
                first_b = Some(index);
            }
        }
        if let (Some(index_a), Some(index_b)) = (first_a, first_b) {
            let (first, second, at) = if index_a < index_b {
                (a, b, index_b)
            } else {
                (b, a, index_a)
            };
            return Err(ctx.failure(
                FailureKind::MutualExclusion { first, second },
                self.child(at).line(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcpp::diagnostics::FailureKind;
    use crate::opcpp::token::Token;
    use std::sync::Arc;

    fn ctx() -> ParseContext {
        ParseContext::new("test.op")
    }

    fn node_with(kinds: &[(Kind, &str)]) -> Node {
        let file: Arc<str> = Arc::from("test.op");
        let mut node = Node::composite(Kind::ObjectBody, SourceInfo::new(1, &file));
        for (line, (kind, text)) in kinds.iter().enumerate() {
            node.push_child(Node::terminal(Token::new(*kind, *text, line + 1), &file));
        }
        node
    }

    #[test]
    fn test_expect_removes_and_returns() {
        let ctx = ctx();
        let mut node = node_with(&[(Kind::Identifier, "x"), (Kind::Semicolon, ";")]);
        let taken = node.expect(Kind::Identifier, &ctx).unwrap();
        assert_eq!(taken.text(), "x");
        assert_eq!(node.child_count(), 1);
        assert_eq!(node.peek_kind(), Some(Kind::Semicolon));
    }

    #[test]
    fn test_expect_wrong_kind_cites_what_was_found() {
        let ctx = ctx();
        let mut node = node_with(&[(Kind::Semicolon, ";")]);
        let failure = node.expect(Kind::Identifier, &ctx).unwrap_err();
        match failure.kind {
            FailureKind::Expect { wanted, found } => {
                assert_eq!(wanted, vec![Kind::Identifier]);
                assert_eq!(found, "`;` \";\"");
            }
            other => panic!("expected Expect failure, got {:?}", other),
        }
        // The child is left in place on failure.
        assert_eq!(node.child_count(), 1);
    }

    #[test]
    fn test_expect_at_sentinel_is_premature_not_wrong_token() {
        let ctx = ctx();
        let mut node = node_with(&[(Kind::EndOfInput, "")]);
        let failure = node.expect(Kind::Identifier, &ctx).unwrap_err();
        assert!(matches!(failure.kind, FailureKind::Premature { .. }));
    }

    #[test]
    fn test_check_does_not_consume() {
        let ctx = ctx();
        let node = node_with(&[(Kind::Identifier, "x")]);
        assert!(node.check(Kind::Identifier, &ctx).is_ok());
        assert!(node.check(Kind::Semicolon, &ctx).is_err());
        assert_eq!(node.child_count(), 1);
        assert_eq!(node.cursor(), 0);
    }

    #[test]
    fn test_reverse_expect_after_consuming_following_node() {
        // [ID, ParenBlock]: consume the paren block, then recover the ID
        // behind the cursor.
        let ctx = ctx();
        let mut node = node_with(&[(Kind::Identifier, "update"), (Kind::ParenBlock, "")]);
        node.seek(1);
        let params = node.expect(Kind::ParenBlock, &ctx).unwrap();
        assert_eq!(params.kind(), Kind::ParenBlock);
        let name = node.reverse_expect(Kind::Identifier, &ctx).unwrap();
        assert_eq!(name.text(), "update");
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_reverse_expect_failure_cites_boundary() {
        let ctx = ctx();
        let mut node = node_with(&[(Kind::Semicolon, ";"), (Kind::Identifier, "next")]);
        node.seek(1);
        let failure = node.reverse_expect(Kind::Identifier, &ctx).unwrap_err();
        match failure.kind {
            FailureKind::Expect { found, .. } => {
                assert!(found.contains("before identifier \"next\""), "found: {found}");
            }
            other => panic!("expected Expect failure, got {:?}", other),
        }
    }

    #[test]
    fn test_push_until_leaves_stop_in_place() {
        let ctx = ctx();
        let mut node = node_with(&[
            (Kind::KwStatic, "static"),
            (Kind::Identifier, "int"),
            (Kind::Semicolon, ";"),
        ]);
        let collected = node
            .push_until(Kind::Modifiers, &[Kind::Semicolon], false, &ctx)
            .unwrap();
        assert_eq!(collected.child_count(), 2);
        assert_eq!(node.peek_kind(), Some(Kind::Semicolon));
    }

    #[test]
    fn test_push_until_preserves_order() {
        let ctx = ctx();
        let mut node = node_with(&[
            (Kind::Identifier, "a"),
            (Kind::Identifier, "b"),
            (Kind::Identifier, "c"),
        ]);
        let collected = node
            .push_until(Kind::Modifiers, &[Kind::Semicolon], false, &ctx)
            .unwrap();
        let texts: Vec<&str> = collected.children().iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_push_until_missing_stop_is_premature_when_required() {
        let ctx = ctx();
        let mut node = node_with(&[(Kind::Identifier, "a"), (Kind::EndOfInput, "")]);
        let failure = node
            .push_until(Kind::Modifiers, &[Kind::Semicolon], true, &ctx)
            .unwrap_err();
        assert!(matches!(failure.kind, FailureKind::Premature { .. }));
    }

    #[test]
    fn test_push_until_empty_collection_is_not_an_error() {
        let ctx = ctx();
        let mut node = node_with(&[(Kind::Semicolon, ";")]);
        let collected = node
            .push_until(Kind::Modifiers, &[Kind::Semicolon], false, &ctx)
            .unwrap();
        assert_eq!(collected.child_count(), 0);
    }

    #[test]
    fn test_transform_retags_preserving_children() {
        let ctx = ctx();
        let mut node = node_with(&[(Kind::Identifier, "a"), (Kind::Identifier, "b")]);
        let block = node.push_until_end(Kind::BraceBlock);
        let body = Node::transform(block, Kind::NoteBody);
        assert_eq!(body.kind(), Kind::NoteBody);
        assert_eq!(body.child_count(), 2);
        assert_eq!(body.child(0).text(), "a");
        assert_eq!(body.child(1).text(), "b");
        drop(ctx);
    }

    #[test]
    fn test_collapse_splices_in_place() {
        let ctx = ctx();
        let mut node = node_with(&[(Kind::Identifier, "keep"), (Kind::Semicolon, ";")]);
        let mut wrapper = node_with(&[(Kind::Identifier, "x"), (Kind::Identifier, "y")]);
        let inner = wrapper.push_until_end(Kind::Modifiers);
        node.collapse(inner, 1);
        let texts: Vec<&str> = node.children().iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["keep", "x", "y", ";"]);
        assert_eq!(node.cursor(), 1);
        drop(ctx);
    }

    #[test]
    fn test_make_does_not_consume() {
        let ctx = ctx();
        let node = node_with(&[(Kind::KwNote, "note")]);
        let composite = node.make(Kind::KwNote, Kind::Note, &ctx).unwrap();
        assert_eq!(composite.kind(), Kind::Note);
        assert_eq!(composite.line(), 1);
        assert_eq!(node.child_count(), 1);
    }

    #[test]
    fn test_allow_only_ignores_filler() {
        let ctx = ctx();
        let node = node_with(&[
            (Kind::Statement, ""),
            (Kind::Comment, "// ok"),
            (Kind::EndOfInput, ""),
        ]);
        assert!(node.allow_only(&[Kind::Statement], &ctx).is_ok());
    }

    #[test]
    fn test_allow_only_names_first_offender() {
        let ctx = ctx();
        let node = node_with(&[(Kind::Statement, ""), (Kind::Identifier, "pure")]);
        let failure = node.allow_only(&[Kind::Statement], &ctx).unwrap_err();
        match failure.kind {
            FailureKind::Disallow { offending } => {
                assert_eq!(offending, "identifier \"pure\"");
            }
            other => panic!("expected Disallow failure, got {:?}", other),
        }
    }

    #[test]
    fn test_disallow_recursive_finds_nested_offender() {
        let ctx = ctx();
        let file: Arc<str> = Arc::from("test.op");
        let mut inner = Node::composite(Kind::BraceBlock, SourceInfo::new(2, &file));
        inner.push_child(Node::terminal(Token::new(Kind::KwObject, "object", 2), &file));
        let mut outer = Node::composite(Kind::NoteBody, SourceInfo::new(1, &file));
        outer.push_child(inner);
        assert!(outer.disallow(Kind::KwObject, false, &ctx).is_ok());
        assert!(outer.disallow(Kind::KwObject, true, &ctx).is_err());
    }

    #[test]
    fn test_disallow_both_reports_source_order_first() {
        let ctx = ctx();
        let node = node_with(&[(Kind::KwMutable, "mutable"), (Kind::KwStatic, "static")]);
        // Argument order is reversed relative to source order.
        let failure = node
            .disallow_both(Kind::KwStatic, Kind::KwMutable, &ctx)
            .unwrap_err();
        match failure.kind {
            FailureKind::MutualExclusion { first, second } => {
                assert_eq!(first, Kind::KwMutable);
                assert_eq!(second, Kind::KwStatic);
            }
            other => panic!("expected MutualExclusion failure, got {:?}", other),
        }
    }

    #[test]
    fn test_disallow_both_tolerates_single_occurrence() {
        let ctx = ctx();
        let node = node_with(&[(Kind::KwStatic, "static")]);
        assert!(node
            .disallow_both(Kind::KwStatic, Kind::KwMutable, &ctx)
            .is_ok());
    }
}
