//! Fluent assertion API for parse trees.

use crate::opcpp::grammar::statements::statement_parts;
use crate::opcpp::node::{treeviz, Node};
use crate::opcpp::pipeline::{parse_source, ParseOutput};
use crate::opcpp::token::Kind;

/// Parse a source snippet, panicking on fatal failure. Recoverable
/// diagnostics are kept in the output for the test to assert on.
pub fn parse_fixture(source: &str) -> ParseOutput {
    parse_source(source, "fixture.op").expect("fixture failed fatally")
}

/// Create an assertion builder for a node.
pub fn assert_node(node: &Node) -> NodeAssertion<'_> {
    NodeAssertion {
        node,
        context: node.kind().label().to_string(),
    }
}

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn kind(self, expected: Kind) -> Self {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: expected kind {:?}, found {:?}\n{}",
            self.context,
            expected,
            self.node.kind(),
            treeviz::render(self.node)
        );
        self
    }

    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.node.name(),
            Some(expected),
            "{}: expected name {:?}, found {:?}",
            self.context,
            expected,
            self.node.name()
        );
        self
    }

    pub fn text(self, expected: &str) -> Self {
        assert_eq!(
            self.node.text(),
            expected,
            "{}: expected text {:?}, found {:?}",
            self.context,
            expected,
            self.node.text()
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        assert_eq!(
            self.node.child_count(),
            expected,
            "{}: expected {} children, found {}\n{}",
            self.context,
            expected,
            self.node.child_count(),
            treeviz::render(self.node)
        );
        self
    }

    /// Assert on a specific child by index.
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'_>),
    {
        assert!(
            index < self.node.child_count(),
            "{}: child index {} out of bounds ({} children)\n{}",
            self.context,
            index,
            self.node.child_count(),
            treeviz::render(self.node)
        );
        let child = self.node.child(index);
        assertion(NodeAssertion {
            node: child,
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }

    /// Assert on the first child of the given kind.
    pub fn find<F>(self, kind: Kind, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'_>),
    {
        let child = self.node.find_child(kind).unwrap_or_else(|| {
            panic!(
                "{}: no {:?} child\n{}",
                self.context,
                kind,
                treeviz::render(self.node)
            )
        });
        assertion(NodeAssertion {
            node: child,
            context: format!("{}.{}", self.context, kind.label()),
        });
        self
    }

    /// Assert on the typed inner node of the statement at `index` among
    /// this node's Statement children.
    pub fn statement<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'_>),
    {
        let statement = self
            .node
            .children_of_kind(Kind::Statement)
            .nth(index)
            .unwrap_or_else(|| {
                panic!(
                    "{}: no statement at index {}\n{}",
                    self.context,
                    index,
                    treeviz::render(self.node)
                )
            });
        let (_, inner) = statement_parts(statement);
        assertion(NodeAssertion {
            node: inner,
            context: format!("{}.statements[{}]", self.context, index),
        });
        self
    }

    /// Assert on the modifier span of the statement at `index`. Panics if
    /// the statement has no modifiers.
    pub fn statement_modifiers<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'_>),
    {
        let statement = self
            .node
            .children_of_kind(Kind::Statement)
            .nth(index)
            .unwrap_or_else(|| {
                panic!(
                    "{}: no statement at index {}\n{}",
                    self.context,
                    index,
                    treeviz::render(self.node)
                )
            });
        let (modifiers, _) = statement_parts(statement);
        let modifiers = modifiers.unwrap_or_else(|| {
            panic!(
                "{}: statement {} has no modifier span",
                self.context, index
            )
        });
        assertion(NodeAssertion {
            node: modifiers,
            context: format!("{}.statements[{}].modifiers", self.context, index),
        });
        self
    }

    pub fn statement_count(self, expected: usize) -> Self {
        let actual = self.node.children_of_kind(Kind::Statement).count();
        assert_eq!(
            actual,
            expected,
            "{}: expected {} statements, found {}\n{}",
            self.context,
            expected,
            actual,
            treeviz::render(self.node)
        );
        self
    }
}
