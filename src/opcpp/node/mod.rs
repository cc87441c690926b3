//! The universal tree node and its ownership model.
//!
//!     Every element of a parse tree is a [Node]: either a terminal wrapping
//!     exactly one scanned token, or a composite wrapping an ordered child
//!     sequence. The kind tag identifies the node's shape; child order is
//!     always source order and always significant.
//!
//!     Ownership is single-owner by construction: a node lives in exactly
//!     one parent's child list, or it is an owned value in some caller's
//!     hands between extraction and re-insertion. There is no sharing and
//!     no back-pointer. The original engine needed a guard object that
//!     deleted an extracted subtree unless explicitly disarmed; with move
//!     semantics the transfer itself is the disarm, and dropping an
//!     unattached node frees its subtree.
//!
//!     Each composite owns a cursor into its own child list. The cursor is
//!     node-local - recognizer passes over different nodes never interfere -
//!     and all insertion/removal around it goes through the primitives in
//!     [primitives], which keep it pointing at the same logical position.

pub mod primitives;
pub mod treeviz;

use std::fmt;
use std::sync::Arc;

use serde::ser::Serializer;

use crate::opcpp::token::{Kind, Token};

fn serialize_file<S: Serializer>(file: &Arc<str>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(file)
}

/// Source position carried by every node: 1-based line plus owning file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SourceInfo {
    pub line: usize,
    #[serde(serialize_with = "serialize_file")]
    pub file: Arc<str>,
}

impl SourceInfo {
    pub fn new(line: usize, file: &Arc<str>) -> Self {
        Self {
            line,
            file: Arc::clone(file),
        }
    }
}

/// Parse lifecycle state of one node.
///
/// `Failed` is terminal for the node; the failure itself is caught at the
/// nearest enclosing statement boundary, so a failed subtree never takes
/// the whole file down with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ParseState {
    Unparsed,
    Parsing,
    PostParsing,
    Done,
    Failed,
}

/// A tagged tree node with an ordered child sequence and a local cursor.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Node {
    kind: Kind,
    /// Literal text, for terminals only.
    text: Option<String>,
    /// Synthesized name, set by the owning grammar's parse (e.g. the
    /// identifier of an object or note declaration).
    name: Option<String>,
    children: Vec<Node>,
    #[serde(skip)]
    cursor: usize,
    source: SourceInfo,
    #[serde(skip)]
    state: ParseState,
}

/// Structural equality: kind, text, name, and children, in order.
/// Cursor position, lifecycle state, and source location are transient.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && self.name == other.name
            && self.children == other.children
    }
}

impl Node {
    /// Wrap one scanned token as a terminal node.
    pub fn terminal(token: Token, file: &Arc<str>) -> Self {
        Self {
            kind: token.kind,
            text: Some(token.text),
            name: None,
            children: Vec::new(),
            cursor: 0,
            source: SourceInfo::new(token.line, file),
            state: ParseState::Unparsed,
        }
    }

    /// Create an empty composite carrying the given source position.
    pub fn composite(kind: Kind, source: SourceInfo) -> Self {
        Self {
            kind,
            text: None,
            name: None,
            children: Vec::new(),
            cursor: 0,
            source,
            state: ParseState::Unparsed,
        }
    }

    /// Build the root node for one file from its token stream.
    pub fn source_file(tokens: Vec<Token>, file: &Arc<str>) -> Self {
        let mut root = Self::composite(Kind::SourceFile, SourceInfo::new(1, file));
        root.children = tokens
            .into_iter()
            .map(|token| Self::terminal(token, file))
            .collect();
        root
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Terminal literal text; empty for composites.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn line(&self) -> usize {
        self.source.line
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn set_state(&mut self, state: ParseState) {
        self.state = state;
    }

    pub fn is_terminal(&self) -> bool {
        self.text.is_some()
    }

    // ----- children -----

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> &Node {
        &self.children[index]
    }

    pub fn child_mut(&mut self, index: usize) -> &mut Node {
        &mut self.children[index]
    }

    /// First child of the given kind, if any.
    pub fn find_child(&self, kind: Kind) -> Option<&Node> {
        self.children.iter().find(|child| child.kind == kind)
    }

    pub fn children_of_kind(&self, kind: Kind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |child| child.kind == kind)
    }

    /// Append a child. The cursor is unaffected.
    pub fn push_child(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Insert a child at `position`, keeping the cursor on the same
    /// logical element (it shifts right if the insertion is at or before
    /// it).
    pub fn insert_child(&mut self, position: usize, node: Node) {
        assert!(position <= self.children.len(), "insert position out of range");
        self.children.insert(position, node);
        if position <= self.cursor {
            self.cursor += 1;
        }
    }

    /// Take all children out, leaving the node empty and its cursor at 0.
    pub fn take_children(&mut self) -> Vec<Node> {
        self.cursor = 0;
        std::mem::take(&mut self.children)
    }

    // ----- cursor -----

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn seek(&mut self, position: usize) {
        assert!(position <= self.children.len(), "seek out of range");
        self.cursor = position;
    }

    pub fn seek_end(&mut self) {
        self.cursor = self.children.len();
    }

    /// Advance past the current child. Engine contract: never called at
    /// the end of the child list.
    pub fn advance(&mut self) {
        assert!(self.cursor < self.children.len(), "advance past end");
        self.cursor += 1;
    }

    pub fn at_end(&self) -> bool {
        self.cursor >= self.children.len()
    }

    /// True at the end of the child list or at the end-of-input sentinel.
    pub fn at_end_of_input(&self) -> bool {
        match self.peek() {
            None => true,
            Some(child) => child.kind == Kind::EndOfInput,
        }
    }

    pub fn peek(&self) -> Option<&Node> {
        self.children.get(self.cursor)
    }

    pub fn peek_kind(&self) -> Option<Kind> {
        self.peek().map(|child| child.kind)
    }

    /// The node immediately before the cursor, if any.
    pub fn peek_back(&self) -> Option<&Node> {
        if self.cursor == 0 {
            None
        } else {
            self.children.get(self.cursor - 1)
        }
    }

    /// Remove and return the child at the cursor. The cursor then
    /// references the following child. Engine contract: never called at
    /// the end of the child list.
    pub fn extract_at_cursor(&mut self) -> Node {
        assert!(self.cursor < self.children.len(), "extract past end");
        self.children.remove(self.cursor)
    }

    /// Remove and return the child immediately before the cursor.
    /// Engine contract: never called with the cursor at 0.
    pub fn extract_before_cursor(&mut self) -> Node {
        assert!(self.cursor > 0, "extract before start");
        self.cursor -= 1;
        self.children.remove(self.cursor)
    }

    // ----- diagnostics support -----

    /// Describe this node for an error message, e.g. `identifier "pure"`
    /// or `brace block`.
    pub fn describe(&self) -> String {
        match &self.text {
            Some(text) if !text.is_empty() => format!("{} \"{}\"", self.kind, text),
            _ => self.kind.to_string(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> Arc<str> {
        Arc::from("test.op")
    }

    fn terminal(kind: Kind, text: &str) -> Node {
        Node::terminal(Token::new(kind, text, 1), &file())
    }

    fn parent_with(kinds: &[(Kind, &str)]) -> Node {
        let mut node = Node::composite(Kind::SourceFile, SourceInfo::new(1, &file()));
        for (kind, text) in kinds {
            node.push_child(terminal(*kind, text));
        }
        node
    }

    #[test]
    fn test_insert_before_cursor_keeps_logical_position() {
        let mut node = parent_with(&[(Kind::Identifier, "a"), (Kind::Identifier, "b")]);
        node.seek(1);
        node.insert_child(0, terminal(Kind::Semicolon, ";"));
        // Cursor still references "b".
        assert_eq!(node.peek().unwrap().text(), "b");
        assert_eq!(node.cursor(), 2);
    }

    #[test]
    fn test_insert_after_cursor_leaves_cursor_alone() {
        let mut node = parent_with(&[(Kind::Identifier, "a"), (Kind::Identifier, "b")]);
        node.seek(1);
        node.insert_child(2, terminal(Kind::Semicolon, ";"));
        assert_eq!(node.cursor(), 1);
        assert_eq!(node.peek().unwrap().text(), "b");
    }

    #[test]
    fn test_extract_at_cursor_shifts_following_children_into_place() {
        let mut node = parent_with(&[(Kind::Identifier, "a"), (Kind::Identifier, "b")]);
        let extracted = node.extract_at_cursor();
        assert_eq!(extracted.text(), "a");
        assert_eq!(node.peek().unwrap().text(), "b");
    }

    #[test]
    fn test_structural_equality_ignores_cursor() {
        let mut left = parent_with(&[(Kind::Identifier, "a")]);
        let right = parent_with(&[(Kind::Identifier, "a")]);
        left.seek(1);
        assert_eq!(left, right);
    }

    #[test]
    fn test_end_of_input_detection() {
        let mut node = parent_with(&[(Kind::Identifier, "a"), (Kind::EndOfInput, "")]);
        assert!(!node.at_end_of_input());
        node.advance();
        assert!(node.at_end_of_input());
        assert!(!node.at_end());
    }

    #[test]
    #[should_panic(expected = "extract past end")]
    fn test_extract_past_end_is_a_contract_violation() {
        let mut node = parent_with(&[]);
        let _ = node.extract_at_cursor();
    }
}
