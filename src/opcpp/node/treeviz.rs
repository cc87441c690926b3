//! Plain-text tree rendering for inspection and snapshots.
//!
//! One node per line, two-space indentation per depth level. Terminals
//! show their literal text; composites show their synthesized name when
//! one was set.

use crate::opcpp::node::Node;

/// Render a tree for human inspection.
pub fn render(node: &Node) -> String {
    let mut out = String::new();
    render_into(node, 0, &mut out);
    out
}

fn render_into(node: &Node, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(node.kind().label());
    if let Some(name) = node.name() {
        out.push_str(&format!(" name=\"{}\"", name));
    }
    if node.is_terminal() && !node.text().is_empty() {
        out.push_str(&format!(" \"{}\"", node.text()));
    }
    out.push('\n');
    for child in node.children() {
        render_into(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcpp::node::SourceInfo;
    use crate::opcpp::token::{Kind, Token};
    use std::sync::Arc;

    #[test]
    fn test_render_shows_names_and_text() {
        let file: Arc<str> = Arc::from("test.op");
        let mut note = Node::composite(Kind::Note, SourceInfo::new(1, &file));
        note.set_name("Header");
        let mut body = Node::composite(Kind::NoteBody, SourceInfo::new(1, &file));
        body.push_child(Node::terminal(Token::new(Kind::Identifier, "x", 1), &file));
        note.push_child(body);

        let rendered = render(&note);
        assert_eq!(
            rendered,
            "note declaration name=\"Header\"\n  note body\n    identifier \"x\"\n"
        );
    }
}
