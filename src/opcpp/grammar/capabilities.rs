//! Reusable recognizer capabilities.
//!
//!     Each capability contributes one pass: a single left-to-right scan
//!     that rewrites every occurrence of its pattern within the current
//!     node's children. Grammars compose capabilities by listing their
//!     passes in order; declared order is the only disambiguation, so the
//!     dependencies are:
//!
//!         group_blocks < template_args < scoped_names < array_suffix
//!
//!     (template argument recognition assumes braces are already grouped
//!     so a `<` inside a function body cannot fake an argument list;
//!     scoped-name reduction assumes template arguments are out of the
//!     token stream; array suffixes attach to identifiers left over after
//!     both.)

use crate::opcpp::context::ParseContext;
use crate::opcpp::diagnostics::{FailureKind, ParseResult};
use crate::opcpp::node::Node;
use crate::opcpp::token::Kind;

fn open_block(kind: Kind) -> Option<(Kind, Kind)> {
    match kind {
        Kind::OpenBrace => Some((Kind::CloseBrace, Kind::BraceBlock)),
        Kind::OpenParen => Some((Kind::CloseParen, Kind::ParenBlock)),
        Kind::OpenBracket => Some((Kind::CloseBracket, Kind::BracketBlock)),
        _ => None,
    }
}

/// Group delimiter tokens into nested block composites.
///
/// Open/close delimiter tokens are consumed; a block composite holds only
/// its interior children. An unclosed delimiter is a premature-end
/// failure.
pub fn group_blocks(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    node.rewind();
    while let Some(kind) = node.peek_kind() {
        if open_block(kind).is_some() {
            let block = collect_block(node, ctx)?;
            let position = node.cursor();
            node.insert_child(position, block);
            node.seek(position + 1);
        } else {
            node.advance();
        }
    }
    Ok(())
}

fn collect_block(parent: &mut Node, ctx: &mut ParseContext) -> ParseResult<Node> {
    let open = parent.extract_at_cursor();
    let (close, composite) = open_block(open.kind()).expect("collect_block at non-delimiter");
    let mut block = Node::composite(composite, open.source().clone());
    loop {
        match parent.peek_kind() {
            Some(kind) if kind == close => {
                drop(parent.extract_at_cursor());
                return Ok(block);
            }
            Some(kind) if open_block(kind).is_some() => {
                let nested = collect_block(parent, ctx)?;
                block.push_child(nested);
            }
            Some(Kind::EndOfInput) | None => {
                return Err(ctx.failure(
                    FailureKind::Premature {
                        wanted: vec![close],
                    },
                    open.line(),
                ));
            }
            Some(_) => block.push_child(parent.extract_at_cursor()),
        }
    }
}

/// Reduce `name < ... >` spans to TemplateArgs composites.
///
/// Angle-bracket disambiguation is the conservative pre-block heuristic:
/// a `<` counts as an argument-list opener only when it directly follows
/// an identifier and a balancing `>` exists before any terminator or
/// grouped block. Everything else stays a comparison operator. Nested
/// argument lists stay raw inside the composite (the scanner folds `>>`
/// into plain punctuation, so deeply nested lists need the classic
/// `> >` spelling anyway).
pub fn template_args(node: &mut Node, _ctx: &mut ParseContext) -> ParseResult<()> {
    node.rewind();
    while !node.at_end() {
        let opener = node.peek_kind() == Some(Kind::Less)
            && node.peek_back().map(|prev| prev.kind()) == Some(Kind::Identifier);
        if !opener || balancing_greater(node).is_none() {
            node.advance();
            continue;
        }
        let less = node.extract_at_cursor();
        let mut args = Node::composite(Kind::TemplateArgs, less.source().clone());
        let mut depth = 1usize;
        loop {
            // Balance was verified above, so the matching `>` is there.
            let child = node.extract_at_cursor();
            match child.kind() {
                Kind::Less => depth += 1,
                Kind::Greater => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            args.push_child(child);
        }
        let position = node.cursor();
        node.insert_child(position, args);
        node.seek(position + 1);
    }
    Ok(())
}

/// Offset check for a balancing `>` before anything that rules out an
/// argument list.
fn balancing_greater(node: &Node) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, child) in node.children()[node.cursor() + 1..].iter().enumerate() {
        match child.kind() {
            Kind::Less => depth += 1,
            Kind::Greater => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + 1);
                }
            }
            Kind::Semicolon
            | Kind::BraceBlock
            | Kind::OpenBrace
            | Kind::CloseBrace
            | Kind::EndOfInput => return None,
            _ => {}
        }
    }
    None
}

/// Reduce `a :: b` chains to ScopedName composites carrying the joined
/// name.
pub fn scoped_names(node: &mut Node, _ctx: &mut ParseContext) -> ParseResult<()> {
    node.rewind();
    while !node.at_end() {
        let extendable = node.peek_kind() == Some(Kind::ScopeSep)
            && node
                .children()
                .get(node.cursor() + 1)
                .map(|next| next.kind() == Kind::Identifier)
                .unwrap_or(false);
        if !extendable {
            node.advance();
            continue;
        }
        match node.peek_back().map(|prev| prev.kind()) {
            Some(Kind::Identifier) => {
                let head = node.extract_before_cursor();
                drop(node.extract_at_cursor());
                let segment = node.extract_at_cursor();
                let mut scoped = Node::composite(Kind::ScopedName, head.source().clone());
                scoped.set_name(format!("{}::{}", head.text(), segment.text()));
                scoped.push_child(head);
                scoped.push_child(segment);
                let position = node.cursor();
                node.insert_child(position, scoped);
                node.seek(position);
            }
            Some(Kind::ScopedName) => {
                drop(node.extract_at_cursor());
                let segment = node.extract_at_cursor();
                let position = node.cursor() - 1;
                let scoped = node.child_mut(position);
                let joined = format!(
                    "{}::{}",
                    scoped.name().unwrap_or_default(),
                    segment.text()
                );
                scoped.set_name(joined);
                scoped.push_child(segment);
            }
            _ => node.advance(),
        }
    }
    Ok(())
}

/// Attach bracket blocks to the identifier they suffix: `buffer[16][4]`
/// becomes one ArrayedName composite. Depends on group_blocks having
/// turned the brackets into BracketBlock composites.
pub fn array_suffix(node: &mut Node, _ctx: &mut ParseContext) -> ParseResult<()> {
    node.rewind();
    while !node.at_end() {
        let suffixes = node.peek_kind() == Some(Kind::BracketBlock)
            && node.peek_back().map(|prev| prev.kind()) == Some(Kind::Identifier);
        if !suffixes {
            node.advance();
            continue;
        }
        let name = node.extract_before_cursor();
        let mut arrayed = Node::composite(Kind::ArrayedName, name.source().clone());
        arrayed.set_name(name.text());
        arrayed.push_child(name);
        while node.peek_kind() == Some(Kind::BracketBlock) {
            arrayed.push_child(node.extract_at_cursor());
        }
        let position = node.cursor();
        node.insert_child(position, arrayed);
        node.seek(position + 1);
    }
    Ok(())
}
