//! The enumeration grammar.
//!
//!     enum Color {
//!         Red,
//!         Green = 4,
//!         Blue
//!     };
//!
//! Entries are `,`-terminated statements; the trailing comma is optional
//! because a final entry ends at the body's end of input instead. An
//! entry's value span is everything after its `=`, kept raw.

use crate::opcpp::context::ParseContext;
use crate::opcpp::diagnostics::ParseResult;
use crate::opcpp::grammar::statements::{StatementLoop, StatementRule};
use crate::opcpp::grammar::{Grammar, Pass};
use crate::opcpp::node::Node;
use crate::opcpp::token::Kind;

/// File-level recognizer pass: reduce every `enum NAME { ... }` span to an
/// Enumeration composite. Depends on group_blocks.
pub fn recognize_enums(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    node.rewind();
    while !node.at_end() {
        if node.peek_kind() != Some(Kind::KwEnum) {
            node.advance();
            continue;
        }
        let start = node.cursor();
        match recognize_enum(node, ctx) {
            Ok(enumeration) => {
                node.insert_child(start, enumeration);
                node.seek(start + 1);
            }
            Err(failure) if !failure.is_fatal() => ctx.record(failure),
            Err(fatal) => return Err(fatal),
        }
    }
    Ok(())
}

fn recognize_enum(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<Node> {
    let mut enumeration = node.make(Kind::KwEnum, Kind::Enumeration, ctx)?;
    drop(node.expect(Kind::KwEnum, ctx)?);
    let name = node.expect(Kind::Identifier, ctx)?;
    enumeration.set_name(name.text());
    let block = node.expect(Kind::BraceBlock, ctx)?;
    enumeration.push_child(Node::transform(block, Kind::EnumBody));
    Ok(enumeration)
}

pub struct EnumerationGrammar;

impl Grammar for EnumerationGrammar {
    fn name(&self) -> &'static str {
        "enum declaration"
    }

    fn post_parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        node.allow_only(&[Kind::EnumBody], ctx)
    }
}

static ENUM_ENTRY_RULES: &[StatementRule] = &[StatementRule {
    name: "enum entry",
    matches: |buffer, _block| {
        buffer
            .children()
            .first()
            .map(|child| child.kind() == Kind::Identifier)
            .unwrap_or(false)
    },
    recognize: |buffer, _block, ctx| {
        buffer.rewind();
        let name = buffer.expect(Kind::Identifier, ctx)?;
        let mut entry = Node::composite(Kind::EnumEntry, name.source().clone());
        entry.set_name(name.text());
        entry.push_child(name);
        if buffer.peek_kind() == Some(Kind::Assign) {
            drop(buffer.extract_at_cursor());
            let value = buffer.push_until_end(Kind::EntryValue);
            entry.push_child(value);
        }
        Ok(entry)
    },
}];

fn enum_statements(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    StatementLoop {
        terminator: Kind::Comma,
        leading: &[],
        rules: ENUM_ENTRY_RULES,
    }
    .run(node, ctx)
}

pub struct EnumBodyGrammar;

impl Grammar for EnumBodyGrammar {
    fn name(&self) -> &'static str {
        "enum body"
    }

    fn passes(&self) -> &[Pass] {
        &[enum_statements]
    }

    fn recovers(&self) -> bool {
        true
    }

    fn post_parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        node.allow_only(&[Kind::Statement], ctx)
    }
}
