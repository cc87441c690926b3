//! The object declaration grammar.
//!
//!     object Player : Entity, Serializable {
//!         location serialization;
//!         static int instance_count;
//!         virtual void update(float dt);
//!         core::Vec3 position;
//!         int inventory[64];
//!     };
//!
//! The body is a statement loop over `;`-terminated members. Priority
//! order matters: a location marker is keyword-introduced, a function
//! member is anything carrying an argument list, and a data member is the
//! catch-all for a span ending in a (possibly arrayed) name. Everything
//! before the recognized name is the member's modifier span.

use crate::opcpp::context::ParseContext;
use crate::opcpp::diagnostics::ParseResult;
use crate::opcpp::grammar::statements::{statement_parts, StatementLoop, StatementRule};
use crate::opcpp::grammar::{capabilities, Grammar, Pass};
use crate::opcpp::node::Node;
use crate::opcpp::token::Kind;

/// File-level recognizer pass: reduce every `object NAME [: bases] { ... }`
/// span to an Object composite. Depends on group_blocks.
pub fn recognize_objects(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    node.rewind();
    while !node.at_end() {
        if node.peek_kind() != Some(Kind::KwObject) {
            node.advance();
            continue;
        }
        let start = node.cursor();
        match recognize_object(node, ctx) {
            Ok(object) => {
                node.insert_child(start, object);
                node.seek(start + 1);
            }
            // The keyword is consumed before anything can fail, so the
            // scan always progresses.
            Err(failure) if !failure.is_fatal() => ctx.record(failure),
            Err(fatal) => return Err(fatal),
        }
    }
    Ok(())
}

fn recognize_object(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<Node> {
    let mut object = node.make(Kind::KwObject, Kind::Object, ctx)?;
    drop(node.expect(Kind::KwObject, ctx)?);
    let name = node.expect(Kind::Identifier, ctx)?;
    object.set_name(name.text());
    if node.peek_kind() == Some(Kind::Colon) {
        drop(node.extract_at_cursor());
        let bases = node.push_until(Kind::BaseList, &[Kind::BraceBlock], true, ctx)?;
        object.push_child(bases);
    }
    let block = node.expect(Kind::BraceBlock, ctx)?;
    object.push_child(Node::transform(block, Kind::ObjectBody));
    Ok(object)
}

pub struct ObjectGrammar;

impl Grammar for ObjectGrammar {
    fn name(&self) -> &'static str {
        "object declaration"
    }

    fn post_parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        node.allow_only(&[Kind::BaseList, Kind::ObjectBody], ctx)
    }
}

/// The name a member declares: plain identifier text, or the synthesized
/// name of an arrayed name.
fn declared_name(node: &Node) -> String {
    match node.name() {
        Some(name) => name.to_string(),
        None => node.text().to_string(),
    }
}

static OBJECT_MEMBER_RULES: &[StatementRule] = &[
    StatementRule {
        name: "location marker",
        matches: |_buffer, block| block.peek_kind() == Some(Kind::KwLocation),
        recognize: |_buffer, block, ctx| {
            let mut location = block.make(Kind::KwLocation, Kind::Location, ctx)?;
            drop(block.expect(Kind::KwLocation, ctx)?);
            let name = block.expect(Kind::Identifier, ctx)?;
            location.set_name(name.text());
            Ok(location)
        },
    },
    StatementRule {
        name: "function member",
        matches: |buffer, _block| {
            buffer
                .children()
                .iter()
                .any(|child| child.kind() == Kind::ParenBlock)
        },
        recognize: |buffer, _block, ctx| {
            let position = buffer
                .children()
                .iter()
                .position(|child| child.kind() == Kind::ParenBlock)
                .expect("function rule matched without an argument list");
            // Consume the argument list, then recover the name sitting
            // immediately behind it.
            buffer.seek(position);
            let params = buffer.expect(Kind::ParenBlock, ctx)?;
            let name = buffer.reverse_expect(Kind::Identifier, ctx)?;
            let mut member = Node::composite(Kind::FunctionMember, name.source().clone());
            member.set_name(name.text());
            member.push_child(name);
            member.push_child(Node::transform(params, Kind::Params));
            buffer.rewind();
            Ok(member)
        },
    },
    StatementRule {
        name: "data member",
        matches: |buffer, _block| {
            buffer.child_count() >= 2
                && matches!(
                    buffer.children().last().map(|child| child.kind()),
                    Some(Kind::Identifier) | Some(Kind::ArrayedName)
                )
        },
        recognize: |buffer, _block, ctx| {
            buffer.seek_end();
            let name = buffer.reverse_expect_any(&[Kind::Identifier, Kind::ArrayedName], ctx)?;
            let mut member = Node::composite(Kind::DataMember, name.source().clone());
            member.set_name(declared_name(&name));
            member.push_child(name);
            buffer.rewind();
            Ok(member)
        },
    },
];

fn object_statements(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    StatementLoop {
        terminator: Kind::Semicolon,
        leading: &[Kind::KwLocation],
        rules: OBJECT_MEMBER_RULES,
    }
    .run(node, ctx)
}

pub struct ObjectBodyGrammar;

impl Grammar for ObjectBodyGrammar {
    fn name(&self) -> &'static str {
        "object body"
    }

    fn passes(&self) -> &[Pass] {
        &[
            capabilities::template_args,
            capabilities::scoped_names,
            capabilities::array_suffix,
            object_statements,
        ]
    }

    fn recovers(&self) -> bool {
        true
    }

    fn post_parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        // Modifier sanity per member kind. Each violation is one buffered
        // diagnostic; the body itself stays valid.
        for index in 0..node.child_count() {
            let statement = node.child(index);
            if statement.kind() != Kind::Statement {
                continue;
            }
            let (modifiers, inner) = statement_parts(statement);
            let Some(modifiers) = modifiers else { continue };
            let checked = match inner.kind() {
                Kind::DataMember => modifiers.disallow_both(Kind::KwStatic, Kind::KwMutable, ctx),
                Kind::FunctionMember => {
                    modifiers.disallow_both(Kind::KwVirtual, Kind::KwStatic, ctx)
                }
                _ => Ok(()),
            };
            if let Err(failure) = checked {
                ctx.record(failure);
            }
        }
        node.allow_only(&[Kind::Statement], ctx)
    }
}
