//! The dialect declaration grammar and its nested bodies.
//!
//!     dialect game {
//!         note Header { #include "player.h" };
//!         map Serializable;
//!         category serializable {
//!             data pure;
//!             data expensive when size > 8;
//!             function virtual;
//!             location header { data pure; };
//!         };
//!     };
//!
//! A dialect body is a statement loop over note/map/category declarations.
//! Note and map bodies stay raw (their content is target-language text the
//! later generation stages splice verbatim); category and location bodies
//! get their own statement loops.

use crate::opcpp::context::{DialectEntry, ParseContext};
use crate::opcpp::diagnostics::{FailureKind, ParseResult};
use crate::opcpp::grammar::statements::{statement_parts, StatementLoop, StatementRule};
use crate::opcpp::grammar::{Grammar, Pass};
use crate::opcpp::node::Node;
use crate::opcpp::token::Kind;

/// File-level recognizer pass: reduce every `dialect NAME { ... }` span to
/// a Dialect composite. Depends on group_blocks.
pub fn recognize_dialects(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    node.rewind();
    while !node.at_end() {
        if node.peek_kind() != Some(Kind::KwDialect) {
            node.advance();
            continue;
        }
        let start = node.cursor();
        match recognize_dialect(node, ctx) {
            Ok(dialect) => {
                node.insert_child(start, dialect);
                node.seek(start + 1);
            }
            Err(failure) if !failure.is_fatal() => ctx.record(failure),
            Err(fatal) => return Err(fatal),
        }
    }
    Ok(())
}

fn recognize_dialect(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<Node> {
    let mut dialect = node.make(Kind::KwDialect, Kind::Dialect, ctx)?;
    drop(node.expect(Kind::KwDialect, ctx)?);
    let name = node.expect(Kind::Identifier, ctx)?;
    dialect.set_name(name.text());
    let block = node.expect(Kind::BraceBlock, ctx)?;
    dialect.push_child(Node::transform(block, Kind::DialectBody));
    Ok(dialect)
}

pub struct DialectGrammar;

impl Grammar for DialectGrammar {
    fn name(&self) -> &'static str {
        "dialect declaration"
    }

    /// Registration happens after the body has fully parsed, so the entry
    /// lists exactly the declarations that survived recovery.
    fn post_parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        let mut entry = DialectEntry {
            line: node.line(),
            ..DialectEntry::default()
        };
        if let Some(body) = node.find_child(Kind::DialectBody) {
            for statement in body.children_of_kind(Kind::Statement) {
                let (_, inner) = statement_parts(statement);
                let declared = inner.name().unwrap_or_default().to_string();
                match inner.kind() {
                    Kind::Note => entry.notes.push(declared),
                    Kind::Map => entry.maps.push(declared),
                    Kind::Category => entry.categories.push(declared),
                    _ => {}
                }
            }
        }
        let name = node.name().unwrap_or_default().to_string();
        if !ctx.registry.register(&name, entry) {
            let failure = ctx.failure(
                FailureKind::Disallow {
                    offending: format!("duplicate dialect declaration \"{}\"", name),
                },
                node.line(),
            );
            ctx.record(failure);
        }
        node.allow_only(&[Kind::DialectBody], ctx)
    }
}

/// Keyword-introduced `KIND NAME { body }` declaration, shared by notes,
/// maps, and categories. The brace block is optional for maps (`map
/// Serializable;` just marks the name).
fn recognize_keyworded(
    block: &mut Node,
    ctx: &mut ParseContext,
    keyword: Kind,
    composite: Kind,
    body: Kind,
    body_required: bool,
) -> ParseResult<Node> {
    let mut declaration = block.make(keyword, composite, ctx)?;
    drop(block.expect(keyword, ctx)?);
    let name = block.expect(Kind::Identifier, ctx)?;
    declaration.set_name(name.text());
    if body_required || block.peek_kind() == Some(Kind::BraceBlock) {
        let content = block.expect(Kind::BraceBlock, ctx)?;
        declaration.push_child(Node::transform(content, body));
    }
    Ok(declaration)
}

static DIALECT_RULES: &[StatementRule] = &[
    StatementRule {
        name: "note declaration",
        matches: |_buffer, block| block.peek_kind() == Some(Kind::KwNote),
        recognize: |_buffer, block, ctx| {
            recognize_keyworded(block, ctx, Kind::KwNote, Kind::Note, Kind::NoteBody, true)
        },
    },
    StatementRule {
        name: "map declaration",
        matches: |_buffer, block| block.peek_kind() == Some(Kind::KwMap),
        recognize: |_buffer, block, ctx| {
            recognize_keyworded(block, ctx, Kind::KwMap, Kind::Map, Kind::MapBody, false)
        },
    },
    StatementRule {
        name: "category declaration",
        matches: |_buffer, block| block.peek_kind() == Some(Kind::KwCategory),
        recognize: |_buffer, block, ctx| {
            recognize_keyworded(
                block,
                ctx,
                Kind::KwCategory,
                Kind::Category,
                Kind::CategoryBody,
                true,
            )
        },
    },
];

fn dialect_statements(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    StatementLoop {
        terminator: Kind::Semicolon,
        leading: &[Kind::KwNote, Kind::KwMap, Kind::KwCategory],
        rules: DIALECT_RULES,
    }
    .run(node, ctx)
}

pub struct DialectBodyGrammar;

impl Grammar for DialectBodyGrammar {
    fn name(&self) -> &'static str {
        "dialect body"
    }

    fn passes(&self) -> &[Pass] {
        &[dialect_statements]
    }

    fn recovers(&self) -> bool {
        true
    }

    fn post_parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        node.allow_only(&[Kind::Statement], ctx)
    }
}

/// `data NAME [criteria];` or `function NAME [criteria];` inside a
/// category. The criteria span stays raw up to the terminator.
fn recognize_modifier(
    block: &mut Node,
    ctx: &mut ParseContext,
    keyword: Kind,
    composite: Kind,
) -> ParseResult<Node> {
    let mut modifier = block.make(keyword, composite, ctx)?;
    drop(block.expect(keyword, ctx)?);
    let name = block.expect(Kind::Identifier, ctx)?;
    modifier.set_name(name.text());
    let criteria = block.push_until(Kind::Criteria, &[Kind::Semicolon], true, ctx)?;
    if criteria.child_count() > 0 {
        modifier.push_child(criteria);
    }
    Ok(modifier)
}

const DATA_MODIFIER_RULE: StatementRule = StatementRule {
    name: "data modifier",
    matches: |_buffer, block| block.peek_kind() == Some(Kind::KwData),
    recognize: |_buffer, block, ctx| {
        recognize_modifier(block, ctx, Kind::KwData, Kind::DataModifier)
    },
};

static CATEGORY_RULES: &[StatementRule] = &[
    DATA_MODIFIER_RULE,
    StatementRule {
        name: "function modifier",
        matches: |_buffer, block| block.peek_kind() == Some(Kind::KwFunction),
        recognize: |_buffer, block, ctx| {
            recognize_modifier(block, ctx, Kind::KwFunction, Kind::FunctionModifier)
        },
    },
    StatementRule {
        name: "location declaration",
        matches: |_buffer, block| block.peek_kind() == Some(Kind::KwLocation),
        recognize: |_buffer, block, ctx| {
            recognize_keyworded(
                block,
                ctx,
                Kind::KwLocation,
                Kind::Location,
                Kind::LocationBody,
                false,
            )
        },
    },
];

fn category_statements(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    StatementLoop {
        terminator: Kind::Semicolon,
        leading: &[Kind::KwData, Kind::KwFunction, Kind::KwLocation],
        rules: CATEGORY_RULES,
    }
    .run(node, ctx)
}

pub struct CategoryBodyGrammar;

impl Grammar for CategoryBodyGrammar {
    fn name(&self) -> &'static str {
        "category body"
    }

    fn passes(&self) -> &[Pass] {
        &[category_statements]
    }

    fn recovers(&self) -> bool {
        true
    }

    fn post_parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        node.allow_only(&[Kind::Statement], ctx)
    }
}

static LOCATION_RULES: &[StatementRule] = &[DATA_MODIFIER_RULE];

fn location_statements(node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
    StatementLoop {
        terminator: Kind::Semicolon,
        leading: &[Kind::KwData],
        rules: LOCATION_RULES,
    }
    .run(node, ctx)
}

pub struct LocationBodyGrammar;

impl Grammar for LocationBodyGrammar {
    fn name(&self) -> &'static str {
        "location body"
    }

    fn passes(&self) -> &[Pass] {
        &[location_statements]
    }

    fn recovers(&self) -> bool {
        true
    }

    fn post_parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        node.allow_only(&[Kind::Statement], ctx)
    }
}
