//! The file-level grammar.
//!
//! A source file is mostly passthrough target-language code with extended
//! declarations (`object`, `enum`, `dialect`) mixed in. The file grammar
//! therefore groups blocks, reduces the generic name shapes, and then
//! recognizes each declaration form in place; everything left over is
//! checked against the passthrough whitelist.

use crate::opcpp::context::ParseContext;
use crate::opcpp::diagnostics::ParseResult;
use crate::opcpp::grammar::{capabilities, dialects, enums, objects, Grammar, Pass};
use crate::opcpp::node::Node;
use crate::opcpp::token::{Kind, Token};

/// What may remain at file level once every declaration is recognized:
/// ordinary target-language tokens and the recognized declarations
/// themselves. The extension keywords are reserved, so any one of them
/// left unconsumed is a stray.
const FILE_ALLOWED: &[Kind] = &[
    Kind::Identifier,
    Kind::IntLiteral,
    Kind::StringLiteral,
    Kind::CharLiteral,
    Kind::KwStatic,
    Kind::KwVirtual,
    Kind::KwConst,
    Kind::KwMutable,
    Kind::KwInline,
    Kind::Semicolon,
    Kind::Colon,
    Kind::ScopeSep,
    Kind::Comma,
    Kind::Assign,
    Kind::Star,
    Kind::Amp,
    Kind::Less,
    Kind::Greater,
    Kind::Punct,
    Kind::BraceBlock,
    Kind::ParenBlock,
    Kind::BracketBlock,
    Kind::TemplateArgs,
    Kind::ScopedName,
    Kind::ArrayedName,
    Kind::Object,
    Kind::Enumeration,
    Kind::Dialect,
];

pub struct SourceFileGrammar;

impl Grammar for SourceFileGrammar {
    fn name(&self) -> &'static str {
        "source file"
    }

    /// Guarantee the end-of-input sentinel so every downstream primitive
    /// can distinguish premature end from wrong token.
    fn pre_parse(&self, node: &mut Node, _ctx: &mut ParseContext) -> ParseResult<()> {
        let has_sentinel = node
            .children()
            .last()
            .map(|last| last.kind() == Kind::EndOfInput)
            .unwrap_or(false);
        if !has_sentinel {
            let line = node.children().last().map(|last| last.line()).unwrap_or(1);
            let file = node.source().file.clone();
            node.push_child(Node::terminal(Token::end_of_input(line), &file));
        }
        Ok(())
    }

    fn passes(&self) -> &[Pass] {
        &[
            capabilities::group_blocks,
            capabilities::template_args,
            capabilities::scoped_names,
            objects::recognize_objects,
            enums::recognize_enums,
            dialects::recognize_dialects,
        ]
    }

    fn recovers(&self) -> bool {
        true
    }

    fn post_parse(&self, node: &mut Node, ctx: &mut ParseContext) -> ParseResult<()> {
        node.allow_only(FILE_ALLOWED, ctx)
    }
}
