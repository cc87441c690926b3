//! The token type and the shared kind discriminant.
//!
//!     opC++ uses one discriminant space for scanned tokens and composite
//!     grammar nodes. A freshly scanned file is a flat list of terminal
//!     kinds; parsing replaces spans of terminals with composite kinds. The
//!     parser never needs to ask "is this a token or a node" - it only ever
//!     matches on kinds, and a kind is assumed to identify the runtime shape
//!     of the node carrying it.
//!
//!     Keywords get their own kinds rather than a keyword subfield because
//!     the recognizer passes disambiguate on kind alone. Punctuation the
//!     grammars never inspect is folded into the single `Punct` kind and
//!     passed through untouched (opC++ is a source-to-source tool; ordinary
//!     C++ text must survive the trip).

use std::fmt;

/// The discriminant shared by terminal tokens and composite nodes.
///
/// A bijection is assumed between a composite kind and the shape of the node
/// carrying it: a recognizer that builds a `Note` always gives it the Note
/// shape, and accessors downstream assert the kind before reading fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Kind {
    // Terminals produced by the scanner.
    Identifier,
    IntLiteral,
    StringLiteral,
    CharLiteral,
    Comment,

    // opC++ extension keywords.
    KwObject,
    KwEnum,
    KwDialect,
    KwNote,
    KwMap,
    KwCategory,
    KwData,
    KwFunction,
    KwLocation,

    // C++ modifier keywords the member grammars care about.
    KwStatic,
    KwVirtual,
    KwConst,
    KwMutable,
    KwInline,

    // Punctuation.
    Semicolon,
    Colon,
    ScopeSep,
    Comma,
    Assign,
    Star,
    Amp,
    Less,
    Greater,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    /// Any punctuation the grammars never inspect (passed through).
    Punct,

    /// End-of-input sentinel, always the last child of a source file.
    EndOfInput,

    // Composite kinds created by recognizer passes.
    SourceFile,
    BraceBlock,
    ParenBlock,
    BracketBlock,
    TemplateArgs,
    ScopedName,
    ArrayedName,

    Object,
    ObjectBody,
    BaseList,
    DataMember,
    FunctionMember,
    Params,

    Enumeration,
    EnumBody,
    EnumEntry,
    EntryValue,

    Dialect,
    DialectBody,
    Note,
    NoteBody,
    Map,
    MapBody,
    Category,
    CategoryBody,
    DataModifier,
    FunctionModifier,
    Location,
    LocationBody,
    Criteria,

    Statement,
    Modifiers,
}

impl Kind {
    /// Human-readable label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Identifier => "identifier",
            Kind::IntLiteral => "integer literal",
            Kind::StringLiteral => "string literal",
            Kind::CharLiteral => "character literal",
            Kind::Comment => "comment",
            Kind::KwObject => "`object`",
            Kind::KwEnum => "`enum`",
            Kind::KwDialect => "`dialect`",
            Kind::KwNote => "`note`",
            Kind::KwMap => "`map`",
            Kind::KwCategory => "`category`",
            Kind::KwData => "`data`",
            Kind::KwFunction => "`function`",
            Kind::KwLocation => "`location`",
            Kind::KwStatic => "`static`",
            Kind::KwVirtual => "`virtual`",
            Kind::KwConst => "`const`",
            Kind::KwMutable => "`mutable`",
            Kind::KwInline => "`inline`",
            Kind::Semicolon => "`;`",
            Kind::Colon => "`:`",
            Kind::ScopeSep => "`::`",
            Kind::Comma => "`,`",
            Kind::Assign => "`=`",
            Kind::Star => "`*`",
            Kind::Amp => "`&`",
            Kind::Less => "`<`",
            Kind::Greater => "`>`",
            Kind::OpenBrace => "`{`",
            Kind::CloseBrace => "`}`",
            Kind::OpenParen => "`(`",
            Kind::CloseParen => "`)`",
            Kind::OpenBracket => "`[`",
            Kind::CloseBracket => "`]`",
            Kind::Punct => "punctuation",
            Kind::EndOfInput => "end of input",
            Kind::SourceFile => "source file",
            Kind::BraceBlock => "brace block",
            Kind::ParenBlock => "parenthesized block",
            Kind::BracketBlock => "bracketed block",
            Kind::TemplateArgs => "template argument list",
            Kind::ScopedName => "scoped name",
            Kind::ArrayedName => "arrayed name",
            Kind::Object => "object declaration",
            Kind::ObjectBody => "object body",
            Kind::BaseList => "base list",
            Kind::DataMember => "data member",
            Kind::FunctionMember => "function member",
            Kind::Params => "parameter list",
            Kind::Enumeration => "enum declaration",
            Kind::EnumBody => "enum body",
            Kind::EnumEntry => "enum entry",
            Kind::EntryValue => "entry value",
            Kind::Dialect => "dialect declaration",
            Kind::DialectBody => "dialect body",
            Kind::Note => "note declaration",
            Kind::NoteBody => "note body",
            Kind::Map => "map declaration",
            Kind::MapBody => "map body",
            Kind::Category => "category declaration",
            Kind::CategoryBody => "category body",
            Kind::DataModifier => "data modifier declaration",
            Kind::FunctionModifier => "function modifier declaration",
            Kind::Location => "location declaration",
            Kind::LocationBody => "location body",
            Kind::Criteria => "criteria expression",
            Kind::Statement => "statement",
            Kind::Modifiers => "modifier list",
        }
    }

    /// Kinds that the residual-content check skips unconditionally:
    /// comments and the end-of-input sentinel are never content.
    pub fn is_filler(&self) -> bool {
        matches!(self, Kind::Comment | Kind::EndOfInput)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scanned token: kind, literal text, and 1-based source line.
///
/// Tokens are immutable once the scanner produces them. The parser wraps
/// each token in a terminal node and never looks back at the token list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub kind: Kind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: Kind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// The sentinel appended after the last real token of a file.
    pub fn end_of_input(line: usize) -> Self {
        Self::new(Kind::EndOfInput, "", line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} \"{}\"", self.kind, self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels_are_stable() {
        assert_eq!(Kind::Identifier.label(), "identifier");
        assert_eq!(Kind::Semicolon.label(), "`;`");
        assert_eq!(Kind::Note.label(), "note declaration");
    }

    #[test]
    fn test_filler_kinds() {
        assert!(Kind::Comment.is_filler());
        assert!(Kind::EndOfInput.is_filler());
        assert!(!Kind::Identifier.is_filler());
        assert!(!Kind::Statement.is_filler());
    }

    #[test]
    fn test_token_display_includes_text() {
        let token = Token::new(Kind::Identifier, "player", 3);
        assert_eq!(format!("{}", token), "identifier \"player\"");
        let sentinel = Token::end_of_input(10);
        assert_eq!(format!("{}", sentinel), "end of input");
    }
}
