//! Unit tests for isolated enum declarations

use opcpp::opcpp::testing::{assert_node, parse_fixture};
use opcpp::opcpp::token::Kind;

#[test]
fn test_enum_entries_in_declaration_order() {
    let output = parse_fixture("enum Color { Red, Green, Blue };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Enumeration, |enumeration| {
        enumeration
            .name("Color")
            .find(Kind::EnumBody, |body| {
                body.statement_count(3)
                    .statement(0, |entry| {
                        entry.kind(Kind::EnumEntry).name("Red");
                    })
                    .statement(1, |entry| {
                        entry.kind(Kind::EnumEntry).name("Green");
                    })
                    .statement(2, |entry| {
                        entry.kind(Kind::EnumEntry).name("Blue");
                    });
            });
    });
}

#[test]
fn test_enum_entry_value_span_stays_raw() {
    let output = parse_fixture("enum Flags { None = 0, All = 1 << 4 };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Enumeration, |enumeration| {
        enumeration.find(Kind::EnumBody, |body| {
            body.statement(0, |entry| {
                entry
                    .name("None")
                    .find(Kind::EntryValue, |value| {
                        value.child_count(1).child(0, |literal| {
                            literal.kind(Kind::IntLiteral).text("0");
                        });
                    });
            })
            .statement(1, |entry| {
                // `1 << 4` survives as three raw tokens.
                entry.name("All").find(Kind::EntryValue, |value| {
                    value.child_count(3).child(1, |shift| {
                        shift.kind(Kind::Punct).text("<<");
                    });
                });
            });
        });
    });
}

#[test]
fn test_trailing_comma_is_a_null_statement() {
    let output = parse_fixture("enum Color { Red, Green, };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Enumeration, |enumeration| {
        enumeration.find(Kind::EnumBody, |body| {
            body.statement_count(2);
        });
    });
}

#[test]
fn test_enum_without_name_is_one_diagnostic() {
    let output = parse_fixture("enum { Red };");
    assert_eq!(output.diagnostics.len(), 1);
    let message = output.diagnostics.entries()[0].to_string();
    assert!(message.contains("expected identifier"), "message: {message}");
}
