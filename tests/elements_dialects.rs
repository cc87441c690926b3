//! Unit tests for dialect declarations and their nested bodies

use opcpp::opcpp::testing::{assert_node, parse_fixture};
use opcpp::opcpp::token::Kind;

#[test]
fn test_note_body_stays_raw() {
    let output = parse_fixture("dialect game { note Header { include x; } ; };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Dialect, |dialect| {
        dialect.name("game").find(Kind::DialectBody, |body| {
            body.statement(0, |note| {
                note.kind(Kind::Note)
                    .name("Header")
                    .find(Kind::NoteBody, |content| {
                        // Raw target-language span: three terminals, no
                        // statement structure.
                        content.child_count(3).child(2, |terminator| {
                            terminator.kind(Kind::Semicolon);
                        });
                    });
            });
        });
    });
}

#[test]
fn test_map_without_body() {
    let output = parse_fixture("dialect game { map Serializable; };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Dialect, |dialect| {
        dialect.find(Kind::DialectBody, |body| {
            body.statement(0, |map| {
                map.kind(Kind::Map).name("Serializable").child_count(0);
            });
        });
    });
}

#[test]
fn test_category_modifiers_and_criteria() {
    let output = parse_fixture(
        "dialect game { category serializable { data pure; function expensive when cost > 8; }; };",
    );
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Dialect, |dialect| {
        dialect.find(Kind::DialectBody, |body| {
            body.statement(0, |category| {
                category
                    .kind(Kind::Category)
                    .name("serializable")
                    .find(Kind::CategoryBody, |content| {
                        content
                            .statement_count(2)
                            .statement(0, |data| {
                                // No criteria span when nothing follows
                                // the name.
                                data.kind(Kind::DataModifier).name("pure").child_count(0);
                            })
                            .statement(1, |function| {
                                function
                                    .kind(Kind::FunctionModifier)
                                    .name("expensive")
                                    .find(Kind::Criteria, |criteria| {
                                        // `when cost > 8` stays a raw
                                        // four-token span.
                                        criteria.child_count(4).child(0, |word| {
                                            word.text("when");
                                        });
                                    });
                            });
                    });
            });
        });
    });
}

#[test]
fn test_location_with_body_nests_data_modifiers() {
    let output = parse_fixture(
        "dialect game { category serializable { location header { data pure; }; }; };",
    );
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Dialect, |dialect| {
        dialect.find(Kind::DialectBody, |body| {
            body.statement(0, |category| {
                category.find(Kind::CategoryBody, |content| {
                    content.statement(0, |location| {
                        location
                            .kind(Kind::Location)
                            .name("header")
                            .find(Kind::LocationBody, |inner| {
                                inner.statement_count(1).statement(0, |data| {
                                    data.kind(Kind::DataModifier).name("pure");
                                });
                            });
                    });
                });
            });
        });
    });
}

#[test]
fn test_registry_lists_surviving_declarations() {
    let output = parse_fixture(
        "dialect game { note Header { x }; map Fast; map Slow; category s { data pure; }; };",
    );
    assert!(output.diagnostics.is_empty());

    let entry = output.registry.get("game").expect("dialect registered");
    assert_eq!(entry.notes, vec!["Header"]);
    assert_eq!(entry.maps, vec!["Fast", "Slow"]);
    assert_eq!(entry.categories, vec!["s"]);
}

#[test]
fn test_duplicate_dialect_keeps_first_and_reports_second() {
    let output = parse_fixture(
        "dialect game { map First; }; dialect game { map Second; };",
    );
    assert_eq!(output.diagnostics.len(), 1);
    let message = output.diagnostics.entries()[0].to_string();
    assert!(
        message.contains("duplicate dialect declaration \"game\""),
        "message: {message}"
    );
    let entry = output.registry.get("game").expect("first entry wins");
    assert_eq!(entry.maps, vec!["First"]);
    assert_eq!(output.registry.len(), 1);
}

#[test]
fn test_note_missing_body_is_recovered_within_the_dialect() {
    let output = parse_fixture("dialect game { note Header; map Fast; };");
    assert_eq!(output.diagnostics.len(), 1);
    let message = output.diagnostics.entries()[0].to_string();
    assert!(message.contains("found `;`"), "message: {message}");

    // The malformed note is discarded; the map after it survives and is
    // registered.
    let entry = output.registry.get("game").expect("dialect registered");
    assert!(entry.notes.is_empty());
    assert_eq!(entry.maps, vec!["Fast"]);
}
