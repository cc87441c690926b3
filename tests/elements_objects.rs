//! Unit tests for isolated object declarations
//!
//! Each test parses one declaration and verifies the reduced structure
//! with assert_node, not just node counts.

use opcpp::opcpp::testing::{assert_node, parse_fixture};
use opcpp::opcpp::token::Kind;

#[test]
fn test_object_empty_body() {
    let output = parse_fixture("object Empty { };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Object, |object| {
        object
            .name("Empty")
            .child_count(1)
            .find(Kind::ObjectBody, |body| {
                body.statement_count(0);
            });
    });
}

#[test]
fn test_object_with_base_list() {
    let output = parse_fixture("object Player : Entity, Serializable { };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Object, |object| {
        object.name("Player").find(Kind::BaseList, |bases| {
            bases
                .child_count(3)
                .child(0, |base| {
                    base.kind(Kind::Identifier).text("Entity");
                })
                .child(1, |comma| {
                    comma.kind(Kind::Comma);
                })
                .child(2, |base| {
                    base.kind(Kind::Identifier).text("Serializable");
                });
        });
    });
}

#[test]
fn test_data_member_keeps_type_span_as_modifiers() {
    let output = parse_fixture("object Player { static int health; };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Object, |object| {
        object.find(Kind::ObjectBody, |body| {
            body.statement_count(1)
                .statement(0, |member| {
                    member.kind(Kind::DataMember).name("health");
                })
                .statement_modifiers(0, |modifiers| {
                    modifiers
                        .child_count(2)
                        .child(0, |kw| {
                            kw.kind(Kind::KwStatic);
                        })
                        .child(1, |ty| {
                            ty.kind(Kind::Identifier).text("int");
                        });
                });
        });
    });
}

#[test]
fn test_function_member_recovers_name_behind_argument_list() {
    let output = parse_fixture("object Player { virtual void update(float dt) const; };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Object, |object| {
        object.find(Kind::ObjectBody, |body| {
            body.statement(0, |member| {
                member
                    .kind(Kind::FunctionMember)
                    .name("update")
                    .find(Kind::Params, |params| {
                        params
                            .child_count(2)
                            .child(0, |ty| {
                                ty.text("float");
                            })
                            .child(1, |arg| {
                                arg.text("dt");
                            });
                    });
            })
            // Leading keywords, the return type, and the trailing
            // qualifier all land in the modifier span.
            .statement_modifiers(0, |modifiers| {
                modifiers
                    .child_count(3)
                    .child(0, |kw| {
                        kw.kind(Kind::KwVirtual);
                    })
                    .child(1, |ty| {
                        ty.text("void");
                    })
                    .child(2, |kw| {
                        kw.kind(Kind::KwConst);
                    });
            });
        });
    });
}

#[test]
fn test_scoped_type_and_arrayed_name() {
    let output = parse_fixture("object Player { core::math::Vec3 waypoints[16]; };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Object, |object| {
        object.find(Kind::ObjectBody, |body| {
            body.statement(0, |member| {
                member
                    .kind(Kind::DataMember)
                    .name("waypoints")
                    .find(Kind::ArrayedName, |arrayed| {
                        arrayed.name("waypoints").child_count(2).child(1, |size| {
                            size.kind(Kind::BracketBlock).child_count(1);
                        });
                    });
            })
            .statement_modifiers(0, |modifiers| {
                modifiers.child(0, |ty| {
                    ty.kind(Kind::ScopedName).name("core::math::Vec3");
                });
            });
        });
    });
}

#[test]
fn test_templated_type_reduces_inside_body() {
    let output = parse_fixture("object Player { vector<int> scores; };");
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Object, |object| {
        object.find(Kind::ObjectBody, |body| {
            body.statement(0, |member| {
                member.kind(Kind::DataMember).name("scores");
            })
            .statement_modifiers(0, |modifiers| {
                modifiers
                    .child_count(2)
                    .child(0, |ty| {
                        ty.text("vector");
                    })
                    .child(1, |args| {
                        args.kind(Kind::TemplateArgs).child_count(1);
                    });
            });
        });
    });
}

#[test]
fn test_location_marker_partitions_members() {
    let output = parse_fixture(
        "object Player { int health; location serialization; int mana; };",
    );
    assert!(output.diagnostics.is_empty());

    assert_node(&output.root).find(Kind::Object, |object| {
        object.find(Kind::ObjectBody, |body| {
            body.statement_count(3)
                .statement(1, |marker| {
                    marker.kind(Kind::Location).name("serialization");
                })
                .statement(2, |member| {
                    member.kind(Kind::DataMember).name("mana");
                });
        });
    });
}

#[test]
fn test_static_mutable_data_member_is_rejected() {
    let output = parse_fixture("object Player { static mutable int health; };");
    assert_eq!(output.diagnostics.len(), 1);
    let message = output.diagnostics.entries()[0].to_string();
    assert!(
        message.contains("`static` cannot be combined with `mutable`"),
        "message: {message}"
    );
}

#[test]
fn test_virtual_static_function_member_reports_source_order() {
    let output = parse_fixture("object Player { virtual static void update(); };");
    assert_eq!(output.diagnostics.len(), 1);
    let message = output.diagnostics.entries()[0].to_string();
    assert!(
        message.contains("`virtual` cannot be combined with `static`"),
        "message: {message}"
    );
}
