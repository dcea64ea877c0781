//! Lowering of well-formed Java declarations.

use crate::{parse_java, ParseStrategy};
use ir::ast::{CompilationUnit, MemberDecl, TypeDecl, TypeKind};
use std::fs;
use std::path::Path;

fn lower(code: &str) -> CompilationUnit {
    parse_java(code, "Snippet.java", ParseStrategy::Strict).expect("parse java snippet")
}

fn member_names(decl: &TypeDecl) -> Vec<String> {
    decl.members
        .iter()
        .flat_map(|m| match m {
            MemberDecl::Type(t) => vec![t.name.clone()],
            MemberDecl::Constructor(c) | MemberDecl::Method(c) => vec![c.name.clone()],
            MemberDecl::Field(f) => f.names.clone(),
            MemberDecl::EnumConstant(c) => vec![c.name.clone()],
        })
        .collect()
}

#[test]
fn package_and_imports() {
    let unit = lower(
        r#"package com.acme.util;
import java.util.List;
import java.io.*;
import static java.lang.Math.max;
import static java.util.Collections.*;
class A {}
"#,
    );
    assert_eq!(unit.package.unwrap().segments, vec!["com", "acme", "util"]);
    let imports: Vec<(String, bool, bool)> = unit
        .imports
        .iter()
        .map(|i| (i.path.clone(), i.is_static, i.on_demand))
        .collect();
    assert_eq!(
        imports,
        vec![
            ("java.util.List".to_string(), false, false),
            ("java.io".to_string(), false, true),
            ("java.lang.Math.max".to_string(), true, false),
            ("java.util.Collections".to_string(), true, true),
        ]
    );
}

#[test]
fn class_header() {
    let unit = lower(
        "public abstract class Box<T extends Number & Comparable<T>> extends Base implements Runnable, Cloneable {}",
    );
    let class = &unit.types[0];
    assert_eq!(class.kind, TypeKind::Class);
    assert_eq!(class.name, "Box");
    assert_eq!(class.modifiers, vec!["public", "abstract"]);
    assert_eq!(class.superclass.as_deref(), Some("Base"));
    assert_eq!(class.interfaces, vec!["Runnable", "Cloneable"]);
    assert_eq!(class.type_parameters.len(), 1);
    assert_eq!(class.type_parameters[0].name, "T");
    assert_eq!(class.type_parameters[0].bounds, vec!["Number", "Comparable<T>"]);
    assert_eq!(class.span.start_line, 1);
}

#[test]
fn members_and_parameters() {
    let unit = lower(
        r#"class A {
    private int a, b;
    A() {}
    A(final int x, String... rest) {}
    @Override
    public String toString() { return ""; }
    static <K> K pick(K[] keys) { return keys[0]; }
    class Inner {}
}
"#,
    );
    let class = &unit.types[0];
    assert_eq!(
        member_names(class),
        vec!["a", "b", "A", "A", "toString", "pick", "Inner"]
    );
    let MemberDecl::Constructor(ctor) = &class.members[2] else {
        panic!("expected constructor");
    };
    assert_eq!(ctor.parameters.len(), 2);
    assert_eq!(ctor.parameters[0].modifiers, vec!["final"]);
    assert!(ctor.parameters[1].variadic);
    assert_eq!(ctor.parameters[1].declared_type, "String");
    assert_eq!(ctor.signature(), "(int,String...)");
    let MemberDecl::Method(to_string) = &class.members[3] else {
        panic!("expected method");
    };
    assert_eq!(to_string.modifiers, vec!["@Override", "public"]);
    assert_eq!(to_string.return_type.as_deref(), Some("String"));
    let MemberDecl::Method(pick) = &class.members[4] else {
        panic!("expected method");
    };
    assert_eq!(pick.type_parameters[0].name, "K");
    assert_eq!(pick.signature(), "(K[])");
}

#[test]
fn interfaces_enums_and_annotations() {
    let unit = lower(
        r#"interface Shape extends Comparable<Shape> {
    int SIDES = 0;
    double area();
}
enum Color implements Shape {
    RED, GREEN { void shade() {} };
    private final int code = 1;
    Color() {}
}
@interface Marker { String value(); }
"#,
    );
    let shape = &unit.types[0];
    assert_eq!(shape.kind, TypeKind::Interface);
    assert_eq!(shape.interfaces, vec!["Comparable<Shape>"]);
    let MemberDecl::Field(sides) = &shape.members[0] else {
        panic!("expected constant");
    };
    assert!(sides.constant);

    let color = &unit.types[1];
    assert_eq!(color.kind, TypeKind::Enum);
    assert_eq!(color.interfaces, vec!["Shape"]);
    assert_eq!(member_names(color), vec!["RED", "GREEN", "code", "Color"]);
    let MemberDecl::EnumConstant(green) = &color.members[1] else {
        panic!("expected enum constant");
    };
    assert_eq!(green.body.as_ref().map(|b| b.len()), Some(1));
    assert!(color.has_constructor());

    let marker = &unit.types[2];
    assert_eq!(marker.kind, TypeKind::Annotation);
    assert_eq!(member_names(marker), vec!["value"]);
}

#[test]
fn local_and_anonymous_classes() {
    let unit = lower(
        r#"class Outer {
    Runnable task = new Runnable() { public void run() {} };
    void go() {
        class Local {}
        new Thread(new Runnable() { public void run() {} }).start();
    }
}
"#,
    );
    let outer = &unit.types[0];
    let MemberDecl::Type(anon) = &outer.members[1] else {
        panic!("expected anonymous class from field initializer");
    };
    assert!(anon.anonymous);
    assert_eq!(anon.name, "Runnable");
    let MemberDecl::Method(go) = &outer.members[2] else {
        panic!("expected method");
    };
    let names: Vec<(&str, bool)> = go
        .local_types
        .iter()
        .map(|t| (t.name.as_str(), t.anonymous))
        .collect();
    assert_eq!(names, vec![("Local", false), ("Runnable", true)]);
}

#[test]
fn parses_fixture_files() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/java/demo");
    let path = dir.join("B.java");
    let content = fs::read_to_string(&path).expect("fixture");
    let unit = parse_java(&content, &path.to_string_lossy(), ParseStrategy::Strict).unwrap();
    assert_eq!(unit.file_name(), "B.java");
    assert_eq!(unit.types[0].superclass.as_deref(), Some("A"));
}
