#![allow(dead_code)]

use engine::{run, Application, ComponentRef, EngineConfig};
use ir::ast::CompilationUnit;
use ir::{AttributeKind, Component, ComponentAttribute, ComponentKind, ComponentTree, Library};
use parsers::{parse_java, ParseStrategy};

pub fn unit(name: &str, src: &str) -> CompilationUnit {
    parse_java(src, name, ParseStrategy::Strict).expect("fixture parses")
}

pub fn analyze(files: &[(&str, &str)]) -> Application {
    analyze_with(files, Vec::new())
}

pub fn analyze_with(files: &[(&str, &str)], libraries: Vec<Library>) -> Application {
    let units: Vec<_> = files.iter().map(|(name, src)| unit(name, src)).collect();
    run(&units, EngineConfig::default(), libraries)
}

pub fn lookup(app: &Application, coordinate: &str) -> ComponentRef {
    app.find_component_by_unique_coordinate(coordinate)
        .unwrap_or_else(|| panic!("{coordinate} not found"))
}

pub fn children_of_kind(app: &Application, of: ComponentRef, kind: ComponentKind) -> Vec<ComponentRef> {
    app.children(of).filter(|c| app.get(*c).kind == kind).collect()
}

fn public() -> ComponentAttribute {
    ComponentAttribute::new(AttributeKind::Modifier, "public")
}

/// Tiny stand-in for the JDK: a handful of `java.lang` and `java.util` types.
pub fn jdk() -> Library {
    let mut tree = ComponentTree::new();
    let java = tree.add_new_child(tree.root(), Component::new(ComponentKind::Package, "java"));
    let lang = tree.add_new_child(java, Component::new(ComponentKind::Package, "lang"));
    for (kind, name) in [
        (ComponentKind::Class, "Object"),
        (ComponentKind::Class, "Enum"),
        (ComponentKind::Class, "String"),
        (ComponentKind::Interface, "Runnable"),
        (ComponentKind::Interface, "Comparable"),
    ] {
        tree.add_new_child(lang, Component::new(kind, name).with_attribute(public()));
    }
    let util = tree.add_new_child(java, Component::new(ComponentKind::Package, "util"));
    tree.add_new_child(
        util,
        Component::new(ComponentKind::Interface, "List").with_attribute(public()),
    );
    Library::new("org.openjdk", "jdk", "17", tree)
}
