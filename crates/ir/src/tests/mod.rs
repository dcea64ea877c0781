use super::*;
// Navigation, merge-support and export behaviour of the component arena.


fn sample() -> (ComponentTree, ComponentId, ComponentId, ComponentId) {
    let mut tree = ComponentTree::new();
    let a = tree.add_new_child(tree.root(), Component::new(ComponentKind::Package, "a"));
    let b = tree.add_new_child(a, Component::new(ComponentKind::Package, "b"));
    let foo = tree.add_new_child(
        b,
        Component::new(ComponentKind::Class, "Foo")
            .with_attribute(ComponentAttribute::new(AttributeKind::Modifier, "public")),
    );
    (tree, a, b, foo)
}

#[test]
fn add_child_sets_parent_link() {
    let (tree, a, b, foo) = sample();
    assert_eq!(tree.parent(foo), Some(b));
    assert_eq!(tree.parent(a), Some(tree.root()));
    assert_eq!(tree.children(b), &[foo]);
    assert!(tree.is_consistent());
}

#[test]
#[should_panic(expected = "already attached")]
fn attaching_twice_panics() {
    let (mut tree, a, _, foo) = sample();
    tree.add_child(a, foo);
}

#[test]
fn get_parents_stops_before_root() {
    let (tree, a, b, foo) = sample();
    assert_eq!(tree.get_parents(foo), vec![b, a]);
    assert!(tree.get_parents(a).is_empty());
    assert!(tree.has_parent_and_parent_is_not_root(foo));
    assert!(!tree.has_parent_and_parent_is_not_root(a));
}

#[test]
fn find_parent_by_type_returns_nearest() {
    let (mut tree, _, b, foo) = sample();
    let m = tree.add_new_child(foo, Component::new(ComponentKind::Method, "run").with_signature("()"));
    assert_eq!(tree.find_parent_by_type(m, ComponentKind::Package), Some(b));
    assert_eq!(tree.find_parent_by_type(m, ComponentKind::Class), Some(foo));
    assert_eq!(tree.find_parent_by_type(m, ComponentKind::Enum), None);
}

#[test]
fn unique_coordinate_uses_delimiter() {
    let (tree, _, _, foo) = sample();
    assert_eq!(tree.unique_coordinate(foo, "."), "a.b.Foo");
    assert_eq!(tree.unique_coordinate(foo, "/"), "a/b/Foo");
    assert_eq!(tree.unique_coordinate(tree.root(), "."), "");
}

#[test]
fn find_by_unique_coordinate_descends_segments() {
    let (mut tree, a, _, foo) = sample();
    // "bb" starts with "b" and must not shadow it.
    tree.add_new_child(a, Component::new(ComponentKind::Package, "bb"));
    assert_eq!(tree.find_by_unique_coordinate("a.b.Foo", "."), Some(foo));
    assert_eq!(tree.find_by_unique_coordinate("a.b.Bar", "."), None);
    assert_eq!(tree.find_by_unique_coordinate("", "."), None);
}

#[test]
fn find_child_honours_signature() {
    let (mut tree, _, _, foo) = sample();
    let run_int = tree.add_new_child(
        foo,
        Component::new(ComponentKind::Method, "run").with_signature("(int)"),
    );
    tree.add_new_child(
        foo,
        Component::new(ComponentKind::Method, "run").with_signature("(String)"),
    );
    let probe = Component::new(ComponentKind::Method, "run").with_signature("(int)");
    assert_eq!(tree.find_child(foo, &probe), Some(run_int));
    assert_eq!(tree.find_children_by_value(foo, "run").len(), 2);
    assert_eq!(tree.find_children_by_type(foo, ComponentKind::Method).len(), 2);
    let field = Component::new(ComponentKind::Field, "run");
    assert_eq!(tree.find_child(foo, &field), None);
}

#[test]
fn attribute_queries() {
    let (mut tree, _, _, foo) = sample();
    let node = tree.get_mut(foo);
    assert!(node.has_modifier("public"));
    assert!(!node.add_attribute_if_absent(ComponentAttribute::new(AttributeKind::Modifier, "public")));
    assert!(node.add_attribute_if_absent(ComponentAttribute::new(AttributeKind::Modifier, "final")));
    assert_eq!(node.find_attributes_by_type(AttributeKind::Modifier).count(), 2);
    assert_eq!(node.find_attributes_by_value("final").count(), 1);
    assert!(!node.has_attribute_with_type(AttributeKind::ExtendsType));
}

#[test]
fn copy_subtree_relocates_into_other_arena() {
    let (source, a, _, _) = sample();
    let mut target = ComponentTree::new();
    let copied = target.copy_subtree(target.root(), &source, a);
    assert_eq!(target.len(), 4);
    assert_eq!(target.unique_coordinate(copied, "."), "a");
    let foo = target.find_by_unique_coordinate("a.b.Foo", ".").expect("copied class");
    assert!(target.get(foo).has_modifier("public"));
    assert!(target.is_consistent());
}

#[test]
fn descendants_are_pre_order() {
    let (tree, a, b, foo) = sample();
    assert_eq!(tree.descendants(tree.root()), vec![a, b, foo]);
}

#[test]
fn canonical_outline_ignores_insertion_order() {
    let mut left = ComponentTree::new();
    let mut right = ComponentTree::new();
    for name in ["A", "B"] {
        left.add_new_child(left.root(), Component::new(ComponentKind::Class, name));
    }
    for name in ["B", "A"] {
        right.add_new_child(right.root(), Component::new(ComponentKind::Class, name));
    }
    assert_ne!(left.to_text(), right.to_text());
    assert_eq!(left.canonical_outline(), right.canonical_outline());
}

#[test]
fn component_tree_json_keeps_links() {
    let (tree, _, _, _) = sample();
    let json = tree.to_json().unwrap();
    let back: ComponentTree = serde_json::from_str(&json).unwrap();
    assert!(back.is_consistent());
    assert_eq!(back.to_text(), tree.to_text());
}

#[test]
fn dot_export_lists_edges() {
    let (tree, a, b, _) = sample();
    let dot = tree.to_dot();
    assert!(dot.starts_with("digraph Components {"));
    assert!(dot.contains(&format!("{} -> {};", a.index(), b.index())));
    assert!(dot.contains("CLASS:Foo"));
}

#[test]
fn import_kind_classification() {
    assert_eq!(ImportKind::classify(false, false), ImportKind::Single);
    assert_eq!(ImportKind::classify(false, true), ImportKind::OnDemand);
    assert_eq!(ImportKind::classify(true, false), ImportKind::Static);
    assert_eq!(ImportKind::classify(true, true), ImportKind::StaticOnDemand);
    assert!(ImportKind::StaticOnDemand.is_on_demand());
}

#[test]
fn library_coordinates() {
    let lib = Library::new("org.demo", "core", "1.0", ComponentTree::new());
    assert_eq!(lib.coordinates(), "org.demo:core:1.0");
}
