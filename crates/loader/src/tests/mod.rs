use super::*;
use ir::{Component, ComponentKind, ComponentTree, Library};
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

fn is_java(p: &Path) -> bool {
    p.extension().is_some_and(|e| e == "java")
}

#[test]
fn collects_java_sources_sorted() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path();
    fs::create_dir_all(base.join("src/b")).unwrap();
    fs::create_dir_all(base.join("target")).unwrap();
    fs::write(base.join("src/b/Z.java"), "class Z {}").unwrap();
    fs::write(base.join("src/A.java"), "class A {}").unwrap();
    fs::write(base.join("src/notes.txt"), "").unwrap();
    fs::write(base.join("target/Gen.java"), "class Gen {}").unwrap();

    let excludes = |p: &Path| p.ends_with("target");
    let found = collect_sources(base, &excludes, &is_java).unwrap();
    let rel: Vec<PathBuf> = found
        .iter()
        .map(|p| p.strip_prefix(base).unwrap().to_path_buf())
        .collect();
    assert_eq!(rel, vec![PathBuf::from("src/A.java"), PathBuf::from("src/b/Z.java")]);
}

#[test]
fn single_file_root_is_accepted() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("One.java");
    fs::write(&file, "class One {}").unwrap();
    let found = collect_sources(&file, &|_| false, &is_java).unwrap();
    assert_eq!(found, vec![file]);
}

#[cfg(unix)]
#[test]
fn symlink_loops_terminate() {
    use std::os::unix::fs as unix_fs;

    let tmp = TempDir::new().unwrap();
    let base = tmp.path();
    fs::create_dir_all(base.join("a")).unwrap();
    fs::write(base.join("a/A.java"), "class A {}").unwrap();
    unix_fs::symlink(base, base.join("a/loop")).unwrap();

    let found: BTreeSet<PathBuf> = collect_sources(base, &|_| false, &is_java)
        .unwrap()
        .into_iter()
        .map(|p| p.strip_prefix(base).unwrap().to_path_buf())
        .collect();
    assert_eq!(found, BTreeSet::from([PathBuf::from("a/A.java")]));
}

#[test]
fn revision_changes_with_content() {
    let a = SourceFile {
        path: "A.java".into(),
        content: "class A {}".into(),
    };
    let mut edited = a.clone();
    edited.content.push(' ');
    assert_ne!(revision_id(&[a]), revision_id(&[edited]));
}

#[test]
fn read_source_reports_missing_file() {
    let tmp = TempDir::new().unwrap();
    let err = read_source(&tmp.path().join("Nope.java")).unwrap_err();
    assert!(err.to_string().contains("Failed to read file"));
}

#[test]
fn library_save_and_load() {
    let tmp = TempDir::new().unwrap();
    let mut tree = ComponentTree::new();
    let java = tree.add_new_child(tree.root(), Component::new(ComponentKind::Package, "java"));
    let lang = tree.add_new_child(java, Component::new(ComponentKind::Package, "lang"));
    tree.add_new_child(lang, Component::new(ComponentKind::Class, "Object"));
    let lib = Library::new("jdk", "rt", "17", tree);

    let path = tmp.path().join("libs/rt.json");
    save_library(&lib, &path).unwrap();
    let loaded = load_libraries(&[path]).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].coordinates(), "jdk:rt:17");
    assert!(loaded[0]
        .components
        .find_by_unique_coordinate("java.lang.Object", ".")
        .is_some());
}

#[test]
fn malformed_library_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(&path, "{\"group_id\": \"g\"}").unwrap();
    let err = load_library(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse library"));
}
