mod common;

use assert_cmd::prelude::*;

use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use tempfile::tempdir;

#[test]
fn nested_type_reports_qualified_name() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;
    common::symtree(home.path())?
        .arg("lookup")
        .arg(common::fixtures().join("shapes"))
        .arg("geo.Circle.Builder")
        .arg("geo.Shape.PI")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(
            contains("geo.Circle.Builder CLASS geo.Circle$Builder (application)")
                .and(contains("modifier=static"))
                .and(contains("geo.Shape.PI FIELD"))
                .and(contains("modifier=final")),
        );
    Ok(())
}

#[test]
fn overloads_print_their_signature() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;
    common::symtree(home.path())?
        .arg("lookup")
        .arg(common::fixtures().join("shapes"))
        .arg("geo.Circle.total")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(contains("signature (List<Circle>,double...)").and(contains("returns=double")));
    Ok(())
}

#[test]
fn missing_coordinate_exits_with_failure() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;
    common::symtree(home.path())?
        .arg("lookup")
        .arg(common::fixtures().join("demo"))
        .arg("demo.A")
        .arg("demo.Missing")
        .arg("--quiet")
        .assert()
        .code(1)
        .stdout(contains("demo.A CLASS demo.A").and(contains("demo.Missing not found")));
    Ok(())
}

#[test]
fn library_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let lib = tmp.path().join("libs").join("demo.json");
    common::symtree(tmp.path())?
        .arg("library")
        .arg(common::fixtures().join("demo"))
        .args(["--group", "org.demo", "--artifact", "demo", "--version", "1.0"])
        .arg("--output")
        .arg(&lib)
        .assert()
        .success()
        .stderr(contains("Library saved"));
    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&lib)?)?;
    assert_eq!(saved["group_id"], "org.demo");
    assert_eq!(saved["revision_id"].as_str().map(str::len), Some(64));

    let src = tmp.path().join("src");
    fs::create_dir(&src)?;
    fs::write(
        src.join("C.java"),
        "package other; import demo.A; public class C extends A { }",
    )?;
    common::symtree(tmp.path())?
        .arg("lookup")
        .arg(&src)
        .arg("other.C")
        .arg("demo.B")
        .arg("--library")
        .arg(&lib)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(
            contains("extends=demo.A")
                .and(contains("demo.B CLASS demo.B (library org.demo:demo:1.0)")),
        );
    Ok(())
}
