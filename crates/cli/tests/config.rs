mod common;

use assert_cmd::prelude::*;

use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use tempfile::tempdir;

#[test]
fn init_then_show() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;
    let file = home.path().join(".config").join("symtree").join("config.toml");

    common::symtree(home.path())?
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(contains("Configuration written"));
    assert!(file.exists());

    common::symtree(home.path())?
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(contains("already exists"));

    common::symtree(home.path())?
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            contains("[analysis]")
                .and(contains("nested_type_separator = \"$\""))
                .and(contains("default_package = \"default\"")),
        );
    Ok(())
}

#[test]
fn configured_separator_and_libraries_apply() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;
    let lib = home.path().join("demo.json");
    common::symtree(home.path())?
        .arg("library")
        .arg(common::fixtures().join("demo"))
        .args(["--group", "g", "--artifact", "a", "--version", "1"])
        .arg("--output")
        .arg(&lib)
        .arg("--quiet")
        .assert()
        .success();

    let dir = home.path().join(".config").join("symtree");
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("config.toml"),
        format!(
            "[analysis]\nnested_type_separator = \".\"\n\n[libraries]\npaths = [{:?}]\n",
            lib.display().to_string()
        ),
    )?;

    common::symtree(home.path())?
        .arg("lookup")
        .arg(common::fixtures().join("shapes"))
        .arg("geo.Circle.Builder")
        .arg("demo.A")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(
            contains("CLASS geo.Circle.Builder (application)")
                .and(contains("demo.A CLASS demo.A (library g:a:1)")),
        );
    Ok(())
}

#[test]
fn broken_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;
    let dir = home.path().join(".config").join("symtree");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("config.toml"), "[analysis\n")?;

    common::symtree(home.path())?
        .arg("analyze")
        .arg(common::fixtures().join("demo"))
        .assert()
        .failure()
        .stderr(contains("failed to load configuration"));
    Ok(())
}
