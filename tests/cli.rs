use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cardify(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cardify").unwrap();
    cmd.current_dir(temp.path())
        .env("CARDIFY_GLOBAL_DATA", temp.path().join("global"))
        .env_remove("RUST_LOG");
    cmd
}

fn create(temp: &TempDir, args: &[&str]) {
    cardify(temp).arg("create").args(args).assert().success();
}

#[test]
fn test_create_and_list() {
    let temp = TempDir::new().unwrap();
    cardify(&temp)
        .args(["create", "Team", "Badge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Template created: Team Badge (1050 x 600)"));

    cardify(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Team Badge (1050 x 600, 0 nodes)"));

    assert!(temp.path().join(".cardify").join("index.json").exists());
}

#[test]
fn test_naked_invocation_lists() {
    let temp = TempDir::new().unwrap();
    cardify(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates found."));
}

#[test]
fn test_edit_with_inline_ops() {
    let temp = TempDir::new().unwrap();
    create(&temp, &["Badge"]);

    cardify(&temp)
        .args([
            "edit",
            "badge",
            "--op",
            r#"{"op":"redo"}"#,
            "--op",
            r#"{"op":"add","node":{"type":"text","geometry":{"x":60,"y":60,"width":400,"height":40},"content":"Ada Lovelace"}}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to redo"))
        .stdout(predicate::str::contains("Template saved: Badge (1 edit(s), 1 node(s))"));

    cardify(&temp)
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0] text"))
        .stdout(predicate::str::contains("\"Ada Lovelace\""));
}

#[test]
fn test_edit_script_from_stdin() {
    let temp = TempDir::new().unwrap();
    create(&temp, &["Badge"]);

    let script = r#"
# two nodes, then take the second back
{"op": "add", "node": {"type": "shape", "geometry": {"x": 0, "y": 0, "width": 1050, "height": 600}, "shape": "rect"}}
{"op": "add", "node": {"type": "logo", "geometry": {"x": 900, "y": 40, "width": 100, "height": 100}, "src": "logo.svg"}}
{"op": "undo"}
"#;
    cardify(&temp)
        .args(["edit", "1", "--script", "-"])
        .write_stdin(script)
        .assert()
        .success();

    cardify(&temp)
        .args(["layout", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shape"))
        .stdout(predicate::str::contains("logo").not());
}

#[test]
fn test_rejected_edit_fails_and_keeps_template() {
    let temp = TempDir::new().unwrap();
    create(&temp, &["Badge"]);

    cardify(&temp)
        .args(["edit", "1", "--op", r#"{"op":"remove","index":3}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Edit rejected: step 1"));

    cardify(&temp)
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("0 nodes"));
}

#[test]
fn test_layout_resolves_relative_geometry() {
    let temp = TempDir::new().unwrap();
    create(&temp, &["--width", "1000", "--height", "500", "--relative", "Rel"]);

    cardify(&temp)
        .args([
            "edit",
            "rel",
            "--op",
            r#"{"op":"add","node":{"type":"text","geometry":{"x":10,"y":20,"width":50,"height":10},"content":"Hi"}}"#,
        ])
        .assert()
        .success();

    cardify(&temp)
        .args(["layout", "rel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100,100 500x50"));
}

#[test]
fn test_validate_file_reports_errors() {
    let temp = TempDir::new().unwrap();
    let bad = temp.path().join("bad.json");
    fs::write(
        &bad,
        r#"{"metadata": {"name": "Bad", "width": 0, "height": 600}, "document": []}"#,
    )
    .unwrap();

    cardify(&temp)
        .args(["validate", "--file"])
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("metadata.width: must be greater than zero"));
}

#[test]
fn test_export_then_import_into_global() {
    let temp = TempDir::new().unwrap();
    create(&temp, &["Front"]);
    create(&temp, &["Back"]);
    let bundle = temp.path().join("cards.tar.gz");

    cardify(&temp)
        .arg("export")
        .arg("--output")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 template(s)"));

    cardify(&temp)
        .arg("-g")
        .arg("import")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total imported: 2"));

    cardify(&temp)
        .args(["list", "--global"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Front"))
        .stdout(predicate::str::contains("Back"));
}

#[test]
fn test_config_set_and_get() {
    let temp = TempDir::new().unwrap();
    cardify(&temp)
        .args(["config", "history-limit", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("history-limit set to 20"));

    cardify(&temp)
        .args(["config", "history-limit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20"));

    cardify(&temp)
        .args(["config", "colour", "red"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_selector_fails() {
    let temp = TempDir::new().unwrap();
    cardify(&temp)
        .args(["view", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index 7 not found"));
}

#[test]
fn test_help_is_grouped() {
    let temp = TempDir::new().unwrap();
    cardify(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Per-Template Commands:"));
}
