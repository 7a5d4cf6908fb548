// CLI behaviour against fixture files in a scratch directory

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn write_fixture(dir: &Path, branches: serde_json::Value) {
    let fixture = serde_json::json!({
        "records": [
            {
                "id": "42",
                "name": "Mary Jackson",
                "dateOfBirth": "1921-04-09",
                "branchId": "9",
                "memberNumber": 7
            }
        ],
        "branches": branches
    });
    std::fs::write(
        dir.join("record-workflow.json"),
        serde_json::to_string_pretty(&fixture).unwrap(),
    )
    .unwrap();
}

fn two_branches() -> serde_json::Value {
    serde_json::json!([
        { "id": "1", "name": "Main Branch" },
        { "id": "2", "name": "Harbour Branch" }
    ])
}

fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("record-workflow").unwrap();
    cmd.current_dir(dir.path()).env("RUST_LOG", "error");
    cmd
}

fn read_fixture(dir: &TempDir) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.path().join("record-workflow.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("init-config"));
}

#[test]
fn test_show_marks_stale_branch() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), two_branches());

    cli(&dir)
        .args(["show", "--id", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mary Jackson"))
        .stdout(predicate::str::contains("9 (inactive)"))
        .stdout(predicate::str::contains("Harbour Branch"));
}

#[test]
fn test_show_unknown_record_fails() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), two_branches());

    cli(&dir)
        .args(["show", "--id", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Record not found"));
}

#[test]
fn test_show_without_branches_warns_and_uses_defaults() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), serde_json::json!([]));

    cli(&dir)
        .args(["show", "--id", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active branches"))
        .stdout(predicate::str::contains("South Branch"));
}

#[test]
fn test_edit_saves_fixture_and_navigates() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), two_branches());

    cli(&dir)
        .args(["edit", "--id", "42", "--branch-id", "2", "--name", "Mary W. Jackson"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Record updated"))
        .stdout(predicate::str::contains("/members"));

    let saved = read_fixture(&dir);
    let record = &saved["records"][0];
    assert_eq!(record["branchId"], "2");
    assert_eq!(record["name"], "Mary W. Jackson");
    assert_eq!(record["memberNumber"], 7);
    assert_eq!(saved["branches"], two_branches());
}

#[test]
fn test_edit_keeping_stale_branch_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), two_branches());

    cli(&dir)
        .args(["edit", "--id", "42", "--name", "Mary W. Jackson"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("selected reference does not exist"));

    assert_eq!(read_fixture(&dir)["records"][0]["name"], "Mary Jackson");
}

#[test]
fn test_edit_rejects_malformed_date_before_submitting() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), two_branches());

    cli(&dir)
        .args(["edit", "--id", "42", "--branch-id", "1", "--date-of-birth", "09/04/1921"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));

    assert_eq!(read_fixture(&dir)["records"][0]["branchId"], "9");
}

#[test]
fn test_config_file_changes_success_route() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), two_branches());
    std::fs::write(
        dir.path().join("custom.toml"),
        "[workflow]\nsuccess_route = \"/branches/2/members\"\ncancel_route = \"/members\"\n",
    )
    .unwrap();

    cli(&dir)
        .args(["--config", "custom.toml", "edit", "--id", "42", "--branch-id", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/branches/2/members"));
}

#[test]
fn test_env_overrides_default_success_route() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), two_branches());

    cli(&dir)
        .env("RECORD_WORKFLOW__WORKFLOW__SUCCESS_ROUTE", "/from-env")
        .args(["edit", "--id", "42", "--branch-id", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/from-env"));
}

#[test]
fn test_env_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), two_branches());
    std::fs::write(
        dir.path().join("custom.toml"),
        "[workflow]\nsuccess_route = \"/from-file\"\ncancel_route = \"/members\"\n",
    )
    .unwrap();

    cli(&dir)
        .env("RECORD_WORKFLOW__WORKFLOW__SUCCESS_ROUTE", "/from-env")
        .args(["--config", "custom.toml", "edit", "--id", "42", "--branch-id", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/from-env"))
        .stdout(predicate::str::contains("/from-file").not());
}

#[test]
fn test_malformed_env_file_fails_with_and_without_config_flag() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), two_branches());
    std::fs::write(dir.path().join(".env"), "this line is not an assignment\n").unwrap();
    std::fs::write(dir.path().join("custom.toml"), "[workflow]\n").unwrap();

    cli(&dir).args(["show", "--id", "42"]).assert().failure();
    cli(&dir)
        .args(["--config", "custom.toml", "show", "--id", "42"])
        .assert()
        .failure();
}

#[test]
fn test_init_config_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();

    cli(&dir).arg("init-config").assert().success();
    assert!(dir.path().join("record-workflow.toml").exists());

    cli(&dir)
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli(&dir).args(["init-config", "--force"]).assert().success();
}
