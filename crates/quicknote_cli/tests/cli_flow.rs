use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn quicknote(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quicknote").unwrap();
    cmd.arg("--db").arg(db).env_remove("QUICKNOTE_DB_PATH");
    cmd
}

#[test]
fn add_edit_delete_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("task.db");

    quicknote(&db)
        .args(["add", "Buy milk"])
        .assert()
        .success()
        .stdout("1\n");

    quicknote(&db)
        .arg("list")
        .assert()
        .success()
        .stdout("1\tBuy milk\n");

    quicknote(&db)
        .args(["edit", "1", "Buy oat milk"])
        .assert()
        .success();

    quicknote(&db)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Buy oat milk\""));

    quicknote(&db)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn empty_database_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("task.db");

    quicknote(&db).arg("list").assert().success().stdout("");
}

#[test]
fn deleting_missing_note_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("task.db");
    quicknote(&db).args(["add", "keep me"]).assert().success();

    quicknote(&db)
        .args(["delete", "99"])
        .assert()
        .success()
        .stdout("1\tkeep me\n");
}

#[test]
fn unreadable_database_fails_without_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("task.db");
    std::fs::write(&db, "not a database\n".repeat(128)).unwrap();

    quicknote(&db)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("note store unavailable"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn log_level_without_log_dir_warns() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("task.db");

    quicknote(&db)
        .args(["--log-level", "debug", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "--log-level has no effect without --log-dir",
        ));
}
