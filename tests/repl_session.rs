use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn rolodex(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rolodex").unwrap();
    cmd.env("ROLODEX_HOME", home).env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_session_adds_and_lists_contacts() {
    let temp_dir = tempfile::tempdir().unwrap();

    rolodex(temp_dir.path())
        .write_stdin("hello\nadd Ann 0501234567\nadd Ann 0677654321\nphone Ann\nall\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("How can I help you?"))
        .stdout(predicate::str::contains("Contact added."))
        .stdout(predicate::str::contains("Contact updated."))
        .stdout(predicate::str::contains("0501234567; 0677654321"))
        .stdout(predicate::str::contains("Good bye!"));

    assert!(temp_dir.path().join("addressbook.json").exists());
    assert!(temp_dir.path().join("notebook.json").exists());
}

#[test]
fn test_data_survives_restart() {
    let temp_dir = tempfile::tempdir().unwrap();

    rolodex(temp_dir.path())
        .write_stdin("add Ann 0501234567\nadd-birthday Ann 29.02.1992\nadd-note todo call \"the bank\"\nadd-tags todo money\nclose\n")
        .assert()
        .success();

    rolodex(temp_dir.path())
        .write_stdin("show-birthday Ann\nfind-note-by-tag money\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ann's birthday is 29.02.1992"))
        .stdout(predicate::str::contains("call the bank"))
        .stdout(predicate::str::contains("#money"));
}

#[test]
fn test_end_of_input_saves() {
    let temp_dir = tempfile::tempdir().unwrap();

    rolodex(temp_dir.path())
        .write_stdin("add Bob 0501112233\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Good bye!"));

    let saved = std::fs::read_to_string(temp_dir.path().join("addressbook.json")).unwrap();
    assert!(saved.contains("0501112233"));
    assert!(saved.contains("\"kind\": \"address-book\""));
}

#[test]
fn test_errors_are_reported_and_loop_continues() {
    let temp_dir = tempfile::tempdir().unwrap();

    rolodex(temp_dir.path())
        .write_stdin("add Ann 123\nphone Nobody\nfly\nremove Nobody\nadd Ann 0501234567\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: "))
        .stdout(predicate::str::contains("There is no contact with name Nobody"))
        .stdout(predicate::str::contains("Invalid command."))
        .stdout(predicate::str::contains("Contact added."));
}

#[test]
fn test_notes_commands() {
    let temp_dir = tempfile::tempdir().unwrap();

    rolodex(temp_dir.path())
        .write_stdin(concat!(
            "add-note shopping milk and eggs\n",
            "add-note ideas write a rolodex\n",
            "add-tags shopping home\n",
            "add-tags ideas home work\n",
            "sort-notes-by-tag home\n",
            "find-note zebra\n",
            "edit-note ideas rewrite it\n",
            "remove-tag ideas work\n",
            "delete-note shopping\n",
            "show-all-notes\n",
            "exit\n",
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing found"))
        .stdout(predicate::str::contains("rewrite it"))
        .stdout(predicate::str::contains("milk and eggs"))
        .stdout(predicate::str::contains("has been successfully deleted"));
}

#[test]
fn test_data_dir_flag_overrides_environment() {
    let env_dir = tempfile::tempdir().unwrap();
    let flag_dir = tempfile::tempdir().unwrap();

    rolodex(env_dir.path())
        .arg("--data-dir")
        .arg(flag_dir.path())
        .write_stdin("add Ann\nexit\n")
        .assert()
        .success();

    assert!(flag_dir.path().join("addressbook.json").exists());
    assert!(!env_dir.path().join("addressbook.json").exists());
}

#[test]
fn test_corrupt_file_fails_at_startup() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("addressbook.json"), "{ not json").unwrap();

    rolodex(temp_dir.path())
        .write_stdin("all\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Corrupt data in"));

    let untouched = std::fs::read_to_string(temp_dir.path().join("addressbook.json")).unwrap();
    assert_eq!(untouched, "{ not json");
}

#[test]
fn test_config_selects_file_names() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("config.json"),
        r#"{"address_book_file": "people.json"}"#,
    )
    .unwrap();

    rolodex(temp_dir.path())
        .write_stdin("add Ann\nexit\n")
        .assert()
        .success();

    assert!(temp_dir.path().join("people.json").exists());
    assert!(temp_dir.path().join("logs").is_dir());
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = tempfile::tempdir().unwrap();

    rolodex(temp_dir.path())
        .write_stdin("help\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("add-birthday <name> <birthday>"))
        .stdout(predicate::str::contains("find-note-by-tag <tag>"));
}
