use assert_cmd::Command;
use predicates::prelude::*;

fn nomen() -> Command {
    Command::cargo_bin("nomen").unwrap()
}

#[test]
fn split_prints_one_component_per_line() {
    nomen()
        .args(["split", "oss.cs.fau.de"])
        .assert()
        .success()
        .stdout("oss\ncs\nfau\nde\n");
}

#[test]
fn split_unmasks_escaped_delimiters() {
    nomen()
        .args(["split", "oss\\.cs.fau"])
        .assert()
        .success()
        .stdout("oss.cs\nfau\n");
}

#[test]
fn split_supports_other_delimiters() {
    nomen()
        .args(["split", "-d", "/", "usr/bin/ls"])
        .assert()
        .success()
        .stdout("usr\nbin\nls\n");
}

#[test]
fn split_rejects_trailing_escape() {
    nomen()
        .args(["split", "oss.cs\\"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dangling escape"));
}

#[test]
fn join_masks_delimiter_occurrences() {
    nomen()
        .args(["join", "oss", "cs.fau", "de"])
        .assert()
        .success()
        .stdout("oss.cs\\.fau.de\n");
}

#[test]
fn join_of_nothing_is_the_empty_name() {
    nomen().arg("join").assert().success().stdout("\n");
}

#[test]
fn edit_insert_builds_expected_name() {
    nomen()
        .args(["edit", "oss.fau.de", "insert", "1", "cs"])
        .assert()
        .success()
        .stdout("oss.cs.fau.de\n");
}

#[test]
fn edit_remove_and_set() {
    nomen()
        .args(["edit", "oss.cs.fau.de", "remove", "2"])
        .assert()
        .success()
        .stdout("oss.cs.de\n");

    nomen()
        .args(["edit", "oss.cs.fau.de", "set", "3", "com"])
        .assert()
        .success()
        .stdout("oss.cs.fau.com\n");
}

#[test]
fn edit_rejects_out_of_range_index() {
    nomen()
        .args(["edit", "a.b", "remove", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn edit_rejects_unescaped_delimiter_in_component() {
    nomen()
        .args(["edit", "oss.cs", "append", "fau.de"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unescaped"));
}
