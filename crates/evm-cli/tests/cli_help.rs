use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("evm")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("events"))
        .stdout(predicate::str::contains("kv"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_events_help_shows_subcommands() {
    cargo_bin_cmd!("evm")
        .args(["events", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("rename"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_kv_help_shows_subcommands() {
    cargo_bin_cmd!("evm")
        .args(["kv", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("evm")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
