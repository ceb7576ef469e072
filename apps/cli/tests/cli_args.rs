use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// Command with Kibela credentials set and an endpoint nothing listens on.
fn kibela_toc() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kibela-toc"));
    cmd.env("KIBELA_TOKEN", "secret")
        .env("KIBELA_TEAM", "acme")
        .env("KIBELA_ENDPOINT", "http://127.0.0.1:9/api/v1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_flags_and_env() {
    kibela_toc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--depth"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("KIBELA_TOKEN"));
}

#[test]
fn url_is_required() {
    kibela_toc().assert().failure();
}

#[test]
fn depth_zero_is_rejected() {
    kibela_toc()
        .args(["https://acme.kibe.la/notes/1", "--depth", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depth must be between 1 and 6"));
}

#[test]
fn depth_seven_is_rejected() {
    kibela_toc()
        .args(["https://acme.kibe.la/notes/1", "-d", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depth must be between 1 and 6"));
}

#[test]
fn non_numeric_depth_is_rejected() {
    kibela_toc()
        .args(["https://acme.kibe.la/notes/1", "--depth", "deep"])
        .assert()
        .failure();
}

#[test]
fn missing_token_is_a_config_error() {
    kibela_toc()
        .env_remove("KIBELA_TOKEN")
        .arg("https://acme.kibe.la/notes/1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("KIBELA_TOKEN"));
}

#[test]
fn missing_team_is_a_config_error() {
    kibela_toc()
        .env_remove("KIBELA_TEAM")
        .args(["https://acme.kibe.la/notes/1", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KIBELA_TEAM"));
}

#[test]
fn invalid_url_fails_without_network() {
    kibela_toc()
        .args(["https://acme.kibe.la/groups/3", "--dry-run"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid note URL"));
}

#[test]
fn non_numeric_note_is_rejected() {
    kibela_toc()
        .arg("https://acme.kibe.la/notes/abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not numeric"));
}
