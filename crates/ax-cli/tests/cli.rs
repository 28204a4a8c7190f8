#![allow(clippy::unwrap_used, missing_docs)]
//! Smoke tests for the `ax` binary that need no network.

use assert_cmd::Command;
use predicates::prelude::*;

fn ax() -> Command {
    Command::cargo_bin("ax").unwrap()
}

#[test]
fn help_lists_subcommands() {
    ax().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn version_matches_package() {
    ax().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_corpus_is_rejected() {
    ax().args(["search", "nope", "--query", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn search_requires_query() {
    ax().args(["search", "docs"]).assert().failure();
}
