use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get a Command for the depseval binary.
#[allow(deprecated)]
fn depseval_cmd() -> Command {
    Command::cargo_bin("depseval").unwrap()
}

#[test]
fn help_works() {
    depseval_cmd().arg("--help").assert().success();
}

#[test]
fn help_lists_subcommands() {
    depseval_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("annotations"));
}

#[test]
fn validate_requires_a_manifest() {
    depseval_cmd().arg("validate").assert().failure().code(2);
}
