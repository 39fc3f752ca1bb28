//! CLI behaviour that does not need checked-in fixtures: eval output, vars, config handling and
//! report rendering.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn depseval_cmd() -> Command {
    Command::cargo_bin("depseval").expect("depseval binary not found - run `cargo build` first")
}

fn write(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).expect("write file");
}

fn eval_json(dir: &Path, extra: &[&str]) -> Value {
    let output = depseval_cmd()
        .current_dir(dir)
        .arg("eval")
        .arg("DEPS")
        .args(extra)
        .output()
        .expect("run eval");
    assert!(output.status.success(), "eval failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("eval prints JSON")
}

#[test]
fn eval_prints_scope_as_json() {
    let tmp = TempDir::new().expect("temp dir");
    write(
        tmp.path(),
        "DEPS",
        "vars = {'host': 'https://h.example', 'flag': True}\n\
         deps = {'src/a': Var('host') + '/a.git'}\n\
         recursedeps = [('src/a', 'DEPS.a')]\n",
    );

    let scope = eval_json(tmp.path(), &[]);
    assert_eq!(
        scope,
        json!({
            "vars": {"host": "https://h.example", "flag": true},
            "deps": {"src/a": "https://h.example/a.git"},
            "recursedeps": [["src/a", "DEPS.a"]],
        })
    );
}

#[test]
fn var_flags_and_config_override_manifest_vars() {
    let tmp = TempDir::new().expect("temp dir");
    write(
        tmp.path(),
        "DEPS",
        "vars = {'host': 'https://h.example', 'nacl': False}\n\
         deps = {'src/a': Var('host') + '/a.git'}\n\
         use_relative_paths = Var('nacl')\n",
    );
    write(
        tmp.path(),
        "depseval.toml",
        "[custom_vars]\nhost = \"https://config.example\"\n",
    );

    let scope = eval_json(tmp.path(), &[]);
    assert_eq!(scope["deps"]["src/a"], "https://config.example/a.git");
    assert_eq!(scope["use_relative_paths"], false);

    let scope = eval_json(
        tmp.path(),
        &["--var", "host=https://cli.example", "--var", "nacl=True"],
    );
    assert_eq!(scope["deps"]["src/a"], "https://cli.example/a.git");
    assert_eq!(scope["use_relative_paths"], true);
}

#[test]
fn eval_error_exits_one_with_location() {
    let tmp = TempDir::new().expect("temp dir");
    write(tmp.path(), "DEPS", "deps = {}\nhooks = [x for x in deps]\n");

    depseval_cmd()
        .current_dir(tmp.path())
        .args(["eval", "DEPS"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unexpected node: ListComp"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn malformed_var_flag_is_an_error() {
    let tmp = TempDir::new().expect("temp dir");
    write(tmp.path(), "DEPS", "deps = {}\n");

    depseval_cmd()
        .current_dir(tmp.path())
        .args(["eval", "DEPS", "--var", "novalue"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected name=value"));
}

#[test]
fn unknown_profile_in_config_is_an_error() {
    let tmp = TempDir::new().expect("temp dir");
    write(tmp.path(), "DEPS", "deps = {}\n");
    write(tmp.path(), "depseval.toml", "profile = \"lenient\"\n");

    depseval_cmd()
        .current_dir(tmp.path())
        .args(["eval", "DEPS"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown profile: lenient"));
}

#[test]
fn validate_writes_markdown_and_md_renders_it_again() {
    let tmp = TempDir::new().expect("temp dir");
    write(tmp.path(), "DEPS", "deps = {}\nbogus = 'x'\n");
    let report = tmp.path().join("report.json");
    let markdown = tmp.path().join("comment.md");

    depseval_cmd()
        .current_dir(tmp.path())
        .args(["validate", "DEPS", "--write-markdown", "--report-out"])
        .arg(&report)
        .arg("--markdown-out")
        .arg(&markdown)
        .assert()
        .code(2);

    let written = std::fs::read_to_string(&markdown).expect("read markdown");
    assert!(written.contains("# Depseval report"));
    assert!(written.contains("Verdict: **FAIL**"));
    assert!(written.contains("`schema.mismatch` / `unknown_key`"));

    depseval_cmd()
        .args(["md", "--report"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Depseval report"));
}

#[test]
fn annotations_respect_max() {
    let tmp = TempDir::new().expect("temp dir");
    write(tmp.path(), "DEPS", "deps = {}\na = 'x'\nb = 'y'\nc = 'z'\n");
    let report = tmp.path().join("report.json");

    depseval_cmd()
        .current_dir(tmp.path())
        .args(["validate", "DEPS", "--report-out"])
        .arg(&report)
        .assert()
        .code(2);

    let output = depseval_cmd()
        .args(["annotations", "--max", "2", "--report"])
        .arg(&report)
        .output()
        .expect("run annotations");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("::error file=DEPS,line=2::[schema.mismatch:unknown_key]"));
}

#[test]
fn max_findings_truncates_report() {
    let tmp = TempDir::new().expect("temp dir");
    write(tmp.path(), "DEPS", "a = 'x'\nb = 'y'\nc = 'z'\n");
    let report = tmp.path().join("report.json");

    depseval_cmd()
        .current_dir(tmp.path())
        .args(["--max-findings", "1", "validate", "DEPS", "--report-out"])
        .arg(&report)
        .assert()
        .code(2);

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&report).expect("read report"))
            .expect("parse report");
    assert_eq!(report["findings"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["data"]["findings_total"], 3);
    assert_eq!(
        report["data"]["truncated_reason"],
        "findings truncated to max_findings=1"
    );
}
