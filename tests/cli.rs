use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn tyshc() -> Command {
    Command::cargo_bin("tyshc").expect("binary builds")
}

#[test]
fn compiles_to_sibling_sh_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("hello.tysh");
    fs::write(&input, "printLn(\"hi\");\n").expect("write input");

    tyshc().arg(&input).assert().success();

    let output = dir.path().join("hello.sh");
    let script = fs::read_to_string(&output).expect("sibling .sh exists");
    assert!(script.starts_with("#!/bin/bash"));
    assert!(script.contains("printLn \"hi\""));
}

#[test]
fn out_flag_overrides_output_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("hello.tysh");
    let output = dir.path().join("custom.bash");
    fs::write(&input, "int i = 1;\n").expect("write input");

    tyshc()
        .arg("-o")
        .arg(&output)
        .arg(&input)
        .assert()
        .success();

    assert!(output.exists());
    assert!(!dir.path().join("hello.sh").exists());
}

#[test]
fn compile_error_exits_2_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("bad.tysh");
    fs::write(&input, "continue;\n").expect("write input");

    tyshc()
        .arg(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "'ContinueExpr' is only allowed inside a while loop",
        ))
        .stderr(predicate::str::contains(":1:1:"));

    assert!(!dir.path().join("bad.sh").exists());
}

#[test]
fn missing_file_exits_1() {
    tyshc()
        .arg("no_such_script.tysh")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to read"));
}

#[test]
fn missing_input_shows_usage() {
    tyshc()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage: tyshc"));
}

#[test]
fn check_mode_reports_ok_without_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("fine.tysh");
    fs::write(&input, "int i = 1;\n").expect("write input");

    tyshc()
        .arg("--check")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));

    assert!(!dir.path().join("fine.sh").exists());
}

#[test]
fn check_mode_rejects_out_flag() {
    tyshc()
        .arg("--check")
        .arg("-o")
        .arg("x.sh")
        .arg("a.tysh")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--check cannot be used with --out"));
}

#[test]
fn emit_ast_prints_the_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("ast.tysh");
    fs::write(&input, "int i = 1;\n").expect("write input");

    tyshc()
        .arg("--emit-ast")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("VarDecl"));
}

#[test]
fn emit_ir_prints_the_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("ir.tysh");
    fs::write(&input, "int i = 1;\n").expect("write input");

    tyshc()
        .arg("--emit-ir")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Assign"));
}

#[test]
fn help_prints_usage() {
    tyshc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: tyshc"));
}

#[test]
fn unexpected_flag_is_rejected() {
    tyshc()
        .arg("--wat")
        .arg("a.tysh")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unexpected argument: --wat"));
}
