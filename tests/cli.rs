// ABOUTME: Spawned-binary tests checking stdout text and process exit codes

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Writes a script into a fresh temp dir and returns the dir plus the path.
fn script(source: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("script.col");
    fs::write(&path, source).expect("write script");
    (dir, path)
}

fn colon() -> Command {
    Command::cargo_bin("colon").expect("binary exists")
}

#[test]
fn test_arithmetic_prints_one_value_per_line() {
    let (_dir, path) = script("print(12 + 14)\nprint(12 ^ 3)\nprint(12 > 14)\n");
    colon()
        .arg(&path)
        .assert()
        .success()
        .stdout("26\n1728\nfalse\n");
}

#[test]
fn test_closure_call() {
    let (_dir, path) = script("v: addTwo = f(num):\n\tr: num + 2\n:f\nprint(addTwo(5))\n");
    colon().arg(&path).assert().success().stdout("7\n");
}

#[test]
fn test_loop_mutation() {
    let source = "\
v: iter = 1
v: sum = 0
l(iter <= 5):
\tv: sum = sum + iter
\tv: iter = iter + 1
:l
print(sum)
";
    let (_dir, path) = script(source);
    colon().arg(&path).assert().success().stdout("15\n");
}

#[test]
fn test_recursion() {
    let source = "\
v: sumToNumRec = f(num):
\ti(num == 1):
\t\t1
\t:i e:
\t\tnum + sumToNumRec(num - 1)
\t:e
:f
print(sumToNumRec(5))
";
    let (_dir, path) = script(source);
    colon().arg(&path).assert().success().stdout("15\n");
}

#[test]
fn test_string_concatenation() {
    let (_dir, path) = script("print(\"hello\" + \" \" + \"world!\")\n");
    colon()
        .arg(&path)
        .assert()
        .success()
        .stdout("hello world!\n");
}

#[test]
fn test_print_with_no_args_prints_blank_line() {
    let (_dir, path) = script("print()\n");
    colon().arg(&path).assert().success().stdout("\n");
}

#[test]
fn test_illegal_character_exits_65() {
    let (_dir, path) = script("@\n");
    colon()
        .arg(&path)
        .assert()
        .code(65)
        .stdout(predicate::str::contains("ILLEGAL_TOKEN"));
}

#[test]
fn test_unterminated_string_exits_65() {
    let (_dir, path) = script("\"no closing quote\n");
    colon()
        .arg(&path)
        .assert()
        .code(65)
        .stdout(predicate::str::contains("string literal may not be closed"));
}

#[test]
fn test_parse_error_exits_22() {
    let (_dir, path) = script("v: = 3\n");
    colon()
        .arg(&path)
        .assert()
        .code(22)
        .stdout(predicate::str::contains(
            "Expecting token of type IDENTIFIER",
        ));
}

#[test]
fn test_runtime_error_exits_22() {
    let (_dir, path) = script("print(missingName)\n");
    colon()
        .arg(&path)
        .assert()
        .code(22)
        .stdout(predicate::str::contains("identifier not found"));
}

#[test]
fn test_missing_file_exits_nonzero() {
    colon()
        .arg("does-not-exist.col")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error reading file"));
}

#[test]
fn test_version_flag() {
    colon()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0.0"));
}
