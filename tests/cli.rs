use std::path::Path;
use std::process::{Command, Output};

fn puzzle(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_puzzle"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

#[test]
fn test_no_arguments_prints_usage() {
    let output = puzzle(&[] as &[&str]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("This program can solve logic puzzles."));
}

#[test]
fn test_too_many_arguments() {
    let output = puzzle(&["a.puz", "b.puz"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: too many arguments"));
    assert!(stdout(&output).starts_with("This program can solve logic puzzles."));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.puz");
    let output = puzzle(&[path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(&format!("Error: file {} not found", path.display())));
}

#[test]
fn test_malformed_puzzle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.puz");
    std::fs::write(&path, "Sue lives around here\nWho is the vet?\n").unwrap();
    let output = puzzle(&[path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: a line contained an incomplete sentence"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_solves_a_file() {
    let output = puzzle(&[fixture("john.puz").as_str()]);
    assert!(output.status.success());
    let expected = std::fs::read_to_string(fixture("john.out")).unwrap();
    assert_eq!(stdout(&output), expected);
}

#[test]
fn test_impossible_puzzle_still_succeeds() {
    let output = puzzle(&[fixture("impossible.puz").as_str()]);
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("That's impossible.\n"));
}

#[test]
fn test_stats_table() {
    let output = puzzle(&["--stats", fixture("john.puz").as_str()]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Problem Statistics"));
    assert!(out.contains("Search Statistics"));
    assert!(out.trim_end().ends_with("\nSOLVED"));
}

#[test]
fn test_stats_for_an_open_puzzle() {
    let output = puzzle(&["-s", "--parallel", fixture("joe.puz").as_str()]);
    assert!(output.status.success());
    assert!(stdout(&output).trim_end().ends_with("UNDETERMINED"));
}

#[test]
fn test_shell_completions() {
    let output = puzzle(&["--completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("puzzle"));
}
