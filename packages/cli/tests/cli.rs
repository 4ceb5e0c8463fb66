use std::{
    io::Write,
    process::{Command, Output},
};

use chomsky::ContextFreeGrammar;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn grammar_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

fn chomsky(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chomsky"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

#[test]
fn test_converts_grammar() {
    let file = grammar_file("start: S\nS -> a A\nA -> ε\n");

    let output = chomsky(&[path(&file)]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "start: S\nnonterminals: S\nterminals: a\nS -> a\n"
    );
}

#[test]
fn test_validate_only() {
    let file = grammar_file("start: S\nS -> a S b | ε\n");

    let output = chomsky(&["--validate", path(&file)]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8(output.stdout)
        .unwrap()
        .contains("is a valid context-free grammar (1 non-terminals, 2 terminals, 2 productions)"));
}

#[test]
fn test_invalid_grammar_exits_with_one() {
    let file = grammar_file("start: S\nterminals: a\nS -> a B\n");

    let output = chomsky(&[path(&file)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("undeclared symbol B"));
}

#[test]
fn test_syntax_error_exits_with_one() {
    let file = grammar_file("S -> a\n");

    assert_eq!(chomsky(&[path(&file)]).status.code(), Some(1));
}

#[test]
fn test_missing_file_exits_with_one() {
    assert_eq!(
        chomsky(&["/nonexistent/grammar.txt"]).status.code(),
        Some(1)
    );
}

#[test]
fn test_reserved_prefix() {
    let file = grammar_file("start: S\nS -> _a S | b\n");

    assert_eq!(chomsky(&[path(&file)]).status.code(), Some(1));
    assert_eq!(
        chomsky(&["--prefix", "gen_", path(&file)]).status.code(),
        Some(0)
    );
}

#[test]
fn test_prefix_outside_the_text_format() {
    let file = grammar_file("start: A\nA -> b C d\nC -> c\n");

    for prefix in ["#", "-", "x |"] {
        let output = chomsky(&[&format!("--prefix={prefix}"), path(&file)]);

        assert_eq!(output.status.code(), Some(1), "{prefix}");
        assert!(output.stdout.is_empty());
        assert!(String::from_utf8(output.stderr)
            .unwrap()
            .contains("which is not allowed in a symbol"));
    }
}

#[test]
fn test_unwritable_output_file() {
    let file = grammar_file("start: S\nS -> a\n");
    let directory = tempfile::tempdir().unwrap();
    let missing = directory.path().join("missing").join("cnf.txt");

    let output = chomsky(&[path(&file), "--output", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .starts_with("error: cannot write "));
}

#[test]
fn test_output_file_round_trips() {
    let file = grammar_file("start: S\nS -> a S b | ε\n");
    let output_file = NamedTempFile::new().unwrap();

    let output = chomsky(&[path(&file), "--output", path(&output_file)]);
    assert_eq!(output.status.code(), Some(0));

    let converted = std::fs::read_to_string(output_file.path()).unwrap();
    let again = grammar_file(&converted);

    let output = chomsky(&["--prefix", "$", path(&again)]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        ContextFreeGrammar::from_text(&String::from_utf8(output.stdout).unwrap()).unwrap(),
        ContextFreeGrammar::from_text(&converted).unwrap()
    );
}

#[test]
fn test_keep_empty_word() {
    let file = grammar_file("start: S\nS -> a S | ε\n");

    let kept = String::from_utf8(chomsky(&[path(&file)]).stdout).unwrap();
    let dropped =
        String::from_utf8(chomsky(&["--keep-empty-word", "false", path(&file)]).stdout).unwrap();

    assert!(kept.contains("ε"));
    assert!(!dropped.contains("ε"));
}

#[test]
fn test_show_stages_and_accepts() {
    let file = grammar_file("start: S\nS -> a S b | ε\n");

    let output = chomsky(&[
        path(&file),
        "--show",
        "epsilon,unit",
        "--accepts",
        "a a b b",
        "--accepts",
        "a b b",
    ]);
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("# after epsilon\n"));
    assert!(stdout.contains("# after unit\n"));
    assert!(stdout.contains("The word \"a a b b\" is accepted"));
    assert!(stdout.contains("The word \"a b b\" is not accepted"));
}

#[test]
fn test_formal_format() {
    let file = grammar_file("start: S\nS -> a\n");

    let output = chomsky(&["--format", "formal", path(&file)]);

    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "G = ({S}, {a}, P, S)\n\nP = {\n  S → a\n}\n"
    );
}
