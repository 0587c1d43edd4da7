use pretty_assertions::assert_eq;

use super::common::CommonTestRunner;
use crate::{
    commands::{check_source, check_tokens},
    compiler::analyzer::{token::Token, tokenize},
};

const BROKEN: &str = program!(
    r#"
    COMPUTE WS-A = ( WS-B + ).
    IF WS-A = 1 AND THEN DISPLAY "X".
    MOVE ( TO WS-B 42.
    PERFORM PARA-A.
"#
);

/// Tests that analyzing the same input twice gives identical results.
#[test]
fn analysis_is_deterministic() {
    let first = check_source("deterministic", BROKEN);
    let second = check_source("deterministic", BROKEN);

    assert!(!first.diagnostics.is_empty());
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.result, second.result);
    assert_eq!(
        serde_json::to_string(&first.symbols).unwrap(),
        serde_json::to_string(&second.symbols).unwrap()
    );
}

/// Tests that the failure carries the number of diagnostics reported.
#[test]
fn failure_counts_diagnostics() {
    let outcome = check_source("counts", BROKEN);
    let failure = outcome.result.unwrap_err();
    assert_eq!(failure.count, outcome.diagnostics.len());
    assert_eq!(failure.phase, "parsing");
}

/// Tests that arbitrary token soup is consumed to the end.
#[test]
fn garbage_terminates() {
    CommonTestRunner::new("garbage_terminates")
        .source(") ( . END-IF ELSE NOT ON PIC 01 77 . . IF IF IF END PROGRAM 42 \"X\" * **")
        .expect_fail(None)
        .run();
}

/// Tests that a stream missing its EOF token is still analyzed, and EOF-terminated.
#[test]
fn stream_without_eof() {
    let mut tokens = tokenize(program!("    DISPLAY \"HI\"."));
    let eof = tokens.pop().unwrap();
    assert!(eof.is_eof());

    let outcome = check_tokens("no_eof", &tokens);
    let analyzed = outcome.result.unwrap();
    assert!(analyzed.last().unwrap().is_eof());
    assert_eq!(analyzed.len(), tokens.len() + 1);
}

/// Tests that a token stream survives a JSON round trip, then passes analysis unchanged.
#[test]
fn json_token_stream() {
    let tokens = tokenize(program!("    MOVE 1 TO WS-A."));
    let json = serde_json::to_string(&tokens).unwrap();
    let parsed: Vec<Token> = serde_json::from_str(&json).unwrap();

    let outcome = check_tokens("json", &parsed);
    assert_eq!(outcome.result.unwrap(), tokens);
}

/// Tests that merged condition operators still appear token by token in the output.
#[test]
fn conditions_keep_output_tokens() {
    let source = program!("    IF WS-A IS NOT GREATER THAN OR EQUAL TO 1 CONTINUE END-IF.");
    let outcome = CommonTestRunner::new("conditions_keep_output_tokens")
        .source(source)
        .expect_pass()
        .run();
    assert_eq!(outcome.result.unwrap(), tokenize(source));
}

/// Tests that statements nested past the supported depth are reported once, and the rest
/// of the program is still analyzed.
#[test]
fn deeply_nested_statements() {
    let depth = 3000;
    let body = format!(
        "    {}DISPLAY \"X\"{}.\n    MOVE ( TO WS-A.",
        "IF WS-A = 1 ".repeat(depth),
        " END-IF".repeat(depth)
    );
    let source = program!("{body}").replace("{body}", &body);

    let outcome = check_source("deeply_nested", &source);
    let messages: Vec<String> = outcome.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(messages.len(), 2, "{messages:#?}");
    assert!(messages[0].contains("nested too deeply"));
    assert_eq!(outcome.diagnostics[1].token.value, "(");
}
