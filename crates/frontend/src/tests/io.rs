use pretty_assertions::assert_eq;

use super::common::CommonTestRunner;
use crate::compiler::analyzer::token::TokenCategory;

/// Tests all DISPLAY forms, and that the UPON device is re-tagged within the output.
#[test]
fn display_forms() {
    let outcome = CommonTestRunner::new("display_forms")
        .source(program!(
            r#"
    DISPLAY "HELLO" WS-E 42.
    DISPLAY WS-E UPON STANDARD-ERROR.
    DISPLAY "NO NEWLINE" WITH NO ADVANCING.
    DISPLAY "X" NO ADVANCING END-DISPLAY.
"#
        ))
        .expect_pass()
        .run();

    let tokens = outcome.result.unwrap();
    let device = tokens.iter().find(|t| t.is("STANDARD-ERROR")).unwrap();
    assert_eq!(device.category, TokenCategory::Device);
}

/// Tests that DISPLAY only writes upon known devices.
#[test]
fn display_unknown_device() {
    CommonTestRunner::new("display_unknown_device")
        .source(program!(
            r#"
    DISPLAY WS-E UPON PRINTER.
"#
        ))
        .expect_fail(Some("Expected one of: STANDARD-OUTPUT, STANDARD-ERROR"))
        .expect_diagnostics(1)
        .run();
}

/// Tests all ACCEPT sources.
#[test]
fn accept_forms() {
    CommonTestRunner::new("accept_forms")
        .source(program!(
            r#"
    ACCEPT WS-E.
    ACCEPT WS-E FROM STANDARD-INPUT.
    ACCEPT WS-E FROM COMMAND-LINE END-ACCEPT.
    ACCEPT WS-A FROM DATE YYYYMMDD.
    ACCEPT WS-A FROM DAY.
    ACCEPT WS-A FROM DAY-OF-WEEK.
    ACCEPT WS-A FROM TIME.
"#
        ))
        .expect_pass()
        .run();
}

/// Tests that ACCEPT rejects unknown sources.
#[test]
fn accept_unknown_source() {
    CommonTestRunner::new("accept_unknown_source")
        .source(program!(
            r#"
    ACCEPT WS-E FROM KEYBOARD.
"#
        ))
        .expect_fail(Some("Expected one of: STANDARD-INPUT, COMMAND-LINE, DATE"))
        .expect_diagnostics(1)
        .run();
}

/// Tests the file handling statements, with their optional phrases.
#[test]
fn file_statements() {
    CommonTestRunner::new("file_statements")
        .source(program!(
            r#"
    CLOSE WS-E.
    CLOSE WS-E REEL FOR REMOVAL WS-A WITH NO REWIND WS-B UNIT.
    DELETE WS-E RECORD
        INVALID KEY DISPLAY "MISSING"
        NOT INVALID KEY DISPLAY "GONE"
    END-DELETE.
    DELETE FILE OVERRIDE WS-E WS-A.
    DELETE WS-E RETRY FOREVER.
    DELETE WS-E RECORD RETRY FOR 5 SECONDS.
    REWRITE WS-E FROM "DATA" WITH LOCK.
    REWRITE WS-E RETRY 2 SECONDS.
    REWRITE WS-E RECORD RETRY 3 TIMES INVALID KEY CONTINUE END-REWRITE.
    REWRITE FILE WS-E RECORD FROM WS-A NO LOCK.
    RETURN WS-E RECORD INTO WS-A
        AT END DISPLAY "DONE"
        NOT AT END CONTINUE
    END-RETURN.
    RELEASE WS-E FROM WS-A.
    UNLOCK WS-E RECORDS.
    COMMIT.
    ROLLBACK.
"#
        ))
        .expect_pass()
        .expect_diagnostics(0)
        .run();
}

/// Tests that DELETE FILE takes the exception phrases instead of INVALID KEY.
#[test]
fn delete_file_exceptions() {
    CommonTestRunner::new("delete_file_exceptions")
        .source(program!(
            r#"
    DELETE FILE WS-E
        ON EXCEPTION DISPLAY "FAILED"
        NOT ON EXCEPTION DISPLAY "DELETED"
    END-DELETE.
"#
        ))
        .expect_pass()
        .run();
}

/// Tests that a conditional RETURN requires END-RETURN.
#[test]
fn return_missing_end_marker() {
    CommonTestRunner::new("return_missing_end_marker")
        .source(program!(
            r#"
    RETURN WS-E AT END DISPLAY "DONE".
"#
        ))
        .expect_fail(Some("Expected 'END-RETURN'"))
        .expect_diagnostics(1)
        .run();
}

/// Tests that RETURN accepts a retry phrase ahead of its AT END phrases.
#[test]
fn return_with_retry() {
    CommonTestRunner::new("return_with_retry")
        .source(program!(
            r#"
    RETURN WS-E RECORD RETRY FOREVER AT END CONTINUE END-RETURN.
    RETURN WS-E INTO WS-A RETRY 3 TIMES
        AT END DISPLAY "DONE"
    END-RETURN.
    RETURN WS-E RETRY FOR 2 SECONDS.
"#
        ))
        .expect_pass()
        .expect_diagnostics(0)
        .run();
}

/// Tests that AT END may only be given once, even without the AT word.
#[test]
fn return_duplicate_at_end() {
    CommonTestRunner::new("return_duplicate_at_end")
        .source(program!(
            r#"
    RETURN WS-E
        AT END CONTINUE
        END CONTINUE
    END-RETURN.
"#
        ))
        .expect_fail(Some("AT END can only be specified once in this statement"))
        .expect_diagnostics(1)
        .run();
}

/// Tests that CLOSE only accepts file names.
#[test]
fn close_literal_operand() {
    CommonTestRunner::new("close_literal_operand")
        .source(program!(
            r#"
    CLOSE "INPUT-FILE".
"#
        ))
        .expect_fail(Some("The CLOSE statement only accepts file connector names."))
        .expect_diagnostics(1)
        .run();
}
