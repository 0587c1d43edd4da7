// Common helpers for executing unit tests.
mod common;

/// Wraps a procedure division body in a program declaring the `WS-A` to `WS-E` items.
macro_rules! program {
    ($body:literal) => {
        concat!(
            "IDENTIFICATION DIVISION.\n",
            "PROGRAM-ID. TEST-PROG.\n",
            "DATA DIVISION.\n",
            "WORKING-STORAGE SECTION.\n",
            "01 WS-A PIC 9(4).\n",
            "01 WS-B PIC 9(4).\n",
            "01 WS-C PIC 9(4).\n",
            "01 WS-D PIC 9(4).\n",
            "01 WS-E PIC X(10).\n",
            "PROCEDURE DIVISION.\n",
            $body,
            "\nEND PROGRAM TEST-PROG.\n"
        )
    };
}

mod io;
mod properties;
