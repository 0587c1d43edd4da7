mod check;

// Limited re-exports of command modules.
pub use check::run_check as check;

// Exports for embedding and unit testing.
pub use check::{check_source, check_tokens, CheckOutcome};
