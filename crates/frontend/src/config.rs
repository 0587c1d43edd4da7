use std::path::PathBuf;

use crate::cli::CheckCommand;

/**
 * Crate-wide configuration structures.
 */

/// Configuration for a single check run.
pub struct CheckConfig {
    /// The input file for this run.
    pub input_file: PathBuf,

    /// Whether the input file holds a JSON token stream.
    pub token_input: bool,

    /// Whether to print the symbol table after a passing run.
    pub emit_symbols: bool,

    /// Whether to print the canonical token stream after a passing run.
    pub emit_tokens: bool,
}

impl TryFrom<CheckCommand> for CheckConfig {
    type Error = miette::Report;

    /// Attempts to convert a CLI check command into a valid check configuration.
    fn try_from(cli: CheckCommand) -> Result<Self, Self::Error> {
        // Verify the input file exists.
        if !cli.input.exists() || !cli.input.is_file() {
            miette::bail!("Input file either does not exist, or is not a file.");
        }

        Ok(CheckConfig {
            input_file: cli.input,
            token_input: cli.tokens,
            emit_symbols: cli.emit_symbols,
            emit_tokens: cli.emit_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(input: &str) -> CheckCommand {
        CheckCommand {
            input: PathBuf::from(input),
            tokens: false,
            emit_symbols: true,
            emit_tokens: false,
            verbose: 0,
        }
    }

    #[test]
    fn rejects_missing_input() {
        let err = CheckConfig::try_from(command("does/not/exist.cob"))
            .err()
            .expect("missing input should be rejected");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn rejects_directory_input() {
        assert!(CheckConfig::try_from(command("src")).is_err());
    }

    #[test]
    fn accepts_existing_file() {
        let cfg = CheckConfig::try_from(command("Cargo.toml")).unwrap();
        assert!(cfg.emit_symbols);
        assert!(!cfg.token_input);
    }
}
