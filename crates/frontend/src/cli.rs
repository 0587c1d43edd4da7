use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top level CLI options for the analyzer.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The command to be run.
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn command(self) -> Command {
        self.command
    }
}

/// All available subcommands within the cobalt front end.
#[derive(Subcommand)]
pub enum Command {
    Check(CheckCommand),
}

#[derive(Parser)]
#[command(about = "Analyzes a single COBOL file, reporting all diagnostics found.")]
pub struct CheckCommand {
    /// The file to analyze.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Treats the input file as a JSON token stream, rather than free-format source.
    #[arg(long, action)]
    pub tokens: bool,

    /// Outputs the populated symbol table as JSON once analysis passes.
    #[arg(long, action)]
    pub emit_symbols: bool,

    /// Outputs the canonical token stream as JSON once analysis passes.
    #[arg(long, action)]
    pub emit_tokens: bool,

    /// Set the verbosity of analyzer output. Can be specified
    /// multiple times.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
