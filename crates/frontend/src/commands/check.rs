use colored::Colorize;
use miette::Result;
use std::fs;

use crate::{
    cli::CheckCommand,
    compiler::analyzer::{
        self,
        err::{Diagnostic, ParsingFailed},
        render_diagnostics,
        sink::CollectingSink,
        symbols::SymbolTable,
        token::Token,
        tokenize,
    },
    config::CheckConfig,
};

/// Everything produced by a single analysis run.
#[derive(Debug)]
pub struct CheckOutcome {
    /// The canonical token sequence, or the terminal failure of the run.
    pub result: std::result::Result<Vec<Token>, ParsingFailed>,

    /// All data items declared within the analyzed file.
    pub symbols: SymbolTable,

    /// All diagnostics recorded, in report order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Executes the given check command over its input file.
pub fn run_check(args: CheckCommand) -> Result<()> {
    let cfg = CheckConfig::try_from(args)?;

    // Load contents of passed file.
    let txt = fs::read_to_string(&cfg.input_file)
        .map_err(|e| miette::diagnostic!("Failed to load input file from disk: {e}"))?;
    let file = cfg.input_file.to_string_lossy().into_owned();

    let outcome = if cfg.token_input {
        let tokens: Vec<Token> = serde_json::from_str(&txt)
            .map_err(|e| miette::diagnostic!("Failed to parse input token stream: {e}"))?;
        check_tokens(&file, &tokens)
    } else {
        check_source(&file, &txt)
    };

    // Spans are only meaningful against free-format source text.
    let source = (!cfg.token_input).then_some(txt.as_str());
    render_diagnostics(&outcome.diagnostics, source);

    let analyzed = outcome.result?;
    if cfg.emit_tokens {
        let json = serde_json::to_string_pretty(&analyzed)
            .map_err(|e| miette::diagnostic!("Failed to serialize token stream: {e}"))?;
        println!("{json}");
    }
    if cfg.emit_symbols {
        let json = serde_json::to_string_pretty(&outcome.symbols)
            .map_err(|e| miette::diagnostic!("Failed to serialize symbol table: {e}"))?;
        println!("{json}");
    }

    eprintln!(
        "{} {} ({} data items declared)",
        "success:".green().bold(),
        file,
        outcome.symbols.len()
    );
    Ok(())
}

/// Analyzes the given free-format source text, using the reference tokenizer.
pub fn check_source(file: &str, source: &str) -> CheckOutcome {
    check_tokens(file, &tokenize(source))
}

/// Analyzes the given token sequence with a fresh symbol table and sink.
pub fn check_tokens(file: &str, tokens: &[Token]) -> CheckOutcome {
    let mut symbols = SymbolTable::new();
    let mut sink = CollectingSink::new();
    let result = analyzer::analyze(file, tokens, &mut symbols, &mut sink);

    CheckOutcome {
        result,
        symbols,
        diagnostics: sink.into_diagnostics(),
    }
}
