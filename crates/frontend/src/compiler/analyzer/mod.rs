/**
 * Syntactic and semantic analysis of COBOL token streams.
 * Validates a lexed token sequence against the division, section and statement grammar,
 * populating a symbol table of declared data items along the way. Diagnostics never stop
 * analysis, every matcher advances the cursor, so any input is consumed in linear time.
 */
use self::{
    context::SourceUnit,
    err::{Diagnostic, DiagnosticKind, ParsingFailed},
    sink::DiagnosticSink,
    symbols::SymbolTable,
    token::Token,
};

mod context;
mod cursor;
mod data;
mod divs;
mod expr;
mod stat;

pub mod err;
pub mod lexer;
pub mod sink;
pub mod symbols;
pub mod token;

/// Exports.
pub use context::SourceUnitType;
pub use err::RenderedDiagnostic;
pub use lexer::tokenize;
pub use sink::{render_diagnostics, CollectingSink};

/// The name of the compilation phase implemented by the analyzer.
pub const PHASE: &str = "parsing";

/// Analyzes a full token sequence for a single file.
///
/// Declared data items are added to the given symbol table, and all diagnostics are
/// reported to the given sink. If any diagnostic was reported during this run, the run
/// fails with [`ParsingFailed`], otherwise the canonical token sequence is returned.
pub fn analyze(
    file: &str,
    tokens: &[Token],
    symbols: &mut SymbolTable,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<Token>, ParsingFailed> {
    tracing::info!(file, tokens = tokens.len(), "starting analysis");
    let mut analyzer = Analyzer::new(file, tokens, symbols, sink);
    analyzer.source();

    let reported = analyzer.reported;
    let analyzed = analyzer.analyzed;
    tracing::info!(file, diagnostics = reported, "analysis complete");

    if reported > 0 {
        return Err(ParsingFailed {
            phase: PHASE,
            count: reported,
        });
    }
    Ok(analyzed)
}

/// Represents a single analysis run over one file's token sequence.
pub(crate) struct Analyzer<'a> {
    /// The name of the file being analyzed.
    file: &'a str,

    /// The input token sequence.
    tokens: &'a [Token],

    /// Current read position within the input sequence.
    idx: usize,

    /// Sentinel returned for reads past the end of the input.
    eof: Token,

    /// The canonical output token sequence.
    analyzed: Vec<Token>,

    /// Context for the source unit currently being analyzed.
    unit: SourceUnit,

    /// Store of declared data items, shared with later phases.
    symbols: &'a mut SymbolTable,

    /// Receiver of all diagnostics.
    sink: &'a mut dyn DiagnosticSink,

    /// Number of diagnostics reported within this run.
    reported: usize,

    /// Depth of the nested statement sequences currently being analyzed.
    nesting: usize,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        file: &'a str,
        tokens: &'a [Token],
        symbols: &'a mut SymbolTable,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        let eof = match tokens.last() {
            Some(last) => Token::eof(last.line, last.column + last.value.len()),
            None => Token::eof(1, 1),
        };
        Self {
            file,
            tokens,
            idx: 0,
            eof,
            analyzed: Vec::with_capacity(tokens.len()),
            unit: SourceUnit::default(),
            symbols,
            sink,
            reported: 0,
            nesting: 0,
        }
    }

    /// Reports a single diagnostic anchored at the given token.
    /// Does not move the cursor.
    pub fn report(&mut self, token: Token, kind: DiagnosticKind) {
        self.reported += 1;
        self.sink.report(Diagnostic::new(self.file, token, kind));
    }

    /// Reports a general diagnostic anchored at the current token.
    pub fn report_here(&mut self, msg: &str) {
        let token = self.current().clone();
        self.report(token, DiagnosticKind::General(msg.to_string()));
    }
}
