use colored::Colorize;

use super::err::{Diagnostic, RenderedDiagnostic};

/// A receiver of diagnostics produced during analysis.
/// Reporting is pure recording, and never alters the analyzer's control flow.
pub trait DiagnosticSink {
    /// Records a single diagnostic.
    fn report(&mut self, diag: Diagnostic);

    /// Returns all diagnostics recorded so far, in report order.
    fn diagnostics(&self) -> &[Diagnostic];
}

/// A diagnostic sink which simply collects all reported diagnostics.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diags: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the sink, returning the collected diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diags
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diag: Diagnostic) {
        tracing::debug!(
            line = diag.token.line,
            column = diag.token.column,
            code = diag.kind.code(),
            "diagnostic recorded"
        );
        self.diags.push(diag);
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diags
    }
}

/// Renders the given diagnostics to stderr.
/// When the original source text is available, diagnostics are rendered against it with
/// labelled spans, otherwise a plain `file:line:column` form is used.
pub fn render_diagnostics(diags: &[Diagnostic], source: Option<&str>) {
    for diag in diags {
        match source {
            Some(src) => {
                let report = miette::Report::new(RenderedDiagnostic::new(diag, src));
                eprintln!("{report:?}");
            }
            None => eprintln!(
                "{} {}:{}:{}: {}",
                "error:".red().bold(),
                diag.file,
                diag.token.line,
                diag.token.column,
                diag
            ),
        }
    }
}
