/*
Definitions of all diagnostics resulting from analyzer processing.
*/
use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use thiserror::Error;

use super::token::Token;

/// The kind of a single analyzer diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A specific literal was expected, but not found.
    ExpectedLiteral(String),

    /// A token of a given category (or set of categories) was expected, but not found.
    ExpectedCategory(String),

    /// One of a set of literals was expected, but none were found.
    Choice(Vec<String>),

    /// A structural or semantic problem, with explanatory text.
    General(String),
}

impl DiagnosticKind {
    /// Generates the user-facing message for this diagnostic kind, given the offending token.
    pub fn message(&self, found: &Token) -> String {
        match self {
            DiagnosticKind::ExpectedLiteral(lit) => {
                format!("Expected '{lit}', instead found '{found}'.")
            }
            DiagnosticKind::ExpectedCategory(desc) => {
                format!("Expected {desc}, instead found '{found}'.")
            }
            DiagnosticKind::Choice(choices) => format!(
                "Expected one of: {}, instead found '{found}'.",
                choices.join(", ")
            ),
            DiagnosticKind::General(msg) => msg.clone(),
        }
    }

    /// A stable code for this kind of diagnostic.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::ExpectedLiteral(_) => "cobalt::analyzer::expected",
            DiagnosticKind::ExpectedCategory(_) => "cobalt::analyzer::expected_category",
            DiagnosticKind::Choice(_) => "cobalt::analyzer::choice",
            DiagnosticKind::General(_) => "cobalt::analyzer::general",
        }
    }
}

/// A single diagnostic recorded by the analyzer.
/// Carries the file it stems from, the offending token, and what went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}", .kind.message(.token))]
pub struct Diagnostic {
    /// The file (compile unit) the diagnostic stems from.
    pub file: String,

    /// The token the diagnostic is anchored at.
    pub token: Token,

    /// What went wrong.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(file: &str, token: Token, kind: DiagnosticKind) -> Self {
        Self {
            file: file.to_string(),
            token,
            kind,
        }
    }
}

/// A renderable version of a [`Diagnostic`], attached to its source text.
#[derive(Error, Debug, MietteDiagnostic)]
#[error("{msg}")]
#[diagnostic(code(cobalt::parse_error))]
pub struct RenderedDiagnostic {
    /// The source the error stems from.
    #[source_code]
    src: NamedSource<String>,

    /// The diagnostic message.
    msg: String,

    /// Help text denoting the diagnostic kind.
    #[help]
    help: Option<String>,

    /// The span at which the error occurs.
    #[label("here")]
    span: Option<SourceSpan>,
}

impl RenderedDiagnostic {
    /// Attaches a diagnostic to the source it was produced from.
    pub fn new(diag: &Diagnostic, source: &str) -> Self {
        Self {
            src: NamedSource::new(&diag.file, source.to_string()),
            msg: diag.to_string(),
            help: Some(format!("[{}]", diag.kind.code())),
            span: token_span(&diag.token, source),
        }
    }
}

/// Computes the byte span of a token within its source, from its line and column.
/// Returns [`None`] when the position does not fall within the source.
pub fn token_span(token: &Token, source: &str) -> Option<SourceSpan> {
    let line_start = if token.line <= 1 {
        0
    } else {
        source
            .match_indices('\n')
            .nth(token.line - 2)
            .map(|(idx, _)| idx + 1)?
    };
    let offset = line_start + token.column.saturating_sub(1);
    if offset > source.len() {
        return None;
    }
    let len = if token.is_eof() {
        0
    } else {
        token.value.len().min(source.len() - offset)
    };
    Some((offset, len).into())
}

/// The terminal decision of an analysis run: at least one diagnostic was recorded, so
/// the named compilation phase has failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, MietteDiagnostic)]
#[error("Compilation failed during {phase}, with {count} error(s) reported.")]
#[diagnostic(code(cobalt::analyzer::parsing_failed))]
pub struct ParsingFailed {
    /// The phase at which compilation stopped.
    pub phase: &'static str,

    /// The number of diagnostics recorded within the run.
    pub count: usize,
}
