use super::{err::DiagnosticKind, token::TokenCategory, Analyzer};

mod cond;
mod control;
mod io;
mod math;
mod memory;
mod phrases;
mod report;

/// Operand categories shared by most statements.
pub(super) const ID: &[TokenCategory] = &[TokenCategory::Identifier];
pub(super) const ID_NUM: &[TokenCategory] = &[TokenCategory::Identifier, TokenCategory::Numeric];
pub(super) const ID_LIT: &[TokenCategory] = &[
    TokenCategory::Identifier,
    TokenCategory::Numeric,
    TokenCategory::String,
];

/// Deepest nesting of statement sequences analyzed before the rest of a scope is skipped.
const MAX_NESTING: usize = 256;

const TOO_DEEPLY_NESTED: &str = "Statements are nested too deeply. The rest of this nested scope has been skipped, and will not be analyzed.";

impl<'a> Analyzer<'a> {
    /// Analyzes a sequence of statements from the current position.
    ///
    /// At the top level, statements form sentences which end with a separator period.
    /// Nested sequences (IF bodies, exception phrases) are instead ended by their owning
    /// statement's END marker, so no period is consumed.
    pub(super) fn statements(&mut self, nested: bool) {
        if !nested {
            self.sentences();
            return;
        }

        if self.nesting >= MAX_NESTING {
            self.report_here(TOO_DEEPLY_NESTED);
            self.skip_nested_scope();
            return;
        }

        self.nesting += 1;
        while self.at_statement() {
            self.statement();
        }
        self.nesting -= 1;
    }

    /// Analyzes top level sentences. A sentence missing its period is reported, then
    /// analysis resumes at the next sentence.
    fn sentences(&mut self) {
        while self.at_statement() {
            self.statement();
            if self.at_statement() || self.optional(".") {
                continue;
            }

            self.report_missing(".");
            self.resync_sentence();
        }
    }

    /// Skips to the start of the next sentence. A separator period on the way is
    /// consumed, any statement, unit start or unit END marker is left in place.
    fn resync_sentence(&mut self) {
        while !(self.at_eof()
            || self.at_statement()
            || self.at_unit_start()
            || self.at_unit_end())
        {
            if self.optional(".") {
                return;
            }
            self.skip();
        }
    }

    /// Whether the cursor sits at an `END PROGRAM` or `END FUNCTION` marker.
    fn at_unit_end(&self) -> bool {
        self.current_is("END")
            && (self.lookahead_is(1, "PROGRAM") || self.lookahead_is(1, "FUNCTION"))
    }

    /// Skips the remainder of a nested scope which is too deep to analyze, up to the
    /// ELSE or END marker owned by the enclosing statement.
    /// IF statements within the skipped tokens are paired with their END-IF.
    fn skip_nested_scope(&mut self) {
        let mut depth: usize = 0;
        loop {
            let cur = self.current();
            if cur.is_eof() || cur.is(".") {
                return;
            }
            if depth == 0 && (cur.is("ELSE") || cur.value.starts_with("END-")) {
                return;
            }

            if cur.is("IF") {
                depth += 1;
            } else if cur.is("END-IF") {
                depth -= 1;
            }
            self.skip();
        }
    }

    /// Analyzes a single statement from the current position.
    fn statement(&mut self) {
        let keyword = self.current().value.clone();
        tracing::trace!(statement = %keyword, line = self.current().line, "statement");

        match keyword.as_str() {
            "ACCEPT" => self.parse_accept(),
            "ADD" => self.parse_add(),
            "ALLOCATE" => self.parse_allocate(),
            "CALL" => self.parse_call(),
            "CANCEL" => self.parse_cancel(),
            "CLOSE" => self.parse_close(),
            "COMMIT" => self.parse_commit(),
            "COMPUTE" => self.parse_compute(),
            "CONTINUE" => self.parse_continue(),
            "DELETE" => self.parse_delete(),
            "DISPLAY" => self.parse_display(),
            "DIVIDE" => self.parse_divide(),
            "EXIT" => self.parse_exit(),
            "FREE" => self.parse_free(),
            "GENERATE" => self.parse_generate(),
            "GO" => self.parse_go(),
            "GOBACK" => self.parse_goback(),
            "IF" => self.parse_if(),
            "INITIATE" => self.parse_initiate(),
            "MOVE" => self.parse_move(),
            "MULTIPLY" => self.parse_multiply(),
            "RAISE" => self.parse_raise(),
            "RELEASE" => self.parse_release(),
            "RESUME" => self.parse_resume(),
            "RETURN" => self.parse_return(),
            "REWRITE" => self.parse_rewrite(),
            "ROLLBACK" => self.parse_rollback(),
            "STOP" => self.parse_stop(),
            "SUBTRACT" => self.parse_subtract(),
            "SUPPRESS" => self.parse_suppress(),
            "TERMINATE" => self.parse_terminate(),
            "UNLOCK" => self.parse_unlock(),
            "VALIDATE" => self.parse_validate(),
            _ => self.unsupported_statement(&keyword),
        }
    }

    /// Reports a statement which has no analysis routine, skipping to the next boundary.
    fn unsupported_statement(&mut self, keyword: &str) {
        self.report_here(&format!(
            "Unsupported statement: {keyword} statements are not currently supported by this compiler."
        ));
        self.skip();
        while !self.at_sentence_boundary() {
            self.skip();
        }
        if self.current_is(&format!("END-{keyword}")) {
            self.skip();
        }
    }

    /// Consumes a statement's END marker. The marker is mandatory when the statement
    /// carried a conditional phrase, and optional otherwise.
    /// A missing marker is reported without advancing, so the token that ended the
    /// statement is still seen by its owner.
    pub(super) fn end_statement(&mut self, conditional: bool, marker: &str) {
        if !self.optional(marker) && conditional {
            self.report_missing(marker);
        }
    }

    /// Reports the given literal as missing at the current token, without advancing.
    pub(super) fn report_missing(&mut self, literal: &str) {
        let token = self.current().clone();
        self.report(token, DiagnosticKind::ExpectedLiteral(literal.into()));
    }

    /// Reports that one of the given literals was missing at the current token, without
    /// advancing.
    pub(super) fn report_missing_choice(&mut self, choices: &[&str]) {
        let token = self.current().clone();
        self.report(
            token,
            DiagnosticKind::Choice(choices.iter().map(|c| c.to_string()).collect()),
        );
    }

    /// Ends an operand list of `count` items. An empty list, or a list followed by
    /// anything other than the end of the statement, is reported once with the given
    /// message and the rest of the statement is skipped.
    pub(super) fn finish_list(&mut self, count: usize, msg: &str) {
        if count > 0 && self.at_statement_end() {
            return;
        }
        self.report_here(msg);
        while !self.at_statement_end() {
            self.skip();
        }
    }

    /// Analyzes a list of one or more operands of the given categories, which must make up
    /// the rest of the statement.
    pub(super) fn operand_list(&mut self, categories: &[TokenCategory], msg: &str) {
        let count = self.operands(categories);
        self.finish_list(count, msg);
    }

    /// Whether the cursor sits at a "NEXT SENTENCE" phrase.
    pub(super) fn at_next_sentence(&self) -> bool {
        self.current_is("NEXT") && self.lookahead_is(1, "SENTENCE")
    }
}
