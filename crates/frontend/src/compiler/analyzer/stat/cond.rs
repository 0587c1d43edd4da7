use super::Analyzer;

const NEXT_SENTENCE: &str = "Unsupported phrase: NEXT SENTENCE is an archaic feature. This phrase can be confusing and is a common source of errors. The CONTINUE statement can be used to accomplish the same functionality while being much clearer and less prone to error.";

impl<'a> Analyzer<'a> {
    /// `IF condition [THEN] statements [ELSE statements] END-IF`
    pub(super) fn parse_if(&mut self) {
        self.expected("IF");
        self.condition("THEN");
        self.optional("THEN");
        self.branch();

        if self.optional("ELSE") {
            self.branch();
        }

        self.end_statement(true, "END-IF");
    }

    /// Analyzes the nested statements of one IF branch.
    fn branch(&mut self) {
        if self.at_next_sentence() {
            self.report_here(NEXT_SENTENCE);
            self.accept();
            self.accept();
        }
        self.statements(true);
    }
}
