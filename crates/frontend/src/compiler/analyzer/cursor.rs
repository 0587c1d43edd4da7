/**
 * Cursor movement and primitive token matchers for the analyzer.
 * Every matcher other than `optional` advances by exactly one token whether or not it
 * matched, which bounds the work of a run by the length of its input.
 */
use super::{
    err::DiagnosticKind,
    token::{Token, TokenCategory, TokenContext},
    Analyzer,
};

impl<'a> Analyzer<'a> {
    /// Returns the token the cursor is pointed at.
    /// Past the end of the input, this is always an EOF sentinel.
    pub fn current(&self) -> &Token {
        self.tokens.get(self.idx).unwrap_or(&self.eof)
    }

    /// Returns the token at the given offset from the cursor, which may be negative.
    /// Offsets before the start of the input clamp to the first token.
    pub fn lookahead(&self, offset: isize) -> &Token {
        let target = self.idx as isize + offset;
        if target < 0 {
            return self.tokens.first().unwrap_or(&self.eof);
        }
        self.tokens.get(target as usize).unwrap_or(&self.eof)
    }

    pub fn current_is(&self, literal: &str) -> bool {
        self.current().is(literal)
    }

    pub fn lookahead_is(&self, offset: isize, literal: &str) -> bool {
        self.lookahead(offset).is(literal)
    }

    pub fn current_category(&self) -> TokenCategory {
        self.current().category
    }

    /// Whether the current token begins a statement.
    pub fn at_statement(&self) -> bool {
        self.current().clause_context == TokenContext::IsStatement
    }

    /// Whether the current token begins a data description clause.
    pub fn at_clause(&self) -> bool {
        self.current().clause_context == TokenContext::IsClause
    }

    pub fn at_eof(&self) -> bool {
        self.current().is_eof()
    }

    /// Moves the cursor forward one token, without appending anything to the output.
    pub fn skip(&mut self) {
        if self.idx < self.tokens.len() {
            self.idx += 1;
        }
    }

    /// Appends the current token to the canonical output and moves past it.
    pub fn accept(&mut self) {
        let token = self.current().clone();
        self.analyzed.push(token);
        self.skip();
    }

    /// Expects the current token to be the given literal.
    /// On mismatch a diagnostic is reported, and the token is skipped regardless.
    pub fn expected(&mut self, literal: &str) {
        if self.current_is(literal) {
            self.accept();
            return;
        }
        let token = self.current().clone();
        self.report(token, DiagnosticKind::ExpectedLiteral(literal.to_string()));
        self.skip();
    }

    /// Expects the current token to be the given literal, reporting the given message on
    /// mismatch. The diagnostic is anchored at the token found at `anchor` relative to the
    /// cursor, which is usually `-1` for "missing X after this" errors.
    pub fn expected_with(&mut self, literal: &str, msg: &str, anchor: isize) {
        if self.current_is(literal) {
            self.accept();
            return;
        }
        let token = self.lookahead(anchor).clone();
        self.report(token, DiagnosticKind::General(msg.to_string()));
        self.skip();
    }

    /// Consumes the current token if it is the given literal, otherwise does nothing.
    /// Returns whether the token was consumed.
    pub fn optional(&mut self, literal: &str) -> bool {
        if self.current_is(literal) {
            self.accept();
            return true;
        }
        false
    }

    /// Expects the current token to be one of the given literals, returning the matched
    /// literal. If a category is supplied, the output token is re-tagged with it.
    pub fn choice(&mut self, retag: Option<TokenCategory>, choices: &[&str]) -> Option<String> {
        let current = self.current().clone();
        if choices.iter().any(|c| current.is(c)) {
            let out = match retag {
                Some(category) => current.retagged(category),
                None => current.clone(),
            };
            self.analyzed.push(out);
            self.skip();
            return Some(current.value);
        }

        self.report(
            current,
            DiagnosticKind::Choice(choices.iter().map(|c| c.to_string()).collect()),
        );
        self.skip();
        None
    }

    /// Expects the current token to be of the given category, returning it on success.
    fn category(&mut self, category: TokenCategory, desc: &str) -> Option<Token> {
        let current = self.current().clone();
        if current.category == category {
            self.accept();
            return Some(current);
        }
        self.report(current, DiagnosticKind::ExpectedCategory(desc.to_string()));
        self.skip();
        None
    }

    pub fn identifier(&mut self) -> Option<Token> {
        self.category(TokenCategory::Identifier, "identifier")
    }

    pub fn number(&mut self) -> Option<Token> {
        self.category(TokenCategory::Numeric, "numeric literal")
    }

    /// Expects a string literal, reporting the given message anchored at `anchor` on mismatch.
    pub fn string_with(&mut self, msg: &str, anchor: isize) -> Option<Token> {
        let current = self.current().clone();
        if current.category == TokenCategory::String {
            self.accept();
            return Some(current);
        }
        let token = self.lookahead(anchor).clone();
        self.report(token, DiagnosticKind::General(msg.to_string()));
        self.skip();
        None
    }

    pub fn at_identifier(&self) -> bool {
        self.current_category() == TokenCategory::Identifier
    }

    pub fn at_category(&self, categories: &[TokenCategory]) -> bool {
        categories.contains(&self.current_category())
    }

    /// Expects a single operand of one of the given categories.
    pub fn operand(&mut self, categories: &[TokenCategory], desc: &str) -> Option<Token> {
        let current = self.current().clone();
        if categories.contains(&current.category) {
            self.accept();
            return Some(current);
        }
        self.report(current, DiagnosticKind::ExpectedCategory(desc.to_string()));
        self.skip();
        None
    }

    /// Expects an identifier, numeric literal or string literal.
    pub fn value(&mut self) -> Option<Token> {
        self.operand(
            &[
                TokenCategory::Identifier,
                TokenCategory::Numeric,
                TokenCategory::String,
            ],
            "identifier or literal",
        )
    }

    /// Expects an identifier or numeric literal.
    pub fn identifier_or_number(&mut self) -> Option<Token> {
        self.operand(
            &[TokenCategory::Identifier, TokenCategory::Numeric],
            "identifier or numeric literal",
        )
    }

    /// Reports (without advancing) if the current token is not one of the given categories.
    /// Used before an operand list, where the list loop itself does the consuming.
    pub fn check_category(&mut self, categories: &[TokenCategory], desc: &str) {
        if !self.at_category(categories) {
            let token = self.current().clone();
            self.report(token, DiagnosticKind::ExpectedCategory(desc.to_string()));
        }
    }

    /// Consumes a run of tokens of the given categories, returning how many were consumed.
    pub fn operands(&mut self, categories: &[TokenCategory]) -> usize {
        let mut count = 0;
        while self.at_category(categories) {
            self.accept();
            count += 1;
        }
        count
    }

    /// Consumes one or more identifiers. When none are present, reports once.
    pub fn identifiers(&mut self) -> usize {
        self.check_category(&[TokenCategory::Identifier], "identifier");
        self.operands(&[TokenCategory::Identifier])
    }

    /// Whether the cursor sits at a boundary which ends the current statement's operands.
    pub fn at_statement_end(&self) -> bool {
        let cur = self.current();
        cur.is_eof()
            || cur.clause_context == TokenContext::IsStatement
            || cur.value.starts_with("END-")
            || [".", "END", "ELSE", "NOT", "ON", "INVALID", "AT", "EXCEPTION", "SIZE"]
                .contains(&cur.value.as_str())
    }

    /// Whether the cursor sits at a boundary which terminates a statement sequence.
    pub fn at_sentence_boundary(&self) -> bool {
        let cur = self.current();
        cur.is_eof()
            || cur.clause_context == TokenContext::IsStatement
            || cur.value.starts_with("END-")
            || [".", "END", "ELSE"].contains(&cur.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::compiler::analyzer::{
        err::DiagnosticKind, lexer::tokenize, sink::CollectingSink, symbols::SymbolTable,
        token::TokenCategory, Analyzer,
    };

    /// Runs the given closure over an analyzer for the given source, returning the kinds of
    /// all diagnostics reported and the values of the canonical output.
    fn with_analyzer(src: &str, f: impl FnOnce(&mut Analyzer)) -> (Vec<DiagnosticKind>, Vec<String>) {
        let tokens = tokenize(src);
        let mut symbols = SymbolTable::new();
        let mut sink = CollectingSink::new();
        let analyzed = {
            let mut analyzer = Analyzer::new("cursor.cob", &tokens, &mut symbols, &mut sink);
            f(&mut analyzer);
            analyzer.analyzed.iter().map(|t| t.value.clone()).collect()
        };
        let kinds = sink.into_diagnostics().into_iter().map(|d| d.kind).collect();
        (kinds, analyzed)
    }

    #[test]
    fn expected_advances_on_mismatch() {
        let (diags, out) = with_analyzer("A B C", |a| {
            a.expected("X");
            a.expected("B");
            assert!(a.current_is("C"));
        });
        assert_eq!(diags, vec![DiagnosticKind::ExpectedLiteral("X".into())]);
        assert_eq!(out, vec!["B"]);
    }

    #[test]
    fn optional_does_not_advance_on_mismatch() {
        let (diags, out) = with_analyzer("A B", |a| {
            assert!(!a.optional("B"));
            assert!(a.optional("A"));
            assert!(a.current_is("B"));
        });
        assert!(diags.is_empty());
        assert_eq!(out, vec!["A"]);
    }

    #[test]
    fn choice_retags_output_only() {
        let tokens = tokenize("STANDARD-OUTPUT");
        let mut symbols = SymbolTable::new();
        let mut sink = CollectingSink::new();
        let mut analyzer = Analyzer::new("cursor.cob", &tokens, &mut symbols, &mut sink);
        let matched = analyzer.choice(
            Some(TokenCategory::Device),
            &["STANDARD-OUTPUT", "STANDARD-ERROR"],
        );
        assert_eq!(matched.as_deref(), Some("STANDARD-OUTPUT"));
        assert_eq!(analyzer.analyzed[0].category, TokenCategory::Device);
        assert_eq!(tokens[0].category, TokenCategory::Reserved);
    }

    #[test]
    fn lookahead_clamps_at_both_ends() {
        with_analyzer("A B", |a| {
            assert!(a.lookahead(-5).is("A"));
            assert!(a.lookahead(10).is_eof());
            a.skip();
            a.skip();
            a.skip();
            a.skip();
            assert!(a.current().is_eof());
            assert!(a.lookahead(-1).is_eof());
            assert!(a.lookahead(-2).is("B"));
        });
    }

    #[test]
    fn category_mismatch_lists_description() {
        let (diags, _) = with_analyzer("\"text\"", |a| {
            a.identifier_or_number();
        });
        assert_eq!(
            diags,
            vec![DiagnosticKind::ExpectedCategory("identifier or numeric literal".into())]
        );
    }
}
