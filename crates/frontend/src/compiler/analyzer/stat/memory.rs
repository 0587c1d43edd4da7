use super::{Analyzer, ID, ID_NUM};
use crate::compiler::analyzer::token::TokenCategory;

const MOVE_SOURCE: &str = "The MOVE statement must only contain a single data item identifier, datatype literal or an intrisic function which returns a data item before the \"TO\" reserved word.";
const MOVE_TARGETS: &str =
    "The MOVE statement must only contain data item identifiers after the \"TO\" reserved word.";
const FREE_OPERANDS: &str = "The FREE statement must only contain based data item identifiers.";

/// Operands a MOVE statement may take its value from.
const MOVE_SOURCES: &[TokenCategory] = &[
    TokenCategory::Identifier,
    TokenCategory::Numeric,
    TokenCategory::String,
    TokenCategory::FigurativeLiteral,
];

impl<'a> Analyzer<'a> {
    /// `ALLOCATE [based] [arithmetic CHARACTERS] [INITIALIZED] [RETURNING identifier]`
    pub(super) fn parse_allocate(&mut self) {
        self.expected("ALLOCATE");

        // A based item is only present when the identifier does not start the size.
        let next = self.lookahead(1);
        let starts_size = next.is("CHARACTERS")
            || (next.category == TokenCategory::Symbol && !next.is("."));
        if self.at_identifier() && !starts_size {
            self.accept();
        }

        if self.at_category(ID_NUM) {
            self.arithmetic();
            self.expected("CHARACTERS");
        }

        self.optional("INITIALIZED");
        if self.optional("RETURNING") {
            self.identifier();
        }
    }

    pub(super) fn parse_free(&mut self) {
        self.expected("FREE");
        self.operand_list(ID, FREE_OPERANDS);
    }

    /// `MOVE CORR identifier TO identifier` or `MOVE source TO identifier {identifier}`
    pub(super) fn parse_move(&mut self) {
        self.expected("MOVE");

        if self.current_is("CORRESPONDING") || self.current_is("CORR") {
            self.accept();
            self.identifier();
            self.expected("TO");
            self.identifier();
            return;
        }

        if self.at_category(MOVE_SOURCES) {
            self.accept();
        } else {
            self.report_here(MOVE_SOURCE);
            if !self.current_is("TO") {
                self.skip();
            }
        }

        self.expected("TO");
        let targets = self.operands(ID);
        self.finish_list(targets, MOVE_TARGETS);
    }
}
