use super::{phrases::Phrase, Analyzer, ID};
use crate::compiler::analyzer::token::TokenCategory;

const CANCEL_OPERANDS: &str = "The CANCEL statement only accepts Alphanumeric or National literals and data items, or a program prototype name specified in the REPOSITORY paragraph.";

//////////////////
// CONTROL FLOW //
//////////////////

impl<'a> Analyzer<'a> {
    /// `CONTINUE [AFTER arithmetic SECONDS]`
    pub(super) fn parse_continue(&mut self) {
        self.expected("CONTINUE");
        if self.optional("AFTER") {
            self.arithmetic();
            self.expected("SECONDS");
        }
    }

    pub(super) fn parse_exit(&mut self) {
        self.expected("EXIT");
        if self.optional("PERFORM") {
            self.optional("CYCLE");
        } else if self.optional("PROGRAM") {
            if self.current_is("RAISING") {
                self.raising();
            }
        } else if !self.optional("PARAGRAPH") {
            self.optional("SECTION");
        }
    }

    /// `GO [TO] identifier` or `GO [TO] identifier {identifier} DEPENDING [ON] identifier`
    pub(super) fn parse_go(&mut self) {
        self.expected("GO");
        self.optional("TO");
        self.identifier();

        if self.current_is("DEPENDING") || self.at_identifier() {
            self.operands(ID);
            self.expected("DEPENDING");
            self.optional("ON");
            self.identifier();
        }
    }

    /// `GOBACK [RAISING ...] [WITH NORMAL|ERROR STATUS ...]`
    pub(super) fn parse_goback(&mut self) {
        self.expected("GOBACK");
        self.phrases(Phrase::RaisingStatus);
    }

    /// `STOP RUN [[WITH] NORMAL|ERROR [STATUS] value]`
    pub(super) fn parse_stop(&mut self) {
        self.expected("STOP");
        self.expected("RUN");
        if self.current_is("WITH") || self.current_is("NORMAL") || self.current_is("ERROR") {
            self.status();
        }
    }

    pub(super) fn parse_raise(&mut self) {
        self.expected("RAISE");
        self.optional("EXCEPTION");
        self.identifier();
    }

    /// `RESUME [AT] (NEXT STATEMENT | identifier)`
    pub(super) fn parse_resume(&mut self) {
        self.expected("RESUME");
        self.optional("AT");
        if self.optional("NEXT") {
            self.expected("STATEMENT");
        } else {
            self.identifier();
        }
    }
}

//////////////
// PROGRAMS //
//////////////

impl<'a> Analyzer<'a> {
    pub(super) fn parse_call(&mut self) {
        self.expected("CALL");
        self.operand(
            &[TokenCategory::String, TokenCategory::Identifier],
            "program name literal or identifier",
        );
        self.optional("END-CALL");
    }

    pub(super) fn parse_cancel(&mut self) {
        self.expected("CANCEL");
        self.operand_list(
            &[TokenCategory::Identifier, TokenCategory::String],
            CANCEL_OPERANDS,
        );
    }
}
