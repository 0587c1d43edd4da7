use super::{phrases::Phrase, Analyzer, ID_NUM};

////////////////
// ARITHMETIC //
////////////////

impl<'a> Analyzer<'a> {
    /// `COMPUTE identifier {identifier} = arithmetic [size error phrases] [END-COMPUTE]`
    pub(super) fn parse_compute(&mut self) {
        self.expected("COMPUTE");
        self.identifiers();
        self.expected("=");
        self.arithmetic();

        let conditional = self.phrases(Phrase::SizeError);
        self.end_statement(conditional, "END-COMPUTE");
    }

    /// `ADD operands (TO operand GIVING targets | GIVING targets | TO targets)`
    pub(super) fn parse_add(&mut self) {
        self.expected("ADD");
        self.check_category(ID_NUM, "identifier or numeric literal");
        self.operands(ID_NUM);

        if self.current_is("TO") && self.lookahead_is(2, "GIVING") {
            self.expected("TO");
            self.identifier_or_number();
            self.giving();
        } else if self.current_is("GIVING") {
            self.giving();
        } else if self.optional("TO") {
            self.identifiers();
        } else {
            self.report_missing_choice(&["TO", "GIVING"]);
        }

        let conditional = self.phrases(Phrase::SizeError);
        self.end_statement(conditional, "END-ADD");
    }

    /// `SUBTRACT operands FROM (operand GIVING targets | targets)`
    pub(super) fn parse_subtract(&mut self) {
        self.expected("SUBTRACT");
        self.check_category(ID_NUM, "identifier or numeric literal");
        self.operands(ID_NUM);

        if self.current_is("FROM") && self.lookahead_is(2, "GIVING") {
            self.expected("FROM");
            self.identifier_or_number();
            self.giving();
        } else if self.optional("FROM") {
            self.identifiers();
        } else {
            self.report_missing("FROM");
        }

        let conditional = self.phrases(Phrase::SizeError);
        self.end_statement(conditional, "END-SUBTRACT");
    }

    /// `MULTIPLY operand BY (operand GIVING targets | targets)`
    pub(super) fn parse_multiply(&mut self) {
        self.expected("MULTIPLY");
        self.identifier_or_number();

        if self.current_is("BY") && self.lookahead_is(2, "GIVING") {
            self.expected("BY");
            self.identifier_or_number();
            self.giving();
        } else if self.optional("BY") {
            self.identifiers();
        } else {
            self.report_missing("BY");
        }

        let conditional = self.phrases(Phrase::SizeError);
        self.end_statement(conditional, "END-MULTIPLY");
    }

    /// `DIVIDE operand (BY|INTO operand GIVING (target REMAINDER target | targets) | INTO targets)`
    pub(super) fn parse_divide(&mut self) {
        self.expected("DIVIDE");
        self.identifier_or_number();

        if (self.current_is("BY") || self.current_is("INTO")) && self.lookahead_is(2, "GIVING") {
            self.choice(None, &["BY", "INTO"]);
            self.identifier_or_number();
            self.expected("GIVING");
            if self.lookahead_is(1, "REMAINDER") {
                self.identifier();
                self.expected("REMAINDER");
                self.identifier();
            } else {
                self.identifiers();
            }
        } else if self.optional("INTO") {
            self.identifiers();
        } else {
            self.report_missing_choice(&["BY", "INTO"]);
        }

        let conditional = self.phrases(Phrase::SizeError);
        self.end_statement(conditional, "END-DIVIDE");
    }

    fn giving(&mut self) {
        self.expected("GIVING");
        self.identifiers();
    }
}
