use super::{Analyzer, ID};

const REPORT_ENTRIES: &str = "must only contain report entry identifiers defined in the report section.";

///////////////////
// REPORT WRITER //
///////////////////

impl<'a> Analyzer<'a> {
    pub(super) fn parse_initiate(&mut self) {
        self.expected("INITIATE");
        self.operand_list(ID, &format!("The INITIATE statement {REPORT_ENTRIES}"));
    }

    pub(super) fn parse_terminate(&mut self) {
        self.expected("TERMINATE");
        self.operand_list(ID, &format!("The TERMINATE statement {REPORT_ENTRIES}"));
    }

    pub(super) fn parse_generate(&mut self) {
        self.expected("GENERATE");
        self.identifier();
    }

    /// `SUPPRESS [PRINTING]`
    pub(super) fn parse_suppress(&mut self) {
        self.expected("SUPPRESS");
        self.optional("PRINTING");
    }

    pub(super) fn parse_validate(&mut self) {
        self.expected("VALIDATE");
        self.operand_list(
            ID,
            "The VALIDATE statement must only contain data item identifiers.",
        );
    }
}
