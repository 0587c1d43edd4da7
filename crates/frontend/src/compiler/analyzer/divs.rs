use super::{
    context::{SourceUnit, SourceUnitType},
    err::DiagnosticKind,
    token::TokenCategory,
    Analyzer,
};

/// Words which begin a new source unit.
const UNIT_START: &[&str] = &["IDENTIFICATION", "PROGRAM-ID", "FUNCTION-ID"];

////////////
// SOURCE //
////////////

impl<'a> Analyzer<'a> {
    /// Analyzes all source units within the token sequence, up to and including EOF.
    pub(super) fn source(&mut self) {
        while !self.at_eof() {
            self.source_unit();
            if !self.at_unit_start() {
                break;
            }
        }

        // Anything left over after the final unit is reported once, then discarded.
        if !self.at_eof() {
            self.report_here(
                "Unexpected tokens after the end of this source unit. Every statement must be within a PROCEDURE DIVISION, and every source unit must start with an ID paragraph.",
            );
            while !self.at_eof() {
                self.skip();
            }
        }

        let eof = self.current().clone();
        self.analyzed.push(eof);
    }

    /// Analyzes a single source unit, from its ID paragraph to its END marker.
    fn source_unit(&mut self) {
        self.identification();
        if self.current_is("ENVIRONMENT") {
            self.environment();
        }
        if self.current_is("DATA") {
            self.data();
        }
        self.procedure();
    }

    /// Whether the current token begins a new source unit.
    pub(super) fn at_unit_start(&self) -> bool {
        UNIT_START.iter().any(|w| self.current_is(w))
    }
}

/////////////////////////////
// IDENTIFICATION DIVISION //
/////////////////////////////

impl<'a> Analyzer<'a> {
    /// Analyzes the (optional) identification division header, and the unit's ID paragraph.
    fn identification(&mut self) {
        if self.current_is("IDENTIFICATION") {
            self.expected("IDENTIFICATION");
            self.expected("DIVISION");
            self.expected_with(
                ".",
                "Missing separator period at the end of this IDENTIFICATION DIVISION header, every division header must end with a separator period.",
                -1,
            );
        }

        if self.current_is("PROGRAM-ID") {
            self.unit_id(SourceUnitType::Program);
        } else if self.current_is("FUNCTION-ID") {
            self.unit_id(SourceUnitType::Function);
        } else {
            // Never carry the previous unit's context into this one.
            self.unit = SourceUnit::default();
            self.report_here(
                "Missing source unit ID name (PROGRAM-ID, FUNCTION-ID, CLASS-ID...), the identification division header is optional but every source unit must still have an ID.",
            );
        }
    }

    /// Analyzes a PROGRAM-ID or FUNCTION-ID paragraph, resetting the source unit context.
    fn unit_id(&mut self, kind: SourceUnitType) {
        self.accept();
        self.expected(".");

        let id = match self.current_category() {
            TokenCategory::Identifier => self.current().value.clone(),
            _ => String::new(),
        };
        self.unit = SourceUnit::new(id, kind);
        self.identifier();
        self.expected(".");

        tracing::info!(unit = %self.unit.id, kind = %kind, "analyzing source unit");
    }
}

//////////////////////////
// ENVIRONMENT DIVISION //
//////////////////////////

impl<'a> Analyzer<'a> {
    fn environment(&mut self) {
        tracing::debug!(unit = %self.unit.id, "environment division");
        self.expected("ENVIRONMENT");
        self.expected("DIVISION");
        self.expected_with(
            ".",
            "Missing separator period at the end of this ENVIRONMENT DIVISION header, every division header must end with a separator period.",
            -1,
        );
    }
}

////////////////////////
// PROCEDURE DIVISION //
////////////////////////

impl<'a> Analyzer<'a> {
    /// Analyzes a procedure division, up to and including the unit's END marker.
    fn procedure(&mut self) {
        tracing::debug!(unit = %self.unit.id, "procedure division");
        self.expected("PROCEDURE");
        self.expected("DIVISION");

        // Functions must always declare a returning item, programs only optionally.
        if self.unit.is_function() {
            self.expected("RETURNING");
            self.returning_data_name();
        } else if self.optional("RETURNING") {
            self.returning_data_name();
        }

        self.expected_with(
            ".",
            "Missing separator period at the end of this PROCEDURE DIVISION header, every division header must end with a separator period.",
            -1,
        );
        self.procedure_body();

        if self.at_unit_start() {
            let msg = match self.unit.kind {
                SourceUnitType::Function => "Missing END FUNCTION marker. User-defined functions must always end with an END FUNCTION marker.".to_string(),
                SourceUnitType::Program => format!(
                    "Missing END {} marker. If another source unit is present after the end of the current source unit, the current unit must contain an END marker.",
                    self.unit.kind
                ),
            };
            let anchor = self.lookahead(-1).clone();
            self.report(anchor, DiagnosticKind::General(msg));
            return;
        }

        let keyword = self.unit.kind.keyword();
        if self.unit.is_function() || (self.current_is("END") && self.lookahead_is(1, keyword)) {
            self.end_marker();
        }
    }

    /// Analyzes the sentences of a procedure division, along with any paragraph and
    /// section headers between them.
    fn procedure_body(&mut self) {
        loop {
            self.statements(false);

            if self.at_identifier() && self.lookahead_is(1, ".") {
                tracing::debug!(paragraph = %self.current().value, "paragraph");
                self.accept();
                self.accept();
            } else if self.at_identifier()
                && self.lookahead_is(1, "SECTION")
                && self.lookahead_is(2, ".")
            {
                tracing::debug!(section = %self.current().value, "procedure section");
                self.accept();
                self.accept();
                self.accept();
            } else {
                break;
            }
        }
    }

    /// Analyzes the target of a procedure division RETURNING phrase.
    /// The target must already be declared within this unit, it is never created here.
    fn returning_data_name(&mut self) {
        if !self.at_identifier() {
            let anchor = self.lookahead(-1).clone();
            self.report(
                anchor,
                DiagnosticKind::General(
                    "Missing returning data item after this RETURNING definition.".into(),
                ),
            );
            return;
        }

        let name = self.current().value.clone();
        self.identifier();
        if !self.symbols.contains(&self.unit.key(&name)) {
            let anchor = self.lookahead(-1).clone();
            self.report(
                anchor,
                DiagnosticKind::General(
                    "No data item found with this name in this source unit's data division. Please define a new returning data item in this unit's linkage section.".into(),
                ),
            );
        }
    }

    /// Analyzes an `END PROGRAM <name> .` or `END FUNCTION <name> .` marker.
    fn end_marker(&mut self) {
        let kind = self.unit.kind;
        self.expected("END");
        self.expected(kind.keyword());

        if self.at_identifier() && !self.current_is(&self.unit.id) && !self.unit.id.is_empty() {
            let msg = format!(
                "The name on this END {kind} marker must match the {kind}-ID of the source unit it ends ('{}').",
                self.unit.id
            );
            self.report_here(&msg);
        }
        self.identifier();
        self.expected_with(
            ".",
            &format!("Missing separator period at the end of this END {kind} definition."),
            -1,
        );
    }
}
