use super::{phrases::Phrase, Analyzer, ID, ID_LIT};
use crate::compiler::analyzer::token::TokenCategory;

const CLOSE_OPERANDS: &str = "The CLOSE statement only accepts file connector names. NOTE: This statement must not specify more than one file connector when inside of an exception-checking phrase in a PERFORM statement.";

/// Sources an ACCEPT statement may read from.
const ACCEPT_SOURCES: &[&str] = &[
    "STANDARD-INPUT",
    "COMMAND-LINE",
    "DATE",
    "DAY",
    "DAY-OF-WEEK",
    "TIME",
];

/////////////
// CONSOLE //
/////////////

impl<'a> Analyzer<'a> {
    /// `DISPLAY values [UPON device] [[WITH] NO ADVANCING] [END-DISPLAY]`
    pub(super) fn parse_display(&mut self) {
        self.expected("DISPLAY");
        self.check_category(ID_LIT, "identifier or literal");
        self.operands(ID_LIT);

        if self.optional("UPON") {
            self.choice(
                Some(TokenCategory::Device),
                &["STANDARD-OUTPUT", "STANDARD-ERROR"],
            );
        }

        if self.current_is("WITH") || self.current_is("NO") {
            self.optional("WITH");
            self.expected("NO");
            self.expected("ADVANCING");
        }

        self.optional("END-DISPLAY");
    }

    /// `ACCEPT identifier [FROM source] [END-ACCEPT]`
    pub(super) fn parse_accept(&mut self) {
        self.expected("ACCEPT");
        self.identifier();

        if self.optional("FROM") {
            match self.current().value.as_str() {
                "STANDARD-INPUT" | "COMMAND-LINE" => {
                    self.choice(
                        Some(TokenCategory::Device),
                        &["STANDARD-INPUT", "COMMAND-LINE"],
                    );
                }
                "DATE" => {
                    self.accept();
                    self.optional("YYYYMMDD");
                }
                "DAY" => {
                    self.accept();
                    self.optional("YYYYDDD");
                }
                "DAY-OF-WEEK" | "TIME" => self.accept(),
                _ => {
                    self.choice(None, ACCEPT_SOURCES);
                }
            }
        }

        self.optional("END-ACCEPT");
    }
}

///////////
// FILES //
///////////

impl<'a> Analyzer<'a> {
    /// `CLOSE file [REEL|UNIT [[FOR] REMOVAL] | [WITH] NO REWIND] {file ...}`
    pub(super) fn parse_close(&mut self) {
        self.expected("CLOSE");

        let mut files = 0;
        while self.at_identifier() {
            self.accept();
            files += 1;

            if self.current_is("REEL") || self.current_is("UNIT") {
                self.accept();
                if self.current_is("FOR") || self.current_is("REMOVAL") {
                    self.optional("FOR");
                    self.expected("REMOVAL");
                }
            } else if self.current_is("WITH") || self.current_is("NO") {
                self.optional("WITH");
                self.expected("NO");
                self.expected("REWIND");
            }
        }

        self.finish_list(files, CLOSE_OPERANDS);
    }

    /// `DELETE FILE [OVERRIDE] files [ON EXCEPTION ...]` or
    /// `DELETE record [RECORD] [RETRY ...] [INVALID KEY ...]`
    pub(super) fn parse_delete(&mut self) {
        self.expected("DELETE");

        let file = self.optional("FILE");
        if file {
            self.optional("OVERRIDE");
            self.identifier();
            self.operands(ID);
        } else {
            self.identifier();
            self.optional("RECORD");
        }

        if self.current_is("RETRY") {
            self.retry_phrase();
        }

        let phrase = if file {
            Phrase::OnException
        } else {
            Phrase::InvalidKey
        };
        let conditional = self.phrases(phrase);
        self.end_statement(conditional, "END-DELETE");
    }

    /// `REWRITE FILE file RECORD FROM value` or `REWRITE record [RECORD] [FROM value]`,
    /// followed by the retry, lock and invalid key phrases.
    pub(super) fn parse_rewrite(&mut self) {
        self.expected("REWRITE");

        if self.optional("FILE") {
            self.identifier();
            self.expected("RECORD");
            self.expected("FROM");
            self.value();
        } else {
            self.identifier();
            self.optional("RECORD");
            if self.optional("FROM") {
                self.value();
            }
        }

        if self.current_is("RETRY") {
            self.retry_phrase();
        }

        if self.current_is("WITH") || self.current_is("LOCK") || self.current_is("NO") {
            self.optional("WITH");
            if !self.optional("LOCK") {
                self.expected("NO");
                self.expected("LOCK");
            }
        }

        let conditional = self.phrases(Phrase::InvalidKey);
        self.end_statement(conditional, "END-REWRITE");
    }

    /// `RETURN file [RECORD] [INTO identifier] [RETRY ...] [AT END ...]`
    pub(super) fn parse_return(&mut self) {
        self.expected("RETURN");
        self.identifier();
        self.optional("RECORD");
        if self.optional("INTO") {
            self.identifier();
        }
        if self.current_is("RETRY") {
            self.retry_phrase();
        }

        let conditional = self.phrases(Phrase::AtEnd);
        self.end_statement(conditional, "END-RETURN");
    }

    /// `RELEASE record [FROM value]`
    pub(super) fn parse_release(&mut self) {
        self.expected("RELEASE");
        self.identifier();
        if self.optional("FROM") {
            self.value();
        }
    }

    pub(super) fn parse_unlock(&mut self) {
        self.expected("UNLOCK");
        self.identifier();
        if self.current_is("RECORD") || self.current_is("RECORDS") {
            self.accept();
        }
    }

    pub(super) fn parse_commit(&mut self) {
        self.expected("COMMIT");
    }

    pub(super) fn parse_rollback(&mut self) {
        self.expected("ROLLBACK");
    }
}
