/**
 * Conditional phrases shared between statements.
 * Each phrase comes in a positive and a negative form (`ON SIZE ERROR` and
 * `NOT ON SIZE ERROR`), and each form may be written at most once per statement.
 */
use super::{Analyzer, ID_LIT};

/// A pair of mutually exclusive conditional phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phrase {
    SizeError,
    InvalidKey,
    OnException,
    AtEnd,
    /// The GOBACK pair, `RAISING ...` and `WITH NORMAL|ERROR STATUS ...`.
    RaisingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    fn other(self) -> Self {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }
}

/// Which forms of a phrase pair have been seen within the current statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum PhraseState {
    #[default]
    None,
    SawPositive,
    SawNegative,
    SawBoth,
}

impl PhraseState {
    /// Records a phrase of the given polarity.
    /// Returns [`Err`] with the unchanged state when that form was already seen.
    pub fn record(self, polarity: Polarity) -> Result<Self, Self> {
        use PhraseState::*;
        match (self, polarity) {
            (None, Polarity::Positive) => Ok(SawPositive),
            (None, Polarity::Negative) => Ok(SawNegative),
            (SawNegative, Polarity::Positive) | (SawPositive, Polarity::Negative) => Ok(SawBoth),
            (state, _) => Err(state),
        }
    }
}

impl Phrase {
    /// The name of the given form, as written in diagnostics.
    pub fn name(self, polarity: Polarity) -> &'static str {
        match (self, polarity) {
            (Phrase::SizeError, Polarity::Positive) => "ON SIZE ERROR",
            (Phrase::SizeError, Polarity::Negative) => "NOT ON SIZE ERROR",
            (Phrase::InvalidKey, Polarity::Positive) => "INVALID KEY",
            (Phrase::InvalidKey, Polarity::Negative) => "NOT INVALID KEY",
            (Phrase::OnException, Polarity::Positive) => "ON EXCEPTION",
            (Phrase::OnException, Polarity::Negative) => "NOT ON EXCEPTION",
            (Phrase::AtEnd, Polarity::Positive) => "AT END",
            (Phrase::AtEnd, Polarity::Negative) => "NOT AT END",
            (Phrase::RaisingStatus, Polarity::Positive) => "RAISING",
            (Phrase::RaisingStatus, Polarity::Negative) => "WITH NORMAL/ERROR STATUS",
        }
    }

    /// The diagnostic for a second occurrence of the given form.
    pub fn duplicate_message(self, polarity: Polarity) -> String {
        format!(
            "{} can only be specified once in this statement. The same applies to {}.",
            self.name(polarity),
            self.name(polarity.other())
        )
    }
}

impl<'a> Analyzer<'a> {
    /// Whether the positive form of the given phrase starts at the given offset.
    fn positive_phrase_at(&self, phrase: Phrase, offset: isize) -> bool {
        let at = |literal: &str| self.lookahead_is(offset, literal);
        let next = |literal: &str| self.lookahead_is(offset + 1, literal);
        match phrase {
            Phrase::SizeError => (at("ON") && next("SIZE")) || at("SIZE"),
            Phrase::InvalidKey => at("INVALID"),
            Phrase::OnException => (at("ON") && next("EXCEPTION")) || at("EXCEPTION"),
            Phrase::AtEnd => {
                (at("AT") && next("END"))
                    || (at("END") && !next("PROGRAM") && !next("FUNCTION"))
            }
            Phrase::RaisingStatus => at("RAISING"),
        }
    }

    /// Returns which form of the given phrase starts at the cursor, if any.
    fn phrase_at(&self, phrase: Phrase) -> Option<Polarity> {
        if self.positive_phrase_at(phrase, 0) {
            return Some(Polarity::Positive);
        }

        let negative = match phrase {
            Phrase::RaisingStatus => {
                self.current_is("WITH") || self.current_is("NORMAL") || self.current_is("ERROR")
            }
            _ => self.current_is("NOT") && self.positive_phrase_at(phrase, 1),
        };
        negative.then_some(Polarity::Negative)
    }

    /// Analyzes any number of the given phrase pair, reporting every repeated form.
    /// Returns whether any form was present, which makes the statement's END marker
    /// mandatory.
    pub(super) fn phrases(&mut self, phrase: Phrase) -> bool {
        let mut state = PhraseState::None;

        while let Some(polarity) = self.phrase_at(phrase) {
            match state.record(polarity) {
                Ok(next) => state = next,
                Err(_) => self.report_here(&phrase.duplicate_message(polarity)),
            }
            self.phrase_body(phrase, polarity);
        }

        state != PhraseState::None
    }

    fn phrase_body(&mut self, phrase: Phrase, polarity: Polarity) {
        if phrase == Phrase::RaisingStatus {
            match polarity {
                Polarity::Positive => self.raising(),
                Polarity::Negative => self.status(),
            }
            return;
        }

        if polarity == Polarity::Negative {
            self.expected("NOT");
        }
        match phrase {
            Phrase::SizeError => {
                self.optional("ON");
                self.expected("SIZE");
                self.expected("ERROR");
            }
            Phrase::InvalidKey => {
                self.expected("INVALID");
                self.optional("KEY");
            }
            Phrase::OnException => {
                self.optional("ON");
                self.expected("EXCEPTION");
            }
            Phrase::AtEnd => {
                self.optional("AT");
                self.expected("END");
            }
            Phrase::RaisingStatus => {}
        }
        self.statements(true);
    }

    /// Analyzes `RAISING (EXCEPTION identifier | LAST [EXCEPTION] | identifier)`.
    pub(super) fn raising(&mut self) {
        self.expected("RAISING");
        if self.optional("EXCEPTION") {
            self.identifier();
        } else if self.optional("LAST") {
            self.optional("EXCEPTION");
        } else {
            self.identifier();
        }
    }

    /// Analyzes `[WITH] NORMAL|ERROR [STATUS] [value]`.
    pub(super) fn status(&mut self) {
        self.optional("WITH");
        self.choice(None, &["NORMAL", "ERROR"]);
        self.optional("STATUS");
        if self.at_category(ID_LIT) {
            self.accept();
        }
    }

    /// Analyzes `RETRY (FOREVER | [FOR] arithmetic SECONDS | arithmetic TIMES)`.
    pub(super) fn retry_phrase(&mut self) {
        self.expected("RETRY");
        if self.optional("FOREVER") {
            return;
        }

        let has_for = self.optional("FOR");
        self.arithmetic();
        if has_for || self.current_is("SECONDS") {
            self.expected("SECONDS");
        } else {
            self.expected("TIMES");
        }
    }
}
