use super::{
    err::DiagnosticKind,
    symbols::{ConstantValue, DataItemInfo, DataSection, ItemShape, PictureType, SymbolKey},
    token::{Token, TokenCategory},
    Analyzer,
};

const DUPLICATE_ITEM: &str =
    "A data item with this name already exists in this program, data items in a program must have a unique name.";

///////////////////
// DATA DIVISION //
///////////////////

impl<'a> Analyzer<'a> {
    /// Analyzes a data division, along with all of its sections.
    pub(super) fn data(&mut self) {
        tracing::debug!(unit = %self.unit.id, "data division");
        self.expected("DATA");
        self.expected("DIVISION");
        self.expected_with(
            ".",
            "Missing separator period at the end of this DATA DIVISION header, every division header must end with a separator period.",
            -1,
        );

        for section in [
            DataSection::WorkingStorage,
            DataSection::LocalStorage,
            DataSection::Linkage,
        ] {
            if self.current_is(section.keyword()) {
                self.data_section(section);
            }
        }

        if !self.current_is("PROCEDURE") {
            let token = self.current().clone();
            self.report(
                token,
                DiagnosticKind::ExpectedCategory("Data Division data items and sections".into()),
            );
            self.skip();
        }
    }

    /// Analyzes a single data division section header, and the entries within it.
    fn data_section(&mut self, section: DataSection) {
        tracing::debug!(unit = %self.unit.id, section = section.keyword(), "data section");
        self.unit.section = Some(section);
        self.expected(section.keyword());
        self.expected("SECTION");
        self.expected(".");

        while self.current_category() == TokenCategory::Numeric {
            self.entries();
        }
    }

    /// Analyzes a single top level data description entry, and its subordinates.
    fn entries(&mut self) {
        if self.lookahead_is(2, "CONSTANT") {
            self.constant_entry();
        } else if self.current_is("77") {
            self.base_entry();
        } else if self.current_is("01") || self.current_is("1") {
            self.record_entry();
        } else {
            self.report_here(
                "Invalid level number for this data item, entries must begin with a level number of 01 or 77. Level numbers 02 to 49 may only follow a level 01 record entry.",
            );
            self.base_entry();
        }
    }

    /// Analyzes a record entry, followed by any subordinate entries.
    /// Subordinates are recorded as flat entries, they are not linked to their record.
    fn record_entry(&mut self) {
        self.base_entry();
        while self.subordinate_level().is_some() {
            self.base_entry();
        }
    }

    /// Returns the level number of the current token, if it is a subordinate level (02-49).
    fn subordinate_level(&self) -> Option<u8> {
        if self.current_category() != TokenCategory::Numeric {
            return None;
        }
        self.current()
            .value
            .parse::<u8>()
            .ok()
            .filter(|level| (2..=49).contains(level))
    }

    /// Declares a new data item within the current unit, from the given name token.
    /// Returns the item's key, or [`None`] if an item with this name already exists.
    fn declare(&mut self, name: &Token, level: u8, constant: bool) -> Option<SymbolKey> {
        let key = self.unit.key(&name.value);
        let item = if constant {
            DataItemInfo::constant(name.value.as_str(), level, name.line)
        } else {
            DataItemInfo::storage(name.value.as_str(), level, name.line)
        };

        match self.symbols.add_data_item(key.clone(), item) {
            Ok(()) => {
                if let Some(section) = self.unit.section {
                    self.symbols.set_section(&key, section);
                }
                Some(key)
            }
            Err(original) => {
                let msg = format!(
                    "{DUPLICATE_ITEM} The original {} data item can be found at line {}.",
                    original.identifier, original.line
                );
                let anchor = self.lookahead(-1).clone();
                self.report(anchor, DiagnosticKind::General(msg));
                None
            }
        }
    }

    /// Analyzes a level number and data name, declaring the item.
    fn entry_header(&mut self, constant: bool) -> Option<SymbolKey> {
        let level = self.current().value.parse::<u8>().unwrap_or_default();
        self.number();

        let name = self.current().clone();
        self.identifier()?;
        self.declare(&name, level, constant)
    }
}

////////////////
// BASE ENTRY //
////////////////

impl<'a> Analyzer<'a> {
    /// Analyzes a single storage data description entry.
    /// Mutations are only applied when the entry was freshly declared, so a duplicate
    /// entry never alters the original.
    fn base_entry(&mut self) {
        let key = self.entry_header(false);

        if !self.at_clause() && !self.current_is(".") && !self.at_eof() {
            let msg = format!(
                "Expected data division clauses or a separator period after this data item's identifier. Token found ('{}') was not a data division clause reserved word.",
                self.current()
            );
            self.report_here(&msg);
            self.skip();
        }

        let mut has_picture = false;
        while self.at_clause() {
            has_picture |= self.clause(key.as_ref());
        }

        if let Some(key) = &key {
            let shape = if has_picture {
                ItemShape::Elementary
            } else {
                ItemShape::Group
            };
            self.symbols.set_shape(key, shape);
        }

        self.expected_with(
            ".",
            "Missing separator period at the end of this data item definition, each data item must end with a separator period.",
            -1,
        );
    }

    /// Analyzes a single data description clause. Returns whether it was a PICTURE clause.
    fn clause(&mut self, key: Option<&SymbolKey>) -> bool {
        let next = self.lookahead(1);
        let word = if self.current_is("IS")
            && ["EXTERNAL", "GLOBAL", "TYPEDEF"].contains(&next.value.as_str())
        {
            next.value.clone()
        } else {
            self.current().value.clone()
        };

        match word.as_str() {
            "EXTERNAL" => self.external_clause(key),
            "GLOBAL" => {
                self.optional("IS");
                self.expected("GLOBAL");
                if let Some(key) = key {
                    self.symbols.mark_global(key);
                }
            }
            "TYPEDEF" => {
                self.optional("IS");
                self.expected("TYPEDEF");
            }
            "BASED" => {
                self.accept();
                if let Some(key) = key {
                    self.symbols.mark_based(key);
                }
            }
            "PIC" | "PICTURE" => {
                self.picture_clause(key);
                return true;
            }
            "VALUE" => self.value_clause(key),

            // A lone "IS", with nothing it can belong to.
            _ if self.current_is("IS") => {
                self.report_here(
                    "Missing clause or possible clause mismatch, in this context the \"IS\" word must be followed by the EXTERNAL, GLOBAL or TYPEDEF clauses only (IS TYPEDEF), or must be in the middle of the PICTURE clause (PIC IS ...).",
                );
                self.skip();
            }

            // Clauses without any analysis are consumed as-is (e.g. USAGE words).
            _ => self.accept(),
        }
        false
    }

    /// Analyzes an `[IS] EXTERNAL [AS literal]` clause.
    fn external_clause(&mut self, key: Option<&SymbolKey>) {
        self.optional("IS");
        self.expected("EXTERNAL");

        let external_name = if self.optional("AS") {
            self.string_with(
                "Missing externalized name, the \"AS\" word on the EXTERNAL clause must be followed by an alphanumeric or national literal.",
                -1,
            )
            .map(|lit| unquote(&lit.value).to_string())
        } else {
            key.map(|k| k.name.clone())
        };

        if let (Some(key), Some(name)) = (key, external_name) {
            self.symbols.mark_external(key, &name);
        }
    }

    /// Analyzes a `PIC [IS] type(length) [V9(scale)]` clause.
    fn picture_clause(&mut self, key: Option<&SymbolKey>) {
        self.choice(None, &["PIC", "PICTURE"]);
        self.optional("IS");

        let data_type = PictureType::from_code(&self.current().value);
        match data_type {
            Some(data_type) => {
                self.accept();
                if let Some(key) = key {
                    self.symbols.set_type(key, data_type);
                }
            }
            None => {
                self.report_here(
                    "Unrecognized type, PICTURE type must be S9, 9, X, A, N or 1. These are Signed Numeric, Unsigned Numeric, Alphanumeric, Alphabetic, National and Boolean respectively.",
                );
                self.skip();
            }
        }

        self.expected("(");
        let mut length = self.current().value.clone();
        self.number();
        self.expected(")");

        if self.current_is("V9") {
            if data_type.is_some_and(|t| !t.is_numeric()) {
                self.report_here("V9 cannot be used with non-numeric types.");
            }
            self.accept();
            self.expected("(");
            length.push('V');
            length.push_str(&self.current().value);
            self.number();
            self.expected(")");
        }

        if let Some(key) = key {
            self.symbols.set_picture(key, length);
        }
    }

    /// Analyzes a `VALUE literal` clause.
    fn value_clause(&mut self, key: Option<&SymbolKey>) {
        self.expected("VALUE");
        match self.current_category() {
            TokenCategory::String | TokenCategory::Numeric => {
                let value = self.current().value.clone();
                if let Some(key) = key {
                    self.symbols.set_default(key, &value);
                }
                self.accept();
            }
            _ => {
                self.report_here(
                    "The only tokens allowed after a VALUE clause are type literals, like an Alphanumeric literal (\"Hello, World!\") or a Numeric literal (123.456).",
                );
                if !self.current_is(".") {
                    self.skip();
                }
            }
        }
    }
}

////////////////////
// CONSTANT ENTRY //
////////////////////

impl<'a> Analyzer<'a> {
    /// Analyzes a level 01 constant entry.
    fn constant_entry(&mut self) {
        if !self.current_is("01") && !self.current_is("1") {
            self.report_here(
                "Invalid level number for this data item, CONSTANT data items must have a level number of 1 or 01.",
            );
        }
        let key = self.entry_header(true);
        self.expected("CONSTANT");

        if self.current_is("IS") || self.current_is("GLOBAL") {
            self.optional("IS");
            self.expected("GLOBAL");
            if let Some(key) = &key {
                self.symbols.mark_global(key);
            }
        }

        let value = if self.optional("FROM") {
            self.identifier()
                .map(|id| ConstantValue::From(id.value))
        } else {
            self.optional("AS");
            let value = match self.current_category() {
                TokenCategory::String | TokenCategory::Numeric | TokenCategory::FigurativeLiteral => {
                    let lit = self.current().value.clone();
                    self.accept();
                    Some(ConstantValue::Literal(lit))
                }
                _ => {
                    let token = self.current().clone();
                    self.report(
                        token,
                        DiagnosticKind::ExpectedCategory(
                            "literal, figurative literal or FROM identifier".into(),
                        ),
                    );
                    if !self.current_is(".") {
                        self.skip();
                    }
                    None
                }
            };

            for length_kind in ["LENGTH", "BYTE-LENGTH"] {
                if self.optional(length_kind) {
                    self.optional("OF");
                    self.identifier();
                }
            }
            value
        };

        if let (Some(key), Some(value)) = (&key, value) {
            self.symbols.set_constant_value(key, value);
        }

        self.expected_with(
            ".",
            "Missing separator period at the end of this data item definition, each data item must end with a separator period.",
            -1,
        );
    }
}

/// Strips the delimiting quotes from a string literal.
fn unquote(lit: &str) -> &str {
    let trimmed = lit
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| lit.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')));
    trimmed.unwrap_or(lit)
}
