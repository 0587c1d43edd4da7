use std::fmt::Display;

use super::symbols::{DataSection, SymbolKey};

/// The kind of source unit currently being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceUnitType {
    #[default]
    Program,
    Function,
}

impl SourceUnitType {
    /// The reserved word used within this unit's END marker.
    pub fn keyword(&self) -> &'static str {
        match self {
            SourceUnitType::Program => "PROGRAM",
            SourceUnitType::Function => "FUNCTION",
        }
    }
}

impl Display for SourceUnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Context for the single source unit (PROGRAM-ID or FUNCTION-ID definition) being analyzed.
/// Replaced wholesale at every unit boundary, so no state carries over between units.
#[derive(Debug, Clone, Default)]
pub struct SourceUnit {
    /// The unit's ID name. Empty until an ID paragraph has been seen.
    pub id: String,
    pub kind: SourceUnitType,

    /// The data division section entries are currently being declared in.
    pub section: Option<DataSection>,
}

impl SourceUnit {
    pub fn new(id: impl Into<String>, kind: SourceUnitType) -> Self {
        Self {
            id: id.into(),
            kind,
            section: None,
        }
    }

    /// Generates the symbol table key for a data item declared within this unit.
    pub fn key(&self, name: &str) -> SymbolKey {
        SymbolKey::new(self.id.as_str(), name)
    }

    pub fn is_function(&self) -> bool {
        self.kind == SourceUnitType::Function
    }
}
