/**
 * Symbol table of declared data items, keyed by source unit and data item name.
 * Entries are created once per data description entry and then filled in as the
 * entry's clauses are analyzed.
 */
use std::{collections::BTreeMap, fmt::Display};

use serde::{Serialize, Serializer};

/// A unique key for a single data item: the owning source unit's ID, and the item name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolKey {
    pub unit: String,
    pub name: String,
}

impl SymbolKey {
    pub fn new(unit: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            name: name.into(),
        }
    }
}

impl Display for SymbolKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.unit, self.name)
    }
}

/// The data division section a data item was declared within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataSection {
    #[serde(rename = "WORKING-STORAGE")]
    WorkingStorage,
    #[serde(rename = "LOCAL-STORAGE")]
    LocalStorage,
    #[serde(rename = "LINKAGE")]
    Linkage,
}

impl DataSection {
    /// The reserved word naming this section.
    pub fn keyword(&self) -> &'static str {
        match self {
            DataSection::WorkingStorage => "WORKING-STORAGE",
            DataSection::LocalStorage => "LOCAL-STORAGE",
            DataSection::Linkage => "LINKAGE",
        }
    }
}

/// The base type code of a PICTURE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PictureType {
    #[serde(rename = "S9")]
    SignedNumeric,
    #[serde(rename = "9")]
    Numeric,
    #[serde(rename = "X")]
    Alphanumeric,
    #[serde(rename = "A")]
    Alphabetic,
    #[serde(rename = "N")]
    National,
    #[serde(rename = "1")]
    Boolean,
}

impl PictureType {
    /// Parses a PICTURE type code.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "S9" => PictureType::SignedNumeric,
            "9" => PictureType::Numeric,
            "X" => PictureType::Alphanumeric,
            "A" => PictureType::Alphabetic,
            "N" => PictureType::National,
            "1" => PictureType::Boolean,
            _ => return None,
        })
    }

    /// Whether this type may carry an implied decimal scale (`V9(n)`).
    pub fn is_numeric(&self) -> bool {
        matches!(self, PictureType::SignedNumeric | PictureType::Numeric)
    }
}

/// Whether a storage item holds data directly, or groups subordinate items.
/// Decided once all clauses of the entry have been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemShape {
    #[default]
    Undecided,
    Elementary,
    Group,
}

/// The value a constant entry is defined by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantValue {
    /// A literal or figurative literal value.
    Literal(String),

    /// The value of another data item (`FROM identifier`).
    From(String),
}

/// Attributes of a storage (non-constant) data item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StorageAttrs {
    pub data_type: Option<PictureType>,

    /// The digit count from the PICTURE clause, with an optional scale (e.g. `5V2`).
    pub picture_length: Option<String>,
    pub default_value: Option<String>,
    pub shape: ItemShape,
}

/// The structural class of a data item.
/// Constants never carry PICTURE/VALUE state, and are never elementary or group items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum DataItemClass {
    Storage(StorageAttrs),
    Constant { value: Option<ConstantValue> },
}

/// Information about a single declared data item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataItemInfo {
    identifier: String,
    level_number: u8,
    line: usize,

    pub section: Option<DataSection>,

    /// Name of the owning group item. Hierarchy is currently not computed, so this is
    /// only set through [`SymbolTable::set_parent`].
    pub parent: Option<String>,
    pub external_name: Option<String>,
    pub is_external: bool,
    pub is_global: bool,
    pub is_based: bool,

    #[serde(flatten)]
    pub class: DataItemClass,
}

impl DataItemInfo {
    /// Creates a new storage data item, with no attributes yet.
    pub fn storage(identifier: impl Into<String>, level_number: u8, line: usize) -> Self {
        Self::with_class(
            identifier,
            level_number,
            line,
            DataItemClass::Storage(StorageAttrs::default()),
        )
    }

    /// Creates a new constant data item, with no value yet.
    pub fn constant(identifier: impl Into<String>, level_number: u8, line: usize) -> Self {
        Self::with_class(
            identifier,
            level_number,
            line,
            DataItemClass::Constant { value: None },
        )
    }

    fn with_class(
        identifier: impl Into<String>,
        level_number: u8,
        line: usize,
        class: DataItemClass,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            level_number,
            line,
            section: None,
            parent: None,
            external_name: None,
            is_external: false,
            is_global: false,
            is_based: false,
            class,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn level_number(&self) -> u8 {
        self.level_number
    }

    /// The source line the item was declared on.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.class, DataItemClass::Constant { .. })
    }

    pub fn is_elementary(&self) -> bool {
        self.storage_attrs().is_some_and(|s| s.shape == ItemShape::Elementary)
    }

    pub fn is_group(&self) -> bool {
        self.storage_attrs().is_some_and(|s| s.shape == ItemShape::Group)
    }

    pub fn data_type(&self) -> Option<PictureType> {
        self.storage_attrs().and_then(|s| s.data_type)
    }

    pub fn picture_length(&self) -> Option<&str> {
        self.storage_attrs().and_then(|s| s.picture_length.as_deref())
    }

    pub fn default_value(&self) -> Option<&str> {
        self.storage_attrs().and_then(|s| s.default_value.as_deref())
    }

    pub fn constant_value(&self) -> Option<&ConstantValue> {
        match &self.class {
            DataItemClass::Constant { value } => value.as_ref(),
            DataItemClass::Storage(_) => None,
        }
    }

    fn storage_attrs(&self) -> Option<&StorageAttrs> {
        match &self.class {
            DataItemClass::Storage(attrs) => Some(attrs),
            DataItemClass::Constant { .. } => None,
        }
    }

    fn storage_mut(&mut self) -> Option<&mut StorageAttrs> {
        match &mut self.class {
            DataItemClass::Storage(attrs) => Some(attrs),
            DataItemClass::Constant { .. } => None,
        }
    }
}

/// Details of an existing entry which blocked the insertion of a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateItem {
    pub identifier: String,
    pub line: usize,
}

/// Store of all data items declared within a compilation run.
/// Owned by the caller and lent to the analyzer, so it can be handed on to later phases.
#[derive(Debug, Default)]
pub struct SymbolTable {
    items: BTreeMap<SymbolKey, DataItemInfo>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new data item under the given key.
    /// If an item already exists with this key, it is left untouched and its details are
    /// returned as an error.
    pub fn add_data_item(&mut self, key: SymbolKey, item: DataItemInfo) -> Result<(), DuplicateItem> {
        if let Some(existing) = self.items.get(&key) {
            return Err(DuplicateItem {
                identifier: existing.identifier.clone(),
                line: existing.line,
            });
        }
        self.items.insert(key, item);
        Ok(())
    }

    pub fn get(&self, key: &SymbolKey) -> Option<&DataItemInfo> {
        self.items.get(key)
    }

    pub fn contains(&self, key: &SymbolKey) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // The mutators below are no-ops for keys that do not exist, and storage attributes
    // are never applied to constants.

    pub fn set_section(&mut self, key: &SymbolKey, section: DataSection) {
        if let Some(item) = self.items.get_mut(key) {
            item.section = Some(section);
        }
    }

    pub fn set_parent(&mut self, key: &SymbolKey, parent: &str) {
        if let Some(item) = self.items.get_mut(key) {
            item.parent = Some(parent.to_string());
        }
    }

    pub fn set_type(&mut self, key: &SymbolKey, data_type: PictureType) {
        if let Some(attrs) = self.items.get_mut(key).and_then(|i| i.storage_mut()) {
            attrs.data_type = Some(data_type);
        }
    }

    pub fn set_picture(&mut self, key: &SymbolKey, picture_length: String) {
        if let Some(attrs) = self.items.get_mut(key).and_then(|i| i.storage_mut()) {
            attrs.picture_length = Some(picture_length);
        }
    }

    pub fn set_default(&mut self, key: &SymbolKey, value: &str) {
        if let Some(attrs) = self.items.get_mut(key).and_then(|i| i.storage_mut()) {
            attrs.default_value = Some(value.to_string());
        }
    }

    /// Decides the shape of a storage item. Only the first decision is kept.
    pub fn set_shape(&mut self, key: &SymbolKey, shape: ItemShape) {
        if let Some(attrs) = self.items.get_mut(key).and_then(|i| i.storage_mut()) {
            if attrs.shape == ItemShape::Undecided {
                attrs.shape = shape;
            }
        }
    }

    pub fn set_constant_value(&mut self, key: &SymbolKey, value: ConstantValue) {
        if let Some(DataItemClass::Constant { value: slot }) =
            self.items.get_mut(key).map(|i| &mut i.class)
        {
            *slot = Some(value);
        }
    }

    pub fn mark_external(&mut self, key: &SymbolKey, external_name: &str) {
        if let Some(item) = self.items.get_mut(key) {
            item.is_external = true;
            item.external_name = Some(external_name.to_string());
        }
    }

    pub fn mark_global(&mut self, key: &SymbolKey) {
        if let Some(item) = self.items.get_mut(key) {
            item.is_global = true;
        }
    }

    pub fn mark_based(&mut self, key: &SymbolKey) {
        if let Some(item) = self.items.get_mut(key) {
            item.is_based = true;
        }
    }
}

/// Serializes the table as a map from `unit#name` to item information.
impl Serialize for SymbolTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.items.iter().map(|(key, item)| (key.to_string(), item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(name: &str) -> SymbolKey {
        SymbolKey::new("PROG", name)
    }

    #[test]
    fn duplicate_keys_keep_the_original() {
        let mut table = SymbolTable::new();
        table
            .add_data_item(key("A"), DataItemInfo::storage("A", 1, 3))
            .unwrap();
        let dup = table
            .add_data_item(key("A"), DataItemInfo::storage("A", 5, 9))
            .unwrap_err();

        assert_eq!(dup, DuplicateItem { identifier: "A".into(), line: 3 });
        let item = table.get(&key("A")).unwrap();
        assert_eq!((item.level_number(), item.line()), (1, 3));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn keys_are_namespaced_by_unit() {
        let mut table = SymbolTable::new();
        assert!(table
            .add_data_item(SymbolKey::new("ONE", "A"), DataItemInfo::storage("A", 1, 1))
            .is_ok());
        assert!(table
            .add_data_item(SymbolKey::new("TWO", "A"), DataItemInfo::storage("A", 1, 1))
            .is_ok());
        assert!(table.contains(&SymbolKey::new("ONE", "A")));
        assert!(!table.contains(&SymbolKey::new("THREE", "A")));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn constants_ignore_storage_attributes() {
        let mut table = SymbolTable::new();
        table
            .add_data_item(key("C"), DataItemInfo::constant("C", 1, 1))
            .unwrap();
        table.set_type(&key("C"), PictureType::Numeric);
        table.set_picture(&key("C"), "5".into());
        table.set_default(&key("C"), "1");
        table.set_shape(&key("C"), ItemShape::Elementary);
        table.set_constant_value(&key("C"), ConstantValue::Literal("10".into()));

        let item = table.get(&key("C")).unwrap();
        assert!(item.is_constant());
        assert!(!item.is_elementary() && !item.is_group());
        assert_eq!(item.data_type(), None);
        assert_eq!(item.picture_length(), None);
        assert_eq!(item.constant_value(), Some(&ConstantValue::Literal("10".into())));
    }

    #[test]
    fn shape_is_decided_once() {
        let mut table = SymbolTable::new();
        table
            .add_data_item(key("G"), DataItemInfo::storage("G", 1, 1))
            .unwrap();
        table.set_shape(&key("G"), ItemShape::Group);
        table.set_shape(&key("G"), ItemShape::Elementary);
        let item = table.get(&key("G")).unwrap();
        assert!(item.is_group());
        assert!(!item.is_elementary());
    }

    #[test]
    fn parents_can_be_assigned() {
        let mut table = SymbolTable::new();
        table
            .add_data_item(key("CHILD"), DataItemInfo::storage("CHILD", 5, 2))
            .unwrap();
        table.set_parent(&key("CHILD"), "REC");
        assert_eq!(table.get(&key("CHILD")).unwrap().parent.as_deref(), Some("REC"));
    }

    #[test]
    fn serializes_with_composite_keys() {
        let mut table = SymbolTable::new();
        table
            .add_data_item(key("A"), DataItemInfo::storage("A", 77, 4))
            .unwrap();
        table.set_type(&key("A"), PictureType::SignedNumeric);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["PROG#A"]["level_number"], 77);
        assert_eq!(json["PROG#A"]["class"], "storage");
        assert_eq!(json["PROG#A"]["data_type"], "S9");
    }
}
