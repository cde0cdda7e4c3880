//! Property-list access for exported data table rows.
//!
//! Table rows arrive as JSON property lists: an array of `{Name, Value}`
//! objects where `Value` may be a scalar, another property list, an array
//! of struct entries, or an asset/text reference. All traversal lives here
//! so the per-category extractors never touch raw JSON shapes.

use serde_json::Value;

/// One row of a source data table, prior to resolution.
///
/// `properties` is the row's `Value` array exactly as exported. Rows are
/// immutable once loaded.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub name: String,
    pub properties: Value,
}

impl RawRecord {
    pub fn new(name: impl Into<String>, properties: Value) -> Self {
        RawRecord {
            name: name.into(),
            properties,
        }
    }

    /// Full `{Name, Value, ...}` entry for a named property.
    pub fn property_entry(&self, name: &str) -> Option<&Value> {
        entry_in(&self.properties, name)
    }

    /// The `Value` of a named property.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.property_entry(name).and_then(|e| e.get("Value"))
    }

    pub fn str_property(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_str)
    }

    pub fn f64_property(&self, name: &str) -> Option<f64> {
        self.property(name).and_then(Value::as_f64)
    }

    pub fn u32_property(&self, name: &str) -> Option<u32> {
        self.property(name)
            .and_then(Value::as_u64)
            .map(|v| v as u32)
    }

    pub fn bool_property(&self, name: &str) -> Option<bool> {
        self.property(name).and_then(Value::as_bool)
    }

    /// Enum property with the `EEnumName::Variant` wire form reduced to the
    /// bare variant name.
    pub fn enum_property(&self, name: &str) -> Option<&str> {
        self.str_property(name).map(strip_enum_prefix)
    }

    /// Asset path (`Value.AssetPath.AssetName`) of an object reference
    /// property such as `Actor` or `Icon`.
    pub fn asset_path(&self, name: &str) -> Option<&str> {
        asset_name(self.property(name)?)
    }

    /// Gameplay tags from the `Tags` property. The tag container nests one
    /// more `Tags` array of plain strings inside each struct entry.
    pub fn tag_list(&self) -> Vec<String> {
        let mut tags = Vec::new();
        if let Some(containers) = self.property("Tags").and_then(Value::as_array) {
            for container in containers {
                if let Some(values) = container.get("Value").and_then(Value::as_array) {
                    tags.extend(values.iter().filter_map(Value::as_str).map(String::from));
                }
            }
        }
        tags
    }
}

/// Find a `{Name, Value}` entry by name inside a property-list array.
pub fn entry_in<'a>(properties: &'a Value, name: &str) -> Option<&'a Value> {
    properties
        .as_array()?
        .iter()
        .find(|entry| entry.get("Name").and_then(Value::as_str) == Some(name))
}

/// The `Value` of a named entry inside a property-list array.
pub fn value_in<'a>(properties: &'a Value, name: &str) -> Option<&'a Value> {
    entry_in(properties, name)?.get("Value")
}

/// `RowName` from a table-handle struct (`{Name: "RowName", Value: key}`
/// nested in the handle's property list).
pub fn row_name(handle: &Value) -> Option<&str> {
    value_in(handle, "RowName").and_then(Value::as_str)
}

/// All `RowName`s from an array of handle structs, e.g.
/// `UnlockRequiredItems` or an entitlement row's `Constructions` list.
pub fn row_names(handles: &Value) -> Vec<String> {
    handles
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("Value").and_then(row_name))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// `AssetPath.AssetName` from an object-reference value.
pub fn asset_name(value: &Value) -> Option<&str> {
    value.get("AssetPath")?.get("AssetName")?.as_str()
}

/// Reduce `EMorRecipeUnlockType::Manual` to `Manual`. Values without the
/// `::` separator pass through unchanged.
pub fn strip_enum_prefix(wire: &str) -> &str {
    wire.rsplit("::").next().unwrap_or(wire)
}

/// How a text property carries its string: a string-table key to resolve,
/// or an inline culture-invariant literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRef<'a> {
    TableKey(&'a str),
    Literal(&'a str),
}

/// Classify a text property entry.
///
/// `HistoryType: "Base"` entries carry their text inline in
/// `CultureInvariantString`; string-table references keep the key in
/// `Value`. Plain string values are treated as table keys.
pub fn text_ref(entry: &Value) -> Option<TextRef<'_>> {
    if entry.get("HistoryType").and_then(Value::as_str) == Some("Base") {
        if let Some(literal) = entry.get("CultureInvariantString").and_then(Value::as_str) {
            return Some(TextRef::Literal(literal));
        }
    }
    match entry.get("Value") {
        Some(Value::String(key)) => Some(TextRef::TableKey(key.as_str())),
        _ => None,
    }
}
