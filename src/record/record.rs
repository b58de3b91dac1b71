//! Declaration records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single gift or hospitality declaration.
///
/// Records are flat maps from field name to text, e.g. `minister`,
/// `department`, `date`, `gift`, `donor_recipient`, `provider`,
/// `hospitality_type`. The engine never mutates a record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Create a new empty record.
    pub fn new() -> Self {
        Record {
            fields: BTreeMap::new(),
        }
    }

    /// Set a field value, replacing any previous value.
    pub fn add_field<S: Into<String>, T: Into<String>>(&mut self, name: S, value: T) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a field value.
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Get a field value, or `""` when the field is missing.
    pub fn text(&self, name: &str) -> &str {
        self.get_field(name).unwrap_or("")
    }

    /// Check if the record has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get all field names in sorted order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Get all fields.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Join the non-empty values of `names` with single spaces.
    ///
    /// Missing fields contribute nothing, so a record lacking all of them
    /// yields an empty blob.
    pub fn searchable_text<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut blob = String::new();
        for name in names {
            let value = self.text(name.as_ref());
            if value.is_empty() {
                continue;
            }
            if !blob.is_empty() {
                blob.push(' ');
            }
            blob.push_str(value);
        }
        blob
    }

    /// Create a builder for constructing records.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::new()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// A builder for constructing records in a fluent manner.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new() -> Self {
        RecordBuilder {
            record: Record::new(),
        }
    }

    /// Add a text field to the record.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.record.add_field(name, value);
        self
    }

    /// Build the final record.
    pub fn build(self) -> Record {
        self.record
    }
}
