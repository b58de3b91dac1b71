//! Caller-owned record collection and the JSON index loader.
//!
//! The index document is produced by an external pipeline and looks like:
//!
//! ```json
//! {
//!   "metadata": {"created": "2025-01-10T09:00:00", "coverage": "2024-present"},
//!   "gifts": [{"minister": "...", "gift": "...", "donor_recipient": "..."}],
//!   "hospitality": [{"minister": "...", "provider": "...", "hospitality_type": "..."}]
//! }
//! ```
//!
//! Any other top-level keys (such as precomputed word indexes) are ignored.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GiftSearchError, Result};
use crate::record::record::Record;
use crate::search::mode::SearchMode;

/// Descriptive metadata carried by an index document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// When the index was built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Human-readable date coverage, e.g. `2024-present`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<String>,
}

/// Counts describing a loaded collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub gift_count: usize,
    pub hospitality_count: usize,
    pub minister_count: usize,
    pub department_count: usize,
}

/// An immutable set of gift and hospitality records.
///
/// The collection is owned by the caller and lent to the search engine for
/// each query, so several searches may read it concurrently.
#[derive(Debug, Clone, Default)]
pub struct RecordCollection {
    gifts: Vec<Record>,
    hospitality: Vec<Record>,
    metadata: IndexMetadata,
}

impl RecordCollection {
    /// Create a collection from already-normalised records.
    pub fn new(gifts: Vec<Record>, hospitality: Vec<Record>) -> Self {
        RecordCollection {
            gifts,
            hospitality,
            metadata: IndexMetadata::default(),
        }
    }

    /// Attach index metadata.
    pub fn with_metadata(mut self, metadata: IndexMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Load a collection from an index file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let collection = Self::from_reader(BufReader::new(file))?;

        info!(
            "Loaded index {} ({} gifts, {} hospitality)",
            path.display(),
            collection.gifts.len(),
            collection.hospitality.len()
        );
        Ok(collection)
    }

    /// Load a collection from a JSON index document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: Value = serde_json::from_reader(reader)?;
        let root = document
            .as_object()
            .ok_or_else(|| GiftSearchError::index("index document must be a JSON object"))?;

        if !root.contains_key("gifts") && !root.contains_key("hospitality") {
            return Err(GiftSearchError::index(
                "index document has neither 'gifts' nor 'hospitality'",
            ));
        }

        let metadata = match root.get("metadata") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => IndexMetadata::default(),
        };

        let gifts = records_from_section(root, "gifts")?;
        let hospitality = records_from_section(root, "hospitality")?;
        Ok(RecordCollection::new(gifts, hospitality).with_metadata(metadata))
    }

    /// Records searched by the given mode, in index order.
    pub fn records(&self, mode: SearchMode) -> &[Record] {
        match mode {
            SearchMode::Gifts => &self.gifts,
            SearchMode::Hospitality => &self.hospitality,
        }
    }

    pub fn gifts(&self) -> &[Record] {
        &self.gifts
    }

    pub fn hospitality(&self) -> &[Record] {
        &self.hospitality
    }

    pub fn metadata(&self) -> &IndexMetadata {
        &self.metadata
    }

    /// Total number of records across both modes.
    pub fn len(&self) -> usize {
        self.gifts.len() + self.hospitality.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gifts.is_empty() && self.hospitality.is_empty()
    }

    /// Distinct, non-empty minister names in sorted order.
    pub fn ministers(&self) -> Vec<String> {
        self.distinct_values("minister")
    }

    /// Distinct, non-empty department names in sorted order.
    pub fn departments(&self) -> Vec<String> {
        self.distinct_values("department")
    }

    /// Summary counts for the collection.
    pub fn stats(&self) -> CollectionStats {
        CollectionStats {
            gift_count: self.gifts.len(),
            hospitality_count: self.hospitality.len(),
            minister_count: self.ministers().len(),
            department_count: self.departments().len(),
        }
    }

    fn distinct_values(&self, field: &str) -> Vec<String> {
        self.gifts
            .iter()
            .chain(self.hospitality.iter())
            .filter_map(|record| record.get_field(field))
            .filter(|value| !value.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

fn records_from_section(root: &Map<String, Value>, section: &str) -> Result<Vec<Record>> {
    let Some(value) = root.get(section) else {
        return Ok(Vec::new());
    };

    let entries = value
        .as_array()
        .ok_or_else(|| GiftSearchError::index(format!("'{section}' must be an array")))?;

    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let object = entry.as_object().ok_or_else(|| {
                GiftSearchError::index(format!("{section}[{position}] is not an object"))
            })?;
            Ok(record_from_object(object, section, position))
        })
        .collect()
}

/// Convert a JSON object into a record, keeping scalar values as text.
fn record_from_object(object: &Map<String, Value>, section: &str, position: usize) -> Record {
    let mut record = Record::new();
    for (name, value) in object {
        match value {
            Value::String(text) => record.add_field(name.as_str(), text.as_str()),
            Value::Number(number) => record.add_field(name.as_str(), number.to_string()),
            Value::Bool(flag) => record.add_field(name.as_str(), flag.to_string()),
            Value::Null => {}
            Value::Array(_) | Value::Object(_) => {
                warn!("Skipping nested field '{name}' in {section}[{position}]");
            }
        }
    }
    record
}
