//! Search modes and the record fields each one searches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GiftSearchError;

/// Which declaration register a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Gifts given or received by ministers.
    Gifts,
    /// Hospitality received by ministers.
    Hospitality,
}

const GIFTS_FIELDS: &[&str] = &["gift", "donor_recipient", "department"];
const HOSPITALITY_FIELDS: &[&str] = &["provider", "hospitality_type", "department"];

impl SearchMode {
    /// Both modes, gifts first.
    pub const ALL: [SearchMode; 2] = [SearchMode::Gifts, SearchMode::Hospitality];

    /// Fields concatenated into the searchable blob unless configured
    /// otherwise.
    pub fn default_fields(self) -> &'static [&'static str] {
        match self {
            SearchMode::Gifts => GIFTS_FIELDS,
            SearchMode::Hospitality => HOSPITALITY_FIELDS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SearchMode::Gifts => "gifts",
            SearchMode::Hospitality => "hospitality",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMode {
    type Err = GiftSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gifts" | "gift" => Ok(SearchMode::Gifts),
            "hospitality" => Ok(SearchMode::Hospitality),
            other => Err(GiftSearchError::invalid_argument(format!(
                "unknown search mode '{other}'"
            ))),
        }
    }
}
