//! Facet counts over a result set.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::search::mode::SearchMode;

/// Label used for records that lack the facet field.
pub const UNKNOWN: &str = "Unknown";

/// A facet value and how many matches carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Breakdown of a result set by minister, department and provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub by_minister: Vec<FacetCount>,
    pub by_department: Vec<FacetCount>,
    /// Only populated for hospitality searches.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub by_provider: Vec<FacetCount>,
}

impl SearchSummary {
    /// Count the facets of `records`.
    pub fn from_records<'a, I>(records: I, mode: SearchMode) -> Self
    where
        I: IntoIterator<Item = &'a Record> + Clone,
    {
        SearchSummary {
            by_minister: facet_counts(records.clone(), "minister"),
            by_department: facet_counts(records.clone(), "department"),
            by_provider: match mode {
                SearchMode::Hospitality => facet_counts(records, "provider"),
                SearchMode::Gifts => Vec::new(),
            },
        }
    }
}

/// Count values of `field`, most frequent first, ties broken by value.
pub fn facet_counts<'a, I>(records: I, field: &str) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: AHashMap<&'a str, usize> = AHashMap::new();
    for record in records {
        let value = match record.text(field) {
            "" => UNKNOWN,
            value => value,
        };
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut facets: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect();
    facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    facets
}
