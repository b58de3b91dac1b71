//! Configuration for the search engine.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GiftSearchError, Result};
use crate::query::matcher::MatchMode;
use crate::query::parser::{DEFAULT_MAX_DEPTH, QueryParser};
use crate::search::mode::SearchMode;

/// Configuration for [`SearchEngine`](crate::search::SearchEngine).
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// {"match_mode": "whole_word", "hospitality_fields": ["provider"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How terms and phrases are located in the searchable text.
    pub match_mode: MatchMode,

    /// Maximum nesting of parentheses and negations in a query.
    pub max_depth: usize,

    /// Fields joined into the searchable text of a gift.
    pub gifts_fields: Vec<String>,

    /// Fields joined into the searchable text of a hospitality record.
    pub hospitality_fields: Vec<String>,

    /// Thread pool size for batch searches.
    /// If None, uses the number of CPU cores.
    pub threads: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Substring,
            max_depth: DEFAULT_MAX_DEPTH,
            gifts_fields: owned_fields(SearchMode::Gifts),
            hospitality_fields: owned_fields(SearchMode::Hospitality),
            threads: None,
        }
    }
}

fn owned_fields(mode: SearchMode) -> Vec<String> {
    mode.default_fields().iter().map(|s| s.to_string()).collect()
}

impl SearchConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: SearchConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the match mode.
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /// Set the maximum query nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the searchable fields of a mode.
    pub fn with_fields<S: Into<String>>(
        mut self,
        mode: SearchMode,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        let fields = fields.into_iter().map(Into::into).collect();
        match mode {
            SearchMode::Gifts => self.gifts_fields = fields,
            SearchMode::Hospitality => self.hospitality_fields = fields,
        }
        self
    }

    /// Set the batch search thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Searchable fields for a mode.
    pub fn fields(&self, mode: SearchMode) -> &[String] {
        match mode {
            SearchMode::Gifts => &self.gifts_fields,
            SearchMode::Hospitality => &self.hospitality_fields,
        }
    }

    /// Build the query parser described by this configuration.
    pub fn parser(&self) -> QueryParser {
        QueryParser::new().with_max_depth(self.max_depth)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(GiftSearchError::config("max_depth must be greater than zero"));
        }
        for mode in SearchMode::ALL {
            if self.fields(mode).is_empty() {
                return Err(GiftSearchError::config(format!(
                    "no searchable fields configured for {mode}"
                )));
            }
        }
        if self.threads == Some(0) {
            return Err(GiftSearchError::config("threads must be greater than zero"));
        }
        Ok(())
    }
}
