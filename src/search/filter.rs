//! Non-boolean record filters applied alongside the parsed query.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GiftSearchError, Result};
use crate::record::Record;
use crate::search::mode::SearchMode;

/// Date layouts seen in the published registers.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d %B %Y", "%d %b %Y"];

/// Parse a declaration date in any of the known layouts.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // Tolerate a trailing time component on ISO timestamps.
    let value = match value.split_once('T') {
        Some((date, _)) if date.len() == 10 => date,
        _ => value,
    };
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Whether a gift was received by or given by the minister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Received,
    Given,
}

impl Direction {
    fn keyword(self) -> &'static str {
        match self {
            Direction::Received => "received",
            Direction::Given => "given",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Direction {
    type Err = GiftSearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "received" => Ok(Direction::Received),
            "given" => Ok(Direction::Given),
            other => Err(GiftSearchError::invalid_argument(format!(
                "unknown direction '{other}', expected 'received' or 'given'"
            ))),
        }
    }
}

/// Field filters combined with the boolean query by AND.
///
/// All text comparisons are case-insensitive partial matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldFilters {
    /// Partial match on the `minister` field.
    pub minister: Option<String>,
    /// Partial match on the `department` field.
    pub department: Option<String>,
    /// Inclusive lower bound on the `date` field.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the `date` field.
    pub date_to: Option<NaiveDate>,
    /// Gift direction; ignored for hospitality.
    pub direction: Option<Direction>,
}

impl FieldFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minister<S: Into<String>>(mut self, minister: S) -> Self {
        self.minister = Some(minister.into());
        self
    }

    pub fn with_department<S: Into<String>>(mut self, department: S) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn with_date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject filters that can never match.
    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to)
            && from > to
        {
            return Err(GiftSearchError::invalid_argument(format!(
                "date range is empty: {from} is after {to}"
            )));
        }
        Ok(())
    }

    /// Check a record against every configured filter.
    pub fn matches(&self, record: &Record, mode: SearchMode) -> bool {
        if let Some(minister) = &self.minister
            && !contains_ignore_case(record.text("minister"), minister)
        {
            return false;
        }

        if let Some(department) = &self.department
            && !contains_ignore_case(record.text("department"), department)
        {
            return false;
        }

        if (self.date_from.is_some() || self.date_to.is_some())
            && let Some(date) = parse_date(record.text("date"))
        {
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }

        if mode == SearchMode::Gifts
            && let Some(direction) = self.direction
            && !contains_ignore_case(record.text("given_or_received"), direction.keyword())
        {
            return false;
        }

        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
