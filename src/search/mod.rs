//! Searching record collections with boolean queries.

pub mod engine;
pub mod filter;
pub mod mode;
pub mod summary;

pub use self::engine::{CombinedResults, SearchEngine, SearchResults};
pub use self::filter::{Direction, FieldFilters, parse_date};
pub use self::mode::SearchMode;
pub use self::summary::{FacetCount, SearchSummary};
