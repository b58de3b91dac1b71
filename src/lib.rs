//! # giftsearch
//!
//! Boolean search over UK ministerial gifts and hospitality declarations.
//!
//! ## Features
//!
//! - Boolean queries with `AND`, `OR`, `NOT`, quoted phrases and grouping
//! - Implicit `AND` between adjacent terms
//! - Case-insensitive substring matching, with an optional whole-word mode
//! - Minister, department, date and direction filters
//! - Facet counts by minister, department and provider
//!
//! ```
//! use giftsearch::prelude::*;
//!
//! let gifts = vec![
//!     Record::builder()
//!         .add_text("minister", "David Lammy")
//!         .add_text("gift", "Silver tray")
//!         .add_text("donor_recipient", "UAE Government")
//!         .build(),
//! ];
//! let collection = RecordCollection::new(gifts, Vec::new());
//! let engine = SearchEngine::default();
//!
//! let results = engine
//!     .search(&collection, "(UAE OR Qatar) NOT watch", SearchMode::Gifts, &FieldFilters::new())
//!     .unwrap();
//! assert_eq!(results.match_count, 1);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod record;
pub mod search;

pub mod prelude {
    pub use crate::config::SearchConfig;
    pub use crate::error::{GiftSearchError, Result};
    pub use crate::query::{Expr, MatchMode, Matcher, QueryParser, SyntaxError, evaluate, parse};
    pub use crate::record::{Record, RecordCollection};
    pub use crate::search::{FieldFilters, SearchEngine, SearchMode, SearchResults};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
