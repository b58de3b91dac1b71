//! Search engine evaluating boolean queries over a record collection.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::SearchConfig;
use crate::error::{GiftSearchError, Result};
use crate::query::expr::Expr;
use crate::query::matcher::Matcher;
use crate::query::parser::QueryParser;
use crate::record::{Record, RecordCollection};
use crate::search::filter::FieldFilters;
use crate::search::mode::SearchMode;
use crate::search::summary::SearchSummary;

/// Matches of one query against one mode, in collection order.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<'c> {
    /// The query as the caller typed it.
    pub query: String,
    /// The parsed query tree.
    pub expr: Expr,
    pub mode: SearchMode,
    pub match_count: usize,
    /// Matching records, borrowed from the searched collection.
    pub matches: Vec<&'c Record>,
}

impl<'c> SearchResults<'c> {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'c Record> + '_ {
        self.matches.iter().copied()
    }

    /// Facet counts for the matches.
    pub fn summary(&self) -> SearchSummary {
        SearchSummary::from_records(self.matches.iter().copied(), self.mode)
    }
}

/// Results of one query run against both gifts and hospitality.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedResults<'c> {
    pub gifts: SearchResults<'c>,
    pub hospitality: SearchResults<'c>,
}

impl CombinedResults<'_> {
    pub fn total_matches(&self) -> usize {
        self.gifts.match_count + self.hospitality.match_count
    }
}

/// Boolean search over gift and hospitality records.
///
/// The engine is immutable after construction; one instance can serve
/// concurrent searches over the same collection.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: SearchConfig,
    parser: QueryParser,
    /// Worker pool for batch searches, built on first use and shared by
    /// clones of this engine.
    pool: Arc<OnceLock<ThreadPool>>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        let config = SearchConfig::default();
        SearchEngine {
            parser: config.parser(),
            config,
            pool: Arc::new(OnceLock::new()),
        }
    }
}

impl SearchEngine {
    /// Create an engine after validating the configuration.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(SearchEngine {
            parser: config.parser(),
            config,
            pool: Arc::new(OnceLock::new()),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Parse a query with this engine's settings.
    pub fn parse(&self, query: &str) -> Result<Expr> {
        Ok(self.parser.parse(query)?)
    }

    /// Search one mode of a collection.
    pub fn search<'c>(
        &self,
        collection: &'c RecordCollection,
        query: &str,
        mode: SearchMode,
        filters: &FieldFilters,
    ) -> Result<SearchResults<'c>> {
        self.search_records(collection.records(mode), query, mode, filters)
    }

    /// Search an arbitrary slice of records as if they belonged to `mode`.
    ///
    /// The query is parsed before any record is examined, so a malformed
    /// query fails without partial results.
    pub fn search_records<'c>(
        &self,
        records: &'c [Record],
        query: &str,
        mode: SearchMode,
        filters: &FieldFilters,
    ) -> Result<SearchResults<'c>> {
        let expr = self.parse(query)?;
        filters.validate()?;
        self.run(records, query, expr, mode, filters)
    }

    /// Run the same query over gifts and hospitality.
    pub fn search_both<'c>(
        &self,
        collection: &'c RecordCollection,
        query: &str,
        filters: &FieldFilters,
    ) -> Result<CombinedResults<'c>> {
        let expr = self.parse(query)?;
        filters.validate()?;

        Ok(CombinedResults {
            gifts: self.run(
                collection.gifts(),
                query,
                expr.clone(),
                SearchMode::Gifts,
                filters,
            )?,
            hospitality: self.run(
                collection.hospitality(),
                query,
                expr,
                SearchMode::Hospitality,
                filters,
            )?,
        })
    }

    /// Run many queries against one mode in parallel.
    ///
    /// Results come back in query order; each query fails or succeeds on
    /// its own.
    pub fn search_batch<'c, Q>(
        &self,
        collection: &'c RecordCollection,
        queries: &[Q],
        mode: SearchMode,
        filters: &FieldFilters,
    ) -> Result<Vec<Result<SearchResults<'c>>>>
    where
        Q: AsRef<str> + Sync,
    {
        let pool = self.thread_pool()?;

        Ok(pool.install(|| {
            queries
                .par_iter()
                .map(|query| self.search(collection, query.as_ref(), mode, filters))
                .collect()
        }))
    }

    fn thread_pool(&self) -> Result<&ThreadPool> {
        if let Some(pool) = self.pool.get() {
            return Ok(pool);
        }

        let threads = self.config.threads.unwrap_or_else(num_cpus::get);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("giftsearch-{i}"))
            .build()
            .map_err(|e| GiftSearchError::internal(format!("Failed to create thread pool: {e}")))?;
        debug!("Built batch search pool with {threads} threads");

        // A concurrent first call may have won the race; its pool is kept.
        Ok(self.pool.get_or_init(|| pool))
    }

    fn run<'c>(
        &self,
        records: &'c [Record],
        query: &str,
        expr: Expr,
        mode: SearchMode,
        filters: &FieldFilters,
    ) -> Result<SearchResults<'c>> {
        let start_time = Instant::now();
        let matcher = Matcher::new(&expr, self.config.match_mode)?;
        let fields = self.config.fields(mode);

        let matches: Vec<&Record> = records
            .iter()
            .filter(|record| filters.matches(record, mode))
            .filter(|record| {
                matcher.matches_everything() || matcher.matches(&record.searchable_text(fields))
            })
            .collect();

        debug!(
            "Query {query:?} matched {} of {} {mode} records in {:?}",
            matches.len(),
            records.len(),
            start_time.elapsed()
        );

        Ok(SearchResults {
            query: query.to_string(),
            expr,
            mode,
            match_count: matches.len(),
            matches,
        })
    }
}
