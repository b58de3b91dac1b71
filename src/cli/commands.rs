//! Command implementations for the giftsearch CLI.

use std::time::Instant;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SearchConfig;
use crate::error::{GiftSearchError, Result};
use crate::query::{MatchMode, QueryParser};
use crate::record::RecordCollection;
use crate::search::{Direction, FieldFilters, SearchEngine, SearchMode, parse_date};

/// Execute a CLI command.
pub fn execute_command(args: GiftSearchArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search_index(search_args, &args),
        Command::Parse(parse_args) => parse_query(parse_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
    }
}

/// Search the index.
fn search_index(args: &SearchArgs, cli_args: &GiftSearchArgs) -> Result<()> {
    let engine = SearchEngine::new(load_config(args)?)?;
    let filters = build_filters(args)?;

    // Reject a malformed query before touching the index.
    let parsed = engine.parse(&args.query)?;

    let collection = RecordCollection::from_path(&args.index_path)?;
    let start_time = Instant::now();

    let mut registers = Vec::new();
    for mode in modes(args.mode) {
        let results = engine.search(&collection, &args.query, mode, &filters)?;
        info!("{} {mode} records matched", results.match_count);

        registers.push(RegisterReport {
            mode,
            match_count: results.match_count,
            summary: args.summary.then(|| results.summary()),
            matches: results.iter().take(args.limit).collect(),
        });
    }

    let report = SearchReport {
        query: args.query.clone(),
        parsed: parsed.to_string(),
        registers,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    output_result(&report, cli_args)
}

/// Parse a query and show its tree.
fn parse_query(args: &ParseArgs, cli_args: &GiftSearchArgs) -> Result<()> {
    let mut parser = QueryParser::new();
    if let Some(max_depth) = args.max_depth {
        parser = parser.with_max_depth(max_depth);
    }

    let tree = parser.parse(&args.query)?;
    let report = ParseReport {
        query: args.query.clone(),
        canonical: tree.to_string(),
        depth: tree.depth(),
        tree,
    };
    output_result(&report, cli_args)
}

/// Show index statistics.
fn show_stats(args: &StatsArgs, cli_args: &GiftSearchArgs) -> Result<()> {
    let collection = RecordCollection::from_path(&args.index_path)?;

    let report = StatsReport {
        stats: collection.stats(),
        metadata: collection.metadata().clone(),
        ministers: args.detailed.then(|| collection.ministers()),
        departments: args.detailed.then(|| collection.departments()),
    };
    output_result(&report, cli_args)
}

fn load_config(args: &SearchArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            SearchConfig::from_path(path)?
        }
        None => SearchConfig::default(),
    };
    if args.whole_word {
        config = config.with_match_mode(MatchMode::WholeWord);
    }
    Ok(config)
}

/// Build record filters from the search flags.
pub fn build_filters(args: &SearchArgs) -> Result<FieldFilters> {
    let mut filters = FieldFilters::new();

    if let Some(minister) = &args.minister {
        filters = filters.with_minister(minister.as_str());
    }
    if let Some(department) = &args.department {
        filters = filters.with_department(department.as_str());
    }
    if let Some(date) = &args.date_from {
        filters = filters.with_date_from(parse_date_arg("--from", date)?);
    }
    if let Some(date) = &args.date_to {
        filters = filters.with_date_to(parse_date_arg("--to", date)?);
    }
    if args.received {
        filters = filters.with_direction(Direction::Received);
    } else if args.given {
        filters = filters.with_direction(Direction::Given);
    }

    filters.validate()?;
    Ok(filters)
}

fn parse_date_arg(flag: &str, value: &str) -> Result<chrono::NaiveDate> {
    parse_date(value).ok_or_else(|| {
        GiftSearchError::invalid_argument(format!("{flag}: cannot parse date '{value}'"))
    })
}

fn modes(selection: ModeArg) -> Vec<SearchMode> {
    match selection {
        ModeArg::Gifts => vec![SearchMode::Gifts],
        ModeArg::Hospitality => vec![SearchMode::Hospitality],
        ModeArg::All => SearchMode::ALL.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn search_args(extra: &[&str]) -> SearchArgs {
        let mut argv = vec!["giftsearch", "search", "index.json", "watch"];
        argv.extend_from_slice(extra);
        match GiftSearchArgs::try_parse_from(argv).unwrap().command {
            Command::Search(args) => args,
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_build_filters() {
        let filters = build_filters(&search_args(&[
            "--minister",
            "Lammy",
            "--from",
            "05/07/2024",
            "--given",
        ]))
        .unwrap();

        assert_eq!(filters.minister.as_deref(), Some("Lammy"));
        assert_eq!(filters.date_from, chrono::NaiveDate::from_ymd_opt(2024, 7, 5));
        assert_eq!(filters.direction, Some(Direction::Given));
    }

    #[test]
    fn test_build_filters_rejects_bad_dates() {
        assert!(build_filters(&search_args(&["--from", "last week"])).is_err());
        assert!(build_filters(&search_args(&["--from", "2025-01-01", "--to", "2024-01-01"])).is_err());
    }

    #[test]
    fn test_modes() {
        assert_eq!(modes(ModeArg::All), vec![SearchMode::Gifts, SearchMode::Hospitality]);
        assert_eq!(modes(ModeArg::Hospitality), vec![SearchMode::Hospitality]);
    }

    #[test]
    fn test_whole_word_flag_overrides_config() {
        let config = load_config(&search_args(&["--whole-word"])).unwrap();
        assert_eq!(config.match_mode, MatchMode::WholeWord);
        assert_eq!(
            load_config(&search_args(&[])).unwrap().match_mode,
            MatchMode::Substring
        );
    }
}
