//! Command line argument parsing for the giftsearch CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// giftsearch - Boolean search over ministerial gifts and hospitality
#[derive(Parser, Debug, Clone)]
#[command(name = "giftsearch")]
#[command(about = "Boolean search over UK ministerial gifts and hospitality declarations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct GiftSearchArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl GiftSearchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search an index with a boolean query
    Search(SearchArgs),

    /// Parse a query and print its expression tree
    Parse(ParseArgs),

    /// Show index statistics
    Stats(StatsArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Path to the JSON index file
    #[arg(value_name = "INDEX_PATH", env = "GIFTSEARCH_INDEX")]
    pub index_path: PathBuf,

    /// Boolean query (AND, OR, NOT, "phrases", parentheses)
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Register to search
    #[arg(short = 'm', long, default_value = "all")]
    pub mode: ModeArg,

    /// Only records whose minister contains this text
    #[arg(long)]
    pub minister: Option<String>,

    /// Only records whose department contains this text
    #[arg(long)]
    pub department: Option<String>,

    /// Earliest declaration date (YYYY-MM-DD)
    #[arg(long = "from", value_name = "DATE")]
    pub date_from: Option<String>,

    /// Latest declaration date (YYYY-MM-DD)
    #[arg(long = "to", value_name = "DATE")]
    pub date_to: Option<String>,

    /// Only gifts received
    #[arg(long)]
    pub received: bool,

    /// Only gifts given
    #[arg(long, conflicts_with = "received")]
    pub given: bool,

    /// Match terms as whole words instead of substrings
    #[arg(long)]
    pub whole_word: bool,

    /// Maximum number of records to print per register
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Include facet counts in the output
    #[arg(long)]
    pub summary: bool,

    /// Search configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Registers selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeArg {
    /// Gift declarations
    Gifts,
    /// Hospitality declarations
    Hospitality,
    /// Both registers
    All,
}

/// Arguments for parsing a query
#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum nesting depth
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for index statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Path to the JSON index file
    #[arg(value_name = "INDEX_PATH", env = "GIFTSEARCH_INDEX")]
    pub index_path: PathBuf,

    /// List every minister and department
    #[arg(short, long)]
    pub detailed: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_search_command() {
        let args = GiftSearchArgs::try_parse_from([
            "giftsearch",
            "search",
            "/path/to/index.json",
            "UAE OR Qatar",
            "--minister",
            "Lammy",
            "--limit",
            "5",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.index_path, PathBuf::from("/path/to/index.json"));
            assert_eq!(search_args.query, "UAE OR Qatar");
            assert_eq!(search_args.minister.as_deref(), Some("Lammy"));
            assert_eq!(search_args.limit, 5);
            assert_eq!(search_args.mode, ModeArg::All);
            assert!(!search_args.whole_word);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_search_filters() {
        let args = GiftSearchArgs::try_parse_from([
            "giftsearch",
            "search",
            "index.json",
            "watch",
            "--mode",
            "gifts",
            "--from",
            "2024-07-05",
            "--to",
            "2024-12-31",
            "--received",
            "--whole-word",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.mode, ModeArg::Gifts);
            assert_eq!(search_args.date_from.as_deref(), Some("2024-07-05"));
            assert_eq!(search_args.date_to.as_deref(), Some("2024-12-31"));
            assert!(search_args.received);
            assert!(search_args.whole_word);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_received_conflicts_with_given() {
        let result = GiftSearchArgs::try_parse_from([
            "giftsearch",
            "search",
            "index.json",
            "watch",
            "--received",
            "--given",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_command() {
        let args =
            GiftSearchArgs::try_parse_from(["giftsearch", "parse", "a OR b AND c"]).unwrap();
        if let Command::Parse(parse_args) = args.command {
            assert_eq!(parse_args.query, "a OR b AND c");
            assert!(parse_args.max_depth.is_none());
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = GiftSearchArgs::try_parse_from(["giftsearch", "parse", "x"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = GiftSearchArgs::try_parse_from(["giftsearch", "-vv", "parse", "x"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = GiftSearchArgs::try_parse_from(["giftsearch", "--quiet", "parse", "x"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            GiftSearchArgs::try_parse_from(["giftsearch", "--format", "json", "parse", "x"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
