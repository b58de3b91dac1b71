//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{GiftSearchArgs, OutputFormat};
use crate::error::Result;
use crate::query::Expr;
use crate::record::{CollectionStats, IndexMetadata, Record};
use crate::search::{FacetCount, SearchMode, SearchSummary};

/// Fields shown per record in human output, by mode.
const GIFT_COLUMNS: &[&str] = &["date", "minister", "gift", "donor_recipient"];
const HOSPITALITY_COLUMNS: &[&str] = &["date", "minister", "hospitality_type", "provider"];

/// Output of the `search` command.
#[derive(Debug, Serialize)]
pub struct SearchReport<'c> {
    pub query: String,
    pub parsed: String,
    pub registers: Vec<RegisterReport<'c>>,
    pub duration_ms: u64,
}

/// Matches from one register.
#[derive(Debug, Serialize)]
pub struct RegisterReport<'c> {
    pub mode: SearchMode,
    pub match_count: usize,
    /// Matches after applying the display limit.
    pub matches: Vec<&'c Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SearchSummary>,
}

/// Output of the `parse` command.
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub query: String,
    pub canonical: String,
    pub depth: usize,
    pub tree: Expr,
}

/// Output of the `stats` command.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    #[serde(flatten)]
    pub stats: CollectionStats,
    pub metadata: IndexMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ministers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departments: Option<Vec<String>>,
}

/// Plain-text rendering for terminal output.
pub trait HumanReadable {
    fn to_human(&self) -> String;
}

/// Print a result in the format selected on the command line.
pub fn output_result<T: Serialize + HumanReadable>(result: &T, args: &GiftSearchArgs) -> Result<()> {
    println!("{}", render(result, args.output_format, args.pretty)?);
    Ok(())
}

/// Render a result as text.
pub fn render<T: Serialize + HumanReadable>(
    result: &T,
    format: OutputFormat,
    pretty: bool,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Human => result.to_human(),
        OutputFormat::Json if pretty => serde_json::to_string_pretty(result)?,
        OutputFormat::Json => serde_json::to_string(result)?,
    })
}

impl HumanReadable for SearchReport<'_> {
    fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Query: {}", self.query);
        let _ = writeln!(out, "Parsed: {}", self.parsed);

        for register in &self.registers {
            let title = register.mode.name().to_uppercase();
            let _ = writeln!(out);
            let _ = writeln!(out, "=== {title} ({} matches) ===", register.match_count);

            let columns = match register.mode {
                SearchMode::Gifts => GIFT_COLUMNS,
                SearchMode::Hospitality => HOSPITALITY_COLUMNS,
            };
            for record in &register.matches {
                let line: Vec<&str> = columns
                    .iter()
                    .map(|column| match record.text(column) {
                        "" => "N/A",
                        value => value,
                    })
                    .collect();
                let _ = writeln!(out, "  {}", line.join(" | "));
            }

            if register.matches.len() < register.match_count {
                let _ = writeln!(
                    out,
                    "  ... {} more",
                    register.match_count - register.matches.len()
                );
            }

            if let Some(summary) = &register.summary {
                write_facets(&mut out, "By minister", &summary.by_minister);
                write_facets(&mut out, "By department", &summary.by_department);
                write_facets(&mut out, "By provider", &summary.by_provider);
            }
        }

        let _ = writeln!(out);
        let _ = write!(out, "Search time: {}ms", self.duration_ms);
        out
    }
}

fn write_facets(out: &mut String, title: &str, facets: &[FacetCount]) {
    if facets.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {title}:");
    for facet in facets {
        let _ = writeln!(out, "    {} ({})", facet.value, facet.count);
    }
}

impl HumanReadable for ParseReport {
    fn to_human(&self) -> String {
        format!(
            "Query: {}\nParsed: {}\nDepth: {}",
            self.query, self.canonical, self.depth
        )
    }
}

impl HumanReadable for StatsReport {
    fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Index Statistics:");
        let _ = writeln!(out, "════════════════");
        let _ = writeln!(out, "Gifts: {}", self.stats.gift_count);
        let _ = writeln!(out, "Hospitality: {}", self.stats.hospitality_count);
        let _ = writeln!(out, "Ministers: {}", self.stats.minister_count);
        let _ = write!(out, "Departments: {}", self.stats.department_count);

        if let Some(coverage) = &self.metadata.coverage {
            let _ = write!(out, "\nCoverage: {coverage}");
        }
        if let Some(created) = &self.metadata.created {
            let _ = write!(out, "\nIndex created: {created}");
        }

        for (title, names) in [
            ("Ministers", &self.ministers),
            ("Departments", &self.departments),
        ] {
            if let Some(names) = names {
                let _ = write!(out, "\n\n{title}:");
                for name in names {
                    let _ = write!(out, "\n  {name}");
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(record: &Record) -> SearchReport<'_> {
        SearchReport {
            query: "watch".to_string(),
            parsed: "watch".to_string(),
            registers: vec![RegisterReport {
                mode: SearchMode::Gifts,
                match_count: 3,
                matches: vec![record],
                summary: None,
            }],
            duration_ms: 1,
        }
    }

    #[test]
    fn test_search_report_human() {
        let record = Record::builder()
            .add_text("date", "2024-10-02")
            .add_text("minister", "David Lammy")
            .add_text("gift", "Watch")
            .build();
        let text = report(&record).to_human();

        assert!(text.contains("=== GIFTS (3 matches) ==="));
        assert!(text.contains("2024-10-02 | David Lammy | Watch | N/A"));
        assert!(text.contains("... 2 more"));
    }

    #[test]
    fn test_search_report_json() {
        let record = Record::builder().add_text("gift", "Watch").build();
        let json = render(&report(&record), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["registers"][0]["mode"], "gifts");
        assert_eq!(value["registers"][0]["matches"][0]["gift"], "Watch");
        assert!(value["registers"][0].get("summary").is_none());
    }

    #[test]
    fn test_parse_report() {
        let report = ParseReport {
            query: "a b".to_string(),
            canonical: "(a AND b)".to_string(),
            depth: 2,
            tree: Expr::and(Expr::term("a"), Expr::term("b")),
        };
        assert_eq!(report.to_human(), "Query: a b\nParsed: (a AND b)\nDepth: 2");

        let json = render(&report, OutputFormat::Json, true).unwrap();
        assert!(json.contains("\"canonical\": \"(a AND b)\""));
    }

    #[test]
    fn test_stats_report_flattens_counts() {
        let report = StatsReport {
            stats: CollectionStats {
                gift_count: 2,
                hospitality_count: 1,
                minister_count: 3,
                department_count: 2,
            },
            metadata: IndexMetadata::default(),
            ministers: Some(vec!["David Lammy".to_string()]),
            departments: None,
        };

        let value: serde_json::Value =
            serde_json::from_str(&render(&report, OutputFormat::Json, false).unwrap()).unwrap();
        assert_eq!(value["gift_count"], 2);
        assert_eq!(value["ministers"][0], "David Lammy");
        assert!(value.get("departments").is_none());

        let text = report.to_human();
        assert!(text.contains("Gifts: 2"));
        assert!(text.contains("Ministers:\n  David Lammy"));
    }
}
