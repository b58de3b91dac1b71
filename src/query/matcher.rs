//! Evaluation of expression trees against a record's searchable text.
//!
//! Matching is case-insensitive. In the default [`MatchMode::Substring`]
//! mode a term matches anywhere inside the text, so `UAE` matches
//! `UAEstories`. [`MatchMode::WholeWord`] additionally requires that the
//! match is not flanked by letters or digits.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GiftSearchError, Result};
use crate::query::expr::Expr;

/// How leaf text is located inside the searchable blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive substring match.
    #[default]
    Substring,
    /// Case-insensitive match bounded by non-alphanumeric characters.
    WholeWord,
}

/// Evaluate an expression tree against a blob with substring matching.
///
/// This is a pure function; an empty blob makes every term and phrase
/// false while [`Expr::MatchAll`] stays true.
pub fn evaluate(expr: &Expr, blob: &str) -> bool {
    let haystack = blob.to_lowercase();
    evaluate_lowercased(expr, &haystack)
}

fn evaluate_lowercased(expr: &Expr, haystack: &str) -> bool {
    match expr {
        Expr::MatchAll => true,
        Expr::Term(text) | Expr::Phrase(text) => {
            !haystack.is_empty() && haystack.contains(&text.to_lowercase())
        }
        Expr::And(left, right) => {
            evaluate_lowercased(left, haystack) && evaluate_lowercased(right, haystack)
        }
        Expr::Or(left, right) => {
            evaluate_lowercased(left, haystack) || evaluate_lowercased(right, haystack)
        }
        Expr::Not(inner) => !evaluate_lowercased(inner, haystack),
    }
}

/// A leaf with its needle prepared for repeated matching.
#[derive(Debug, Clone)]
enum Leaf {
    /// Lower-cased needle for substring search.
    Substring(String),
    /// Case-insensitive bounded pattern.
    WholeWord(Regex),
}

impl Leaf {
    fn compile(text: &str, mode: MatchMode) -> Result<Self> {
        match mode {
            MatchMode::Substring => Ok(Leaf::Substring(text.to_lowercase())),
            MatchMode::WholeWord => {
                let pattern = format!(
                    r"(?i)(?:^|[^\p{{Alphabetic}}\p{{Nd}}]){}(?:$|[^\p{{Alphabetic}}\p{{Nd}}])",
                    regex::escape(text)
                );
                // Only the regex size limit can reject an escaped literal.
                let regex = Regex::new(&pattern).map_err(|e| {
                    GiftSearchError::invalid_argument(format!(
                        "cannot match {} characters as a whole word: {e}",
                        text.chars().count()
                    ))
                })?;
                Ok(Leaf::WholeWord(regex))
            }
        }
    }

    fn is_match(&self, haystack: &str) -> bool {
        if haystack.is_empty() {
            return false;
        }
        match self {
            Leaf::Substring(needle) => haystack.contains(needle.as_str()),
            Leaf::WholeWord(regex) => regex.is_match(haystack),
        }
    }
}

/// Mirror of [`Expr`] with compiled leaves.
#[derive(Debug, Clone)]
enum Node {
    MatchAll,
    Leaf(Leaf),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Not(Box<Node>),
}

impl Node {
    fn compile(expr: &Expr, mode: MatchMode) -> Result<Self> {
        let node = match expr {
            Expr::MatchAll => Node::MatchAll,
            Expr::Term(text) | Expr::Phrase(text) => Node::Leaf(Leaf::compile(text, mode)?),
            Expr::And(left, right) => Node::And(
                Box::new(Node::compile(left, mode)?),
                Box::new(Node::compile(right, mode)?),
            ),
            Expr::Or(left, right) => Node::Or(
                Box::new(Node::compile(left, mode)?),
                Box::new(Node::compile(right, mode)?),
            ),
            Expr::Not(inner) => Node::Not(Box::new(Node::compile(inner, mode)?)),
        };
        Ok(node)
    }

    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Node::MatchAll => true,
            Node::Leaf(leaf) => leaf.is_match(haystack),
            Node::And(left, right) => left.is_match(haystack) && right.is_match(haystack),
            Node::Or(left, right) => left.is_match(haystack) || right.is_match(haystack),
            Node::Not(inner) => !inner.is_match(haystack),
        }
    }
}

/// A query compiled once and evaluated against many blobs.
///
/// `Matcher` is immutable and `Send + Sync`, so one instance may be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct Matcher {
    root: Node,
    mode: MatchMode,
}

impl Matcher {
    /// Compile an expression tree for the given match mode.
    ///
    /// Fails when a leaf cannot be compiled in whole-word mode; the mode is
    /// never downgraded silently.
    pub fn new(expr: &Expr, mode: MatchMode) -> Result<Self> {
        Ok(Matcher {
            root: Node::compile(expr, mode)?,
            mode,
        })
    }

    /// Get the match mode this matcher was compiled with.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Whether this matcher accepts every blob.
    pub fn matches_everything(&self) -> bool {
        matches!(self.root, Node::MatchAll)
    }

    /// Check whether the blob satisfies the query.
    pub fn matches(&self, blob: &str) -> bool {
        if self.matches_everything() {
            return true;
        }
        self.root.is_match(&blob.to_lowercase())
    }
}
