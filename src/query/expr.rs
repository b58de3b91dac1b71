//! Boolean expression tree produced by the query parser.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node of a parsed boolean query.
///
/// Leaves keep the text exactly as typed; case folding happens at
/// evaluation time. Children are owned through `Box`, so a tree has no
/// sharing and no cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Neutral leaf produced by an empty query; matches every record.
    MatchAll,
    /// A bare word.
    Term(String),
    /// A quoted literal.
    Phrase(String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn term<S: Into<String>>(text: S) -> Self {
        Expr::Term(text.into())
    }

    pub fn phrase<S: Into<String>>(text: S) -> Self {
        Expr::Phrase(text.into())
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    /// Whether this is the neutral match-everything leaf.
    pub fn is_match_all(&self) -> bool {
        matches!(self, Expr::MatchAll)
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Expr::MatchAll | Expr::Term(_) | Expr::Phrase(_))
    }

    /// Height of the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::MatchAll | Expr::Term(_) | Expr::Phrase(_) => 1,
            Expr::Not(inner) => 1 + inner.depth(),
            Expr::And(left, right) | Expr::Or(left, right) => {
                1 + left.depth().max(right.depth())
            }
        }
    }
}

/// Canonical, fully parenthesised form. Parsing the output yields the same
/// tree again.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::MatchAll => write!(f, "()"),
            Expr::Term(text) => write!(f, "{text}"),
            Expr::Phrase(text) => write!(f, "\"{text}\""),
            Expr::And(left, right) => write!(f, "({left} AND {right})"),
            Expr::Or(left, right) => write!(f, "({left} OR {right})"),
            Expr::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_fully_parenthesised() {
        let expr = Expr::or(
            Expr::term("shell"),
            Expr::and(Expr::phrase("big oil"), Expr::not(Expr::term("gas"))),
        );
        assert_eq!(expr.to_string(), "(shell OR (\"big oil\" AND NOT gas))");
    }

    #[test]
    fn test_match_all_display() {
        assert_eq!(Expr::MatchAll.to_string(), "()");
        assert!(Expr::MatchAll.is_match_all());
        assert!(Expr::MatchAll.is_leaf());
    }

    #[test]
    fn test_depth() {
        assert_eq!(Expr::term("a").depth(), 1);
        assert_eq!(Expr::not(Expr::term("a")).depth(), 2);
        let expr = Expr::and(Expr::term("a"), Expr::or(Expr::term("b"), Expr::term("c")));
        assert_eq!(expr.depth(), 3);
        assert!(!expr.is_leaf());
    }

    #[test]
    fn test_serializes_as_tagged_tree() {
        let expr = Expr::and(Expr::term("UAE"), Expr::not(Expr::phrase("gift card")));
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "and": [{"term": "UAE"}, {"not": {"phrase": "gift card"}}]
            })
        );
    }
}
